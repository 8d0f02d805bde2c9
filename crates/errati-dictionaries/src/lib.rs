//! Errati Dictionaries: bundled HTTP status tables
//!
//! Two keyed dictionaries mapping status codes to names, selectable by name:
//! `http-short` (alias `short`) and `http-full` (alias `full`).

pub mod http;

pub use http::{HTTP_FULL, HTTP_SHORT};

use errati_core::Dictionary;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Name used when no dictionary is configured
pub const DEFAULT_DICTIONARY: &str = "http-short";

static BUNDLED: Lazy<HashMap<&'static str, &'static [(u16, &'static str)]>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, &'static [(u16, &'static str)]> = HashMap::new();
    m.insert("http-short", HTTP_SHORT);
    m.insert("short", HTTP_SHORT);
    m.insert("http-full", HTTP_FULL);
    m.insert("full", HTTP_FULL);
    m
});

/// Look up a bundled dictionary by name
pub fn by_name(name: &str) -> Option<Dictionary> {
    BUNDLED.get(name).map(|table| to_dictionary(table))
}

/// Names accepted by [`by_name`], sorted
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BUNDLED.keys().copied().collect();
    names.sort_unstable();
    names
}

pub fn http_short() -> Dictionary {
    to_dictionary(HTTP_SHORT)
}

pub fn http_full() -> Dictionary {
    to_dictionary(HTTP_FULL)
}

fn to_dictionary(table: &[(u16, &str)]) -> Dictionary {
    table
        .iter()
        .fold(Dictionary::keyed(), |dictionary, (code, name)| {
            dictionary.with_entry(code, *name)
        })
}
