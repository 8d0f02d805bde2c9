//! Reflow functions: turn a field value into an alias fragment.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

lazy_static! {
    /// One word with its surrounding whitespace
    static ref WORD: Regex = Regex::new(r"\s*([0-9A-Za-z_])([0-9A-Za-z_]*)\s*").unwrap();

    /// Anything that is not a word character
    static ref NON_WORD: Regex = Regex::new(r"[^0-9A-Za-z_]+").unwrap();

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Naming transform applied before a value becomes an alias
#[derive(Clone, Default)]
pub enum Reflow {
    /// `"not found"` → `"NotFound"`
    #[default]
    CamelCase,
    /// `"not found"` → `"not_found"`
    Underscore,
    /// `"not found"` → `"notfound"`
    NoSpace,
    /// Caller supplied transform
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl Reflow {
    /// Select a built-in transform by name; unknown names fall back to camel-case
    pub fn named(name: &str) -> Self {
        if name.eq_ignore_ascii_case("underscore") {
            Reflow::Underscore
        } else if name.eq_ignore_ascii_case("nospace") {
            Reflow::NoSpace
        } else {
            Reflow::CamelCase
        }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Reflow::Custom(Arc::new(f))
    }

    pub fn apply(&self, input: &str) -> String {
        match self {
            Reflow::CamelCase => camel_case(input),
            Reflow::Underscore => underscore(input),
            Reflow::NoSpace => nospace(input),
            Reflow::Custom(f) => f(input),
        }
    }

    /// Reflow a field value through its textual form
    pub fn apply_value(&self, value: &Value) -> String {
        self.apply(&value_text(value))
    }
}

impl fmt::Debug for Reflow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reflow::CamelCase => write!(f, "CamelCase"),
            Reflow::Underscore => write!(f, "Underscore"),
            Reflow::NoSpace => write!(f, "NoSpace"),
            Reflow::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

pub fn camel_case(input: &str) -> String {
    let words = WORD.replace_all(input, |caps: &Captures| {
        format!("{}{}", caps[1].to_ascii_uppercase(), &caps[2])
    });
    NON_WORD.replace_all(&words, "").into_owned()
}

pub fn underscore(input: &str) -> String {
    WHITESPACE.replace_all(input, "_").into_owned()
}

pub fn nospace(input: &str) -> String {
    WHITESPACE.replace_all(input, "").into_owned()
}

/// Text form of a value: strings as-is, everything else as JSON text
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("not found"), "NotFound");
        assert_eq!(camel_case("Error one"), "ErrorOne");
        assert_eq!(camel_case("  padded   words "), "PaddedWords");
        assert_eq!(camel_case("Non-Authoritative Information"), "NonAuthoritativeInformation");
        assert_eq!(camel_case("Request-URI Too Long"), "RequestURITooLong");
        assert_eq!(camel_case("404"), "404");
    }

    #[test]
    fn test_underscore_and_nospace() {
        assert_eq!(underscore("not  found"), "not_found");
        assert_eq!(underscore("Error one"), "Error_one");
        assert_eq!(nospace("not found"), "notfound");
    }

    #[test]
    fn test_named_resolution() {
        assert!(matches!(Reflow::named("underscore"), Reflow::Underscore));
        assert!(matches!(Reflow::named("nospace"), Reflow::NoSpace));
        assert!(matches!(Reflow::named("CamelCase"), Reflow::CamelCase));
        assert!(matches!(Reflow::named("whatever"), Reflow::CamelCase));
    }

    #[test]
    fn test_custom_and_values() {
        let dashed = Reflow::custom(|s| s.replacen(' ', "-", 1));
        assert_eq!(dashed.apply("Error one"), "Error-one");
        assert_eq!(Reflow::CamelCase.apply_value(&json!(101)), "101");
        assert_eq!(Reflow::NoSpace.apply_value(&json!("a b")), "ab");
    }
}
