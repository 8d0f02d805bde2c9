//! Default behavior set
//!
//! The methods every generated type receives unless an extend, override or
//! entry-local table replaces them.

use crate::args::Args;
use crate::error_type::ErrorInstance;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key filter for object and JSON views. `In` is checked first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Keep only the listed keys
    In(Vec<String>),
    /// Drop the listed keys
    Ex(Vec<String>),
}

impl Filter {
    pub fn include<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::In(keys.into_iter().map(Into::into).collect())
    }

    pub fn exclude<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::Ex(keys.into_iter().map(Into::into).collect())
    }

    pub fn keeps(&self, key: &str) -> bool {
        match self {
            Filter::In(keys) => keys.iter().any(|k| k == key),
            Filter::Ex(keys) => !keys.iter().any(|k| k == key),
        }
    }
}

/// `"<name>: <message>"`, or just the name when there is no message
pub fn to_string(error: &ErrorInstance) -> String {
    match error.message() {
        Some(message) if !message.is_empty() => format!("{}: {}", error.name(), message),
        _ => error.name().to_string(),
    }
}

/// Shallow copy of the instance's own fields
pub fn to_object(error: &ErrorInstance, filter: Option<&Filter>) -> Map<String, Value> {
    error
        .fields()
        .iter()
        .filter(|(key, _)| filter.map_or(true, |f| f.keeps(key)))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// JSON text of the object view, going through the type's own `to_object`
pub fn to_json(error: &ErrorInstance, filter: Option<&Filter>) -> anyhow::Result<String> {
    Ok(serde_json::to_string(&error.to_object(filter))?)
}

pub fn parse_args(error: &mut ErrorInstance, args: Args) -> anyhow::Result<()> {
    match args {
        Args::Empty => {}
        Args::Message(message) => {
            if !message.is_empty() {
                error.set_message(message);
            }
        }
        Args::Fields(fields) => {
            for (key, value) in fields {
                error.set(key, value);
            }
        }
        Args::Other(value) => {
            if is_truthy(&value) {
                error.set("args", value);
            }
        }
        Args::Multiple(mut values) => {
            if matches!(values.first(), Some(Value::String(_))) {
                if let Value::String(message) = values.remove(0) {
                    error.set_message(message);
                }
            }
            error.set("args", Value::Array(values));
        }
    }
    Ok(())
}

/// Rewrite the headline and drop the construction frame right below it
pub fn parse_stack(error: &mut ErrorInstance, raw: &str) -> anyhow::Result<()> {
    let mut headline = format!("Error: {}. ", error.name());
    if let Some(message) = error.message().filter(|m| !m.is_empty()) {
        headline.push_str(&format!("\"{}\"", message));
    }

    let mut lines = raw.split('\n');
    lines.next();
    lines.next();

    let stack = std::iter::once(headline.as_str())
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n");
    error.set_stack(stack);
    Ok(())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
