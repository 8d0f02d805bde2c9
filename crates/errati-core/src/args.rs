//! Constructor arguments for generated error types
use serde_json::{Map, Value};

/// Arguments handed to an error type when it is instantiated.
///
/// The shape decides what the default `parse_args` hook does with them:
/// a message, fields merged onto the instance, or values kept as `args`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Args {
    /// No arguments
    #[default]
    Empty,
    /// A single string, used as the message
    Message(String),
    /// A single field map, merged onto the instance
    Fields(Map<String, Value>),
    /// A single value of any other shape, stored as `args`
    Other(Value),
    /// Several positional arguments
    Multiple(Vec<Value>),
}

impl Args {
    /// Classify positional values into an argument shape
    pub fn from_values(mut values: Vec<Value>) -> Self {
        if values.len() > 1 {
            return Args::Multiple(values);
        }
        match values.pop() {
            None => Args::Empty,
            Some(Value::String(message)) => Args::Message(message),
            Some(Value::Object(fields)) => Args::Fields(fields),
            Some(other) => Args::Other(other),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Args::Message(message.into())
    }

    /// No arguments at all, including an empty positional list
    pub fn is_empty(&self) -> bool {
        match self {
            Args::Empty => true,
            Args::Multiple(values) => values.is_empty(),
            _ => false,
        }
    }

    /// Flatten back into positional values
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Args::Empty => Vec::new(),
            Args::Message(message) => vec![Value::String(message)],
            Args::Fields(fields) => vec![Value::Object(fields)],
            Args::Other(value) => vec![value],
            Args::Multiple(values) => values,
        }
    }
}

impl From<&str> for Args {
    fn from(message: &str) -> Self {
        Args::Message(message.to_string())
    }
}

impl From<String> for Args {
    fn from(message: String) -> Self {
        Args::Message(message)
    }
}

impl From<Map<String, Value>> for Args {
    fn from(fields: Map<String, Value>) -> Self {
        Args::Fields(fields)
    }
}

impl From<Value> for Args {
    fn from(value: Value) -> Self {
        Args::from_values(vec![value])
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Args::from_values(values)
    }
}

impl From<()> for Args {
    fn from(_: ()) -> Self {
        Args::Empty
    }
}
