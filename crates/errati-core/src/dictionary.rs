//! Dictionaries of error descriptions
use crate::error::ErratiError;
use crate::methods::MethodTable;
use serde_json::{Map, Value};

/// Field map of one entry: plain data plus the entry's own methods
#[derive(Debug, Clone, Default)]
pub struct EntryFields {
    pub data: Map<String, Value>,
    pub methods: MethodTable,
}

impl EntryFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_methods(mut self, methods: MethodTable) -> Self {
        self.methods = methods;
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

impl From<Map<String, Value>> for EntryFields {
    fn from(data: Map<String, Value>) -> Self {
        Self {
            data,
            methods: MethodTable::new(),
        }
    }
}

/// Payload of a dictionary entry
#[derive(Debug, Clone)]
pub enum Payload {
    /// Shorthand for the display value
    Text(String),
    /// Number or boolean, mapped like `Text`
    Scalar(Value),
    Fields(EntryFields),
}

impl Payload {
    /// Classify a JSON value. `null` and arrays have no field mapping and are rejected.
    pub fn from_value(index: &str, value: Value) -> Result<Self, ErratiError> {
        match value {
            Value::String(text) => Ok(Payload::Text(text)),
            Value::Object(data) => Ok(Payload::Fields(data.into())),
            Value::Number(_) | Value::Bool(_) => Ok(Payload::Scalar(value)),
            Value::Null => Err(malformed(index, "null payload")),
            Value::Array(_) => Err(malformed(index, "array payload")),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<EntryFields> for Payload {
    fn from(fields: EntryFields) -> Self {
        Payload::Fields(fields)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(data: Map<String, Value>) -> Self {
        Payload::Fields(data.into())
    }
}

/// Ordered entries, keyed or positional
#[derive(Debug, Clone)]
pub enum Dictionary {
    Keyed(Vec<(String, Payload)>),
    Sequence(Vec<Payload>),
}

impl Dictionary {
    pub fn keyed() -> Self {
        Dictionary::Keyed(Vec::new())
    }

    pub fn sequence() -> Self {
        Dictionary::Sequence(Vec::new())
    }

    /// Add a keyed entry. On a sequence the key is ignored.
    pub fn with_entry(mut self, index: impl ToString, payload: impl Into<Payload>) -> Self {
        match &mut self {
            Dictionary::Keyed(entries) => entries.push((index.to_string(), payload.into())),
            Dictionary::Sequence(items) => items.push(payload.into()),
        }
        self
    }

    /// Append an entry; on a keyed dictionary its position becomes the key
    pub fn with_item(mut self, payload: impl Into<Payload>) -> Self {
        match &mut self {
            Dictionary::Keyed(entries) => {
                let index = entries.len().to_string();
                entries.push((index, payload.into()));
            }
            Dictionary::Sequence(items) => items.push(payload.into()),
        }
        self
    }

    /// Objects become keyed dictionaries, arrays become sequences
    pub fn from_value(value: Value) -> Result<Self, ErratiError> {
        match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(index, payload)| {
                    let payload = Payload::from_value(&index, payload)?;
                    Ok((index, payload))
                })
                .collect::<Result<Vec<_>, ErratiError>>()
                .map(Dictionary::Keyed),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(position, payload)| Payload::from_value(&position.to_string(), payload))
                .collect::<Result<Vec<_>, ErratiError>>()
                .map(Dictionary::Sequence),
            other => Err(malformed(
                "<dictionary>",
                &format!("expected object or array, got {}", other),
            )),
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Dictionary::Sequence(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Dictionary::Keyed(entries) => entries.len(),
            Dictionary::Sequence(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries with their natural index (position for sequences)
    pub fn into_entries(self) -> Vec<(String, Payload)> {
        match self {
            Dictionary::Keyed(entries) => entries,
            Dictionary::Sequence(items) => items
                .into_iter()
                .enumerate()
                .map(|(position, payload)| (position.to_string(), payload))
                .collect(),
        }
    }
}

fn malformed(index: &str, reason: &str) -> ErratiError {
    ErratiError::MalformedEntry {
        index: index.to_string(),
        reason: reason.to_string(),
    }
}
