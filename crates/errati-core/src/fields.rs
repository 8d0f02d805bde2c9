//! Field configuration: which payload fields become aliases, and where the
//! natural index and bare string payloads land.

use crate::{DEFAULT_INDEX_FIELD, DEFAULT_VALUE_FIELD};
use serde::{Deserialize, Serialize};

/// How a field contributes to aliases: `true`, `false`, or a prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasSpec {
    Toggle(bool),
    Prefix(String),
}

impl AliasSpec {
    /// Prefix to prepend, `None` when the field is disabled
    pub fn prefix(&self) -> Option<&str> {
        match self {
            AliasSpec::Toggle(true) => Some(""),
            AliasSpec::Toggle(false) => None,
            AliasSpec::Prefix(prefix) => Some(prefix),
        }
    }
}

impl From<bool> for AliasSpec {
    fn from(enabled: bool) -> Self {
        AliasSpec::Toggle(enabled)
    }
}

impl From<&str> for AliasSpec {
    fn from(prefix: &str) -> Self {
        AliasSpec::Prefix(prefix.to_string())
    }
}

impl From<String> for AliasSpec {
    fn from(prefix: String) -> Self {
        AliasSpec::Prefix(prefix)
    }
}

/// Payload field receiving the entry's natural index
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IndexField {
    /// `code` for keyed dictionaries, disabled for sequences
    #[default]
    Default,
    /// Explicit field name, used for sequences too
    Named(String),
    Disabled,
}

impl IndexField {
    pub fn resolve(&self, sequence: bool) -> Option<&str> {
        match self {
            IndexField::Default if sequence => None,
            IndexField::Default => Some(DEFAULT_INDEX_FIELD),
            IndexField::Named(field) => Some(field),
            IndexField::Disabled => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConfig {
    /// Alias descriptors, in the order aliases are computed
    pub aliases: Vec<(String, AliasSpec)>,
    pub index_field: IndexField,
    /// `None` leaves bare string payloads unmapped
    pub value_field: Option<String>,
}

impl Default for FieldConfig {
    /// Alias by `name`, index into `code`, bare strings into `name`
    fn default() -> Self {
        Self {
            aliases: vec![(DEFAULT_VALUE_FIELD.to_string(), AliasSpec::Toggle(true))],
            index_field: IndexField::Default,
            value_field: Some(DEFAULT_VALUE_FIELD.to_string()),
        }
    }
}

impl FieldConfig {
    /// No alias descriptors; index and value fields keep their defaults
    pub fn empty() -> Self {
        Self {
            aliases: Vec::new(),
            ..Self::default()
        }
    }

    /// Set the descriptor for `field`, replacing an earlier one
    pub fn alias(mut self, field: impl Into<String>, spec: impl Into<AliasSpec>) -> Self {
        let field = field.into();
        let spec = spec.into();
        match self.aliases.iter_mut().find(|(name, _)| *name == field) {
            Some(existing) => existing.1 = spec,
            None => self.aliases.push((field, spec)),
        }
        self
    }

    pub fn index_field(mut self, index_field: IndexField) -> Self {
        self.index_field = index_field;
        self
    }

    pub fn value_field(mut self, field: Option<String>) -> Self {
        self.value_field = field;
        self
    }
}
