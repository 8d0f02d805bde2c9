//! Dictionary parser
//!
//! Walks a dictionary and builds one [`ErrorType`] per entry, then registers
//! the type under every alias computed from its fields.

use crate::dictionary::{Dictionary, EntryFields, Payload};
use crate::error::ErratiError;
use crate::error_type::ErrorType;
use crate::fields::FieldConfig;
use crate::methods::{Dispatch, MethodTable};
use crate::reflow::{value_text, Reflow};
use crate::registry::Registry;
use crate::DEFAULT_TYPE_NAME;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Values and methods applied to every generated type
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub values: Map<String, Value>,
    pub methods: MethodTable,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn with_methods(mut self, methods: MethodTable) -> Self {
        self.methods = methods;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.methods.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    pub fields: FieldConfig,
    pub reflow: Reflow,
    /// Lowest-priority layer over the defaults; values reach instances too
    pub extend: Scope,
    /// Wins over extend and defaults; values stay on the type
    pub overrides: Scope,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(mut self, fields: FieldConfig) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_reflow(mut self, reflow: Reflow) -> Self {
        self.reflow = reflow;
        self
    }

    pub fn with_extend(mut self, extend: Scope) -> Self {
        self.extend = extend;
        self
    }

    pub fn with_overrides(mut self, overrides: Scope) -> Self {
        self.overrides = overrides;
        self
    }
}

pub struct DictionaryParser {
    options: ParserOptions,
}

impl DictionaryParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Build every entry into `registry`.
    ///
    /// Stops at the first alias conflict; aliases of the conflicting entry
    /// are not inserted, earlier entries stay registered. Returns the number
    /// of aliases added.
    pub fn parse(
        &self,
        registry: &mut Registry,
        dictionary: Dictionary,
    ) -> Result<usize, ErratiError> {
        let index_field = self.options.fields.index_field.resolve(dictionary.is_sequence());
        let value_field = self.options.fields.value_field.as_deref();

        let before = registry.len();
        let mut built = 0usize;
        for (index, payload) in dictionary.into_entries() {
            let mut entry = normalize(&index, payload, value_field)?;

            if let Some(field) = index_field {
                entry
                    .data
                    .entry(field)
                    .or_insert_with(|| Value::String(index.clone()));
            }

            let aliases = self.aliases(&entry.data);
            if let Some(taken) = aliases.iter().find(|alias| registry.contains(alias)) {
                warn!(alias = %taken, index = %index, "alias already registered");
                return Err(ErratiError::AliasConflict {
                    alias: taken.clone(),
                });
            }

            let error_type = self.build_type(index, entry, index_field, value_field);
            for alias in aliases {
                debug!(alias = %alias, name = %error_type.name(), "registering error type");
                registry.register(alias, Arc::clone(&error_type))?;
            }
            built += 1;
        }

        let added = registry.len() - before;
        info!(types = built, aliases = added, total = registry.len(), "dictionary parsed");
        Ok(added)
    }

    /// Aliases in descriptor order; repeats within one entry collapse
    fn aliases(&self, data: &Map<String, Value>) -> Vec<String> {
        let mut aliases: Vec<String> = Vec::new();
        for (field, spec) in &self.options.fields.aliases {
            let Some(prefix) = spec.prefix() else {
                continue;
            };
            let Some(value) = data.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let alias = format!("{}{}", prefix, self.options.reflow.apply_value(value));
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }
        aliases
    }

    /// Build the type for one entry. Index and payload are owned by the
    /// call, so each type captures its own entry.
    fn build_type(
        &self,
        index: String,
        entry: EntryFields,
        index_field: Option<&str>,
        value_field: Option<&str>,
    ) -> Arc<ErrorType> {
        let EntryFields { data, methods } = entry;
        let extend = &self.options.extend;
        let overrides = &self.options.overrides;

        let mut seeds = extend.values.clone();
        if let Some(field) = index_field {
            if let Some(value) = data.get(field) {
                seeds.insert(field.to_string(), value.clone());
            }
        }
        seeds.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut statics = extend.values.clone();
        statics.extend(overrides.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        statics.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));

        let name = data
            .get("name")
            .or_else(|| value_field.and_then(|field| data.get(field)))
            .map(value_text)
            .unwrap_or_else(|| DEFAULT_TYPE_NAME.to_string());

        let dispatch = Dispatch::layered([&extend.methods, &overrides.methods, &methods]);

        debug!(index = %index, name = %name, "built error type");
        ErrorType::new(index, name, statics, seeds, dispatch)
    }
}

/// Bring any payload into field-map form
fn normalize(
    index: &str,
    payload: Payload,
    value_field: Option<&str>,
) -> Result<EntryFields, ErratiError> {
    let value = match payload {
        Payload::Fields(fields) => return Ok(fields),
        Payload::Text(text) => Value::String(text),
        Payload::Scalar(Value::Object(data)) => return Ok(data.into()),
        Payload::Scalar(value @ (Value::Null | Value::Array(_))) => {
            return Err(ErratiError::MalformedEntry {
                index: index.to_string(),
                reason: format!("unsupported payload {}", value),
            })
        }
        Payload::Scalar(value) => value,
    };

    let mut fields = EntryFields::new();
    if let Some(field) = value_field {
        fields.data.insert(field.to_string(), value);
    }
    Ok(fields)
}
