//! Setup configuration files (YAML or JSON)
//!
//! Only data lives in a file: dictionary, field descriptors, reflow name and
//! extend/override values. Methods are attached in code on the resulting
//! [`SetupOptions`].

use crate::error::SetupError;
use crate::options::{DictionarySource, RegistryMethods, SetupOptions};
use errati_core::{AliasSpec, Dictionary, FieldConfig, IndexField, Reflow, Scope};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// `false`, a bundled name, or inline entries (object or array)
    #[serde(alias = "dict")]
    pub dictionary: Option<Value>,
    pub fields: Option<FieldsConfig>,
    pub reflow: Option<String>,
    pub extend: Map<String, Value>,
    #[serde(rename = "override")]
    pub overrides: Map<String, Value>,
}

/// Field descriptors plus the `map` block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldsConfig {
    #[serde(default)]
    pub map: FieldMapConfig,
    #[serde(flatten)]
    pub aliases: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldMapConfig {
    #[serde(rename = "_index", default)]
    pub index: Option<FieldSlot>,
    #[serde(rename = "_value", default)]
    pub value: Option<FieldSlot>,
}

/// `false` disables the slot, `true` keeps the default, a string names the field.
///
/// For `_index` the default is `code` on keyed dictionaries and nothing on
/// sequences, so `_index: true` leaves a sequence without an index field;
/// only a field name turns it on there.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldSlot {
    Toggle(bool),
    Named(String),
}

impl SetupConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SetupError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| SetupError::Config(format!("invalid YAML: {}", e)))
    }

    pub fn from_json_str(json: &str) -> Result<Self, SetupError> {
        serde_json::from_str(json)
            .map_err(|e| SetupError::Config(format!("invalid JSON: {}", e)))
    }

    /// Read a config file; `.json` files are parsed as JSON, anything else as YAML
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SetupError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    pub fn into_options(self) -> Result<SetupOptions, SetupError> {
        let dictionary = match self.dictionary {
            None | Some(Value::Null) | Some(Value::Bool(true)) => DictionarySource::default(),
            Some(Value::Bool(false)) => DictionarySource::Disabled,
            Some(Value::String(name)) => DictionarySource::Bundled(name),
            Some(value) => DictionarySource::Inline(Dictionary::from_value(value)?),
        };

        let fields = match self.fields {
            Some(fields) => fields.into_field_config()?,
            None => FieldConfig::default(),
        };

        let reflow = self
            .reflow
            .as_deref()
            .map(Reflow::named)
            .unwrap_or_default();

        Ok(SetupOptions {
            dictionary,
            fields,
            reflow,
            extend: scope(self.extend),
            overrides: scope(self.overrides),
            errati: RegistryMethods::default(),
        })
    }
}

impl TryFrom<SetupConfig> for SetupOptions {
    type Error = SetupError;

    fn try_from(config: SetupConfig) -> Result<Self, Self::Error> {
        config.into_options()
    }
}

impl FieldsConfig {
    /// Descriptors given here replace the default `name` descriptor
    pub fn into_field_config(self) -> Result<FieldConfig, SetupError> {
        let mut config = FieldConfig::empty();

        for (field, spec) in self.aliases {
            let spec: AliasSpec = serde_json::from_value(spec).map_err(|_| {
                SetupError::Config(format!(
                    "field {} must be true, false or a prefix string",
                    field
                ))
            })?;
            config = config.alias(field, spec);
        }

        config.index_field = match self.map.index {
            None | Some(FieldSlot::Toggle(true)) => IndexField::Default,
            Some(FieldSlot::Toggle(false)) => IndexField::Disabled,
            Some(FieldSlot::Named(field)) => IndexField::Named(field),
        };

        match self.map.value {
            None | Some(FieldSlot::Toggle(true)) => {}
            Some(FieldSlot::Toggle(false)) => config.value_field = None,
            Some(FieldSlot::Named(field)) => config.value_field = Some(field),
        }

        Ok(config)
    }
}

fn scope(values: Map<String, Value>) -> Scope {
    Scope {
        values,
        ..Scope::default()
    }
}
