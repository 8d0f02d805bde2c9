//! Errati: dictionary driven error types
//!
//! Setup facade over `errati-core`. One [`Errati`] owns a registry and
//! accumulates error types across setup runs; each run parses one
//! dictionary (bundled, inline or none) with its own field, reflow,
//! extend and override options.
//!
//! ```
//! use errati::{Errati, SetupOptions};
//!
//! let mut errati = Errati::new();
//! errati.setup(SetupOptions::new()).unwrap();
//!
//! let error = errati.registry().create("NotFound", "no such page").unwrap();
//! assert_eq!(error.to_string(), "Not Found: no such page");
//! ```

pub mod config;
pub mod error;
pub mod options;

pub use config::{FieldMapConfig, FieldSlot, FieldsConfig, SetupConfig};
pub use error::SetupError;
pub use options::{DictionarySource, RegistryFn, RegistryMethods, SetupOptions};

pub use errati_core::{
    Args, AliasSpec, Dictionary, DictionaryParser, EntryFields, ErratiError, ErrorInstance,
    ErrorType, FieldConfig, Filter, IndexField, MethodTable, NativeError, ParserOptions, Payload,
    Reflow, Registry, Scope, Visit,
};

use serde_json::Value;
use tracing::{debug, info};

/// Owns the registry that setup runs accumulate into, plus any functions
/// callers attached to the facade itself
#[derive(Debug, Default)]
pub struct Errati {
    registry: Registry,
    methods: RegistryMethods,
}

impl Errati {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing registry
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Attach a function to the facade, callable through [`Errati::call`]
    pub fn with_method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Registry, &[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.methods = self.methods.with_method(name, f);
        self
    }

    /// Parse one dictionary into the registry and return it
    ///
    /// Aliases from earlier runs stay; a conflicting alias fails the run
    /// with the registry holding every entry parsed before the conflict.
    /// Facade functions in the options are attached before any parsing, so
    /// they stay even when the run fails.
    pub fn setup(&mut self, mut options: SetupOptions) -> Result<&Registry, SetupError> {
        let methods = std::mem::take(&mut options.errati);
        if !methods.is_empty() {
            debug!("Attaching facade functions: {:?}", methods);
            self.methods.merge(methods);
        }

        let (source, parser_options) = options.into_parts();
        let label = match &source {
            DictionarySource::Bundled(name) => name.clone(),
            DictionarySource::Inline(_) => "inline".to_string(),
            DictionarySource::Disabled => "none".to_string(),
        };

        match source.resolve()? {
            Some(dictionary) => {
                let added =
                    DictionaryParser::new(parser_options).parse(&mut self.registry, dictionary)?;
                info!(
                    "Setup from {} dictionary added {} aliases ({} total)",
                    label,
                    added,
                    self.registry.len()
                );
            }
            None => debug!("Dictionary disabled, registry left as is"),
        }

        Ok(&self.registry)
    }

    /// Load a config file and run setup with it
    pub fn setup_from_file(
        &mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<&Registry, SetupError> {
        let options = SetupConfig::load(path)?.into_options()?;
        self.setup(options)
    }

    /// Invoke a facade function with the current registry
    pub fn call(&self, name: &str, args: &[Value]) -> anyhow::Result<Value> {
        let f = self
            .methods
            .get(name)
            .ok_or_else(|| ErratiError::UnknownMethod {
                type_name: "Errati".to_string(),
                method: name.to_string(),
            })?;
        f(&self.registry, args)
    }

    pub fn responds_to(&self, name: &str) -> bool {
        self.methods.contains(name)
    }

    /// Drop every registered alias; facade functions stay
    pub fn dispose(&mut self) -> &mut Self {
        self.registry.dispose();
        debug!("Registry disposed");
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn into_registry(self) -> Registry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_defaults_to_http_short() {
        let mut errati = Errati::new();
        let registry = errati.setup(SetupOptions::new()).unwrap();
        assert_eq!(registry.count(None), 9);
        assert!(registry.contains("NotFound"));
        assert!(registry.contains("PermissionDenied"));
    }

    #[test]
    fn test_disabled_dictionary_keeps_registry() {
        let mut errati = Errati::new();
        errati.setup(SetupOptions::new()).unwrap();
        let registry = errati.setup(SetupOptions::new().without_dictionary()).unwrap();
        assert_eq!(registry.count(None), 9);
    }

    #[test]
    fn test_second_run_conflicts() {
        let mut errati = Errati::new();
        errati.setup(SetupOptions::new()).unwrap();
        let err = errati.setup(SetupOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            SetupError::Core(ErratiError::AliasConflict { ref alias }) if alias == "BadRequest"
        ));
    }

    #[test]
    fn test_dispose_then_setup() {
        let mut errati = Errati::new();
        errati.setup(SetupOptions::new()).unwrap();
        errati.dispose();
        assert!(errati.registry().is_empty());
        errati.setup(SetupOptions::new().bundled("full")).unwrap();
        assert!(errati.registry().contains("NotModified"));
    }

    #[test]
    fn test_facade_functions() {
        let mut errati = Errati::new().with_method("total", |registry, _| {
            Ok(Value::from(registry.count(None)))
        });
        errati
            .setup(
                SetupOptions::new()
                    .without_dictionary()
                    .errati_method("test", |_, _| Ok(Value::from("value"))),
            )
            .unwrap();

        assert!(errati.registry().is_empty());
        assert_eq!(errati.call("test", &[]).unwrap(), Value::from("value"));
        assert_eq!(errati.call("total", &[]).unwrap(), Value::from(0));

        let err = errati.call("missing", &[]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ErratiError>(),
            Some(&ErratiError::UnknownMethod {
                type_name: "Errati".to_string(),
                method: "missing".to_string(),
            })
        );
    }
}
