//! Setup options and their defaults
use crate::error::SetupError;
use errati_core::{
    Dictionary, FieldConfig, MethodTable, ParserOptions, Reflow, Registry, Scope,
};
use errati_dictionaries::DEFAULT_DICTIONARY;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A caller-supplied function attached to the facade itself
pub type RegistryFn = Arc<dyn Fn(&Registry, &[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// Named facade functions; a later entry with the same name replaces the earlier one
#[derive(Clone, Default)]
pub struct RegistryMethods {
    methods: HashMap<String, RegistryFn>,
}

impl RegistryMethods {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Registry, &[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    pub fn get(&self, name: &str) -> Option<&RegistryFn> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Copy every method of `other` over this table
    pub fn merge(&mut self, other: RegistryMethods) {
        self.methods.extend(other.methods);
    }
}

impl fmt::Debug for RegistryMethods {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Where the entries for a setup run come from
#[derive(Debug, Clone)]
pub enum DictionarySource {
    /// A bundled dictionary, by name
    Bundled(String),
    Inline(Dictionary),
    /// Skip parsing
    Disabled,
}

impl Default for DictionarySource {
    fn default() -> Self {
        DictionarySource::Bundled(DEFAULT_DICTIONARY.to_string())
    }
}

impl DictionarySource {
    pub fn resolve(self) -> Result<Option<Dictionary>, SetupError> {
        match self {
            DictionarySource::Bundled(name) => errati_dictionaries::by_name(&name)
                .map(Some)
                .ok_or(SetupError::UnknownDictionary(name)),
            DictionarySource::Inline(dictionary) => Ok(Some(dictionary)),
            DictionarySource::Disabled => Ok(None),
        }
    }
}

/// Everything a setup run needs
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    pub dictionary: DictionarySource,
    pub fields: FieldConfig,
    pub reflow: Reflow,
    pub extend: Scope,
    pub overrides: Scope,
    /// Functions added to the [`Errati`](crate::Errati) facade, not to error types
    pub errati: RegistryMethods,
}

impl SetupOptions {
    /// Bundled `http-short`, aliased by name, camel-case
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dictionary(mut self, dictionary: Dictionary) -> Self {
        self.dictionary = DictionarySource::Inline(dictionary);
        self
    }

    pub fn bundled(mut self, name: impl Into<String>) -> Self {
        self.dictionary = DictionarySource::Bundled(name.into());
        self
    }

    pub fn without_dictionary(mut self) -> Self {
        self.dictionary = DictionarySource::Disabled;
        self
    }

    pub fn fields(mut self, fields: FieldConfig) -> Self {
        self.fields = fields;
        self
    }

    pub fn reflow(mut self, reflow: Reflow) -> Self {
        self.reflow = reflow;
        self
    }

    pub fn extend(mut self, extend: Scope) -> Self {
        self.extend = extend;
        self
    }

    /// Attach methods to the extend scope, keeping its values
    pub fn extend_methods(mut self, methods: MethodTable) -> Self {
        self.extend.methods = methods;
        self
    }

    pub fn overrides(mut self, overrides: Scope) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn override_methods(mut self, methods: MethodTable) -> Self {
        self.overrides.methods = methods;
        self
    }

    /// Attach a function to the facade, callable through `Errati::call`
    pub fn errati_method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Registry, &[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.errati = self.errati.with_method(name, f);
        self
    }

    /// Split into the dictionary source and the parser configuration
    /// (facade functions are left behind)
    pub fn into_parts(self) -> (DictionarySource, ParserOptions) {
        let parser = ParserOptions::new()
            .with_fields(self.fields)
            .with_reflow(self.reflow)
            .with_extend(self.extend)
            .with_overrides(self.overrides);
        (self.dictionary, parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SetupOptions::new();
        assert!(matches!(options.dictionary, DictionarySource::Bundled(ref n) if n == "http-short"));
        assert_eq!(options.fields, FieldConfig::default());
        assert!(matches!(options.reflow, Reflow::CamelCase));
        assert!(options.extend.is_empty());
        assert!(options.overrides.is_empty());
        assert!(options.errati.is_empty());
    }

    #[test]
    fn test_registry_methods_replace_by_name() {
        let methods = RegistryMethods::new()
            .with_method("b", |_, _| Ok(Value::from(1)))
            .with_method("a", |_, _| Ok(Value::from(2)))
            .with_method("b", |_, _| Ok(Value::from(3)));
        assert_eq!(methods.names(), vec!["a", "b"]);

        let registry = Registry::new();
        let b = methods.get("b").unwrap();
        assert_eq!(b(&registry, &[]).unwrap(), Value::from(3));
        assert_eq!(format!("{:?}", methods), "{\"a\", \"b\"}");
    }

    #[test]
    fn test_resolve_sources() {
        assert!(DictionarySource::Bundled("full".into()).resolve().unwrap().is_some());
        assert!(DictionarySource::Disabled.resolve().unwrap().is_none());
        assert!(matches!(
            DictionarySource::Bundled("nope".into()).resolve(),
            Err(SetupError::UnknownDictionary(ref n)) if n == "nope"
        ));
    }
}
