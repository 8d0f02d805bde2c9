//! Method tables
//!
//! Behavior is assembled from partial tables merged left to right into one
//! [`Dispatch`] per generated type: defaults, then extend-scope, then
//! override-scope, then the entry's own methods.

use crate::args::Args;
use crate::behavior::{self, Filter};
use crate::error_type::ErrorInstance;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type ToStringFn = Arc<dyn Fn(&ErrorInstance) -> String + Send + Sync>;
pub type ToObjectFn =
    Arc<dyn Fn(&ErrorInstance, Option<&Filter>) -> Map<String, Value> + Send + Sync>;
pub type ToJsonFn =
    Arc<dyn Fn(&ErrorInstance, Option<&Filter>) -> anyhow::Result<String> + Send + Sync>;
pub type ParseArgsFn = Arc<dyn Fn(&mut ErrorInstance, Args) -> anyhow::Result<()> + Send + Sync>;
pub type ParseStackFn = Arc<dyn Fn(&mut ErrorInstance, &str) -> anyhow::Result<()> + Send + Sync>;
pub type InitFn = Arc<dyn Fn(&mut ErrorInstance) -> anyhow::Result<()> + Send + Sync>;
pub type MethodFn = Arc<dyn Fn(&ErrorInstance, &[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// A partial method table; unset slots leave lower layers in place
#[derive(Clone, Default)]
pub struct MethodTable {
    to_string: Option<ToStringFn>,
    to_object: Option<ToObjectFn>,
    to_json: Option<ToJsonFn>,
    parse_args: Option<ParseArgsFn>,
    parse_stack: Option<ParseStackFn>,
    init: Option<InitFn>,
    methods: HashMap<String, MethodFn>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_to_string<F>(mut self, f: F) -> Self
    where
        F: Fn(&ErrorInstance) -> String + Send + Sync + 'static,
    {
        self.to_string = Some(Arc::new(f));
        self
    }

    pub fn with_to_object<F>(mut self, f: F) -> Self
    where
        F: Fn(&ErrorInstance, Option<&Filter>) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.to_object = Some(Arc::new(f));
        self
    }

    pub fn with_to_json<F>(mut self, f: F) -> Self
    where
        F: Fn(&ErrorInstance, Option<&Filter>) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.to_json = Some(Arc::new(f));
        self
    }

    pub fn with_parse_args<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut ErrorInstance, Args) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.parse_args = Some(Arc::new(f));
        self
    }

    pub fn with_parse_stack<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut ErrorInstance, &str) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.parse_stack = Some(Arc::new(f));
        self
    }

    /// Hook run at the end of every instantiation
    pub fn with_init<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut ErrorInstance) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(f));
        self
    }

    /// Add a named domain method, callable through [`ErrorInstance::call`]
    pub fn with_method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ErrorInstance, &[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.slot_names().is_empty() && self.methods.is_empty()
    }

    fn slot_names(&self) -> Vec<&'static str> {
        let slots = [
            ("to_string", self.to_string.is_some()),
            ("to_object", self.to_object.is_some()),
            ("to_json", self.to_json.is_some()),
            ("parse_args", self.parse_args.is_some()),
            ("parse_stack", self.parse_stack.is_some()),
            ("init", self.init.is_some()),
        ];
        slots
            .iter()
            .filter(|(_, set)| *set)
            .map(|(name, _)| *name)
            .collect()
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut methods: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        methods.sort_unstable();
        f.debug_struct("MethodTable")
            .field("slots", &self.slot_names())
            .field("methods", &methods)
            .finish()
    }
}

/// Fully resolved behavior of one generated type
#[derive(Clone)]
pub struct Dispatch {
    pub(crate) to_string: ToStringFn,
    pub(crate) to_object: ToObjectFn,
    pub(crate) to_json: ToJsonFn,
    pub(crate) parse_args: ParseArgsFn,
    pub(crate) parse_stack: ParseStackFn,
    pub(crate) init: Option<InitFn>,
    pub(crate) methods: HashMap<String, MethodFn>,
}

impl Dispatch {
    /// The default behavior set
    pub fn defaults() -> Self {
        Self {
            to_string: Arc::new(behavior::to_string),
            to_object: Arc::new(behavior::to_object),
            to_json: Arc::new(behavior::to_json),
            parse_args: Arc::new(behavior::parse_args),
            parse_stack: Arc::new(behavior::parse_stack),
            init: None,
            methods: HashMap::new(),
        }
    }

    /// Defaults with each table layered on top, later tables winning
    pub fn layered<'a>(tables: impl IntoIterator<Item = &'a MethodTable>) -> Self {
        tables
            .into_iter()
            .fold(Self::defaults(), |dispatch, table| dispatch.layer(table))
    }

    pub fn layer(mut self, table: &MethodTable) -> Self {
        if let Some(f) = &table.to_string {
            self.to_string = Arc::clone(f);
        }
        if let Some(f) = &table.to_object {
            self.to_object = Arc::clone(f);
        }
        if let Some(f) = &table.to_json {
            self.to_json = Arc::clone(f);
        }
        if let Some(f) = &table.parse_args {
            self.parse_args = Arc::clone(f);
        }
        if let Some(f) = &table.parse_stack {
            self.parse_stack = Arc::clone(f);
        }
        if let Some(f) = &table.init {
            self.init = Some(Arc::clone(f));
        }
        for (name, f) in &table.methods {
            self.methods.insert(name.clone(), Arc::clone(f));
        }
        self
    }

    pub fn has_init(&self) -> bool {
        self.init.is_some()
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::defaults()
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Dispatch")
            .field("init", &self.init.is_some())
            .field("methods", &self.method_names())
            .finish()
    }
}
