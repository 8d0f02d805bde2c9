//! Generated error types and their instances

use crate::args::Args;
use crate::behavior::Filter;
use crate::error::ErratiError;
use crate::methods::Dispatch;
use serde_json::{Map, Value};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::sync::Arc;

/// The native error capability every generated instance provides
pub trait NativeError: std::error::Error {
    /// Natural index of the dictionary entry behind the type
    fn kind(&self) -> &str;
    fn name(&self) -> &str;
    fn message(&self) -> Option<&str>;
    fn stack(&self) -> Option<&str>;
}

/// One error type, built from one dictionary entry.
///
/// Shared through `Arc`: every alias of the entry points at the same type,
/// and every instance keeps a handle to the type it came from.
pub struct ErrorType {
    index: String,
    name: String,
    statics: Map<String, Value>,
    seeds: Map<String, Value>,
    dispatch: Dispatch,
}

impl ErrorType {
    pub(crate) fn new(
        index: String,
        name: String,
        statics: Map<String, Value>,
        seeds: Map<String, Value>,
        dispatch: Dispatch,
    ) -> Arc<Self> {
        Arc::new(Self {
            index,
            name,
            statics,
            seeds,
            dispatch,
        })
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Static member lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.statics.get(key)
    }

    pub fn statics(&self) -> &Map<String, Value> {
        &self.statics
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.dispatch.has_method(name)
    }

    /// Create an instance.
    ///
    /// Fields are seeded from extend values, the index field and the entry
    /// data, then `parse_args` (only when arguments are given), `parse_stack`
    /// and `init` run in that order. Hook failures are returned as-is.
    pub fn instantiate(self: &Arc<Self>, args: impl Into<Args>) -> anyhow::Result<ErrorInstance> {
        let mut error = ErrorInstance {
            error_type: Arc::clone(self),
            fields: self.seeds.clone(),
        };

        let args = args.into();
        if !args.is_empty() {
            (self.dispatch.parse_args)(&mut error, args)?;
        }

        let raw = capture_stack(&self.name);
        (self.dispatch.parse_stack)(&mut error, &raw)?;

        if let Some(init) = &self.dispatch.init {
            init(&mut error)?;
        }

        tracing::trace!(name = %self.name, index = %self.index, "instantiated error");
        Ok(error)
    }
}

impl fmt::Debug for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ErrorType")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("statics", &self.statics)
            .field("dispatch", &self.dispatch)
            .finish()
    }
}

/// An instantiated error
#[derive(Clone)]
pub struct ErrorInstance {
    error_type: Arc<ErrorType>,
    fields: Map<String, Value>,
}

impl ErrorInstance {
    pub fn error_type(&self) -> &Arc<ErrorType> {
        &self.error_type
    }

    /// Whether this instance was created by `error_type`
    pub fn is(&self, error_type: &Arc<ErrorType>) -> bool {
        Arc::ptr_eq(&self.error_type, error_type)
    }

    /// Own `name` field, falling back to the type name
    pub fn name(&self) -> &str {
        self.fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(&self.error_type.name)
    }

    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").and_then(Value::as_str)
    }

    pub fn stack(&self) -> Option<&str> {
        self.fields.get("stack").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.set("message", message.into());
    }

    pub fn set_stack(&mut self, stack: impl Into<String>) {
        self.set("stack", stack.into());
    }

    /// Own fields, in insertion order
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn to_object(&self, filter: Option<&Filter>) -> Map<String, Value> {
        (self.error_type.dispatch.to_object)(self, filter)
    }

    pub fn to_json(&self, filter: Option<&Filter>) -> anyhow::Result<String> {
        (self.error_type.dispatch.to_json)(self, filter)
    }

    pub fn responds_to(&self, method: &str) -> bool {
        self.error_type.has_method(method)
    }

    /// Invoke a named domain method
    pub fn call(&self, method: &str, args: &[Value]) -> anyhow::Result<Value> {
        let f = self
            .error_type
            .dispatch
            .methods
            .get(method)
            .ok_or_else(|| ErratiError::UnknownMethod {
                type_name: self.error_type.name.clone(),
                method: method.to_string(),
            })?;
        f(self, args)
    }
}

impl fmt::Display for ErrorInstance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&(self.error_type.dispatch.to_string)(self))
    }
}

impl fmt::Debug for ErrorInstance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ErrorInstance")
            .field("type", &self.error_type.name)
            .field("fields", &self.fields)
            .finish()
    }
}

impl std::error::Error for ErrorInstance {}

impl NativeError for ErrorInstance {
    fn kind(&self) -> &str {
        &self.error_type.index
    }

    fn name(&self) -> &str {
        ErrorInstance::name(self)
    }

    fn message(&self) -> Option<&str> {
        ErrorInstance::message(self)
    }

    fn stack(&self) -> Option<&str> {
        ErrorInstance::stack(self)
    }
}

/// Raw stack text: a headline, one frame for the construction internals,
/// then the caller's frames when backtraces are enabled.
pub(crate) fn capture_stack(type_name: &str) -> String {
    let mut stack = format!("Error\n    at ErrorType::instantiate [{}]", type_name);

    let backtrace = Backtrace::capture();
    if backtrace.status() == BacktraceStatus::Captured {
        for frame in caller_frames(&backtrace.to_string()) {
            stack.push_str("\n    at ");
            stack.push_str(&frame);
        }
    }
    stack
}

fn caller_frames(rendered: &str) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();
    for line in rendered.lines().map(str::trim) {
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                frame.push_str(&format!(" ({})", location));
            }
        } else if let Some((number, symbol)) = line.split_once(": ") {
            if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
                frames.push(symbol.to_string());
            }
        }
    }
    frames
        .into_iter()
        .skip_while(|frame| is_internal_frame(frame))
        .collect()
}

fn is_internal_frame(symbol: &str) -> bool {
    let symbol = symbol.trim_start_matches('<');
    ["std::", "core::", "alloc::", "errati_core::"]
        .iter()
        .any(|prefix| symbol.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::MethodTable;
    use serde_json::json;

    fn sample_type(dispatch: Dispatch) -> Arc<ErrorType> {
        let mut data = Map::new();
        data.insert("code".to_string(), json!("404"));
        data.insert("name".to_string(), json!("Not Found"));
        ErrorType::new("404".to_string(), "Not Found".to_string(), data.clone(), data, dispatch)
    }

    #[test]
    fn test_instance_and_static_views_agree() {
        let error_type = sample_type(Dispatch::defaults());
        let error = error_type.instantiate(Args::Empty).unwrap();

        assert_eq!(error.get("code"), error_type.get("code"));
        assert_eq!(error.get("name"), error_type.get("name"));
        assert_eq!(error.message(), None);
        assert!(error.is(&error_type));
    }

    #[test]
    fn test_native_error_capability() {
        let error_type = sample_type(Dispatch::defaults());
        let error = error_type.instantiate("gone").unwrap();

        let native: &dyn NativeError = &error;
        assert_eq!(native.kind(), "404");
        assert_eq!(native.name(), "Not Found");
        assert_eq!(native.message(), Some("gone"));

        let boxed: Box<dyn std::error::Error> = Box::new(error.clone());
        assert_eq!(boxed.to_string(), "Not Found: gone");
    }

    #[test]
    fn test_identity_is_per_type() {
        let first = sample_type(Dispatch::defaults());
        let second = sample_type(Dispatch::defaults());
        let error = first.instantiate(Args::Empty).unwrap();
        assert!(error.is(&first));
        assert!(!error.is(&second));
    }

    #[test]
    fn test_init_runs_last() {
        let dispatch = Dispatch::layered([&MethodTable::new().with_init(|e| {
            let seen = e.message().unwrap_or("none").to_string();
            e.set("seen", seen);
            Ok(())
        })]);
        let error = sample_type(dispatch).instantiate("hello").unwrap();
        assert_eq!(error.get("seen"), Some(&json!("hello")));
    }

    #[test]
    fn test_hook_failure_propagates() {
        #[derive(Debug, thiserror::Error)]
        #[error("refused")]
        struct Refused;

        let dispatch =
            Dispatch::layered([&MethodTable::new().with_init(|_| Err(Refused.into()))]);
        let err = sample_type(dispatch).instantiate(Args::Empty).unwrap_err();
        assert!(err.downcast_ref::<Refused>().is_some());
    }

    #[test]
    fn test_call_methods() {
        let dispatch = Dispatch::layered([&MethodTable::new()
            .with_method("shout", |e, _| Ok(json!(e.name().to_uppercase())))]);
        let error = sample_type(dispatch).instantiate(Args::Empty).unwrap();

        assert!(error.responds_to("shout"));
        assert_eq!(error.call("shout", &[]).unwrap(), json!("NOT FOUND"));

        let err = error.call("whisper", &[]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ErratiError>(),
            Some(&ErratiError::UnknownMethod {
                type_name: "Not Found".to_string(),
                method: "whisper".to_string(),
            })
        );
    }

    #[test]
    fn test_capture_stack_shape() {
        let raw = capture_stack("Sample");
        let mut lines = raw.lines();
        assert_eq!(lines.next(), Some("Error"));
        assert_eq!(lines.next(), Some("    at ErrorType::instantiate [Sample]"));
    }

    #[test]
    fn test_caller_frames_skip_internals() {
        let rendered = "   0: std::backtrace::Backtrace::capture\n             at /rustc/backtrace.rs:1:1\n   1: errati_core::error_type::capture_stack\n   2: app::handler\n             at src/main.rs:10:5\n   3: core::ops::function::FnOnce::call_once\n";
        let frames = caller_frames(rendered);
        assert_eq!(
            frames,
            vec![
                "app::handler (src/main.rs:10:5)".to_string(),
                "core::ops::function::FnOnce::call_once".to_string(),
            ]
        );
    }
}
