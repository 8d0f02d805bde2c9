//! Errati Core: Dictionary parser and error type registry
//!
//! Turns a declarative dictionary of error descriptions into distinct,
//! instantiable error types. Every generated type carries its own fields,
//! a layered method table and a name; instances behave like native errors
//! (message, stack, string/object/JSON views).
//!
//! # Architecture
//!
//! ```text
//! Dictionary → DictionaryParser → ErrorType (per entry) → Registry
//!                  ↓                   ↓
//!               Reflow        Dispatch (defaults ← extend ← override ← entry)
//! ```
//!
//! # Example
//!
//! ```
//! use errati_core::{Args, Dictionary, DictionaryParser, EntryFields, ParserOptions, Registry};
//!
//! let dictionary = Dictionary::keyed()
//!     .with_entry("101", "Error one")
//!     .with_entry("102", EntryFields::new().with("name", "Error two"));
//!
//! let mut registry = Registry::new();
//! DictionaryParser::new(ParserOptions::default())
//!     .parse(&mut registry, dictionary)
//!     .unwrap();
//!
//! let error = registry.create("ErrorOne", Args::message("disk on fire")).unwrap();
//! assert_eq!(error.to_string(), "Error one: disk on fire");
//! assert_eq!(error.get("code").and_then(|v| v.as_str()), Some("101"));
//! ```

pub mod args;
pub mod behavior;
pub mod dictionary;
pub mod error;
pub mod error_type;
pub mod fields;
pub mod methods;
pub mod parser;
pub mod reflow;
pub mod registry;

pub use args::Args;
pub use behavior::Filter;
pub use dictionary::{Dictionary, EntryFields, Payload};
pub use error::ErratiError;
pub use error_type::{ErrorInstance, ErrorType, NativeError};
pub use fields::{AliasSpec, FieldConfig, IndexField};
pub use methods::{Dispatch, MethodTable};
pub use parser::{DictionaryParser, ParserOptions, Scope};
pub use reflow::Reflow;
pub use registry::{Registry, Visit};

/// Field receiving the natural index of an entry unless configured otherwise
pub const DEFAULT_INDEX_FIELD: &str = "code";

/// Field receiving a bare string payload unless configured otherwise
pub const DEFAULT_VALUE_FIELD: &str = "name";

/// Name of a generated type whose entry carries no name
pub const DEFAULT_TYPE_NAME: &str = "Error";
