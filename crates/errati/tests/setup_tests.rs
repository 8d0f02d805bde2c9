//! Integration tests for the setup facade with bundled dictionaries and
//! config files under tests/fixtures.

use errati::{
    Args, Dictionary, EntryFields, Errati, ErratiError, MethodTable, NativeError, Scope,
    SetupError, SetupOptions,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

fn fixture(name: &str) -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    PathBuf::from(manifest_dir).join("tests").join("fixtures").join(name)
}

// =============================================================================
// Bundled Dictionary Tests
// =============================================================================

#[test]
fn test_default_setup_registers_http_short() {
    let mut errati = Errati::new();
    let registry = errati.setup(SetupOptions::new()).unwrap();

    assert_eq!(registry.count(None), 9);
    let aliases: Vec<&str> = registry.aliases().collect();
    assert_eq!(aliases[0], "BadRequest");
    assert_eq!(aliases[8], "PermissionDenied");

    let error = registry.create("NotFound", "missing page").unwrap();
    assert_eq!(error.get("code"), Some(&json!("404")));
    assert_eq!(error.get("name"), Some(&json!("Not Found")));
    assert_eq!(error.message(), Some("missing page"));
    assert_eq!(error.to_string(), "Not Found: missing page");
}

#[test]
fn test_full_dictionary_by_alias_name() {
    let mut errati = Errati::new();
    let registry = errati.setup(SetupOptions::new().bundled("full")).unwrap();

    assert!(registry.contains("Continue"));
    assert!(registry.contains("NetworkAuthenticationRequired"));
    assert!(registry.count(None) > 50);
}

#[test]
fn test_unknown_dictionary() {
    let mut errati = Errati::new();
    let err = errati
        .setup(SetupOptions::new().bundled("teapots"))
        .unwrap_err();

    assert!(matches!(err, SetupError::UnknownDictionary(ref n) if n == "teapots"));
    assert_eq!(err.to_string(), "Unknown dictionary: teapots");
    assert!(errati.registry().is_empty());
}

// =============================================================================
// Accumulation Tests
// =============================================================================

#[test]
fn test_custom_dictionary_accumulates_with_extend() {
    let mut errati = Errati::new();
    errati.setup(SetupOptions::new()).unwrap();

    let storage = Dictionary::keyed()
        .with_entry("1001", "Disk Storage Full")
        .with_entry(
            "1002",
            EntryFields::new()
                .with("name", "Disk Storage Offline")
                .with("retryable", true),
        );
    let methods = MethodTable::new()
        .with_init(|e| {
            e.set("officialVersion", "1.0.0");
            Ok(())
        })
        .with_method("describe", |e, _| {
            let team = e.get("team").and_then(|v| v.as_str()).unwrap_or("?");
            Ok(json!(format!("[{}] {}", team, e.name())))
        });

    let registry = errati
        .setup(
            SetupOptions::new()
                .dictionary(storage)
                .extend(Scope::new().with_value("team", "storage"))
                .extend_methods(methods),
        )
        .unwrap();

    assert_eq!(registry.count(None), 11);
    assert!(registry.contains("BadRequest"));

    let error = registry.create("DiskStorageOffline", ()).unwrap();
    assert_eq!(error.get("officialVersion"), Some(&json!("1.0.0")));
    assert_eq!(error.get("retryable"), Some(&json!(true)));
    assert_eq!(error.get("team"), Some(&json!("storage")));
    assert_eq!(
        error.call("describe", &[]).unwrap(),
        json!("[storage] Disk Storage Offline")
    );

    // Earlier types are untouched by later extend scopes
    let http = registry.create("BadRequest", ()).unwrap();
    assert!(http.get("officialVersion").is_none());
    assert!(!http.responds_to("describe"));
}

#[test]
fn test_conflicting_run_keeps_entries_before_conflict() {
    let mut errati = Errati::new();
    errati.setup(SetupOptions::new()).unwrap();

    let dictionary = Dictionary::keyed()
        .with_entry("900", "Fresh Error")
        .with_entry("901", "Not Found")
        .with_entry("902", "Never Reached");
    let err = errati
        .setup(SetupOptions::new().dictionary(dictionary))
        .unwrap_err();

    assert!(matches!(
        err,
        SetupError::Core(ErratiError::AliasConflict { ref alias }) if alias == "NotFound"
    ));
    assert_eq!(err.to_string(), "Error with index already exists: NotFound");
    let registry = errati.registry();
    assert!(registry.contains("FreshError"));
    assert!(!registry.contains("NeverReached"));
    assert_eq!(registry.get("NotFound").unwrap().get("code"), Some(&json!("404")));
}

#[test]
fn test_dispose_allows_reparse() {
    let mut errati = Errati::new();
    errati.setup(SetupOptions::new()).unwrap();
    let before = Arc::clone(errati.registry().get("Forbidden").unwrap());

    errati.dispose().setup(SetupOptions::new()).unwrap();
    let after = errati.registry().get("Forbidden").unwrap();

    assert_eq!(errati.registry().count(None), 9);
    assert!(!Arc::ptr_eq(&before, after));
}

#[test]
fn test_setup_attaches_facade_functions() {
    let mut errati = Errati::new();
    errati.dispose();
    errati
        .setup(SetupOptions::new().errati_method("test", |_, _| Ok(json!("value"))))
        .unwrap();

    assert_eq!(errati.call("test", &[]).unwrap(), json!("value"));
    assert!(errati.responds_to("test"));
    assert_eq!(errati.registry().count(None), 9);

    // Facade functions outlive the registry contents
    errati.dispose();
    assert_eq!(errati.call("test", &[]).unwrap(), json!("value"));
}

#[test]
fn test_facade_function_sees_registry() {
    let mut errati = Errati::new().with_method("aliases", |registry, args| {
        let prefix = args.first().and_then(|v| v.as_str());
        Ok(json!(registry.count(prefix)))
    });
    errati.setup(SetupOptions::new()).unwrap();

    assert_eq!(errati.call("aliases", &[]).unwrap(), json!(9));
    assert_eq!(errati.call("aliases", &[json!("Not")]).unwrap(), json!(2));
    assert!(errati.call("unknown", &[]).is_err());
}

// =============================================================================
// Config File Tests
// =============================================================================

#[test]
fn test_yaml_config_with_prefixed_code_aliases() {
    let mut errati = Errati::new();
    let registry = errati
        .setup_from_file(fixture("disk_storage.yaml"))
        .unwrap();

    assert_eq!(
        registry.aliases().collect::<Vec<_>>(),
        vec!["DiskFull", "disk_1001", "DiskOffline", "disk_1002"]
    );

    let error = registry.create("disk_1002", Args::message("array degraded")).unwrap();
    assert_eq!(error.kind(), "1002");
    assert_eq!(error.name(), "Disk Offline");
    assert_eq!(error.get("severity"), Some(&json!("high")));
    assert_eq!(error.get("component"), Some(&json!("storage")));
    assert!(error.is(registry.get("DiskOffline").unwrap()));
    assert!(error
        .stack()
        .unwrap()
        .starts_with("Error: Disk Offline. \"array degraded\""));
}

#[test]
fn test_json_sequence_config() {
    let mut errati = Errati::new();
    let registry = errati.setup_from_file(fixture("sequence.json")).unwrap();

    assert_eq!(
        registry.aliases().collect::<Vec<_>>(),
        vec!["First_failure", "Second_failure"]
    );

    let first = registry.create("First_failure", ()).unwrap();
    assert_eq!(first.get("position"), Some(&json!("0")));
    // Override values live on the type, not on instances
    assert!(first.get("origin").is_none());
    assert_eq!(
        registry.get("First_failure").unwrap().get("origin"),
        Some(&json!("batch"))
    );

    let second = registry.create("Second_failure", ()).unwrap();
    assert_eq!(second.get("position"), Some(&json!("1")));
    assert_eq!(second.get("retry"), Some(&json!(true)));
}

#[test]
fn test_broken_config_file() {
    let mut errati = Errati::new();
    let err = errati.setup_from_file(fixture("broken.yaml")).unwrap_err();
    assert!(matches!(err, SetupError::Config(ref m) if m.starts_with("invalid YAML")));
}

#[test]
fn test_missing_config_file() {
    let mut errati = Errati::new();
    let err = errati.setup_from_file(fixture("absent.yaml")).unwrap_err();
    assert!(matches!(err, SetupError::Io { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}
