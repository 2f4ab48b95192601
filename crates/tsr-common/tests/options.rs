use tsr_common::{CompilerOptions, TransformOptions};

#[test]
fn test_defaults_match_documented_values() {
    let options = TransformOptions::default();
    assert!(options.annotate);
    assert!(!options.force);
    assert!(!options.keep_temp_files);
    assert_eq!(options.lib_identifier, "t");
    assert_eq!(options.lib_namespace, "_");
    assert_eq!(options.declaration_prefix, "_");
    assert_eq!(options.temp_folder_name, ".tsr");
    assert_eq!(options.declaration_file(), "tsr-declarations.js");
    assert!(options.compiler_options.strict_null_checks());
}

#[test]
fn test_partial_json_keeps_defaults() {
    let options: TransformOptions = serde_json::from_str(
        r#"{ "force": true, "libIdentifier": "rt", "compilerOptions": { "strictNullChecks": "false" } }"#,
    )
    .expect("valid options");
    assert!(options.force);
    assert!(options.continue_on_diagnostics());
    assert_eq!(options.lib_identifier, "rt");
    assert_eq!(options.temp_folder_name, ".tsr");
    assert!(!options.compiler_options.strict_null_checks());
    assert_eq!(options.compiler_options.target.as_deref(), Some("es2015"));
}

#[test]
fn test_unknown_compiler_options_are_passed_through() {
    let options: CompilerOptions =
        serde_json::from_str(r#"{ "jsx": "react", "noImplicitAny": true }"#).expect("valid");
    assert_eq!(
        options.extra.get("jsx").and_then(|v| v.as_str()),
        Some("react")
    );
    let round_trip = serde_json::to_value(&options).expect("serializable");
    assert_eq!(round_trip["noImplicitAny"], serde_json::Value::Bool(true));
}

#[test]
fn test_invalid_boolean_string_is_rejected() {
    let result: Result<CompilerOptions, _> =
        serde_json::from_str(r#"{ "strictNullChecks": "maybe" }"#);
    assert!(result.is_err());
}
