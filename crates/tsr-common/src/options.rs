//! Run configuration.
//!
//! `TransformOptions` is read once at the start of a run and never mutated
//! afterwards. `CompilerOptions` is handed to the semantic analysis facility
//! as-is; keys this crate does not know about are preserved in `extra`.

use serde::{Deserialize, Deserializer, Serialize};

/// Accept both `true` and `"true"` for boolean options.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
    pub target: Option<String>,
    pub module: Option<String>,
    pub module_resolution: Option<String>,
    pub lib: Option<Vec<String>>,
    pub root_dir: Option<String>,
    pub out_dir: Option<String>,
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub strict_null_checks: Option<bool>,
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub experimental_decorators: Option<bool>,
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub source_map: Option<bool>,
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub remove_comments: Option<bool>,
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub preserve_const_enums: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            target: Some("es2015".to_string()),
            module: Some("es2015".to_string()),
            module_resolution: Some("node".to_string()),
            lib: Some(vec!["es2015".to_string()]),
            root_dir: None,
            out_dir: None,
            strict_null_checks: Some(true),
            experimental_decorators: Some(true),
            source_map: Some(false),
            remove_comments: Some(true),
            preserve_const_enums: Some(true),
            extra: serde_json::Map::new(),
        }
    }
}

impl CompilerOptions {
    pub fn strict_null_checks(&self) -> bool {
        self.strict_null_checks.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
    /// Emit `annotate` calls that attach descriptors to functions and classes.
    pub annotate: bool,
    pub compiler_options: CompilerOptions,
    /// Prefix of synthesized descriptor bindings (`_xType`).
    pub declaration_prefix: String,
    /// Base name of the aggregated declarations artifact, without extension.
    pub declaration_file_name: String,
    pub finish_on_error: bool,
    pub force: bool,
    pub keep_temp_files: bool,
    /// Identifier the generated code binds the runtime library to.
    pub lib_identifier: String,
    /// Prefix used to escape `lib_identifier` when the unit already uses it.
    pub lib_namespace: String,
    /// Module specifier the runtime library is imported from.
    pub lib_module: String,
    pub log: bool,
    pub temp_folder_name: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            annotate: true,
            compiler_options: CompilerOptions::default(),
            declaration_prefix: "_".to_string(),
            declaration_file_name: "tsr-declarations".to_string(),
            finish_on_error: false,
            force: false,
            keep_temp_files: false,
            lib_identifier: "t".to_string(),
            lib_namespace: "_".to_string(),
            lib_module: "ts-runtime/lib".to_string(),
            log: true,
            temp_folder_name: ".tsr".to_string(),
        }
    }
}

impl TransformOptions {
    /// Whether a run continues past pre- or post-transform diagnostics.
    pub fn continue_on_diagnostics(&self) -> bool {
        self.force || self.finish_on_error
    }

    /// File name of the declarations artifact, extension included.
    pub fn declaration_file(&self) -> String {
        format!("{}.js", self.declaration_file_name)
    }
}
