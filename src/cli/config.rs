//! Loading transform options and applying CLI overrides.

use anyhow::{Context, Result};
use std::path::Path;
use tsr_common::TransformOptions;

use super::args::CliArgs;

/// Parse a JSON options document. Missing keys take their defaults;
/// unknown `compilerOptions` keys are kept.
pub fn parse_options(source: &str) -> Result<TransformOptions> {
    let options = serde_json::from_str(source).context("failed to parse options JSON")?;
    Ok(options)
}

pub fn load_options(path: &Path) -> Result<TransformOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options file: {}", path.display()))?;
    parse_options(&source)
        .with_context(|| format!("failed to parse options file: {}", path.display()))
}

/// Options of a run: the `--config` file (or defaults) with flags applied.
pub fn resolve_options(args: &CliArgs) -> Result<TransformOptions> {
    let mut options = match args.config.as_deref() {
        Some(path) => load_options(path)?,
        None => TransformOptions::default(),
    };
    apply_args(&mut options, args);
    Ok(options)
}

/// Flags that were given win over the loaded values.
pub fn apply_args(options: &mut TransformOptions, args: &CliArgs) {
    if args.force {
        options.force = true;
    }
    if args.finish_on_error {
        options.finish_on_error = true;
    }
    if args.keep_temp {
        options.keep_temp_files = true;
    }
    if args.no_annotate {
        options.annotate = false;
    }
    if args.quiet {
        options.log = false;
    }
    if let Some(name) = &args.temp_folder {
        options.temp_folder_name = name.clone();
    }
    if let Some(prefix) = &args.declaration_prefix {
        options.declaration_prefix = prefix.clone();
    }
    if let Some(name) = &args.declaration_file_name {
        options.declaration_file_name = name.clone();
    }
    if let Some(ident) = &args.lib_identifier {
        options.lib_identifier = ident.clone();
    }
    if let Some(namespace) = &args.lib_namespace {
        options.lib_namespace = namespace.clone();
    }
    if let Some(module) = &args.lib_module {
        options.lib_module = module.clone();
    }

    let compiler = &mut options.compiler_options;
    if let Some(out_dir) = &args.out_dir {
        compiler.out_dir = Some(out_dir.clone());
    }
    if let Some(target) = args.target {
        compiler.target = Some(target.as_str().to_string());
    }
    if let Some(module) = args.module {
        compiler.module = Some(module.as_str().to_string());
    }
    if let Some(strict) = args.strict_null_checks {
        compiler.strict_null_checks = Some(strict);
    }
}
