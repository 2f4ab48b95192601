use clap::Parser;
use std::path::Path;

use super::args::{CliArgs, ColorChoice, Module, Target};

#[test]
fn parses_defaults() {
    let args = CliArgs::try_parse_from(["tsr", "src/index.ts"]).expect("default args should parse");

    assert_eq!(args.entry, Path::new("src/index.ts"));
    assert!(args.config.is_none());
    assert!(!args.force);
    assert!(!args.keep_temp);
    assert!(!args.no_annotate);
    assert_eq!(args.color, ColorChoice::Auto);
    assert_eq!(args.target, None);
    assert_eq!(args.strict_null_checks, None);
}

#[test]
fn parses_common_flags() {
    let args = CliArgs::try_parse_from([
        "tsr",
        "--config",
        "tsr.json",
        "--force",
        "--keepTemp",
        "--noAnnotate",
        "--libIdentifier",
        "rt",
        "--outDir",
        "dist",
        "--target",
        "ES6",
        "--module",
        "commonjs",
        "--strictNullChecks",
        "false",
        "--color",
        "never",
        "main.ts",
    ])
    .expect("flagged args should parse");

    assert_eq!(args.config.as_deref(), Some(Path::new("tsr.json")));
    assert!(args.force);
    assert!(args.keep_temp);
    assert!(args.no_annotate);
    assert_eq!(args.lib_identifier.as_deref(), Some("rt"));
    assert_eq!(args.out_dir.as_deref(), Some("dist"));
    assert_eq!(args.target, Some(Target::Es2015));
    assert_eq!(args.module, Some(Module::CommonJs));
    assert_eq!(args.strict_null_checks, Some(false));
    assert_eq!(args.color, ColorChoice::Never);
}

#[test]
fn accepts_kebab_case_aliases() {
    let args = CliArgs::try_parse_from([
        "tsr",
        "--keep-temp",
        "--temp-folder",
        ".work",
        "--lib-module",
        "my-runtime",
        "a.ts",
    ])
    .expect("aliases should parse");

    assert!(args.keep_temp);
    assert_eq!(args.temp_folder.as_deref(), Some(".work"));
    assert_eq!(args.lib_module.as_deref(), Some("my-runtime"));
}

#[test]
fn requires_entry_file() {
    assert!(CliArgs::try_parse_from(["tsr", "--force"]).is_err());
}

#[test]
fn rejects_unknown_target() {
    assert!(CliArgs::try_parse_from(["tsr", "--target", "es1999", "a.ts"]).is_err());
}

#[test]
fn option_spellings_are_lowercase() {
    assert_eq!(Target::EsNext.as_str(), "esnext");
    assert_eq!(Module::Es2015.as_str(), "es2015");
}
