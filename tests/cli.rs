//! The command-line driver: option files, printed output and exit codes.

use clap::Parser;
use std::fs;
use tsr::PipelineState;
use tsr::cli::args::CliArgs;
use tsr::cli::driver::{self, EXIT_ABORTED, EXIT_SUCCESS};
use tsr::cli::config::resolve_options;

#[test]
fn test_driver_prints_diagnostics_with_source_positions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let entry = dir.path().join("main.ts");
    fs::write(&entry, "let a: number = missing;\n").expect("write");

    let mut out = Vec::new();
    let outcome = driver::transform(&entry, Default::default(), &mut out, false).expect("run");
    assert_eq!(outcome.state, PipelineState::Aborted);

    let out = String::from_utf8(out).expect("utf8");
    assert!(
        out.contains("main.ts:1:17 - error TS2304: Cannot find name 'missing'."),
        "{out}"
    );
    assert!(out.contains("Found 1 error(s)."), "{out}");
    assert!(out.trim_end().ends_with("Stopped"), "{out}");
}

#[test]
fn test_quiet_runs_print_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let entry = dir.path().join("main.ts");
    fs::write(&entry, "let a: number = 1;\n").expect("write");

    let entry_arg = entry.display().to_string();
    let args = CliArgs::try_parse_from(["tsr", "-q", entry_arg.as_str()]).expect("args");
    let options = resolve_options(&args).expect("options");

    let mut out = Vec::new();
    let outcome = driver::transform(&entry, options, &mut out, false).expect("run");
    assert_eq!(outcome.state, PipelineState::Done);
    assert!(out.is_empty());
    assert!(dir.path().join("main.js").exists());
}

#[test]
fn test_exit_codes_follow_the_outcome() {
    let dir = tempfile::tempdir().expect("tempdir");
    let good = dir.path().join("good.ts");
    let bad = dir.path().join("bad.ts");
    fs::write(&good, "let a: number = 1;\n").expect("write");
    fs::write(&bad, "let a: number = missing;\n").expect("write");

    let run = |entry: &std::path::Path| {
        let entry_arg = entry.display().to_string();
        let args = CliArgs::try_parse_from([
            "tsr",
            "--quiet",
            "--outDir",
            "out",
            entry_arg.as_str(),
        ])
        .expect("args");
        driver::run(&args).expect("run")
    };
    assert_eq!(run(&good), EXIT_SUCCESS);
    assert_eq!(run(&bad), EXIT_ABORTED);
    assert!(dir.path().join("out").join("good.js").exists());
    assert!(!dir.path().join("out").join("bad.js").exists());
}

#[test]
fn test_config_file_drives_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let entry = dir.path().join("main.ts");
    fs::write(&entry, "let a: number = 1;\n").expect("write");
    let config = dir.path().join("tsr.json");
    fs::write(
        &config,
        r#"{ "log": false, "libIdentifier": "rt", "compilerOptions": { "outDir": "build" } }"#,
    )
    .expect("write config");

    let entry_arg = entry.display().to_string();
    let config_arg = config.display().to_string();
    let args = CliArgs::try_parse_from(["tsr", "--config", config_arg.as_str(), entry_arg.as_str()])
        .expect("args");
    assert_eq!(driver::run(&args).expect("run"), EXIT_SUCCESS);

    let main = fs::read_to_string(dir.path().join("build").join("main.js")).expect("main.js");
    assert!(main.contains("import rt from \"ts-runtime/lib\";"), "{main}");
    assert!(main.contains("rt.number()"), "{main}");
}

#[test]
fn test_invalid_target_in_config_aborts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let entry = dir.path().join("main.ts");
    fs::write(&entry, "let a = 1;\n").expect("write");
    let config = dir.path().join("tsr.json");
    fs::write(&config, r#"{ "compilerOptions": { "target": "es1999" } }"#).expect("write");

    let entry_arg = entry.display().to_string();
    let config_arg = config.display().to_string();
    let args = CliArgs::try_parse_from([
        "tsr",
        "-q",
        "--config",
        config_arg.as_str(),
        entry_arg.as_str(),
    ])
    .expect("args");
    assert_eq!(driver::run(&args).expect("run"), EXIT_ABORTED);
}

#[test]
fn test_unreadable_config_is_an_error() {
    let args = CliArgs::try_parse_from(["tsr", "--config", "/nonexistent/tsr.json", "main.ts"])
        .expect("args");
    let err = driver::run(&args).expect_err("missing config");
    assert!(format!("{err:#}").contains("failed to read options file"), "{err:#}");
}
