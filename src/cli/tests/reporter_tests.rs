use std::fs;
use std::path::PathBuf;

use super::reporter::{EventPrinter, Reporter, line_and_column};
use tsr_common::diagnostics::diagnostic_messages;
use tsr_common::{Diagnostic, TransformEvent, TransformObserver};

#[test]
fn line_and_column_are_one_based() {
    let source = "let a = 1;\nlet b = c;\n";
    assert_eq!(line_and_column(source, 0), (1, 1));
    assert_eq!(line_and_column(source, 19), (2, 9));
    assert_eq!(line_and_column(source, 500), (3, 1));
}

#[test]
fn formats_location_code_and_snippet() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("main.ts"), "let a = 1;\nlet b = c;\n").expect("write");

    let mut reporter = Reporter::new(false, dir.path());
    let diag = Diagnostic::error("main.ts", 19, 1, "Cannot find name 'c'.", 2304);
    let text = reporter.format_diagnostic(&diag);

    assert!(
        text.starts_with("main.ts:2:9 - error TS2304: Cannot find name 'c'."),
        "{text}"
    );
    assert!(text.contains("    2   let b = c;"), "{text}");
    assert!(text.ends_with("        ~"), "{text}");
}

#[test]
fn global_diagnostics_have_no_location() {
    let mut reporter = Reporter::new(false, PathBuf::from("/nonexistent"));
    let diag = Diagnostic::global(&diagnostic_messages::FILE_NOT_FOUND, &["/x/main.ts"]);
    let text = reporter.format_diagnostic(&diag);
    assert!(text.starts_with("<global> - error TS6053: "), "{text}");
}

#[test]
fn unreadable_source_falls_back_to_file_name() {
    let mut reporter = Reporter::new(false, PathBuf::from("/nonexistent"));
    let diag = Diagnostic::error("gone.ts", 4, 2, "boom", 1005);
    assert_eq!(reporter.format_diagnostic(&diag), "gone.ts - error TS1005: boom");
}

#[test]
fn printer_reports_events_and_truncated_batches() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut printer = EventPrinter::new(Vec::new(), false, dir.path(), ".tsr");

    printer.notify(&TransformEvent::Start);
    let diags: Vec<Diagnostic> = (0..20)
        .map(|i| Diagnostic::error("main.ts", i, 1, "bad", 2304))
        .collect();
    printer.notify(&TransformEvent::diagnostics(&diags));
    printer.notify(&TransformEvent::Stop);

    let out = String::from_utf8(printer.into_inner()).expect("utf8");
    assert!(out.starts_with("Starting\n"), "{out}");
    assert!(out.contains("... and 5 more"), "{out}");
    assert!(out.contains("Found 20 error(s)."), "{out}");
    assert!(out.ends_with("Stopped\n"), "{out}");
}

#[test]
fn printer_reads_post_transform_sources_from_the_workspace() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("main.ts"), "original\n").expect("write");
    fs::create_dir_all(dir.path().join(".tsr")).expect("workspace");
    fs::write(dir.path().join(".tsr").join("main.ts"), "x\nrewritten\n").expect("write");

    let mut printer = EventPrinter::new(Vec::new(), false, dir.path(), ".tsr");
    printer.notify(&TransformEvent::Transform(vec![dir.path().join("main.ts")]));
    let diag = Diagnostic::error("main.ts", 2, 9, "broken", 1005);
    printer.notify(&TransformEvent::diagnostics(std::slice::from_ref(&diag)));

    let out = String::from_utf8(printer.into_inner()).expect("utf8");
    assert!(out.contains("Transforming 1 file(s)"), "{out}");
    assert!(out.contains("main.ts:2:1 - error TS1005: broken"), "{out}");
    assert!(out.contains("rewritten"), "{out}");
    assert!(!out.contains("original"), "{out}");
}
