//! End-to-end runs of the pipeline with the binder host on real files.

use std::fs;
use std::path::{Path, PathBuf};
use tsr::{
    BinderHost, Observers, Pipeline, PipelineState, TransformEvent, TransformOptions,
    TransformOutcome,
};

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(&path, text).expect("write source");
    path
}

fn options_with_out_dir() -> TransformOptions {
    let mut options = TransformOptions::default();
    options.compiler_options.out_dir = Some("dist".to_string());
    options
}

/// Run the pipeline and return the outcome with the names of the events seen.
fn run(entry: &Path, options: TransformOptions) -> (TransformOutcome, Vec<&'static str>) {
    let host = BinderHost::new();
    let mut events = Vec::new();
    let mut record = |event: &TransformEvent| events.push(event.name());
    let outcome = {
        let mut observers = Observers::new();
        observers.register(&mut record);
        Pipeline::new(&host, options)
            .transform(entry, &mut observers)
            .expect("transform")
    };
    (outcome, events)
}

#[test]
fn test_emits_checked_javascript_for_every_unit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let entry = write(
        dir.path(),
        "main.ts",
        "import { double } from \"./math\";\nlet total: number = double(2);\ntotal = double(total);\n",
    );
    write(
        dir.path(),
        "math.ts",
        "export function double(n: number): number {\n    return n * 2;\n}\n",
    );

    let (outcome, events) = run(&entry, options_with_out_dir());
    assert_eq!(outcome.state, PipelineState::Done, "{:?}", outcome.diagnostics);
    assert_eq!(events, vec!["start", "transform", "cleanup", "end"]);
    assert_eq!(outcome.emitted.len(), 2);
    assert!(outcome.declarations_file.is_none());

    let main = fs::read_to_string(dir.path().join("dist").join("main.js")).expect("main.js");
    assert!(main.contains("import t from \"ts-runtime/lib\";"), "{main}");
    assert!(main.contains("_totalType.assert(double(2))"), "{main}");
    assert!(main.contains("total = _totalType.assert(double(total));"), "{main}");
    assert!(!main.contains(": number"), "{main}");

    let math = fs::read_to_string(dir.path().join("dist").join("math.js")).expect("math.js");
    assert!(math.contains("t.param(\"n\", _nType).assert(n);"), "{math}");
    assert!(math.contains("return _returnType.assert(n * 2);"), "{math}");
    assert!(math.contains("t.annotate(double, "), "{math}");

    assert!(!dir.path().join(".tsr").exists());
}

#[test]
fn test_input_diagnostics_abort_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let entry = write(dir.path(), "main.ts", "let a: number = missing;\n");

    let (outcome, events) = run(&entry, options_with_out_dir());
    assert_eq!(outcome.state, PipelineState::Aborted);
    assert_eq!(events, vec!["start", "diagnostics", "stop"]);
    let codes: Vec<u32> = outcome.diagnostics.iter().map(|diag| diag.code).collect();
    assert_eq!(codes, vec![2304]);
    assert_eq!(outcome.diagnostics[0].file, "main.ts");
    assert!(outcome.emitted.is_empty());
    assert!(!dir.path().join("dist").exists());
    assert!(!dir.path().join(".tsr").exists());
}

#[test]
fn test_force_continues_past_diagnostics() {
    let dir = tempfile::tempdir().expect("tempdir");
    let entry = write(dir.path(), "main.ts", "let a: number = missing;\n");

    let mut options = options_with_out_dir();
    options.force = true;
    let (outcome, events) = run(&entry, options);
    assert_eq!(outcome.state, PipelineState::Done);
    assert_eq!(events.first(), Some(&"start"));
    assert!(events.contains(&"diagnostics"));
    assert_eq!(events.last(), Some(&"end"));

    let main = fs::read_to_string(dir.path().join("dist").join("main.js")).expect("main.js");
    assert!(main.contains("_aType.assert(missing)"), "{main}");
}

#[test]
fn test_merged_interfaces_are_written_to_the_declarations_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let entry = write(
        dir.path(),
        "main.ts",
        "interface Point { x: number; }\ninterface Point { y: number; }\nlet p: Point = { x: 1, y: 2 };\n",
    );

    let (outcome, _) = run(&entry, options_with_out_dir());
    assert_eq!(outcome.state, PipelineState::Done, "{:?}", outcome.diagnostics);
    let declarations = outcome.declarations_file.expect("declarations file");
    assert_eq!(declarations, dir.path().join("dist").join("tsr-declarations.js"));

    let text = fs::read_to_string(&declarations).expect("declarations");
    assert!(text.starts_with("import t from \"ts-runtime/lib\";\n\n"), "{text}");
    assert_eq!(text.matches("t.declare(").count(), 1, "{text}");
    assert!(text.contains("t.declare(t.type(\"Point\", "), "{text}");
    assert!(text.contains("t.property(\"x\", t.number())"), "{text}");
    assert!(text.contains("t.property(\"y\", t.number())"), "{text}");

    let main = fs::read_to_string(dir.path().join("dist").join("main.js")).expect("main.js");
    assert_eq!(main.matches("const Point = ").count(), 1, "{main}");
    assert!(!main.contains("interface"), "{main}");
}

#[test]
fn test_interface_split_across_scripts_is_bound_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let entry = write(dir.path(), "main.ts", "import \"./a\";\nimport \"./b\";\n");
    write(dir.path(), "a.ts", "interface A { a: number; }\n");
    write(
        dir.path(),
        "b.ts",
        "interface A { b: string; }\nlet v: A = { a: 1, b: \"x\" };\n",
    );

    let (outcome, _) = run(&entry, options_with_out_dir());
    assert_eq!(outcome.state, PipelineState::Done, "{:?}", outcome.diagnostics);

    let a = fs::read_to_string(dir.path().join("dist").join("a.js")).expect("a.js");
    assert_eq!(a.matches("const A = ").count(), 1, "{a}");
    assert!(a.contains("t.property(\"a\", t.number())"), "{a}");
    assert!(a.contains("t.property(\"b\", t.string())"), "{a}");

    let b = fs::read_to_string(dir.path().join("dist").join("b.js")).expect("b.js");
    assert!(!b.contains("const A = "), "{b}");
    assert!(!b.contains("interface"), "{b}");
    // The binding lives in a.js.
    assert!(b.contains("t.tdz(() => A, \"A\")"), "{b}");
}

#[test]
fn test_keep_temp_files_leaves_the_mutated_sources() {
    let dir = tempfile::tempdir().expect("tempdir");
    let entry = write(dir.path(), "main.ts", "let a: number = 1;\n");

    let mut options = options_with_out_dir();
    options.keep_temp_files = true;
    options.temp_folder_name = ".work".to_string();
    let (outcome, _) = run(&entry, options);
    assert_eq!(outcome.state, PipelineState::Done);

    let kept = fs::read_to_string(dir.path().join(".work").join("main.ts")).expect("kept");
    assert!(
        kept.contains("let _aType = t.number(), a: number = _aType.assert(1);"),
        "{kept}"
    );
}

#[test]
fn test_unannotated_program_is_emitted_without_runtime_import() {
    let dir = tempfile::tempdir().expect("tempdir");
    let entry = write(dir.path(), "main.ts", "let a = 1;\na = a + 1;\n");

    let (outcome, _) = run(&entry, TransformOptions::default());
    assert_eq!(outcome.state, PipelineState::Done);
    assert_eq!(outcome.emitted, vec![dir.path().join("main.js")]);
    let main = fs::read_to_string(dir.path().join("main.js")).expect("main.js");
    assert!(!main.contains("ts-runtime/lib"), "{main}");
}

#[test]
fn test_missing_entry_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (outcome, _) = run(&dir.path().join("absent.ts"), TransformOptions::default());
    assert_eq!(outcome.state, PipelineState::Aborted);
    let codes: Vec<u32> = outcome.diagnostics.iter().map(|diag| diag.code).collect();
    assert_eq!(codes, vec![6053]);
}
