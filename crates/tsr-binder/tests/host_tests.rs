//! Host tests: program creation, emit diagnostics and JavaScript output.

use std::fs;
use tsr_binder::BinderHost;
use tsr_common::CompilerOptions;
use tsr_core::SemanticHost;

#[test]
fn test_emit_writes_javascript_mirroring_the_root_layout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("util")).expect("dirs");
    fs::write(
        src.join("main.ts"),
        "import { twice } from \"./util/math\";\ninterface P { x: number; }\nconst n: number = twice(2);\n",
    )
    .expect("write main");
    fs::write(
        src.join("util").join("math.ts"),
        "export function twice(n: number): number {\n    return n * 2;\n}\n",
    )
    .expect("write math");
    fs::write(src.join("types.d.ts"), "declare const version: string;\n").expect("write d.ts");

    let host = BinderHost::new();
    let mut options = CompilerOptions::default();
    options.root_dir = Some(src.display().to_string());
    let program = host.create_program(&[src.join("main.ts"), src.join("types.d.ts")], &options);
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());
    assert!(host.emit_diagnostics(program.as_ref()).is_empty());

    let out = dir.path().join("dist");
    let written = host.emit(program.as_ref(), &src, &out).expect("emit");
    assert_eq!(written.len(), 2);

    let main = fs::read_to_string(out.join("main.js")).expect("main.js");
    assert!(main.contains("import { twice } from \"./util/math\";"), "{main}");
    assert!(main.contains("const n = twice(2);"), "{main}");
    assert!(!main.contains("interface"), "{main}");

    let math = fs::read_to_string(out.join("util").join("math.js")).expect("math.js");
    assert!(math.contains("export function twice(n) {"), "{math}");
    assert!(!out.join("types.js").exists());
}

#[test]
fn test_emit_diagnostics_are_syntactic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("broken.ts");
    fs::write(&file, "let a: number = unknownName;\nlet b = (1;\n").expect("write");

    let host = BinderHost::new();
    let program = host.create_program(&[file], &CompilerOptions::default());
    let semantic = program.diagnostics();
    let syntactic = host.emit_diagnostics(program.as_ref());
    assert!(!syntactic.is_empty());
    assert!(syntactic.len() < semantic.len(), "{semantic:?}");
    assert!(syntactic.iter().all(|diag| diag.code < 2000), "{syntactic:?}");
}
