//! Tests for the temp workspace.

use crate::error::TransformError;
use crate::workspace::TempWorkspace;
use std::fs;

#[test]
fn test_temp_paths_mirror_the_base_layout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workspace = TempWorkspace::new(dir.path(), ".tsr");
    let source = dir.path().join("src").join("a.ts");
    let target = workspace.temp_path_for(&source).expect("inside base");
    assert_eq!(target, dir.path().join(".tsr").join("src").join("a.ts"));
}

#[test]
fn test_files_outside_the_base_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path().join("project");
    let workspace = TempWorkspace::new(&base, ".tsr");
    let outside = dir.path().join("other").join("b.ts");
    match workspace.temp_path_for(&outside) {
        Err(TransformError::OutsideRoot { path, root }) => {
            assert_eq!(path, outside);
            assert_eq!(root, base);
        }
        other => panic!("expected OutsideRoot, got {other:?}"),
    }
}

#[test]
fn test_write_copy_and_remove() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workspace = TempWorkspace::new(dir.path(), ".tsr");
    let declaration = dir.path().join("types.d.ts");
    fs::write(&declaration, "declare const x: number;\n").expect("write source");

    let written = workspace
        .write(&dir.path().join("nested").join("a.ts"), "let a = 1;\n")
        .expect("write");
    assert_eq!(fs::read_to_string(&written).expect("read"), "let a = 1;\n");
    workspace.rewrite(&written, "let a = 2;\n").expect("rewrite");
    assert_eq!(fs::read_to_string(&written).expect("read"), "let a = 2;\n");

    let copied = workspace.copy(&declaration).expect("copy");
    assert_eq!(
        fs::read_to_string(copied).expect("read"),
        "declare const x: number;\n"
    );

    workspace.remove().expect("remove");
    assert!(!workspace.root().exists());
    workspace.remove().expect("removing twice is fine");
}

#[test]
fn test_rewrite_outside_the_workspace_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workspace = TempWorkspace::new(dir.path(), ".tsr");
    let result = workspace.rewrite(&dir.path().join("a.ts"), "");
    assert!(matches!(result, Err(TransformError::OutsideRoot { .. })));
}

#[test]
fn test_normalize_path_resolves_dot_components() {
    let path = std::path::Path::new("/project/src/../lib/./a.ts");
    assert_eq!(
        crate::workspace::normalize_path(path),
        std::path::PathBuf::from("/project/lib/a.ts")
    );
}
