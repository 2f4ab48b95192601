//! Binder tests: declarations, scopes, references and the model queries
//! built on them.

use std::fs;
use std::path::{Path, PathBuf};
use tsr_binder::Program;
use tsr_common::CompilerOptions;
use tsr_common::diagnostics::diagnostic_codes;
use tsr_core::{NodeRef, SemanticModel, SymbolFlags, UnitId};
use tsr_parser::fold::collect_descendants;
use tsr_parser::{Node, NodeKind};

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new(files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        for (name, text) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create dirs");
            }
            fs::write(path, text).expect("write fixture");
        }
        Fixture { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn program(&self, root: &str) -> Program {
        let mut options = CompilerOptions::default();
        options.root_dir = Some(self.dir.path().display().to_string());
        Program::new(&[self.path(root)], &options)
    }
}

fn single(source: &str) -> Program {
    let fixture = Fixture::new(&[("main.ts", source)]);
    fixture.program("main.ts")
}

fn nodes_of(program: &Program, unit: UnitId, kind: NodeKind) -> Vec<NodeRef> {
    let source = program.unit(unit);
    collect_descendants(&source.arena, source.root, |_, node| node.kind() == kind)
        .into_iter()
        .map(|node| NodeRef::new(unit, node))
        .collect()
}

fn identifiers_named(program: &Program, unit: UnitId, name: &str) -> Vec<NodeRef> {
    let source = program.unit(unit);
    collect_descendants(&source.arena, source.root, |_, node| {
        node.identifier_text() == Some(name)
    })
    .into_iter()
    .map(|node| NodeRef::new(unit, node))
    .collect()
}

fn codes(program: &Program) -> Vec<u32> {
    program.diagnostics().iter().map(|diag| diag.code).collect()
}

const MAIN: UnitId = UnitId(0);

// =============================================================================
// Declarations and scopes
// =============================================================================

#[test]
fn test_references_resolve_to_their_declaration() {
    let program = single("let x: number = 1;\nx = 2;\n");
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());
    let uses = identifiers_named(&program, MAIN, "x");
    assert_eq!(uses.len(), 2);
    let declaration = nodes_of(&program, MAIN, NodeKind::VariableDeclaration)[0];
    let symbol = program.symbol_at(declaration).expect("declared");
    assert_eq!(program.symbol_at(uses[1]), Some(symbol));
    assert!(program.symbol(symbol).has_any(SymbolFlags::BLOCK_SCOPED_VARIABLE));
}

#[test]
fn test_inner_scopes_shadow_outer_declarations() {
    let program = single("let a = 1;\nfunction f(a: string) {\n    return a;\n}\na;\n");
    let uses = identifiers_named(&program, MAIN, "a");
    // declaration, parameter, use inside f, use at top level
    assert_eq!(uses.len(), 4);
    let outer = program.symbol_at(uses[0]).expect("outer");
    let parameter = program.symbol_at(uses[1]).expect("parameter");
    assert_ne!(outer, parameter);
    assert_eq!(program.symbol_at(uses[2]), Some(parameter));
    assert_eq!(program.symbol_at(uses[3]), Some(outer));
}

#[test]
fn test_var_is_hoisted_to_the_function_scope() {
    let program = single("function f() {\n    {\n        var v = 1;\n    }\n    return v;\n}\n");
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());
}

#[test]
fn test_let_is_scoped_to_its_block() {
    let program = single("{\n    let b = 1;\n}\nb;\n");
    assert_eq!(codes(&program), vec![diagnostic_codes::CANNOT_FIND_NAME]);
}

#[test]
fn test_functions_are_visible_before_their_declaration() {
    let program = single("g();\nfunction g() { }\n");
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());
}

#[test]
fn test_block_scoped_redeclaration_is_reported() {
    let program = single("let a = 1;\nlet a = 2;\n");
    assert_eq!(
        codes(&program),
        vec![diagnostic_codes::CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE]
    );
}

#[test]
fn test_var_redeclaration_merges() {
    let program = single("var a = 1;\nvar a = 2;\n");
    assert!(program.diagnostics().is_empty());
    let declarations = nodes_of(&program, MAIN, NodeKind::VariableDeclaration);
    let symbol = program.symbol_at(declarations[0]).expect("declared");
    assert_eq!(program.symbol(symbol).declarations.len(), 2);
}

#[test]
fn test_interfaces_merge_and_types_coexist_with_values() {
    let program = single("interface A { a: number; }\ninterface A { b: string; }\nconst A = 1;\n");
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());
    let interfaces = nodes_of(&program, MAIN, NodeKind::InterfaceDeclaration);
    let symbol = program.symbol_at(interfaces[0]).expect("declared");
    assert_eq!(program.symbol_at(interfaces[1]), Some(symbol));
    assert_eq!(program.symbol(symbol).declarations.len(), 3);
    assert_eq!(program.declared_members(symbol).len(), 2);
}

#[test]
fn test_unknown_names_are_reported() {
    let program = single("let x: Missing = y;\n");
    let diagnostics = program.diagnostics();
    assert_eq!(diagnostics.len(), 2, "{diagnostics:?}");
    assert!(diagnostics[0].message_text.contains("'Missing'"));
    assert!(diagnostics[1].message_text.contains("'y'"));
    assert_eq!(diagnostics[0].file, "main.ts");
}

#[test]
fn test_properties_and_builtins_are_not_unknown_names() {
    let program = single(
        "const o = { a: 1, b };\nconst b = 2;\no.a;\nconsole.log(Math.max(1, 2));\nfunction f() { return arguments; }\n",
    );
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());
}

#[test]
fn test_type_parameters_resolve_inside_their_declaration() {
    let program = single("interface Box<T> { value: T; }\nfunction id<U>(u: U): U { return u; }\n");
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());
    let reference = nodes_of(&program, MAIN, NodeKind::TypeReference)[0];
    let symbol = program.symbol_at(reference).expect("resolved");
    assert!(program.symbol(symbol).has_any(SymbolFlags::TYPE_PARAMETER));
}

#[test]
fn test_catch_and_loop_bindings() {
    let program = single("for (const v of [1]) { v; }\ntry { } catch (e) { e; }\n");
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());
}

// =============================================================================
// Types and members
// =============================================================================

#[test]
fn test_type_at_reads_annotations() {
    let program = single("type Loose = any;\nlet a: number = 1;\nlet b: Loose = 2;\nlet c = 3;\na; b;\n");
    let declarations = nodes_of(&program, MAIN, NodeKind::VariableDeclaration);
    let a = program.type_at(declarations[0]).expect("annotated");
    assert_eq!(a.text, "number");
    assert!(!a.is_any);
    let b = program.type_at(declarations[1]).expect("annotated");
    assert!(b.is_any, "aliases of any are open");
    assert!(program.type_at(declarations[2]).is_none());

    let use_of_a = *identifiers_named(&program, MAIN, "a").last().expect("use");
    assert_eq!(program.type_at(use_of_a).map(|ty| ty.text), Some("number".to_string()));
}

#[test]
fn test_apparent_members_follow_extends() {
    let program = single(
        "interface Base { id: number; name: string; }\ninterface Derived extends Base { name: \"x\"; extra: boolean; }\n",
    );
    let derived = nodes_of(&program, MAIN, NodeKind::InterfaceDeclaration)[1];
    let symbol = program.symbol_at(derived).expect("declared");
    let names: Vec<String> = program
        .apparent_members(symbol)
        .into_iter()
        .filter_map(|member| {
            let node = program.node(member)?;
            let name = node.name()?;
            program
                .unit(member.unit)
                .arena
                .property_name_text(name)
                .map(str::to_string)
        })
        .collect();
    assert_eq!(names, vec!["name", "extra", "id"]);
}

#[test]
fn test_overload_implementations() {
    let program = single(
        "function f(a: string): string;\nfunction f(a: number): number;\nfunction f(a: any): any { return a; }\nfunction g(): void { }\nclass C {\n    m(): void;\n    m(): void { }\n}\n",
    );
    let functions = nodes_of(&program, MAIN, NodeKind::FunctionDeclaration);
    assert!(!program.is_implementation_of_overload(functions[0]));
    assert!(program.is_implementation_of_overload(functions[2]));
    assert!(!program.is_implementation_of_overload(functions[3]));
    let methods = nodes_of(&program, MAIN, NodeKind::MethodDeclaration);
    assert!(program.is_implementation_of_overload(methods[1]));
}

// =============================================================================
// Modules
// =============================================================================

#[test]
fn test_imports_follow_relative_specifiers() {
    let fixture = Fixture::new(&[
        ("main.ts", "import { Point as P } from \"./point\";\nlet p: P = { x: 1 };\n"),
        ("point.ts", "export interface Point { x: number; }\n"),
    ]);
    let program = fixture.program("main.ts");
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());
    assert_eq!(program.units().len(), 2);

    let reference = nodes_of(&program, MAIN, NodeKind::TypeReference)[0];
    let alias = program.symbol_at(reference).expect("alias");
    assert!(program.symbol(alias).has_any(SymbolFlags::ALIAS));
    let target = program.resolve_alias(alias);
    assert_ne!(target, alias);
    assert!(program.symbol(target).has_any(SymbolFlags::INTERFACE));
    assert_eq!(program.symbol(target).name, "Point");
}

#[test]
fn test_reexports_and_default_exports() {
    let fixture = Fixture::new(&[
        ("main.ts", "import Shape, { Size } from \"./lib/index\";\nlet s: Shape;\nlet n: Size;\n"),
        ("lib/index.ts", "export * from \"./size\";\nexport { Shape as default } from \"./shape\";\n"),
        ("lib/size.ts", "export type Size = number;\n"),
        ("lib/shape.ts", "interface Shape { w: number; }\nexport { Shape };\n"),
    ]);
    let program = fixture.program("main.ts");
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());

    let references = nodes_of(&program, MAIN, NodeKind::TypeReference);
    let shape = program.resolve_alias(program.symbol_at(references[0]).expect("Shape"));
    assert_eq!(program.symbol(shape).name, "Shape");
    let size = program.resolve_alias(program.symbol_at(references[1]).expect("Size"));
    assert!(program.symbol(size).has_any(SymbolFlags::TYPE_ALIAS));
}

#[test]
fn test_missing_relative_module_is_reported() {
    let program = single("import { a } from \"./nowhere\";\nimport lodash from \"lodash\";\n");
    assert_eq!(codes(&program), vec![diagnostic_codes::CANNOT_FIND_MODULE]);
}

#[test]
fn test_missing_root_file_is_reported() {
    let fixture = Fixture::new(&[]);
    let program = fixture.program("absent.ts");
    let diagnostics = program.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, diagnostic_codes::FILE_NOT_FOUND);
    assert!(diagnostics[0].file.is_empty());
}

#[test]
fn test_declaration_files_contribute_globals_without_diagnostics() {
    let fixture = Fixture::new(&[
        ("main.ts", "import \"./env\";\nlet h: Handle = open();\n"),
        ("env.d.ts", "declare function open(): Handle;\ninterface Handle { fd: number; }\nlet broken: Unknown;\n"),
    ]);
    let program = fixture.program("main.ts");
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());
    assert!(program.units()[1].is_declaration_file);
}

#[test]
fn test_script_units_share_the_global_scope() {
    let fixture = Fixture::new(&[
        ("a.ts", "let shared = 1;\n"),
        ("b.ts", "shared;\n"),
    ]);
    let mut options = CompilerOptions::default();
    options.root_dir = Some(fixture.dir.path().display().to_string());
    let program = Program::new(&[fixture.path("a.ts"), fixture.path("b.ts")], &options);
    assert!(program.diagnostics().is_empty(), "{:?}", program.diagnostics());
}

#[test]
fn test_invalid_options_are_reported() {
    let fixture = Fixture::new(&[("main.ts", "let a = 1;\n")]);
    let mut options = CompilerOptions::default();
    options.target = Some("es1999".to_string());
    let program = Program::new(&[fixture.path("main.ts")], &options);
    let diagnostics = program.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, diagnostic_codes::ARGUMENT_FOR_OPTION_MUST_BE);
    assert!(diagnostics[0].message_text.starts_with("Argument for 'target' option must be:"));
}

#[test]
fn test_unit_paths_are_absolute_and_normalized() {
    let fixture = Fixture::new(&[("src/main.ts", "let a = 1;\n")]);
    let program = fixture.program("src/../src/main.ts");
    let path: &Path = &program.units()[0].path;
    assert_eq!(path, fixture.path("src/main.ts"));
    assert_eq!(program.units()[0].file_name, "src/main.ts");
    assert!(matches!(
        program.node(NodeRef::new(MAIN, program.units()[0].root)),
        Some(Node::SourceFile { .. })
    ));
}
