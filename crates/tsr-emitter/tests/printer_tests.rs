//! Printer tests: parse, print, compare.

use tsr_emitter::{PrintOptions, print_node, print_to_string};
use tsr_parser::fold::find_descendant;
use tsr_parser::{Node, NodeArena, NodeKind, NodeList, parse_source};

fn print_ts(source: &str) -> String {
    let result = parse_source("test.ts", source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        result.diagnostics
    );
    print_to_string(&result.arena, result.root, PrintOptions::default())
}

fn print_js(source: &str) -> String {
    let result = parse_source("test.ts", source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        result.diagnostics
    );
    print_to_string(&result.arena, result.root, PrintOptions::javascript())
}

#[test]
fn test_variable_statements_round_trip() {
    let source = "const a: number = 1;\nlet b: string[] = [\"x\"];\n";
    assert_eq!(print_ts(source), source);
}

#[test]
fn test_single_quoted_strings_print_double_quoted() {
    assert_eq!(print_ts("let s = 'it\"s';"), "let s = \"it\\\"s\";\n");
}

#[test]
fn test_function_declaration_round_trip() {
    let source = "function f(a: number, b?: string): void {\n    return;\n}\n";
    assert_eq!(print_ts(source), source);
}

#[test]
fn test_interface_round_trip() {
    let source = "interface P extends Q {\n    a: number;\n    m?(x: string): void;\n    [key: string]: any;\n}\n";
    assert_eq!(print_ts(source), source);
}

#[test]
fn test_type_alias_round_trip() {
    let source = "type U = (string | number)[] | ((a: number) => void) | { x: 1; y?: \"a\" };\n";
    assert_eq!(print_ts(source), source);
}

#[test]
fn test_if_else_layout() {
    assert_eq!(
        print_ts("if (a) { b(); } else if (c) d(); else { }"),
        "if (a) {\n    b();\n} else if (c)\n    d();\nelse { }\n"
    );
}

#[test]
fn test_loops_and_switch() {
    let source = "for (let i = 0; i < n; i++) {\n    f(i);\n}\nfor (const x of xs) { }\nswitch (k) {\n    case 1:\n        break;\n    default:\n        g();\n}\n";
    assert_eq!(print_ts(source), source);
}

#[test]
fn test_try_catch_finally() {
    let source = "try {\n    a();\n} catch (e) {\n    b(e);\n} finally {\n    c();\n}\n";
    assert_eq!(print_ts(source), source);
}

#[test]
fn test_arrow_with_object_body_keeps_parentheses() {
    let source = "const f = (x: number) => ({ a: x });\n";
    assert_eq!(print_ts(source), source);
    assert_eq!(print_js(source), "const f = (x) => ({ a: x });\n");
}

#[test]
fn test_unary_operators_do_not_fuse() {
    assert_eq!(print_ts("let n = - -1;"), "let n = - -1;\n");
    assert_eq!(
        print_ts("if (typeof x === 'string') { }"),
        "if (typeof x === \"string\") { }\n"
    );
}

#[test]
fn test_template_literal() {
    let source = "const s = `a${b}c${d}`;\n";
    assert_eq!(print_ts(source), source);
}

#[test]
fn test_imports_and_exports() {
    let source = "import t, { a as b, c } from \"./m\";\nimport * as ns from \"./n\";\nimport \"./side\";\nexport { b };\nexport * from \"./m\";\nexport default 1;\n";
    assert_eq!(print_ts(source), source);
}

#[test]
fn test_strip_types_removes_type_only_constructs() {
    let source = r#"
interface A { x: number }
type B = string;
declare const c: number;
function g(x: number): number;
function g(x: any) { return x as number; }
"#;
    assert_eq!(print_js(source), "function g(x) {\n    return x;\n}\n");
}

#[test]
fn test_strip_types_class_members_and_parameter_properties() {
    let source = r#"
class K implements A {
    x: number;
    y = 1;
    constructor(private readonly z: string, w: number) {
        super();
    }
    m<T>(this: K, v: T): T { return v!; }
}
"#;
    assert_eq!(
        print_js(source),
        "class K {\n    y = 1;\n    constructor(z, w) {\n        super();\n        this.z = z;\n    }\n    m(v) {\n        return v;\n    }\n}\n"
    );
}

#[test]
fn test_strip_types_keeps_export_and_async() {
    assert_eq!(
        print_js("export async function f(): Promise<void> { await g<number>(1); }"),
        "export async function f() {\n    await g(1);\n}\n"
    );
}

#[test]
fn test_print_node_type_annotation() {
    let result = parse_source("test.ts", "let v: Array<number>;");
    let type_ref = find_descendant(&result.arena, result.root, |_, node| {
        node.kind() == NodeKind::TypeReference
    })
    .expect("type reference");
    assert_eq!(print_node(&result.arena, type_ref), "Array<number>");
}

#[test]
fn test_print_synthesized_call() {
    let mut arena = NodeArena::new();
    let lib = arena.add_synthesized(Node::Identifier {
        text: "t".to_string(),
    });
    let name = arena.add_synthesized(Node::Identifier {
        text: "number".to_string(),
    });
    let callee = arena.add_synthesized(Node::PropertyAccess {
        expression: lib,
        question_dot: false,
        name,
    });
    let call = arena.add_synthesized(Node::Call {
        expression: callee,
        question_dot: false,
        type_arguments: None,
        arguments: NodeList::new(),
    });
    assert_eq!(print_node(&arena, call), "t.number()");
}
