//! Parser integration tests.

use tsr_parser::fold::{collect_descendants, find_descendant};
use tsr_parser::{
    ModifierFlags, Node, NodeIndex, NodeKind, ParseResult, VariableKind, parse_source,
};
use tsr_scanner::SyntaxKind;

fn parse_ok(source: &str) -> ParseResult {
    let result = parse_source("test.ts", source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        result.diagnostics
    );
    result
}

fn statements(result: &ParseResult) -> Vec<NodeIndex> {
    match result.arena.get(result.root) {
        Some(Node::SourceFile { statements }) => statements.nodes.clone(),
        other => panic!("expected source file, got {other:?}"),
    }
}

fn first_of_kind(result: &ParseResult, kind: NodeKind) -> NodeIndex {
    find_descendant(&result.arena, result.root, |_, node| node.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind:?} in tree"))
}

fn text_of(result: &ParseResult, index: NodeIndex) -> &str {
    result
        .arena
        .source_text(index, &result.text)
        .expect("parsed node has source text")
}

#[test]
fn test_variable_declarations_with_annotations() {
    let result = parse_ok("const a: number = 1, b = 'x';\nlet c: string[];\nvar d;");
    let stmts = statements(&result);
    assert_eq!(stmts.len(), 3);

    let list = first_of_kind(&result, NodeKind::VariableDeclarationList);
    let Some(Node::VariableDeclarationList { kind, declarations }) = result.arena.get(list) else {
        panic!("expected declaration list");
    };
    assert_eq!(*kind, VariableKind::Const);
    assert_eq!(declarations.len(), 2);

    let Some(Node::VariableDeclaration {
        type_annotation, ..
    }) = result.arena.get(declarations.nodes[0])
    else {
        panic!("expected declaration");
    };
    assert_eq!(result.arena.kind(*type_annotation), Some(NodeKind::KeywordType));
    assert_eq!(text_of(&result, *type_annotation), "number");
}

#[test]
fn test_parent_links_are_set() {
    let result = parse_ok("let x = 1;");
    let decl = first_of_kind(&result, NodeKind::VariableDeclaration);
    let ancestors: Vec<_> = result
        .arena
        .ancestors(decl)
        .filter_map(|a| result.arena.kind(a))
        .collect();
    assert_eq!(
        ancestors,
        vec![
            NodeKind::VariableDeclarationList,
            NodeKind::VariableStatement,
            NodeKind::SourceFile
        ]
    );
}

#[test]
fn test_interface_with_heritage_and_members() {
    let result = parse_ok(
        "export interface Foo extends Bar, Baz<number> {\n  readonly a: string;\n  b?: number,\n  m(x: number): void;\n  (y: string): boolean;\n  [key: string]: any;\n}",
    );
    let iface = first_of_kind(&result, NodeKind::InterfaceDeclaration);
    let Some(Node::InterfaceDeclaration(data)) = result.arena.get(iface) else {
        panic!("expected interface");
    };
    assert!(data.modifiers.contains(ModifierFlags::EXPORT));
    assert_eq!(result.arena.identifier_text(data.name), Some("Foo"));
    assert_eq!(data.heritage_clauses.len(), 1);

    let kinds: Vec<_> = data
        .members
        .iter()
        .filter_map(|m| result.arena.kind(*m))
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::PropertySignature,
            NodeKind::PropertySignature,
            NodeKind::MethodSignature,
            NodeKind::CallSignature,
            NodeKind::IndexSignature,
        ]
    );
    let Some(Node::PropertySignature {
        modifiers,
        question,
        ..
    }) = result.arena.get(data.members.nodes[0])
    else {
        panic!("expected property signature");
    };
    assert!(modifiers.contains(ModifierFlags::READONLY));
    assert!(!question);
}

#[test]
fn test_function_overloads_have_no_body() {
    let result = parse_ok(
        "function f(a: number): number;\nfunction f(a: string): string;\nfunction f(a: any): any { return a; }",
    );
    let bodies: Vec<bool> = statements(&result)
        .iter()
        .map(|s| match result.arena.get(*s) {
            Some(Node::FunctionDeclaration(func)) => func.body.is_some(),
            other => panic!("expected function, got {other:?}"),
        })
        .collect();
    assert_eq!(bodies, vec![false, false, true]);
}

#[test]
fn test_arrow_functions_and_parenthesized_expressions() {
    let result = parse_ok(
        "const f = (a: number, b?: string): void => { };\nconst g = x => x * 2;\nconst h = async () => 1;\nconst p = (a + b) * c;",
    );
    let arrows = collect_descendants(&result.arena, result.root, |_, node| {
        node.kind() == NodeKind::ArrowFunction
    });
    assert_eq!(arrows.len(), 3);

    let Some(Node::ArrowFunction(first)) = result.arena.get(arrows[0]) else {
        panic!("expected arrow");
    };
    assert_eq!(first.parameters.len(), 2);
    assert!(first.type_annotation.is_some());
    assert_eq!(result.arena.kind(first.body), Some(NodeKind::Block));

    let Some(Node::ArrowFunction(third)) = result.arena.get(arrows[2]) else {
        panic!("expected arrow");
    };
    assert!(third.modifiers.contains(ModifierFlags::ASYNC));

    assert!(
        find_descendant(&result.arena, result.root, |_, node| matches!(
            node,
            Node::Parenthesized { .. }
        ))
        .is_some()
    );
}

#[test]
fn test_as_expression_and_as_const() {
    let result = parse_ok("const a = x as string;\nconst b = [1, 2] as const;");
    let casts = collect_descendants(&result.arena, result.root, |_, node| {
        node.kind() == NodeKind::As
    });
    assert_eq!(casts.len(), 2);
    let Some(Node::As { type_node, .. }) = result.arena.get(casts[1]) else {
        panic!("expected as");
    };
    assert_eq!(text_of(&result, *type_node), "const");
}

#[test]
fn test_binary_precedence() {
    let result = parse_ok("x = a + b * c ** d ** e;");
    let stmt = statements(&result)[0];
    let Some(Node::ExpressionStatement { expression }) = result.arena.get(stmt) else {
        panic!("expected expression statement");
    };
    let Some(Node::Binary {
        operator, right, ..
    }) = result.arena.get(*expression)
    else {
        panic!("expected assignment");
    };
    assert_eq!(*operator, SyntaxKind::EqualsToken);
    let Some(Node::Binary {
        operator, right, ..
    }) = result.arena.get(*right)
    else {
        panic!("expected addition");
    };
    assert_eq!(*operator, SyntaxKind::PlusToken);
    assert_eq!(text_of(&result, *right), "b * c ** d ** e");
    let Some(Node::Binary { right, .. }) = result.arena.get(*right) else {
        panic!("expected multiplication");
    };
    // `**` groups to the right.
    assert_eq!(text_of(&result, *right), "c ** d ** e");
}

#[test]
fn test_compound_assignment_and_shift_operators() {
    let result = parse_ok("a >>= 2;\nb = c >> 1;\nd >>>= e;");
    let operators: Vec<SyntaxKind> = collect_descendants(&result.arena, result.root, |_, node| {
        node.kind() == NodeKind::Binary
    })
    .into_iter()
    .filter_map(|b| match result.arena.get(b) {
        Some(Node::Binary { operator, .. }) => Some(*operator),
        _ => None,
    })
    .collect();
    assert_eq!(
        operators,
        vec![
            SyntaxKind::GreaterThanGreaterThanEqualsToken,
            SyntaxKind::EqualsToken,
            SyntaxKind::GreaterThanGreaterThanToken,
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
        ]
    );
}

#[test]
fn test_nested_generic_type_arguments() {
    let result = parse_ok("let m: Map<string, Array<number>> = new Map<string, Array<number>>();");
    let refs = collect_descendants(&result.arena, result.root, |_, node| {
        node.kind() == NodeKind::TypeReference
    });
    // Map and Array in the annotation, Array in the type arguments of `new`.
    assert_eq!(refs.len(), 3);
    assert!(find_descendant(&result.arena, result.root, |_, n| n.kind() == NodeKind::New).is_some());
}

#[test]
fn test_call_with_type_arguments_vs_comparison() {
    let result = parse_ok("f<number>(1);\nconst b = a < c;");
    let call = first_of_kind(&result, NodeKind::Call);
    let Some(Node::Call { type_arguments, .. }) = result.arena.get(call) else {
        panic!("expected call");
    };
    assert_eq!(type_arguments.as_ref().map(|t| t.len()), Some(1));
    let comparison = first_of_kind(&result, NodeKind::Binary);
    let Some(Node::Binary { operator, .. }) = result.arena.get(comparison) else {
        panic!("expected binary");
    };
    assert_eq!(*operator, SyntaxKind::LessThanToken);
}

#[test]
fn test_types() {
    let result = parse_ok(
        "type A = | 'a' | -1 | { x: number; y?: string[] } | [number, string] | ((a: number) => void) | typeof b | keyof C;",
    );
    let union = first_of_kind(&result, NodeKind::UnionType);
    let Some(Node::UnionType { types }) = result.arena.get(union) else {
        panic!("expected union");
    };
    let kinds: Vec<_> = types.iter().filter_map(|t| result.arena.kind(*t)).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::LiteralType,
            NodeKind::LiteralType,
            NodeKind::TypeLiteral,
            NodeKind::TupleType,
            NodeKind::ParenthesizedType,
            NodeKind::TypeQuery,
            NodeKind::TypeOperator,
        ]
    );
    assert!(
        find_descendant(&result.arena, result.root, |_, n| n.kind() == NodeKind::FunctionType)
            .is_some()
    );
}

#[test]
fn test_function_type_annotation() {
    let result = parse_ok("let cb: (err: Error, value?: number) => void;");
    let func = first_of_kind(&result, NodeKind::FunctionType);
    let Some(Node::FunctionType { parameters, .. }) = result.arena.get(func) else {
        panic!("expected function type");
    };
    assert_eq!(parameters.len(), 2);
}

#[test]
fn test_class_members() {
    let result = parse_ok(
        "export abstract class A<T> extends B implements C, D {\n  private x: number = 1;\n  static readonly y?: string;\n  z!: T;\n  constructor(public a: number, readonly b = 2) { super(); }\n  get v(): number { return 1; }\n  set v(n: number) { }\n  async m<U>(u: U): Promise<U> { return u; }\n  [key: string]: any;\n}",
    );
    let class = first_of_kind(&result, NodeKind::ClassDeclaration);
    let Some(Node::ClassDeclaration(data)) = result.arena.get(class) else {
        panic!("expected class");
    };
    assert!(data.modifiers.contains(ModifierFlags::EXPORT | ModifierFlags::ABSTRACT));
    assert_eq!(data.heritage_clauses.len(), 2);
    let kinds: Vec<_> = data
        .members
        .iter()
        .filter_map(|m| result.arena.kind(*m))
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::PropertyDeclaration,
            NodeKind::PropertyDeclaration,
            NodeKind::PropertyDeclaration,
            NodeKind::Constructor,
            NodeKind::GetAccessor,
            NodeKind::SetAccessor,
            NodeKind::MethodDeclaration,
            NodeKind::IndexSignature,
        ]
    );
    let Some(Node::Constructor(ctor)) = result.arena.get(data.members.nodes[3]) else {
        panic!("expected constructor");
    };
    let Some(Node::Parameter { modifiers, .. }) = result.arena.get(ctor.parameters.nodes[0]) else {
        panic!("expected parameter");
    };
    assert!(modifiers.contains(ModifierFlags::PUBLIC));
}

#[test]
fn test_control_flow_statements() {
    let result = parse_ok(
        "for (const x of xs) { continue; }\nfor (let k in o) {}\nfor (let i = 0; i < n; i++) {}\nwhile (a) break;\ndo { } while (b);\nswitch (c) { case 1: f(); break; default: g(); }\ntry { } catch (e: any) { } finally { }\nif (a) b(); else c();",
    );
    let kinds: Vec<_> = statements(&result)
        .iter()
        .filter_map(|s| result.arena.kind(*s))
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::ForOf,
            NodeKind::ForIn,
            NodeKind::For,
            NodeKind::While,
            NodeKind::DoWhile,
            NodeKind::Switch,
            NodeKind::Try,
            NodeKind::If,
        ]
    );
}

#[test]
fn test_in_operator_inside_for_initializer_parens() {
    let result = parse_ok("for (const x = ('a' in o); x; ) {}");
    assert!(
        find_descendant(&result.arena, result.root, |_, node| matches!(
            node,
            Node::Binary {
                operator: SyntaxKind::InKeyword,
                ..
            }
        ))
        .is_some()
    );
}

#[test]
fn test_imports_and_exports() {
    let result = parse_ok(
        "import t from \"ts-runtime/lib\";\nimport * as ns from './a';\nimport d, { x, y as z } from './b';\nimport './side';\nexport { x, z as w };\nexport * from './c';\nexport default 42;\nexport const q = 1;",
    );
    let kinds: Vec<_> = statements(&result)
        .iter()
        .filter_map(|s| result.arena.kind(*s))
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::ImportDeclaration,
            NodeKind::ImportDeclaration,
            NodeKind::ImportDeclaration,
            NodeKind::ImportDeclaration,
            NodeKind::ExportDeclaration,
            NodeKind::ExportDeclaration,
            NodeKind::ExportAssignment,
            NodeKind::VariableStatement,
        ]
    );
}

#[test]
fn test_template_literals() {
    let result = parse_ok("const s = `a${b}c${d + 1}e`;\nconst n = `plain`;");
    let template = first_of_kind(&result, NodeKind::TemplateExpression);
    let Some(Node::TemplateExpression { head, spans }) = result.arena.get(template) else {
        panic!("expected template");
    };
    assert_eq!(head, "a");
    let literals: Vec<_> = spans
        .iter()
        .filter_map(|s| match result.arena.get(*s) {
            Some(Node::TemplateSpan { literal, tail, .. }) => Some((literal.clone(), *tail)),
            _ => None,
        })
        .collect();
    assert_eq!(
        literals,
        vec![("c".to_string(), false), ("e".to_string(), true)]
    );
    let plain = first_of_kind(&result, NodeKind::NoSubstitutionTemplate);
    assert_eq!(
        result.arena.get(plain),
        Some(&Node::NoSubstitutionTemplate {
            raw: "plain".to_string()
        })
    );
}

#[test]
fn test_object_and_array_literals_and_patterns() {
    let result = parse_ok(
        "const o = { a: 1, b, [k]: 2, m() { }, get g() { return 1; }, ...rest };\nconst [x, , y = 2, ...zs] = arr;\nconst { p, q: r = 3, ...others } = o;",
    );
    let object = first_of_kind(&result, NodeKind::ObjectLiteral);
    let Some(Node::ObjectLiteral { properties }) = result.arena.get(object) else {
        panic!("expected object");
    };
    assert_eq!(properties.len(), 6);
    let array_pattern = first_of_kind(&result, NodeKind::ArrayBindingPattern);
    let Some(Node::ArrayBindingPattern { elements }) = result.arena.get(array_pattern) else {
        panic!("expected array pattern");
    };
    assert_eq!(elements.len(), 4);
    assert_eq!(result.arena.kind(elements.nodes[1]), Some(NodeKind::Omitted));
}

#[test]
fn test_optional_chaining_and_non_null() {
    let result = parse_ok("const v = a?.b?.[c]?.(d)!;");
    let accesses = collect_descendants(&result.arena, result.root, |_, node| {
        matches!(
            node,
            Node::PropertyAccess {
                question_dot: true,
                ..
            } | Node::ElementAccess {
                question_dot: true,
                ..
            } | Node::Call {
                question_dot: true,
                ..
            }
        )
    });
    assert_eq!(accesses.len(), 3);
    assert!(
        find_descendant(&result.arena, result.root, |_, n| n.kind() == NodeKind::NonNull).is_some()
    );
}

#[test]
fn test_automatic_semicolon_insertion() {
    let result = parse_ok("let a = 1\nlet b = 2\nreturnValue()\n");
    assert_eq!(statements(&result).len(), 3);
}

#[test]
fn test_missing_semicolon_is_reported() {
    let result = parse_source("test.ts", "let a = 1 let b = 2;");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, 1005);
    assert_eq!(result.diagnostics[0].message_text, "';' expected.");
}

#[test]
fn test_expression_expected_recovers() {
    let result = parse_source("test.ts", "let a = ;\nlet b = 2;");
    assert!(result.diagnostics.iter().any(|d| d.code == 1109));
    // The second statement still parses.
    assert!(
        find_descendant(&result.arena, result.root, |_, node| matches!(
            node,
            Node::NumericLiteral { text } if text == "2"
        ))
        .is_some()
    );
}

#[test]
fn test_garbage_always_terminates() {
    let result = parse_source("test.ts", ") ] } => : ? class { ( [ <");
    assert!(!result.diagnostics.is_empty());
}

#[test]
fn test_scanner_diagnostics_are_included() {
    let result = parse_source("test.ts", "let s = 'unterminated\n");
    assert!(result.diagnostics.iter().any(|d| d.code == 1002));
    assert!(result.diagnostics.iter().all(|d| d.file == "test.ts"));
}

#[test]
fn test_declare_and_type_alias_statements() {
    let result = parse_ok("declare const x: number;\ntype Pair<T> = [T, T];\ndeclare function f(): void;");
    let stmts = statements(&result);
    assert_eq!(
        result.arena.get(stmts[0]).map(Node::modifiers),
        Some(ModifierFlags::DECLARE)
    );
    assert_eq!(
        result.arena.kind(stmts[1]),
        Some(NodeKind::TypeAliasDeclaration)
    );
    let Some(Node::FunctionDeclaration(func)) = result.arena.get(stmts[2]) else {
        panic!("expected function");
    };
    assert!(func.body.is_none());
    assert!(func.modifiers.contains(ModifierFlags::DECLARE));
}

#[test]
fn test_contextual_keywords_as_identifiers() {
    let result = parse_ok("let type = 1;\nconst async = type;\nlet of = async;");
    assert_eq!(statements(&result).len(), 3);
}
