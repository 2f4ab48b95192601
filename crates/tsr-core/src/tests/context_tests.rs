//! Tests for the mutation context: naming, skipping and type queries.

use crate::context::MutationContext;
use crate::mutators::mutators_for;
use crate::scanner::Scanner;
use crate::test_support::{NameModel, strict_options};
use tsr_parser::{Node, NodeKind};

#[test]
fn test_lib_name_defaults_to_lib_identifier() {
    let model = NameModel::parse("let x: number = 1;");
    let options = strict_options();
    let mut scanner = Scanner::new(&model);
    let ctx = MutationContext::new(&mut scanner, &options, model.unit_id(), None);
    assert_eq!(ctx.lib_name(), "t");
    assert!(!ctx.lib_binding().used);
}

#[test]
fn test_lib_name_escapes_colliding_identifiers() {
    let model = NameModel::parse("const t = 1;\nconst _t = 2;\n");
    let options = strict_options();
    let mut scanner = Scanner::new(&model);
    let ctx = MutationContext::new(&mut scanner, &options, model.unit_id(), None);
    assert_eq!(ctx.lib_name(), "__t");
}

#[test]
fn test_carried_lib_binding_wins() {
    let model = NameModel::parse("const t = 1;");
    let options = strict_options();
    let mut scanner = Scanner::new(&model);
    let carried = crate::context::LibBinding::new("_t");
    let ctx = MutationContext::new(&mut scanner, &options, model.unit_id(), Some(carried));
    assert_eq!(ctx.lib_name(), "_t");
}

#[test]
fn test_type_declaration_name_avoids_collisions() {
    let model = NameModel::parse("let x: number = 1;\nlet _xType = 2;\n");
    let options = strict_options();
    let mut scanner = Scanner::new(&model);
    let mut ctx = MutationContext::new(&mut scanner, &options, model.unit_id(), None);
    assert_eq!(ctx.type_declaration_name("x"), "__xType");
    assert_eq!(ctx.type_declaration_name("y"), "_yType");
    assert_eq!(ctx.return_type_declaration_name(), "_returnType");
}

#[test]
fn test_recursive_skip_keeps_excluded_subtree_eligible() {
    let model = NameModel::parse("let x: number = f(a, b);");
    let options = strict_options();
    let mut scanner = Scanner::new(&model);
    let mut ctx = MutationContext::new(&mut scanner, &options, model.unit_id(), None);

    let statement = model.first(NodeKind::VariableStatement);
    let call = model.first(NodeKind::Call);
    let Some(Node::Call { arguments, .. }) = ctx.arena().get(call).cloned() else {
        panic!("expected call");
    };
    let list = model.first(NodeKind::VariableDeclarationList);
    ctx.skip(statement, true, &[call]);

    assert!(ctx.should_skip(statement));
    assert!(ctx.should_skip(list));
    assert!(!ctx.should_skip(call));
    for &argument in &arguments {
        assert!(!ctx.should_skip(argument));
    }

    ctx.unskip(list);
    assert!(!ctx.should_skip(list));
}

#[test]
fn test_non_recursive_skip_marks_only_the_node() {
    let model = NameModel::parse("let x: number = 1;");
    let options = strict_options();
    let mut scanner = Scanner::new(&model);
    let mut ctx = MutationContext::new(&mut scanner, &options, model.unit_id(), None);
    let statement = model.first(NodeKind::VariableStatement);
    let list = model.first(NodeKind::VariableDeclarationList);
    ctx.skip(statement, false, &[]);
    assert!(ctx.should_skip(statement));
    assert!(!ctx.should_skip(list));
}

#[test]
fn test_skip_grows_for_generated_nodes() {
    let model = NameModel::parse("f();");
    let options = strict_options();
    let mut scanner = Scanner::new(&model);
    let mut ctx = MutationContext::new(&mut scanner, &options, model.unit_id(), None);
    let generated = ctx.factory().lib_call("number", Vec::new());
    ctx.skip(generated, true, &[]);
    assert!(ctx.should_skip(generated));
    assert!(ctx.lib_binding().used);
}

#[test]
fn test_open_types() {
    let model = NameModel::parse("let a: any = 1;\nlet b: number = 2;\nlet c = 3;\n");
    let options = strict_options();
    let mut scanner = Scanner::new(&model);
    let mut ctx = MutationContext::new(&mut scanner, &options, model.unit_id(), None);
    let declarations: Vec<_> = tsr_parser::fold::collect_descendants(
        ctx.arena(),
        ctx.root(),
        |_, node| node.kind() == NodeKind::VariableDeclaration,
    );
    assert_eq!(declarations.len(), 3);
    assert!(ctx.is_open_type(declarations[0]));
    assert!(!ctx.is_open_type(declarations[1]));
    assert!(ctx.is_open_type(declarations[2]));
}

#[test]
fn test_type_binding_requires_guarded_let_or_var() {
    let model = NameModel::parse(
        "let a: number = 1;\nconst b: number = 2;\ndeclare let c: number;\nlet d: any = 3;\na = 1;\nb = 2;\nc = 3;\nd = 4;\n",
    );
    let options = strict_options();
    let mut scanner = Scanner::new(&model);
    let mut ctx = MutationContext::new(&mut scanner, &options, model.unit_id(), None);
    let targets: Vec<_> = tsr_parser::fold::collect_descendants(ctx.arena(), ctx.root(), |_, node| {
        node.kind() == NodeKind::Binary
    })
    .into_iter()
    .filter_map(|binary| match ctx.arena().get(binary) {
        Some(Node::Binary { left, .. }) => Some(*left),
        _ => None,
    })
    .collect();
    assert_eq!(targets.len(), 4);
    assert!(ctx.has_type_binding(targets[0]));
    assert!(!ctx.has_type_binding(targets[1]));
    assert!(!ctx.has_type_binding(targets[2]));
    assert!(!ctx.has_type_binding(targets[3]));
}

#[test]
fn test_members_are_deduplicated_by_text() {
    let model = NameModel::parse("interface A { a: number; }\ninterface A { a: number; b: string; }\n");
    let options = strict_options();
    let mut scanner = Scanner::new(&model);
    let mut ctx = MutationContext::new(&mut scanner, &options, model.unit_id(), None);
    let interface = model.first(NodeKind::InterfaceDeclaration);
    assert_eq!(ctx.members_of(interface).len(), 2);
}

#[test]
fn test_self_reference_detection() {
    let model = NameModel::parse(
        "interface L { next: L; }\ninterface P { q: Q; }\ntype Q = { p: P };\ninterface S { v: number; }\n",
    );
    let options = strict_options();
    let mut scanner = Scanner::new(&model);
    let mut ctx = MutationContext::new(&mut scanner, &options, model.unit_id(), None);
    let interfaces: Vec<_> = tsr_parser::fold::collect_descendants(ctx.arena(), ctx.root(), |_, node| {
        node.kind() == NodeKind::InterfaceDeclaration
    });
    let alias = model.first(NodeKind::TypeAliasDeclaration);
    assert!(ctx.has_self_reference(interfaces[0]));
    assert!(!ctx.has_self_reference(interfaces[1]));
    assert!(ctx.has_transitive_self_reference(alias));
    assert!(!ctx.has_transitive_self_reference(interfaces[2]));
}

#[test]
fn test_registry_order() {
    assert_eq!(mutators_for(NodeKind::VariableDeclarationList).len(), 1);
    assert_eq!(mutators_for(NodeKind::ArrowFunction).len(), 1);
    assert_eq!(mutators_for(NodeKind::SourceFile).len(), 1);
    assert!(mutators_for(NodeKind::Identifier).is_empty());
    assert!(mutators_for(NodeKind::StatementGroup).is_empty());
}
