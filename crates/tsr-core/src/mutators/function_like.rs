//! Parameter and return checks for function likes.
//!
//! A guarded function starts with a prologue:
//!
//! ```text
//! function f(a: number): string {
//!     let _aType = t.number();
//!     const _returnType = t.return(t.string());
//!     t.param("a", _aType).assert(a);
//!     ...
//! }
//! ```
//!
//! Concise arrow bodies are turned into blocks so the prologue has somewhere
//! to go. In constructors the prologue follows a leading `super(..)` call.

use super::Mutation;
use crate::context::MutationContext;
use crate::error::Result;
use crate::reflect::{reflect_annotation, reflect_signature};
use crate::semantics::NodeRef;
use tracing::trace;
use tsr_parser::{FunctionData, ModifierFlags, Node, NodeIndex, NodeKind, NodeList};

pub(super) fn mutate(node: NodeIndex, ctx: &mut MutationContext<'_, '_>) -> Result<Mutation> {
    let Some(function) = ctx.arena().get(node).cloned() else {
        return Ok(Mutation::Unchanged);
    };
    let kind = function.kind();
    let Some(func) = function.function_data().cloned() else {
        return Ok(Mutation::Unchanged);
    };
    if func.body.is_none() || ctx.is_implementation_of_overload(node) {
        return Ok(Mutation::Unchanged);
    }

    let (declarations, assertions) = parameter_checks(ctx, &func);
    let return_guarded = ctx.is_return_guarded(node);
    let mut prologue = declarations;
    if return_guarded {
        if let Some(ty) = function.annotation().and_then(|ty| ctx.model_ref(ty)) {
            let type_name = ctx.return_type_declaration_name();
            let reflection = reflect_annotation(ctx, ty);
            let mut factory = ctx.factory();
            let descriptor = factory.lib_call("return", vec![reflection]);
            prologue.push(factory.const_statement(ModifierFlags::empty(), &type_name, descriptor));
        }
    }
    prologue.extend(assertions);
    for &statement in &prologue {
        ctx.skip(statement, true, &[]);
    }

    let is_block = matches!(ctx.arena().get(func.body), Some(Node::Block { .. }));
    if is_block {
        if !prologue.is_empty() {
            insert_prologue(ctx, kind, func.body, prologue);
        }
    } else if !prologue.is_empty() || return_guarded {
        let block = concise_body_block(ctx, func.body, prologue, return_guarded);
        if let Some(data) = ctx.arena_mut().get_mut(node).and_then(Node::function_data_mut) {
            data.body = block;
        }
        ctx.arena_mut().set_parent(block, node);
        ctx.arena_mut().set_parents(block);
    }
    ctx.skip(node, false, &[]);

    if kind == NodeKind::FunctionDeclaration && ctx.options().annotate {
        if let Some(group) = annotate_declaration(ctx, node, &func) {
            return Ok(Mutation::Replaced(group));
        }
    }
    Ok(Mutation::Unchanged)
}

/// `let _aType = <T>;` declarations and `t.param(..).assert(a);` checks for
/// every identifier parameter with a closed annotation.
fn parameter_checks(
    ctx: &mut MutationContext<'_, '_>,
    func: &FunctionData,
) -> (Vec<NodeIndex>, Vec<NodeIndex>) {
    let mut declarations = Vec::new();
    let mut assertions = Vec::new();
    for &parameter in &func.parameters {
        let Some(Node::Parameter {
            dot_dot_dot,
            name,
            question,
            type_annotation,
            initializer,
            ..
        }) = ctx.arena().get(parameter).cloned()
        else {
            continue;
        };
        let Some(parameter_name) = ctx.arena().identifier_text(name).map(str::to_string) else {
            continue;
        };
        if parameter_name == "this" || type_annotation.is_none() || ctx.is_open_type(parameter) {
            continue;
        }
        let Some(ty) = ctx.model_ref(type_annotation) else {
            continue;
        };

        let type_name = ctx.type_declaration_name(&parameter_name);
        let reflection = reflect_annotation(ctx, ty);
        let mut factory = ctx.factory();
        declarations.push(factory.let_statement(&type_name, reflection));

        let label = factory.string(&parameter_name);
        let descriptor = factory.identifier(&type_name);
        let check = if dot_dot_dot {
            factory.lib_call("rest", vec![label, descriptor])
        } else {
            let mut arguments = vec![label, descriptor];
            if question || initializer.is_some() {
                arguments.push(factory.boolean(true));
            }
            factory.lib_call("param", arguments)
        };
        let value = factory.identifier(&parameter_name);
        let assertion = factory.assert(check, value);
        assertions.push(factory.expression_statement(assertion));
        trace!(parameter = %parameter_name, descriptor = %type_name, "guard parameter");
    }
    (declarations, assertions)
}

fn insert_prologue(
    ctx: &mut MutationContext<'_, '_>,
    kind: NodeKind,
    body: NodeIndex,
    prologue: Vec<NodeIndex>,
) {
    let Some(Node::Block { statements }) = ctx.arena().get(body).cloned() else {
        return;
    };
    let at = if kind == NodeKind::Constructor
        && statements
            .iter()
            .next()
            .is_some_and(|&first| is_super_call(ctx, first))
    {
        1
    } else {
        0
    };
    let mut rewritten: Vec<NodeIndex> = statements.iter().copied().collect();
    rewritten.splice(at..at, prologue);
    ctx.arena_mut().replace(
        body,
        Node::Block {
            statements: NodeList::from_vec(rewritten),
        },
    );
    ctx.arena_mut().set_parents(body);
}

fn is_super_call(ctx: &MutationContext<'_, '_>, statement: NodeIndex) -> bool {
    let arena = ctx.arena();
    let Some(Node::ExpressionStatement { expression }) = arena.get(statement) else {
        return false;
    };
    match arena.get(*expression) {
        Some(Node::Call { expression, .. }) => {
            matches!(arena.get(*expression), Some(Node::SuperExpression))
        }
        _ => false,
    }
}

/// `{ prologue; return [_returnType.assert(]e[)]; }` for a concise arrow body.
fn concise_body_block(
    ctx: &mut MutationContext<'_, '_>,
    expression: NodeIndex,
    mut statements: Vec<NodeIndex>,
    return_guarded: bool,
) -> NodeIndex {
    let value = if return_guarded {
        let type_name = ctx.return_type_declaration_name();
        ctx.factory().type_assertion(&type_name, expression)
    } else {
        expression
    };
    let statement = ctx.factory().return_statement(value);
    ctx.skip(statement, true, &[expression]);
    statements.push(statement);
    ctx.factory().block(statements)
}

/// `function f() {}` followed by `t.annotate(f, t.function(..))`.
fn annotate_declaration(
    ctx: &mut MutationContext<'_, '_>,
    node: NodeIndex,
    func: &FunctionData,
) -> Option<NodeIndex> {
    let name = ctx.arena().identifier_text(func.name)?.to_string();
    let parameters: Vec<NodeRef> = func
        .parameters
        .iter()
        .filter_map(|&parameter| ctx.model_ref(parameter))
        .collect();
    let return_type = func.type_annotation.to_option().and_then(|ty| ctx.model_ref(ty));
    let signature = reflect_signature(ctx, &parameters, return_type);

    let mut factory = ctx.factory();
    let annotation = factory.annotate(&name, signature);
    let statement = factory.expression_statement(annotation);
    let group = factory.statement_group(vec![node, statement]);
    ctx.skip(statement, true, &[]);
    ctx.skip(group, false, &[]);
    trace!(%name, "annotate function");
    Some(group)
}
