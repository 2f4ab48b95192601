//! First pass: normalise a unit before the program is re-derived.
//!
//! The pass walks the tree top-down. Annotatable nodes without an
//! annotation get an explicit `any`, so that the second pass sees every
//! declaration with a type node it can query. `expr as T` casts become
//! checked expressions; `as const` is left alone.

use crate::context::MutationContext;
use crate::error::{Result, TransformError};
use crate::reflect::reflect_type;
use tracing::{debug, trace};
use tsr_parser::{Node, NodeArena, NodeIndex};

/// Normalise the unit of `ctx` in its working arena.
pub fn normalize_unit(ctx: &mut MutationContext<'_, '_>) -> Result<()> {
    let root = ctx.root();
    let normalized = normalize(ctx, root);
    if normalized != root {
        return Err(TransformError::Invariant(format!(
            "normalisation replaced the root of unit {}",
            ctx.unit().index()
        )));
    }
    ctx.arena_mut().set_parents(root);
    debug!(unit = ctx.unit().index(), nodes = ctx.arena().len(), "normalized unit");
    Ok(())
}

fn normalize(ctx: &mut MutationContext<'_, '_>, node: NodeIndex) -> NodeIndex {
    if node.is_none() || ctx.should_skip(node) {
        return node;
    }
    let Some(mut current) = ctx.arena().get(node).cloned() else {
        return node;
    };

    if let Node::As {
        expression,
        type_node,
    } = current
    {
        if !is_const_assertion(ctx.arena(), type_node) {
            return checked_cast(ctx, node, expression, type_node);
        }
    }

    let exempt = is_exempt_from_placeholder(ctx.arena(), node);
    let needs_placeholder = !exempt && current.annotation_slot_mut().is_some_and(|slot| slot.is_none());
    if needs_placeholder {
        let placeholder = ctx.factory().any_keyword();
        if let Some(slot) = current.annotation_slot_mut() {
            *slot = placeholder;
        }
        trace!(kind = ?current.kind(), "placeholder annotation");
    }

    ctx.skip(node, false, &[]);
    current.map_children(&mut |child| Some(normalize(ctx, child)));
    ctx.arena_mut().replace(node, current);
    node
}

/// `expr as T` becomes `<T>.assert(expr)`, the operand normalised first.
fn checked_cast(
    ctx: &mut MutationContext<'_, '_>,
    node: NodeIndex,
    expression: NodeIndex,
    type_node: NodeIndex,
) -> NodeIndex {
    let operand = normalize(ctx, expression);
    let Some(ty) = ctx.model_ref(type_node) else {
        return node;
    };
    let reflection = reflect_type(ctx, ty);
    let replacement = ctx.factory().assert(reflection, operand);
    ctx.skip(replacement, true, &[operand]);
    ctx.record_replacement(node, replacement);
    trace!("checked cast");
    replacement
}

fn is_const_assertion(arena: &NodeArena, type_node: NodeIndex) -> bool {
    match arena.get(type_node) {
        Some(Node::TypeReference { type_name, .. }) => {
            arena.identifier_text(*type_name) == Some("const")
        }
        _ => false,
    }
}

/// Variables bound by `for…of`/`for…in` heads and `catch` clauses cannot be
/// annotated.
fn is_exempt_from_placeholder(arena: &NodeArena, node: NodeIndex) -> bool {
    if !matches!(arena.get(node), Some(Node::VariableDeclaration { .. })) {
        return false;
    }
    let parent = arena.parent(node);
    match arena.get(parent) {
        Some(Node::CatchClause { .. }) => true,
        Some(Node::VariableDeclarationList { .. }) => matches!(
            arena.get(arena.parent(parent)),
            Some(Node::ForOf { .. }) | Some(Node::ForIn { .. })
        ),
        _ => false,
    }
}
