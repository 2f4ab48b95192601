//! Second pass: apply the registered mutators bottom-up.

use crate::context::MutationContext;
use crate::error::{Result, TransformError};
use crate::mutators::{Mutation, mutators_for};
use tracing::{debug, trace};
use tsr_parser::{NodeIndex, NodeKind};

/// Rewrite the unit of `ctx` in its working arena.
///
/// Children are visited before their parent. For every node the mutators
/// registered for its kind run in order, each seeing the result of the
/// previous one, until one deletes the node or the node is skipped.
pub fn mutate_unit(ctx: &mut MutationContext<'_, '_>) -> Result<()> {
    let root = ctx.root();
    let Some(mutated) = visit(ctx, root)? else {
        return Err(TransformError::Invariant(format!(
            "unit {} lost its source file",
            ctx.unit().index()
        )));
    };
    if ctx.arena().kind(mutated) != Some(NodeKind::SourceFile) {
        return Err(TransformError::Invariant(format!(
            "unit {} root replaced by {:?}",
            ctx.unit().index(),
            ctx.arena().kind(mutated)
        )));
    }
    ctx.set_root(mutated);
    ctx.arena_mut().set_parents(mutated);
    debug!(unit = ctx.unit().index(), nodes = ctx.arena().len(), "mutated unit");
    Ok(())
}

/// Visit `node`; `None` means it was deleted.
fn visit(ctx: &mut MutationContext<'_, '_>, node: NodeIndex) -> Result<Option<NodeIndex>> {
    if node.is_none() {
        return Ok(Some(node));
    }
    let Some(mut current_node) = ctx.arena().get(node).cloned() else {
        return Ok(Some(node));
    };

    let mut failure = None;
    current_node.map_children(&mut |child| {
        if failure.is_some() {
            return Some(child);
        }
        match visit(ctx, child) {
            Ok(visited) => visited,
            Err(err) => {
                failure = Some(err);
                Some(child)
            }
        }
    });
    if let Some(err) = failure {
        return Err(err);
    }
    ctx.arena_mut().replace(node, current_node);
    reparent_children(ctx, node);

    let mut current = node;
    let Some(kind) = ctx.arena().kind(current) else {
        return Ok(Some(current));
    };
    for mutator in mutators_for(kind) {
        if ctx.should_skip(current) {
            break;
        }
        match mutator(current, ctx)? {
            Mutation::Unchanged => {}
            Mutation::Replaced(replacement) => {
                trace!(?kind, from = current.index(), to = replacement.index(), "replaced");
                ctx.record_replacement(current, replacement);
                current = replacement;
            }
            Mutation::Deleted => {
                trace!(?kind, node = current.index(), "deleted");
                return Ok(None);
            }
        }
    }
    Ok(Some(current))
}

/// Children replaced during the visit point at their new parent.
fn reparent_children(ctx: &mut MutationContext<'_, '_>, node: NodeIndex) {
    let children = ctx.arena().children(node);
    for child in children {
        ctx.arena_mut().set_parent(child, node);
    }
}

