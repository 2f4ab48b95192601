//! `return e` becomes `return _returnType.assert(e)` inside functions with a
//! guarded return type.

use super::Mutation;
use crate::context::MutationContext;
use crate::error::Result;
use tsr_parser::{Node, NodeIndex};

pub(super) fn mutate(node: NodeIndex, ctx: &mut MutationContext<'_, '_>) -> Result<Mutation> {
    let Some(&Node::Return { expression }) = ctx.arena().get(node) else {
        return Ok(Mutation::Unchanged);
    };
    if expression.is_none() {
        return Ok(Mutation::Unchanged);
    }
    let arena = ctx.arena();
    let Some(function) = arena
        .ancestors(node)
        .find(|&ancestor| arena.kind(ancestor).is_some_and(|kind| kind.is_function_like()))
    else {
        return Ok(Mutation::Unchanged);
    };
    if !ctx.is_return_guarded(function) {
        return Ok(Mutation::Unchanged);
    }

    let type_name = ctx.return_type_declaration_name();
    let checked = ctx.factory().type_assertion(&type_name, expression);
    let replacement = ctx.factory().return_statement(checked);
    ctx.skip(replacement, true, &[expression]);
    Ok(Mutation::Replaced(replacement))
}
