//! `type A = T` becomes `const A = t.type("A", <T>)`.

use super::{Mutation, bind_type_declaration};
use crate::context::MutationContext;
use crate::error::Result;
use crate::reflect::reflect_type;
use tracing::trace;
use tsr_parser::{Node, NodeIndex};

pub(super) fn mutate(node: NodeIndex, ctx: &mut MutationContext<'_, '_>) -> Result<Mutation> {
    let Some(&Node::TypeAliasDeclaration {
        modifiers,
        name,
        type_node,
        ..
    }) = ctx.arena().get(node)
    else {
        return Ok(Mutation::Unchanged);
    };
    let Some(name) = ctx.arena().identifier_text(name).map(str::to_string) else {
        return Ok(Mutation::Unchanged);
    };
    let Some(ty) = ctx.model_ref(type_node) else {
        return Ok(Mutation::Unchanged);
    };

    let mut body = reflect_type(ctx, ty);
    if ctx.has_transitive_self_reference(node) {
        body = ctx.factory().self_reference(&name, body);
    }
    let replacement = bind_type_declaration(ctx, &name, modifiers, body);
    trace!(%name, "bind type alias");
    Ok(Mutation::Replaced(replacement))
}
