//! Interfaces become runtime type bindings.
//!
//! All declarations of an interface symbol are merged into the first one
//! visited; the others are removed.

use super::{Mutation, bind_type_declaration};
use crate::context::MutationContext;
use crate::error::Result;
use crate::reflect::{reflect_object, reflect_reference};
use crate::semantics::NodeRef;
use tracing::trace;
use tsr_parser::{Node, NodeIndex};

pub(super) fn mutate(node: NodeIndex, ctx: &mut MutationContext<'_, '_>) -> Result<Mutation> {
    let Some(Node::InterfaceDeclaration(data)) = ctx.arena().get(node) else {
        return Ok(Mutation::Unchanged);
    };
    let modifiers = data.modifiers;
    let Some(name) = ctx.arena().identifier_text(data.name).map(str::to_string) else {
        return Ok(Mutation::Unchanged);
    };
    let Some(symbol) = ctx.symbol_of(node) else {
        return Ok(Mutation::Unchanged);
    };
    if ctx.scanner().was_merged(symbol) {
        trace!(%name, "drop merged interface declaration");
        return Ok(Mutation::Deleted);
    }

    let members = ctx.members_of(node);
    let object = reflect_object(ctx, &members);
    let supertypes = ctx.merged_supertypes(symbol);
    let mut body = if supertypes.is_empty() {
        object
    } else {
        let mut parts = Vec::with_capacity(supertypes.len() + 1);
        for supertype in supertypes {
            let Some(Node::ExpressionWithTypeArguments {
                expression,
                type_arguments,
            }) = ctx.model().node(supertype)
            else {
                continue;
            };
            let expression = NodeRef::new(supertype.unit, *expression);
            parts.push(reflect_reference(
                ctx,
                supertype,
                expression,
                type_arguments.as_ref(),
            ));
        }
        parts.push(object);
        ctx.factory().lib_call("intersect", parts)
    };
    if ctx.has_self_reference(node) {
        body = ctx.factory().self_reference(&name, body);
    }

    let replacement = bind_type_declaration(ctx, &name, modifiers, body);
    let unit = ctx.unit();
    ctx.scanner().mark_merged(symbol, unit);
    trace!(%name, members = members.len(), "merge interface");
    Ok(Mutation::Replaced(replacement))
}
