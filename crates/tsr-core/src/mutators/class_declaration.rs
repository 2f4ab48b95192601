//! `class C {}` is followed by `t.annotate(C, t.class("C", t.object(..)))`
//! when annotations are enabled.

use super::Mutation;
use crate::context::MutationContext;
use crate::error::Result;
use crate::reflect::reflect_object;
use tracing::trace;
use tsr_parser::{ModifierFlags, Node, NodeIndex};

pub(super) fn mutate(node: NodeIndex, ctx: &mut MutationContext<'_, '_>) -> Result<Mutation> {
    if !ctx.options().annotate {
        return Ok(Mutation::Unchanged);
    }
    let Some(Node::ClassDeclaration(data)) = ctx.arena().get(node) else {
        return Ok(Mutation::Unchanged);
    };
    if data.modifiers.contains(ModifierFlags::DECLARE) {
        return Ok(Mutation::Unchanged);
    }
    let Some(name) = ctx.arena().identifier_text(data.name).map(str::to_string) else {
        return Ok(Mutation::Unchanged);
    };

    let members = ctx.all_members_of(node);
    let object = reflect_object(ctx, &members);
    let mut factory = ctx.factory();
    let label = factory.string(&name);
    let descriptor = factory.lib_call("class", vec![label, object]);
    let annotation = factory.annotate(&name, descriptor);
    let statement = factory.expression_statement(annotation);
    let group = factory.statement_group(vec![node, statement]);

    ctx.skip(node, false, &[]);
    ctx.skip(statement, true, &[]);
    ctx.skip(group, false, &[]);
    trace!(%name, members = members.len(), "annotate class");
    Ok(Mutation::Replaced(group))
}
