//! Checked variable initializers.
//!
//! `const x: T = e` becomes `const x: T = <T>.assert(e)`.
//! `let x: T = e` becomes `let _xType = <T>, x: T = _xType.assert(e)`, so
//! that later assignments to `x` can reuse the descriptor.

use super::Mutation;
use crate::context::{MutationContext, is_guarded_declaration_list};
use crate::error::Result;
use crate::reflect::reflect_annotation;
use tracing::trace;
use tsr_parser::{Node, NodeIndex, NodeList, VariableKind};

pub(super) fn mutate(node: NodeIndex, ctx: &mut MutationContext<'_, '_>) -> Result<Mutation> {
    let Some(Node::VariableDeclarationList { kind, declarations }) = ctx.arena().get(node).cloned()
    else {
        return Ok(Mutation::Unchanged);
    };
    if !is_guarded_declaration_list(ctx.arena(), node) {
        return Ok(Mutation::Unchanged);
    }

    let mut rewritten = Vec::with_capacity(declarations.len());
    let mut changed = false;
    let mut excluded = Vec::new();
    for &declaration in &declarations {
        let Some(Node::VariableDeclaration {
            name,
            type_annotation,
            initializer,
        }) = ctx.arena().get(declaration).cloned()
        else {
            rewritten.push(declaration);
            continue;
        };
        let Some(name_text) = ctx.arena().identifier_text(name).map(str::to_string) else {
            rewritten.push(declaration);
            continue;
        };
        if type_annotation.is_none() || ctx.is_open_type(declaration) {
            rewritten.push(declaration);
            continue;
        }
        let Some(ty) = ctx.model_ref(type_annotation) else {
            rewritten.push(declaration);
            continue;
        };
        changed = true;

        if kind == VariableKind::Const {
            let checked = if initializer.is_some() {
                let reflection = reflect_annotation(ctx, ty);
                excluded.push(initializer);
                ctx.factory().assert(reflection, initializer)
            } else {
                initializer
            };
            rewritten.push(ctx.arena_mut().add_synthesized(Node::VariableDeclaration {
                name,
                type_annotation,
                initializer: checked,
            }));
            continue;
        }

        let type_name = ctx.type_declaration_name(&name_text);
        let reflection = reflect_annotation(ctx, ty);
        let descriptor =
            ctx.factory()
                .variable_declaration(&type_name, NodeIndex::NONE, reflection);
        let checked = if initializer.is_some() {
            excluded.push(initializer);
            ctx.factory().type_assertion(&type_name, initializer)
        } else {
            initializer
        };
        trace!(name = %name_text, descriptor = %type_name, "guard variable");
        rewritten.push(descriptor);
        rewritten.push(ctx.arena_mut().add_synthesized(Node::VariableDeclaration {
            name,
            type_annotation,
            initializer: checked,
        }));
    }

    if !changed {
        return Ok(Mutation::Unchanged);
    }
    let list = ctx
        .arena_mut()
        .add_synthesized(Node::VariableDeclarationList {
            kind,
            declarations: NodeList::from_vec(rewritten),
        });
    ctx.skip(list, true, &excluded);
    Ok(Mutation::Replaced(list))
}
