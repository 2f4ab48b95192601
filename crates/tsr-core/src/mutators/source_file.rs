//! Import the runtime library into units that use it.

use super::Mutation;
use crate::context::MutationContext;
use crate::error::Result;
use tracing::trace;
use tsr_parser::{Node, NodeIndex, NodeList};

pub(super) fn mutate(node: NodeIndex, ctx: &mut MutationContext<'_, '_>) -> Result<Mutation> {
    if !ctx.lib_binding().used {
        return Ok(Mutation::Unchanged);
    }
    let Some(Node::SourceFile { statements }) = ctx.arena().get(node).cloned() else {
        return Ok(Mutation::Unchanged);
    };

    let name = ctx.lib_name().to_string();
    let module = ctx.options().lib_module.clone();
    let import = ctx.factory().import_default(&name, &module);
    ctx.skip(import, true, &[]);

    let mut rewritten = Vec::with_capacity(statements.len() + 1);
    rewritten.push(import);
    rewritten.extend(statements.iter().copied());
    ctx.arena_mut().replace(
        node,
        Node::SourceFile {
            statements: NodeList::from_vec(rewritten),
        },
    );
    ctx.arena_mut().set_parent(import, node);
    ctx.skip(node, false, &[]);
    trace!(lib = %name, %module, "import runtime library");
    Ok(Mutation::Unchanged)
}
