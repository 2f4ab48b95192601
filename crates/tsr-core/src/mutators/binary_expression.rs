//! Checked assignments: `x = e` becomes `x = _xType.assert(e)`.

use super::Mutation;
use crate::context::MutationContext;
use crate::error::Result;
use tsr_parser::{Node, NodeIndex};
use tsr_scanner::SyntaxKind;

const ASSIGNMENT_OPERATORS: &[SyntaxKind] = &[
    SyntaxKind::EqualsToken,
    SyntaxKind::PlusEqualsToken,
    SyntaxKind::MinusEqualsToken,
    SyntaxKind::AsteriskAsteriskEqualsToken,
    SyntaxKind::AsteriskEqualsToken,
    SyntaxKind::SlashEqualsToken,
    SyntaxKind::PercentEqualsToken,
    SyntaxKind::AmpersandEqualsToken,
    SyntaxKind::BarEqualsToken,
    SyntaxKind::CaretEqualsToken,
    SyntaxKind::LessThanLessThanEqualsToken,
    SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
    SyntaxKind::GreaterThanGreaterThanEqualsToken,
];

pub(super) fn mutate(node: NodeIndex, ctx: &mut MutationContext<'_, '_>) -> Result<Mutation> {
    let Some(&Node::Binary {
        left,
        operator,
        right,
    }) = ctx.arena().get(node)
    else {
        return Ok(Mutation::Unchanged);
    };
    if !ASSIGNMENT_OPERATORS.contains(&operator) {
        return Ok(Mutation::Unchanged);
    }
    let Some(name) = ctx.arena().identifier_text(left).map(str::to_string) else {
        return Ok(Mutation::Unchanged);
    };
    if ctx.is_open_type(left) || !ctx.has_type_binding(left) {
        return Ok(Mutation::Unchanged);
    }

    let type_name = ctx.type_declaration_name(&name);
    let checked = ctx.factory().type_assertion(&type_name, right);
    let replacement = ctx.arena_mut().add_synthesized(Node::Binary {
        left,
        operator,
        right: checked,
    });
    ctx.skip(replacement, true, &[right]);
    Ok(Mutation::Replaced(replacement))
}
