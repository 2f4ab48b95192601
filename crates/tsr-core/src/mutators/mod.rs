//! Node-kind-scoped rewrite rules of the second pass.
//!
//! Every mutator is registered against the node kinds it rewrites. For a
//! given node the applicable mutators run in registration order; a mutator
//! sees the result of the ones before it and is not called once the node
//! has been marked as skipped.

mod binary_expression;
mod class_declaration;
mod function_like;
mod interface_declaration;
mod return_statement;
mod source_file;
mod type_alias_declaration;
mod variable_declaration_list;

use crate::context::MutationContext;
use crate::error::Result;
use crate::scanner::DeclarationRecord;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tsr_emitter::print_node;
use tsr_parser::{ModifierFlags, NodeIndex, NodeKind};

/// Outcome of one mutator call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    Unchanged,
    /// The node is replaced by a node built during the pass.
    Replaced(NodeIndex),
    /// The node is removed from its parent.
    Deleted,
}

pub type Mutator = fn(NodeIndex, &mut MutationContext<'_, '_>) -> Result<Mutation>;

/// Registration order. A kind's mutators run in the order they appear here.
static ORDER: &[(NodeKind, Mutator)] = &[
    (
        NodeKind::VariableDeclarationList,
        variable_declaration_list::mutate,
    ),
    (NodeKind::Binary, binary_expression::mutate),
    (
        NodeKind::InterfaceDeclaration,
        interface_declaration::mutate,
    ),
    (
        NodeKind::TypeAliasDeclaration,
        type_alias_declaration::mutate,
    ),
    (NodeKind::ClassDeclaration, class_declaration::mutate),
    (NodeKind::FunctionDeclaration, function_like::mutate),
    (NodeKind::FunctionExpression, function_like::mutate),
    (NodeKind::ArrowFunction, function_like::mutate),
    (NodeKind::MethodDeclaration, function_like::mutate),
    (NodeKind::Constructor, function_like::mutate),
    (NodeKind::GetAccessor, function_like::mutate),
    (NodeKind::SetAccessor, function_like::mutate),
    (NodeKind::Return, return_statement::mutate),
    (NodeKind::SourceFile, source_file::mutate),
];

static REGISTRY: Lazy<FxHashMap<NodeKind, SmallVec<[Mutator; 2]>>> = Lazy::new(|| {
    let mut registry: FxHashMap<NodeKind, SmallVec<[Mutator; 2]>> = FxHashMap::default();
    for &(kind, mutator) in ORDER {
        registry.entry(kind).or_default().push(mutator);
    }
    registry
});

/// Mutators registered for `kind`, in order.
pub fn mutators_for(kind: NodeKind) -> &'static [Mutator] {
    REGISTRY.get(&kind).map_or(&[], |mutators| mutators.as_slice())
}

/// Bind `t.type("Name", body)` to a `const` in place of an interface or
/// type alias declared with `modifiers`, and record the binding for the
/// declarations artifact. Returns the statement (or statement group) that
/// replaces the declaration, already skipped.
fn bind_type_declaration(
    ctx: &mut MutationContext<'_, '_>,
    name: &str,
    modifiers: ModifierFlags,
    body: NodeIndex,
) -> NodeIndex {
    let descriptor = ctx.factory().type_declaration(name, body);
    let record = DeclarationRecord {
        name: name.to_string(),
        unit: ctx.unit(),
        lib_name: ctx.lib_name().to_string(),
        expression: print_node(ctx.arena(), descriptor),
    };
    ctx.scanner().record_declaration(record);

    let is_default = modifiers.contains(ModifierFlags::DEFAULT);
    let statement_modifiers = if modifiers.contains(ModifierFlags::EXPORT) && !is_default {
        ModifierFlags::EXPORT
    } else {
        ModifierFlags::empty()
    };
    let mut factory = ctx.factory();
    let statement = factory.const_statement(statement_modifiers, name, descriptor);
    let replacement = if is_default {
        let export = factory.export_default(name);
        factory.statement_group(vec![statement, export])
    } else {
        statement
    };
    ctx.skip(replacement, true, &[]);
    replacement
}
