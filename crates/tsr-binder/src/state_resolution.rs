//! Resolution pass: identifiers in reference position.
//!
//! Every reference is looked up through the scope chain recorded by the
//! declaration pass. Hits land in `node_symbols`; type references and
//! heritage expressions also map their own node to the symbol. Misses in
//! non-declaration units are reported as `Cannot find name`.

use crate::state::BinderState;
use crate::symbols::ScopeId;
use tracing::{Level, span, trace};
use tsr_common::Diagnostic;
use tsr_common::diagnostics::diagnostic_messages;
use tsr_core::{SymbolId, UnitId};
use tsr_parser::{Node, NodeArena, NodeIndex};

impl<'a> BinderState<'a> {
    pub(crate) fn resolve_source_file(&mut self, unit_id: UnitId) {
        self.current_unit = unit_id;
        let unit = self.unit();
        let _span = span!(Level::DEBUG, "resolve_source_file", file = %unit.file_name).entered();
        self.resolve_node(unit.root, ScopeId::GLOBAL, false);
    }

    fn resolve_node(&mut self, idx: NodeIndex, scope: ScopeId, in_function: bool) {
        let arena = &self.unit().arena;
        let Some(node) = arena.get(idx) else {
            return;
        };
        let scope = self
            .scope_of
            .get(&self.node_ref(idx))
            .copied()
            .unwrap_or(scope);
        let in_function = match node {
            Node::ArrowFunction(_) => in_function,
            _ if node.kind().is_function_like() => true,
            _ => in_function,
        };

        match node {
            Node::Identifier { text } => {
                if is_reference(arena, idx) {
                    self.resolve_reference(idx, text, scope, in_function);
                }
                return;
            }
            Node::TypeReference { type_name, .. } => {
                if let Some(symbol) = self.resolve_leftmost(*type_name, scope, in_function)
                    && arena.identifier_text(*type_name).is_some()
                {
                    self.node_symbols.insert(self.node_ref(idx), symbol);
                }
            }
            Node::ExpressionWithTypeArguments { expression, .. } => {
                if let Some(symbol) = self.resolve_leftmost(*expression, scope, in_function)
                    && arena.identifier_text(*expression).is_some()
                {
                    self.node_symbols.insert(self.node_ref(idx), symbol);
                }
            }
            _ => {}
        }

        for child in arena.children(idx) {
            match node {
                // Already resolved through the leftmost identifier above.
                Node::TypeReference { type_name, .. } if child == *type_name => {}
                Node::ExpressionWithTypeArguments { expression, .. } if child == *expression => {}
                _ => self.resolve_node(child, scope, in_function),
            }
        }
    }

    /// Resolve the leftmost identifier of an identifier, qualified name or
    /// property access chain.
    fn resolve_leftmost(
        &mut self,
        idx: NodeIndex,
        scope: ScopeId,
        in_function: bool,
    ) -> Option<SymbolId> {
        let arena = &self.unit().arena;
        let mut current = idx;
        loop {
            match arena.get(current)? {
                Node::Identifier { text } => {
                    return self.resolve_reference(current, text, scope, in_function);
                }
                Node::QualifiedName { left, .. } => current = *left,
                Node::PropertyAccess { expression, .. } => current = *expression,
                _ => {
                    self.resolve_node(current, scope, in_function);
                    return None;
                }
            }
        }
    }

    fn resolve_reference(
        &mut self,
        idx: NodeIndex,
        name: &str,
        scope: ScopeId,
        in_function: bool,
    ) -> Option<SymbolId> {
        if let Some(symbol) = self.lookup(scope, name) {
            trace!(name, symbol = symbol.0, "resolved");
            self.node_symbols.insert(self.node_ref(idx), symbol);
            return Some(symbol);
        }
        if (name == "arguments" && in_function) || name == "const" {
            return None;
        }
        let unit = self.unit();
        if !unit.is_declaration_file {
            let range = unit.arena.range(idx);
            self.diagnostics.push(Diagnostic::from_message(
                unit.file_name.clone(),
                range.pos,
                range.end.saturating_sub(range.pos),
                &diagnostic_messages::CANNOT_FIND_NAME,
                &[name],
            ));
        }
        None
    }
}

/// Whether the identifier at `idx` refers to a binding rather than naming a
/// declaration, a property or a label.
fn is_reference(arena: &NodeArena, idx: NodeIndex) -> bool {
    let parent = arena.parent(idx);
    let Some(parent_node) = arena.get(parent) else {
        return true;
    };
    match parent_node {
        Node::ShorthandPropertyAssignment { .. } => true,
        Node::PropertyAccess { name, .. } => *name != idx,
        Node::QualifiedName { right, .. } => *right != idx,
        Node::BindingElement { property_name, .. } if *property_name == idx => false,
        Node::ImportSpecifier { .. } | Node::ExportSpecifier { .. } => false,
        Node::Break { .. } | Node::Continue { .. } => false,
        other => other.name() != Some(idx),
    }
}
