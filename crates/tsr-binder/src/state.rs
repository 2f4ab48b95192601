//! Binder state shared by the declaration and resolution passes.
//!
//! A program is bound in four steps:
//! 1. every unit declares its symbols into lexical scopes (`state_binding`)
//! 2. module exports are collected and re-exports followed (`state_import_export`)
//! 3. import bindings are pointed at the symbols they import
//! 4. every identifier in reference position is resolved (`state_resolution`)
//!
//! Script units share the global scope; module units get a scope of their own
//! under it.

use crate::globals::builtin_globals;
use crate::symbols::{
    ContainerKind, Scope, ScopeId, SymbolArena, can_merge_flags, is_block_scoped_conflict,
};
use rustc_hash::FxHashMap;
use tracing::{Level, debug, span, trace};
use tsr_common::Diagnostic;
use tsr_common::diagnostics::diagnostic_messages;
use tsr_core::{NodeRef, SourceUnit, SymbolFlags, SymbolId, UnitId};
use tsr_parser::{ModifierFlags, Node, NodeIndex};

/// Everything the binder learned about a program.
#[derive(Debug, Default)]
pub struct BindResult {
    pub symbols: SymbolArena,
    pub scopes: Vec<Scope>,
    /// Scope opened by a container node.
    pub scope_of: FxHashMap<NodeRef, ScopeId>,
    /// Declarations, declaration names and resolved references.
    pub node_symbols: FxHashMap<NodeRef, SymbolId>,
    /// Exported names of every unit; empty for scripts.
    pub exports: Vec<FxHashMap<String, SymbolId>>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone, Debug)]
pub(crate) enum ImportKind {
    Default,
    Named(String),
    Namespace,
}

#[derive(Clone, Debug)]
pub(crate) struct PendingImport {
    pub(crate) symbol: SymbolId,
    pub(crate) target: UnitId,
    pub(crate) kind: ImportKind,
}

#[derive(Clone, Debug)]
pub(crate) enum ExportSource {
    /// `export { local as exported }` or `export default local`.
    Local(String),
    /// `export { name as exported } from "./m"`.
    Reexport { target: UnitId, name: String },
    /// `export * from "./m"`.
    All(UnitId),
}

#[derive(Clone, Debug)]
pub(crate) struct PendingExport {
    pub(crate) unit: UnitId,
    pub(crate) exported: String,
    pub(crate) source: ExportSource,
}

pub struct BinderState<'a> {
    pub(crate) units: &'a [SourceUnit],
    pub(crate) module_targets: &'a FxHashMap<NodeRef, UnitId>,
    pub(crate) symbols: SymbolArena,
    pub(crate) scopes: Vec<Scope>,
    pub(crate) scope_of: FxHashMap<NodeRef, ScopeId>,
    pub(crate) node_symbols: FxHashMap<NodeRef, SymbolId>,
    pub(crate) exports: Vec<FxHashMap<String, SymbolId>>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) pending_imports: Vec<PendingImport>,
    pub(crate) pending_exports: Vec<PendingExport>,
    pub(crate) current_unit: UnitId,
    pub(crate) current_scope: ScopeId,
}

impl<'a> BinderState<'a> {
    pub fn new(units: &'a [SourceUnit], module_targets: &'a FxHashMap<NodeRef, UnitId>) -> Self {
        let mut state = BinderState {
            units,
            module_targets,
            symbols: SymbolArena::new(),
            scopes: vec![Scope::new(ContainerKind::Global, None, None)],
            scope_of: FxHashMap::default(),
            node_symbols: FxHashMap::default(),
            exports: vec![FxHashMap::default(); units.len()],
            diagnostics: Vec::new(),
            pending_imports: Vec::new(),
            pending_exports: Vec::new(),
            current_unit: UnitId(0),
            current_scope: ScopeId::GLOBAL,
        };
        for (name, flags) in builtin_globals() {
            let id = state.symbols.alloc(flags, name);
            state.scopes[ScopeId::GLOBAL.index()]
                .table
                .insert(name.to_string(), id);
        }
        state
    }

    /// Run every binding step over all units.
    pub fn bind_program(mut self) -> BindResult {
        let _span = span!(Level::DEBUG, "bind_program", units = self.units.len()).entered();

        for index in 0..self.units.len() {
            self.bind_source_file(UnitId(index as u32));
        }
        self.resolve_exports();
        self.resolve_imports();
        for index in 0..self.units.len() {
            self.resolve_source_file(UnitId(index as u32));
        }

        debug!(
            symbols = self.symbols.len(),
            scopes = self.scopes.len(),
            diagnostics = self.diagnostics.len(),
            "program bound"
        );
        BindResult {
            symbols: self.symbols,
            scopes: self.scopes,
            scope_of: self.scope_of,
            node_symbols: self.node_symbols,
            exports: self.exports,
            diagnostics: self.diagnostics,
        }
    }

    pub(crate) fn unit(&self) -> &'a SourceUnit {
        &self.units[self.current_unit.index()]
    }

    pub(crate) fn node_ref(&self, node: NodeIndex) -> NodeRef {
        NodeRef::new(self.current_unit, node)
    }

    /// Whether a unit has top-level imports or exports.
    pub(crate) fn is_module(unit: &SourceUnit) -> bool {
        let Some(Node::SourceFile { statements }) = unit.node(unit.root) else {
            return false;
        };
        statements.iter().any(|&statement| match unit.node(statement) {
            Some(
                Node::ImportDeclaration { .. }
                | Node::ExportDeclaration { .. }
                | Node::ExportAssignment { .. },
            ) => true,
            Some(node) => node.modifiers().contains(ModifierFlags::EXPORT),
            None => false,
        })
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    pub(crate) fn enter_scope(&mut self, kind: ContainerKind, node: NodeIndex) {
        let container = self.node_ref(node);
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes
            .push(Scope::new(kind, Some(self.current_scope), Some(container)));
        self.scope_of.insert(container, id);
        self.current_scope = id;
    }

    pub(crate) fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current_scope.index()].parent {
            self.current_scope = parent;
        }
    }

    /// Nearest scope that receives `var` declarations.
    pub(crate) fn function_scope(&self) -> ScopeId {
        let mut scope = self.current_scope;
        loop {
            let current = &self.scopes[scope.index()];
            if current.kind.is_function_scope() {
                return scope;
            }
            match current.parent {
                Some(parent) => scope = parent,
                None => return scope,
            }
        }
    }

    /// Look `name` up through `scope` and its ancestors.
    pub(crate) fn lookup(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.index()];
            if let Some(&symbol) = scope.table.get(name) {
                return Some(symbol);
            }
            current = scope.parent;
        }
        None
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Declare `name` in `scope`, merging with an existing symbol when the
    /// meanings allow it.
    ///
    /// A conflicting block-scoped declaration is reported at `name_node` and
    /// still recorded on the existing symbol, so later references resolve to
    /// the first declaration.
    pub(crate) fn declare_symbol(
        &mut self,
        scope: ScopeId,
        name: &str,
        flags: SymbolFlags,
        declaration: NodeIndex,
        name_node: NodeIndex,
    ) -> SymbolId {
        let declaration_ref = self.node_ref(declaration);
        let existing = self.scopes[scope.index()].table.get(name).copied();

        let id = match existing {
            Some(existing) => {
                let existing_flags = self
                    .symbols
                    .get(existing)
                    .map(|symbol| symbol.flags)
                    .unwrap_or_default();
                if existing_flags.contains(SymbolFlags::BUILTIN) {
                    // Program declarations of a builtin name replace it.
                    let id = self.symbols.alloc(SymbolFlags::empty(), name);
                    self.scopes[scope.index()].table.insert(name.to_string(), id);
                    id
                } else if can_merge_flags(existing_flags, flags) {
                    trace!(name, "merged declaration");
                    existing
                } else {
                    if is_block_scoped_conflict(existing_flags, flags) {
                        self.report_redeclaration(name, name_node);
                    }
                    self.record_conflict(existing, declaration_ref);
                    self.node_symbols.insert(declaration_ref, existing);
                    self.node_symbols.insert(self.node_ref(name_node), existing);
                    return existing;
                }
            }
            None => {
                let id = self.symbols.alloc(SymbolFlags::empty(), name);
                self.scopes[scope.index()].table.insert(name.to_string(), id);
                id
            }
        };

        self.symbols.add_declaration(id, flags, declaration_ref);
        self.node_symbols.insert(declaration_ref, id);
        self.node_symbols.insert(self.node_ref(name_node), id);
        id
    }

    /// A symbol that lives in no scope, such as a class member.
    pub(crate) fn declare_member(
        &mut self,
        name: &str,
        flags: SymbolFlags,
        declaration: NodeIndex,
        name_node: NodeIndex,
    ) -> SymbolId {
        let declaration_ref = self.node_ref(declaration);
        let id = self.symbols.alloc(SymbolFlags::empty(), name);
        self.symbols.add_declaration(id, flags, declaration_ref);
        self.node_symbols.insert(declaration_ref, id);
        self.node_symbols.insert(self.node_ref(name_node), id);
        id
    }

    fn record_conflict(&mut self, existing: SymbolId, declaration: NodeRef) {
        if let Some(symbol) = self.symbols.get_mut(existing)
            && !symbol.declarations.contains(&declaration)
        {
            symbol.declarations.push(declaration);
        }
    }

    fn report_redeclaration(&mut self, name: &str, name_node: NodeIndex) {
        let unit = self.unit();
        if unit.is_declaration_file {
            return;
        }
        let range = unit.arena.range(name_node);
        self.diagnostics.push(Diagnostic::from_message(
            unit.file_name.clone(),
            range.pos,
            range.end.saturating_sub(range.pos),
            &diagnostic_messages::CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE,
            &[name],
        ));
    }

    /// Add `symbol` to the current unit's exports.
    pub(crate) fn export_symbol(&mut self, exported: &str, symbol: SymbolId) {
        self.exports[self.current_unit.index()].insert(exported.to_string(), symbol);
    }
}
