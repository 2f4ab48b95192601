//! Import bindings and module exports.
//!
//! Imports declare `ALIAS` symbols in the importing unit's scope. Once every
//! unit is declared, exports are collected per unit and each alias is pointed
//! at the export it names. Imports of external modules keep no target.

use crate::state::{BinderState, ExportSource, ImportKind, PendingExport, PendingImport};
use tracing::trace;
use tsr_core::{NodeRef, SymbolFlags, SymbolId, UnitId};
use tsr_parser::{Node, NodeIndex};

/// Upper bound on re-export chain passes.
const MAX_EXPORT_PASSES: usize = 64;

impl<'a> BinderState<'a> {
    pub(crate) fn bind_import_declaration(&mut self, idx: NodeIndex) {
        let arena = &self.unit().arena;
        let Some(Node::ImportDeclaration { import_clause, .. }) = arena.get(idx) else {
            return;
        };
        let target = self.module_targets.get(&self.node_ref(idx)).copied();
        let Some(Node::ImportClause {
            name,
            named_bindings,
        }) = arena.get(*import_clause)
        else {
            return;
        };

        if let Some(text) = arena.identifier_text(*name) {
            self.declare_import(text, *import_clause, *name, target, ImportKind::Default);
        }
        match arena.get(*named_bindings) {
            Some(Node::NamespaceImport { name }) => {
                if let Some(text) = arena.identifier_text(*name) {
                    let kind = ImportKind::Namespace;
                    self.declare_import(text, *named_bindings, *name, target, kind);
                }
            }
            Some(Node::NamedImports { elements }) => {
                for &specifier in elements {
                    let Some(Node::ImportSpecifier {
                        property_name,
                        name,
                    }) = arena.get(specifier)
                    else {
                        continue;
                    };
                    let Some(local) = arena.identifier_text(*name) else {
                        continue;
                    };
                    let imported = arena.property_name_text(*property_name).unwrap_or(local);
                    self.declare_import(
                        local,
                        specifier,
                        *name,
                        target,
                        ImportKind::Named(imported.to_string()),
                    );
                }
            }
            _ => {}
        }
    }

    fn declare_import(
        &mut self,
        local: &str,
        declaration: NodeIndex,
        name: NodeIndex,
        target: Option<UnitId>,
        kind: ImportKind,
    ) {
        let scope = self.current_scope;
        let symbol = self.declare_symbol(scope, local, SymbolFlags::ALIAS, declaration, name);
        if let Some(target) = target {
            self.pending_imports.push(PendingImport {
                symbol,
                target,
                kind,
            });
        }
    }

    pub(crate) fn bind_export_declaration(&mut self, idx: NodeIndex) {
        let arena = &self.unit().arena;
        let Some(Node::ExportDeclaration {
            export_clause,
            module_specifier,
        }) = arena.get(idx)
        else {
            return;
        };
        let unit = self.current_unit;
        let target = self.module_targets.get(&self.node_ref(idx)).copied();

        let Some(Node::NamedExports { elements }) = arena.get(*export_clause) else {
            if let Some(target) = target {
                self.pending_exports.push(PendingExport {
                    unit,
                    exported: String::new(),
                    source: ExportSource::All(target),
                });
            }
            return;
        };

        for &specifier in elements {
            let Some(Node::ExportSpecifier {
                property_name,
                name,
            }) = arena.get(specifier)
            else {
                continue;
            };
            let Some(exported) = arena.property_name_text(*name) else {
                continue;
            };
            let local = arena.property_name_text(*property_name).unwrap_or(exported);
            if module_specifier.is_some() {
                if let Some(target) = target {
                    self.pending_exports.push(PendingExport {
                        unit,
                        exported: exported.to_string(),
                        source: ExportSource::Reexport {
                            target,
                            name: local.to_string(),
                        },
                    });
                }
            } else {
                self.queue_local_export(exported, local);
            }
        }
    }

    pub(crate) fn queue_local_export(&mut self, exported: &str, local: &str) {
        self.pending_exports.push(PendingExport {
            unit: self.current_unit,
            exported: exported.to_string(),
            source: ExportSource::Local(local.to_string()),
        });
    }

    /// Settle every queued export; re-export chains are followed until
    /// nothing changes.
    pub(crate) fn resolve_exports(&mut self) {
        let pending = std::mem::take(&mut self.pending_exports);
        for _ in 0..MAX_EXPORT_PASSES {
            let mut changed = false;
            for export in &pending {
                changed |= self.apply_export(export);
            }
            if !changed {
                break;
            }
        }
    }

    fn apply_export(&mut self, export: &PendingExport) -> bool {
        let table = export.unit.index();
        match &export.source {
            ExportSource::Local(local) => {
                let Some(symbol) = self.module_scope_lookup(export.unit, local) else {
                    return false;
                };
                self.insert_export(table, &export.exported, symbol)
            }
            ExportSource::Reexport { target, name } => {
                let Some(&symbol) = self.exports[target.index()].get(name) else {
                    return false;
                };
                self.insert_export(table, &export.exported, symbol)
            }
            ExportSource::All(target) => {
                let entries: Vec<(String, SymbolId)> = self.exports[target.index()]
                    .iter()
                    .filter(|(name, _)| name.as_str() != "default")
                    .map(|(name, &symbol)| (name.clone(), symbol))
                    .collect();
                let mut changed = false;
                for (name, symbol) in entries {
                    if !self.exports[table].contains_key(&name) {
                        changed |= self.insert_export(table, &name, symbol);
                    }
                }
                changed
            }
        }
    }

    fn insert_export(&mut self, table: usize, exported: &str, symbol: SymbolId) -> bool {
        let previous = self.exports[table].insert(exported.to_string(), symbol);
        previous != Some(symbol)
    }

    fn module_scope_lookup(&self, unit: UnitId, name: &str) -> Option<SymbolId> {
        let root = self.units[unit.index()].root;
        let scope = self.scope_of.get(&NodeRef::new(unit, root))?;
        self.lookup(*scope, name)
    }

    pub(crate) fn resolve_imports(&mut self) {
        for import in std::mem::take(&mut self.pending_imports) {
            let exports = &self.exports[import.target.index()];
            let target = match &import.kind {
                ImportKind::Default => exports.get("default").copied(),
                ImportKind::Named(name) => exports.get(name).copied(),
                ImportKind::Namespace => None,
            };
            trace!(kind = ?import.kind, resolved = target.is_some(), "import binding");
            if let Some(symbol) = self.symbols.get_mut(import.symbol) {
                symbol.alias_target = target;
            }
        }
    }
}
