//! `Program`: a loaded and bound set of units answering semantic queries.

use crate::loader::load_program;
use crate::options::check_options;
use crate::state::{BindResult, BinderState};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span};
use tsr_common::{CompilerOptions, Diagnostic};
use tsr_core::{
    NodeRef, ResolvedType, SemanticModel, SourceUnit, SymbolFlags, SymbolId, SymbolInfo, UnitId,
};
use tsr_emitter::print_node;
use tsr_parser::{Node, NodeKind};
use tsr_scanner::SyntaxKind;

/// Alias chains and type alias chains longer than this are treated as open.
const MAX_CHAIN_DEPTH: usize = 32;

pub struct Program {
    units: Vec<SourceUnit>,
    bound: BindResult,
    diagnostics: Vec<Diagnostic>,
    /// Answer for symbol ids this program never issued.
    unknown_symbol: SymbolInfo,
}

impl Program {
    /// Load every file reachable from `roots` and bind them.
    pub fn new(roots: &[PathBuf], options: &CompilerOptions) -> Program {
        let _span = span!(Level::DEBUG, "create_program", roots = roots.len()).entered();

        let mut diagnostics = check_options(options);
        let root_dir = options.root_dir.as_deref().map(Path::new);
        let loaded = load_program(roots, root_dir);
        diagnostics.extend(loaded.diagnostics);

        let mut bound = BinderState::new(&loaded.units, &loaded.module_targets).bind_program();
        diagnostics.append(&mut bound.diagnostics);

        let declaration_files: FxHashSet<&str> = loaded
            .units
            .iter()
            .filter(|unit| unit.is_declaration_file)
            .map(|unit| unit.file_name.as_str())
            .collect();
        diagnostics.retain(|diag| !declaration_files.contains(diag.file.as_str()));

        debug!(
            units = loaded.units.len(),
            diagnostics = diagnostics.len(),
            "program created"
        );
        Program {
            units: loaded.units,
            bound,
            diagnostics,
            unknown_symbol: SymbolInfo::default(),
        }
    }

    /// Exported names of a module unit.
    pub fn exports_of(&self, unit: UnitId) -> Option<&FxHashMap<String, SymbolId>> {
        self.bound.exports.get(unit.index())
    }

    pub fn symbol_count(&self) -> usize {
        self.bound.symbols.len()
    }

    /// The declared type of a variable-like declaration.
    fn declared_type(&self, declaration: NodeRef) -> Option<NodeRef> {
        let annotation = match self.node(declaration)? {
            node @ (Node::VariableDeclaration { .. }
            | Node::Parameter { .. }
            | Node::PropertyDeclaration { .. }
            | Node::PropertySignature { .. }) => node.annotation()?,
            _ => return None,
        };
        Some(NodeRef::new(declaration.unit, annotation))
    }

    fn resolved_type(&self, type_node: NodeRef) -> ResolvedType {
        let arena = &self.unit(type_node.unit).arena;
        ResolvedType {
            text: print_node(arena, type_node.node),
            is_any: self.is_any_type(type_node, 0),
            type_node: Some(type_node),
        }
    }

    /// `any`, possibly parenthesized or behind non-generic type aliases.
    fn is_any_type(&self, type_node: NodeRef, depth: usize) -> bool {
        if depth > MAX_CHAIN_DEPTH {
            return true;
        }
        match self.node(type_node) {
            Some(Node::KeywordType {
                keyword: SyntaxKind::AnyKeyword,
            }) => true,
            Some(Node::ParenthesizedType { type_node: inner }) => {
                self.is_any_type(NodeRef::new(type_node.unit, *inner), depth + 1)
            }
            Some(Node::TypeReference {
                type_arguments: None,
                ..
            }) => {
                let Some(symbol) = self.symbol_at(type_node).map(|id| self.resolve_alias(id)) else {
                    return false;
                };
                let info = self.symbol(symbol);
                if !info.has_any(SymbolFlags::TYPE_ALIAS) || info.has_any(SymbolFlags::INTERFACE) {
                    return false;
                }
                info.declarations.iter().any(|&decl| match self.node(decl) {
                    Some(Node::TypeAliasDeclaration {
                        type_parameters: None,
                        type_node: aliased,
                        ..
                    }) => self.is_any_type(NodeRef::new(decl.unit, *aliased), depth + 1),
                    _ => false,
                })
            }
            _ => false,
        }
    }

    fn member_name(&self, member: NodeRef) -> Option<&str> {
        let name = self.node(member)?.name()?;
        self.unit(member.unit).arena.property_name_text(name)
    }

    fn collect_apparent(&self, symbol: SymbolId, visited: &mut FxHashSet<SymbolId>) -> Vec<NodeRef> {
        if !visited.insert(symbol) {
            return Vec::new();
        }
        let mut members = self.declared_members(symbol);
        let mut names: FxHashSet<String> = members
            .iter()
            .filter_map(|&member| self.member_name(member))
            .map(str::to_string)
            .collect();

        for base in self.base_symbols(symbol) {
            for inherited in self.collect_apparent(base, visited) {
                if self.node(inherited).map(Node::kind) == Some(NodeKind::Constructor) {
                    continue;
                }
                match self.member_name(inherited) {
                    Some(name) if names.contains(name) => {}
                    Some(name) => {
                        names.insert(name.to_string());
                        members.push(inherited);
                    }
                    None => members.push(inherited),
                }
            }
        }
        members
    }

    /// Classes and interfaces named in `extends` clauses of `symbol`.
    fn base_symbols(&self, symbol: SymbolId) -> Vec<SymbolId> {
        let mut bases = Vec::new();
        for &decl in &self.symbol(symbol).declarations {
            let Some(data) = self.node(decl).and_then(Node::class_like_data) else {
                continue;
            };
            let arena = &self.unit(decl.unit).arena;
            for &clause in &data.heritage_clauses {
                let Some(Node::HeritageClause {
                    token: SyntaxKind::ExtendsKeyword,
                    types,
                }) = arena.get(clause)
                else {
                    continue;
                };
                for &ty in types {
                    let Some(base) = self
                        .symbol_at(NodeRef::new(decl.unit, ty))
                        .map(|id| self.resolve_alias(id))
                    else {
                        continue;
                    };
                    if self
                        .symbol(base)
                        .has_any(SymbolFlags::CLASS | SymbolFlags::INTERFACE)
                        && !bases.contains(&base)
                    {
                        bases.push(base);
                    }
                }
            }
        }
        bases
    }

    /// Whether a class member without a body shares its name and kind with
    /// the member at `node`.
    fn has_bodiless_sibling(&self, node: NodeRef, kind: NodeKind) -> bool {
        let arena = &self.unit(node.unit).arena;
        let Some(data) = arena.get(arena.parent(node.node)).and_then(Node::class_like_data) else {
            return false;
        };
        let name = self.member_name(node);
        data.members.iter().any(|&member| {
            let sibling = NodeRef::new(node.unit, member);
            member != node.node
                && arena.kind(member) == Some(kind)
                && self.member_name(sibling) == name
                && arena
                    .get(member)
                    .and_then(Node::function_data)
                    .is_some_and(|func| func.body.is_none())
        })
    }
}

impl SemanticModel for Program {
    fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.clone()
    }

    fn symbol_at(&self, node: NodeRef) -> Option<SymbolId> {
        self.bound.node_symbols.get(&node).copied()
    }

    fn symbol(&self, id: SymbolId) -> &SymbolInfo {
        self.bound.symbols.get(id).unwrap_or(&self.unknown_symbol)
    }

    fn resolve_alias(&self, id: SymbolId) -> SymbolId {
        let mut current = id;
        for _ in 0..MAX_CHAIN_DEPTH {
            let info = self.symbol(current);
            match info.alias_target {
                Some(target) if info.has_any(SymbolFlags::ALIAS) => current = target,
                _ => break,
            }
        }
        current
    }

    fn type_at(&self, node: NodeRef) -> Option<ResolvedType> {
        let current = self.node(node)?;
        let type_node = if current.kind().is_type_node() {
            node
        } else if let Node::Identifier { .. } = current {
            let symbol = self.resolve_alias(self.symbol_at(node)?);
            let info = self.symbol(symbol);
            let declaration = info.value_declaration.or(info.declarations.first().copied())?;
            self.declared_type(declaration)?
        } else {
            NodeRef::new(node.unit, current.annotation()?)
        };
        Some(self.resolved_type(type_node))
    }

    fn is_implementation_of_overload(&self, node: NodeRef) -> bool {
        let Some(current) = self.node(node) else {
            return false;
        };
        if !current
            .function_data()
            .is_some_and(|func| func.body.is_some())
        {
            return false;
        }
        match current {
            Node::FunctionDeclaration(_) => {
                let Some(symbol) = self.symbol_at(node) else {
                    return false;
                };
                self.symbol(symbol).declarations.iter().any(|&decl| {
                    decl != node
                        && matches!(
                            self.node(decl),
                            Some(Node::FunctionDeclaration(func)) if func.body.is_none()
                        )
                })
            }
            Node::MethodDeclaration(_) | Node::Constructor(_) => {
                self.has_bodiless_sibling(node, current.kind())
            }
            _ => false,
        }
    }

    fn declared_members(&self, symbol: SymbolId) -> Vec<NodeRef> {
        self.symbol(symbol)
            .declarations
            .iter()
            .filter_map(|&decl| {
                let data = self.node(decl)?.class_like_data()?;
                Some(
                    data.members
                        .iter()
                        .map(move |&member| NodeRef::new(decl.unit, member)),
                )
            })
            .flatten()
            .collect()
    }

    fn apparent_members(&self, symbol: SymbolId) -> Vec<NodeRef> {
        self.collect_apparent(symbol, &mut FxHashSet::default())
    }
}
