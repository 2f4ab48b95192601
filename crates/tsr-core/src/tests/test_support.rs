//! A syntax-only `SemanticModel` for exercising the passes without a binder.
//!
//! Symbols are resolved by name within a unit: every interface, type alias,
//! class, function, variable and parameter declares its name, and an
//! identifier or type reference resolves to the first declaration of that
//! name. Declared types are read straight from annotations.

use crate::semantics::{
    NodeRef, ResolvedType, SemanticModel, SourceUnit, SymbolFlags, SymbolId, SymbolInfo, UnitId,
};
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use tsr_common::{Diagnostic, TransformOptions};
use tsr_emitter::print_node;
use tsr_parser::fold::collect_descendants;
use tsr_parser::{Node, NodeIndex, NodeKind, parse_source};
use tsr_scanner::SyntaxKind;

pub(crate) struct NameModel {
    units: Vec<SourceUnit>,
    symbols: Vec<SymbolInfo>,
    by_name: FxHashMap<String, SymbolId>,
    diagnostics: Vec<Diagnostic>,
}

impl NameModel {
    pub(crate) fn parse(source: &str) -> Self {
        let parsed = parse_source("test.ts", source);
        let unit = SourceUnit {
            path: PathBuf::from("/project/test.ts"),
            file_name: "test.ts".to_string(),
            text: parsed.text,
            arena: parsed.arena,
            root: parsed.root,
            is_declaration_file: false,
        };
        let mut model = NameModel {
            units: vec![unit],
            symbols: Vec::new(),
            by_name: FxHashMap::default(),
            diagnostics: parsed.diagnostics,
        };
        model.bind();
        model
    }

    fn bind(&mut self) {
        let unit = &self.units[0];
        let declarations = collect_descendants(&unit.arena, unit.root, |_, node| {
            declared_flags(node).is_some()
        });
        for declaration in declarations {
            let Some(node) = unit.arena.get(declaration) else {
                continue;
            };
            let Some(flags) = declared_flags(node) else {
                continue;
            };
            let Some(name) = node.name().and_then(|name| unit.arena.identifier_text(name)) else {
                continue;
            };
            let reference = NodeRef::new(UnitId(0), declaration);
            match self.by_name.get(name) {
                Some(&id) => {
                    let info = &mut self.symbols[id.0 as usize];
                    info.flags |= flags;
                    info.declarations.push(reference);
                }
                None => {
                    let id = SymbolId(self.symbols.len() as u32);
                    self.symbols.push(SymbolInfo {
                        name: name.to_string(),
                        flags,
                        declarations: vec![reference],
                        value_declaration: None,
                        alias_target: None,
                    });
                    self.by_name.insert(name.to_string(), id);
                }
            }
        }
    }

    pub(crate) fn unit_id(&self) -> UnitId {
        UnitId(0)
    }

    /// First node of `kind` in the unit.
    pub(crate) fn first(&self, kind: NodeKind) -> NodeIndex {
        let unit = &self.units[0];
        collect_descendants(&unit.arena, unit.root, |_, node| node.kind() == kind)
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("no {kind:?} in test source"))
    }
}

fn declared_flags(node: &Node) -> Option<SymbolFlags> {
    let flags = match node {
        Node::InterfaceDeclaration(_) => SymbolFlags::INTERFACE,
        Node::TypeAliasDeclaration { .. } => SymbolFlags::TYPE_ALIAS,
        Node::ClassDeclaration(_) => SymbolFlags::CLASS,
        Node::FunctionDeclaration(_) => SymbolFlags::FUNCTION,
        Node::VariableDeclaration { .. } => SymbolFlags::BLOCK_SCOPED_VARIABLE,
        Node::Parameter { .. } => SymbolFlags::PARAMETER,
        Node::TypeParameter { .. } => SymbolFlags::TYPE_PARAMETER,
        _ => return None,
    };
    Some(flags)
}

impl SemanticModel for NameModel {
    fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.clone()
    }

    fn symbol_at(&self, node: NodeRef) -> Option<SymbolId> {
        let arena = &self.unit(node.unit).arena;
        let name = match arena.get(node.node)? {
            Node::Identifier { text } => Some(text.as_str()),
            Node::TypeReference { type_name, .. } => arena.identifier_text(*type_name),
            Node::ExpressionWithTypeArguments { expression, .. } => {
                arena.identifier_text(*expression)
            }
            other if declared_flags(other).is_some() => {
                other.name().and_then(|name| arena.identifier_text(name))
            }
            _ => None,
        }?;
        self.by_name.get(name).copied()
    }

    fn symbol(&self, id: SymbolId) -> &SymbolInfo {
        &self.symbols[id.0 as usize]
    }

    fn resolve_alias(&self, id: SymbolId) -> SymbolId {
        id
    }

    fn type_at(&self, node: NodeRef) -> Option<ResolvedType> {
        let arena = &self.unit(node.unit).arena;
        let current = arena.get(node.node)?;
        let type_node = match current {
            _ if current.kind().is_type_node() => node.node,
            Node::Identifier { .. } => {
                let symbol = self.symbol_at(node)?;
                let declaration = *self.symbol(symbol).declarations.first()?;
                self.node(declaration)?.annotation()?
            }
            _ => current.annotation()?,
        };
        let is_any = matches!(
            arena.get(type_node),
            Some(Node::KeywordType {
                keyword: SyntaxKind::AnyKeyword
            })
        );
        Some(ResolvedType {
            text: print_node(arena, type_node),
            is_any,
            type_node: Some(NodeRef::new(node.unit, type_node)),
        })
    }

    fn is_implementation_of_overload(&self, _node: NodeRef) -> bool {
        false
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
                        .map(|&member| NodeRef::new(decl.unit, member))
                        .collect::<Vec<_>>(),
                )
            })
            .flatten()
            .collect()
    }

    fn apparent_members(&self, symbol: SymbolId) -> Vec<NodeRef> {
        self.declared_members(symbol)
    }
}

/// Options with `strictNullChecks`, so reflections are not wrapped.
pub(crate) fn strict_options() -> TransformOptions {
    TransformOptions::default()
}
