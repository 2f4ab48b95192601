//! Semantic cache of one program generation.
//!
//! The `Scanner` sits between the mutators and the `SemanticModel`. It
//! caches per-node type attributes, remembers which rewritten node stands in
//! for which original, and carries the pass-wide state that outlives a single
//! unit: merged symbols and the type declarations recorded for the
//! declarations artifact.
//!
//! A scanner is tied to one model. Re-deriving the program means building a
//! new scanner; nothing here survives a generation change.

use crate::semantics::{NodeRef, SemanticModel, SymbolId, UnitId};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use tsr_parser::Node;
use tsr_parser::fold::collect_descendants;

/// Cached type attributes of a node.
#[derive(Clone, Debug, Default)]
pub struct TypeInfo {
    /// The symbol at the node, import bindings resolved.
    pub symbol: Option<SymbolId>,
    pub declarations: Vec<NodeRef>,
    /// Unit of the first declaration.
    pub unit: Option<UnitId>,
    pub type_text: String,
    pub type_node: Option<NodeRef>,
    /// `any`, or nothing the model could tell.
    pub is_open: bool,
}

impl TypeInfo {
    fn open() -> Self {
        TypeInfo {
            type_text: "any".to_string(),
            is_open: true,
            ..TypeInfo::default()
        }
    }
}

/// A named type descriptor bound by a rewritten interface or alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclarationRecord {
    pub name: String,
    pub unit: UnitId,
    /// Library binding the expression refers to.
    pub lib_name: String,
    /// JavaScript text of the descriptor expression.
    pub expression: String,
}

pub struct Scanner<'m> {
    model: &'m dyn SemanticModel,
    attributes: FxHashMap<NodeRef, TypeInfo>,
    /// Replacement -> the node it replaced.
    originals: FxHashMap<NodeRef, NodeRef>,
    identifiers: FxHashMap<UnitId, FxHashSet<String>>,
    /// Merged symbols and the unit holding their binding.
    merged: FxHashMap<SymbolId, UnitId>,
    declarations: Vec<DeclarationRecord>,
}

impl<'m> Scanner<'m> {
    pub fn new(model: &'m dyn SemanticModel) -> Self {
        Scanner {
            model,
            attributes: FxHashMap::default(),
            originals: FxHashMap::default(),
            identifiers: FxHashMap::default(),
            merged: FxHashMap::default(),
            declarations: Vec::new(),
        }
    }

    #[inline]
    pub fn model(&self) -> &'m dyn SemanticModel {
        self.model
    }

    /// Type attributes of `node`, computed on first request.
    ///
    /// Rewritten nodes are resolved to the node they replaced first.
    /// Nodes the model cannot answer for get open attributes.
    pub fn attributes_of(&mut self, node: NodeRef) -> &TypeInfo {
        let original = self.original_of(node);
        let model = self.model;
        self.attributes
            .entry(original)
            .or_insert_with(|| compute_attributes(model, original))
    }

    /// Every identifier text in `unit`, for collision-free naming.
    pub fn identifiers_in_scope(&mut self, unit: UnitId) -> &FxHashSet<String> {
        let model = self.model;
        self.identifiers.entry(unit).or_insert_with(|| {
            let source = model.unit(unit);
            let arena = &source.arena;
            collect_descendants(arena, source.root, |_, node| {
                matches!(node, Node::Identifier { .. })
            })
            .into_iter()
            .filter_map(|index| arena.identifier_text(index).map(str::to_string))
            .collect()
        })
    }

    pub fn map_replacement(&mut self, original: NodeRef, replacement: NodeRef) {
        if original == replacement {
            return;
        }
        trace!(?original, ?replacement, "map replacement");
        self.originals.insert(replacement, original);
    }

    /// The node `node` ultimately replaced, or `node` itself.
    pub fn original_of(&self, node: NodeRef) -> NodeRef {
        let mut current = node;
        // Chains are short; the bound only guards against a cycle.
        for _ in 0..self.originals.len() + 1 {
            match self.originals.get(&current) {
                Some(&previous) if previous != current => current = previous,
                _ => break,
            }
        }
        current
    }

    pub fn mark_merged(&mut self, symbol: SymbolId, unit: UnitId) {
        self.merged.entry(symbol).or_insert(unit);
    }

    pub fn was_merged(&self, symbol: SymbolId) -> bool {
        self.merged.contains_key(&symbol)
    }

    /// The unit that binds a merged symbol.
    pub fn merged_into(&self, symbol: SymbolId) -> Option<UnitId> {
        self.merged.get(&symbol).copied()
    }

    pub fn record_declaration(&mut self, record: DeclarationRecord) {
        trace!(name = %record.name, "record declaration");
        self.declarations.push(record);
    }

    pub fn declarations(&self) -> &[DeclarationRecord] {
        &self.declarations
    }

    pub fn collect_declarations(self) -> Vec<DeclarationRecord> {
        self.declarations
    }
}

fn compute_attributes(model: &dyn SemanticModel, node: NodeRef) -> TypeInfo {
    if model.node(node).is_none() {
        return TypeInfo::open();
    }
    let symbol = model.symbol_at(node).map(|id| model.resolve_alias(id));
    let declarations = symbol
        .map(|id| model.symbol(id).declarations.clone())
        .unwrap_or_default();
    let unit = declarations.first().map(|decl| decl.unit);

    let mut info = match model.type_at(node) {
        Some(resolved) => TypeInfo {
            type_text: resolved.text,
            type_node: resolved.type_node,
            is_open: resolved.is_any,
            ..TypeInfo::default()
        },
        None => TypeInfo::open(),
    };
    info.symbol = symbol;
    info.declarations = declarations;
    info.unit = unit;
    info
}
