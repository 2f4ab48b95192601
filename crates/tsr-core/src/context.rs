//! Per-unit state of a mutation pass.
//!
//! A `MutationContext` owns a working copy of one unit's arena. The copy
//! starts as a clone of the model's arena, so every original node keeps its
//! index and semantic queries can be answered by the model directly. Nodes
//! built during the pass are appended past the original length and are
//! mapped back to the node they replaced through the `Scanner`.

use crate::factory::Factory;
use crate::scanner::Scanner;
use crate::semantics::{NodeRef, SemanticModel, SymbolFlags, SymbolId, UnitId};
use fixedbitset::FixedBitSet;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::trace;
use tsr_common::TransformOptions;
use tsr_emitter::print_node;
use tsr_parser::fold::{Walk, fold_pruned};
use tsr_parser::{ModifierFlags, Node, NodeArena, NodeIndex, VariableKind};
use tsr_scanner::SyntaxKind;

/// The identifier a unit binds the runtime library to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LibBinding {
    pub name: String,
    /// Whether generated code in the unit refers to the library.
    pub used: bool,
}

impl LibBinding {
    pub fn new(name: impl Into<String>) -> Self {
        LibBinding {
            name: name.into(),
            used: false,
        }
    }
}

pub struct MutationContext<'s, 'm> {
    unit: UnitId,
    arena: NodeArena,
    root: NodeIndex,
    scanner: &'s mut Scanner<'m>,
    options: &'s TransformOptions,
    skipped: FixedBitSet,
    lib: LibBinding,
}

impl<'s, 'm> MutationContext<'s, 'm> {
    /// Start a pass over `unit`. Without a carried `lib` binding, the
    /// library name is chosen here so that it cannot collide with any
    /// identifier of the unit.
    pub fn new(
        scanner: &'s mut Scanner<'m>,
        options: &'s TransformOptions,
        unit: UnitId,
        lib: Option<LibBinding>,
    ) -> Self {
        let source = scanner.model().unit(unit);
        let arena = source.arena.clone();
        let root = source.root;
        let skipped = FixedBitSet::with_capacity(arena.len());
        let mut context = MutationContext {
            unit,
            arena,
            root,
            scanner,
            options,
            skipped,
            lib: LibBinding::new(options.lib_identifier.clone()),
        };
        if let Some(lib) = lib {
            context.lib = lib;
        } else if context
            .scanner
            .identifiers_in_scope(unit)
            .contains(options.lib_identifier.as_str())
        {
            let escaped = format!("{}{}", options.lib_namespace, options.lib_identifier);
            context.lib = LibBinding::new(context.fresh_name(&escaped));
        }
        context
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    #[inline]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: NodeIndex) {
        self.root = root;
    }

    #[inline]
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    #[inline]
    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    #[inline]
    pub fn model(&self) -> &'m dyn SemanticModel {
        self.scanner.model()
    }

    #[inline]
    pub fn options(&self) -> &'s TransformOptions {
        self.options
    }

    pub fn scanner(&mut self) -> &mut Scanner<'m> {
        &mut *self.scanner
    }

    pub fn factory(&mut self) -> Factory<'_> {
        Factory::new(&mut self.arena, &mut self.lib)
    }

    pub fn lib_binding(&self) -> &LibBinding {
        &self.lib
    }

    pub fn lib_name(&self) -> &str {
        &self.lib.name
    }

    #[inline]
    pub fn node_ref(&self, node: NodeIndex) -> NodeRef {
        NodeRef::new(self.unit, node)
    }

    /// The model node a working node stands for, if any.
    pub fn model_ref(&self, node: NodeIndex) -> Option<NodeRef> {
        let original = self.scanner.original_of(self.node_ref(node));
        self.model().node(original).map(|_| original)
    }

    /// Hand back the rewritten arena and the library binding.
    pub fn finish(self) -> (NodeArena, NodeIndex, LibBinding) {
        (self.arena, self.root, self.lib)
    }

    /// Register `replacement` as standing in for `original`.
    pub(crate) fn record_replacement(&mut self, original: NodeIndex, replacement: NodeIndex) {
        if original == replacement {
            return;
        }
        let parent = self.arena.parent(original);
        self.arena.set_parent(replacement, parent);
        self.arena.set_parents(replacement);
        let (original, replacement) = (self.node_ref(original), self.node_ref(replacement));
        self.scanner.map_replacement(original, replacement);
    }

    // =========================================================================
    // Skip set
    // =========================================================================

    /// Exclude `node` (and with `recursive`, its subtree) from mutation.
    /// Nodes in `excluded` and everything under them stay eligible.
    pub fn skip(&mut self, node: NodeIndex, recursive: bool, excluded: &[NodeIndex]) {
        if node.is_none() || excluded.contains(&node) {
            return;
        }
        let nodes = if recursive {
            fold_pruned(&self.arena, node, Vec::new(), |mut nodes, current, _| {
                if excluded.contains(&current) {
                    return (nodes, Walk::SkipChildren);
                }
                nodes.push(current);
                (nodes, Walk::Continue)
            })
        } else {
            vec![node]
        };
        for current in nodes {
            if current.index() >= self.skipped.len() {
                self.skipped.grow(self.arena.len().max(current.index() + 1));
            }
            self.skipped.insert(current.index());
        }
    }

    pub fn should_skip(&self, node: NodeIndex) -> bool {
        self.skipped.contains(node.index())
    }

    pub fn unskip(&mut self, node: NodeIndex) {
        if node.index() < self.skipped.len() {
            self.skipped.set(node.index(), false);
        }
    }

    // =========================================================================
    // Semantic queries
    // =========================================================================

    pub fn symbol_of(&mut self, node: NodeIndex) -> Option<SymbolId> {
        let model_ref = self.model_ref(node)?;
        self.scanner.attributes_of(model_ref).symbol
    }

    /// Whether the declared type at `node` is `any` or unknown.
    ///
    /// `node` is a declaration or a type node. Generated nodes without a
    /// model counterpart are judged by their own shape.
    pub fn is_open_type(&mut self, node: NodeIndex) -> bool {
        if node.is_none() {
            return true;
        }
        if let Some(model_ref) = self.model_ref(node) {
            return self.scanner.attributes_of(model_ref).is_open;
        }
        let type_node = match self.arena.get(node) {
            Some(current) if current.kind().is_type_node() => Some(node),
            Some(current) => current.annotation(),
            None => None,
        };
        match type_node.and_then(|index| self.arena.get(index)) {
            Some(Node::KeywordType { keyword }) => *keyword == SyntaxKind::AnyKeyword,
            Some(_) => false,
            None => true,
        }
    }

    pub fn is_implementation_of_overload(&self, node: NodeIndex) -> bool {
        self.model_ref(node)
            .is_some_and(|model_ref| self.model().is_implementation_of_overload(model_ref))
    }

    /// Whether a type reference resolves to anything at all.
    pub fn is_declared(&self, reference: NodeRef) -> bool {
        self.model().symbol_at(reference).is_some()
    }

    /// Whether a declaration of the name at `reference` ends before the
    /// reference does, in the same unit. Import bindings count as
    /// declarations of the imported name. Declarations merged into a
    /// binding in another unit do not count.
    pub fn is_declared_before_use(&self, reference: NodeRef) -> bool {
        let model = self.model();
        let Some(symbol) = model.symbol_at(reference) else {
            return false;
        };
        if self
            .scanner
            .merged_into(symbol)
            .is_some_and(|unit| unit != reference.unit)
        {
            return false;
        }
        let reference_end = model.unit(reference.unit).arena.range(reference.node).end;
        model
            .symbol(symbol)
            .declarations
            .iter()
            .filter(|decl| decl.unit == reference.unit)
            .any(|decl| model.unit(decl.unit).arena.range(decl.node).end < reference_end)
    }

    /// Whether the type reference at `reference` names the interface or type
    /// alias it appears in. References in heritage clauses never do.
    pub fn is_self_reference(&self, reference: NodeRef) -> bool {
        let model = self.model();
        let Some(symbol) = model.symbol_at(reference).map(|id| model.resolve_alias(id)) else {
            return false;
        };
        let arena = &model.unit(reference.unit).arena;
        for ancestor in arena.ancestors(reference.node) {
            match arena.get(ancestor) {
                Some(Node::HeritageClause { .. }) | Some(Node::ClassDeclaration(_)) => {
                    return false;
                }
                Some(Node::InterfaceDeclaration(_)) | Some(Node::TypeAliasDeclaration { .. }) => {
                    return model.symbol_at(NodeRef::new(reference.unit, ancestor)) == Some(symbol);
                }
                _ => {}
            }
        }
        false
    }

    /// Whether any declaration of the symbol declared at `declaration`
    /// refers to that symbol directly.
    pub fn has_self_reference(&mut self, declaration: NodeIndex) -> bool {
        let Some(symbol) = self.symbol_of(declaration) else {
            return false;
        };
        let model = self.model();
        model
            .symbol(symbol)
            .declarations
            .iter()
            .flat_map(|&decl| type_references_in(model, decl))
            .any(|reference| resolved_symbol(model, reference) == Some(symbol))
    }

    /// Like `has_self_reference`, but also through other interfaces and type
    /// aliases the declaration refers to.
    pub fn has_transitive_self_reference(&mut self, declaration: NodeIndex) -> bool {
        let Some(start) = self.symbol_of(declaration) else {
            return false;
        };
        let model = self.model();
        let mut visited = FxHashSet::default();
        let mut stack = vec![start];
        while let Some(symbol) = stack.pop() {
            if !visited.insert(symbol) {
                continue;
            }
            for &decl in &model.symbol(symbol).declarations {
                for reference in type_references_in(model, decl) {
                    let Some(target) = resolved_symbol(model, reference) else {
                        continue;
                    };
                    if target == start {
                        return true;
                    }
                    if model
                        .symbol(target)
                        .has_any(SymbolFlags::INTERFACE | SymbolFlags::TYPE_ALIAS)
                    {
                        stack.push(target);
                    }
                }
            }
        }
        false
    }

    /// Whether an assignment to the identifier at `name` can be checked
    /// against a `_nameType` descriptor generated in this unit.
    ///
    /// That holds for `let`/`var` declarations with an identifier name and a
    /// closed annotation outside `for…of`/`for…in` heads and ambient
    /// statements, and for annotated parameters of guarded functions.
    pub fn has_type_binding(&mut self, name: NodeIndex) -> bool {
        let Some(model_ref) = self.model_ref(name) else {
            return false;
        };
        let model = self.model();
        let Some(symbol) = model.symbol_at(model_ref) else {
            return false;
        };
        let declarations: Vec<NodeRef> = model
            .symbol(symbol)
            .declarations
            .iter()
            .copied()
            .filter(|decl| decl.unit == self.unit)
            .collect();
        declarations
            .into_iter()
            .any(|decl| self.declares_type_binding(decl))
    }

    fn declares_type_binding(&mut self, decl: NodeRef) -> bool {
        let model = self.model();
        let arena = &model.unit(decl.unit).arena;
        let (name, annotation) = match model.node(decl) {
            Some(Node::VariableDeclaration {
                name,
                type_annotation,
                ..
            }) => {
                if !is_guarded_variable(arena, decl.node) {
                    return false;
                }
                (*name, *type_annotation)
            }
            Some(Node::Parameter {
                name,
                type_annotation,
                ..
            }) => {
                let function = arena.parent(decl.node);
                let guarded = arena
                    .get(function)
                    .and_then(Node::function_data)
                    .is_some_and(|func| func.body.is_some())
                    && !model.is_implementation_of_overload(NodeRef::new(decl.unit, function));
                if !guarded {
                    return false;
                }
                (*name, *type_annotation)
            }
            _ => return false,
        };
        let is_identifier = arena
            .identifier_text(name)
            .is_some_and(|text| text != "this");
        is_identifier
            && annotation.is_some()
            && !self.scanner.attributes_of(decl).is_open
    }

    /// Whether returns of the function-like `function` are checked against a
    /// `_returnType` descriptor.
    pub fn is_return_guarded(&mut self, function: NodeIndex) -> bool {
        let Some(node) = self.arena.get(function) else {
            return false;
        };
        let Some(func) = node.function_data() else {
            return false;
        };
        let Some(annotation) = node.annotation() else {
            return false;
        };
        if func.body.is_none()
            || func.asterisk
            || func.modifiers.contains(ModifierFlags::ASYNC)
        {
            return false;
        }
        !self.is_open_type(annotation) && !self.is_implementation_of_overload(function)
    }

    // =========================================================================
    // Naming
    // =========================================================================

    /// `candidate`, prefixed with `_` until it names nothing in the unit.
    pub fn fresh_name(&mut self, candidate: &str) -> String {
        let identifiers = self.scanner.identifiers_in_scope(self.unit);
        let mut name = candidate.to_string();
        while identifiers.contains(&name) {
            name.insert(0, '_');
        }
        name
    }

    /// Name of the descriptor binding for `name`, e.g. `_xType`.
    pub fn type_declaration_name(&mut self, name: &str) -> String {
        let candidate = format!("{}{}Type", self.options.declaration_prefix, name);
        self.fresh_name(&candidate)
    }

    pub fn return_type_declaration_name(&mut self) -> String {
        self.type_declaration_name("return")
    }

    // =========================================================================
    // Members and supertypes
    // =========================================================================

    /// Own members of the class or interface declared at `declaration`,
    /// across all its declarations, first occurrence of each text kept.
    pub fn members_of(&mut self, declaration: NodeIndex) -> Vec<NodeRef> {
        let members = match self.symbol_of(declaration) {
            Some(symbol) => self.model().declared_members(symbol),
            None => self.own_members(declaration),
        };
        self.dedup_by_text(members)
    }

    /// Own and inherited members of the class or interface at `declaration`.
    pub fn all_members_of(&mut self, declaration: NodeIndex) -> Vec<NodeRef> {
        let members = match self.symbol_of(declaration) {
            Some(symbol) => self.model().apparent_members(symbol),
            None => self.own_members(declaration),
        };
        self.dedup_by_text(members)
    }

    /// `extends` targets of every declaration of an interface symbol, in
    /// first-seen order, duplicates by text removed.
    pub fn merged_supertypes(&self, symbol: SymbolId) -> Vec<NodeRef> {
        let model = self.model();
        let mut supertypes = Vec::new();
        for &decl in &model.symbol(symbol).declarations {
            let Some(Node::InterfaceDeclaration(data)) = model.node(decl) else {
                continue;
            };
            for &clause in &data.heritage_clauses {
                if let Some(Node::HeritageClause {
                    token: SyntaxKind::ExtendsKeyword,
                    types,
                }) = model.unit(decl.unit).arena.get(clause)
                {
                    supertypes.extend(types.iter().map(|&ty| NodeRef::new(decl.unit, ty)));
                }
            }
        }
        self.dedup_by_text(supertypes)
    }

    fn own_members(&self, declaration: NodeIndex) -> Vec<NodeRef> {
        self.model_ref(declaration)
            .and_then(|decl| {
                let data = self.model().node(decl)?.class_like_data()?;
                Some(
                    data.members
                        .iter()
                        .map(|&member| NodeRef::new(decl.unit, member))
                        .collect(),
                )
            })
            .unwrap_or_default()
    }

    fn dedup_by_text(&self, nodes: Vec<NodeRef>) -> Vec<NodeRef> {
        let model = self.model();
        let mut seen: IndexMap<String, NodeRef> = IndexMap::new();
        for node in nodes {
            let text = print_node(&model.unit(node.unit).arena, node.node);
            seen.entry(text).or_insert(node);
        }
        let deduped: Vec<NodeRef> = seen.into_values().collect();
        trace!(count = deduped.len(), "merged members");
        deduped
    }
}

/// Type references under a declaration, heritage clauses excluded.
fn type_references_in(model: &dyn SemanticModel, decl: NodeRef) -> Vec<NodeRef> {
    let arena = &model.unit(decl.unit).arena;
    fold_pruned(arena, decl.node, Vec::new(), |mut references, current, node| {
        match node {
            Node::HeritageClause { .. } => return (references, Walk::SkipChildren),
            Node::TypeReference { .. } => references.push(NodeRef::new(decl.unit, current)),
            _ => {}
        }
        (references, Walk::Continue)
    })
}

fn resolved_symbol(model: &dyn SemanticModel, reference: NodeRef) -> Option<SymbolId> {
    model.symbol_at(reference).map(|id| model.resolve_alias(id))
}

/// A `let`/`var` declaration outside `for…of`/`for…in` heads and ambient
/// statements.
pub(crate) fn is_guarded_variable(arena: &NodeArena, declaration: NodeIndex) -> bool {
    let list = arena.parent(declaration);
    let Some(Node::VariableDeclarationList { kind, .. }) = arena.get(list) else {
        return false;
    };
    *kind != VariableKind::Const && is_guarded_declaration_list(arena, list)
}

/// Declaration lists of loop heads and ambient statements are left alone.
pub(crate) fn is_guarded_declaration_list(arena: &NodeArena, list: NodeIndex) -> bool {
    match arena.get(arena.parent(list)) {
        Some(Node::ForOf { .. }) | Some(Node::ForIn { .. }) => false,
        Some(Node::VariableStatement { modifiers, .. }) => !modifiers.contains(ModifierFlags::DECLARE),
        _ => true,
    }
}
