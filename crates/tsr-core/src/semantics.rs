//! The semantic analysis port.
//!
//! The pipeline never parses or checks a program itself. A `SemanticHost`
//! builds a `SemanticModel` for a set of root files, and the model answers
//! symbol and type questions about the units it loaded. Every answer is keyed
//! by `NodeRef`, the cross-unit address of a node in the model's own arenas.

use bitflags::bitflags;
use std::io;
use std::path::{Path, PathBuf};
use tsr_common::{CompilerOptions, Diagnostic};
use tsr_parser::{Node, NodeArena, NodeIndex};

/// Index of a unit in `SemanticModel::units`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

impl UnitId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A node in a specific unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef {
    pub unit: UnitId,
    pub node: NodeIndex,
}

impl NodeRef {
    pub fn new(unit: UnitId, node: NodeIndex) -> Self {
        NodeRef { unit, node }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u32 {
        const FUNCTION_SCOPED_VARIABLE = 1 << 0;
        const BLOCK_SCOPED_VARIABLE = 1 << 1;
        const CONST = 1 << 2;
        const PARAMETER = 1 << 3;
        const FUNCTION = 1 << 4;
        const CLASS = 1 << 5;
        const INTERFACE = 1 << 6;
        const TYPE_ALIAS = 1 << 7;
        const TYPE_PARAMETER = 1 << 8;
        const PROPERTY = 1 << 9;
        const METHOD = 1 << 10;
        /// Import binding; see `SymbolInfo::alias_target`.
        const ALIAS = 1 << 11;
        /// Ambient global provided by the environment, without declarations.
        const BUILTIN = 1 << 12;

        const VARIABLE = Self::FUNCTION_SCOPED_VARIABLE.bits() | Self::BLOCK_SCOPED_VARIABLE.bits();
        const VALUE = Self::VARIABLE.bits()
            | Self::PARAMETER.bits()
            | Self::FUNCTION.bits()
            | Self::CLASS.bits()
            | Self::PROPERTY.bits()
            | Self::METHOD.bits();
        const TYPE = Self::CLASS.bits()
            | Self::INTERFACE.bits()
            | Self::TYPE_ALIAS.bits()
            | Self::TYPE_PARAMETER.bits();
    }
}

#[derive(Clone, Debug, Default)]
pub struct SymbolInfo {
    pub name: String,
    pub flags: SymbolFlags,
    /// Declarations in program order.
    pub declarations: Vec<NodeRef>,
    pub value_declaration: Option<NodeRef>,
    /// Target of an import binding, once resolved.
    pub alias_target: Option<SymbolId>,
}

impl SymbolInfo {
    pub fn has_any(&self, flags: SymbolFlags) -> bool {
        self.flags.intersects(flags)
    }
}

/// A parsed file of a program.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub file_name: String,
    pub text: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub is_declaration_file: bool,
}

impl SourceUnit {
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.arena.get(index)
    }
}

/// Declared type of a node, as far as the model knows it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedType {
    pub text: String,
    pub is_any: bool,
    pub type_node: Option<NodeRef>,
}

impl ResolvedType {
    pub fn any() -> Self {
        ResolvedType {
            text: "any".to_string(),
            is_any: true,
            type_node: None,
        }
    }
}

/// One semantic generation of a program.
///
/// Missing answers are `None`; callers treat an unknown symbol or type as
/// open rather than as an error.
pub trait SemanticModel {
    fn units(&self) -> &[SourceUnit];

    fn unit(&self, id: UnitId) -> &SourceUnit {
        &self.units()[id.index()]
    }

    fn unit_by_path(&self, path: &Path) -> Option<UnitId> {
        self.units()
            .iter()
            .position(|unit| unit.path == path)
            .map(|index| UnitId(index as u32))
    }

    fn node(&self, node: NodeRef) -> Option<&Node> {
        self.units().get(node.unit.index())?.arena.get(node.node)
    }

    /// Option, global, syntactic and semantic diagnostics of every
    /// non-declaration unit.
    fn diagnostics(&self) -> Vec<Diagnostic>;

    /// Symbol declared by, named by or referenced at `node`.
    fn symbol_at(&self, node: NodeRef) -> Option<SymbolId>;

    fn symbol(&self, id: SymbolId) -> &SymbolInfo;

    /// Follow import bindings to the symbol they stand for.
    fn resolve_alias(&self, id: SymbolId) -> SymbolId;

    fn type_at(&self, node: NodeRef) -> Option<ResolvedType>;

    /// Whether a function-like node with a body implements an overload set.
    fn is_implementation_of_overload(&self, node: NodeRef) -> bool;

    /// Own members of a class or interface symbol, over all declarations,
    /// in declaration order.
    fn declared_members(&self, symbol: SymbolId) -> Vec<NodeRef>;

    /// Own and inherited members; inherited members overridden by name are
    /// left out.
    fn apparent_members(&self, symbol: SymbolId) -> Vec<NodeRef>;
}

/// Builds semantic models and turns them into JavaScript.
pub trait SemanticHost {
    fn create_program(&self, roots: &[PathBuf], options: &CompilerOptions) -> Box<dyn SemanticModel>;

    /// Diagnostics that prevent emitting `model`.
    fn emit_diagnostics(&self, model: &dyn SemanticModel) -> Vec<Diagnostic>;

    /// Write JavaScript for every non-declaration unit under `out_dir`,
    /// keeping each unit's path relative to `root_dir`.
    fn emit(&self, model: &dyn SemanticModel, root_dir: &Path, out_dir: &Path)
    -> io::Result<Vec<PathBuf>>;
}
