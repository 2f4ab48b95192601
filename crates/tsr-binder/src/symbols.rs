//! Symbol storage and lexical scopes.

use rustc_hash::FxHashMap;
use tsr_core::{NodeRef, SymbolFlags, SymbolId, SymbolInfo};

/// Owns every symbol of a program; `SymbolId` indexes into it.
#[derive(Clone, Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<SymbolInfo>,
}

impl SymbolArena {
    pub fn new() -> Self {
        SymbolArena::default()
    }

    pub fn alloc(&mut self, flags: SymbolFlags, name: &str) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(SymbolInfo {
            name: name.to_string(),
            flags,
            ..SymbolInfo::default()
        });
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&SymbolInfo> {
        self.symbols.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut SymbolInfo> {
        self.symbols.get_mut(id.0 as usize)
    }

    /// Record `declaration` on `id`, keeping the first value declaration.
    pub fn add_declaration(&mut self, id: SymbolId, flags: SymbolFlags, declaration: NodeRef) {
        if let Some(symbol) = self.get_mut(id) {
            symbol.flags |= flags;
            if !symbol.declarations.contains(&declaration) {
                symbol.declarations.push(declaration);
            }
            if symbol.value_declaration.is_none() && flags.intersects(SymbolFlags::VALUE) {
                symbol.value_declaration = Some(declaration);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);

    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// What kind of node opened a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    Global,
    Module,
    Function,
    Block,
    Class,
    /// Type parameters of interfaces, aliases and signatures.
    Signature,
    Catch,
    For,
}

impl ContainerKind {
    /// Whether `var` and hoisted functions land in this scope.
    pub fn is_function_scope(&self) -> bool {
        matches!(
            self,
            ContainerKind::Global | ContainerKind::Module | ContainerKind::Function
        )
    }
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ContainerKind,
    pub parent: Option<ScopeId>,
    /// Node that opened the scope; `None` for the global scope.
    pub container: Option<NodeRef>,
    pub table: FxHashMap<String, SymbolId>,
}

impl Scope {
    pub fn new(kind: ContainerKind, parent: Option<ScopeId>, container: Option<NodeRef>) -> Self {
        Scope {
            kind,
            parent,
            container,
            table: FxHashMap::default(),
        }
    }
}

/// Whether a declaration with `new_flags` joins an existing symbol with
/// `existing_flags` instead of conflicting with it.
pub fn can_merge_flags(existing_flags: SymbolFlags, new_flags: SymbolFlags) -> bool {
    if existing_flags.contains(SymbolFlags::INTERFACE) && new_flags.contains(SymbolFlags::INTERFACE)
    {
        return true;
    }

    if (existing_flags.contains(SymbolFlags::CLASS) && new_flags.contains(SymbolFlags::INTERFACE))
        || (existing_flags.contains(SymbolFlags::INTERFACE)
            && new_flags.contains(SymbolFlags::CLASS))
    {
        return true;
    }

    // Overloads
    if existing_flags.contains(SymbolFlags::FUNCTION) && new_flags.contains(SymbolFlags::FUNCTION) {
        return true;
    }

    if existing_flags.contains(SymbolFlags::FUNCTION_SCOPED_VARIABLE)
        && new_flags.contains(SymbolFlags::FUNCTION_SCOPED_VARIABLE)
    {
        return true;
    }

    if existing_flags.contains(SymbolFlags::PARAMETER) && new_flags.contains(SymbolFlags::PARAMETER)
    {
        return true;
    }

    // Types and values live in separate meanings:
    //   type Foo = number;
    //   const Foo = 1;
    let pure_type = SymbolFlags::INTERFACE | SymbolFlags::TYPE_ALIAS;
    if (existing_flags.intersects(pure_type) && !new_flags.intersects(SymbolFlags::TYPE))
        || (new_flags.intersects(pure_type) && !existing_flags.intersects(SymbolFlags::TYPE))
    {
        return true;
    }

    false
}

/// Whether a failed merge of these flags is reported as a block-scoped
/// redeclaration.
pub fn is_block_scoped_conflict(existing_flags: SymbolFlags, new_flags: SymbolFlags) -> bool {
    existing_flags.contains(SymbolFlags::BLOCK_SCOPED_VARIABLE)
        || new_flags.contains(SymbolFlags::BLOCK_SCOPED_VARIABLE)
}
