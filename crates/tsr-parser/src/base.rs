//! Shared base types for AST nodes.

use std::fmt;

/// Index of a node in its `NodeArena`.
///
/// Handles are only meaningful for the arena that produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// `None` for `NodeIndex::NONE`.
    #[inline]
    pub fn to_option(self) -> Option<NodeIndex> {
        if self.is_none() { None } else { Some(self) }
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        NodeIndex::NONE
    }
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "NodeIndex(NONE)")
        } else {
            write!(f, "NodeIndex({})", self.0)
        }
    }
}

/// An ordered list of child nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    pub fn new() -> Self {
        NodeList { nodes: Vec::new() }
    }

    pub fn from_vec(nodes: Vec<NodeIndex>) -> Self {
        NodeList { nodes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeIndex> {
        self.nodes.iter()
    }

    pub fn push(&mut self, node: NodeIndex) {
        self.nodes.push(node);
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a NodeIndex;
    type IntoIter = std::slice::Iter<'a, NodeIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Source range of a node. Synthesized nodes carry `SYNTHESIZED` for both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub pos: u32,
    pub end: u32,
}

impl TextRange {
    pub const SYNTHESIZED: TextRange = TextRange {
        pos: u32::MAX,
        end: u32::MAX,
    };

    pub fn new(pos: u32, end: u32) -> Self {
        TextRange { pos, end }
    }

    pub fn is_synthesized(&self) -> bool {
        self.pos == u32::MAX
    }

    pub fn len(&self) -> u32 {
        if self.is_synthesized() {
            0
        } else {
            self.end.saturating_sub(self.pos)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
