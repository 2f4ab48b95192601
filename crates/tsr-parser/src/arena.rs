//! Node storage.
//!
//! Nodes, their text ranges and their parent links live in parallel vectors
//! indexed by `NodeIndex`. Cloning an arena yields an independent working
//! copy whose existing handles stay valid; nodes added afterwards get fresh
//! indices past the original length.

use crate::base::{NodeIndex, TextRange};
use crate::node::{Node, NodeKind};

#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    ranges: Vec<TextRange>,
    parents: Vec<NodeIndex>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            ranges: Vec::with_capacity(capacity),
            parents: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add(&mut self, node: Node, pos: u32, end: u32) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        self.ranges.push(TextRange::new(pos, end));
        self.parents.push(NodeIndex::NONE);
        index
    }

    /// Add a node that has no source text.
    pub fn add_synthesized(&mut self, node: Node) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        self.ranges.push(TextRange::SYNTHESIZED);
        self.parents.push(NodeIndex::NONE);
        index
    }

    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.index())
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(index.index())
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<NodeKind> {
        self.get(index).map(Node::kind)
    }

    /// Overwrite the node stored at `index`, keeping its range and parent.
    pub fn replace(&mut self, index: NodeIndex, node: Node) {
        if let Some(slot) = self.nodes.get_mut(index.index()) {
            *slot = node;
        }
    }

    pub fn range(&self, index: NodeIndex) -> TextRange {
        self.ranges
            .get(index.index())
            .copied()
            .unwrap_or(TextRange::SYNTHESIZED)
    }

    pub fn is_synthesized(&self, index: NodeIndex) -> bool {
        self.range(index).is_synthesized()
    }

    pub fn set_end(&mut self, index: NodeIndex, end: u32) {
        if let Some(range) = self.ranges.get_mut(index.index()) {
            range.end = end;
        }
    }

    #[inline]
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.parents
            .get(index.index())
            .copied()
            .unwrap_or(NodeIndex::NONE)
    }

    pub fn set_parent(&mut self, index: NodeIndex, parent: NodeIndex) {
        if let Some(slot) = self.parents.get_mut(index.index()) {
            *slot = parent;
        }
    }

    /// Recompute parent links for the tree under `root`.
    pub fn set_parents(&mut self, root: NodeIndex) {
        let mut stack = vec![root];
        while let Some(parent) = stack.pop() {
            for child in self.children(parent) {
                self.set_parent(child, parent);
                stack.push(child);
            }
        }
    }

    /// Ancestors of `index`, nearest first.
    pub fn ancestors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let mut current = self.parent(index);
        std::iter::from_fn(move || {
            if current.is_none() {
                return None;
            }
            let out = current;
            current = self.parent(current);
            Some(out)
        })
    }

    /// Drop every node added after the arena had `len` nodes.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
        self.ranges.truncate(len);
        self.parents.truncate(len);
    }

    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.get(index).map(Node::children).unwrap_or_default()
    }

    /// Rewrite the children of `index` through `f`; see `Node::map_children`.
    pub fn map_children(
        &mut self,
        index: NodeIndex,
        f: &mut dyn FnMut(&mut NodeArena, NodeIndex) -> Option<NodeIndex>,
    ) {
        let Some(mut node) = self.get(index).cloned() else {
            return;
        };
        node.map_children(&mut |child| f(self, child));
        self.replace(index, node);
    }

    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        self.get(index).and_then(Node::identifier_text)
    }

    /// Text of a property-like name: identifiers, string and numeric literals.
    pub fn property_name_text(&self, index: NodeIndex) -> Option<&str> {
        match self.get(index)? {
            Node::Identifier { text }
            | Node::StringLiteral { text }
            | Node::NumericLiteral { text } => Some(text),
            _ => None,
        }
    }

    /// Source text covered by a parsed node.
    pub fn source_text<'s>(&self, index: NodeIndex, source: &'s str) -> Option<&'s str> {
        let range = self.range(index);
        if range.is_synthesized() {
            return None;
        }
        source.get(range.pos as usize..range.end as usize)
    }
}
