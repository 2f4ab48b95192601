//! Generic tree traversal.
//!
//! The helpers work on anything that can hand out a node and its children by
//! handle, so the same search code serves parsed arenas, working copies and
//! test trees.

use crate::arena::NodeArena;
use crate::base::NodeIndex;
use crate::node::Node;
use std::ops::ControlFlow;

pub trait SyntaxTree {
    type Node;

    fn node(&self, index: NodeIndex) -> Option<&Self::Node>;
    fn child_nodes(&self, index: NodeIndex) -> Vec<NodeIndex>;
}

impl SyntaxTree for NodeArena {
    type Node = Node;

    fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.get(index)
    }

    fn child_nodes(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.children(index)
    }
}

/// What a pruned fold does after visiting a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Walk {
    Continue,
    /// Leave the children of the node just visited out of the walk.
    SkipChildren,
    Break,
}

/// Pre-order fold over the subtree rooted at `root` (root included) in
/// which `f` decides, per node, whether to descend, prune or stop.
pub fn fold_pruned<T, A, F>(tree: &T, root: NodeIndex, init: A, mut f: F) -> A
where
    T: SyntaxTree + ?Sized,
    F: FnMut(A, NodeIndex, &T::Node) -> (A, Walk),
{
    let mut acc = init;
    let mut stack = vec![root];
    while let Some(index) = stack.pop() {
        let Some(node) = tree.node(index) else {
            continue;
        };
        let (next, walk) = f(acc, index, node);
        acc = next;
        match walk {
            Walk::Continue => {
                let children = tree.child_nodes(index);
                stack.extend(children.into_iter().rev());
            }
            Walk::SkipChildren => {}
            Walk::Break => break,
        }
    }
    acc
}

/// Pre-order fold over the subtree rooted at `root` (root included).
///
/// `f` may stop the walk early with `ControlFlow::Break`; the carried value
/// is returned as-is.
pub fn fold<T, A, F>(tree: &T, root: NodeIndex, init: A, mut f: F) -> A
where
    T: SyntaxTree + ?Sized,
    F: FnMut(A, NodeIndex, &T::Node) -> ControlFlow<A, A>,
{
    fold_pruned(tree, root, init, |acc, index, node| match f(acc, index, node) {
        ControlFlow::Continue(next) => (next, Walk::Continue),
        ControlFlow::Break(done) => (done, Walk::Break),
    })
}

/// First node under `root` (pre-order, root included) matching `pred`.
pub fn find_descendant<T, P>(tree: &T, root: NodeIndex, mut pred: P) -> Option<NodeIndex>
where
    T: SyntaxTree + ?Sized,
    P: FnMut(NodeIndex, &T::Node) -> bool,
{
    fold(tree, root, None, |acc, index, node| {
        if pred(index, node) {
            ControlFlow::Break(Some(index))
        } else {
            ControlFlow::Continue(acc)
        }
    })
}

/// Every node under `root` (pre-order, root included) matching `pred`.
pub fn collect_descendants<T, P>(tree: &T, root: NodeIndex, mut pred: P) -> Vec<NodeIndex>
where
    T: SyntaxTree + ?Sized,
    P: FnMut(NodeIndex, &T::Node) -> bool,
{
    fold(tree, root, Vec::new(), |mut acc, index, node| {
        if pred(index, node) {
            acc.push(index);
        }
        ControlFlow::Continue(acc)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A tiny tree unrelated to the TypeScript AST.
    struct Labels {
        labels: Vec<&'static str>,
        children: Vec<Vec<NodeIndex>>,
    }

    impl SyntaxTree for Labels {
        type Node = &'static str;

        fn node(&self, index: NodeIndex) -> Option<&&'static str> {
            self.labels.get(index.index())
        }

        fn child_nodes(&self, index: NodeIndex) -> Vec<NodeIndex> {
            self.children.get(index.index()).cloned().unwrap_or_default()
        }
    }

    fn sample() -> Labels {
        Labels {
            labels: vec!["root", "a", "b", "a.1"],
            children: vec![
                vec![NodeIndex(1), NodeIndex(2)],
                vec![NodeIndex(3)],
                vec![],
                vec![],
            ],
        }
    }

    #[test]
    fn test_fold_visits_pre_order() {
        let order = fold(&sample(), NodeIndex(0), Vec::new(), |mut acc, _, label| {
            acc.push(*label);
            ControlFlow::Continue(acc)
        });
        assert_eq!(order, vec!["root", "a", "a.1", "b"]);
    }

    #[test]
    fn test_find_descendant_stops_early() {
        let mut visited = 0;
        let found = find_descendant(&sample(), NodeIndex(0), |_, label| {
            visited += 1;
            label.starts_with('a')
        });
        assert_eq!(found, Some(NodeIndex(1)));
        assert_eq!(visited, 2);
    }

    #[test]
    fn test_fold_pruned_leaves_out_skipped_subtrees() {
        let order = fold_pruned(&sample(), NodeIndex(0), Vec::new(), |mut acc, _, label| {
            acc.push(*label);
            let walk = if *label == "a" { Walk::SkipChildren } else { Walk::Continue };
            (acc, walk)
        });
        assert_eq!(order, vec!["root", "a", "b"]);
    }

    #[test]
    fn test_fold_pruned_break_keeps_the_last_value() {
        let seen = fold_pruned(&sample(), NodeIndex(0), 0, |count, _, label| {
            let walk = if *label == "a.1" { Walk::Break } else { Walk::Continue };
            (count + 1, walk)
        });
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_collect_descendants() {
        let found = collect_descendants(&sample(), NodeIndex(0), |_, label| label.len() == 1);
        assert_eq!(found, vec![NodeIndex(1), NodeIndex(2)]);
    }
}
