//! Rooted views of unrooted trees.
//!
//! A [`RootedTree`] is the breadth-first tree of a graph grown from a chosen
//! root: every reached node records its parent (a [`ParentId`]), its ordered
//! children and its depth. From it, [`RootedTree::levels`] derives the level
//! map used by the canonical labelling, where level `0` holds the deepest
//! nodes and level `height` holds only the root.

use std::collections::VecDeque;

use crate::graph::{NodeIndex, NodeVec, TreeGraph};

#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParentId {
    Root,
    Node(NodeIndex),
}

/// The breadth-first tree of a graph from a chosen root.
///
/// Only nodes reachable from the root take part. For a proper tree that is
/// every node; [`RootedTree::spans`] tells whether it was.
#[derive(Clone, Debug)]
pub struct RootedTree {
    root: NodeIndex,
    parents: NodeVec<Option<ParentId>>,
    children: NodeVec<Vec<NodeIndex>>,
    depths: NodeVec<Option<usize>>,
    bfs_order: Vec<NodeIndex>,
    height: usize,
}

impl RootedTree {
    /// Grows the BFS tree of `graph` from `root`, ignoring edge directions.
    ///
    /// # Panics
    /// If `root` is not a node of `graph`.
    pub fn new<G: TreeGraph + ?Sized>(graph: &G, root: NodeIndex) -> Self {
        let n = graph.n_nodes();
        assert!(root.0 < n, "root {root} is not a node of the graph");

        let mut parents = NodeVec::from_elem(None, n);
        let mut children: NodeVec<Vec<NodeIndex>> = (0..n).map(|_| Vec::new()).collect();
        let mut depths = NodeVec::from_elem(None, n);
        let mut bfs_order = Vec::with_capacity(n);

        parents[root] = Some(ParentId::Root);
        depths[root] = Some(0);
        let mut queue = VecDeque::from([(root, 0)]);
        let mut height = 0;

        while let Some((node, depth)) = queue.pop_front() {
            bfs_order.push(node);
            height = depth;
            for next in graph.neighbors(node) {
                if parents[next].is_some() {
                    continue;
                }
                parents[next] = Some(ParentId::Node(node));
                depths[next] = Some(depth + 1);
                children[node].push(next);
                queue.push_back((next, depth + 1));
            }
        }

        RootedTree {
            root,
            parents,
            children,
            depths,
            bfs_order,
            height,
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Length of the longest root-to-leaf path, in edges.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of nodes reached from the root.
    pub fn len(&self) -> usize {
        self.bfs_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bfs_order.is_empty()
    }

    /// Number of nodes of the underlying graph, reached or not.
    pub fn n_slots(&self) -> usize {
        self.parents.len()
    }

    /// Whether the BFS reached every node of the underlying graph.
    pub fn spans(&self) -> bool {
        self.len() == self.n_slots()
    }

    /// `None` for nodes the BFS never reached.
    pub fn parent(&self, node: NodeIndex) -> Option<ParentId> {
        self.parents[node]
    }

    pub fn children(&self, node: NodeIndex) -> &[NodeIndex] {
        &self.children[node]
    }

    /// Reached nodes in breadth-first order, root first.
    pub fn bfs_order(&self) -> &[NodeIndex] {
        &self.bfs_order
    }

    /// Groups the reached nodes by level, deepest first.
    pub fn levels(&self) -> Levels {
        let mut levels = vec![Vec::new(); self.height + 1];
        for &node in &self.bfs_order {
            if let Some(depth) = self.depths[node] {
                levels[self.height - depth].push(node);
            }
        }
        Levels { levels }
    }
}

/// The level map of a rooted tree: level `0` holds the nodes farthest from the
/// root, the last level holds the root alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Levels {
    levels: Vec<Vec<NodeIndex>>,
}

impl Levels {
    pub fn level(&self, index: usize) -> &[NodeIndex] {
        self.levels
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use ahash::AHashSet;

    use super::*;
    use crate::graph::Graph;

    fn level_names<'a>(graph: &'a Graph<&'static str>, tree: &RootedTree) -> Vec<AHashSet<&'a str>> {
        let levels = tree.levels();
        (0..=tree.height())
            .map(|i| levels.level(i).iter().map(|&n| *graph.node(n)).collect())
            .collect()
    }

    #[test]
    fn levels_of_branching_tree() {
        let graph = Graph::from_edges([
            ("v0", "v1"),
            ("v0", "v2"),
            ("v0", "v3"),
            ("v1", "v4"),
            ("v1", "v5"),
            ("v3", "v6"),
        ])
        .unwrap();
        let tree = RootedTree::new(&graph, graph.node_index(&"v0").unwrap());

        assert_eq!(tree.height(), 2);
        assert!(tree.levels().level(3).is_empty());
        assert_eq!(
            level_names(&graph, &tree),
            vec![
                AHashSet::from_iter(["v4", "v5", "v6"]),
                AHashSet::from_iter(["v1", "v2", "v3"]),
                AHashSet::from_iter(["v0"]),
            ]
        );
    }

    #[test]
    fn levels_of_unbalanced_tree() {
        let graph = Graph::from_edges([
            ("u3", "u4"),
            ("u3", "u2"),
            ("u4", "u5"),
            ("u4", "u6"),
            ("u4", "u7"),
            ("u2", "u1"),
            ("u7", "u8"),
            ("u1", "u0"),
        ])
        .unwrap();
        let tree = RootedTree::new(&graph, graph.node_index(&"u3").unwrap());

        assert_eq!(tree.height(), 3);
        assert_eq!(
            level_names(&graph, &tree),
            vec![
                AHashSet::from_iter(["u8", "u0"]),
                AHashSet::from_iter(["u5", "u6", "u7", "u1"]),
                AHashSet::from_iter(["u2", "u4"]),
                AHashSet::from_iter(["u3"]),
            ]
        );
    }

    #[test]
    fn single_node() {
        let graph = Graph::with_nodes(["only"]);
        let tree = RootedTree::new(&graph, NodeIndex(0));

        assert_eq!(tree.height(), 0);
        assert_eq!(tree.len(), 1);
        assert!(tree.spans());
        assert!(tree.children(NodeIndex(0)).is_empty());
        assert_eq!(tree.parent(NodeIndex(0)), Some(ParentId::Root));
        assert_eq!(tree.levels().level(0), &[NodeIndex(0)]);
    }

    #[test]
    fn direction_is_ignored() {
        let graph = Graph::directed_from_edges([("b", "a"), ("c", "a"), ("d", "c")]).unwrap();
        let a = graph.node_index(&"a").unwrap();
        let c = graph.node_index(&"c").unwrap();
        let d = graph.node_index(&"d").unwrap();
        let tree = RootedTree::new(&graph, a);

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.children(a).len(), 2);
        assert_eq!(tree.children(c), &[d]);
        assert_eq!(tree.parent(d), Some(ParentId::Node(c)));
        assert_eq!(tree.levels().level(0), &[d]);
    }

    #[test]
    fn unreached_nodes_are_left_out() {
        let graph = Graph::from_edges([(0, 1), (2, 3)]).unwrap();
        let tree = RootedTree::new(&graph, NodeIndex(0));

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.n_slots(), 4);
        assert!(!tree.spans());
        assert_eq!(tree.parent(NodeIndex(1)), Some(ParentId::Node(NodeIndex(0))));
        assert_eq!(tree.parent(NodeIndex(2)), None);
        assert_eq!(tree.bfs_order(), &[NodeIndex(0), NodeIndex(1)]);
    }
}
