//! # Graph storage consumed by the isomorphism engine
//!
//! The algorithms of this crate only need a handful of queries from the graphs
//! they compare; these are collected in the [`TreeGraph`] trait. Node
//! identifiers are opaque, hashable values chosen by the caller. Internally
//! every graph interns its identifiers into dense [`NodeIndex`] values (in
//! insertion order), so that all per-node state of the algorithms can live in
//! flat [`NodeVec`]s.
//!
//! [`Graph`] is the provided implementation. It stores adjacency in
//! [`IndexSet`]s so that neighbor enumeration is deterministic and edge
//! membership is `O(1)`. A graph is either undirected or directed; direction
//! is ignored by [`TreeGraph::neighbors`] and [`TreeGraph::degree`] but
//! respected by [`TreeGraph::has_edge`] and [`TreeGraph::edges`].
//!
//! Submodules:
//! * [`validate`]: the tree / forest predicates.
//! * [`dot`]: reading graphs from the DOT language.

use std::{fmt::Debug, hash::Hash};

use ahash::RandomState;
use indexmap::IndexSet;
use thiserror::Error;

use crate::define_indexed_vec;

pub mod dot;
pub mod validate;

define_indexed_vec!(
    /// Dense index of a node inside a graph, assigned in insertion order.
    pub struct NodeIndex;

    /// A vector holding one value per node, indexed by [`NodeIndex`].
    pub struct NodeVec;
);

/// The queries the isomorphism engine needs from an input tree.
pub trait TreeGraph {
    /// The caller's node identifier.
    type Node: Hash + Eq + Clone + Debug;

    fn n_nodes(&self) -> usize;

    fn n_edges(&self) -> usize;

    fn is_directed(&self) -> bool;

    /// The identifier stored for `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    fn node(&self, index: NodeIndex) -> &Self::Node;

    /// Looks up the dense index of a node identifier.
    fn node_index(&self, node: &Self::Node) -> Option<NodeIndex>;

    fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_;

    /// All nodes adjacent to `index`, regardless of edge direction.
    fn neighbors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_;

    /// Number of incident edges, regardless of edge direction.
    fn degree(&self, index: NodeIndex) -> usize;

    /// Whether the edge `source -> target` exists. For undirected graphs this is symmetric.
    fn has_edge(&self, source: NodeIndex, target: NodeIndex) -> bool;

    /// Every edge exactly once. Undirected edges are reported with the smaller index first.
    fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Self loop on node {0}")]
    SelfLoop(String),
    #[error("Edge between {0} and {1} is already present")]
    ParallelEdge(String, String),
}

/// An adjacency-set graph over caller-chosen node identifiers.
///
/// For undirected graphs `out_adjacency` holds both directions and
/// `in_adjacency` stays empty.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    nodes: IndexSet<N, RandomState>,
    out_adjacency: NodeVec<IndexSet<NodeIndex, RandomState>>,
    in_adjacency: NodeVec<IndexSet<NodeIndex, RandomState>>,
    n_edges: usize,
    directed: bool,
}

impl<N: Hash + Eq + Clone + Debug> Default for Graph<N> {
    fn default() -> Self {
        Self::new_undirected()
    }
}

impl<N: Hash + Eq + Clone + Debug> Graph<N> {
    pub fn new_undirected() -> Self {
        Graph {
            nodes: IndexSet::default(),
            out_adjacency: NodeVec::new(),
            in_adjacency: NodeVec::new(),
            n_edges: 0,
            directed: false,
        }
    }

    pub fn new_directed() -> Self {
        Graph {
            directed: true,
            ..Self::new_undirected()
        }
    }

    /// Builds an undirected graph from an edge list.
    pub fn from_edges<I>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut graph = Self::new_undirected();
        for (a, b) in edges {
            graph.add_edge(a, b)?;
        }
        Ok(graph)
    }

    /// Builds a directed graph from an edge list.
    pub fn directed_from_edges<I>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut graph = Self::new_directed();
        for (a, b) in edges {
            graph.add_edge(a, b)?;
        }
        Ok(graph)
    }

    /// An undirected graph with the given isolated nodes.
    pub fn with_nodes<I: IntoIterator<Item = N>>(nodes: I) -> Self {
        let mut graph = Self::new_undirected();
        for n in nodes {
            graph.add_node(n);
        }
        graph
    }

    /// Inserts a node, returning the index of the existing one if it is already present.
    pub fn add_node(&mut self, node: N) -> NodeIndex {
        let (index, inserted) = self.nodes.insert_full(node);
        if inserted {
            self.out_adjacency.push(IndexSet::default());
            if self.directed {
                self.in_adjacency.push(IndexSet::default());
            }
        }
        NodeIndex(index)
    }

    /// Adds the edge `source -> target` (or `source -- target`), inserting missing nodes.
    ///
    /// Self loops and parallel edges are rejected: a tree has neither. For
    /// directed graphs an edge antiparallel to an existing one counts as parallel.
    pub fn add_edge(&mut self, source: N, target: N) -> Result<(NodeIndex, NodeIndex), GraphError> {
        if source == target {
            return Err(GraphError::SelfLoop(format!("{source:?}")));
        }
        let a = self.add_node(source);
        let b = self.add_node(target);
        if self.out_adjacency[a].contains(&b) || self.out_adjacency[b].contains(&a) {
            return Err(GraphError::ParallelEdge(
                format!("{:?}", self.nodes[a.0]),
                format!("{:?}", self.nodes[b.0]),
            ));
        }
        self.insert_edge_unchecked(a, b);
        Ok((a, b))
    }

    /// Adds an edge between two existing nodes without validating it.
    pub(crate) fn insert_edge_unchecked(&mut self, a: NodeIndex, b: NodeIndex) {
        self.out_adjacency[a].insert(b);
        if self.directed {
            self.in_adjacency[b].insert(a);
        } else {
            self.out_adjacency[b].insert(a);
        }
        self.n_edges += 1;
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    /// Node identifiers in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// Edges translated back to node identifiers.
    pub fn edge_ids(&self) -> impl Iterator<Item = (&N, &N)> + '_ {
        self.edges()
            .map(|(a, b)| (&self.nodes[a.0], &self.nodes[b.0]))
    }
}

impl<N: Hash + Eq + Clone + Debug> TreeGraph for Graph<N> {
    type Node = N;

    fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn n_edges(&self) -> usize {
        self.n_edges
    }

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn node(&self, index: NodeIndex) -> &N {
        &self.nodes[index.0]
    }

    fn node_index(&self, node: &N) -> Option<NodeIndex> {
        self.nodes.get_index_of(node).map(NodeIndex)
    }

    fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.out_adjacency.keys()
    }

    fn neighbors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let incoming = self.in_adjacency.get(index).into_iter().flatten();
        self.out_adjacency[index].iter().chain(incoming).copied()
    }

    fn degree(&self, index: NodeIndex) -> usize {
        self.out_adjacency[index].len() + self.in_adjacency.get(index).map_or(0, IndexSet::len)
    }

    fn has_edge(&self, source: NodeIndex, target: NodeIndex) -> bool {
        self.out_adjacency
            .get(source)
            .is_some_and(|out| out.contains(&target))
    }

    fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        let directed = self.directed;
        self.out_adjacency.iter().flat_map(move |(a, out)| {
            out.iter()
                .filter(move |&&b| directed || a < b)
                .map(move |&b| (a, b))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn undirected_adjacency() {
        let graph = Graph::from_edges([("a", "b"), ("b", "c"), ("b", "d")]).unwrap();
        let b = graph.node_index(&"b").unwrap();
        let c = graph.node_index(&"c").unwrap();

        assert_eq!(graph.n_nodes(), 4);
        assert_eq!(graph.n_edges(), 3);
        assert_eq!(graph.degree(b), 3);
        assert!(graph.has_edge(b, c));
        assert!(graph.has_edge(c, b));
        assert_eq!(graph.edges().count(), 3);
        assert!(graph.edges().all(|(x, y)| x < y));
    }

    #[test]
    fn directed_adjacency() {
        let graph = Graph::directed_from_edges([("a", "b"), ("c", "b")]).unwrap();
        let a = graph.node_index(&"a").unwrap();
        let b = graph.node_index(&"b").unwrap();

        assert!(graph.is_directed());
        assert!(graph.has_edge(a, b));
        assert!(!graph.has_edge(b, a));
        assert_eq!(graph.degree(b), 2);
        assert_eq!(graph.neighbors(b).count(), 2);
        assert_eq!(
            graph.edge_ids().collect::<Vec<_>>(),
            vec![(&"a", &"b"), (&"c", &"b")]
        );
    }

    #[test]
    fn rejects_loops_and_parallel_edges() {
        let mut graph = Graph::new_undirected();
        assert_eq!(
            graph.add_edge("a", "a"),
            Err(GraphError::SelfLoop("\"a\"".into()))
        );
        graph.add_edge("a", "b").unwrap();
        assert!(matches!(
            graph.add_edge("b", "a"),
            Err(GraphError::ParallelEdge(_, _))
        ));

        let mut directed = Graph::new_directed();
        directed.add_edge(1, 2).unwrap();
        assert!(directed.add_edge(2, 1).is_err());
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut graph: Graph<&str> = Graph::with_nodes(["x", "y"]);
        assert_eq!(graph.add_node("x"), NodeIndex(0));
        assert_eq!(graph.add_node("z"), NodeIndex(2));
        assert_eq!(graph.n_nodes(), 3);
        assert_eq!(graph.n_edges(), 0);
    }
}
