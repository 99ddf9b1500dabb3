//! Tree and forest predicates.
//!
//! The isomorphism engine assumes its inputs are trees; these predicates let
//! callers check that up front. Cycles are detected with a [`UnionFind`] over
//! the underlying undirected edges.

use thiserror::Error;

use super::{NodeIndex, TreeGraph};
use crate::union_find::UnionFind;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("The empty graph is not a tree")]
    Empty,
    #[error("The edge {0} -- {1} closes a cycle")]
    Cyclic(NodeIndex, NodeIndex),
    #[error("The graph has {components} connected components")]
    Disconnected { components: usize },
}

/// Finds the first edge closing a cycle, and counts components otherwise.
fn components<G: TreeGraph + ?Sized>(graph: &G) -> Result<usize, TreeError> {
    let mut uf = UnionFind::new(vec![(); graph.n_nodes()]);
    for (a, b) in graph.edges() {
        if uf.union(a, b, |_, _| ()).is_none() {
            return Err(TreeError::Cyclic(a, b));
        }
    }
    Ok(uf.n_sets())
}

/// Checks that `graph` is a tree, reporting why not.
pub fn check_tree<G: TreeGraph + ?Sized>(graph: &G) -> Result<(), TreeError> {
    if graph.n_nodes() == 0 {
        return Err(TreeError::Empty);
    }
    match components(graph)? {
        1 => Ok(()),
        components => Err(TreeError::Disconnected { components }),
    }
}

/// A non-empty, connected, acyclic graph (direction ignored).
pub fn is_tree<G: TreeGraph + ?Sized>(graph: &G) -> bool {
    graph.n_nodes() > 0 && graph.n_edges() + 1 == graph.n_nodes() && check_tree(graph).is_ok()
}

/// An acyclic graph (direction ignored). The empty graph is a forest.
pub fn is_forest<G: TreeGraph + ?Sized>(graph: &G) -> bool {
    components(graph).is_ok()
}
