//! # Tree isomorphism
//!
//! [`tree_isomorphism`] decides whether two unrooted trees are isomorphic and
//! produces a witness bijection. An isomorphism of trees maps centers onto
//! centers, so it is enough to root both trees at their centers (one or two
//! each) and ask the rooted oracle, [`rooted_isomorphism`], for each of the at
//! most four center pairs. The first pair that succeeds provides the witness.
//!
//! Negative answers are not errors: every function here reports them through
//! [`Isomorphism::is_isomorphic`] with an empty mapping. The only error is a
//! root that does not belong to its tree.
//!
//! ```rust
//! use treeiso::{graph::Graph, isomorphism::tree_isomorphism};
//!
//! let t1 = Graph::from_edges([("a", "b"), ("b", "c")]).unwrap();
//! let t2 = Graph::from_edges([(10, 11), (10, 12)]).unwrap();
//!
//! let iso = tree_isomorphism(&t1, &t2);
//! assert!(iso.is_isomorphic());
//! assert_eq!(iso.to_map()[&"b"], 10);
//! ```

use std::hash::Hash;

use ahash::AHashMap;
use itertools::Itertools;
use thiserror::Error;
use tracing::debug;

use crate::{
    canon::{Side, SortStrategy},
    center::centers,
    graph::{NodeIndex, NodeVec, TreeGraph},
};

pub mod rooted;

pub use rooted::{rooted_isomorphism, rooted_isomorphism_with};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IsomorphismError {
    #[error("Root {root} is not a node of the {side} tree")]
    RootNotInTree { side: Side, root: String },
}

/// Tuning knobs of the isomorphism engine. None of them changes the answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct IsomorphismConfig {
    /// How each level's structures are sorted before ranking.
    pub sort: SortStrategy,
    /// Run the center-pair trials on the rayon pool. Ignored without the
    /// `parallel` feature.
    pub parallel: bool,
}

impl IsomorphismConfig {
    pub fn with_sort(mut self, sort: SortStrategy) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// The outcome of an isomorphism query.
///
/// When positive, `pairs` is a complete bijection listed in the insertion
/// order of the first tree's nodes. When negative, `pairs` is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Isomorphism<N1, N2> {
    isomorphic: bool,
    pairs: Vec<(N1, N2)>,
}

impl<N1, N2> Isomorphism<N1, N2> {
    pub fn not_isomorphic() -> Self {
        Isomorphism {
            isomorphic: false,
            pairs: Vec::new(),
        }
    }

    /// A positive answer with the given witness.
    pub fn new(pairs: Vec<(N1, N2)>) -> Self {
        Isomorphism {
            isomorphic: true,
            pairs,
        }
    }

    /// Translates an index witness back to node identifiers.
    pub(crate) fn from_indices<G1, G2>(t1: &G1, t2: &G2, pairs: Vec<(NodeIndex, NodeIndex)>) -> Self
    where
        G1: TreeGraph<Node = N1> + ?Sized,
        G2: TreeGraph<Node = N2> + ?Sized,
        N1: Clone,
        N2: Clone,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(a, b)| (N1::clone(t1.node(a)), N2::clone(t2.node(b))))
                .collect(),
        )
    }

    pub fn is_isomorphic(&self) -> bool {
        self.isomorphic
    }

    pub fn pairs(&self) -> &[(N1, N2)] {
        &self.pairs
    }

    pub fn into_pairs(self) -> Vec<(N1, N2)> {
        self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn to_map(&self) -> AHashMap<N1, N2>
    where
        N1: Hash + Eq + Clone,
        N2: Clone,
    {
        self.pairs.iter().cloned().collect()
    }

    pub fn inverse_map(&self) -> AHashMap<N2, N1>
    where
        N1: Clone,
        N2: Hash + Eq + Clone,
    {
        self.pairs.iter().map(|(a, b)| (b.clone(), a.clone())).collect()
    }
}

/// Decides whether two unrooted trees are isomorphic, with the default
/// configuration.
pub fn tree_isomorphism<G1, G2>(t1: &G1, t2: &G2) -> Isomorphism<G1::Node, G2::Node>
where
    G1: TreeGraph + Sync + ?Sized,
    G2: TreeGraph + Sync + ?Sized,
{
    tree_isomorphism_with(t1, t2, &IsomorphismConfig::default())
}

/// Like [`tree_isomorphism`], with an explicit configuration.
///
/// Two empty graphs are isomorphic with an empty mapping. Inputs that are
/// not trees give unspecified (but non-panicking) answers; check them with
/// [`crate::graph::validate::check_tree`] first.
pub fn tree_isomorphism_with<G1, G2>(
    t1: &G1,
    t2: &G2,
    config: &IsomorphismConfig,
) -> Isomorphism<G1::Node, G2::Node>
where
    G1: TreeGraph + Sync + ?Sized,
    G2: TreeGraph + Sync + ?Sized,
{
    let n = t1.n_nodes();
    if n != t2.n_nodes() {
        debug!(left = n, right = t2.n_nodes(), "node counts differ");
        return Isomorphism::not_isomorphic();
    }
    match n {
        0 => return Isomorphism::new(Vec::new()),
        1 => return Isomorphism::from_indices(t1, t2, vec![(NodeIndex(0), NodeIndex(0))]),
        _ => {}
    }
    if t1.n_edges() != t2.n_edges() {
        debug!(left = t1.n_edges(), right = t2.n_edges(), "edge counts differ");
        return Isomorphism::not_isomorphic();
    }

    let candidates = centers(t1)
        .into_iter()
        .cartesian_product(centers(t2))
        .collect_vec();
    debug!(candidates = candidates.len(), n, "trying center pairs");

    let found = first_success(&candidates, config.parallel, |c1, c2| {
        debug!(%c1, %c2, "rooted trial");
        rooted::rooted_trial(t1, c1, t2, c2, config.sort)
    });

    match found {
        Some(pairs) => Isomorphism::from_indices(t1, t2, pairs),
        None => Isomorphism::not_isomorphic(),
    }
}

type Witness = Vec<(NodeIndex, NodeIndex)>;

#[cfg(feature = "parallel")]
fn first_success<F>(candidates: &[(NodeIndex, NodeIndex)], parallel: bool, trial: F) -> Option<Witness>
where
    F: Fn(NodeIndex, NodeIndex) -> Option<Witness> + Sync + Send,
{
    use rayon::prelude::*;

    if parallel {
        candidates.par_iter().find_map_any(|&(a, b)| trial(a, b))
    } else {
        candidates.iter().find_map(|&(a, b)| trial(a, b))
    }
}

#[cfg(not(feature = "parallel"))]
fn first_success<F>(candidates: &[(NodeIndex, NodeIndex)], _parallel: bool, trial: F) -> Option<Witness>
where
    F: Fn(NodeIndex, NodeIndex) -> Option<Witness>,
{
    candidates.iter().find_map(|&(a, b)| trial(a, b))
}

/// Checks that `iso` is a positive answer whose mapping is a bijection
/// between the nodes of `t1` and `t2` carrying edges onto edges in both
/// directions. Edge direction is respected for directed graphs.
pub fn is_valid_isomorphism<G1, G2>(t1: &G1, t2: &G2, iso: &Isomorphism<G1::Node, G2::Node>) -> bool
where
    G1: TreeGraph + ?Sized,
    G2: TreeGraph + ?Sized,
{
    let n = t1.n_nodes();
    if !iso.is_isomorphic() || n != t2.n_nodes() || iso.len() != n || t1.n_edges() != t2.n_edges() {
        return false;
    }

    let mut forward: NodeVec<Option<NodeIndex>> = NodeVec::from_elem(None, n);
    let mut backward: NodeVec<Option<NodeIndex>> = NodeVec::from_elem(None, n);
    for (a, b) in iso.pairs() {
        let (Some(a), Some(b)) = (t1.node_index(a), t2.node_index(b)) else {
            return false;
        };
        if forward[a].is_some() || backward[b].is_some() {
            return false;
        }
        forward[a] = Some(b);
        backward[b] = Some(a);
    }

    let forward_ok = t1.edges().all(|(u, v)| {
        matches!((forward[u], forward[v]), (Some(x), Some(y)) if t2.has_edge(x, y))
    });
    let backward_ok = t2.edges().all(|(x, y)| {
        matches!((backward[x], backward[y]), (Some(u), Some(v)) if t1.has_edge(u, v))
    });
    forward_ok && backward_ok
}
