//! The rooted isomorphism oracle.
//!
//! A trial labels both rooted trees level by level through one shared
//! catalogue per level, compares the root codes and, when they agree, walks
//! both trees top-down pairing children with equal codes.

use std::collections::VecDeque;

use ahash::RandomState;
use indexmap::IndexMap;
use tracing::{debug, trace};

use super::{Isomorphism, IsomorphismConfig, IsomorphismError};
use crate::{
    canon::{
        assign_structure, finalized, initial_codes, Code, CodeMap, LevelCatalogue, Side,
        SidePair, SortStrategy,
    },
    graph::{NodeIndex, TreeGraph},
    rooted::{ParentId, RootedTree},
};

fn format_code(code: &Option<Code>) -> String {
    code.map_or_else(|| "-".to_string(), |c| c.to_string())
}

/// Children of `node` grouped by code, groups and members in child order.
fn group_by_code(
    tree: &RootedTree,
    codes: &CodeMap,
    node: NodeIndex,
) -> IndexMap<Code, Vec<NodeIndex>, RandomState> {
    let mut groups: IndexMap<Code, Vec<NodeIndex>, RandomState> = IndexMap::default();
    for &child in tree.children(node) {
        groups.entry(finalized(codes, child)).or_default().push(child);
    }
    groups
}

/// Rebuilds a bijection between two fully labelled trees whose roots share a
/// code. Pairs are returned sorted by the left index.
fn match_trees(trees: &SidePair<RootedTree>, codes: &SidePair<CodeMap>) -> Vec<(NodeIndex, NodeIndex)> {
    let mut pairs = Vec::with_capacity(trees.left.len());
    let mut queue = VecDeque::from([(trees.left.root(), trees.right.root())]);

    while let Some((u, v)) = queue.pop_front() {
        debug_assert_eq!(
            trees.left.parent(u).map(|p| p == ParentId::Root),
            trees.right.parent(v).map(|p| p == ParentId::Root),
            "paired nodes {u} and {v} disagree on being the root"
        );
        pairs.push((u, v));
        let left = group_by_code(&trees.left, &codes.left, u);
        let mut right = group_by_code(&trees.right, &codes.right, v);
        for (code, lefts) in left {
            let rights = right.swap_remove(&code).unwrap_or_default();
            debug_assert_eq!(lefts.len(), rights.len(), "children with code {code} differ in number");
            queue.extend(lefts.into_iter().zip(rights));
        }
    }

    pairs.sort_unstable();
    pairs
}

/// Runs one comparison of `t1` rooted at `r1` against `t2` rooted at `r2`.
///
/// Returns the index pairs of a witness bijection, or `None` when the rooted
/// trees are not isomorphic.
pub(crate) fn rooted_trial<G1, G2>(
    t1: &G1,
    r1: NodeIndex,
    t2: &G2,
    r2: NodeIndex,
    strategy: SortStrategy,
) -> Option<Vec<(NodeIndex, NodeIndex)>>
where
    G1: TreeGraph + ?Sized,
    G2: TreeGraph + ?Sized,
{
    if t1.n_nodes() != t2.n_nodes() {
        debug!(left = t1.n_nodes(), right = t2.n_nodes(), "node counts differ");
        return None;
    }

    let trees = SidePair::new(RootedTree::new(t1, r1), RootedTree::new(t2, r2));
    if trees.left.height() != trees.right.height() {
        debug!(
            left = trees.left.height(),
            right = trees.right.height(),
            "heights differ"
        );
        return None;
    }
    if !trees.left.spans() || !trees.right.spans() {
        debug!(
            left = trees.left.len(),
            right = trees.right.len(),
            n = t1.n_nodes(),
            "graph is not connected from its root"
        );
        return None;
    }

    let levels = trees.as_ref().map(RootedTree::levels);
    let mut codes = trees.as_ref().map(initial_codes);

    for level in 0..=trees.left.height() {
        let mut catalogue = LevelCatalogue::new();
        for side in Side::BOTH {
            let structures = assign_structure(&trees[side], levels[side].level(level), &codes[side]);
            catalogue.extend(side, structures);
        }
        trace!(level, distinct = catalogue.n_distinct(), "level catalogue");
        catalogue.rank(strategy).finalize(&mut codes);
    }

    trace!(
        left = %codes.left.display_string(format_code),
        right = %codes.right.display_string(format_code),
        "final codes"
    );

    let root_codes = (finalized(&codes.left, r1), finalized(&codes.right, r2));
    if root_codes.0 != root_codes.1 {
        debug!(left = %root_codes.0, right = %root_codes.1, "root codes differ");
        return None;
    }
    Some(match_trees(&trees, &codes))
}

/// Decides whether `t1` rooted at `root1` and `t2` rooted at `root2` are
/// isomorphic as rooted trees, with the default configuration.
pub fn rooted_isomorphism<G1, G2>(
    t1: &G1,
    root1: &G1::Node,
    t2: &G2,
    root2: &G2::Node,
) -> Result<Isomorphism<G1::Node, G2::Node>, IsomorphismError>
where
    G1: TreeGraph + ?Sized,
    G2: TreeGraph + ?Sized,
{
    rooted_isomorphism_with(t1, root1, t2, root2, &IsomorphismConfig::default())
}

/// Like [`rooted_isomorphism`], with an explicit configuration.
///
/// A root that is not a node of its tree is an error; every other mismatch
/// is a negative result.
pub fn rooted_isomorphism_with<G1, G2>(
    t1: &G1,
    root1: &G1::Node,
    t2: &G2,
    root2: &G2::Node,
    config: &IsomorphismConfig,
) -> Result<Isomorphism<G1::Node, G2::Node>, IsomorphismError>
where
    G1: TreeGraph + ?Sized,
    G2: TreeGraph + ?Sized,
{
    let r1 = t1
        .node_index(root1)
        .ok_or_else(|| IsomorphismError::RootNotInTree {
            side: Side::Left,
            root: format!("{root1:?}"),
        })?;
    let r2 = t2
        .node_index(root2)
        .ok_or_else(|| IsomorphismError::RootNotInTree {
            side: Side::Right,
            root: format!("{root2:?}"),
        })?;

    Ok(match rooted_trial(t1, r1, t2, r2, config.sort) {
        Some(pairs) => Isomorphism::from_indices(t1, t2, pairs),
        None => Isomorphism::not_isomorphic(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{graph::Graph, isomorphism::is_valid_isomorphism};

    fn branching() -> Graph<&'static str> {
        Graph::from_edges([
            ("v0", "v1"),
            ("v0", "v2"),
            ("v0", "v3"),
            ("v1", "v4"),
            ("v1", "v5"),
            ("v3", "v6"),
            ("v4", "v7"),
            ("v4", "v8"),
            ("v4", "v9"),
            ("v6", "v10"),
            ("v6", "v11"),
            ("v9", "v12"),
        ])
        .unwrap()
    }

    fn branching_relabelled() -> Graph<&'static str> {
        Graph::from_edges([
            ("w0", "w1"),
            ("w0", "w2"),
            ("w0", "w3"),
            ("w2", "w4"),
            ("w4", "w5"),
            ("w4", "w6"),
            ("w3", "w7"),
            ("w3", "w8"),
            ("w8", "w9"),
            ("w8", "w10"),
            ("w8", "w11"),
            ("w10", "w12"),
        ])
        .unwrap()
    }

    #[test]
    fn hardcoded_rooted_pair() {
        let (t1, t2) = (branching(), branching_relabelled());
        for sort in [SortStrategy::Bucket, SortStrategy::Comparison] {
            let config = IsomorphismConfig::default().with_sort(sort);
            let iso = rooted_isomorphism_with(&t1, &"v0", &t2, &"w0", &config).unwrap();
            assert!(iso.is_isomorphic());
            assert_eq!(iso.len(), 13);
            assert_eq!(iso.pairs()[0], ("v0", "w0"));
            assert!(is_valid_isomorphism(&t1, &t2, &iso));
        }
    }

    #[test]
    fn wrong_root_is_negative() {
        let (t1, t2) = (branching(), branching_relabelled());
        let iso = rooted_isomorphism(&t1, &"v0", &t2, &"w12").unwrap();
        assert!(!iso.is_isomorphic());
        assert!(iso.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let (t1, t2) = (branching(), branching_relabelled());
        assert_eq!(
            rooted_isomorphism(&t1, &"v0", &t2, &"nope"),
            Err(IsomorphismError::RootNotInTree {
                side: Side::Right,
                root: "\"nope\"".into()
            })
        );
        assert!(matches!(
            rooted_isomorphism(&t1, &"x", &t2, &"w0"),
            Err(IsomorphismError::RootNotInTree { side: Side::Left, .. })
        ));
    }

    #[test]
    fn height_mismatch_short_circuits() {
        // Same order, one tree rooted at an end of a path, the other at its middle.
        let path = Graph::from_edges([(0, 1), (1, 2)]).unwrap();
        let iso = rooted_isomorphism(&path, &0, &path, &1).unwrap();
        assert!(!iso.is_isomorphic());

        let iso = rooted_isomorphism(&path, &0, &path, &2).unwrap();
        assert_eq!(iso.into_pairs(), vec![(0, 2), (1, 1), (2, 0)]);
    }

    #[test]
    fn same_height_different_shape() {
        let t1 = Graph::from_edges([("r", "a"), ("r", "b"), ("a", "c"), ("a", "d")]).unwrap();
        let t2 = Graph::from_edges([("r", "a"), ("r", "b"), ("a", "c"), ("b", "d")]).unwrap();
        let iso = rooted_isomorphism(&t1, &"r", &t2, &"r").unwrap();
        assert!(!iso.is_isomorphic());
    }

    #[test]
    fn single_nodes() {
        let t1 = Graph::with_nodes(["a"]);
        let t2 = Graph::with_nodes(["n"]);
        let iso = rooted_isomorphism(&t1, &"a", &t2, &"n").unwrap();
        assert_eq!(iso.pairs(), &[("a", "n")]);
    }

    #[test]
    fn disconnected_graphs_are_negative() {
        let mut t1 = Graph::from_edges([(0, 1), (1, 2), (2, 0)]).unwrap();
        t1.add_node(3);
        let mut t2 = Graph::from_edges([(10, 11), (11, 12), (12, 10)]).unwrap();
        t2.add_node(13);

        let iso = rooted_isomorphism(&t1, &0, &t2, &10).unwrap();
        assert!(!iso.is_isomorphic());
        assert!(iso.is_empty());
        assert!(!crate::tree_isomorphism(&t1, &t2).is_isomorphic());

        let forest = Graph::from_edges([(0, 1), (2, 3)]).unwrap();
        assert!(!rooted_isomorphism(&forest, &0, &forest, &0).unwrap().is_isomorphic());
    }

    #[test]
    fn children_are_paired_by_code() {
        let t1 = Graph::from_edges([("r", "x"), ("r", "y"), ("y", "z")]).unwrap();
        let t2 = Graph::from_edges([("s", "p"), ("p", "q"), ("s", "t")]).unwrap();
        let iso = rooted_isomorphism(&t1, &"r", &t2, &"s").unwrap();
        let map = iso.to_map();
        assert_eq!(map[&"r"], "s");
        assert_eq!(map[&"x"], "t");
        assert_eq!(map[&"y"], "p");
        assert_eq!(map[&"z"], "q");
    }
}
