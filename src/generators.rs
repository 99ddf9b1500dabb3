//! # Tree generators
//!
//! Fixtures for tests and benchmarks: simple shapes ([`path`], [`star`]),
//! uniformly random labelled trees ([`random_tree`]), random relabelling of an
//! existing graph ([`relabel_random`]) and the exhaustive enumeration of free
//! trees of a given order ([`NonIsomorphicTrees`]).
//!
//! All generated graphs are undirected `Graph<usize>` whose node `i` has
//! dense index `i`.

use std::{cmp::Reverse, collections::BinaryHeap, iter};

use rand::{seq::SliceRandom, Rng};

use crate::graph::{Graph, NodeIndex, TreeGraph};

fn nodes(n: usize) -> Graph<usize> {
    Graph::with_nodes(0..n)
}

/// The path `0 - 1 - ... - (n-1)`.
pub fn path(n: usize) -> Graph<usize> {
    let mut graph = nodes(n);
    for i in 1..n {
        graph.insert_edge_unchecked(NodeIndex(i - 1), NodeIndex(i));
    }
    graph
}

/// A star on `n` nodes: node `0` joined to every other node.
pub fn star(n: usize) -> Graph<usize> {
    let mut graph = nodes(n);
    for i in 1..n {
        graph.insert_edge_unchecked(NodeIndex(0), NodeIndex(i));
    }
    graph
}

/// A uniformly random labelled tree on `n` nodes, decoded from a random
/// Prüfer sequence.
pub fn random_tree<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Graph<usize> {
    let mut graph = nodes(n);
    if n < 2 {
        return graph;
    }

    let sequence: Vec<usize> = (0..n - 2).map(|_| rng.gen_range(0..n)).collect();
    let mut degree = vec![1; n];
    for &s in &sequence {
        degree[s] += 1;
    }

    let mut leaves: BinaryHeap<Reverse<usize>> =
        (0..n).filter(|&i| degree[i] == 1).map(Reverse).collect();
    for &s in &sequence {
        let Some(Reverse(leaf)) = leaves.pop() else {
            break;
        };
        graph.insert_edge_unchecked(NodeIndex(leaf), NodeIndex(s));
        degree[s] -= 1;
        if degree[s] == 1 {
            leaves.push(Reverse(s));
        }
    }
    if let (Some(Reverse(u)), Some(Reverse(v))) = (leaves.pop(), leaves.pop()) {
        graph.insert_edge_unchecked(NodeIndex(u), NodeIndex(v));
    }
    graph
}

/// An isomorphic copy of `graph` under a random permutation of its labels.
///
/// Nodes and edges are inserted in random order and, for undirected graphs,
/// each edge's endpoints are randomly swapped, so that nothing downstream
/// can rely on the original insertion order.
pub fn relabel_random<G, R>(graph: &G, rng: &mut R) -> Graph<G::Node>
where
    G: TreeGraph + ?Sized,
    R: Rng + ?Sized,
{
    let mut labels: Vec<G::Node> = graph.node_indices().map(|i| graph.node(i).clone()).collect();
    labels.shuffle(rng);

    let mut relabelled = if graph.is_directed() {
        Graph::new_directed()
    } else {
        Graph::new_undirected()
    };

    let mut insertion = labels.clone();
    insertion.shuffle(rng);
    for label in insertion {
        relabelled.add_node(label);
    }

    let mut edges: Vec<(NodeIndex, NodeIndex)> = graph.edges().collect();
    edges.shuffle(rng);
    for (a, b) in edges {
        let (mut a, mut b) = (&labels[a.0], &labels[b.0]);
        if !graph.is_directed() && rng.gen_bool(0.5) {
            std::mem::swap(&mut a, &mut b);
        }
        let a = relabelled.add_node(a.clone());
        let b = relabelled.add_node(b.clone());
        relabelled.insert_edge_unchecked(a, b);
    }
    relabelled
}

/// Every free (unrooted, unlabelled) tree of a given order, each exactly
/// once up to isomorphism.
///
/// Trees are walked as canonical level sequences with the algorithm of
/// Wright, Richmond, Odlyzko and McKay, in constant amortized time per tree.
/// A level sequence lists the depths of the nodes of a rooted tree in
/// preorder; only sequences of trees rooted at a center, with the canonical
/// choice of subtrees, are emitted.
///
/// ```rust
/// use treeiso::generators::NonIsomorphicTrees;
///
/// assert_eq!(NonIsomorphicTrees::new(6).count(), 6);
/// ```
#[derive(Clone, Debug)]
pub struct NonIsomorphicTrees {
    order: usize,
    layout: Option<Vec<usize>>,
}

impl NonIsomorphicTrees {
    /// Order `0` yields nothing; order `1` yields the single-node tree.
    pub fn new(order: usize) -> Self {
        let layout = match order {
            0 => None,
            1 => Some(vec![0]),
            _ => Some((0..=order / 2).chain(1..(order + 1) / 2).collect()),
        };
        NonIsomorphicTrees { order, layout }
    }

    pub fn order(&self) -> usize {
        self.order
    }
}

impl Iterator for NonIsomorphicTrees {
    type Item = Graph<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let layout = self.layout.take()?;
        if self.order == 1 {
            return Some(nodes(1));
        }
        let layout = next_tree(layout)?;
        self.layout = next_rooted_tree(&layout, None);
        Some(layout_to_graph(&layout))
    }
}

/// The successor of a level sequence among rooted trees.
///
/// Without `p`, the last node not at level 1 is advanced.
fn next_rooted_tree(predecessor: &[usize], p: Option<usize>) -> Option<Vec<usize>> {
    let p = p.unwrap_or_else(|| {
        let mut p = predecessor.len() - 1;
        while predecessor[p] == 1 {
            p -= 1;
        }
        p
    });
    if p == 0 {
        return None;
    }

    let mut q = p - 1;
    while predecessor[q] + 1 != predecessor[p] {
        q -= 1;
    }
    let mut result = predecessor.to_vec();
    for i in p..result.len() {
        result[i] = result[i - p + q];
    }
    Some(result)
}

/// Splits a level sequence into the first subtree of the root (levels
/// shifted up by one) and the root with its remaining subtrees.
fn split_tree(layout: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let m = layout
        .iter()
        .enumerate()
        .filter(|(_, &level)| level == 1)
        .nth(1)
        .map_or(layout.len(), |(i, _)| i);
    let left = layout[1..m].iter().map(|level| level - 1).collect();
    let rest = iter::once(0).chain(layout[m..].iter().copied()).collect();
    (left, rest)
}

/// Accepts `candidate` if it is the canonical sequence of a free tree, or
/// jumps to the next candidate that may be.
fn next_tree(candidate: Vec<usize>) -> Option<Vec<usize>> {
    let (left, rest) = split_tree(&candidate);
    let left_height = left.iter().copied().max().unwrap_or(0);
    let rest_height = rest.iter().copied().max().unwrap_or(0);

    let valid = match rest_height.cmp(&left_height) {
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => {
            left.len() < rest.len() || (left.len() == rest.len() && left <= rest)
        }
    };
    if valid {
        return Some(candidate);
    }

    let p = left.len();
    let mut next = next_rooted_tree(&candidate, Some(p))?;
    if candidate[p] > 2 {
        let (new_left, _) = split_tree(&next);
        let height = new_left.iter().copied().max().unwrap_or(0);
        let start = next.len() - (height + 1);
        for (slot, level) in next[start..].iter_mut().zip(1..) {
            *slot = level;
        }
    }
    Some(next)
}

/// The tree of a level sequence: node `i` hangs from the closest earlier
/// node one level up.
fn layout_to_graph(layout: &[usize]) -> Graph<usize> {
    let mut graph = nodes(layout.len());
    let mut stack: Vec<usize> = Vec::new();
    for (i, &level) in layout.iter().enumerate() {
        while stack.last().is_some_and(|&j| layout[j] >= level) {
            stack.pop();
        }
        if let Some(&parent) = stack.last() {
            graph.insert_edge_unchecked(NodeIndex(i), NodeIndex(parent));
        }
        stack.push(i);
    }
    graph
}

#[cfg(test)]
mod test {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;
    use crate::{center::centers, graph::validate::is_tree};

    #[test]
    fn shapes() {
        let p = path(5);
        assert!(is_tree(&p));
        assert_eq!(p.n_edges(), 4);
        assert_eq!(centers(&p), vec![NodeIndex(2)]);

        let s = star(5);
        assert!(is_tree(&s));
        assert_eq!(s.degree(NodeIndex(0)), 4);
        assert_eq!(centers(&s), vec![NodeIndex(0)]);

        assert_eq!(path(0).n_nodes(), 0);
        assert_eq!(star(1).n_edges(), 0);
    }

    #[test]
    fn random_trees_are_trees() {
        let mut rng = SmallRng::seed_from_u64(42);
        for n in 1..40 {
            let tree = random_tree(n, &mut rng);
            assert_eq!(tree.n_nodes(), n);
            assert!(is_tree(&tree), "order {n}");
        }
        assert_eq!(random_tree(0, &mut rng).n_nodes(), 0);
    }

    #[test]
    fn relabelling_keeps_labels_and_degrees() {
        let mut rng = SmallRng::seed_from_u64(7);
        let tree = random_tree(25, &mut rng);
        let copy = relabel_random(&tree, &mut rng);

        assert!(is_tree(&copy));
        assert_eq!(copy.n_edges(), tree.n_edges());
        let mut labels: Vec<usize> = copy.nodes().copied().collect();
        labels.sort_unstable();
        assert_eq!(labels, (0..25).collect::<Vec<_>>());

        let degrees = |g: &Graph<usize>| {
            let mut d: Vec<usize> = g.node_indices().map(|i| g.degree(i)).collect();
            d.sort_unstable();
            d
        };
        assert_eq!(degrees(&tree), degrees(&copy));
    }

    #[test]
    fn relabelling_keeps_direction() {
        let mut rng = SmallRng::seed_from_u64(3);
        let graph = Graph::directed_from_edges([("a", "b"), ("b", "c")]).unwrap();
        let copy = relabel_random(&graph, &mut rng);
        assert!(copy.is_directed());
        let middle: Vec<_> = copy
            .node_indices()
            .filter(|&i| copy.degree(i) == 2)
            .collect();
        assert_eq!(middle.len(), 1);
        assert_eq!(copy.neighbors(middle[0]).count(), 2);
        assert_eq!(copy.edges().filter(|&(a, _)| a == middle[0]).count(), 1);
    }

    #[test]
    fn level_sequence_helpers() {
        assert_eq!(split_tree(&[0, 1, 2, 1, 2]), (vec![0, 1], vec![0, 1, 2]));
        assert_eq!(next_rooted_tree(&[0, 1, 2, 1, 2], None), Some(vec![0, 1, 2, 1, 1]));
        assert_eq!(next_rooted_tree(&[0, 1, 1, 1], None), None);

        let graph = layout_to_graph(&[0, 1, 2, 1]);
        assert!(graph.has_edge(NodeIndex(1), NodeIndex(0)));
        assert!(graph.has_edge(NodeIndex(2), NodeIndex(1)));
        assert!(graph.has_edge(NodeIndex(3), NodeIndex(0)));
    }

    #[test]
    fn counts_of_free_trees() {
        let counts: Vec<usize> = (1..=10).map(|n| NonIsomorphicTrees::new(n).count()).collect();
        assert_eq!(counts, vec![1, 1, 1, 2, 3, 6, 11, 23, 47, 106]);
        assert_eq!(NonIsomorphicTrees::new(0).count(), 0);
    }

    #[test]
    fn enumerated_graphs_are_trees_of_the_order() {
        for order in 1..=9 {
            for tree in NonIsomorphicTrees::new(order) {
                assert_eq!(tree.n_nodes(), order);
                assert!(is_tree(&tree));
            }
        }
    }
}
