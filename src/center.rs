//! Centers of a tree by repeated leaf peeling.
//!
//! Every leaf of the current tree is removed at once, layer after layer,
//! until at most two nodes remain. A tree has either one center or two
//! adjacent ones; an isomorphism must map centers onto centers.

use bitvec::vec::BitVec;
use tracing::trace;

use crate::graph::{NodeIndex, NodeVec, TreeGraph};

/// The centers of `graph`, sorted by node index.
///
/// Returns an empty vector for the empty graph and the single node for a
/// one-node graph. On graphs with a cycle the peeling stalls once no leaves
/// are left, and the unpeeled nodes are returned.
pub fn centers<G: TreeGraph + ?Sized>(graph: &G) -> Vec<NodeIndex> {
    let n = graph.n_nodes();
    let mut degrees: NodeVec<usize> = graph.node_indices().map(|i| graph.degree(i)).collect();
    let mut removed = BitVec::<usize>::repeat(false, n);
    let mut remaining = n;

    let mut layer: Vec<NodeIndex> = degrees
        .iter()
        .filter(|(_, &d)| d <= 1)
        .map(|(i, _)| i)
        .collect();

    while remaining > 2 {
        if layer.is_empty() {
            trace!(remaining, "leaf peeling stalled on a cycle");
            break;
        }
        for &leaf in &layer {
            removed.set(leaf.0, true);
        }
        remaining -= layer.len();

        let mut next = Vec::new();
        for &leaf in &layer {
            for neighbor in graph.neighbors(leaf) {
                if removed[neighbor.0] {
                    continue;
                }
                degrees[neighbor] -= 1;
                if degrees[neighbor] == 1 {
                    next.push(neighbor);
                }
            }
        }
        layer = next;
    }

    removed.iter_zeros().map(NodeIndex).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::Graph;

    fn center_names(graph: &Graph<&'static str>) -> Vec<&'static str> {
        centers(graph).into_iter().map(|i| *graph.node(i)).collect()
    }

    #[test]
    fn single_center() {
        let graph = Graph::from_edges([
            ("v0", "v1"),
            ("v1", "v3"),
            ("v3", "v2"),
            ("v3", "v4"),
            ("v3", "v5"),
            ("v5", "v6"),
            ("v6", "v7"),
            ("v7", "v8"),
        ])
        .unwrap();
        assert_eq!(center_names(&graph), vec!["v5"]);

        let graph = Graph::from_edges([
            ("u0", "u1"),
            ("u1", "u2"),
            ("u2", "u3"),
            ("u3", "u4"),
            ("u4", "u5"),
            ("u4", "u6"),
            ("u4", "u7"),
            ("u7", "u8"),
        ])
        .unwrap();
        assert_eq!(center_names(&graph), vec!["u3"]);
    }

    #[test]
    fn two_centers_of_even_path() {
        let graph = Graph::from_edges([
            ("w0", "w1"),
            ("w1", "w2"),
            ("w2", "w3"),
            ("w3", "w4"),
            ("w4", "w5"),
        ])
        .unwrap();
        assert_eq!(center_names(&graph), vec!["w2", "w3"]);
    }

    #[test]
    fn tiny_trees() {
        let empty: Graph<u8> = Graph::new_undirected();
        assert!(centers(&empty).is_empty());

        let single = Graph::with_nodes(["a"]);
        assert_eq!(center_names(&single), vec!["a"]);

        let edge = Graph::from_edges([("b", "a")]).unwrap();
        assert_eq!(center_names(&edge), vec!["b", "a"]);

        let star = Graph::from_edges([("c", "x"), ("c", "y"), ("c", "z")]).unwrap();
        assert_eq!(center_names(&star), vec!["c"]);
    }

    #[test]
    fn direction_is_ignored() {
        let graph =
            Graph::directed_from_edges([("a", "b"), ("c", "b"), ("c", "d"), ("e", "d")]).unwrap();
        assert_eq!(center_names(&graph), vec!["c"]);
    }

    #[test]
    fn cycle_stalls() {
        let graph = Graph::from_edges([(0, 1), (1, 2), (2, 3), (3, 0), (0, 4)]).unwrap();
        let found = centers(&graph);
        assert_eq!(found, vec![NodeIndex(0), NodeIndex(1), NodeIndex(2), NodeIndex(3)]);
    }
}
