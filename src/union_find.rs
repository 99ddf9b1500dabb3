use std::{
    cell::Cell,
    ops::{Index, IndexMut},
};

use crate::graph::NodeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetIndex(pub usize);

impl From<usize> for SetIndex {
    fn from(x: usize) -> Self {
        SetIndex(x)
    }
}

/// A node in the union–find forest.
///
/// - `Root { set_data_idx, rank }` means this node is a root and stores its
///   union–by–rank value and an index into the associated set data.
/// - `Child(parent)` means this node is not a root; it points to its parent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UFNode {
    Root { set_data_idx: SetIndex, rank: usize },
    Child(NodeIndex),
}

/// Union–find over the nodes of a graph, carrying data `U` for every set.
///
/// Internally:
/// - The parent–pointer forest is stored as a `Vec<Cell<UFNode>>` so that `find` (with path
///   compression) can update parent pointers through a shared reference.
/// - Set data is kept compact: when two sets merge, the losing slot is swap-removed, so
///   [`UnionFind::n_sets`] is simply the number of live slots.
pub struct UnionFind<U> {
    nodes: Vec<Cell<UFNode>>,
    set_data: Vec<Option<U>>,
    /// For each slot in `set_data`, the root that owns it.
    data_to_node: Vec<NodeIndex>,
}

impl<U> UnionFind<U> {
    /// Every node starts as its own set, owning the data at the same position.
    pub fn new(associated: Vec<U>) -> Self {
        let n = associated.len();
        let nodes = (0..n)
            .map(|i| {
                Cell::new(UFNode::Root {
                    set_data_idx: SetIndex(i),
                    rank: 0,
                })
            })
            .collect();
        UnionFind {
            nodes,
            set_data: associated.into_iter().map(Some).collect(),
            data_to_node: (0..n).map(NodeIndex).collect(),
        }
    }

    pub fn n_sets(&self) -> usize {
        self.set_data.len()
    }

    /// Finds the representative of the set containing `x`, compressing the path on the way.
    pub fn find(&self, x: NodeIndex) -> NodeIndex {
        match self.nodes[x.0].get() {
            UFNode::Root { .. } => x,
            UFNode::Child(parent) => {
                let root = self.find(parent);
                self.nodes[x.0].set(UFNode::Child(root));
                root
            }
        }
    }

    pub fn same_set(&self, x: NodeIndex, y: NodeIndex) -> bool {
        self.find(x) == self.find(y)
    }

    pub fn find_data_index(&self, x: NodeIndex) -> SetIndex {
        let root = self.find(x);
        match self.nodes[root.0].get() {
            UFNode::Root { set_data_idx, .. } => set_data_idx,
            UFNode::Child(_) => unreachable!("find() always returns a root"),
        }
    }

    /// The data of the set containing `x`.
    pub fn find_data(&self, x: NodeIndex) -> &U {
        &self[self.find_data_index(x)]
    }

    fn root_entry(&self, root: NodeIndex) -> (usize, SetIndex) {
        match self.nodes[root.0].get() {
            UFNode::Root { rank, set_data_idx } => (rank, set_data_idx),
            UFNode::Child(_) => unreachable!("expected a root"),
        }
    }

    /// Merges the sets containing `x` and `y`, combining their data with `merge`.
    ///
    /// Returns `None` when both already belong to the same set, otherwise the new root.
    pub fn union<F>(&mut self, x: NodeIndex, y: NodeIndex, merge: F) -> Option<NodeIndex>
    where
        F: FnOnce(U, U) -> U,
    {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return None;
        }

        let (rank_x, data_idx_x) = self.root_entry(root_x);
        let (rank_y, data_idx_y) = self.root_entry(root_y);

        let (winner, loser, mut winner_data_idx, loser_data_idx) = if rank_x < rank_y {
            (root_y, root_x, data_idx_y, data_idx_x)
        } else {
            (root_x, root_y, data_idx_x, data_idx_y)
        };
        let winner_rank = if rank_x == rank_y {
            rank_x + 1
        } else {
            rank_x.max(rank_y)
        };

        self.nodes[loser.0].set(UFNode::Child(winner));

        // Both slots are live roots, so the data is present.
        let (Some(winner_data), Some(loser_data)) = (
            self.set_data[winner_data_idx.0].take(),
            self.set_data[loser_data_idx.0].take(),
        ) else {
            unreachable!("root without set data")
        };
        self.set_data[winner_data_idx.0] = Some(merge(winner_data, loser_data));

        let last_idx = self.set_data.len() - 1;
        if loser_data_idx.0 != last_idx {
            self.set_data.swap(loser_data_idx.0, last_idx);
            self.data_to_node.swap(loser_data_idx.0, last_idx);
            let swapped_node = self.data_to_node[loser_data_idx.0];
            if let UFNode::Root { rank, .. } = self.nodes[swapped_node.0].get() {
                self.nodes[swapped_node.0].set(UFNode::Root {
                    set_data_idx: loser_data_idx,
                    rank,
                });
            }
            if winner_data_idx.0 == last_idx {
                winner_data_idx = loser_data_idx;
            }
        }
        self.set_data.pop();
        self.data_to_node.pop();

        self.nodes[winner.0].set(UFNode::Root {
            set_data_idx: winner_data_idx,
            rank: winner_rank,
        });

        Some(winner)
    }
}

impl<U> Index<SetIndex> for UnionFind<U> {
    type Output = U;
    fn index(&self, index: SetIndex) -> &Self::Output {
        match &self.set_data[index.0] {
            Some(data) => data,
            None => unreachable!("set data is only taken during a union"),
        }
    }
}

impl<U> IndexMut<SetIndex> for UnionFind<U> {
    fn index_mut(&mut self, index: SetIndex) -> &mut Self::Output {
        match &mut self.set_data[index.0] {
            Some(data) => data,
            None => unreachable!("set data is only taken during a union"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sum_merge(a: usize, b: usize) -> usize {
        a + b
    }

    #[test]
    fn union_merges_data() {
        let mut uf = UnionFind::new(vec![10, 20, 30, 40, 50]);

        assert_eq!(*uf.find_data(NodeIndex(0)), 10);
        assert!(uf.union(NodeIndex(0), NodeIndex(1), sum_merge).is_some());
        assert_eq!(*uf.find_data(NodeIndex(1)), 30);
        assert_eq!(uf.n_sets(), 4);

        assert!(uf.union(NodeIndex(1), NodeIndex(0), sum_merge).is_none());
        assert_eq!(uf.n_sets(), 4);
    }

    #[test]
    fn swap_removal_keeps_slots_consistent() {
        let mut uf = UnionFind::new(vec![1, 2, 3, 4, 5]);

        // Merging into the last slot forces the swap path.
        uf.union(NodeIndex(4), NodeIndex(0), sum_merge);
        uf.union(NodeIndex(2), NodeIndex(3), sum_merge);

        assert_eq!(*uf.find_data(NodeIndex(0)), 6);
        assert_eq!(*uf.find_data(NodeIndex(4)), 6);
        assert_eq!(*uf.find_data(NodeIndex(3)), 7);
        assert_eq!(*uf.find_data(NodeIndex(1)), 2);
        assert_eq!(uf.n_sets(), 3);

        uf.union(NodeIndex(1), NodeIndex(3), sum_merge);
        uf.union(NodeIndex(0), NodeIndex(2), sum_merge);
        assert_eq!(uf.n_sets(), 1);
        assert_eq!(*uf.find_data(NodeIndex(3)), 15);
    }

    #[test]
    fn path_compression() {
        let mut uf = UnionFind::new(vec![(); 4]);
        uf.union(NodeIndex(0), NodeIndex(1), |_, _| ());
        uf.union(NodeIndex(1), NodeIndex(2), |_, _| ());
        uf.union(NodeIndex(2), NodeIndex(3), |_, _| ());

        let root = uf.find(NodeIndex(3));
        assert!(uf.same_set(NodeIndex(0), NodeIndex(3)));
        assert_eq!(uf.find(NodeIndex(2)), root);
        assert_eq!(uf.find(NodeIndex(1)), root);
    }
}
