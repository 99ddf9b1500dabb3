//! The per-level structure catalogue shared by both compared trees.

use ahash::RandomState;
use indexmap::IndexMap;
use tracing::trace;

use super::{Code, CodeMap, LevelStructures, Side, SidePair, SortStrategy, Structure};
use crate::graph::NodeIndex;

/// Maps every distinct structure of a level to the nodes, of either tree,
/// carrying it.
#[derive(Clone, Debug, Default)]
pub struct LevelCatalogue {
    entries: IndexMap<Structure, Vec<(Side, NodeIndex)>, RandomState>,
}

impl LevelCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, side: Side, node: NodeIndex, structure: Structure) {
        self.entries.entry(structure).or_default().push((side, node));
    }

    /// Adds the structures one tree produced for this level.
    pub fn extend(&mut self, side: Side, level: LevelStructures) {
        for (node, structure) in level.structures {
            self.insert(side, node, structure);
        }
    }

    /// Number of distinct structures seen so far.
    pub fn n_distinct(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorts the distinct structures and ranks them densely from `1`.
    pub fn rank(self, strategy: SortStrategy) -> RankedCatalogue {
        let order = {
            let keys: Vec<&Structure> = self.entries.keys().collect();
            strategy.order::<_, Code>(&keys)
        };
        let mut slots: Vec<_> = self.entries.into_iter().map(Some).collect();
        let entries: Vec<_> = order
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect();
        trace!(distinct = entries.len(), ?strategy, "ranked level catalogue");
        RankedCatalogue { entries }
    }
}

/// A level catalogue in sorted order: the structure at position `i` has code
/// `i + 1`.
#[derive(Clone, Debug, Default)]
pub struct RankedCatalogue {
    entries: Vec<(Structure, Vec<(Side, NodeIndex)>)>,
}

impl RankedCatalogue {
    /// `(code, structure, carriers)` in increasing code order.
    pub fn iter(&self) -> impl Iterator<Item = (Code, &Structure, &[(Side, NodeIndex)])> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, (structure, nodes))| (Code(i + 1), structure, nodes.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the rank of every catalogued node into the code map of its side.
    pub fn finalize(&self, codes: &mut SidePair<CodeMap>) {
        for (code, _, nodes) in self.iter() {
            for &(side, node) in nodes {
                codes[side][node] = Some(code);
            }
        }
    }
}
