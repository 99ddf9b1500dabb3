use std::fmt;

use super::{finalized, Code, CodeMap};
use crate::{graph::NodeIndex, rooted::RootedTree};

/// The sorted multiset of a node's children's codes.
///
/// The derived ordering is the lexicographic one, where a proper prefix sorts
/// before its extensions.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Structure(Vec<Code>);

impl Structure {
    pub fn new(mut codes: Vec<Code>) -> Self {
        codes.sort_unstable();
        Structure(codes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[Code]> for Structure {
    fn as_ref(&self) -> &[Code] {
        &self.0
    }
}

impl FromIterator<Code> for Structure {
    fn from_iter<I: IntoIterator<Item = Code>>(iter: I) -> Self {
        Structure::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, code) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "{code}")?;
        }
        write!(f, ")")
    }
}

/// The outcome of [`assign_structure`] for one level of one tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelStructures {
    /// Unresolved nodes of the level with their structure.
    pub structures: Vec<(NodeIndex, Structure)>,
    /// Nodes of the level that were already resolved (true leaves).
    pub leaves: Vec<NodeIndex>,
}

/// Builds the structure of every unresolved node in `level`.
///
/// # Panics
/// If a child of an unresolved node has no code yet (see [`finalized`]).
pub fn assign_structure(tree: &RootedTree, level: &[NodeIndex], codes: &CodeMap) -> LevelStructures {
    let mut out = LevelStructures::default();
    for &node in level {
        if codes[node].is_some() {
            out.leaves.push(node);
            continue;
        }
        let structure = tree
            .children(node)
            .iter()
            .map(|&child| finalized(codes, child))
            .collect();
        out.structures.push((node, structure));
    }
    out
}
