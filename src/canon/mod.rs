//! # Canonical labelling of rooted trees
//!
//! Every node of a rooted tree receives an integer [`Code`] such that two
//! nodes share a code iff their rooted subtrees are isomorphic. Codes are
//! computed bottom-up, one level at a time (see [`crate::rooted::Levels`]):
//!
//! 1. [`initial_codes`] gives every childless node the code [`Code::LEAF`]
//!    and leaves everything else unresolved.
//! 2. For each level, [`structure::assign_structure`] turns every unresolved
//!    node into the sorted multiset of its children's codes, a [`Structure`].
//! 3. The structures of a level are pooled in a [`LevelCatalogue`], sorted
//!    lexicographically (see [`sort`]) and ranked densely from `1`.
//! 4. [`RankedCatalogue::finalize`] writes the ranks back as the codes of the
//!    level.
//!
//! When two trees are compared, both feed the *same* catalogue at every
//! level, so their codes are drawn from one rank space. Nodes are tagged with
//! the [`Side`] they come from so identical identifiers never collide.

use std::ops::{Index, IndexMut};

use derive_more::Display;

use crate::{
    graph::{NodeIndex, NodeVec},
    rooted::RootedTree,
};

pub mod catalogue;
pub mod sort;
pub mod structure;

pub use catalogue::{LevelCatalogue, RankedCatalogue};
pub use sort::SortStrategy;
pub use structure::{assign_structure, LevelStructures, Structure};

/// The canonical code of a rooted subtree.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Code(pub usize);

impl Code {
    /// Reserved for nodes without children; never handed out as a rank.
    pub const LEAF: Code = Code(0);
}

impl From<Code> for usize {
    fn from(code: Code) -> Self {
        code.0
    }
}

/// One code per node, `None` while the node is unresolved.
pub type CodeMap = NodeVec<Option<Code>>;

/// The finalized code of `node`.
///
/// # Panics
/// If `node` is still unresolved. Codes are only read one level above where
/// they are written, so this signals levels processed out of order.
pub fn finalized(codes: &CodeMap, node: NodeIndex) -> Code {
    codes[node].unwrap_or_else(|| panic!("code of node {node} read before its level was finalized"))
}

/// Bootstrap codes: [`Code::LEAF`] for every reached node without children
/// (including the root of a single-node tree), unresolved for the rest.
pub fn initial_codes(tree: &RootedTree) -> CodeMap {
    let mut codes = CodeMap::from_elem(None, tree.n_slots());
    for &node in tree.bfs_order() {
        if tree.children(node).is_empty() {
            codes[node] = Some(Code::LEAF);
        }
    }
    codes
}

/// Which of the two compared trees a node belongs to.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    #[display(fmt = "first")]
    Left,
    #[display(fmt = "second")]
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

/// A value for each of the two compared trees.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SidePair<T> {
    pub left: T,
    pub right: T,
}

impl<T> SidePair<T> {
    pub fn new(left: T, right: T) -> Self {
        SidePair { left, right }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> SidePair<U> {
        SidePair {
            left: f(self.left),
            right: f(self.right),
        }
    }

    pub fn as_ref(&self) -> SidePair<&T> {
        SidePair {
            left: &self.left,
            right: &self.right,
        }
    }
}

impl<T> Index<Side> for SidePair<T> {
    type Output = T;
    fn index(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

impl<T> IndexMut<Side> for SidePair<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}
