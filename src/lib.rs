//! # Treeiso
//!
//! Treeiso decides whether two trees are isomorphic and, when they are,
//! produces an explicit node bijection preserving adjacency. It implements
//! the level-by-level canonical labelling of Aho, Hopcroft and Ullman, with a
//! positional bucket sort so that each level is processed in near-linear
//! time, and reduces the unrooted problem to at most four rooted ones by
//! rooting both trees at their centers.
//!
//! The main entry points are [`tree_isomorphism`] and [`rooted_isomorphism`].
//! Inputs are anything implementing [`graph::TreeGraph`]; [`graph::Graph`] is
//! the provided container, which can also be read from DOT.
//!
//! ```rust
//! use treeiso::{graph::Graph, is_valid_isomorphism, tree_isomorphism};
//!
//! let t1 = Graph::from_edges([("a", "b"), ("b", "c"), ("b", "d")]).unwrap();
//! let t2 = Graph::from_edges([("x", "w"), ("y", "w"), ("w", "z")]).unwrap();
//!
//! let iso = tree_isomorphism(&t1, &t2);
//! assert!(iso.is_isomorphic());
//! assert!(is_valid_isomorphism(&t1, &t2, &iso));
//! ```

pub mod canon;
pub mod center;
pub mod generators;
pub mod graph;
pub mod isomorphism;
pub mod rooted;
pub mod typed_vec;
pub mod union_find;

pub use canon::SortStrategy;
pub use isomorphism::{
    is_valid_isomorphism, rooted_isomorphism, rooted_isomorphism_with, tree_isomorphism,
    tree_isomorphism_with, Isomorphism, IsomorphismConfig, IsomorphismError,
};
