//! # Reading trees from the DOT language
//!
//! Graphs are parsed with the external `dot-parser` crate and flattened into
//! its canonical form (one statement per node and per edge) before being
//! turned into a [`Graph<String>`]. Node identifiers are the DOT node ids;
//! attributes are ignored since the trees compared here are unlabelled.
//! `digraph` produces a directed graph, `graph` an undirected one.
//!
//! ```rust
//! use treeiso::graph::{Graph, TreeGraph};
//!
//! let tree = Graph::from_dot_str("graph { a -- b; a -- c; }").unwrap();
//! assert_eq!(tree.n_nodes(), 3);
//! assert!(!tree.is_directed());
//! ```

use std::{collections::BTreeMap, path::Path};

use dot_parser::ast::PestError;
use itertools::Itertools;
use thiserror::Error;

use super::{Graph, GraphError};

#[derive(Debug, Error)]
pub enum DotError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Parse(#[from] PestError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl Graph<String> {
    #[allow(clippy::result_large_err)]
    pub fn from_dot_str<Str: AsRef<str>>(s: Str) -> Result<Self, DotError> {
        let ast_graph = dot_parser::ast::Graph::try_from(s.as_ref())?;
        let can_graph = dot_parser::canonical::Graph::from(
            ast_graph.filter_map(&|a| Some((a.0.to_string(), a.1.to_string()))),
        );
        Self::from_canonical(can_graph)
    }

    #[allow(clippy::result_large_err)]
    pub fn from_dot_file<P: AsRef<Path>>(path: P) -> Result<Self, DotError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| DotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_dot_str(contents)
    }

    #[allow(clippy::result_large_err)]
    fn from_canonical(
        value: dot_parser::canonical::Graph<(String, String)>,
    ) -> Result<Self, DotError> {
        let mut graph = if value.is_digraph {
            Graph::new_directed()
        } else {
            Graph::new_undirected()
        };

        // Declared nodes first, in a stable order, so isolated nodes survive.
        let nodes = BTreeMap::from_iter(value.nodes.set);
        for id in nodes.into_keys() {
            graph.add_node(id);
        }

        for e in value
            .edges
            .set
            .into_iter()
            .sorted_by(|a, b| Ord::cmp(&(&a.from, &a.to), &(&b.from, &b.to)))
        {
            graph.add_edge(e.from, e.to)?;
        }
        Ok(graph)
    }
}

/// Builds a [`Graph<String>`] from an inline DOT literal.
///
/// Prefer `digraph` with `->` edges: `--` is not a single Rust token and may be
/// re-spaced by `stringify!`.
#[macro_export]
macro_rules! dot {
    ($($t:tt)*) => {
        $crate::graph::Graph::<String>::from_dot_str(stringify!($($t)*))
    };
}
