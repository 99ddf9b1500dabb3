use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use treeiso::{
    graph::{validate::check_tree, Graph, TreeGraph},
    rooted_isomorphism_with, tree_isomorphism_with, Isomorphism, IsomorphismConfig,
    SortStrategy,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Positional bucket sort.
    Bucket,
    /// Comparison sort.
    Comparison,
}

impl From<StrategyArg> for SortStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Bucket => SortStrategy::Bucket,
            StrategyArg::Comparison => SortStrategy::Comparison,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "treeiso-cli",
    about = "Decide whether the trees of two DOT files are isomorphic and print a witness mapping."
)]
struct Cli {
    /// DOT file holding the first tree.
    first: PathBuf,
    /// DOT file holding the second tree.
    second: PathBuf,
    /// Root of the first tree; compares the trees as rooted trees (needs --root2).
    #[arg(long, value_name = "NODE", requires = "root2")]
    root1: Option<String>,
    /// Root of the second tree (needs --root1).
    #[arg(long, value_name = "NODE", requires = "root1")]
    root2: Option<String>,
    /// How each level's structures are sorted.
    #[arg(long, value_enum, default_value_t = StrategyArg::Bucket)]
    strategy: StrategyArg,
    /// Try the center pairs on the rayon pool.
    #[arg(long)]
    parallel: bool,
    /// Fail unless both inputs are trees.
    #[arg(long)]
    check_trees: bool,
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn load(path: &Path, check: bool) -> Result<Graph<String>> {
    let graph = Graph::from_dot_file(path)
        .with_context(|| format!("failed to load tree from {}", path.display()))?;
    if check {
        check_tree(&graph).with_context(|| format!("{} does not hold a tree", path.display()))?;
    }
    Ok(graph)
}

fn run(cli: &Cli) -> Result<Isomorphism<String, String>> {
    let first = load(&cli.first, cli.check_trees)?;
    let second = load(&cli.second, cli.check_trees)?;
    debug!(
        first_nodes = first.n_nodes(),
        second_nodes = second.n_nodes(),
        directed = first.is_directed(),
        "loaded trees"
    );

    let config = IsomorphismConfig::default()
        .with_sort(cli.strategy.into())
        .with_parallel(cli.parallel);

    match (&cli.root1, &cli.root2) {
        (Some(root1), Some(root2)) => rooted_isomorphism_with(&first, root1, &second, root2, &config)
            .context("rooted comparison failed"),
        _ => Ok(tree_isomorphism_with(&first, &second, &config)),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(iso) if iso.is_isomorphic() => {
            info!(pairs = iso.len(), "trees are isomorphic");
            println!("isomorphic");
            for (a, b) in iso.pairs() {
                println!("{a} -> {b}");
            }
            ExitCode::SUCCESS
        }
        Ok(_) => {
            println!("not isomorphic");
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("error: {err}");
            for cause in err.chain().skip(1) {
                eprintln!("  caused by: {cause}");
            }
            ExitCode::from(2)
        }
    }
}
