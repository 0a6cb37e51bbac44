//! kheper CLI: graph rewriting engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use kheper::engine::{Engine, EngineConfig};
use kheper::stepper::GenerationSnapshot;

#[derive(Parser)]
#[command(name = "kheper", version, about = "Graph rewriting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve a graph by a rewrite rule for N generations.
    Run {
        /// Graph text, e.g. "{1,2},{2,3}".
        #[arg(long, conflicts_with = "graph_file")]
        graph: Option<String>,

        /// Read graph text from a file instead.
        #[arg(long)]
        graph_file: Option<PathBuf>,

        /// Rule text, e.g. "{x,y} -> {x,y},{y,z}".
        #[arg(long, conflicts_with = "rule_file")]
        rule: Option<String>,

        /// Read rule text from a file instead.
        #[arg(long)]
        rule_file: Option<PathBuf>,

        /// Number of rewrite iterations.
        #[arg(long, default_value = "5")]
        depth: usize,

        /// Hard ceiling on any generation's node count.
        #[arg(long, default_value = "100000")]
        max_nodes: usize,

        /// Emit all generation snapshots as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Validate graph and rule text without running.
    Check {
        /// Graph text.
        #[arg(long, conflicts_with = "graph_file")]
        graph: Option<String>,

        /// Read graph text from a file instead.
        #[arg(long)]
        graph_file: Option<PathBuf>,

        /// Rule text.
        #[arg(long, conflicts_with = "rule_file")]
        rule: Option<String>,

        /// Read rule text from a file instead.
        #[arg(long)]
        rule_file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            graph,
            graph_file,
            rule,
            rule_file,
            depth,
            max_nodes,
            json,
        } => {
            let graph_text = load_input("graph", graph, graph_file)?;
            let rule_text = load_input("rule", rule, rule_file)?;

            let engine = Engine::new(EngineConfig {
                max_nodes,
                ..Default::default()
            });
            let snapshots = engine.run(&graph_text, &rule_text, Some(depth))?;

            if json {
                let out = serde_json::to_string_pretty(&snapshots).into_diagnostic()?;
                println!("{out}");
            } else {
                print_summary(&snapshots);
            }
        }

        Commands::Check {
            graph,
            graph_file,
            rule,
            rule_file,
        } => {
            let graph_text = load_input("graph", graph, graph_file)?;
            let rule_text = load_input("rule", rule, rule_file)?;

            let engine = Engine::new(EngineConfig::default());
            let report = engine.check(&graph_text, &rule_text)?;
            print!("{report}");
        }
    }

    Ok(())
}

/// Resolve an input from either an inline argument or a file.
fn load_input(name: &str, inline: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (inline, file) {
        (Some(text), None) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(&path).into_diagnostic(),
        (None, None) => miette::bail!("provide --{name} or --{name}-file"),
        (Some(_), Some(_)) => miette::bail!("--{name} and --{name}-file are mutually exclusive"),
    }
}

/// Human-readable per-generation summary.
///
/// The delta against the previous generation is computed here, in the
/// presentation layer: the engine itself only emits total snapshots.
fn print_summary(snapshots: &[GenerationSnapshot]) {
    for (i, snap) in snapshots.iter().enumerate() {
        if i == 0 {
            println!(
                "generation 0: {} nodes, {} links (initial)",
                snap.nodes.len(),
                snap.links.len()
            );
            continue;
        }
        let prev = &snapshots[i - 1];
        let new_nodes: Vec<&str> = snap
            .nodes
            .iter()
            .filter(|n| !prev.nodes.contains(n))
            .map(String::as_str)
            .collect();
        let new_links = snap.links.len() - prev.links.len();
        println!(
            "generation {}: {} nodes (+{}), {} links (+{})",
            snap.generation,
            snap.nodes.len(),
            new_nodes.len(),
            snap.links.len(),
            new_links
        );
        if !new_nodes.is_empty() {
            println!("  new nodes: {}", new_nodes.join(", "));
        }
    }
}
