//! Engine facade: top-level API for the kheper rewriting system.
//!
//! The `Engine` ties the stages together: parse the graph text, validate
//! its single root, compile the rule, and drive the generation stepper.
//! External collaborators (visualizers, host UIs) hand it raw text and an
//! iteration count and get back one total snapshot per generation.

use crate::error::KheperResult;
use crate::graph::Graph;
use crate::parse;
use crate::rule::RuleSpec;
use crate::stepper::{Evolution, GenerationSnapshot};

/// Configuration for the kheper engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Hard ceiling on the node count of any generation. Rewrites that
    /// cross it fail fast instead of exhausting memory.
    pub max_nodes: usize,
    /// Iteration count used when the caller does not supply one.
    pub default_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_nodes: 100_000,
            default_depth: 5,
        }
    }
}

/// The kheper graph rewriting engine.
///
/// Synchronous and single-threaded: parsing, matching, and rewriting for
/// one step complete before the next step begins. A run either produces
/// every requested generation or fails outright at the first bad stage.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a full evolution from raw text.
    ///
    /// Parses `graph_text`, validates its single root, compiles `rule_text`,
    /// then applies `depth` rewrite iterations (falling back to
    /// `default_depth`). Returns `depth + 1` snapshots, generation 0 being
    /// the initial graph.
    pub fn run(
        &self,
        graph_text: &str,
        rule_text: &str,
        depth: Option<usize>,
    ) -> KheperResult<Vec<GenerationSnapshot>> {
        let depth = depth.unwrap_or(self.config.default_depth);
        let (graph, rule) = self.prepare(graph_text, rule_text)?;

        tracing::info!(
            depth,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            max_nodes = self.config.max_nodes,
            "starting evolution"
        );

        let mut evolution = Evolution::new(graph, rule, self.config.max_nodes);
        let snapshots = evolution.run(depth)?;

        tracing::info!(
            generations = snapshots.len(),
            final_nodes = evolution.graph().node_count(),
            final_edges = evolution.graph().edge_count(),
            "evolution complete"
        );

        Ok(snapshots)
    }

    /// Validate graph and rule text without running any iteration.
    pub fn check(&self, graph_text: &str, rule_text: &str) -> KheperResult<CheckReport> {
        let (graph, rule) = self.prepare(graph_text, rule_text)?;
        let root = graph.root()?.to_string();
        Ok(CheckReport {
            root,
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            pattern_root: rule.pattern_root().to_string(),
            pattern_node_count: rule.pattern().node_count(),
            body_pair_count: rule.body().len(),
        })
    }

    /// Parse and validate both inputs: graph text (with single-root check)
    /// and rule text (compiled, pattern root resolved).
    fn prepare(&self, graph_text: &str, rule_text: &str) -> KheperResult<(Graph, RuleSpec)> {
        let graph = parse::parse_graph(graph_text)?;
        graph.root()?;
        let rule = RuleSpec::compile(rule_text)?;
        Ok((graph, rule))
    }
}

/// Result of validating a graph/rule pair without running it.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub root: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub pattern_root: String,
    pub pattern_node_count: usize,
    pub body_pair_count: usize,
}

impl std::fmt::Display for CheckReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "graph")?;
        writeln!(f, "  root:   {}", self.root)?;
        writeln!(f, "  nodes:  {}", self.node_count)?;
        writeln!(f, "  edges:  {}", self.edge_count)?;
        writeln!(f, "rule")?;
        writeln!(f, "  pattern root:  {}", self.pattern_root)?;
        writeln!(f, "  pattern nodes: {}", self.pattern_node_count)?;
        writeln!(f, "  body pairs:    {}", self.body_pair_count)?;
        Ok(())
    }
}
