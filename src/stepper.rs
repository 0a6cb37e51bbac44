//! Generation stepper: drives N rewrite iterations and snapshots each one.
//!
//! The working graph is wholly replaced at each step boundary; identifier
//! continuity is the only notion of node identity across generations. The
//! stepper never computes deltas — each [`GenerationSnapshot`] is a total,
//! reconstructible state that external visualizers diff by identifier
//! equality.

use serde::{Deserialize, Serialize};

use crate::error::KheperResult;
use crate::graph::Graph;
use crate::rewrite;
use crate::rule::RuleSpec;

/// A total snapshot of one generation, for external consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSnapshot {
    /// Generation index; 0 is the initial graph before any rewrite.
    pub generation: usize,
    /// Full ordered set of current node identifiers.
    pub nodes: Vec<String>,
    /// Full ordered set of (source, destination) edges.
    pub links: Vec<(String, String)>,
}

impl GenerationSnapshot {
    fn of(generation: usize, graph: &Graph) -> Self {
        Self {
            generation,
            nodes: graph.node_ids().map(str::to_string).collect(),
            links: graph
                .edges()
                .map(|(s, d)| (s.to_string(), d.to_string()))
                .collect(),
        }
    }
}

/// Owns the working graph and drives the rewrite loop.
pub struct Evolution {
    graph: Graph,
    rule: RuleSpec,
    max_nodes: usize,
    generation: usize,
}

impl Evolution {
    /// Start an evolution from an initial graph and a compiled rule.
    pub fn new(graph: Graph, rule: RuleSpec, max_nodes: usize) -> Self {
        Self {
            graph,
            rule,
            max_nodes,
            generation: 0,
        }
    }

    /// The current working graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The current generation index (0 before any step).
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Snapshot of the current state without stepping.
    pub fn snapshot(&self) -> GenerationSnapshot {
        GenerationSnapshot::of(self.generation, &self.graph)
    }

    /// Apply one rewrite step, replacing the working graph, and return the
    /// new generation's snapshot.
    pub fn step(&mut self) -> KheperResult<GenerationSnapshot> {
        let next = rewrite::apply(&self.graph, &self.rule, self.max_nodes)?;
        self.graph = next;
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "advanced generation"
        );
        Ok(self.snapshot())
    }

    /// Run `depth` rewrite iterations.
    ///
    /// Returns `depth + 1` snapshots: the initial state as generation 0
    /// followed by one per iteration, so depth 0 yields the initial graph
    /// unchanged and callers always have a baseline to diff against.
    pub fn run(&mut self, depth: usize) -> KheperResult<Vec<GenerationSnapshot>> {
        let mut snapshots = Vec::with_capacity(depth + 1);
        snapshots.push(self.snapshot());
        for _ in 0..depth {
            snapshots.push(self.step()?);
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_graph;

    fn canonical() -> Evolution {
        let graph = parse_graph("{1,2},{2,3}").unwrap();
        let rule = RuleSpec::compile("{x,y} -> {x,y},{y,z}").unwrap();
        Evolution::new(graph, rule, usize::MAX)
    }

    #[test]
    fn depth_zero_returns_initial_graph_unchanged() {
        let mut evo = canonical();
        let snapshots = evo.run(0).unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].generation, 0);
        assert_eq!(snapshots[0].nodes, ["1", "2", "3"]);
        assert_eq!(
            snapshots[0].links,
            [
                ("1".to_string(), "2".to_string()),
                ("2".to_string(), "3".to_string())
            ]
        );
    }

    #[test]
    fn run_emits_one_snapshot_per_generation() {
        let mut evo = canonical();
        let snapshots = evo.run(3).unwrap();
        assert_eq!(snapshots.len(), 4);
        for (i, snap) in snapshots.iter().enumerate() {
            assert_eq!(snap.generation, i);
        }
    }

    #[test]
    fn generations_grow_under_canonical_rule() {
        let mut evo = canonical();
        let snapshots = evo.run(3).unwrap();
        for pair in snapshots.windows(2) {
            assert!(pair[1].nodes.len() > pair[0].nodes.len());
            assert!(pair[1].links.len() > pair[0].links.len());
        }
    }

    #[test]
    fn prior_nodes_survive_each_step() {
        // Under the canonical rule every node keeps existing (matched edges
        // are re-emitted, leaves survive via closure), so snapshots diff as
        // pure additions.
        let mut evo = canonical();
        let snapshots = evo.run(2).unwrap();
        for pair in snapshots.windows(2) {
            for node in &pair[0].nodes {
                assert!(pair[1].nodes.contains(node), "lost node {node}");
            }
            for link in &pair[0].links {
                assert!(pair[1].links.contains(link), "lost link {link:?}");
            }
        }
    }

    #[test]
    fn step_advances_generation_counter() {
        let mut evo = canonical();
        assert_eq!(evo.generation(), 0);
        evo.step().unwrap();
        assert_eq!(evo.generation(), 1);
        evo.step().unwrap();
        assert_eq!(evo.generation(), 2);
    }
}
