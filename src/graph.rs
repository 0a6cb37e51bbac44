//! Graph model: the adjacency-list representation the whole engine works on.
//!
//! A [`Graph`] maps each node identifier to an ordered sequence of destination
//! identifiers. Duplicates are permitted, so the structure is a directed
//! multigraph. Two invariants hold for any well-formed graph:
//!
//! - **Closure**: every identifier referenced as a destination also exists as
//!   a key (possibly with an empty outgoing sequence). The rewrite applier
//!   restores this with an explicit [`Graph::close`] pass after every step.
//! - **Single root**: exactly one identifier never appears as a destination.
//!   [`Graph::root`] validates this and fails with a [`StructureError`]
//!   otherwise.
//!
//! Keys iterate in insertion order. That order is the tie-break for match
//! enumeration, which in turn decides which literal identifiers get minted
//! during a rewrite, so it must stay deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{StructureError, StructureResult};

/// A directed multigraph keyed by string node identifiers.
///
/// All identifiers are strings: the parser coerces numeric literals to their
/// string form at ingestion, and minted identifiers are decimal renderings of
/// the generation counter, so every node lives in one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    adjacency: IndexMap<String, Vec<String>>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure `id` exists as a key, with an empty outgoing sequence if new.
    pub fn ensure_node(&mut self, id: impl Into<String>) {
        self.adjacency.entry(id.into()).or_default();
    }

    /// Append an edge from `src` to `dst`.
    ///
    /// Append-only by contract: an existing outgoing sequence is extended,
    /// never replaced, so edges accumulated by earlier matches in the same
    /// step are preserved. The destination key is NOT created here; the
    /// applier runs [`Graph::close`] once all edges are assembled.
    pub fn append_edge(&mut self, src: impl Into<String>, dst: impl Into<String>) {
        self.adjacency.entry(src.into()).or_default().push(dst.into());
    }

    /// Closure pass: add every destination that is not yet a key, with an
    /// empty outgoing sequence.
    pub fn close(&mut self) {
        let missing: Vec<String> = self
            .adjacency
            .values()
            .flatten()
            .filter(|dst| !self.adjacency.contains_key(dst.as_str()))
            .cloned()
            .collect();
        for id in missing {
            self.adjacency.entry(id).or_default();
        }
    }

    /// Whether `id` exists as a key.
    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// The ordered destination sequence of `id`, if it exists as a key.
    pub fn children(&self, id: &str) -> Option<&[String]> {
        self.adjacency.get(id).map(Vec::as_slice)
    }

    /// Outgoing edge count of `id` (0 if absent).
    pub fn outdegree(&self, id: &str) -> usize {
        self.adjacency.get(id).map_or(0, Vec::len)
    }

    /// Number of node identifiers (keys).
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Node identifiers in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// All edges as (source, destination) pairs, in key order then positional
    /// order within each key.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.adjacency
            .iter()
            .flat_map(|(src, dsts)| dsts.iter().map(move |dst| (src.as_str(), dst.as_str())))
    }

    /// Compute the unique root: the one key that never appears as a
    /// destination of any edge.
    ///
    /// Candidate order follows key insertion order, so the error for a
    /// multi-root graph lists roots deterministically.
    pub fn root(&self) -> StructureResult<&str> {
        let mut candidates: Vec<&str> = Vec::new();
        for key in self.adjacency.keys() {
            let is_destination = self
                .adjacency
                .values()
                .any(|dsts| dsts.iter().any(|d| d == key));
            if !is_destination {
                candidates.push(key);
            }
        }
        match candidates.len() {
            1 => Ok(candidates[0]),
            0 => Err(StructureError::NoRoot),
            _ => Err(StructureError::MultipleRoots {
                roots: candidates.iter().map(|r| (*r).to_string()).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Graph {
        // 1 -> 2 -> 3
        let mut g = Graph::new();
        g.append_edge("1", "2");
        g.append_edge("2", "3");
        g.close();
        g
    }

    #[test]
    fn append_edge_preserves_order_and_duplicates() {
        let mut g = Graph::new();
        g.append_edge("a", "b");
        g.append_edge("a", "c");
        g.append_edge("a", "b");
        assert_eq!(g.children("a").unwrap(), ["b", "c", "b"]);
        assert_eq!(g.outdegree("a"), 3);
    }

    #[test]
    fn close_adds_missing_destinations() {
        let mut g = Graph::new();
        g.append_edge("1", "2");
        assert!(!g.contains("2"));
        g.close();
        assert!(g.contains("2"));
        assert_eq!(g.outdegree("2"), 0);
    }

    #[test]
    fn root_of_chain() {
        let g = chain();
        assert_eq!(g.root().unwrap(), "1");
    }

    #[test]
    fn root_never_appears_as_destination() {
        let g = chain();
        let root = g.root().unwrap().to_string();
        assert!(g.edges().all(|(_, dst)| dst != root));
    }

    #[test]
    fn two_roots_rejected() {
        // 1 -> 3 and 2 -> 3: both 1 and 2 lack incoming edges.
        let mut g = Graph::new();
        g.append_edge("1", "3");
        g.append_edge("2", "3");
        g.close();
        let err = g.root().unwrap_err();
        match err {
            StructureError::MultipleRoots { roots } => assert_eq!(roots, ["1", "2"]),
            other => panic!("expected MultipleRoots, got {other:?}"),
        }
    }

    #[test]
    fn cycle_has_no_root() {
        let mut g = Graph::new();
        g.append_edge("a", "b");
        g.append_edge("b", "a");
        g.close();
        assert!(matches!(g.root(), Err(StructureError::NoRoot)));
    }

    #[test]
    fn node_ids_follow_insertion_order() {
        let g = chain();
        let ids: Vec<&str> = g.node_ids().collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn edges_enumerate_in_key_then_positional_order() {
        let mut g = Graph::new();
        g.append_edge("1", "2");
        g.append_edge("1", "3");
        g.append_edge("2", "3");
        g.close();
        let edges: Vec<(&str, &str)> = g.edges().collect();
        assert_eq!(edges, [("1", "2"), ("1", "3"), ("2", "3")]);
    }

    #[test]
    fn counts() {
        let g = chain();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }
}
