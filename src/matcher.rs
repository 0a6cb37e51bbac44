//! Tree-shape matching and symbol binding.
//!
//! Both walks use an explicit LIFO work stack of (node, pattern-node) pairs,
//! so traversal is depth-first. The boolean match result does not depend on
//! the order, but the binder's bind-before-descend behavior does, so the
//! stack discipline is part of the contract.
//!
//! Tree-shape matching is intentionally weaker than subgraph isomorphism: a
//! candidate matches when its outdegree equals the pattern's outdegree at
//! every positionally aligned depth (the candidate's i-th child is compared
//! against the pattern's i-th child). Pattern leaves match anything.

use std::collections::{HashMap, HashSet};

use crate::graph::Graph;

/// Per-match binding table: pattern identifier → matched graph identifier.
pub type SymbolMap = HashMap<String, String>;

/// Test whether the subtree rooted at `candidate` is structurally congruent
/// to the pattern subtree rooted at `pattern_root`.
///
/// An outdegree mismatch anywhere aborts the whole match, not just that
/// branch.
pub fn shape_matches(graph: &Graph, candidate: &str, pattern: &Graph, pattern_root: &str) -> bool {
    let mut stack: Vec<(&str, &str)> = vec![(candidate, pattern_root)];

    while let Some((node, pat)) = stack.pop() {
        let pat_children = pattern.children(pat).unwrap_or(&[]);
        if pat_children.is_empty() {
            // Pattern leaves always match.
            continue;
        }
        let node_children = graph.children(node).unwrap_or(&[]);
        if node_children.len() != pat_children.len() {
            return false;
        }
        for (child, pat_child) in node_children.iter().zip(pat_children) {
            stack.push((child, pat_child));
        }
    }

    true
}

/// Build the symbol binding table for one confirmed match.
///
/// Walks the matched region in lock-step with the pattern, binding each
/// pattern identifier to the graph identifier at the same position. A
/// pattern node whose subtree diverges structurally still receives its own
/// binding; pattern nodes below the divergence are never bound. Already
/// visited nodes on either side are skipped, so shared substructure binds
/// once.
pub fn bind_symbols(
    graph: &Graph,
    matched: &str,
    pattern: &Graph,
    pattern_root: &str,
) -> SymbolMap {
    let mut bindings = SymbolMap::new();
    let mut visited_nodes: HashSet<&str> = HashSet::new();
    let mut visited_pats: HashSet<&str> = HashSet::new();
    let mut stack: Vec<(&str, &str)> = vec![(matched, pattern_root)];

    while let Some((node, pat)) = stack.pop() {
        if visited_nodes.contains(node) || visited_pats.contains(pat) {
            continue;
        }
        let (Some(node_children), Some(pat_children)) =
            (graph.children(node), pattern.children(pat))
        else {
            continue;
        };

        bindings.insert(pat.to_string(), node.to_string());
        visited_nodes.insert(node);
        visited_pats.insert(pat);

        let aligned: Vec<(&str, &str)> = node_children
            .iter()
            .zip(pat_children)
            .map(|(n, p)| (n.as_str(), p.as_str()))
            .filter(|(n, p)| !visited_nodes.contains(n) && !visited_pats.contains(p))
            .collect();

        // Descend only where the structure still agrees; the binding above
        // stands either way.
        if node_children.len() == pat_children.len() {
            stack.extend(aligned);
        }
    }

    bindings
}
