//! Rewrite application: one generation step over all matches.
//!
//! Every key of the input graph is tested against the rule's pattern root.
//! Matches are found against the original input only, never against the
//! partially built output. The successor starts as a copy of the input, so
//! a rewrite can only ever add: no node or edge is removed by any step, and
//! each input key's edge sequence is a prefix of its successor sequence.
//! Each match then independently appends the rule's body edges: bound
//! symbols resolve through the match's [`SymbolMap`], unbound symbols mint
//! fresh identifiers from a step-wide counter.
//!
//! The identifier counter advances once per processed one-bound body pair
//! even when a previously minted identifier is reused, so the minted
//! sequence is monotonically increasing but may be sparse. That counting
//! rule is observable in the literal identifiers of the output and is
//! preserved exactly.

use std::collections::HashMap;

use crate::error::{RewriteError, RewriteResult};
use crate::graph::Graph;
use crate::matcher::{bind_symbols, shape_matches};
use crate::rule::RuleSpec;

/// Apply `rule` to `graph`, producing the successor generation.
///
/// `max_nodes` is the hard ceiling on the successor's node count; crossing
/// it fails fast instead of letting a pathological rule/depth combination
/// exhaust memory. A body pair binding neither symbol fails with
/// [`RewriteError::UnboundBodyPair`].
pub fn apply(graph: &Graph, rule: &RuleSpec, max_nodes: usize) -> RewriteResult<Graph> {
    let pattern = rule.pattern();
    let pattern_root = rule.pattern_root();

    // All matches are enumerated against the input graph, in key insertion
    // order, before any rewriting happens.
    let matches: Vec<&str> = graph
        .node_ids()
        .filter(|node| shape_matches(graph, node, pattern, pattern_root))
        .collect();

    // Counts every identifier that has ever existed this step; minted ids
    // are (num_nodes + 1) rendered as decimal strings.
    let mut num_nodes = graph.node_count();
    // Append-only continuation of the input: all pre-existing nodes and
    // edges survive, match emissions accumulate after them.
    let mut output = graph.clone();

    for matched in &matches {
        let bindings = bind_symbols(graph, matched, pattern, pattern_root);
        // Keeps repeated unbound symbols within this one match's body
        // consistent; scoped to the match, not the step.
        let mut body_map: HashMap<&str, String> = HashMap::new();

        for (left, right) in rule.body() {
            match (bindings.get(left), bindings.get(right)) {
                (Some(src), Some(dst)) => {
                    output.append_edge(src, dst);
                }
                (Some(src), None) => {
                    let candidate = (num_nodes + 1).to_string();
                    num_nodes += 1;
                    let dst = body_map.entry(right).or_insert(candidate);
                    output.append_edge(src, dst.clone());
                }
                (None, Some(dst)) => {
                    let candidate = (num_nodes + 1).to_string();
                    num_nodes += 1;
                    let src = body_map.entry(left).or_insert(candidate);
                    output.append_edge(src.clone(), dst);
                }
                (None, None) => {
                    return Err(RewriteError::UnboundBodyPair {
                        left: left.clone(),
                        right: right.clone(),
                    });
                }
            }
        }
    }

    output.close();

    if output.node_count() > max_nodes {
        return Err(RewriteError::NodeCeilingExceeded {
            limit: max_nodes,
            actual: output.node_count(),
        });
    }

    tracing::debug!(
        matches = matches.len(),
        nodes = output.node_count(),
        edges = output.edge_count(),
        "applied rewrite step"
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_graph;

    const NO_CEILING: usize = usize::MAX;

    #[test]
    fn canonical_example_one_step() {
        // Graph {1,2},{2,3}; rule {x,y} -> {x,y},{y,z}. Nodes 1 and 2 match.
        let g = parse_graph("{1,2},{2,3}").unwrap();
        let rule = RuleSpec::compile("{x,y} -> {x,y},{y,z}").unwrap();
        let next = apply(&g, &rule, NO_CEILING).unwrap();

        // Original edges survive; the {x,y} body pair re-emits each matched
        // edge after them.
        assert_eq!(next.children("1").unwrap(), ["2", "2"]);
        // Match at 1 mints 4 (counter starts at 3), match at 2 mints 5.
        assert_eq!(next.children("2").unwrap(), ["3", "4", "3"]);
        assert_eq!(next.children("3").unwrap(), ["5"]);
        // 3 original nodes + 2 minted.
        assert_eq!(next.node_count(), 5);
        assert_eq!(next.edge_count(), 6);
    }

    #[test]
    fn input_edges_are_prefix_of_successor_edges() {
        let g = parse_graph("{1,2},{2,3}").unwrap();
        let rule = RuleSpec::compile("{x,y} -> {x,y},{y,z}").unwrap();
        let next = apply(&g, &rule, NO_CEILING).unwrap();
        for id in g.node_ids() {
            let old = g.children(id).unwrap();
            let new = next.children(id).unwrap();
            assert_eq!(&new[..old.len()], old, "prefix broken at {id}");
        }
    }

    #[test]
    fn closure_makes_minted_ids_keys() {
        let g = parse_graph("{1,2}").unwrap();
        let rule = RuleSpec::compile("{x,y} -> {x,y},{y,z}").unwrap();
        let next = apply(&g, &rule, NO_CEILING).unwrap();
        assert!(next.contains("3"));
        assert_eq!(next.outdegree("3"), 0);
    }

    #[test]
    fn body_map_reuses_mint_for_repeated_unbound_symbol() {
        // z appears in two body pairs; both must resolve to the same minted
        // id within one match.
        let g = parse_graph("{1,2}").unwrap();
        let rule = RuleSpec::compile("{x,y} -> {x,z},{y,z}").unwrap();
        let next = apply(&g, &rule, NO_CEILING).unwrap();
        assert_eq!(next.children("1").unwrap(), ["2", "3"]);
        assert_eq!(next.children("2").unwrap(), ["3"]);
    }

    #[test]
    fn counter_advances_even_on_reuse() {
        // First pair mints 3 for z; second pair reuses it but still advances
        // the counter, so w gets 5, not 4.
        let g = parse_graph("{1,2}").unwrap();
        let rule = RuleSpec::compile("{x,y} -> {x,z},{y,z},{y,w}").unwrap();
        let next = apply(&g, &rule, NO_CEILING).unwrap();
        assert_eq!(next.children("1").unwrap(), ["2", "3"]);
        let from_2 = next.children("2").unwrap();
        assert_eq!(from_2, ["3", "5"]);
        assert!(!next.contains("4"));
    }

    #[test]
    fn unbound_source_mints_edge_into_bound_destination() {
        let g = parse_graph("{1,2}").unwrap();
        let rule = RuleSpec::compile("{x,y} -> {z,y}").unwrap();
        let next = apply(&g, &rule, NO_CEILING).unwrap();
        // One match (node 1); z mints 3; edge 3 -> 2.
        assert_eq!(next.children("3").unwrap(), ["2"]);
    }

    #[test]
    fn neither_bound_pair_fails() {
        let g = parse_graph("{1,2}").unwrap();
        let rule = RuleSpec::compile("{x,y} -> {v,w}").unwrap();
        let err = apply(&g, &rule, NO_CEILING).unwrap_err();
        assert!(matches!(
            err,
            RewriteError::UnboundBodyPair { ref left, ref right }
                if left == "v" && right == "w"
        ));
    }

    #[test]
    fn matches_use_input_graph_only() {
        // The first match's minted node (4) has outdegree 0 in the output;
        // if matching consulted the output, node 4 could never match, but it
        // must also never be *considered* because only input keys are
        // enumerated. Two matches, two mints, nothing more.
        let g = parse_graph("{1,2},{2,3}").unwrap();
        let rule = RuleSpec::compile("{x,y} -> {x,y},{y,z}").unwrap();
        let next = apply(&g, &rule, NO_CEILING).unwrap();
        assert_eq!(next.node_count(), 5);
    }

    #[test]
    fn append_only_accumulation_across_matches() {
        // Node 2 is the y-image of the match at 1 and the x-image of the
        // match at 2, so both matches write edges onto key "2"; the second
        // write must append, not replace.
        let g = parse_graph("{1,2},{2,3}").unwrap();
        let rule = RuleSpec::compile("{x,y} -> {y,x},{x,y}").unwrap();
        let next = apply(&g, &rule, NO_CEILING).unwrap();
        assert_eq!(next.children("2").unwrap(), ["3", "1", "3"]);
        assert_eq!(next.children("1").unwrap(), ["2", "2"]);
        assert_eq!(next.children("3").unwrap(), ["2"]);
    }

    #[test]
    fn shared_output_key_appends_rather_than_replaces() {
        // Two body pairs from the same match write to the same source key.
        let g = parse_graph("{1,2}").unwrap();
        let rule = RuleSpec::compile("{x,y} -> {x,y},{x,z}").unwrap();
        let next = apply(&g, &rule, NO_CEILING).unwrap();
        assert_eq!(next.children("1").unwrap(), ["2", "2", "3"]);
    }

    #[test]
    fn node_ceiling_enforced() {
        let g = parse_graph("{1,2},{2,3}").unwrap();
        let rule = RuleSpec::compile("{x,y} -> {x,y},{y,z}").unwrap();
        let err = apply(&g, &rule, 4).unwrap_err();
        assert!(matches!(
            err,
            RewriteError::NodeCeilingExceeded { limit: 4, actual: 5 }
        ));
    }

    #[test]
    fn no_match_leaves_graph_stable() {
        // Pattern root needs outdegree 2; the chain has none, so the
        // successor is the input unchanged.
        let g = parse_graph("{1,2},{2,3}").unwrap();
        let rule = RuleSpec::compile("{x,y},{x,z} -> {x,y}").unwrap();
        let next = apply(&g, &rule, NO_CEILING).unwrap();
        assert_eq!(next, g);
    }
}
