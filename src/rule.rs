//! Rewrite rules: a pattern graph plus the body edges to emit per match.
//!
//! A rule is written `<pattern pairs> -> <body pairs>`. Compilation parses
//! both halves, builds the pattern [`Graph`], and resolves the pattern's
//! root. The body stays a raw ordered pair list: body symbols are free-form
//! labels and may name nodes that do not exist in the pattern (those are the
//! symbols that mint fresh identifiers at rewrite time).

use serde::{Deserialize, Serialize};

use crate::error::KheperResult;
use crate::graph::Graph;
use crate::parse;

/// A compiled, immutable rewrite rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pattern: Graph,
    pattern_root: String,
    body: Vec<(String, String)>,
}

impl RuleSpec {
    /// Compile rule text such as `{x,y} -> {x,y},{y,z}`.
    ///
    /// Fails with a `ParseError` on malformed pair notation or a missing or
    /// repeated `->`, and with a `StructureError` when the pattern has zero
    /// or multiple roots.
    pub fn compile(text: &str) -> KheperResult<Self> {
        let (pattern_pairs, body) = parse::parse_rule(text)?;

        let mut pattern = Graph::new();
        for (src, dst) in pattern_pairs {
            pattern.append_edge(src, dst.clone());
            pattern.ensure_node(dst);
        }
        let pattern_root = pattern.root()?.to_string();

        tracing::debug!(
            root = %pattern_root,
            pattern_nodes = pattern.node_count(),
            body_pairs = body.len(),
            "compiled rewrite rule"
        );

        Ok(Self {
            pattern,
            pattern_root,
            body,
        })
    }

    /// The pattern graph.
    pub fn pattern(&self) -> &Graph {
        &self.pattern
    }

    /// The pattern's root identifier.
    pub fn pattern_root(&self) -> &str {
        &self.pattern_root
    }

    /// The body edges to emit per match, in declared order.
    pub fn body(&self) -> &[(String, String)] {
        &self.body
    }
}
