//! Rich diagnostic error types for the kheper engine.
//!
//! Each stage defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so users know exactly what went wrong
//! and how to fix it. All errors are fatal to the current run: the engine has
//! no partial-success mode, so a parse, structure, or rewrite failure aborts
//! before any further generation is emitted.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the kheper engine.
///
/// Each variant wraps a stage-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum KheperError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Rewrite(#[from] RewriteError),
}

/// Result alias used across the crate.
pub type KheperResult<T> = std::result::Result<T, KheperError>;

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors from the pair-notation text parser.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("empty input: expected at least one {{source,destination}} pair")]
    #[diagnostic(
        code(kheper::parse::empty),
        help("Provide a brace-delimited pair list such as `{{1,2}},{{2,3}}`.")
    )]
    Empty,

    #[error("unbalanced braces at byte {offset}")]
    #[diagnostic(
        code(kheper::parse::unbalanced),
        help("Every `{{` must have a matching `}}`. Check the pair list for a missing or stray brace.")
    )]
    UnbalancedBraces { offset: usize },

    #[error("expected `{{` to open a pair at byte {offset}, found {found:?}")]
    #[diagnostic(
        code(kheper::parse::expected_pair),
        help("Pairs are written `{{source,destination}}` and separated by commas.")
    )]
    ExpectedPair { offset: usize, found: char },

    #[error("pair has {count} elements, expected exactly 2")]
    #[diagnostic(
        code(kheper::parse::arity),
        help("Each pair must contain exactly one source and one destination, e.g. `{{x,y}}`.")
    )]
    PairArity { count: usize },

    #[error("empty identifier in pair at byte {offset}")]
    #[diagnostic(
        code(kheper::parse::empty_identifier),
        help("Identifiers must be non-empty. `{{,y}}` and `{{x,}}` are not valid pairs.")
    )]
    EmptyIdentifier { offset: usize },

    #[error("rule text must contain exactly one `->`, found {count}")]
    #[diagnostic(
        code(kheper::parse::arrow),
        help("Rules are written `<pattern pairs> -> <body pairs>`, e.g. `{{x,y}} -> {{x,y}},{{y,z}}`.")
    )]
    RuleArrow { count: usize },
}

/// Result type for parser operations.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

// ---------------------------------------------------------------------------
// Structure errors
// ---------------------------------------------------------------------------

/// Errors from structural validation of a graph or pattern.
#[derive(Debug, Error, Diagnostic)]
pub enum StructureError {
    #[error("graph must have exactly one root, found none")]
    #[diagnostic(
        code(kheper::structure::no_root),
        help(
            "Every node appears as a destination of some edge, so no node can \
             serve as the root. Tree-shape matching requires a unique node with \
             no incoming edge; break the cycle or add a top-level node."
        )
    )]
    NoRoot,

    #[error("graph must have exactly one root, found {}: {roots:?}", roots.len())]
    #[diagnostic(
        code(kheper::structure::multiple_roots),
        help(
            "More than one node has no incoming edge. Connect the extra roots \
             under a single top-level node, or split the input into separate graphs."
        )
    )]
    MultipleRoots { roots: Vec<String> },
}

/// Result type for structural validation.
pub type StructureResult<T> = std::result::Result<T, StructureError>;

// ---------------------------------------------------------------------------
// Rewrite errors
// ---------------------------------------------------------------------------

/// Errors raised while applying a rewrite rule.
#[derive(Debug, Error, Diagnostic)]
pub enum RewriteError {
    #[error("body pair ({left}, {right}) binds neither symbol to the matched region")]
    #[diagnostic(
        code(kheper::rewrite::unbound_pair),
        help(
            "At least one symbol of every body pair must appear in the rule's \
             pattern so the rewrite can anchor the new edge to the matched region. \
             Rename one side of the pair to a pattern symbol."
        )
    )]
    UnboundBodyPair { left: String, right: String },

    #[error("node ceiling exceeded: {actual} nodes after rewrite, limit is {limit}")]
    #[diagnostic(
        code(kheper::rewrite::node_ceiling),
        help(
            "Every match adds nodes independently, so rule/depth combinations can \
             grow exponentially. Lower the depth, tighten the rule, or raise the \
             ceiling with `EngineConfig::max_nodes` (CLI: --max-nodes)."
        )
    )]
    NodeCeilingExceeded { limit: usize, actual: usize },
}

/// Result type for rewrite application.
pub type RewriteResult<T> = std::result::Result<T, RewriteError>;
