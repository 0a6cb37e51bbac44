//! # kheper
//!
//! A graph rewriting engine: evolve a directed graph by repeatedly locating
//! subtrees that match a rewrite pattern and extending them according to a
//! rewrite body — a simplified, tree-restricted analogue of Wolfram-model
//! hypergraph rewriting.
//!
//! ## Architecture
//!
//! - **Graph model** (`graph`): string-keyed adjacency multigraph with
//!   ordered destination sequences and a unique-root invariant
//! - **Text parser** (`parse`): brace pair notation (`{1,2},{2,3}`) and the
//!   rule `->` split
//! - **Rules** (`rule`): compiled pattern graph + body edge list
//! - **Matching** (`matcher`): positional tree-shape congruence and symbol
//!   binding
//! - **Rewriting** (`rewrite`, `stepper`): per-match body application with
//!   fresh-identifier minting, driven over N generations
//! - **Facade** (`engine`): raw text + depth in, one snapshot per
//!   generation out
//!
//! Rendering and UI are external collaborators: the engine only promises a
//! total, diffable [`stepper::GenerationSnapshot`] per generation.
//!
//! ## Library usage
//!
//! ```
//! use kheper::engine::{Engine, EngineConfig};
//!
//! let engine = Engine::new(EngineConfig::default());
//! let snapshots = engine
//!     .run("{1,2},{2,3}", "{x,y} -> {x,y},{y,z}", Some(1))
//!     .unwrap();
//! assert_eq!(snapshots.last().unwrap().nodes.len(), 5);
//! ```

pub mod engine;
pub mod error;
pub mod graph;
pub mod matcher;
pub mod parse;
pub mod rewrite;
pub mod rule;
pub mod stepper;

pub use engine::{Engine, EngineConfig};
pub use error::{KheperError, KheperResult, ParseError, RewriteError, StructureError};
pub use graph::Graph;
pub use rule::RuleSpec;
pub use stepper::{Evolution, GenerationSnapshot};
