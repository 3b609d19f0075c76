#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Language-service analysis core for Power Query / M.
//!
//! Given a parsed-as-far-as-it-got buffer (a [`pq_core::graph::NodeIdMap`]
//! plus its token stream) and a cursor position, this crate answers the two
//! questions an editor needs:
//!
//! - [`active_node::resolve_active_node`] — which syntactic node is the
//!   cursor inside, after the shift/anchor/context-preference rules that
//!   match editor intuition (§4.D).
//! - [`autocomplete::autocomplete`] — what would validly appear next:
//!   keywords, primitive type names, the `nullable`/`optional` language
//!   constants, and field-access completions, each computed independently
//!   (§4.E–§4.I).
//!
//! The out-of-scope collaborators this crate assumes — a restartable
//! parser and a type engine — are named as traits in [`parser_contract`]
//! and [`type_provider`]; [`speculative`] is the re-parse driver both the
//! language-constant and field-access analyses call into when an
//! unterminated token at the cursor makes the main parse's graph
//! ambiguous.

pub mod active_node;
pub mod autocomplete;
pub mod config;
pub mod error;
pub mod parser_contract;
pub mod speculative;
pub mod type_provider;

#[cfg(test)]
mod speculative_tests;
#[cfg(test)]
pub(crate) mod test_support;

pub use active_node::{resolve_active_node, ActiveNode, IdentifierUnderPosition, LeafKind};
pub use autocomplete::{autocomplete, Autocomplete};
pub use config::{AnalysisConfig, CancellationToken};
pub use error::{AnalysisError, AnalysisResult};
pub use parser_contract::{ParseAttempt, ParseEntryPoint, ParseError, ParseErrorKind, RestartableParser};
pub use type_provider::{TypeDescriptor, TypeProvider};
