#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for the Power Query / M language-service analysis
//! core: the dual-representation syntax graph, token positions, and
//! ancestry navigation.
//!
//! - `node` / `kind` — the XOR node and the closed
//!   enumerations (`NodeKind`, `TokenKind`, `ConstantKind`) it's built from.
//! - `graph` — `NodeIdMap`, the graph store.
//! - `token` — the token stream contract the lexer is assumed to satisfy.
//! - `position` — cursor/token/node position comparisons.
//! - `ancestry` — leaf-to-root path navigation.
//! - `error` — the `CommonError` taxonomy.
//!
//! Everything above this crate (active-node resolution, the four
//! autocomplete analyses, speculative re-parsing) lives in
//! `pq-langservice`; this crate only owns the graph and the primitives for
//! navigating it.

pub mod ancestry;
pub mod error;
pub mod graph;
pub mod kind;
pub mod node;
pub mod position;
pub mod token;

#[cfg(test)]
mod ancestry_tests;

pub use error::{CommonError, CommonResult};
pub use kind::{ConstantKind, NodeKind, TokenKind};
pub use node::{AstNode, ContextNode, NodeId, XorNode};
pub use token::{LinePosition, Token, TokenStream};
