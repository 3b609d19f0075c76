//! Error taxonomy for the analysis layer.
//!
//! `CommonError` (from `pq-core`) covers graph invariant violations and
//! cancellation. This module adds the two kinds that only make sense once
//! there's an upstream parser and type engine to talk to: a passthrough for
//! the parser's own diagnostics, and an opaque wrapper for type-engine
//! failures. Neither is a bug in this crate — they're inputs/collaborator
//! failures the core is built to tolerate.

use thiserror::Error;

pub use pq_core::error::CommonError;

/// Errors an autocomplete analysis can report independently of the others.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The syntax graph is internally inconsistent. Fatal: re-raised
    /// through the `Result` of whichever analysis touched it.
    #[error(transparent)]
    Common(#[from] CommonError),

    /// The upstream parser's report for an incomplete buffer. Not a bug —
    /// an input the core consumes to trigger speculative re-parses and
    /// conjunction-keyword suggestions.
    #[error("parse error at token {token_index}: {kind}")]
    Parse {
        token_index: usize,
        kind: crate::parser_contract::ParseErrorKind,
    },

    /// The external type engine (`tryType`) failed. Contained within the
    /// field-access analysis; keyword/primitive-type/language-constant
    /// analyses proceed unaffected.
    #[error("type inference failed: {0}")]
    Type(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl AnalysisError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, AnalysisError::Common(e) if e.is_cancellation())
    }
}
