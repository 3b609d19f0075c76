//! Per-request configuration and cancellation.
//!
//! There is no on-disk config format here — no CLI, no persisted state —
//! so this is a plain struct the caller builds and passes in, the same
//! shape as `Parser::with_exec_fuel` / `with_recursion_fuel` builder
//! knobs elsewhere in this workspace, generalized to this crate's two
//! per-request budgets.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::AnalysisError;
use pq_core::error::CommonError;

/// A cooperative cancellation flag, checked at component boundaries
/// (between ancestry walks and before each speculative re-parse).
///
/// Cloning shares the same underlying flag — the caller holds one clone to
/// fire it (e.g. from a wall-clock timer), the analysis holds another to
/// poll it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raises [`CommonError::Cancelled`] if the token has fired. Called at
    /// every component boundary an analysis crosses.
    pub fn check(&self) -> Result<(), AnalysisError> {
        if self.is_cancelled() {
            Err(AnalysisError::Common(CommonError::Cancelled))
        } else {
            Ok(())
        }
    }
}

/// Default cap on how many tokens a single speculative re-parse attempt may
/// consume before it's abandoned as unproductive — guards against
/// pathological input the way a fuel counter guards a recursive-descent
/// parse, without needing a general-purpose fuel system for a
/// single-formula analysis.
pub const DEFAULT_SPECULATIVE_REPARSE_TOKEN_BUDGET: usize = 512;

/// Knobs threaded through one analysis request.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub cancellation: CancellationToken,
    pub speculative_reparse_token_budget: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cancellation: CancellationToken::new(),
            speculative_reparse_token_budget: DEFAULT_SPECULATIVE_REPARSE_TOKEN_BUDGET,
        }
    }
}

impl AnalysisConfig {
    pub fn new(cancellation: CancellationToken) -> Self {
        Self {
            cancellation,
            ..Self::default()
        }
    }

    pub fn with_speculative_reparse_token_budget(mut self, budget: usize) -> Self {
        self.speculative_reparse_token_budget = budget;
        self
    }
}
