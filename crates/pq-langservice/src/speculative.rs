//! The speculative re-parse driver shared by §4.G (language constants) and
//! §4.H (field access): run one or more parser entry points against fresh
//! clones of the parser state, and keep whichever attempt consumed the
//! most tokens.

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::parser_contract::{ParseAttempt, ParseEntryPoint, RestartableParser};

/// Runs `entry_point` against a clone of `state` starting at `token_index`,
/// respecting the request's token budget and cancellation token. A parser
/// [`crate::parser_contract::ParseError`] is not itself fatal here — the
/// entry point simply didn't produce a usable attempt, so it's folded into
/// `Ok(None)` alongside a budget overrun; only cancellation is surfaced as
/// an [`AnalysisError`].
pub fn attempt<P: RestartableParser>(
    parser: &P,
    entry_point: ParseEntryPoint,
    state: &P::State,
    token_index: usize,
    config: &AnalysisConfig,
) -> Result<Option<ParseAttempt<P::State>>, AnalysisError> {
    config.cancellation.check()?;
    match parser.try_entry_point(entry_point, state, token_index) {
        Ok(outcome) => {
            let consumed = outcome.token_index_reached.saturating_sub(token_index);
            if consumed > config.speculative_reparse_token_budget {
                tracing::trace!(
                    entry_point = entry_point.name(),
                    consumed,
                    budget = config.speculative_reparse_token_budget,
                    "speculative re-parse exceeded its token budget"
                );
                return Ok(None);
            }
            tracing::trace!(
                entry_point = entry_point.name(),
                token_index_reached = outcome.token_index_reached,
                "speculative re-parse attempt completed"
            );
            Ok(Some(outcome))
        }
        Err(parse_error) => {
            tracing::trace!(
                entry_point = entry_point.name(),
                token_index = parse_error.token_index,
                kind = %parse_error.kind,
                "speculative re-parse attempt raised a parse error"
            );
            Ok(None)
        }
    }
}

/// Picks the attempt that consumed the most tokens among `attempts`, in
/// the order given; ties go to the first (earliest) attempt in that order,
/// which callers use to encode an analysis-specific preference (field
/// access prefers field-selection over field-projection on a tie).
pub fn pick_best<State>(attempts: Vec<Option<ParseAttempt<State>>>) -> Option<ParseAttempt<State>> {
    let mut best: Option<ParseAttempt<State>> = None;
    for candidate in attempts.into_iter().flatten() {
        let replace = match &best {
            None => true,
            Some(current) => candidate.token_index_reached > current.token_index_reached,
        };
        if replace {
            best = Some(candidate);
        }
    }
    best
}
