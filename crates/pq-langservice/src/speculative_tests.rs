use pq_core::graph::NodeIdMap;

use crate::config::AnalysisConfig;
use crate::parser_contract::{ParseAttempt, ParseEntryPoint, ParseError, ParseErrorKind};
use crate::speculative::{attempt, pick_best};
use crate::test_support::{MockParser, MockState};

fn mock_attempt(token_index_reached: usize) -> ParseAttempt<MockState> {
    ParseAttempt {
        state: MockState { graph: NodeIdMap::new(), tokens: Vec::new() },
        completed_root: None,
        open_root: None,
        token_index_reached,
    }
}

#[test]
fn attempt_returns_none_on_a_parse_error() {
    let parser = MockParser::new();
    parser.stub(
        ParseEntryPoint::FieldSelector,
        3,
        Err(ParseError { token_index: 3, kind: ParseErrorKind::UnterminatedBracket }),
    );
    let result = attempt(&parser, ParseEntryPoint::FieldSelector, &MockState { graph: NodeIdMap::new(), tokens: Vec::new() }, 3, &AnalysisConfig::default()).unwrap();
    assert!(result.is_none());
}

#[test]
fn attempt_returns_none_when_it_exceeds_the_token_budget() {
    let parser = MockParser::new();
    parser.stub(ParseEntryPoint::FunctionExpression, 0, Ok(mock_attempt(1000)));
    let config = AnalysisConfig::default().with_speculative_reparse_token_budget(10);
    let result = attempt(&parser, ParseEntryPoint::FunctionExpression, &MockState { graph: NodeIdMap::new(), tokens: Vec::new() }, 0, &config).unwrap();
    assert!(result.is_none());
}

#[test]
fn attempt_returns_the_outcome_when_within_budget() {
    let parser = MockParser::new();
    parser.stub(ParseEntryPoint::FunctionExpression, 0, Ok(mock_attempt(5)));
    let result = attempt(&parser, ParseEntryPoint::FunctionExpression, &MockState { graph: NodeIdMap::new(), tokens: Vec::new() }, 0, &AnalysisConfig::default())
        .unwrap()
        .expect("within budget");
    assert_eq!(result.token_index_reached, 5);
}

#[test]
fn attempt_is_cancelled_before_calling_the_parser() {
    let parser = MockParser::new();
    let config = AnalysisConfig::default();
    config.cancellation.cancel();
    let result = attempt(&parser, ParseEntryPoint::FieldSelector, &MockState { graph: NodeIdMap::new(), tokens: Vec::new() }, 0, &config);
    assert!(result.is_err());
}

#[test]
fn pick_best_prefers_the_attempt_that_consumed_more_tokens() {
    let attempts = vec![Some(mock_attempt(3)), Some(mock_attempt(7)), Some(mock_attempt(5))];
    let best = pick_best(attempts).expect("a winner");
    assert_eq!(best.token_index_reached, 7);
}

/// On a tie, the earliest attempt in the input order wins — callers rely on
/// this to encode an analysis-specific preference (e.g. field selection
/// before field projection) by ordering their candidate list accordingly.
#[test]
fn pick_best_breaks_ties_by_order() {
    let first = mock_attempt(4);
    let second = mock_attempt(4);
    let attempts = vec![Some(first), Some(second)];
    let best = pick_best(attempts).expect("a winner");
    assert_eq!(best.token_index_reached, 4);
}

#[test]
fn pick_best_skips_none_entries() {
    let attempts: Vec<Option<ParseAttempt<MockState>>> = vec![None, None];
    assert!(pick_best(attempts).is_none());
}

#[test]
fn pick_best_of_no_attempts_is_none() {
    let attempts: Vec<Option<ParseAttempt<MockState>>> = Vec::new();
    assert!(pick_best(attempts).is_none());
}
