use pq_core::graph::NodeIdMap;
use pq_core::kind::NodeKind;
use pq_core::token::LinePosition;

use super::language_constant::autocomplete_language_constant;
use crate::active_node::{ActiveNode, IdentifierUnderPosition, LeafKind};
use crate::config::AnalysisConfig;
use crate::parser_contract::{ParseAttempt, ParseEntryPoint, ParseErrorKind};
use crate::test_support::MockParser;

/// `(x, op|`: the second parameter's tentative name "op" is a strict
/// prefix of `optional`, so it's offered even though the parser already
/// committed a child to the `Parameter` context (it can't yet know whether
/// "op" will turn out to be `optional` or the start of a name).
#[test]
fn offers_optional_when_typed_prefix_matches() {
    let mut graph = NodeIdMap::new();
    let func = graph.start_context(NodeKind::FunctionExpression, None, 0, None);
    let param_list = graph.start_context(NodeKind::ParameterList, Some(0), 0, Some(func));
    let param = graph.start_context(NodeKind::Parameter, Some(1), 2, Some(param_list));
    let name = graph.start_context(NodeKind::Identifier, Some(1), 2, Some(param));
    graph.end_context_as_leaf(name, 2, "op").unwrap();

    let active_node = ActiveNode {
        position: LinePosition::new(0, 4),
        leaf_kind: LeafKind::Anchored,
        ancestry: vec![
            graph.get_xor(name).unwrap(),
            graph.get_xor(param).unwrap(),
            graph.get_xor(param_list).unwrap(),
            graph.get_xor(func).unwrap(),
        ],
        identifier_under_position: Some(IdentifierUnderPosition { id: name, literal: "op".into() }),
    };

    let parser: Option<&MockParser> = None;
    let result = autocomplete_language_constant(&active_node, None, parser, None, &AnalysisConfig::default()).unwrap();
    assert_eq!(result, vec!["optional"]);
}

/// A parameter name that doesn't prefix `optional` never offers it, even
/// though the `Parameter` slot shape is identical.
#[test]
fn withholds_optional_when_typed_prefix_does_not_match() {
    let mut graph = NodeIdMap::new();
    let func = graph.start_context(NodeKind::FunctionExpression, None, 0, None);
    let param_list = graph.start_context(NodeKind::ParameterList, Some(0), 0, Some(func));
    let param = graph.start_context(NodeKind::Parameter, Some(0), 0, Some(param_list));
    let name = graph.start_context(NodeKind::Identifier, Some(1), 0, Some(param));
    graph.end_context_as_leaf(name, 0, "column").unwrap();

    let active_node = ActiveNode {
        position: LinePosition::new(0, 6),
        leaf_kind: LeafKind::Anchored,
        ancestry: vec![
            graph.get_xor(name).unwrap(),
            graph.get_xor(param).unwrap(),
            graph.get_xor(param_list).unwrap(),
            graph.get_xor(func).unwrap(),
        ],
        identifier_under_position: Some(IdentifierUnderPosition { id: name, literal: "column".into() }),
    };

    let parser: Option<&MockParser> = None;
    let result = autocomplete_language_constant(&active_node, None, parser, None, &AnalysisConfig::default()).unwrap();
    assert!(result.is_empty());
}

/// `let x = 1 as |`: past `as`, before any primitive type, offers
/// `nullable`.
#[test]
fn offers_nullable_after_as_before_a_primitive_type() {
    let mut graph = NodeIdMap::new();
    let func = graph.start_context(NodeKind::FunctionExpression, None, 0, None);
    let annotation = graph.start_context(NodeKind::AsNullablePrimitiveType, Some(2), 3, Some(func));
    let as_kw = graph.start_context(NodeKind::Constant, Some(0), 3, Some(annotation));
    graph.end_context_as_leaf(as_kw, 3, "as").unwrap();

    let active_node = ActiveNode {
        position: LinePosition::new(0, 6),
        leaf_kind: LeafKind::Context,
        ancestry: vec![graph.get_xor(annotation).unwrap(), graph.get_xor(func).unwrap()],
        identifier_under_position: None,
    };

    let parser: Option<&MockParser> = None;
    let result = autocomplete_language_constant(&active_node, None, parser, None, &AnalysisConfig::default()).unwrap();
    assert_eq!(result, vec!["nullable"]);
}

/// No `FunctionExpression` ancestor and no "unterminated sequence" parse
/// error — nothing to speculatively re-parse, so the analysis reports
/// empty rather than guessing.
#[test]
fn empty_without_a_function_ancestor_or_matching_parse_error() {
    let mut graph = NodeIdMap::new();
    let let_expr = graph.start_context(NodeKind::LetExpression, None, 0, None);

    let active_node = ActiveNode {
        position: LinePosition::new(0, 0),
        leaf_kind: LeafKind::Context,
        ancestry: vec![graph.get_xor(let_expr).unwrap()],
        identifier_under_position: None,
    };

    let parser: Option<&MockParser> = None;
    let result = autocomplete_language_constant(&active_node, None, parser, None, &AnalysisConfig::default()).unwrap();
    assert!(result.is_empty());
}

/// An "unterminated sequence" parse error with no `FunctionExpression`
/// ancestor triggers a speculative re-parse; when it materializes a usable
/// `FunctionExpression` with an empty first parameter slot, `optional` is
/// offered against the rebuilt active node.
#[test]
fn speculative_reparse_recovers_optional_position() {
    let original_state = crate::test_support::MockState {
        graph: NodeIdMap::new(),
        tokens: Vec::new(),
    };

    let mut original_graph = NodeIdMap::new();
    let let_expr = original_graph.start_context(NodeKind::LetExpression, None, 0, None);
    let active_node = ActiveNode {
        position: LinePosition::new(0, 1),
        leaf_kind: LeafKind::Context,
        ancestry: vec![original_graph.get_xor(let_expr).unwrap()],
        identifier_under_position: None,
    };

    // The re-parsed state: `(|op` as a single open parenthesis token
    // followed by an as-yet-unnamed parameter.
    let mut reparsed_graph = NodeIdMap::new();
    let func = reparsed_graph.start_context(NodeKind::FunctionExpression, None, 0, None);
    let open_paren = reparsed_graph.start_context(NodeKind::Constant, Some(0), 0, Some(func));
    reparsed_graph.end_context_as_leaf(open_paren, 0, "(").unwrap();
    let param_list = reparsed_graph.start_context(NodeKind::ParameterList, Some(1), 0, Some(func));
    let _param = reparsed_graph.start_context(NodeKind::Parameter, Some(0), 1, Some(param_list));
    let reparsed_tokens = vec![pq_core::token::Token::new(
        pq_core::kind::TokenKind::LeftParenthesis,
        "(",
        LinePosition::new(0, 0),
        LinePosition::new(0, 1),
        0,
    )];

    let parser = MockParser::new();
    let error = crate::parser_contract::ParseError {
        token_index: 1,
        kind: ParseErrorKind::UnterminatedSequence,
    };
    parser.stub(
        ParseEntryPoint::FunctionExpression,
        1,
        Ok(ParseAttempt {
            state: crate::test_support::MockState { graph: reparsed_graph, tokens: reparsed_tokens },
            completed_root: None,
            open_root: Some(func),
            token_index_reached: 1,
        }),
    );

    let result = autocomplete_language_constant(
        &active_node,
        Some(&error),
        Some(&parser),
        Some(&original_state),
        &AnalysisConfig::default(),
    )
    .unwrap();
    assert_eq!(result, vec!["optional"]);
}
