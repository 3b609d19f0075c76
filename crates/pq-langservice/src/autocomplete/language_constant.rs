//! Language-constant autocomplete: `nullable` and `optional`.
//!
//! Unlike keyword/primitive-type completion, this analysis may drive a
//! speculative re-parse when the ancestry alone doesn't contain a
//! `FunctionExpression` but the parser gave up with an "unterminated
//! sequence" diagnosis — the parameter list the cursor sits in never made
//! it into the main parse's graph at all.

use pq_core::kind::NodeKind;
use pq_core::node::XorNode;

use crate::active_node::ActiveNode;
use crate::error::AnalysisResult;
use crate::parser_contract::{ParseEntryPoint, ParseError, ParseErrorKind, RestartableParser};
use crate::speculative;
use crate::config::AnalysisConfig;

/// Ancestry-only check for whether the cursor is past `as` in a type
/// annotation and before any primitive type has been written — the
/// `nullable` position.
fn is_nullable_position(ancestry: &[XorNode]) -> bool {
    ancestry.iter().any(|node| {
        matches!(
            node.kind(),
            NodeKind::AsNullablePrimitiveType | NodeKind::NullablePrimitiveType
        ) && matches!(node, XorNode::Context(ctx) if ctx.attribute_counter <= 1)
    })
}

/// Ancestry-only check for the `optional` position: the start of a
/// parameter slot inside a function's parameter list, no leading
/// `optional` yet parsed.
///
/// Two shapes both count: a `Parameter` context with nothing started yet
/// (`attribute_counter == 0`, the cursor sits before anything has been
/// typed), and one whose only filled slot is a name identifier still in
/// ancestry — the grammar hasn't committed to "this is the name, not a
/// partially-typed `optional`" until a non-identifier token follows, so the
/// prefix check in `from_ancestry` (via `identifier_under_position`) is
/// what actually disqualifies a non-prefixing name.
fn is_optional_position(ancestry: &[XorNode]) -> Option<usize> {
    for (i, node) in ancestry.iter().enumerate() {
        if node.kind() != NodeKind::Parameter {
            continue;
        }
        let XorNode::Context(ctx) = node else {
            continue;
        };
        match ctx.attribute_counter {
            0 => return Some(i),
            1 if i > 0 && ancestry[i - 1].kind() == NodeKind::Identifier => return Some(i),
            _ => {}
        }
    }
    None
}

fn typed_prefix(active_node: &ActiveNode) -> Option<&str> {
    active_node
        .identifier_under_position
        .as_ref()
        .map(|ident| ident.literal.as_ref())
}

fn prefix_matches(word: &str, typed: Option<&str>) -> bool {
    match typed {
        Some(typed) if !typed.is_empty() => word.starts_with(typed) && typed.len() < word.len(),
        _ => true,
    }
}

/// Runs the ancestry-only half of §4.G: no speculative re-parse.
fn from_ancestry(active_node: &ActiveNode) -> Vec<&'static str> {
    let mut out = Vec::new();
    let typed = typed_prefix(active_node);

    if is_nullable_position(&active_node.ancestry) && prefix_matches("nullable", typed) {
        out.push("nullable");
    }
    if is_optional_position(&active_node.ancestry).is_some() && prefix_matches("optional", typed) {
        out.push("optional");
    }
    out
}

/// Entry point for the language-constant analysis.
///
/// `parser`/`state`/`token_index` are only consulted when the ancestry
/// contains no `FunctionExpression` and `parse_error` names "unterminated
/// sequence" — the speculative re-parse path.
pub fn autocomplete_language_constant<P: RestartableParser>(
    active_node: &ActiveNode,
    parse_error: Option<&ParseError>,
    parser: Option<&P>,
    state: Option<&P::State>,
    config: &AnalysisConfig,
) -> AnalysisResult<Vec<&'static str>> {
    let _span = tracing::debug_span!("autocomplete_language_constant").entered();

    let has_function_ancestor = pq_core::ancestry::first_index_of_kind(
        &active_node.ancestry,
        NodeKind::FunctionExpression,
    )
    .is_some();

    if has_function_ancestor {
        return Ok(from_ancestry(active_node));
    }

    let is_unterminated_sequence =
        matches!(parse_error.map(|e| &e.kind), Some(ParseErrorKind::UnterminatedSequence));
    let (Some(parser), Some(state), true) = (parser, state, is_unterminated_sequence) else {
        return Ok(Vec::new());
    };
    let Some(error) = parse_error else {
        return Ok(Vec::new());
    };

    config.cancellation.check()?;
    let attempt = speculative::attempt(
        parser,
        ParseEntryPoint::FunctionExpression,
        state,
        error.token_index,
        config,
    )?;
    let Some(attempt) = attempt else {
        return Ok(Vec::new());
    };
    let Some(root) = attempt.root() else {
        return Ok(Vec::new());
    };

    let graph = parser.graph_of(&attempt.state);
    if graph.get_xor(root).map(|x| x.kind()) != Ok(NodeKind::FunctionExpression) {
        return Ok(Vec::new());
    }

    let tokens = parser.tokens_of(&attempt.state);
    let rebuilt = crate::active_node::resolve_active_node(
        graph,
        tokens,
        active_node.position,
        &config.cancellation,
    )?;
    let Some(rebuilt) = rebuilt else {
        return Ok(Vec::new());
    };
    Ok(from_ancestry(&rebuilt))
}

