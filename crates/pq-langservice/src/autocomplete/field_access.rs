//! Field-access autocomplete: `record[name]` selectors and
//! `record[[a], [b]]` projections.
//!
//! Two discovery paths feed the same inspection/type-lookup pipeline: the
//! ancestry may already contain a `FieldSelector`/`FieldProjection` node,
//! or — when the parser gave up on an unconsumed `[`/`{` — a speculative
//! re-parse materializes one against a fresh parser-state clone.

use std::rc::Rc;

use pq_core::ancestry::first_index_of_kind;
use pq_core::error::CommonResult;
use pq_core::graph::NodeIdMap;
use pq_core::kind::{NodeKind, TokenKind};
use pq_core::node::{NodeId, XorNode};
use pq_core::token::TokenStream;

use crate::active_node::{resolve_active_node, ActiveNode, LeafKind};
use crate::config::AnalysisConfig;
use crate::error::AnalysisResult;
use crate::parser_contract::{ParseEntryPoint, ParseError, RestartableParser};
use crate::speculative;
use crate::type_provider::{TypeDescriptor, TypeProvider};

/// What `inspectFieldAccess` determines about the located node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectedFieldAccess {
    pub is_autocomplete_allowed: bool,
    pub identifier_under_position: Option<Rc<str>>,
    /// Field names already projected — excluded from the candidate list.
    pub field_names: Vec<Rc<str>>,
}

/// One candidate completion: a field name paired with its inferred type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccessCompletionItem {
    pub name: String,
    pub field_type: TypeDescriptor,
}

/// The full result of the field-access analysis for one active node.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccessAnalysis {
    pub node_id: NodeId,
    pub inspected: InspectedFieldAccess,
    pub items: Vec<FieldAccessCompletionItem>,
}

/// Locates the typable primary expression: walks the ancestry for a
/// `RecursivePrimaryExpression`, then picks the receiver of the field
/// access currently in progress on it.
fn typable_primary_expression(graph: &NodeIdMap, ancestry: &[XorNode]) -> CommonResult<Option<NodeId>> {
    let Some(idx) = first_index_of_kind(ancestry, NodeKind::RecursivePrimaryExpression) else {
        return Ok(None);
    };
    let recursive_id = ancestry[idx].id();
    let Ok(head) = graph.child_by_attribute_index(recursive_id, 0) else {
        return Ok(None);
    };
    let head_id = head.id();

    let Some(wrapper_id) = graph.array_wrapper_child(recursive_id) else {
        return Ok(Some(head_id));
    };
    let wrapper_children = graph.children_of(wrapper_id);
    match wrapper_children.len() {
        // No completed access yet, or exactly one in-progress access: the
        // receiver is the expression's own head ("don't shift past an
        // unparsed bracket").
        0 | 1 => Ok(Some(head_id)),
        n => Ok(Some(wrapper_children[n - 2])),
    }
}

/// Derives allowedness, the typed prefix, and already-projected field
/// names from the located node.
fn inspect_field_access(
    graph: &NodeIdMap,
    active_node: &ActiveNode,
    field_access_id: NodeId,
) -> CommonResult<InspectedFieldAccess> {
    let xor = graph.get_xor(field_access_id)?;
    let field_names = if xor.kind() == NodeKind::FieldProjection {
        graph
            .iter_field_projection(field_access_id)?
            .into_iter()
            .filter_map(|id| graph.ast(id).ok().and_then(|a| a.literal.clone()))
            .collect()
    } else {
        Vec::new()
    };

    let within_subtree = active_node
        .ancestry
        .iter()
        .any(|node| node.id() == field_access_id);
    let leaf = active_node.leaf();
    let is_autocomplete_allowed = within_subtree
        && match leaf.kind() {
            NodeKind::GeneralizedIdentifier => true,
            // The empty space between `[`/`[[` and a not-yet-written
            // identifier: the cursor shifted right onto (or is sitting
            // inside) an still-open field-access context.
            _ => leaf.is_context() && matches!(active_node.leaf_kind, LeafKind::ShiftedRight | LeafKind::Context),
        };

    let identifier_under_position = active_node
        .identifier_under_position
        .as_ref()
        .filter(|_| within_subtree)
        .map(|ident| ident.literal.clone());

    Ok(InspectedFieldAccess {
        is_autocomplete_allowed,
        identifier_under_position,
        field_names,
    })
}

/// The speculative-reparse discovery path: the most recent parse error is
/// an unconsumed `[` or `{` at or before the cursor.
fn trailing_open_wrapper(
    parse_error: Option<&ParseError>,
    tokens: &dyn TokenStream,
) -> Option<&ParseError> {
    let error = parse_error?;
    let token = tokens.token(error.token_index)?;
    matches!(token.kind, TokenKind::LeftBracket | TokenKind::LeftBrace).then_some(error)
}

/// Where the field-access node was found: directly in the original
/// ancestry, or materialized by a speculative re-parse that owns its own
/// private clone of the parser state.
enum Located<State> {
    Ancestor {
        field_access_id: NodeId,
        active_node: ActiveNode,
    },
    Speculative {
        field_access_id: NodeId,
        attempt: crate::parser_contract::ParseAttempt<State>,
        active_node: ActiveNode,
    },
}

/// Runs the two discovery paths.
fn locate_field_access<P: RestartableParser>(
    tokens: &dyn TokenStream,
    active_node: &ActiveNode,
    parse_error: Option<&ParseError>,
    parser: Option<&P>,
    state: Option<&P::State>,
    config: &AnalysisConfig,
) -> AnalysisResult<Option<Located<P::State>>> {
    if let Some(idx) = active_node
        .ancestry
        .iter()
        .position(|node| matches!(node.kind(), NodeKind::FieldSelector | NodeKind::FieldProjection))
    {
        let field_access_id = active_node.ancestry[idx].id();
        return Ok(Some(Located::Ancestor {
            field_access_id,
            active_node: active_node.clone(),
        }));
    }

    let (Some(parser), Some(state)) = (parser, state) else {
        return Ok(None);
    };
    let Some(error) = trailing_open_wrapper(parse_error, tokens) else {
        return Ok(None);
    };

    config.cancellation.check()?;
    // Field-selection preferred over field-projection on a tie.
    let selector_attempt = speculative::attempt(
        parser,
        ParseEntryPoint::FieldSelector,
        state,
        error.token_index,
        config,
    )?;
    let projection_attempt = speculative::attempt(
        parser,
        ParseEntryPoint::FieldProjection,
        state,
        error.token_index,
        config,
    )?;
    let Some(best) = speculative::pick_best(vec![selector_attempt, projection_attempt]) else {
        return Ok(None);
    };
    let Some(field_access_id) = best.root() else {
        return Ok(None);
    };

    let Some(rebuilt) = resolve_active_node(
        parser.graph_of(&best.state),
        parser.tokens_of(&best.state),
        active_node.position,
        &config.cancellation,
    )?
    else {
        return Ok(None);
    };
    Ok(Some(Located::Speculative {
        field_access_id,
        attempt: best,
        active_node: rebuilt,
    }))
}

/// Entry point for the field-access analysis.
pub fn autocomplete_field_access<P: RestartableParser, T: TypeProvider>(
    graph: &NodeIdMap,
    tokens: &dyn TokenStream,
    active_node: &ActiveNode,
    parse_error: Option<&ParseError>,
    parser: Option<&P>,
    state: Option<&P::State>,
    type_provider: &T,
    config: &AnalysisConfig,
) -> AnalysisResult<Option<FieldAccessAnalysis>> {
    let _span = tracing::debug_span!("autocomplete_field_access").entered();

    let Some(located) = locate_field_access(tokens, active_node, parse_error, parser, state, config)? else {
        return Ok(None);
    };
    let (field_access_id, located_graph, located_active_node) = match &located {
        Located::Ancestor {
            field_access_id,
            active_node,
        } => (*field_access_id, graph, active_node),
        Located::Speculative {
            field_access_id,
            attempt,
            active_node,
        } => (
            *field_access_id,
            parser.expect("speculative attempt implies parser was Some").graph_of(&attempt.state),
            active_node,
        ),
    };

    let inspected = inspect_field_access(located_graph, located_active_node, field_access_id)?;
    if !inspected.is_autocomplete_allowed {
        return Ok(Some(FieldAccessAnalysis {
            node_id: field_access_id,
            inspected,
            items: Vec::new(),
        }));
    }

    let Some(receiver_id) = typable_primary_expression(located_graph, &located_active_node.ancestry)?
    else {
        return Ok(Some(FieldAccessAnalysis {
            node_id: field_access_id,
            inspected,
            items: Vec::new(),
        }));
    };

    let inferred = type_provider.try_type(receiver_id)?;

    let items = match inferred.record_or_table_fields() {
        Some(fields) => fields
            .iter()
            .filter(|(name, _)| !inspected.field_names.iter().any(|already| already.as_ref() == name.as_str()))
            .filter(|(name, _)| {
                inspected
                    .identifier_under_position
                    .as_deref()
                    .map(|prefix| name.starts_with(prefix))
                    .unwrap_or(true)
            })
            .map(|(name, field_type)| FieldAccessCompletionItem {
                name: name.clone(),
                field_type: field_type.clone(),
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(Some(FieldAccessAnalysis {
        node_id: field_access_id,
        inspected,
        items,
    }))
}
