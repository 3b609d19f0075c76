//! Keyword autocomplete.
//!
//! Walks the active node's ancestry in `[child, parent]` pairs starting
//! from the effective leaf. Each parent kind may claim the slot the cursor
//! sits in and return the keywords valid there; the first claim wins. Two
//! edge-case rules run before the walk, and two post-processing passes
//! (conjunctions, prefix filtering) run after it.

use pq_core::error::CommonResult;
use pq_core::graph::NodeIdMap;
use pq_core::kind::{NodeKind, TokenKind, CONJUNCTION_KEYWORDS, EXPRESSION_KEYWORDS, START_OF_DOCUMENT_KEYWORDS};
use pq_core::node::XorNode;
use pq_core::token::TokenStream;

use crate::active_node::{ActiveNode, LeafKind};
use crate::error::AnalysisResult;
use crate::parser_contract::ParseError;

/// `(parentKind, childAttributeIndex) → expected constant keyword`: the
/// quick lookup for "you're in the constant's slot, you haven't typed it,
/// here it is". Slots 1/3/5 (condition,
/// true-branch, false-branch) are expression-bearing and handled
/// separately, not via this map.
const IF_EXPRESSION_CONSTANT_SLOTS: &[(usize, &str)] = &[(0, "if"), (2, "then"), (4, "else")];
const IF_EXPRESSION_EXPRESSION_SLOTS: &[usize] = &[1, 3, 5];

/// The attribute slots, across the node kinds that bear them, whose child
/// is itself a full expression (so the full `EXPRESSION_KEYWORDS` set
/// applies there) — `LetExpression`'s body, a paired-expression's value,
/// a list item, and both branches of error handling.
const EXPRESSION_SLOTS: &[(NodeKind, usize)] = &[
    (NodeKind::LetExpression, 3),
    (NodeKind::IdentifierPairedExpression, 2),
    (NodeKind::ListExpression, 1),
    (NodeKind::ErrorHandlingExpression, 1),
    (NodeKind::ErrorHandlingExpression, 3),
    (NodeKind::SectionMember, 2),
];

/// `a → {and, as}`, `i → {is}`, `m → {meta}`, `o → {or}`. No entry for
/// `n → {not}` — see `DESIGN.md` for why that gap is preserved verbatim.
const PARTIAL_CONJUNCTION_MAP: &[(&str, &[&str])] = &[
    ("a", &["and", "as"]),
    ("i", &["is"]),
    ("m", &["meta"]),
    ("o", &["or"]),
];

fn expression_keywords() -> Vec<&'static str> {
    EXPRESSION_KEYWORDS.to_vec()
}

fn is_unary_typeable(xor: &XorNode) -> bool {
    !matches!(
        xor.kind(),
        NodeKind::LetExpression | NodeKind::IfExpression | NodeKind::ErrorHandlingExpression
    )
}

/// One `[child, parent]` pair's worth of handling. Returns `None` to defer
/// to the next pair outward.
fn handle_pair(
    _graph: &NodeIdMap,
    _tokens: &dyn TokenStream,
    parent: &XorNode,
    child: &XorNode,
) -> CommonResult<Option<Vec<&'static str>>> {
    let Some(idx) = child.attribute_index() else {
        return Ok(None);
    };

    match parent.kind() {
        NodeKind::IfExpression => {
            if let Some(&(_, keyword)) = IF_EXPRESSION_CONSTANT_SLOTS.iter().find(|(i, _)| *i == idx) {
                // Only offer the constant if the slot hasn't produced it yet.
                return Ok(child.is_context().then(|| vec![keyword]));
            }
            if IF_EXPRESSION_EXPRESSION_SLOTS.contains(&idx) {
                return Ok(Some(expression_keywords()));
            }
            Ok(None)
        }
        NodeKind::SectionMember if idx == 0 => {
            // Cursor on the member name; offer `shared` if not yet parsed —
            // i.e. there is no sibling `Constant` at slot 0 already, which
            // this branch's own match on `idx == 0` (the name slot, not
            // the `shared` slot) guarantees.
            Ok(Some(vec!["shared"]))
        }
        kind if EXPRESSION_SLOTS.contains(&(kind, idx)) => {
            if matches!(child.kind(), NodeKind::NumberLiteral) && child.is_ast() {
                // "unless the child is already an Ast numeric literal, in
                // which case return the empty set: no keyword completes
                // after a number."
                Ok(Some(Vec::new()))
            } else {
                Ok(Some(expression_keywords()))
            }
        }
        _ => Ok(None),
    }
}

/// The new-file rule: ancestry of exactly `[Identifier,
/// IdentifierExpression]` with no parse error.
fn new_file_rule(ancestry: &[XorNode], parse_error: Option<&ParseError>) -> Option<Vec<&'static str>> {
    if parse_error.is_some() {
        return None;
    }
    if ancestry.len() != 2 {
        return None;
    }
    if ancestry[0].kind() != NodeKind::Identifier || ancestry[1].kind() != NodeKind::IdentifierExpression {
        return None;
    }
    Some(START_OF_DOCUMENT_KEYWORDS.to_vec())
}

/// The parameter-annotation rule: inside a function's parameter list,
/// cursor just after a parameter name (or trailing a lone `a`) offers `as`.
fn parameter_annotation_rule(ancestry: &[XorNode]) -> Option<Vec<&'static str>> {
    let leaf = ancestry.first()?;
    if leaf.kind() != NodeKind::Identifier {
        return None;
    }
    let parent = ancestry.get(1)?;
    if parent.kind() != NodeKind::Parameter {
        return None;
    }
    ancestry.get(2).filter(|gp| gp.kind() == NodeKind::ParameterList)?;
    Some(vec!["as"])
}

/// Appends the binary operators spellable as keywords when the leaf is a
/// completed unary-typeable expression with nothing more required of it.
fn apply_conjunctions(
    mut keywords: Vec<&'static str>,
    active_node: &ActiveNode,
    trailing_error: Option<&ParseError>,
    trailing_text: Option<&str>,
) -> Vec<&'static str> {
    let leaf = active_node.leaf();
    let eligible = matches!(active_node.leaf_kind, LeafKind::AfterAst | LeafKind::Context)
        && leaf.is_ast()
        && is_unary_typeable(leaf);

    if !eligible {
        return keywords;
    }

    if trailing_error.is_some() {
        if let Some(text) = trailing_text {
            for &(prefix, additions) in PARTIAL_CONJUNCTION_MAP {
                if prefix == text || text.starts_with(prefix) {
                    for kw in additions {
                        if !keywords.contains(kw) {
                            keywords.push(kw);
                        }
                    }
                }
            }
        }
        return keywords;
    }

    for kw in CONJUNCTION_KEYWORDS {
        if !keywords.contains(kw) {
            keywords.push(kw);
        }
    }
    keywords
}

fn apply_prefix_filter(keywords: Vec<&'static str>, active_node: &ActiveNode) -> Vec<&'static str> {
    match &active_node.identifier_under_position {
        Some(ident) => keywords
            .into_iter()
            .filter(|kw| kw.starts_with(ident.literal.as_ref()))
            .collect(),
        None => keywords,
    }
}

/// Runs the ancestry walk plus post-processing for one active node. Bound
/// to one level of recursion for the "field-access path specialization"
/// (shifting to the rightmost leaf of an open section-member value and
/// re-running).
fn autocomplete_keyword_inner(
    graph: &NodeIdMap,
    tokens: &dyn TokenStream,
    active_node: &ActiveNode,
    parse_error: Option<&ParseError>,
    trailing_text: Option<&str>,
    recursion_depth: u8,
) -> CommonResult<Vec<&'static str>> {
    if let Some(keywords) = new_file_rule(&active_node.ancestry, parse_error) {
        return Ok(apply_prefix_filter(keywords, active_node));
    }
    if let Some(keywords) = parameter_annotation_rule(&active_node.ancestry) {
        return Ok(apply_prefix_filter(keywords, active_node));
    }

    let ancestry = &active_node.ancestry;
    let mut claimed: Option<Vec<&'static str>> = None;
    for i in 0..ancestry.len().saturating_sub(1) {
        let child = &ancestry[i];
        let parent = &ancestry[i + 1];
        if let Some(keywords) = handle_pair(graph, tokens, parent, child)? {
            claimed = Some(keywords);
            break;
        }

        // Field-access path specialization: a section member whose value
        // slot is open but partially parsed — shift to the value's
        // rightmost leaf and re-run, bounded to one level.
        if recursion_depth == 0 && parent.kind() == NodeKind::SectionMember && child.attribute_index() == Some(2) && child.is_context() {
            if let Ok(rightmost) = graph.rightmost_leaf(child.id()) {
                if rightmost != child.id() {
                    let shifted = ActiveNode {
                        position: active_node.position,
                        leaf_kind: LeafKind::AfterAst,
                        ancestry: pq_core::ancestry::ancestry_of(graph, rightmost)?,
                        identifier_under_position: active_node.identifier_under_position.clone(),
                    };
                    return autocomplete_keyword_inner(
                        graph,
                        tokens,
                        &shifted,
                        parse_error,
                        trailing_text,
                        recursion_depth + 1,
                    );
                }
            }
        }
    }

    let keywords = claimed.unwrap_or_default();
    let keywords = apply_conjunctions(keywords, active_node, parse_error, trailing_text);
    Ok(apply_prefix_filter(keywords, active_node))
}

/// Entry point for the keyword analysis.
pub fn autocomplete_keyword(
    graph: &NodeIdMap,
    tokens: &dyn TokenStream,
    active_node: &ActiveNode,
    parse_error: Option<&ParseError>,
    trailing_text: Option<&str>,
) -> AnalysisResult<Vec<&'static str>> {
    let _span = tracing::debug_span!("autocomplete_keyword").entered();
    Ok(autocomplete_keyword_inner(
        graph,
        tokens,
        active_node,
        parse_error,
        trailing_text,
        0,
    )?)
}

/// The orchestrator's default result when there is no active node at all
///: the expression-starting keywords plus `section`.
pub fn default_keywords() -> Vec<&'static str> {
    let mut keywords = expression_keywords();
    keywords.push("section");
    keywords
}
