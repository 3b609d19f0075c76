//! Primitive-type autocomplete.
//!
//! Valid only when the ancestry contains a `TypePrimaryType` node, or a
//! function parameter's type annotation (`AsNullablePrimitiveType` /
//! `NullablePrimitiveType`) at the right depth, and only once the cursor is
//! strictly past the leading `type`/`as` keyword.

use pq_core::kind::{NodeKind, PRIMITIVE_TYPE_NAMES};
use pq_core::node::XorNode;

use crate::active_node::{ActiveNode, LeafKind};
use crate::error::AnalysisResult;

/// The node kinds whose presence in the ancestry makes a primitive-type
/// position reachable.
const TYPE_ANNOTATION_KINDS: &[NodeKind] = &[
    NodeKind::TypePrimaryType,
    NodeKind::AsNullablePrimitiveType,
    NodeKind::NullablePrimitiveType,
];

/// Whether `xor` is past its own leading keyword (`type` or `as`) already —
/// i.e. it has at least one child filled, so the cursor sits somewhere
/// after the keyword rather than on it.
fn past_leading_keyword(xor: &XorNode) -> bool {
    match xor {
        XorNode::Ast(_) => true,
        XorNode::Context(ctx) => ctx.attribute_counter > 0,
    }
}

fn apply_prefix_filter(names: Vec<&'static str>, active_node: &ActiveNode) -> Vec<&'static str> {
    match &active_node.identifier_under_position {
        Some(ident) => names
            .into_iter()
            .filter(|name| name.starts_with(ident.literal.as_ref()))
            .collect(),
        None => names,
    }
}

/// Entry point for the primitive-type analysis.
pub fn autocomplete_primitive_type(active_node: &ActiveNode) -> AnalysisResult<Vec<&'static str>> {
    let _span = tracing::debug_span!("autocomplete_primitive_type").entered();

    let ancestry = &active_node.ancestry;
    let in_type_position = ancestry
        .iter()
        .any(|node| TYPE_ANNOTATION_KINDS.contains(&node.kind()));

    if !in_type_position {
        return Ok(Vec::new());
    }

    // AfterAst/Context/ShiftedRight/Anchored on a leaf past the keyword all
    // count as "strictly after the leading keyword"; `OnAst` on the
    // keyword token itself does not.
    let past_keyword = match active_node.leaf_kind {
        LeafKind::OnAst => false,
        LeafKind::AfterAst | LeafKind::ShiftedRight | LeafKind::Anchored => true,
        LeafKind::Context => past_leading_keyword(active_node.leaf()),
    };
    if !past_keyword {
        return Ok(Vec::new());
    }

    Ok(apply_prefix_filter(PRIMITIVE_TYPE_NAMES.to_vec(), active_node))
}
