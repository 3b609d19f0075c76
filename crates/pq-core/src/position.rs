//! Position comparisons against a cursor.
//!
//! Every function here answers a question relative to the cursor's
//! [`LinePosition`]; none of them mutate anything, so the active-node
//! resolver can call them freely while walking the graph.

use crate::error::CommonResult;
use crate::graph::NodeIdMap;
use crate::node::NodeId;
use crate::token::{LinePosition, Token, TokenStream};

/// `true` if `position` is strictly before the token's start.
pub fn is_before_token(position: LinePosition, token: &Token) -> bool {
    position < token.position_start
}

/// `true` if `position` is strictly after the token's end.
pub fn is_after_token(position: LinePosition, token: &Token) -> bool {
    position > token.position_end
}

/// `true` if `position` falls within `[start, end]` (inclusive of both
/// bounds, matching editor "cursor touching a token boundary" semantics —
/// both edges are inclusive so a cursor immediately after a token still
/// counts as "on" it for anchoring purposes).
pub fn is_on(position: LinePosition, start: LinePosition, end: LinePosition) -> bool {
    start <= position && position <= end
}

pub fn is_before(position: LinePosition, bound: LinePosition) -> bool {
    position < bound
}

pub fn is_after(position: LinePosition, bound: LinePosition) -> bool {
    position > bound
}

/// The effective `(start, end)` span of a node for position-comparison
/// purposes: an AST node's own recorded span, or — for a still-open
/// context — the span implied by its children so far, widening to the
/// start token when it has none yet.
pub fn effective_span(
    graph: &NodeIdMap,
    tokens: &dyn TokenStream,
    id: NodeId,
) -> CommonResult<(LinePosition, LinePosition)> {
    let xor = graph.get_xor(id)?;
    match xor {
        crate::node::XorNode::Ast(ast) => {
            let start = tokens
                .token(ast.token_index_start)
                .map(|t| t.position_start)
                .unwrap_or_default();
            let end = tokens
                .token(ast.token_index_end)
                .map(|t| t.position_end)
                .unwrap_or(start);
            Ok((start, end))
        }
        crate::node::XorNode::Context(ctx) => {
            let start = tokens
                .token(ctx.token_index_start)
                .map(|t| t.position_start)
                .unwrap_or_default();
            let rightmost = graph.rightmost_leaf(id);
            let end = match rightmost {
                Ok(leaf_id) if leaf_id != id => {
                    let leaf = graph.ast(leaf_id)?;
                    tokens
                        .token(leaf.token_index_end)
                        .map(|t| t.position_end)
                        .unwrap_or(start)
                }
                _ => start,
            };
            Ok((start, end))
        }
    }
}

/// `true` if `position` falls within `id`'s effective span (both bounds
/// inclusive, per [`is_on`]).
pub fn is_in(
    graph: &NodeIdMap,
    tokens: &dyn TokenStream,
    id: NodeId,
    position: LinePosition,
) -> CommonResult<bool> {
    let (start, end) = effective_span(graph, tokens, id)?;
    Ok(is_on(position, start, end))
}
