//! Active-node resolution: projects a cursor position onto the
//! syntax graph, applying the shift/anchor/context-preference rules that
//! match editor intuition about "what am I inside right now".

use std::rc::Rc;

use pq_core::ancestry::ancestry_of;
use pq_core::error::CommonResult;
use pq_core::graph::NodeIdMap;
use pq_core::kind::{NodeKind, TokenKind};
use pq_core::node::{NodeId, XorNode};
use pq_core::token::{LinePosition, TokenStream};

use crate::config::CancellationToken;

/// Which phase of active-node resolution decided the effective leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    OnAst,
    AfterAst,
    Context,
    Anchored,
    ShiftedRight,
}

/// The identifier (or generalized identifier) the cursor is considered to
/// be typing, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierUnderPosition {
    pub id: NodeId,
    pub literal: Rc<str>,
}

/// The cursor's projected location in the syntax graph.
#[derive(Debug, Clone)]
pub struct ActiveNode {
    pub position: LinePosition,
    pub leaf_kind: LeafKind,
    /// Non-empty, leaf-first: `ancestry[0]` is the effective leaf.
    pub ancestry: Vec<XorNode>,
    pub identifier_under_position: Option<IdentifierUnderPosition>,
}

impl ActiveNode {
    pub fn leaf(&self) -> &XorNode {
        &self.ancestry[0]
    }
}

enum Placement {
    Before,
    OnAt,
    After,
}

/// Classifies `position` against a leaf's token range, applying the
/// shift-right exclusivity rule: for the shift-right
/// constant set, the cursor landing exactly on the token is never "on" it.
fn classify(
    token_kind: TokenKind,
    start: LinePosition,
    end: LinePosition,
    position: LinePosition,
) -> Placement {
    if token_kind.is_shift_right_constant() {
        if position < start {
            Placement::Before
        } else {
            Placement::After
        }
    } else if position < start {
        Placement::Before
    } else if position <= end {
        Placement::OnAt
    } else {
        Placement::After
    }
}

struct LeafCandidate {
    id: NodeId,
    token_index_start: usize,
    token_kind: TokenKind,
}

/// Phase 1: scans every leaf for the closest match from the left
/// (`best_on_or_before`) and from the right (`best_after`).
fn scan_leaves(
    graph: &NodeIdMap,
    tokens: &dyn TokenStream,
    position: LinePosition,
) -> CommonResult<(Option<LeafCandidate>, Option<LeafCandidate>)> {
    let mut best_on_or_before: Option<LeafCandidate> = None;
    let mut best_after: Option<LeafCandidate> = None;

    for &id in graph.leaf_ids() {
        let ast = graph.ast(id)?;
        let Some(token) = tokens.token(ast.token_index_start) else {
            continue;
        };
        match classify(token.kind, token.position_start, token.position_end, position) {
            Placement::Before => {
                if best_after
                    .as_ref()
                    .map_or(true, |best| ast.token_index_start < best.token_index_start)
                {
                    best_after = Some(LeafCandidate {
                        id,
                        token_index_start: ast.token_index_start,
                        token_kind: token.kind,
                    });
                }
            }
            Placement::OnAt | Placement::After => {
                if best_on_or_before
                    .as_ref()
                    .map_or(true, |best| ast.token_index_start > best.token_index_start)
                {
                    best_on_or_before = Some(LeafCandidate {
                        id,
                        token_index_start: ast.token_index_start,
                        token_kind: token.kind,
                    });
                }
            }
        }
    }

    Ok((best_on_or_before, best_after))
}

fn is_anchor(xor: &XorNode, tokens: &dyn TokenStream) -> bool {
    match xor.kind() {
        NodeKind::Identifier | NodeKind::NumberLiteral => true,
        NodeKind::Constant => xor
            .as_ast()
            .and_then(|ast| tokens.token(ast.token_index_start))
            .map(|t| t.kind.is_anchor_keyword())
            .unwrap_or(false),
        _ => false,
    }
}

/// Phase 3: the open context with the greatest `tokenIndexStart` that is
/// `>= floor`, if any. Ties (two contexts opened at the same token, e.g. a
/// node and its first child) go to the higher id — the one opened more
/// recently, i.e. nested deeper — so the result doesn't depend on
/// `context_ids()`'s hash-map iteration order.
fn best_open_context(graph: &NodeIdMap, floor: usize) -> CommonResult<Option<NodeId>> {
    let mut best: Option<(NodeId, usize)> = None;
    for id in graph.context_ids() {
        let ctx = graph.context(id)?;
        if ctx.token_index_start < floor {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_id, best_start)) => {
                ctx.token_index_start > best_start
                    || (ctx.token_index_start == best_start && id > best_id)
            }
        };
        if better {
            best = Some((id, ctx.token_index_start));
        }
    }
    Ok(best.map(|(id, _)| id))
}

/// Resolves the active node for `position` against `graph`/`tokens`.
/// Returns `None` when the cursor lies outside every leaf's range — an
/// empty buffer, or a position before the first token.
pub fn resolve_active_node(
    graph: &NodeIdMap,
    tokens: &dyn TokenStream,
    position: LinePosition,
    cancellation: &CancellationToken,
) -> Result<Option<ActiveNode>, crate::error::AnalysisError> {
    let _span = tracing::debug_span!("resolve_active_node").entered();
    cancellation.check()?;

    let (best_on_or_before, best_after) = scan_leaves(graph, tokens, position)?;
    let Some(before) = best_on_or_before else {
        return Ok(None);
    };

    // Phase 2: shift resolution.
    let mut effective_leaf: Option<NodeId> = None;
    let mut leaf_kind: Option<LeafKind> = None;

    if before.token_kind.is_drill_down_opener() {
        if let (Some(closer), Some(after)) = (before.token_kind.matching_closer(), &best_after) {
            if after.token_kind == closer {
                if let Some(parent) = graph.parent_of(before.id) {
                    if let Some(wrapper) = graph.array_wrapper_child(parent) {
                        effective_leaf = Some(wrapper);
                        leaf_kind = Some(LeafKind::Context);
                    }
                }
            }
        }
    }
    if effective_leaf.is_none() && before.token_kind.is_shift_right_constant() {
        if let Some(after) = &best_after {
            effective_leaf = Some(after.id);
            leaf_kind = Some(LeafKind::ShiftedRight);
        }
    }

    // Phase 3: context preference (only when phase 2 didn't already shift).
    if leaf_kind.is_none() {
        if let Some(context_id) = best_open_context(graph, before.token_index_start)? {
            effective_leaf = Some(context_id);
            leaf_kind = Some(LeafKind::Context);
        }
    }

    // Phase 4: anchoring.
    let before_xor = graph.get_xor(before.id)?;
    if leaf_kind.is_none() && is_anchor(&before_xor, tokens) {
        effective_leaf = Some(before.id);
        leaf_kind = Some(LeafKind::Anchored);
    }

    // Phase 5: default to the on/after distinction for `before` itself.
    let (effective_leaf, leaf_kind) = match (effective_leaf, leaf_kind) {
        (Some(id), Some(kind)) => (id, kind),
        _ => {
            let ast = graph.ast(before.id)?;
            let token = tokens.token(ast.token_index_start);
            let kind = match token.map(|t| classify(t.kind, t.position_start, t.position_end, position)) {
                Some(Placement::OnAt) => LeafKind::OnAst,
                _ => LeafKind::AfterAst,
            };
            (before.id, kind)
        }
    };

    let ancestry = ancestry_of(graph, effective_leaf)?;
    let identifier_under_position = identifier_under_position(graph, tokens, &ancestry, position)?;

    Ok(Some(ActiveNode {
        position,
        leaf_kind,
        ancestry,
        identifier_under_position,
    }))
}

/// Phase 6: exposes the identifier the cursor sits inside, if the effective
/// leaf either *is* one, or is the `@` inclusive-reference constant whose
/// parent is an identifier-expression (in which case the identifier is
/// that expression's identifier child).
///
/// The right edge is treated as inclusive (cursor immediately after the
/// last character still counts as "inside") — see `DESIGN.md` for why,
/// matching the source's documented behavior rather than guessed here.
fn identifier_under_position(
    graph: &NodeIdMap,
    tokens: &dyn TokenStream,
    ancestry: &[XorNode],
    position: LinePosition,
) -> CommonResult<Option<IdentifierUnderPosition>> {
    let leaf = &ancestry[0];

    let identifier_xor = match leaf.kind() {
        NodeKind::Identifier | NodeKind::GeneralizedIdentifier => Some(leaf.clone()),
        NodeKind::Constant => {
            let is_at = leaf
                .as_ast()
                .and_then(|ast| tokens.token(ast.token_index_start))
                .map(|t| t.kind == TokenKind::At)
                .unwrap_or(false);
            if is_at {
                ancestry
                    .get(1)
                    .filter(|parent| parent.kind() == NodeKind::IdentifierExpression)
                    .and_then(|parent| {
                        graph
                            .children_of(parent.id())
                            .iter()
                            .find_map(|&c| graph.get_xor(c).ok().filter(|x| x.kind() == NodeKind::Identifier))
                    })
            } else {
                None
            }
        }
        _ => None,
    };

    let Some(identifier_xor) = identifier_xor else {
        return Ok(None);
    };
    let Some(literal) = identifier_xor.as_ast().and_then(|ast| ast.literal.clone()) else {
        return Ok(None);
    };

    // The range check is against the *effective leaf*'s own span, not the
    // resolved identifier's — for the `@` path those are different nodes,
    // and the leaf is what the cursor actually landed on to get here.
    let Some(leaf_ast) = leaf.as_ast() else {
        return Ok(None);
    };
    let Some(token) = tokens.token(leaf_ast.token_index_start) else {
        return Ok(None);
    };
    if position < token.position_start || position > token.position_end {
        return Ok(None);
    }
    Ok(Some(IdentifierUnderPosition {
        id: identifier_xor.id(),
        literal,
    }))
}
