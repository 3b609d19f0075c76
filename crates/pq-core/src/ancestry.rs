//! Ancestry navigation.
//!
//! An ancestry is the path from a node to the root, ordered leaf-first:
//! `[self, parent, parent-of-parent, …, root]`. Ancestries are short (the
//! depth of a single formula's AST), so every helper here is a small linear
//! walk rather than anything indexed.

use crate::error::{CommonError, CommonResult};
use crate::graph::NodeIdMap;
use crate::kind::NodeKind;
use crate::node::{NodeId, XorNode};

/// `ancestryOf(id)`: materializes the path from `id` to the root, inclusive
/// of both ends.
pub fn ancestry_of(graph: &NodeIdMap, id: NodeId) -> CommonResult<Vec<XorNode>> {
    let mut path = Vec::new();
    let mut current = Some(id);
    while let Some(node_id) = current {
        path.push(graph.get_xor(node_id)?);
        current = graph.parent_of(node_id);
    }
    Ok(path)
}

/// `ancestry[index - n]`: a node *closer to the leaf* than `ancestry[index]`
/// (lower index = closer to leaf, per the leaf-first ordering), with an
/// optional kind assertion.
pub fn nth_previous(
    ancestry: &[XorNode],
    index: usize,
    n: usize,
    expected_kinds: Option<&[NodeKind]>,
) -> CommonResult<Option<&XorNode>> {
    let Some(target) = index.checked_sub(n) else {
        return Ok(None);
    };
    nth_get(ancestry, target, expected_kinds)
}

/// `ancestry[index + n]`: a node *closer to the root* than `ancestry[index]`.
pub fn nth_next(
    ancestry: &[XorNode],
    index: usize,
    n: usize,
    expected_kinds: Option<&[NodeKind]>,
) -> CommonResult<Option<&XorNode>> {
    nth_get(ancestry, index + n, expected_kinds)
}

fn nth_get<'a>(
    ancestry: &'a [XorNode],
    target: usize,
    expected_kinds: Option<&[NodeKind]>,
) -> CommonResult<Option<&'a XorNode>> {
    let Some(node) = ancestry.get(target) else {
        return Ok(None);
    };
    if let Some(expected) = expected_kinds {
        if !expected.contains(&node.kind()) {
            return Err(CommonError::KindMismatch {
                id: node.id(),
                actual: node.kind(),
                expected: expected.to_vec(),
            });
        }
    }
    Ok(Some(node))
}

/// `firstIndexOfKind`: the index of the first ancestor (scanning leaf to
/// root) with the given kind, or `None`.
pub fn first_index_of_kind(ancestry: &[XorNode], kind: NodeKind) -> Option<usize> {
    ancestry.iter().position(|node| node.kind() == kind)
}

/// `assertLeaf`: `ancestry[0]`. Panics on an empty ancestry — this is
/// treated as a caller bug, not a recoverable condition, since an
/// ancestry is only ever constructed from an existing active node.
pub fn assert_leaf(ancestry: &[XorNode]) -> &XorNode {
    ancestry
        .first()
        .expect("assert_leaf called on an empty ancestry")
}
