//! The syntax graph store.
//!
//! A parse is represented as a forest of [`NodeId`]s split across two maps —
//! one for closed AST nodes, one for still-open context frames — plus the
//! parent/child edges between them. Exactly one of the two maps holds any
//! given id at any time; [`NodeIdMap::get_xor`] is
//! the one place that reaches across both to answer "what is this id right
//! now".

use indexmap::{IndexMap, IndexSet};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{CommonError, CommonResult};
use crate::kind::NodeKind;
use crate::node::{AstNode, ContextNode, NodeId, XorNode};

/// The graph store built up during one parse (or one speculative re-parse;
/// see `pq-langservice`'s restart contract, which clones this wholesale).
#[derive(Debug, Clone, Default)]
pub struct NodeIdMap {
    ast_nodes: HashMap<NodeId, AstNode>,
    context_nodes: HashMap<NodeId, ContextNode>,
    /// Children in attribute-index order, the order they were opened in.
    children: HashMap<NodeId, Vec<NodeId>>,
    parents: HashMap<NodeId, NodeId>,
    /// Insertion-ordered so that `leaf_ids()` reflects document order.
    leaf_ids: IndexSet<NodeId>,
    ids_by_kind: IndexMap<NodeKind, IndexSet<NodeId>>,
    id_counter: u32,
    root: Option<NodeId>,
    /// Memoized `rightmost_leaf` results, invalidated wholesale on any
    /// structural mutation. A per-ancestor invalidation would be cheaper
    /// but the map rarely grows past a few hundred nodes for one formula.
    rightmost_leaf_cache: RefCell<HashMap<NodeId, NodeId>>,
}

impl NodeIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.id_counter);
        self.id_counter += 1;
        id
    }

    /// Opens a new context frame as a child of `parent` (or as the document
    /// root when `parent` is `None`). Returns the fresh id.
    pub fn start_context(
        &mut self,
        kind: NodeKind,
        attribute_index: Option<usize>,
        token_index_start: usize,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = self.next_id();
        let node = ContextNode {
            id,
            kind,
            attribute_index,
            token_index_start,
            attribute_counter: 0,
        };
        self.context_nodes.insert(id, node);
        self.children.insert(id, Vec::new());
        self.ids_by_kind.entry(kind).or_default().insert(id);

        match parent {
            Some(parent_id) => {
                self.parents.insert(id, parent_id);
                self.children.entry(parent_id).or_default().push(id);
                if let Some(ctx) = self.context_nodes.get_mut(&parent_id) {
                    ctx.attribute_counter += 1;
                }
            }
            None => {
                self.root.get_or_insert(id);
            }
        }
        self.invalidate_rightmost_cache();
        id
    }

    /// Closes a context frame as a non-leaf AST node, using the token range
    /// implied by its children.
    pub fn end_context(&mut self, id: NodeId, token_index_end: usize) -> CommonResult<()> {
        let ctx = self
            .context_nodes
            .remove(&id)
            .ok_or(CommonError::ExpectedContextNode(id))?;
        let ast = AstNode::new_branch(
            id,
            ctx.kind,
            ctx.attribute_index,
            ctx.token_index_start,
            token_index_end,
        );
        self.ast_nodes.insert(id, ast);
        self.invalidate_rightmost_cache();
        Ok(())
    }

    /// Closes a context frame directly as an AST leaf (a terminal
    /// production: `Identifier`, `Constant`, a literal, ...).
    pub fn end_context_as_leaf(
        &mut self,
        id: NodeId,
        token_index: usize,
        literal: impl Into<std::rc::Rc<str>>,
    ) -> CommonResult<()> {
        let ctx = self
            .context_nodes
            .remove(&id)
            .ok_or(CommonError::ExpectedContextNode(id))?;
        if !self.leaf_ids.insert(id) {
            return Err(CommonError::DuplicateLeaf(id));
        }
        let ast = AstNode::new_leaf(id, ctx.kind, ctx.attribute_index, token_index, literal);
        self.ast_nodes.insert(id, ast);
        self.invalidate_rightmost_cache();
        Ok(())
    }

    /// Deletes a context frame that turned out to be unneeded (a grammar
    /// rule that backtracked out of entirely). The frame must be childless.
    pub fn delete_context(&mut self, id: NodeId) -> CommonResult<()> {
        if self.children.get(&id).is_some_and(|c| !c.is_empty()) {
            return Err(CommonError::DeleteOfNonChildlessNode(id));
        }
        let ctx = self
            .context_nodes
            .remove(&id)
            .ok_or(CommonError::ExpectedContextNode(id))?;
        self.children.remove(&id);
        self.detach_from_parent(id, ctx.kind);
        self.invalidate_rightmost_cache();
        Ok(())
    }

    /// Deletes a leaf AST node (used by recovery paths that unwind a
    /// partially built leaf).
    pub fn delete_ast(&mut self, id: NodeId) -> CommonResult<()> {
        if self.children.get(&id).is_some_and(|c| !c.is_empty()) {
            return Err(CommonError::DeleteOfNonChildlessNode(id));
        }
        let ast = self
            .ast_nodes
            .remove(&id)
            .ok_or(CommonError::ExpectedAstNode(id))?;
        self.children.remove(&id);
        self.leaf_ids.shift_remove(&id);
        self.detach_from_parent(id, ast.kind);
        self.invalidate_rightmost_cache();
        Ok(())
    }

    fn detach_from_parent(&mut self, id: NodeId, kind: NodeKind) {
        if let Some(set) = self.ids_by_kind.get_mut(&kind) {
            set.shift_remove(&id);
            if set.is_empty() {
                self.ids_by_kind.shift_remove(&kind);
            }
        }
        if let Some(parent_id) = self.parents.remove(&id) {
            if let Some(siblings) = self.children.get_mut(&parent_id) {
                siblings.retain(|&c| c != id);
            }
        } else if self.root == Some(id) {
            self.root = None;
        }
    }

    fn invalidate_rightmost_cache(&self) {
        self.rightmost_leaf_cache.borrow_mut().clear();
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn ast(&self, id: NodeId) -> CommonResult<&AstNode> {
        self.ast_nodes.get(&id).ok_or(CommonError::ExpectedAstNode(id))
    }

    pub fn context(&self, id: NodeId) -> CommonResult<&ContextNode> {
        self.context_nodes
            .get(&id)
            .ok_or(CommonError::ExpectedContextNode(id))
    }

    pub fn get_xor(&self, id: NodeId) -> CommonResult<XorNode> {
        if let Some(ast) = self.ast_nodes.get(&id) {
            Ok(XorNode::Ast(ast.clone()))
        } else if let Some(ctx) = self.context_nodes.get(&id) {
            Ok(XorNode::Context(ctx.clone()))
        } else {
            Err(CommonError::NodeNotFound(id))
        }
    }

    pub fn children_of(&self, parent: NodeId) -> &[NodeId] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    pub fn child_by_attribute_index(
        &self,
        parent: NodeId,
        attribute_index: usize,
    ) -> CommonResult<XorNode> {
        let child_id = self
            .children_of(parent)
            .iter()
            .find(|&&c| {
                self.get_xor(c)
                    .map(|x| x.attribute_index() == Some(attribute_index))
                    .unwrap_or(false)
            })
            .copied()
            .ok_or(CommonError::NoChildAtAttributeIndex(parent, attribute_index))?;
        self.get_xor(child_id)
    }

    pub fn leaf_ids(&self) -> &IndexSet<NodeId> {
        &self.leaf_ids
    }

    /// Ids of every still-open context frame. Used by the active-node
    /// resolver's "context preference" phase, which
    /// needs the open context with the greatest `tokenIndexStart` — a
    /// query `NodeIdMap` itself has no reason to optimize for, since
    /// parsing never asks "which contexts are open".
    pub fn context_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.context_nodes.keys().copied()
    }

    pub fn ids_by_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.ids_by_kind
            .get(&kind)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// The first (leftmost, i.e. lowest attribute index at every level)
    /// leaf beneath `id`, or `id` itself if it is already a leaf.
    pub fn leftmost_leaf(&self, id: NodeId) -> CommonResult<NodeId> {
        let mut current = id;
        loop {
            let xor = self.get_xor(current)?;
            if xor.is_leaf() {
                return Ok(current);
            }
            let children = self.children_of(current);
            match children.first() {
                Some(&first) => current = first,
                None => return Ok(current),
            }
        }
    }

    /// The last leaf beneath `id` in document order, memoized because
    /// several active-node phases ask for the same node's rightmost leaf
    /// repeatedly.
    pub fn rightmost_leaf(&self, id: NodeId) -> CommonResult<NodeId> {
        if let Some(&cached) = self.rightmost_leaf_cache.borrow().get(&id) {
            return Ok(cached);
        }
        let mut current = id;
        let result = loop {
            let xor = self.get_xor(current)?;
            if xor.is_leaf() {
                break current;
            }
            let children = self.children_of(current);
            match children.last() {
                Some(&last) => current = last,
                None => break current,
            }
        };
        self.rightmost_leaf_cache.borrow_mut().insert(id, result);
        Ok(result)
    }

    /// The `ArrayWrapper` child of `parent`, if any — the shared lookup
    /// behind the active-node resolver's empty-wrapper drill-down and the
    /// field-access analysis's receiver search. Looked up by kind rather
    /// than a fixed attribute index since the wrapper's slot differs
    /// across `InvokeExpression`/`ListExpression`/`RecordExpression`.
    pub fn array_wrapper_child(&self, parent: NodeId) -> Option<NodeId> {
        self.children_of(parent)
            .iter()
            .copied()
            .find(|&child| self.get_xor(child).map(|x| x.kind()) == Ok(NodeKind::ArrayWrapper))
    }

    /// `iterFieldProjection`: the `GeneralizedIdentifier` leaves
    /// selected by a `FieldProjection` node, in source order. Used by the
    /// field-access completion source to know which fields are already
    /// projected (and so should be excluded from candidates).
    ///
    /// Walks the whole subtree rather than assuming a fixed wrapper depth,
    /// since `FieldProjectionWrapper`/`FieldSelector` nesting is an
    /// implementation detail of the parser this crate doesn't own.
    pub fn iter_field_projection(&self, field_projection: NodeId) -> CommonResult<Vec<NodeId>> {
        let xor = self.get_xor(field_projection)?;
        if xor.kind() != NodeKind::FieldProjection {
            return Err(CommonError::KindMismatch {
                id: field_projection,
                actual: xor.kind(),
                expected: vec![NodeKind::FieldProjection],
            });
        }
        let mut selectors = Vec::new();
        self.collect_descendants_of_kind(field_projection, NodeKind::GeneralizedIdentifier, &mut selectors)?;
        Ok(selectors)
    }

    fn collect_descendants_of_kind(
        &self,
        id: NodeId,
        kind: NodeKind,
        out: &mut Vec<NodeId>,
    ) -> CommonResult<()> {
        for &child in self.children_of(id) {
            if self.get_xor(child)?.kind() == kind {
                out.push(child);
            } else {
                self.collect_descendants_of_kind(child, kind, out)?;
            }
        }
        Ok(())
    }
}
