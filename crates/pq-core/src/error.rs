//! Error taxonomy shared by the graph store and everything built on top of
//! it.

use thiserror::Error;

use crate::node::NodeId;

/// Fatal errors raised by [`crate::graph::NodeIdMap`] itself.
///
/// These indicate the graph is internally inconsistent — a parser bug, not
/// a condition an analysis can recover from. Every `assert*`-prefixed
/// getter on `NodeIdMap` raises one of these instead of returning `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommonError {
    #[error("node {0:?} is not present in either the AST or context map")]
    NodeNotFound(NodeId),

    #[error("node {0:?} was expected to be an AST node but is still an open context")]
    ExpectedAstNode(NodeId),

    #[error("node {0:?} was expected to be an open context but is already an AST node")]
    ExpectedContextNode(NodeId),

    #[error("node {0:?} has kind {actual:?}, expected one of {expected:?}")]
    KindMismatch {
        id: NodeId,
        actual: crate::kind::NodeKind,
        expected: Vec<crate::kind::NodeKind>,
    },

    #[error("node {0:?} has no child at attribute index {1}")]
    NoChildAtAttributeIndex(NodeId, usize),

    #[error("attempted to end context {0:?} as a leaf but it is already present in leafIds")]
    DuplicateLeaf(NodeId),

    #[error("attempted to delete node {0:?} which still has children")]
    DeleteOfNonChildlessNode(NodeId),

    #[error("node {0:?} would become its own ancestor")]
    CyclicAncestry(NodeId),

    #[error("ancestry requested for an empty active node")]
    EmptyAncestry,

    #[error("the analysis was cancelled")]
    Cancelled,
}

pub type CommonResult<T> = Result<T, CommonError>;

impl CommonError {
    /// A distinguished cancellation error, checked for at component
    /// boundaries by anything that holds a cancellation token.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, CommonError::Cancelled)
    }
}
