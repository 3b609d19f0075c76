use crate::ancestry::{ancestry_of, assert_leaf, first_index_of_kind, nth_next, nth_previous};
use crate::graph::NodeIdMap;
use crate::kind::NodeKind;

fn build_if_expression() -> (NodeIdMap, crate::node::NodeId) {
    let mut graph = NodeIdMap::new();
    let if_expr = graph.start_context(NodeKind::IfExpression, None, 0, None);
    let _if_kw = {
        let id = graph.start_context(NodeKind::Constant, Some(0), 0, Some(if_expr));
        graph.end_context_as_leaf(id, 0, "if").unwrap();
        id
    };
    let cond = graph.start_context(NodeKind::NumberLiteral, Some(1), 1, Some(if_expr));
    graph.end_context_as_leaf(cond, 1, "1").unwrap();
    (graph, cond)
}

#[test]
fn ancestry_of_runs_leaf_to_root() {
    let (graph, cond) = build_if_expression();
    let ancestry = ancestry_of(&graph, cond).unwrap();
    assert_eq!(ancestry.len(), 2);
    assert_eq!(ancestry[0].id(), cond);
    assert_eq!(ancestry[1].kind(), NodeKind::IfExpression);
}

#[test]
fn nth_next_walks_toward_the_root() {
    let (graph, cond) = build_if_expression();
    let ancestry = ancestry_of(&graph, cond).unwrap();
    let parent = nth_next(&ancestry, 0, 1, None).unwrap().unwrap();
    assert_eq!(parent.kind(), NodeKind::IfExpression);
    assert!(nth_next(&ancestry, 0, 5, None).unwrap().is_none());
}

#[test]
fn nth_previous_walks_toward_the_leaf_and_saturates_at_zero() {
    let (graph, cond) = build_if_expression();
    let ancestry = ancestry_of(&graph, cond).unwrap();
    let leaf = nth_previous(&ancestry, 1, 1, None).unwrap().unwrap();
    assert_eq!(leaf.id(), cond);
    assert!(nth_previous(&ancestry, 0, 1, None).unwrap().is_none());
}

#[test]
fn kind_assertion_rejects_a_mismatch() {
    let (graph, cond) = build_if_expression();
    let ancestry = ancestry_of(&graph, cond).unwrap();
    let err = nth_next(&ancestry, 0, 1, Some(&[NodeKind::LetExpression])).unwrap_err();
    assert!(matches!(err, crate::error::CommonError::KindMismatch { .. }));
}

#[test]
fn first_index_of_kind_scans_leaf_to_root() {
    let (graph, cond) = build_if_expression();
    let ancestry = ancestry_of(&graph, cond).unwrap();
    assert_eq!(first_index_of_kind(&ancestry, NodeKind::IfExpression), Some(1));
    assert_eq!(first_index_of_kind(&ancestry, NodeKind::LetExpression), None);
}

#[test]
fn assert_leaf_returns_the_first_element() {
    let (graph, cond) = build_if_expression();
    let ancestry = ancestry_of(&graph, cond).unwrap();
    assert_eq!(assert_leaf(&ancestry).id(), cond);
}

#[test]
#[should_panic]
fn assert_leaf_panics_on_empty_ancestry() {
    let empty: Vec<crate::node::XorNode> = Vec::new();
    assert_leaf(&empty);
}
