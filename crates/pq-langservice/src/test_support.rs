//! A minimal mock parser/type-engine standing in for the out-of-scope real
//! M lexer/parser and type inference engine (§1) so the concrete scenarios
//! in spec §8 can be exercised end to end. Test-only: never compiled into
//! the public API.

use std::cell::RefCell;
use std::collections::HashMap;

use pq_core::graph::NodeIdMap;
use pq_core::node::NodeId;
use pq_core::token::{Token, TokenStream};

use crate::error::AnalysisError;
use crate::parser_contract::{ParseAttempt, ParseEntryPoint, ParseError, RestartableParser};
use crate::type_provider::{TypeDescriptor, TypeProvider};

/// The graph/tokens one speculative attempt (or the original parse) owns.
#[derive(Debug, Clone)]
pub struct MockState {
    pub graph: NodeIdMap,
    pub tokens: Vec<Token>,
}

/// A [`RestartableParser`] whose responses are canned per `(entry point,
/// token index)` pair by the test that builds it, rather than actually
/// parsing anything — this crate's parser is an out-of-scope collaborator,
/// so tests only need to assert how the autocomplete analyses react to
/// what it reports, not reimplement parsing.
#[derive(Default)]
pub struct MockParser {
    responses: RefCell<HashMap<(ParseEntryPoint, usize), Result<ParseAttempt<MockState>, ParseError>>>,
}

impl MockParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the outcome `try_entry_point` should return the one time
    /// it's called with this `(entry_point, token_index)` pair.
    pub fn stub(
        &self,
        entry_point: ParseEntryPoint,
        token_index: usize,
        outcome: Result<ParseAttempt<MockState>, ParseError>,
    ) {
        self.responses.borrow_mut().insert((entry_point, token_index), outcome);
    }
}

impl RestartableParser for MockParser {
    type State = MockState;

    fn graph_of<'a>(&self, state: &'a MockState) -> &'a NodeIdMap {
        &state.graph
    }

    fn tokens_of<'a>(&self, state: &'a MockState) -> &'a dyn TokenStream {
        &state.tokens
    }

    fn try_entry_point(
        &self,
        entry_point: ParseEntryPoint,
        _state: &MockState,
        token_index: usize,
    ) -> Result<ParseAttempt<MockState>, ParseError> {
        self.responses
            .borrow_mut()
            .remove(&(entry_point, token_index))
            .unwrap_or_else(|| {
                panic!("MockParser: no stubbed response for {entry_point:?} at token {token_index}")
            })
    }
}

/// A [`TypeProvider`] backed by a fixed `NodeId -> TypeDescriptor` table,
/// standing in for the opaque `typeOf` collaborator.
#[derive(Default)]
pub struct MockTypeProvider {
    types: HashMap<NodeId, TypeDescriptor>,
}

impl MockTypeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: NodeId, ty: TypeDescriptor) {
        self.types.insert(id, ty);
    }
}

impl TypeProvider for MockTypeProvider {
    fn try_type(&self, id: NodeId) -> Result<TypeDescriptor, AnalysisError> {
        self.types
            .get(&id)
            .cloned()
            .ok_or_else(|| AnalysisError::Type(format!("no stubbed type for {id}")))
    }
}
