//! The interfaces this crate assumes of its out-of-scope collaborators: the
//! restartable parser and the type engine. The real lexer/parser/type-checker
//! live elsewhere; this module only names the trait boundary they must
//! satisfy to be usable from `pq-langservice`.

use std::fmt;

use pq_core::graph::NodeIdMap;
use pq_core::node::NodeId;
use pq_core::token::TokenStream;

/// The upstream parser's report for an incomplete buffer. Not an
/// error *of* this crate — an input it consumes to trigger speculative
/// re-parses and conjunction-keyword suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub token_index: usize,
    pub kind: ParseErrorKind,
}

/// The closed set of parser diagnoses this crate recognizes and reacts to.
/// Anything else the parser might raise is still representable —
/// callers can widen `ParseErrorKind` with an `Other(String)` arm without
/// this crate needing to change — but these four are the ones the
/// autocomplete analyses specifically branch on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnterminatedBracket,
    UnterminatedParenthesis,
    UnterminatedSequence,
    ExpectedAnyToken,
    Other(String),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnterminatedBracket => write!(f, "unterminated bracket"),
            ParseErrorKind::UnterminatedParenthesis => write!(f, "unterminated parenthesis"),
            ParseErrorKind::UnterminatedSequence => write!(f, "unterminated sequence"),
            ParseErrorKind::ExpectedAnyToken => write!(f, "expected any token"),
            ParseErrorKind::Other(msg) => write!(f, "{msg}"),
        }
    }
}

/// A parse entry point callable against a fresh, clonable parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseEntryPoint {
    FieldSelector,
    FieldProjection,
    FunctionExpression,
    NullablePrimitiveType,
}

impl ParseEntryPoint {
    pub fn name(self) -> &'static str {
        match self {
            ParseEntryPoint::FieldSelector => "readFieldSelector",
            ParseEntryPoint::FieldProjection => "readFieldProjection",
            ParseEntryPoint::FunctionExpression => "readFunctionExpression",
            ParseEntryPoint::NullablePrimitiveType => "readNullablePrimitiveType",
        }
    }
}

/// What one speculative attempt produced: the resulting graph/tokens
/// (embedded in `State`), the node it completed or left open at the
/// attempt's root, and how far into the token stream it got — the score
/// speculative re-parse attempts are ranked by.
pub struct ParseAttempt<State> {
    pub state: State,
    /// The completed AST node, if the entry point fully parsed; `None`
    /// when it stopped on an open context (still useful to the caller —
    /// e.g. language-constant completion accepts either a completed AST or
    /// an open context with a usable `FunctionExpression` root).
    pub completed_root: Option<NodeId>,
    /// The open context left behind when the attempt didn't complete.
    pub open_root: Option<NodeId>,
    pub token_index_reached: usize,
}

impl<State> ParseAttempt<State> {
    pub fn root(&self) -> Option<NodeId> {
        self.completed_root.or(self.open_root)
    }
}

/// A parser capable of being restarted at an arbitrary token index against
/// a cheap structural clone of its own state.
///
/// `State` must expose the graph and token stream a completed or
/// in-progress attempt produced, since the active-node resolver is re-run
/// against it after the attempt.
pub trait RestartableParser {
    type State: Clone;

    fn graph_of<'a>(&self, state: &'a Self::State) -> &'a NodeIdMap;
    fn tokens_of<'a>(&self, state: &'a Self::State) -> &'a dyn TokenStream;

    /// Runs one entry point against a clone of `state`, starting at
    /// `token_index`. Returns the attempt's outcome on success, or the
    /// parser's own [`ParseError`] carrying the state at the failure
    /// point. Any other thrown condition is an internal bug and is
    /// expected to panic rather than be represented here.
    fn try_entry_point(
        &self,
        entry_point: ParseEntryPoint,
        state: &Self::State,
        token_index: usize,
    ) -> Result<ParseAttempt<Self::State>, ParseError>;
}
