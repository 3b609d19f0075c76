//! Autocomplete orchestration: composes the four independent
//! analyses (keyword, primitive-type, language-constant, field-access) into
//! one combined result, run in a fixed order — field-access, keyword,
//! primitive-type, language-constant — even though none of them reads
//! another's output.

pub mod field_access;
pub mod keyword;
pub mod language_constant;
pub mod primitive_type;

#[cfg(test)]
mod language_constant_tests;

use pq_core::graph::NodeIdMap;
use pq_core::token::TokenStream;

use crate::active_node::ActiveNode;
use crate::config::AnalysisConfig;
use crate::error::AnalysisResult;
use crate::parser_contract::{ParseError, RestartableParser};
use crate::type_provider::TypeProvider;

use field_access::FieldAccessAnalysis;

/// The combined result of one autocomplete request. Each field is
/// independently `Ok`/`Err` — a failure in one analysis never prevents the
/// others from being reported.
#[derive(Debug, Clone)]
pub struct Autocomplete {
    pub field_access: AnalysisResult<Option<FieldAccessAnalysis>>,
    pub keyword: AnalysisResult<Vec<&'static str>>,
    pub primitive_type: AnalysisResult<Vec<&'static str>>,
    pub language_constant: AnalysisResult<Vec<&'static str>>,
}

impl Autocomplete {
    /// The gate-failure default: no active node at all, so only the
    /// expression-starting keywords (plus `section`) are offered; the other
    /// three analyses report empty successes rather than errors.
    fn default_for_no_active_node() -> Self {
        Self {
            field_access: Ok(None),
            keyword: Ok(keyword::default_keywords()),
            primitive_type: Ok(Vec::new()),
            language_constant: Ok(Vec::new()),
        }
    }
}

/// Runs all four analyses for one cursor position against one parsed
/// buffer. `parser`/`parse_error` are only consulted by the analyses that
/// can trigger a speculative re-parse (language-constant, field-access);
/// pass `None` for `parser` when no restartable parser is available
/// (keyword and primitive-type completion never need one).
pub fn autocomplete<P: RestartableParser, T: TypeProvider>(
    graph: &NodeIdMap,
    tokens: &dyn TokenStream,
    active_node: Option<&ActiveNode>,
    parse_error: Option<&ParseError>,
    trailing_text: Option<&str>,
    parser: Option<&P>,
    state: Option<&P::State>,
    type_provider: &T,
    config: &AnalysisConfig,
) -> Autocomplete {
    let _span = tracing::debug_span!("autocomplete").entered();

    let Some(active_node) = active_node.filter(|n| !n.ancestry.is_empty()) else {
        return Autocomplete::default_for_no_active_node();
    };

    let field_access = field_access::autocomplete_field_access(
        graph,
        tokens,
        active_node,
        parse_error,
        parser,
        state,
        type_provider,
        config,
    );
    let keyword = keyword::autocomplete_keyword(graph, tokens, active_node, parse_error, trailing_text);
    let primitive_type = primitive_type::autocomplete_primitive_type(active_node);
    let language_constant = language_constant::autocomplete_language_constant(
        active_node,
        parse_error,
        parser,
        state,
        config,
    );

    Autocomplete {
        field_access,
        keyword,
        primitive_type,
        language_constant,
    }
}
