//! Parser adapters.
//!
//! Every crawled file ends up as a [`ParsedSource`]. Ruby input that is empty,
//! comment-only or syntactically invalid collapses to [`ParsedSource::Empty`]
//! so rules can test for it uniformly instead of handling parse failures.

pub mod json;
pub mod ruby;

use std::path::Path;

use crate::error::Result;
use crate::keys::ParserKind;

pub use ruby::{RubyAst, RubyParser};

#[derive(Debug, Clone)]
pub enum ParsedSource {
    Ruby(RubyAst),
    Json(serde_json::Value),
    /// Sentinel for sources that produced no usable AST.
    Empty,
}

impl ParsedSource {
    pub fn is_empty(&self) -> bool {
        matches!(self, ParsedSource::Empty)
    }

    pub fn ruby(&self) -> Option<&RubyAst> {
        match self {
            ParsedSource::Ruby(ast) => Some(ast),
            _ => None,
        }
    }

    pub fn json(&self) -> Option<&serde_json::Value> {
        match self {
            ParsedSource::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Parse `text` read from `path` with the parser a key asks for.
///
/// `parser` is only consulted for Ruby input; JSON needs no state.
pub fn parse_with(
    kind: ParserKind,
    parser: &mut RubyParser,
    path: &Path,
    text: &str,
) -> Result<ParsedSource> {
    match kind {
        ParserKind::Ruby => Ok(parser.parse(text)),
        ParserKind::Json => json::parse_json(path, text),
    }
}

/// Parse Ruby source with a fresh parser.
pub fn parse_ruby(text: &str) -> Result<ParsedSource> {
    Ok(RubyParser::new()?.parse(text))
}
