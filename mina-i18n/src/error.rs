use thiserror::Error;

/// Errors raised while parsing a script or a markup document.
///
/// A parse error is scoped to a single file: the caller decides whether the
/// file is copied verbatim (templates) or reported as failed (scripts).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The tree-sitter grammar could not be loaded
    #[error("failed to load {grammar} grammar: {message}")]
    Grammar {
        grammar: &'static str,
        message: String,
    },
    /// tree-sitter gave up without producing a tree
    #[error("parser produced no syntax tree")]
    NoTree,
    /// The script contains an ERROR or MISSING node
    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },
    /// A markup construct was opened but never closed
    #[error("unterminated {construct} starting at byte {offset}")]
    Unterminated {
        construct: &'static str,
        offset: usize,
    },
}

pub type ParseResult<T> = Result<T, ParseError>;
