use serde::{Deserialize, Serialize};

use crate::types::Pos;

/// Errors that abort a compilation run.
///
/// The pipeline is fail-fast: the first error encountered is returned to the
/// caller and no partial output is ever emitted. Every variant carries the
/// position of the offending token so the CLI can surface it unmodified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum CompileError {
    /// Inconsistent indentation unit, tab/space mixing, or a dedent that
    /// matches no open ancestor.
    #[error("lex error: {message} at {pos}")]
    Lex { message: String, pos: Pos },

    /// Malformed element or property header, unexpected indent, property
    /// with children, or an unterminated quoted attribute.
    #[error("syntax error: {message} at {pos}")]
    Syntax { message: String, pos: Pos },

    /// A raw property value that matches no classification rule.
    #[error("value error: {message} at {pos}")]
    Value { message: String, pos: Pos },

    /// Dangling or unrecognized backslash escape inside a string literal.
    #[error("escape error: {message} at {pos}")]
    Escape { message: String, pos: Pos },

    /// Unparseable operand or operator, or malformed trait-access syntax.
    #[error("expression error: {message} at {pos}")]
    Expression { message: String, pos: Pos },
}

impl CompileError {
    /// Position of the offending token.
    pub fn pos(&self) -> Pos {
        match self {
            CompileError::Lex { pos, .. }
            | CompileError::Syntax { pos, .. }
            | CompileError::Value { pos, .. }
            | CompileError::Escape { pos, .. }
            | CompileError::Expression { pos, .. } => *pos,
        }
    }
}
