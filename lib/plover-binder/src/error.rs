//! Internal binder errors.
//!
//! These signal a bug in the binder, never a mistake in the program being
//! compiled. User-facing problems are reported as diagnostics instead.

use plover_syntax_tree::SyntaxKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinderError {
    #[error("malformed syntax tree: {kind:?} has no {part}")]
    MissingSyntax { kind: SyntaxKind, part: &'static str },

    #[error("unexpected {found:?} node, expected {expected}")]
    UnexpectedSyntax {
        expected: &'static str,
        found: SyntaxKind,
    },

    #[error("cannot replace function '{0}': no function of that name is in scope")]
    MissingFunction(String),

    #[error("struct '{0}' could not be registered")]
    StructRegistration(String),

    #[error("goto target '{0}' has no block in the control flow graph")]
    MissingLabel(String),
}

pub type BindResult<T> = Result<T, BinderError>;
