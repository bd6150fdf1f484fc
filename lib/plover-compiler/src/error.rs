use plover_binder::BinderError;
use thiserror::Error;

/// A compilation that could not run to completion.
///
/// Problems in the user's source are diagnostics, never errors; these mean
/// the compiler itself went wrong.
#[derive(Debug, Error)]
pub enum CompilationError {
    #[error("internal binder error: {0}")]
    Internal(#[from] BinderError),

    #[error("parser produced no compilation unit for '{0}'")]
    MissingCompilationUnit(String),
}

pub type CompilationResult<T> = Result<T, CompilationError>;
