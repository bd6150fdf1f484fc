//! Semantic analysis for Plover.
//!
//! The binder turns parsed compilation units into a typed bound tree in two
//! phases:
//!
//! 1. [`bind_global_scope`] declares every struct, function and global
//!    statement of a submission and decides the program's entry point.
//! 2. [`bind_program`] binds each function body against that global scope,
//!    lowers it to labels and gotos, and checks that non-void functions
//!    return on every path.
//!
//! # Module Structure
//!
//! - [`binder`]: the recursive-descent walker and both entry points
//! - [`scope`]: lexical scopes and the function arena
//! - [`overload`]: argument rearrangement and overload scoring
//! - [`lowering`]: structured control flow to gotos
//! - [`cfg`]: control-flow graphs over lowered bodies
//! - [`diagnostics`]: user-facing errors and warnings
//! - [`error`]: internal binder errors

pub mod binder;
pub mod cfg;
pub mod diagnostics;
pub mod error;
pub mod lowering;
pub mod overload;
pub mod scope;

pub use binder::{bind_global_scope, bind_program, BoundGlobalScope, BoundProgram, SourceTree};
pub use cfg::ControlFlowGraph;
pub use error::{BindResult, BinderError};
pub use lowering::lower;
pub use scope::{BoundScope, FunctionId, Symbol};

/// Options that change how a submission is bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinderOptions {
    /// Global statements form an `<Eval>$` function whose last expression
    /// is the submission's value, and any expression may be a statement
    pub script_mode: bool,
}

impl BinderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_mode(mut self, script_mode: bool) -> Self {
        self.script_mode = script_mode;
        self
    }
}
