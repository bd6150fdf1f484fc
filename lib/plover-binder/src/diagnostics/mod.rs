//! User-facing binder diagnostics.
//!
//! Each problem is a small struct implementing `IntoDiagnostic`, grouped by
//! category:
//!
//! - `names` - unresolved or misused names
//! - `types` - conversions, operators and value requirements
//! - `calls` - arity, named arguments and overload resolution
//! - `declarations` - duplicate and malformed declarations
//! - `control_flow` - entry points, returns and loop jumps
//! - `references` - `ref`/`const` binding and assignment rules
//! - `warnings` - every warning the binder emits

mod calls;
mod control_flow;
mod declarations;
mod names;
mod references;
mod types;
mod warnings;

pub use calls::*;
pub use control_flow::*;
pub use declarations::*;
pub use names::*;
pub use references::*;
pub use types::*;
pub use warnings::*;

use plover_reporting::{Diagnostic, Label};
use plover_span::Span;

/// An error with one primary label and no notes.
fn simple_error(file_id: usize, span: &Span, message: String) -> Diagnostic<usize> {
    Diagnostic::error()
        .with_message(message)
        .with_labels(vec![Label::primary(file_id, span.clone())])
}
