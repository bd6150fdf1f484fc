//! Shared data structures produced by the chumsky parsers
//!
//! These hold the spans of every meaningful token so emitters can replay
//! them as events in source order.

use plover_lexer::Token;
use plover_span::Span;

use crate::expr::ExprData;
use crate::stmt::StmtData;

/// Raw parsed data for a type clause
///
/// Syntax: `[Attr]* const? ref? const? (var | builtin | Name)? ([])*`
#[derive(Debug, Clone)]
pub struct TypeClauseData {
    /// `(lbracket, name, rbracket)` for each attribute
    pub attributes: Vec<(Span, Span, Span)>,
    /// `const` and `ref` keywords in source order
    pub modifiers: Vec<(Token, Span)>,
    /// Absent only for `const name = value`
    pub name: Option<(Token, Span)>,
    /// `(lbracket, rbracket)` for each array rank
    pub brackets: Vec<(Span, Span)>,
}

/// Raw parsed data for a single parameter
///
/// Syntax: `Type name (= default)?`
#[derive(Debug, Clone)]
pub struct ParameterData {
    pub ty: TypeClauseData,
    pub name: Span,
    pub default: Option<(Span, ExprData)>,
}

/// Raw parsed data for a braced statement list
#[derive(Debug, Clone)]
pub struct BlockData {
    pub lbrace: Span,
    pub statements: Vec<StmtData>,
    pub rbrace: Span,
}

/// Raw parsed data for a function, top-level or local
#[derive(Debug, Clone)]
pub struct FunctionData {
    pub return_type: TypeClauseData,
    pub name: Span,
    pub lparen: Span,
    pub parameters: Vec<ParameterData>,
    pub rparen: Span,
    pub body: BlockData,
}
