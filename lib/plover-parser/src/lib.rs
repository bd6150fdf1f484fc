//! Plover Parser
//!
//! Event-driven parsing for Plover. Chumsky parsers produce plain data,
//! emitters turn that data into events, and a `TreeBuilder` converts the
//! events into a rowan syntax tree (see `plover-syntax-tree`).
//!
//! # Example
//!
//! ```no_run
//! use plover_parser::parse_source;
//! use plover_syntax_tree::ast::{AstNode, CompilationUnit};
//!
//! let result = parse_source("int main() { return 0; }");
//! let unit = CompilationUnit::cast(result.tree).unwrap();
//! assert_eq!(unit.members().count(), 1);
//! ```

pub mod common;
pub mod declaration;
pub mod event;
pub mod expr;
pub mod parser;
pub mod stmt;
pub mod ty;

pub use declaration::parse_compilation_unit;
pub use parser::{ParseError, ParseResult, Parser};

/// Lex and parse a whole source file
///
/// Lexer errors are reported as parse errors; the offending characters stay
/// in the tree as `Error` tokens.
pub fn parse_source(source: &str) -> ParseResult {
    let mut lex_errors = Vec::new();
    let tokens: Vec<_> = plover_lexer::lex(source)
        .filter_map(|token| match token {
            Ok(spanned) => Some((spanned.value, spanned.span)),
            Err(error) => {
                lex_errors.push(ParseError {
                    message: format!("unexpected character '{}'", &source[error.span.clone()]),
                    span: Some(error.span),
                });
                None
            }
        })
        .collect();

    let mut result = Parser::parse(source, tokens.into_iter(), parse_compilation_unit);
    lex_errors.append(&mut result.errors);
    result.errors = lex_errors;
    result
}
