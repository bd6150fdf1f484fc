//! Driving a grammar entry point over a token stream.
//!
//! Plover's grammar has one entry point, [`parse_compilation_unit`], which
//! accepts struct declarations, function declarations and global statements
//! in any order. [`Parser::parse`] runs it (or any function with the same
//! shape) over pre-lexed tokens, then turns the recorded events into a rowan
//! tree. Errors are reported next to the tree and never stop it from being
//! built, so the binder always gets a `CompilationUnit`.
//!
//! Most callers want [`crate::parse_source`], which lexes first.
//!
//! [`parse_compilation_unit`]: crate::parse_compilation_unit
//!
//! ```no_run
//! use plover_parser::{parse_compilation_unit, Parser};
//! use plover_lexer::lex;
//!
//! let source = "struct Point { int x; }\nPrintLine(1);";
//! let tokens: Vec<_> = lex(source)
//!     .filter_map(Result::ok)
//!     .map(|spanned| (spanned.value, spanned.span))
//!     .collect();
//!
//! let result = Parser::parse(source, tokens.into_iter(), parse_compilation_unit);
//! assert!(result.errors.is_empty());
//! ```

use plover_lexer::Token;
use plover_span::Span;
use plover_syntax_tree::SyntaxNode;

use crate::event::{Event, EventSink, TreeBuilder};

/// A syntax error. `span` is `None` when the input ended early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Option<Span>,
}

/// A lossless syntax tree and every syntax error found while building it
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub tree: SyntaxNode,
    pub errors: Vec<ParseError>,
}

pub struct Parser;

impl Parser {
    /// Run `entry` over `tokens` and build the tree from its events.
    ///
    /// Whitespace and comments need not be in `tokens`; the tree builder
    /// recovers them from `source`, so the tree text matches the input.
    pub fn parse<I, F>(source: &str, tokens: I, entry: F) -> ParseResult
    where
        I: Iterator<Item = (Token, Span)> + Clone,
        F: FnOnce(&str, I, &mut EventSink),
    {
        let mut sink = EventSink::new();
        entry(source, tokens, &mut sink);

        let errors = syntax_errors(sink.events());
        let tree = TreeBuilder::new(source, sink.into_events()).build();
        ParseResult { tree, errors }
    }
}

fn syntax_errors(events: &[Event]) -> Vec<ParseError> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Error { message, span } => Some(ParseError {
                message: message.clone(),
                span: span.clone(),
            }),
            _ => None,
        })
        .collect()
}
