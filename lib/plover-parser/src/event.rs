//! Event-based parsing infrastructure
//!
//! Parsers do not build syntax trees directly. They emit events into an
//! [`EventSink`], and a [`TreeBuilder`] later replays those events against the
//! source text to produce a rowan tree.
//!
//! Emitters only record the tokens that carry meaning (keywords, names,
//! operators, delimiters). Everything in between, trivia and list separators,
//! is recovered by the tree builder from the source so the final tree covers
//! every byte.

use plover_lexer::lex;
use plover_span::Span;
use plover_syntax_tree::{GreenNodeBuilder, SyntaxKind, SyntaxNode};

/// Events emitted during parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Start a new syntax node
    StartNode(SyntaxKind),
    /// Add a token to the current node
    AddToken(SyntaxKind, Span),
    /// Finish the current syntax node
    FinishNode,
    /// A parse error occurred
    Error { message: String, span: Option<Span> },
}

/// Collects events during parsing
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    events: Vec<Event>,
}

impl EventSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.events.push(Event::StartNode(kind));
    }

    pub fn add_token(&mut self, kind: SyntaxKind, span: Span) {
        self.events.push(Event::AddToken(kind, span));
    }

    pub fn finish_node(&mut self) {
        self.events.push(Event::FinishNode);
    }

    /// Record a parse error without a location
    pub fn error(&mut self, message: String) {
        self.events.push(Event::Error {
            message,
            span: None,
        });
    }

    /// Record a parse error at a location
    pub fn error_at(&mut self, message: String, span: Span) {
        self.events.push(Event::Error {
            message,
            span: Some(span),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

/// Builds a syntax tree from events and source text
pub struct TreeBuilder<'src> {
    source: &'src str,
    events: Vec<Event>,
    pos: usize,
    /// Source offset up to which text has been added to the tree
    cursor: usize,
    depth: usize,
}

impl<'src> TreeBuilder<'src> {
    pub fn new(source: &'src str, events: Vec<Event>) -> Self {
        Self {
            source,
            events,
            pos: 0,
            cursor: 0,
            depth: 0,
        }
    }

    /// Build the syntax tree from events
    pub fn build(mut self) -> SyntaxNode {
        let mut builder = GreenNodeBuilder::new();
        self.process_events(&mut builder);
        SyntaxNode::new_root(builder.finish())
    }

    fn process_events(&mut self, builder: &mut GreenNodeBuilder) {
        while self.pos < self.events.len() {
            match self.events[self.pos].clone() {
                Event::StartNode(kind) => {
                    // Leading trivia belongs to the enclosing node, except at
                    // the root where there is nothing to enclose it.
                    if self.depth > 0 {
                        if let Some(next) = self.next_token_start() {
                            self.fill_gap(builder, next);
                        }
                    }
                    builder.start_node(kind.into());
                    self.depth += 1;
                }
                Event::AddToken(kind, span) => {
                    self.fill_gap(builder, span.start);
                    builder.token(kind.into(), &self.source[span.clone()]);
                    self.cursor = span.end;
                }
                Event::FinishNode => {
                    if self.depth == 1 {
                        self.fill_gap(builder, self.source.len());
                    }
                    builder.finish_node();
                    self.depth = self.depth.saturating_sub(1);
                }
                Event::Error { .. } => {}
            }
            self.pos += 1;
        }
    }

    fn next_token_start(&self) -> Option<usize> {
        self.events[self.pos..].iter().find_map(|event| match event {
            Event::AddToken(_, span) => Some(span.start),
            _ => None,
        })
    }

    /// Add the source text between the cursor and `until` as tokens
    fn fill_gap(&mut self, builder: &mut GreenNodeBuilder, until: usize) {
        if until <= self.cursor {
            return;
        }

        let base = self.cursor;
        for token in lex(&self.source[base..until]) {
            let (kind, span) = match token {
                Ok(token) => (SyntaxKind::from(token.value), token.span),
                Err(error) => (SyntaxKind::Error, error.span),
            };
            let text = &self.source[base + span.start..base + span.end];
            builder.token(kind.into(), text);
        }
        self.cursor = until;
    }
}
