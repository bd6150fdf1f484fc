//! Event emitters shared across multiple parsers

use plover_span::Span;
use plover_syntax_tree::SyntaxKind;

use super::data::{BlockData, FunctionData, ParameterData, TypeClauseData};
use crate::event::EventSink;
use crate::expr::emit_expr;
use crate::stmt::emit_stmt;

/// Emit events for a type clause
///
/// # Structure
/// ```text
/// TypeClause
///   Attribute
///     LBracket Identifier RBracket
///   Const? Ref? Const?
///   Identifier | Var | Int | ...
///   (LBracket RBracket)*
/// ```
pub fn emit_type_clause(sink: &mut EventSink, data: &TypeClauseData) {
    sink.start_node(SyntaxKind::TypeClause);

    for (lbracket, name, rbracket) in &data.attributes {
        sink.start_node(SyntaxKind::Attribute);
        sink.add_token(SyntaxKind::LBracket, lbracket.clone());
        sink.add_token(SyntaxKind::Identifier, name.clone());
        sink.add_token(SyntaxKind::RBracket, rbracket.clone());
        sink.finish_node();
    }

    for (token, span) in &data.modifiers {
        sink.add_token((*token).into(), span.clone());
    }

    if let Some((token, span)) = &data.name {
        sink.add_token((*token).into(), span.clone());
    }

    for (lbracket, rbracket) in &data.brackets {
        sink.add_token(SyntaxKind::LBracket, lbracket.clone());
        sink.add_token(SyntaxKind::RBracket, rbracket.clone());
    }

    sink.finish_node();
}

/// Emit a parenthesized parameter list
pub fn emit_parameter_list(
    sink: &mut EventSink,
    lparen: Span,
    parameters: &[ParameterData],
    rparen: Span,
) {
    sink.start_node(SyntaxKind::ParameterList);
    sink.add_token(SyntaxKind::LParen, lparen);
    for parameter in parameters {
        sink.start_node(SyntaxKind::Parameter);
        emit_type_clause(sink, &parameter.ty);
        sink.add_token(SyntaxKind::Identifier, parameter.name.clone());
        if let Some((equals, value)) = &parameter.default {
            sink.add_token(SyntaxKind::Equals, equals.clone());
            emit_expr(sink, value);
        }
        sink.finish_node();
    }
    sink.add_token(SyntaxKind::RParen, rparen);
    sink.finish_node();
}

pub fn emit_block(sink: &mut EventSink, data: &BlockData) {
    sink.start_node(SyntaxKind::BlockStatement);
    sink.add_token(SyntaxKind::LBrace, data.lbrace.clone());
    for statement in &data.statements {
        emit_stmt(sink, statement);
    }
    sink.add_token(SyntaxKind::RBrace, data.rbrace.clone());
    sink.finish_node();
}

/// Emit a function under `kind`, either `FunctionDeclaration` or
/// `LocalFunctionStatement`
pub fn emit_function(sink: &mut EventSink, kind: SyntaxKind, data: &FunctionData) {
    sink.start_node(kind);
    emit_type_clause(sink, &data.return_type);
    sink.add_token(SyntaxKind::Identifier, data.name.clone());
    emit_parameter_list(
        sink,
        data.lparen.clone(),
        &data.parameters,
        data.rparen.clone(),
    );
    emit_block(sink, &data.body);
    sink.finish_node();
}
