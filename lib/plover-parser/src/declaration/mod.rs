//! Top-level declaration parsing
//!
//! A compilation unit is a sequence of members:
//! - Struct declarations: `struct Name { Type field; ... }`
//! - Function declarations: `Type name(params) { ... }`
//! - Global statements: any statement

use chumsky::prelude::*;
use plover_lexer::Token;
use plover_span::Span;
use plover_syntax_tree::SyntaxKind;

use crate::common::{
    emit_function, emit_type_clause, format_parse_error, identifier, skip_trivia, token,
    FunctionData, TypeClauseData,
};
use crate::event::EventSink;
use crate::stmt::{block_parser, emit_stmt, function_parser, stmt_parser, StmtData};
use crate::ty::type_clause_parser;

/// Raw parsed data for a struct field: `Type name;`
#[derive(Debug, Clone)]
pub struct FieldData {
    pub ty: TypeClauseData,
    pub name: Span,
    pub semicolon: Span,
}

/// Raw parsed data for a struct declaration
#[derive(Debug, Clone)]
pub struct StructData {
    pub struct_span: Span,
    pub name: Span,
    pub lbrace: Span,
    pub fields: Vec<FieldData>,
    pub rbrace: Span,
}

#[derive(Debug, Clone)]
pub enum MemberData {
    Struct(StructData),
    Function(FunctionData),
    GlobalStatement(StmtData),
}

fn struct_parser() -> impl Parser<Token, StructData, Error = Simple<Token>> + Clone {
    let field = type_clause_parser()
        .then(identifier())
        .then(token(Token::Semicolon))
        .map(|((ty, name), semicolon)| FieldData {
            ty,
            name,
            semicolon,
        });

    token(Token::Struct)
        .then(identifier())
        .then(token(Token::LBrace))
        .then(field.repeated())
        .then(token(Token::RBrace))
        .map(
            |((((struct_span, name), lbrace), fields), rbrace)| StructData {
                struct_span,
                name,
                lbrace,
                fields,
                rbrace,
            },
        )
}

/// Parser for a whole compilation unit
pub fn compilation_unit_parser<'a>(
) -> impl Parser<Token, Vec<MemberData>, Error = Simple<Token>> + Clone + 'a {
    let stmt = stmt_parser().boxed();

    let member = struct_parser()
        .map(MemberData::Struct)
        .or(function_parser(block_parser(stmt.clone())).map(MemberData::Function))
        .or(stmt.map(MemberData::GlobalStatement));

    member
        .repeated()
        .then_ignore(skip_trivia())
        .then_ignore(end())
}

fn emit_struct(sink: &mut EventSink, data: &StructData) {
    sink.start_node(SyntaxKind::StructDeclaration);
    sink.add_token(SyntaxKind::Struct, data.struct_span.clone());
    sink.add_token(SyntaxKind::Identifier, data.name.clone());
    sink.add_token(SyntaxKind::LBrace, data.lbrace.clone());
    for field in &data.fields {
        sink.start_node(SyntaxKind::FieldDeclaration);
        emit_type_clause(sink, &field.ty);
        sink.add_token(SyntaxKind::Identifier, field.name.clone());
        sink.add_token(SyntaxKind::Semicolon, field.semicolon.clone());
        sink.finish_node();
    }
    sink.add_token(SyntaxKind::RBrace, data.rbrace.clone());
    sink.finish_node();
}

pub fn emit_member(sink: &mut EventSink, data: &MemberData) {
    match data {
        MemberData::Struct(data) => emit_struct(sink, data),
        MemberData::Function(data) => {
            emit_function(sink, SyntaxKind::FunctionDeclaration, data)
        }
        MemberData::GlobalStatement(data) => {
            sink.start_node(SyntaxKind::GlobalStatement);
            emit_stmt(sink, data);
            sink.finish_node();
        }
    }
}

/// Parse a compilation unit and emit events
///
/// A `CompilationUnit` node is always emitted, empty when parsing failed.
pub fn parse_compilation_unit<I>(source: &str, tokens: I, sink: &mut EventSink)
where
    I: Iterator<Item = (Token, Span)> + Clone,
{
    let end_pos = source.len();
    let stream = chumsky::Stream::from_iter(end_pos..end_pos, tokens);

    sink.start_node(SyntaxKind::CompilationUnit);
    match compilation_unit_parser().parse(stream) {
        Ok(members) => {
            for member in &members {
                emit_member(sink, member);
            }
        }
        Err(errors) => {
            for error in errors {
                sink.error_at(format_parse_error(&error), error.span());
            }
        }
    }
    sink.finish_node();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TreeBuilder;
    use plover_lexer::lex;
    use plover_syntax_tree::ast::{AstNode, CompilationUnit, Member};

    fn parse(source: &str) -> (CompilationUnit, EventSink) {
        let tokens: Vec<_> = lex(source)
            .filter_map(|t| t.ok())
            .map(|spanned| (spanned.value, spanned.span))
            .collect();
        let mut sink = EventSink::new();
        parse_compilation_unit(source, tokens.into_iter(), &mut sink);
        let tree = TreeBuilder::new(source, sink.events().to_vec()).build();
        (CompilationUnit::cast(tree).unwrap(), sink)
    }

    #[test]
    fn test_members() {
        let source = r#"
struct Point { int x; int y; }

int add(int a, int b) { return a + b; }

PrintLine(add(1, 2));
"#;
        let (unit, _) = parse(source);
        let members: Vec<_> = unit.members().collect();

        assert_eq!(members.len(), 3);
        assert!(matches!(members[0], Member::Struct(_)));
        assert!(matches!(members[1], Member::Function(_)));
        assert!(matches!(members[2], Member::GlobalStatement(_)));
        assert_eq!(unit.syntax().text().to_string(), source);
    }

    #[test]
    fn test_struct_fields() {
        let (unit, _) = parse("struct S { [NotNull] int a; string b; }");
        let Some(Member::Struct(declaration)) = unit.members().next() else {
            panic!("expected struct");
        };
        assert_eq!(declaration.identifier().unwrap().text(), "S");
        assert_eq!(declaration.fields().count(), 2);
    }

    #[test]
    fn test_error_reported_with_span() {
        let (unit, sink) = parse("int main( { }");
        assert_eq!(unit.members().count(), 0);
        assert!(sink
            .events()
            .iter()
            .any(|event| matches!(event, crate::event::Event::Error { span: Some(_), .. })));
    }
}
