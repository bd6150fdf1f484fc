//! Statement parsing
//!
//! Supports:
//! - Blocks: `{ ... }`
//! - Variable declarations: `Type name (= expr)?;`
//! - Local functions: `Type name(params) { ... }`
//! - `if`/`else`, `while`, `do`/`while`, `for`
//! - `try`/`catch`/`finally`
//! - `break;`, `continue;`, `return expr?;`
//! - Expression statements: `expr;` and the empty statement `;`

use chumsky::prelude::*;
use plover_lexer::Token;
use plover_span::Span;
use plover_syntax_tree::SyntaxKind;

use crate::common::{
    emit_block, emit_function, emit_type_clause, identifier, token, BlockData, FunctionData,
    ParameterData, TypeClauseData,
};
use crate::event::EventSink;
use crate::expr::{emit_expr, expr_parser, optional_expr_parser, ExprData};
use crate::ty::{implicit_constant_parser, type_clause_parser};

/// Raw parsed data for a variable declaration
#[derive(Debug, Clone)]
pub struct VariableDeclarationData {
    pub ty: TypeClauseData,
    pub name: Span,
    pub initializer: Option<(Span, ExprData)>,
    pub semicolon: Span,
}

/// Raw parsed statement tree
#[derive(Debug, Clone)]
pub enum StmtData {
    Block(BlockData),
    VariableDeclaration(VariableDeclarationData),
    LocalFunction(FunctionData),
    If {
        if_span: Span,
        lparen: Span,
        condition: ExprData,
        rparen: Span,
        then: Box<StmtData>,
        otherwise: Option<(Span, Box<StmtData>)>,
    },
    While {
        while_span: Span,
        lparen: Span,
        condition: ExprData,
        rparen: Span,
        body: Box<StmtData>,
    },
    DoWhile {
        do_span: Span,
        body: Box<StmtData>,
        while_span: Span,
        lparen: Span,
        condition: ExprData,
        rparen: Span,
        semicolon: Span,
    },
    For {
        for_span: Span,
        lparen: Span,
        initializer: Box<StmtData>,
        condition: ExprData,
        semicolon: Span,
        step: ExprData,
        rparen: Span,
        body: Box<StmtData>,
    },
    Try {
        try_span: Span,
        body: BlockData,
        catch: Option<(Span, BlockData)>,
        finally: Option<(Span, BlockData)>,
    },
    Break(Span, Span),
    Continue(Span, Span),
    Return {
        return_span: Span,
        value: Option<ExprData>,
        semicolon: Span,
    },
    Expression(ExprData, Span),
}

/// Parser for a parameter list between parentheses, without the parentheses
pub fn parameters_parser<'a>(
) -> impl Parser<Token, Vec<ParameterData>, Error = Simple<Token>> + Clone + 'a {
    type_clause_parser()
        .then(identifier())
        .then(token(Token::Equals).then(expr_parser()).or_not())
        .map(|((ty, name), default)| ParameterData { ty, name, default })
        .separated_by(token(Token::Comma))
}

/// Parser for a function given a block parser: `Type name(params) { ... }`
pub fn function_parser<'a, B>(
    block: B,
) -> impl Parser<Token, FunctionData, Error = Simple<Token>> + Clone + 'a
where
    B: Parser<Token, BlockData, Error = Simple<Token>> + Clone + 'a,
{
    type_clause_parser()
        .then(identifier())
        .then(token(Token::LParen))
        .then(parameters_parser())
        .then(token(Token::RParen))
        .then(block)
        .map(
            |(((((return_type, name), lparen), parameters), rparen), body)| FunctionData {
                return_type,
                name,
                lparen,
                parameters,
                rparen,
                body,
            },
        )
}

/// Parser for a block given a statement parser
pub fn block_parser<'a, S>(
    stmt: S,
) -> impl Parser<Token, BlockData, Error = Simple<Token>> + Clone + 'a
where
    S: Parser<Token, StmtData, Error = Simple<Token>> + Clone + 'a,
{
    token(Token::LBrace)
        .then(stmt.repeated())
        .then(token(Token::RBrace))
        .map(|((lbrace, statements), rbrace)| BlockData {
            lbrace,
            statements,
            rbrace,
        })
}

fn variable_declaration_parser<'a>(
) -> impl Parser<Token, VariableDeclarationData, Error = Simple<Token>> + Clone + 'a {
    type_clause_parser()
        .or(implicit_constant_parser())
        .then(identifier())
        .then(token(Token::Equals).then(expr_parser()).or_not())
        .then(token(Token::Semicolon))
        .map(
            |(((ty, name), initializer), semicolon)| VariableDeclarationData {
                ty,
                name,
                initializer,
                semicolon,
            },
        )
}

/// Parser for statements
pub fn stmt_parser<'a>() -> impl Parser<Token, StmtData, Error = Simple<Token>> + Clone + 'a {
    recursive(|stmt: Recursive<'a, Token, StmtData, Simple<Token>>| {
        let block = block_parser(stmt.clone()).boxed();
        let expr = expr_parser().boxed();

        let condition = token(Token::LParen)
            .then(expr.clone())
            .then(token(Token::RParen));

        let if_stmt = token(Token::If)
            .then(condition.clone())
            .then(stmt.clone())
            .then(token(Token::Else).then(stmt.clone()).or_not())
            .map(|(((if_span, ((lparen, condition), rparen)), then), otherwise)| {
                StmtData::If {
                    if_span,
                    lparen,
                    condition,
                    rparen,
                    then: Box::new(then),
                    otherwise: otherwise.map(|(span, stmt)| (span, Box::new(stmt))),
                }
            });

        let while_stmt = token(Token::While)
            .then(condition.clone())
            .then(stmt.clone())
            .map(|((while_span, ((lparen, condition), rparen)), body)| StmtData::While {
                while_span,
                lparen,
                condition,
                rparen,
                body: Box::new(body),
            });

        let do_while_stmt = token(Token::Do)
            .then(stmt.clone())
            .then(token(Token::While))
            .then(condition)
            .then(token(Token::Semicolon))
            .map(
                |((((do_span, body), while_span), ((lparen, condition), rparen)), semicolon)| {
                    StmtData::DoWhile {
                        do_span,
                        body: Box::new(body),
                        while_span,
                        lparen,
                        condition,
                        rparen,
                        semicolon,
                    }
                },
            );

        let expression_stmt = optional_expr_parser()
            .then(token(Token::Semicolon))
            .map(|(expr, semicolon)| StmtData::Expression(expr, semicolon));

        let variable_declaration =
            variable_declaration_parser().map(StmtData::VariableDeclaration);

        let for_stmt = token(Token::For)
            .then(token(Token::LParen))
            .then(variable_declaration.clone().or(expression_stmt.clone()))
            .then(optional_expr_parser())
            .then(token(Token::Semicolon))
            .then(optional_expr_parser())
            .then(token(Token::RParen))
            .then(stmt.clone())
            .map(
                |(
                    ((((((for_span, lparen), initializer), condition), semicolon), step), rparen),
                    body,
                )| StmtData::For {
                    for_span,
                    lparen,
                    initializer: Box::new(initializer),
                    condition,
                    semicolon,
                    step,
                    rparen,
                    body: Box::new(body),
                },
            );

        let try_stmt = token(Token::Try)
            .then(block.clone())
            .then(token(Token::Catch).then(block.clone()).or_not())
            .then(token(Token::Finally).then(block.clone()).or_not())
            .map(|(((try_span, body), catch), finally)| StmtData::Try {
                try_span,
                body,
                catch,
                finally,
            });

        let break_stmt = token(Token::Break)
            .then(token(Token::Semicolon))
            .map(|(keyword, semicolon)| StmtData::Break(keyword, semicolon));

        let continue_stmt = token(Token::Continue)
            .then(token(Token::Semicolon))
            .map(|(keyword, semicolon)| StmtData::Continue(keyword, semicolon));

        let return_stmt = token(Token::Return)
            .then(expr.or_not())
            .then(token(Token::Semicolon))
            .map(|((return_span, value), semicolon)| StmtData::Return {
                return_span,
                value,
                semicolon,
            });

        let local_function = function_parser(block.clone()).map(StmtData::LocalFunction);

        block
            .map(StmtData::Block)
            .or(if_stmt)
            .or(while_stmt)
            .or(do_while_stmt)
            .or(for_stmt)
            .or(try_stmt)
            .or(break_stmt)
            .or(continue_stmt)
            .or(return_stmt)
            .or(local_function)
            .or(variable_declaration)
            .or(expression_stmt)
    })
}

fn emit_variable_declaration(sink: &mut EventSink, data: &VariableDeclarationData) {
    sink.start_node(SyntaxKind::VariableDeclaration);
    emit_type_clause(sink, &data.ty);
    sink.add_token(SyntaxKind::Identifier, data.name.clone());
    if let Some((equals, value)) = &data.initializer {
        sink.add_token(SyntaxKind::Equals, equals.clone());
        emit_expr(sink, value);
    }
    sink.add_token(SyntaxKind::Semicolon, data.semicolon.clone());
    sink.finish_node();
}

/// Emit events for a statement
pub fn emit_stmt(sink: &mut EventSink, data: &StmtData) {
    match data {
        StmtData::Block(block) => emit_block(sink, block),
        StmtData::VariableDeclaration(declaration) => emit_variable_declaration(sink, declaration),
        StmtData::LocalFunction(function) => {
            emit_function(sink, SyntaxKind::LocalFunctionStatement, function)
        }
        StmtData::If {
            if_span,
            lparen,
            condition,
            rparen,
            then,
            otherwise,
        } => {
            sink.start_node(SyntaxKind::IfStatement);
            sink.add_token(SyntaxKind::If, if_span.clone());
            sink.add_token(SyntaxKind::LParen, lparen.clone());
            emit_expr(sink, condition);
            sink.add_token(SyntaxKind::RParen, rparen.clone());
            emit_stmt(sink, then);
            if let Some((else_span, body)) = otherwise {
                sink.start_node(SyntaxKind::ElseClause);
                sink.add_token(SyntaxKind::Else, else_span.clone());
                emit_stmt(sink, body);
                sink.finish_node();
            }
            sink.finish_node();
        }
        StmtData::While {
            while_span,
            lparen,
            condition,
            rparen,
            body,
        } => {
            sink.start_node(SyntaxKind::WhileStatement);
            sink.add_token(SyntaxKind::While, while_span.clone());
            sink.add_token(SyntaxKind::LParen, lparen.clone());
            emit_expr(sink, condition);
            sink.add_token(SyntaxKind::RParen, rparen.clone());
            emit_stmt(sink, body);
            sink.finish_node();
        }
        StmtData::DoWhile {
            do_span,
            body,
            while_span,
            lparen,
            condition,
            rparen,
            semicolon,
        } => {
            sink.start_node(SyntaxKind::DoWhileStatement);
            sink.add_token(SyntaxKind::Do, do_span.clone());
            emit_stmt(sink, body);
            sink.add_token(SyntaxKind::While, while_span.clone());
            sink.add_token(SyntaxKind::LParen, lparen.clone());
            emit_expr(sink, condition);
            sink.add_token(SyntaxKind::RParen, rparen.clone());
            sink.add_token(SyntaxKind::Semicolon, semicolon.clone());
            sink.finish_node();
        }
        StmtData::For {
            for_span,
            lparen,
            initializer,
            condition,
            semicolon,
            step,
            rparen,
            body,
        } => {
            sink.start_node(SyntaxKind::ForStatement);
            sink.add_token(SyntaxKind::For, for_span.clone());
            sink.add_token(SyntaxKind::LParen, lparen.clone());
            emit_stmt(sink, initializer);
            emit_expr(sink, condition);
            sink.add_token(SyntaxKind::Semicolon, semicolon.clone());
            emit_expr(sink, step);
            sink.add_token(SyntaxKind::RParen, rparen.clone());
            emit_stmt(sink, body);
            sink.finish_node();
        }
        StmtData::Try {
            try_span,
            body,
            catch,
            finally,
        } => {
            sink.start_node(SyntaxKind::TryStatement);
            sink.add_token(SyntaxKind::Try, try_span.clone());
            emit_block(sink, body);
            if let Some((catch_span, block)) = catch {
                sink.start_node(SyntaxKind::CatchClause);
                sink.add_token(SyntaxKind::Catch, catch_span.clone());
                emit_block(sink, block);
                sink.finish_node();
            }
            if let Some((finally_span, block)) = finally {
                sink.start_node(SyntaxKind::FinallyClause);
                sink.add_token(SyntaxKind::Finally, finally_span.clone());
                emit_block(sink, block);
                sink.finish_node();
            }
            sink.finish_node();
        }
        StmtData::Break(keyword, semicolon) => {
            sink.start_node(SyntaxKind::BreakStatement);
            sink.add_token(SyntaxKind::Break, keyword.clone());
            sink.add_token(SyntaxKind::Semicolon, semicolon.clone());
            sink.finish_node();
        }
        StmtData::Continue(keyword, semicolon) => {
            sink.start_node(SyntaxKind::ContinueStatement);
            sink.add_token(SyntaxKind::Continue, keyword.clone());
            sink.add_token(SyntaxKind::Semicolon, semicolon.clone());
            sink.finish_node();
        }
        StmtData::Return {
            return_span,
            value,
            semicolon,
        } => {
            sink.start_node(SyntaxKind::ReturnStatement);
            sink.add_token(SyntaxKind::Return, return_span.clone());
            if let Some(value) = value {
                emit_expr(sink, value);
            }
            sink.add_token(SyntaxKind::Semicolon, semicolon.clone());
            sink.finish_node();
        }
        StmtData::Expression(expr, semicolon) => {
            sink.start_node(SyntaxKind::ExpressionStatement);
            emit_expr(sink, expr);
            sink.add_token(SyntaxKind::Semicolon, semicolon.clone());
            sink.finish_node();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TreeBuilder;
    use plover_lexer::lex;
    use plover_syntax_tree::ast::{AstNode, Expr, Stmt};
    use plover_syntax_tree::SyntaxNode;

    fn parse(source: &str) -> SyntaxNode {
        let tokens: Vec<_> = lex(source)
            .filter_map(|t| t.ok())
            .map(|spanned| (spanned.value, spanned.span))
            .collect();
        let eoi = source.len();
        let data = stmt_parser()
            .then_ignore(crate::common::skip_trivia())
            .then_ignore(end())
            .parse(chumsky::Stream::from_iter(eoi..eoi, tokens.into_iter()))
            .unwrap();

        let mut sink = EventSink::new();
        emit_stmt(&mut sink, &data);
        TreeBuilder::new(source, sink.into_events()).build()
    }

    #[test]
    fn test_variable_declaration() {
        let Some(Stmt::VariableDeclaration(declaration)) = Stmt::cast(parse("int x = 5;")) else {
            panic!("expected variable declaration");
        };
        assert_eq!(declaration.identifier().unwrap().text(), "x");
        assert!(declaration.initializer().is_some());
    }

    #[test]
    fn test_assignment_is_not_a_declaration() {
        assert!(matches!(
            Stmt::cast(parse("x = 5;")),
            Some(Stmt::Expression(_))
        ));
    }

    #[test]
    fn test_implicit_constant() {
        let Some(Stmt::VariableDeclaration(declaration)) = Stmt::cast(parse("const x = 5;")) else {
            panic!("expected variable declaration");
        };
        let clause = declaration.type_clause().unwrap();
        assert!(clause.modifiers().is_constant);
        assert!(clause.type_name().is_none());
    }

    #[test]
    fn test_if_else() {
        let Some(Stmt::If(stmt)) = Stmt::cast(parse("if (a) return 1; else return 2;")) else {
            panic!("expected if");
        };
        assert!(matches!(stmt.then_branch(), Some(Stmt::Return(_))));
        assert!(matches!(
            stmt.else_clause().and_then(|clause| clause.body()),
            Some(Stmt::Return(_))
        ));
    }

    #[test]
    fn test_for_with_omitted_parts() {
        let Some(Stmt::For(stmt)) = Stmt::cast(parse("for (;;) { break; }")) else {
            panic!("expected for");
        };
        assert!(matches!(stmt.condition(), Some(Expr::Empty(_))));
        assert!(matches!(stmt.step(), Some(Expr::Empty(_))));
        assert!(matches!(stmt.body(), Some(Stmt::Block(_))));
    }

    #[test]
    fn test_local_function() {
        let Some(Stmt::Block(block)) = Stmt::cast(parse("{ int f(int a = 1) { return a; } }"))
        else {
            panic!("expected block");
        };
        let Some(Stmt::LocalFunction(function)) = block.statements().next() else {
            panic!("expected local function");
        };
        let function = function.function();
        assert_eq!(function.identifier().unwrap().text(), "f");
        let parameter = function.parameters().next().unwrap();
        assert!(parameter.default_value().is_some());
    }

    #[test]
    fn test_try_catch_finally() {
        let Some(Stmt::Try(stmt)) = Stmt::cast(parse("try { } catch { } finally { }")) else {
            panic!("expected try");
        };
        assert!(stmt.catch_clause().is_some());
        assert!(stmt.finally_clause().is_some());
    }
}
