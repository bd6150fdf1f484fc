//! Expression parsing
//!
//! Precedence, loosest first:
//!
//! | level | operators | assoc |
//! | --- | --- | --- |
//! | assignment | `= += -= *= /= %= **= &= \|= ^= <<= >>= >>>= ??=` | right |
//! | ternary | `? :` | right |
//! | coalesce | `??` | left |
//! | logical | `\|\|`, then `&&` | left |
//! | bitwise | `\|`, then `^`, then `&` | left |
//! | equality | `== !=` | left |
//! | relational | `< > <= >= is isnt` | left |
//! | shift | `<< >> >>>` | left |
//! | additive | `+ -` | left |
//! | multiplicative | `* / %` | left |
//! | power | `**` | left |
//! | unary | `+ - ! ~ ++ --`, casts | prefix |
//! | postfix | `[i] .m ?.m ++ --` | postfix |

use chumsky::prelude::*;
use chumsky::BoxedParser;
use plover_lexer::Token;
use plover_span::Span;
use plover_syntax_tree::SyntaxKind;

use crate::common::{
    any_of, emit_type_clause, identifier, token, trivia, TypeClauseData,
};
use crate::event::EventSink;
use crate::ty::{cast_type_parser, type_clause_parser};

type ExprParser<'a> = BoxedParser<'a, Token, ExprData, Simple<Token>>;

/// Raw parsed data for an argument: `value` or `name: value`
#[derive(Debug, Clone)]
pub struct ArgumentData {
    pub name: Option<(Span, Span)>,
    pub value: ExprData,
}

/// Raw parsed expression tree
#[derive(Debug, Clone)]
pub enum ExprData {
    Literal(Token, Span),
    Name(Span),
    Assignment {
        target: Box<ExprData>,
        op: (Token, Span),
        value: Box<ExprData>,
    },
    Unary {
        op: (Token, Span),
        operand: Box<ExprData>,
    },
    Binary {
        left: Box<ExprData>,
        op: (Token, Span),
        right: Box<ExprData>,
    },
    Ternary {
        left: Box<ExprData>,
        question: Span,
        center: Box<ExprData>,
        colon: Span,
        right: Box<ExprData>,
    },
    Parenthesized {
        lparen: Span,
        expr: Box<ExprData>,
        rparen: Span,
    },
    Call {
        name: Span,
        lparen: Span,
        arguments: Vec<ArgumentData>,
        rparen: Span,
    },
    Index {
        operand: Box<ExprData>,
        lbracket: Span,
        index: Box<ExprData>,
        rbracket: Span,
    },
    MemberAccess {
        operand: Box<ExprData>,
        op: (Token, Span),
        name: Span,
    },
    Prefix {
        op: (Token, Span),
        operand: Box<ExprData>,
    },
    Postfix {
        operand: Box<ExprData>,
        op: (Token, Span),
    },
    Cast {
        lparen: Span,
        ty: TypeClauseData,
        rparen: Span,
        expr: Box<ExprData>,
    },
    Reference {
        ref_span: Span,
        name: Span,
    },
    Typeof {
        typeof_span: Span,
        lparen: Span,
        ty: TypeClauseData,
        rparen: Span,
    },
    InitializerList {
        lbrace: Span,
        items: Vec<ExprData>,
        rbrace: Span,
    },
    /// An omitted expression, e.g. the condition of `for (;;)`
    Empty,
}

/// Suffixes applied by the postfix level
#[derive(Debug, Clone)]
enum Suffix {
    Index(Span, ExprData, Span),
    Member((Token, Span), Span),
    Step(Token, Span),
}

const LITERALS: &[Token] = &[
    Token::IntegerLiteral,
    Token::DecimalLiteral,
    Token::StringLiteral,
    Token::True,
    Token::False,
    Token::Null,
];

const ASSIGNMENT_OPERATORS: &[Token] = &[
    Token::Equals,
    Token::PlusEquals,
    Token::MinusEquals,
    Token::StarEquals,
    Token::SlashEquals,
    Token::PercentEquals,
    Token::StarStarEquals,
    Token::AmpersandEquals,
    Token::PipeEquals,
    Token::CaretEquals,
    Token::LessLessEquals,
    Token::GreaterGreaterEquals,
    Token::GreaterGreaterGreaterEquals,
    Token::QuestionQuestionEquals,
];

const BINARY_LEVELS: &[&[Token]] = &[
    &[Token::QuestionQuestion],
    &[Token::PipePipe],
    &[Token::AmpersandAmpersand],
    &[Token::Pipe],
    &[Token::Caret],
    &[Token::Ampersand],
    &[Token::EqualsEquals, Token::BangEquals],
    &[
        Token::Less,
        Token::Greater,
        Token::LessEquals,
        Token::GreaterEquals,
        Token::Is,
        Token::Isnt,
    ],
    &[
        Token::LessLess,
        Token::GreaterGreater,
        Token::GreaterGreaterGreater,
    ],
    &[Token::Plus, Token::Minus],
    &[Token::Star, Token::Slash, Token::Percent],
    &[Token::StarStar],
];

const UNARY_OPERATORS: &[Token] = &[Token::Plus, Token::Minus, Token::Bang, Token::Tilde];

const STEP_OPERATORS: &[Token] = &[Token::PlusPlus, Token::MinusMinus];

/// One left-associative binary level over `next`
fn binary_level<'a>(next: ExprParser<'a>, ops: &'static [Token]) -> ExprParser<'a> {
    next.clone()
        .then(any_of(ops).then(next).repeated())
        .foldl(|left, (op, right)| ExprData::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
        .boxed()
}

fn primary_parser<'a>(expr: Recursive<'a, Token, ExprData, Simple<Token>>) -> ExprParser<'a> {
    let literal = any_of(LITERALS).map(|(token, span)| ExprData::Literal(token, span));

    let argument = identifier()
        .then(token(Token::Colon))
        .or_not()
        .then(expr.clone())
        .map(|(name, value)| ArgumentData { name, value });

    let call = identifier()
        .then(token(Token::LParen))
        .then(argument.separated_by(token(Token::Comma)))
        .then(token(Token::RParen))
        .map(|(((name, lparen), arguments), rparen)| ExprData::Call {
            name,
            lparen,
            arguments,
            rparen,
        });

    let name = identifier().map(ExprData::Name);

    let parenthesized = token(Token::LParen)
        .then(expr.clone())
        .then(token(Token::RParen))
        .map(|((lparen, expr), rparen)| ExprData::Parenthesized {
            lparen,
            expr: Box::new(expr),
            rparen,
        });

    let reference = token(Token::Ref)
        .then(identifier())
        .map(|(ref_span, name)| ExprData::Reference { ref_span, name });

    let type_of = token(Token::Typeof)
        .then(token(Token::LParen))
        .then(type_clause_parser())
        .then(token(Token::RParen))
        .map(|(((typeof_span, lparen), ty), rparen)| ExprData::Typeof {
            typeof_span,
            lparen,
            ty,
            rparen,
        });

    let initializer_list = token(Token::LBrace)
        .then(expr.separated_by(token(Token::Comma)))
        .then(token(Token::RBrace))
        .map(|((lbrace, items), rbrace)| ExprData::InitializerList {
            lbrace,
            items,
            rbrace,
        });

    literal
        .or(call)
        .or(name)
        .or(parenthesized)
        .or(reference)
        .or(type_of)
        .or(initializer_list)
        .boxed()
}

fn postfix_parser<'a>(
    primary: ExprParser<'a>,
    expr: Recursive<'a, Token, ExprData, Simple<Token>>,
) -> ExprParser<'a> {
    let index = token(Token::LBracket)
        .then(expr)
        .then(token(Token::RBracket))
        .map(|((lbracket, index), rbracket)| Suffix::Index(lbracket, index, rbracket));

    let member = any_of(&[Token::Dot, Token::QuestionDot])
        .then(identifier())
        .map(|(op, name)| Suffix::Member(op, name));

    let step = any_of(STEP_OPERATORS).map(|(op, span)| Suffix::Step(op, span));

    primary
        .then(index.or(member).or(step).repeated())
        .foldl(|operand, suffix| {
            let operand = Box::new(operand);
            match suffix {
                Suffix::Index(lbracket, index, rbracket) => ExprData::Index {
                    operand,
                    lbracket,
                    index: Box::new(index),
                    rbracket,
                },
                Suffix::Member(op, name) => ExprData::MemberAccess { operand, op, name },
                Suffix::Step(op, span) => ExprData::Postfix {
                    operand,
                    op: (op, span),
                },
            }
        })
        .boxed()
}

fn unary_parser<'a>(postfix: ExprParser<'a>) -> ExprParser<'a> {
    recursive(|unary: Recursive<'a, Token, ExprData, Simple<Token>>| {
        let cast = token(Token::LParen)
            .then(cast_type_parser())
            .then(token(Token::RParen))
            .then(unary.clone())
            .map(|(((lparen, ty), rparen), expr)| ExprData::Cast {
                lparen,
                ty,
                rparen,
                expr: Box::new(expr),
            });

        let prefix = any_of(STEP_OPERATORS)
            .then(unary.clone())
            .map(|(op, operand)| ExprData::Prefix {
                op,
                operand: Box::new(operand),
            });

        let unary_op = any_of(UNARY_OPERATORS)
            .then(unary)
            .map(|(op, operand)| ExprData::Unary {
                op,
                operand: Box::new(operand),
            });

        cast.or(prefix).or(unary_op).or(postfix)
    })
    .boxed()
}

/// Parser for expressions
pub fn expr_parser<'a>() -> impl Parser<Token, ExprData, Error = Simple<Token>> + Clone + 'a {
    recursive(|expr: Recursive<'a, Token, ExprData, Simple<Token>>| {
        let primary = primary_parser(expr.clone());
        let postfix = postfix_parser(primary, expr.clone());
        let unary = unary_parser(postfix);

        let coalesce = BINARY_LEVELS
            .iter()
            .rev()
            .fold(unary, |next, ops| binary_level(next, *ops));

        let ternary = coalesce
            .then(
                token(Token::Question)
                    .then(expr.clone())
                    .then(token(Token::Colon))
                    .then(expr.clone())
                    .or_not(),
            )
            .map(|(left, rest)| match rest {
                Some((((question, center), colon), right)) => ExprData::Ternary {
                    left: Box::new(left),
                    question,
                    center: Box::new(center),
                    colon,
                    right: Box::new(right),
                },
                None => left,
            });

        ternary
            .then(any_of(ASSIGNMENT_OPERATORS).then(expr).or_not())
            .map(|(target, rest)| match rest {
                Some((op, value)) => ExprData::Assignment {
                    target: Box::new(target),
                    op,
                    value: Box::new(value),
                },
                None => target,
            })
    })
}

/// Parser for an optional expression, yielding [`ExprData::Empty`] when absent
pub fn optional_expr_parser<'a>(
) -> impl Parser<Token, ExprData, Error = Simple<Token>> + Clone + 'a {
    expr_parser().or(trivia(empty()).to(ExprData::Empty))
}

fn simple_node(sink: &mut EventSink, kind: SyntaxKind, token: SyntaxKind, span: &Span) {
    sink.start_node(kind);
    sink.add_token(token, span.clone());
    sink.finish_node();
}

/// Emit events for an expression
pub fn emit_expr(sink: &mut EventSink, data: &ExprData) {
    match data {
        ExprData::Literal(token, span) => {
            simple_node(sink, SyntaxKind::LiteralExpression, (*token).into(), span);
        }
        ExprData::Name(span) => {
            simple_node(sink, SyntaxKind::NameExpression, SyntaxKind::Identifier, span);
        }
        ExprData::Assignment { target, op, value } => {
            sink.start_node(SyntaxKind::AssignmentExpression);
            emit_expr(sink, target);
            sink.add_token(op.0.into(), op.1.clone());
            emit_expr(sink, value);
            sink.finish_node();
        }
        ExprData::Unary { op, operand } => {
            sink.start_node(SyntaxKind::UnaryExpression);
            sink.add_token(op.0.into(), op.1.clone());
            emit_expr(sink, operand);
            sink.finish_node();
        }
        ExprData::Binary { left, op, right } => {
            sink.start_node(SyntaxKind::BinaryExpression);
            emit_expr(sink, left);
            sink.add_token(op.0.into(), op.1.clone());
            emit_expr(sink, right);
            sink.finish_node();
        }
        ExprData::Ternary {
            left,
            question,
            center,
            colon,
            right,
        } => {
            sink.start_node(SyntaxKind::TernaryExpression);
            emit_expr(sink, left);
            sink.add_token(SyntaxKind::Question, question.clone());
            emit_expr(sink, center);
            sink.add_token(SyntaxKind::Colon, colon.clone());
            emit_expr(sink, right);
            sink.finish_node();
        }
        ExprData::Parenthesized {
            lparen,
            expr,
            rparen,
        } => {
            sink.start_node(SyntaxKind::ParenthesizedExpression);
            sink.add_token(SyntaxKind::LParen, lparen.clone());
            emit_expr(sink, expr);
            sink.add_token(SyntaxKind::RParen, rparen.clone());
            sink.finish_node();
        }
        ExprData::Call {
            name,
            lparen,
            arguments,
            rparen,
        } => {
            sink.start_node(SyntaxKind::CallExpression);
            sink.add_token(SyntaxKind::Identifier, name.clone());
            sink.start_node(SyntaxKind::ArgumentList);
            sink.add_token(SyntaxKind::LParen, lparen.clone());
            for argument in arguments {
                sink.start_node(SyntaxKind::Argument);
                if let Some((name, colon)) = &argument.name {
                    sink.add_token(SyntaxKind::Identifier, name.clone());
                    sink.add_token(SyntaxKind::Colon, colon.clone());
                }
                emit_expr(sink, &argument.value);
                sink.finish_node();
            }
            sink.add_token(SyntaxKind::RParen, rparen.clone());
            sink.finish_node();
            sink.finish_node();
        }
        ExprData::Index {
            operand,
            lbracket,
            index,
            rbracket,
        } => {
            sink.start_node(SyntaxKind::IndexExpression);
            emit_expr(sink, operand);
            sink.add_token(SyntaxKind::LBracket, lbracket.clone());
            emit_expr(sink, index);
            sink.add_token(SyntaxKind::RBracket, rbracket.clone());
            sink.finish_node();
        }
        ExprData::MemberAccess { operand, op, name } => {
            sink.start_node(SyntaxKind::MemberAccessExpression);
            emit_expr(sink, operand);
            sink.add_token(op.0.into(), op.1.clone());
            sink.add_token(SyntaxKind::Identifier, name.clone());
            sink.finish_node();
        }
        ExprData::Prefix { op, operand } => {
            sink.start_node(SyntaxKind::PrefixExpression);
            sink.add_token(op.0.into(), op.1.clone());
            emit_expr(sink, operand);
            sink.finish_node();
        }
        ExprData::Postfix { operand, op } => {
            sink.start_node(SyntaxKind::PostfixExpression);
            emit_expr(sink, operand);
            sink.add_token(op.0.into(), op.1.clone());
            sink.finish_node();
        }
        ExprData::Cast {
            lparen,
            ty,
            rparen,
            expr,
        } => {
            sink.start_node(SyntaxKind::CastExpression);
            sink.add_token(SyntaxKind::LParen, lparen.clone());
            emit_type_clause(sink, ty);
            sink.add_token(SyntaxKind::RParen, rparen.clone());
            emit_expr(sink, expr);
            sink.finish_node();
        }
        ExprData::Reference { ref_span, name } => {
            sink.start_node(SyntaxKind::ReferenceExpression);
            sink.add_token(SyntaxKind::Ref, ref_span.clone());
            sink.add_token(SyntaxKind::Identifier, name.clone());
            sink.finish_node();
        }
        ExprData::Typeof {
            typeof_span,
            lparen,
            ty,
            rparen,
        } => {
            sink.start_node(SyntaxKind::TypeofExpression);
            sink.add_token(SyntaxKind::Typeof, typeof_span.clone());
            sink.add_token(SyntaxKind::LParen, lparen.clone());
            emit_type_clause(sink, ty);
            sink.add_token(SyntaxKind::RParen, rparen.clone());
            sink.finish_node();
        }
        ExprData::InitializerList {
            lbrace,
            items,
            rbrace,
        } => {
            sink.start_node(SyntaxKind::InitializerListExpression);
            sink.add_token(SyntaxKind::LBrace, lbrace.clone());
            for item in items {
                emit_expr(sink, item);
            }
            sink.add_token(SyntaxKind::RBrace, rbrace.clone());
            sink.finish_node();
        }
        ExprData::Empty => {
            sink.start_node(SyntaxKind::EmptyExpression);
            sink.finish_node();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TreeBuilder;
    use plover_lexer::lex;
    use plover_syntax_tree::ast::{AstNode, Expr};
    use plover_syntax_tree::SyntaxNode;

    fn parse(source: &str) -> SyntaxNode {
        let tokens: Vec<_> = lex(source)
            .filter_map(|t| t.ok())
            .map(|spanned| (spanned.value, spanned.span))
            .collect();
        let eoi = source.len();
        let data = expr_parser()
            .then_ignore(crate::common::skip_trivia())
            .then_ignore(end())
            .parse(chumsky::Stream::from_iter(eoi..eoi, tokens.into_iter()))
            .unwrap();

        let mut sink = EventSink::new();
        emit_expr(&mut sink, &data);
        TreeBuilder::new(source, sink.into_events()).build()
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let tree = parse("1 + 2 * 3");
        let Some(Expr::Binary(binary)) = Expr::cast(tree) else {
            panic!("expected binary expression");
        };
        assert_eq!(binary.operator().unwrap().kind(), SyntaxKind::Plus);
        assert!(matches!(binary.right(), Some(Expr::Binary(_))));
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let tree = parse("a = b += 1");
        let Some(Expr::Assignment(assignment)) = Expr::cast(tree) else {
            panic!("expected assignment");
        };
        assert!(matches!(assignment.target(), Some(Expr::Name(_))));
        assert!(matches!(assignment.value(), Some(Expr::Assignment(_))));
    }

    #[test]
    fn test_call_with_named_argument() {
        let tree = parse("f(1, b: x)");
        let Some(Expr::Call(call)) = Expr::cast(tree.clone()) else {
            panic!("expected call");
        };
        let arguments: Vec<_> = call.arguments().collect();
        assert_eq!(arguments.len(), 2);
        assert!(arguments[0].name().is_none());
        assert_eq!(arguments[1].name().unwrap().text(), "b");
        assert_eq!(tree.text().to_string(), "f(1, b: x)");
    }

    #[test]
    fn test_cast_and_parenthesized() {
        assert!(matches!(Expr::cast(parse("(int)x")), Some(Expr::Cast(_))));
        assert!(matches!(
            Expr::cast(parse("(x)")),
            Some(Expr::Parenthesized(_))
        ));
    }

    #[test]
    fn test_postfix_chain() {
        let tree = parse("a.b[0]++");
        let Some(Expr::Postfix(postfix)) = Expr::cast(tree) else {
            panic!("expected postfix");
        };
        let Some(Expr::Index(index)) = postfix.operand() else {
            panic!("expected index");
        };
        assert!(matches!(index.operand(), Some(Expr::MemberAccess(_))));
    }

    #[test]
    fn test_ternary_and_is() {
        let tree = parse("x is null ? 1 : 2");
        let Some(Expr::Ternary(ternary)) = Expr::cast(tree) else {
            panic!("expected ternary");
        };
        let Some(Expr::Binary(condition)) = ternary.left() else {
            panic!("expected binary condition");
        };
        assert_eq!(condition.operator().unwrap().kind(), SyntaxKind::Is);
    }
}
