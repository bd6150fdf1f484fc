//! Type clause parsing
//!
//! Supports:
//! - Builtin types: `int`, `bool`, `decimal`, `string`, `any`, `type`, `void`
//! - Named (struct) types: `Point`
//! - Inferred types: `var`
//! - Modifiers: `const`, `ref`, `const ref`, `ref const`
//! - Attributes: `[NotNull] int`
//! - Array ranks: `int[][]`

use chumsky::prelude::*;
use plover_lexer::Token;
use plover_span::Span;

use crate::common::{any_of, identifier, token, TypeClauseData};

const BUILTIN_TYPES: &[Token] = &[
    Token::Void,
    Token::Any,
    Token::Bool,
    Token::Int,
    Token::Decimal,
    Token::String,
    Token::Type,
];

const TYPE_NAMES: &[Token] = &[
    Token::Identifier,
    Token::Var,
    Token::Void,
    Token::Any,
    Token::Bool,
    Token::Int,
    Token::Decimal,
    Token::String,
    Token::Type,
];

fn attributes_parser() -> impl Parser<Token, Vec<(Span, Span, Span)>, Error = Simple<Token>> + Clone
{
    token(Token::LBracket)
        .then(identifier())
        .then(token(Token::RBracket))
        .map(|((lbracket, name), rbracket)| (lbracket, name, rbracket))
        .repeated()
}

fn modifiers_parser() -> impl Parser<Token, Vec<(Token, Span)>, Error = Simple<Token>> + Clone {
    token(Token::Const)
        .or_not()
        .then(token(Token::Ref).or_not())
        .then(token(Token::Const).or_not())
        .map(|((const_ref, is_ref), is_const)| {
            let mut modifiers = Vec::new();
            if let Some(span) = const_ref {
                modifiers.push((Token::Const, span));
            }
            if let Some(span) = is_ref {
                modifiers.push((Token::Ref, span));
            }
            if let Some(span) = is_const {
                modifiers.push((Token::Const, span));
            }
            modifiers
        })
}

fn brackets_parser() -> impl Parser<Token, Vec<(Span, Span)>, Error = Simple<Token>> + Clone {
    token(Token::LBracket).then(token(Token::RBracket)).repeated()
}

/// Parser for a full type clause with a type name
pub fn type_clause_parser() -> impl Parser<Token, TypeClauseData, Error = Simple<Token>> + Clone {
    attributes_parser()
        .then(modifiers_parser())
        .then(any_of(TYPE_NAMES))
        .then(brackets_parser())
        .map(|(((attributes, modifiers), name), brackets)| TypeClauseData {
            attributes,
            modifiers,
            name: Some(name),
            brackets,
        })
}

/// Parser for `const` written without a type: `const x = 3;`
pub fn implicit_constant_parser(
) -> impl Parser<Token, TypeClauseData, Error = Simple<Token>> + Clone {
    attributes_parser()
        .then(token(Token::Const))
        .map(|(attributes, const_span)| TypeClauseData {
            attributes,
            modifiers: vec![(Token::Const, const_span)],
            name: None,
            brackets: Vec::new(),
        })
}

/// Parser for the type inside a cast: only builtin types are castable
pub fn cast_type_parser() -> impl Parser<Token, TypeClauseData, Error = Simple<Token>> + Clone {
    attributes_parser()
        .then(any_of(BUILTIN_TYPES))
        .then(brackets_parser())
        .map(|((attributes, name), brackets)| TypeClauseData {
            attributes,
            modifiers: Vec::new(),
            name: Some(name),
            brackets,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use plover_lexer::lex;

    fn parse_with<P>(parser: P, source: &str) -> Result<TypeClauseData, Vec<Simple<Token>>>
    where
        P: Parser<Token, TypeClauseData, Error = Simple<Token>>,
    {
        let tokens: Vec<_> = lex(source)
            .filter_map(|t| t.ok())
            .map(|spanned| (spanned.value, spanned.span))
            .collect();
        let eoi = source.len();
        parser
            .then_ignore(crate::common::skip_trivia())
            .then_ignore(end())
            .parse(chumsky::Stream::from_iter(eoi..eoi, tokens.into_iter()))
    }

    #[test]
    fn test_builtin_type() {
        let data = parse_with(type_clause_parser(), "int").unwrap();
        assert_eq!(data.name, Some((Token::Int, 0..3)));
        assert!(data.modifiers.is_empty());
    }

    #[test]
    fn test_full_clause() {
        let data = parse_with(type_clause_parser(), "[NotNull] const ref Point[][]").unwrap();
        assert_eq!(data.attributes.len(), 1);
        assert_eq!(
            data.modifiers.iter().map(|(t, _)| *t).collect::<Vec<_>>(),
            vec![Token::Const, Token::Ref]
        );
        assert_eq!(data.name.map(|(t, _)| t), Some(Token::Identifier));
        assert_eq!(data.brackets.len(), 2);
    }

    #[test]
    fn test_cast_type_rejects_names() {
        assert!(parse_with(cast_type_parser(), "Point").is_err());
        assert!(parse_with(cast_type_parser(), "decimal").is_ok());
    }
}
