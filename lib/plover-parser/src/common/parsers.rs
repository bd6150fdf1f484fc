//! Common parser combinators shared across multiple parsers

use chumsky::prelude::*;
use plover_lexer::Token;
use plover_span::Span;
use plover_syntax_tree::SyntaxKind;

/// Check if a token is trivia (whitespace or comment)
pub fn is_trivia(token: &Token) -> bool {
    token.is_trivia()
}

/// Parser that skips trivia tokens
pub fn skip_trivia() -> impl Parser<Token, (), Error = Simple<Token>> + Clone {
    filter(|token: &Token| is_trivia(token)).repeated().ignored()
}

/// Wrap a parser to skip leading trivia
pub fn trivia<P, O>(parser: P) -> impl Parser<Token, O, Error = Simple<Token>> + Clone
where
    P: Parser<Token, O, Error = Simple<Token>> + Clone,
{
    skip_trivia().ignore_then(parser)
}

/// Match a specific token, skipping leading trivia
pub fn token(t: Token) -> impl Parser<Token, Span, Error = Simple<Token>> + Clone {
    trivia(just(t).map_with_span(|_, span| span))
}

/// Parse an identifier, skipping leading trivia
pub fn identifier() -> impl Parser<Token, Span, Error = Simple<Token>> + Clone {
    trivia(filter_map(|span, token| match token {
        Token::Identifier => Ok(span),
        _ => Err(Simple::expected_input_found(
            span,
            vec![Some(Token::Identifier)],
            Some(token),
        )),
    }))
}

/// Match any one of `set`, returning which token matched
pub fn any_of(
    set: &'static [Token],
) -> impl Parser<Token, (Token, Span), Error = Simple<Token>> + Clone {
    trivia(filter_map(move |span, token| {
        if set.contains(&token) {
            Ok((token, span))
        } else {
            Err(Simple::expected_input_found(
                span,
                set.iter().copied().map(Some),
                Some(token),
            ))
        }
    }))
}

/// Human readable name of a token for error messages
pub fn describe_token(token: &Token) -> String {
    match token {
        Token::Identifier => "identifier".to_string(),
        Token::IntegerLiteral => "integer literal".to_string(),
        Token::DecimalLiteral => "decimal literal".to_string(),
        Token::StringLiteral => "string literal".to_string(),
        other => {
            let text = SyntaxKind::from(*other).text();
            if text.is_empty() {
                format!("'{}'", format!("{:?}", other).to_lowercase())
            } else {
                format!("'{}'", text)
            }
        }
    }
}

/// Render a chumsky error as a diagnostic message
pub fn format_parse_error(error: &Simple<Token>) -> String {
    let found = match error.found() {
        Some(token) => describe_token(token),
        None => "end of input".to_string(),
    };

    let mut expected: Vec<String> = error
        .expected()
        .filter_map(|token| token.as_ref().map(describe_token))
        .collect();
    expected.sort();
    expected.dedup();

    match expected.len() {
        0 => format!("unexpected {}", found),
        1 => format!("expected {}, found {}", expected[0], found),
        _ => format!("expected one of {}, found {}", expected.join(", "), found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plover_lexer::lex;

    fn stream(source: &str) -> Vec<(Token, Span)> {
        lex(source)
            .filter_map(|t| t.ok())
            .map(|spanned| (spanned.value, spanned.span))
            .collect()
    }

    #[test]
    fn test_token_skips_trivia() {
        let source = "  /* x */ ;";
        let end = source.len();
        let span = token(Token::Semicolon)
            .parse(chumsky::Stream::from_iter(end..end, stream(source).into_iter()))
            .unwrap();
        assert_eq!(span, 10..11);
    }

    #[test]
    fn test_any_of() {
        let source = "*";
        let end = source.len();
        let (matched, _) = any_of(&[Token::Plus, Token::Star])
            .parse(chumsky::Stream::from_iter(end..end, stream(source).into_iter()))
            .unwrap();
        assert_eq!(matched, Token::Star);
    }

    #[test]
    fn test_error_message() {
        let source = "1";
        let end = source.len();
        let errors = identifier()
            .parse(chumsky::Stream::from_iter(end..end, stream(source).into_iter()))
            .unwrap_err();
        assert_eq!(
            format_parse_error(&errors[0]),
            "expected identifier, found integer literal"
        );
    }
}
