use logos::Logos;
use unicode_xid::UnicodeXID;
pub use plover_span::{Span, Spanned};

/// Check if a string is a valid Unicode identifier
fn is_valid_identifier(lex: &mut logos::Lexer<Token>) -> bool {
    let mut chars = lex.slice().chars();

    match chars.next() {
        Some(first) if first.is_xid_start() || first == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_xid_continue())
}

/// Consume a block comment. Block comments do not nest; an unclosed comment
/// runs to the end of input.
fn parse_block_comment(lex: &mut logos::Lexer<Token>) -> bool {
    let remainder = lex.remainder();
    match remainder.find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(remainder.len()),
    }
    true
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // ===== Trivia =====
    // Whitespace and comments are emitted as tokens so rowan can calculate
    // correct source positions. The parser treats these as trivia.
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*", parse_block_comment)]
    BlockComment,

    // ===== Literals =====
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*", is_valid_identifier)]
    Identifier,

    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLiteral,

    #[regex(r"[0-9]+")]
    IntegerLiteral,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    DecimalLiteral,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("null")]
    Null,

    // ===== Declaration Keywords =====
    #[token("struct")]
    Struct,

    #[token("var")]
    Var,

    #[token("const")]
    Const,

    #[token("ref")]
    Ref,

    // ===== Builtin Type Keywords =====
    #[token("void")]
    Void,

    #[token("any")]
    Any,

    #[token("bool")]
    Bool,

    #[token("int")]
    Int,

    #[token("decimal")]
    Decimal,

    #[token("string")]
    String,

    #[token("type")]
    Type,

    // ===== Statement Keywords =====
    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[token("while")]
    While,

    #[token("do")]
    Do,

    #[token("for")]
    For,

    #[token("try")]
    Try,

    #[token("catch")]
    Catch,

    #[token("finally")]
    Finally,

    #[token("break")]
    Break,

    #[token("continue")]
    Continue,

    #[token("return")]
    Return,

    // ===== Expression Keywords =====
    #[token("typeof")]
    Typeof,

    #[token("is")]
    Is,

    #[token("isnt")]
    Isnt,

    // ===== Braces =====
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    // ===== Punctuation =====
    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("?.")]
    QuestionDot,

    #[token(":")]
    Colon,

    #[token("?")]
    Question,

    // ===== Operators =====
    #[token("=")]
    Equals,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("**")]
    StarStar,

    #[token("&")]
    Ampersand,

    #[token("|")]
    Pipe,

    #[token("^")]
    Caret,

    #[token("~")]
    Tilde,

    #[token("!")]
    Bang,

    #[token("&&")]
    AmpersandAmpersand,

    #[token("||")]
    PipePipe,

    #[token("??")]
    QuestionQuestion,

    #[token("==")]
    EqualsEquals,

    #[token("!=")]
    BangEquals,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("<=")]
    LessEquals,

    #[token(">=")]
    GreaterEquals,

    #[token("<<")]
    LessLess,

    #[token(">>")]
    GreaterGreater,

    #[token(">>>")]
    GreaterGreaterGreater,

    #[token("++")]
    PlusPlus,

    #[token("--")]
    MinusMinus,

    // ===== Compound Assignment =====
    #[token("+=")]
    PlusEquals,

    #[token("-=")]
    MinusEquals,

    #[token("*=")]
    StarEquals,

    #[token("/=")]
    SlashEquals,

    #[token("%=")]
    PercentEquals,

    #[token("**=")]
    StarStarEquals,

    #[token("&=")]
    AmpersandEquals,

    #[token("|=")]
    PipeEquals,

    #[token("^=")]
    CaretEquals,

    #[token("<<=")]
    LessLessEquals,

    #[token(">>=")]
    GreaterGreaterEquals,

    #[token(">>>=")]
    GreaterGreaterGreaterEquals,

    #[token("??=")]
    QuestionQuestionEquals,
}

impl Token {
    /// Whitespace and comments.
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::LineComment | Token::BlockComment)
    }

    /// Keywords that name a builtin type.
    pub fn is_builtin_type(&self) -> bool {
        matches!(
            self,
            Token::Void
                | Token::Any
                | Token::Bool
                | Token::Int
                | Token::Decimal
                | Token::String
                | Token::Type
        )
    }
}

pub type SpannedToken = Spanned<Token>;

/// Lex source code and return an iterator of tokens with their spans
pub fn lex(source: &str) -> impl Iterator<Item = Result<SpannedToken, Spanned<()>>> + '_ {
    Token::lexer(source).spanned().map(|(token, span)| {
        token
            .map(|t| Spanned::new(t, span.clone()))
            .map_err(|_| Spanned::new((), span))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn significant(source: &str) -> Vec<Spanned<Token>> {
        lex(source)
            .filter_map(|t| t.ok())
            .filter(|t| !t.value.is_trivia())
            .collect()
    }

    fn kinds(source: &str) -> Vec<Token> {
        significant(source).into_iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_function_header() {
        let tokens = significant("int main() { return 0; }");

        assert_eq!(tokens[0].value, Token::Int);
        assert_eq!(tokens[0].span, 0..3);
        assert_eq!(tokens[1].value, Token::Identifier);
        assert_eq!(tokens[1].span, 4..8);
        assert_eq!(tokens[4].value, Token::LBrace);
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"1 1.5 "a\"b" true false null"#),
            vec![
                Token::IntegerLiteral,
                Token::DecimalLiteral,
                Token::StringLiteral,
                Token::True,
                Token::False,
                Token::Null,
            ]
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(
            kinds("a >>>= b ?? c ??= d ** e"),
            vec![
                Token::Identifier,
                Token::GreaterGreaterGreaterEquals,
                Token::Identifier,
                Token::QuestionQuestion,
                Token::Identifier,
                Token::QuestionQuestionEquals,
                Token::Identifier,
                Token::StarStar,
                Token::Identifier,
            ]
        );
    }

    #[test]
    fn test_keywords_are_not_identifiers() {
        assert_eq!(
            kinds("isnt is island"),
            vec![Token::Isnt, Token::Is, Token::Identifier]
        );
    }

    #[test]
    fn test_trivia_is_kept() {
        let all: Vec<_> = lex("x /* c */ // d\ny").filter_map(|t| t.ok()).collect();
        assert!(all.iter().any(|t| t.value == Token::BlockComment));
        assert!(all.iter().any(|t| t.value == Token::LineComment));
        let covered: usize = all.iter().map(|t| t.span.len()).sum();
        assert_eq!(covered, "x /* c */ // d\ny".len());
    }

    #[test]
    fn test_unknown_character_is_error() {
        assert!(lex("@").any(|t| t.is_err()));
    }
}
