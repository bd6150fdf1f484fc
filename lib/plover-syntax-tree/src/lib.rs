//! Plover Syntax Tree
//!
//! This crate defines the concrete syntax tree for Plover using `rowan`.
//! The tree is lossless: every byte of the source, trivia included, is
//! owned by exactly one token, so `text_range()` offsets are source offsets.
//!
//! Typed views over the raw tree live in [`ast`].
//!
//! # Example
//!
//! ```
//! use plover_syntax_tree::{GreenNodeBuilder, SyntaxKind, SyntaxNode};
//!
//! let mut builder = GreenNodeBuilder::new();
//! builder.start_node(SyntaxKind::NameExpression.into());
//! builder.token(SyntaxKind::Identifier.into(), "count");
//! builder.finish_node();
//!
//! let syntax = SyntaxNode::new_root(builder.finish());
//! assert_eq!(syntax.kind(), SyntaxKind::NameExpression);
//! ```

pub mod ast;

use plover_lexer::Token;
use rowan::Language;

pub use rowan::GreenNodeBuilder;

macro_rules! syntax_kinds {
    ($($kind:ident),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum SyntaxKind {
            $($kind),*
        }

        impl SyntaxKind {
            const ALL: &'static [SyntaxKind] = &[$(SyntaxKind::$kind),*];
        }
    };
}

syntax_kinds! {
    // ===== Syntax Nodes (Non-terminals) =====
    CompilationUnit,
    StructDeclaration,
    FieldDeclaration,
    FunctionDeclaration,
    ParameterList,
    Parameter,
    TypeClause,
    Attribute,
    GlobalStatement,

    // Statements
    BlockStatement,
    VariableDeclaration,
    LocalFunctionStatement,
    IfStatement,
    ElseClause,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    TryStatement,
    CatchClause,
    FinallyClause,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ExpressionStatement,

    // Expressions
    LiteralExpression,
    NameExpression,
    AssignmentExpression,
    UnaryExpression,
    BinaryExpression,
    TernaryExpression,
    ParenthesizedExpression,
    CallExpression,
    ArgumentList,
    Argument,
    IndexExpression,
    MemberAccessExpression,
    PrefixExpression,
    PostfixExpression,
    CastExpression,
    ReferenceExpression,
    TypeofExpression,
    InitializerListExpression,
    EmptyExpression,

    // ===== Tokens (Terminals) =====
    // Trivia
    Whitespace,
    LineComment,
    BlockComment,

    // Literals
    Identifier,
    StringLiteral,
    IntegerLiteral,
    DecimalLiteral,
    True,
    False,
    Null,

    // Keywords
    Struct,
    Var,
    Const,
    Ref,
    Void,
    Any,
    Bool,
    Int,
    Decimal,
    String,
    Type,
    If,
    Else,
    While,
    Do,
    For,
    Try,
    Catch,
    Finally,
    Break,
    Continue,
    Return,
    Typeof,
    Is,
    Isnt,

    // Braces
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Punctuation
    Semicolon,
    Comma,
    Dot,
    QuestionDot,
    Colon,
    Question,

    // Operators
    Equals,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    Ampersand,
    Pipe,
    Caret,
    Tilde,
    Bang,
    AmpersandAmpersand,
    PipePipe,
    QuestionQuestion,
    EqualsEquals,
    BangEquals,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
    LessLess,
    GreaterGreater,
    GreaterGreaterGreater,
    PlusPlus,
    MinusMinus,
    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,
    PercentEquals,
    StarStarEquals,
    AmpersandEquals,
    PipeEquals,
    CaretEquals,
    LessLessEquals,
    GreaterGreaterEquals,
    GreaterGreaterGreaterEquals,
    QuestionQuestionEquals,

    // Special
    Error,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace | SyntaxKind::LineComment | SyntaxKind::BlockComment
        )
    }

    pub fn is_builtin_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::Void
                | SyntaxKind::Any
                | SyntaxKind::Bool
                | SyntaxKind::Int
                | SyntaxKind::Decimal
                | SyntaxKind::String
                | SyntaxKind::Type
        )
    }

    /// The binary operator a compound assignment applies, if this is one.
    pub fn compound_operator(self) -> Option<SyntaxKind> {
        let op = match self {
            SyntaxKind::PlusEquals => SyntaxKind::Plus,
            SyntaxKind::MinusEquals => SyntaxKind::Minus,
            SyntaxKind::StarEquals => SyntaxKind::Star,
            SyntaxKind::SlashEquals => SyntaxKind::Slash,
            SyntaxKind::PercentEquals => SyntaxKind::Percent,
            SyntaxKind::StarStarEquals => SyntaxKind::StarStar,
            SyntaxKind::AmpersandEquals => SyntaxKind::Ampersand,
            SyntaxKind::PipeEquals => SyntaxKind::Pipe,
            SyntaxKind::CaretEquals => SyntaxKind::Caret,
            SyntaxKind::LessLessEquals => SyntaxKind::LessLess,
            SyntaxKind::GreaterGreaterEquals => SyntaxKind::GreaterGreater,
            SyntaxKind::GreaterGreaterGreaterEquals => SyntaxKind::GreaterGreaterGreater,
            SyntaxKind::QuestionQuestionEquals => SyntaxKind::QuestionQuestion,
            _ => return None,
        };
        Some(op)
    }

    /// Source spelling of punctuation, operator and keyword tokens.
    pub fn text(self) -> &'static str {
        match self {
            SyntaxKind::True => "true",
            SyntaxKind::False => "false",
            SyntaxKind::Null => "null",
            SyntaxKind::Is => "is",
            SyntaxKind::Isnt => "isnt",
            SyntaxKind::Typeof => "typeof",
            SyntaxKind::LParen => "(",
            SyntaxKind::RParen => ")",
            SyntaxKind::LBrace => "{",
            SyntaxKind::RBrace => "}",
            SyntaxKind::LBracket => "[",
            SyntaxKind::RBracket => "]",
            SyntaxKind::Semicolon => ";",
            SyntaxKind::Comma => ",",
            SyntaxKind::Dot => ".",
            SyntaxKind::QuestionDot => "?.",
            SyntaxKind::Colon => ":",
            SyntaxKind::Question => "?",
            SyntaxKind::Equals => "=",
            SyntaxKind::Plus => "+",
            SyntaxKind::Minus => "-",
            SyntaxKind::Star => "*",
            SyntaxKind::Slash => "/",
            SyntaxKind::Percent => "%",
            SyntaxKind::StarStar => "**",
            SyntaxKind::Ampersand => "&",
            SyntaxKind::Pipe => "|",
            SyntaxKind::Caret => "^",
            SyntaxKind::Tilde => "~",
            SyntaxKind::Bang => "!",
            SyntaxKind::AmpersandAmpersand => "&&",
            SyntaxKind::PipePipe => "||",
            SyntaxKind::QuestionQuestion => "??",
            SyntaxKind::EqualsEquals => "==",
            SyntaxKind::BangEquals => "!=",
            SyntaxKind::Less => "<",
            SyntaxKind::Greater => ">",
            SyntaxKind::LessEquals => "<=",
            SyntaxKind::GreaterEquals => ">=",
            SyntaxKind::LessLess => "<<",
            SyntaxKind::GreaterGreater => ">>",
            SyntaxKind::GreaterGreaterGreater => ">>>",
            SyntaxKind::PlusPlus => "++",
            SyntaxKind::MinusMinus => "--",
            SyntaxKind::PlusEquals => "+=",
            SyntaxKind::MinusEquals => "-=",
            SyntaxKind::StarEquals => "*=",
            SyntaxKind::SlashEquals => "/=",
            SyntaxKind::PercentEquals => "%=",
            SyntaxKind::StarStarEquals => "**=",
            SyntaxKind::AmpersandEquals => "&=",
            SyntaxKind::PipeEquals => "|=",
            SyntaxKind::CaretEquals => "^=",
            SyntaxKind::LessLessEquals => "<<=",
            SyntaxKind::GreaterGreaterEquals => ">>=",
            SyntaxKind::GreaterGreaterGreaterEquals => ">>>=",
            SyntaxKind::QuestionQuestionEquals => "??=",
            _ => "",
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<Token> for SyntaxKind {
    fn from(token: Token) -> Self {
        match token {
            // Trivia
            Token::Whitespace => SyntaxKind::Whitespace,
            Token::LineComment => SyntaxKind::LineComment,
            Token::BlockComment => SyntaxKind::BlockComment,
            // Literals
            Token::Identifier => SyntaxKind::Identifier,
            Token::StringLiteral => SyntaxKind::StringLiteral,
            Token::IntegerLiteral => SyntaxKind::IntegerLiteral,
            Token::DecimalLiteral => SyntaxKind::DecimalLiteral,
            Token::True => SyntaxKind::True,
            Token::False => SyntaxKind::False,
            Token::Null => SyntaxKind::Null,
            // Keywords
            Token::Struct => SyntaxKind::Struct,
            Token::Var => SyntaxKind::Var,
            Token::Const => SyntaxKind::Const,
            Token::Ref => SyntaxKind::Ref,
            Token::Void => SyntaxKind::Void,
            Token::Any => SyntaxKind::Any,
            Token::Bool => SyntaxKind::Bool,
            Token::Int => SyntaxKind::Int,
            Token::Decimal => SyntaxKind::Decimal,
            Token::String => SyntaxKind::String,
            Token::Type => SyntaxKind::Type,
            Token::If => SyntaxKind::If,
            Token::Else => SyntaxKind::Else,
            Token::While => SyntaxKind::While,
            Token::Do => SyntaxKind::Do,
            Token::For => SyntaxKind::For,
            Token::Try => SyntaxKind::Try,
            Token::Catch => SyntaxKind::Catch,
            Token::Finally => SyntaxKind::Finally,
            Token::Break => SyntaxKind::Break,
            Token::Continue => SyntaxKind::Continue,
            Token::Return => SyntaxKind::Return,
            Token::Typeof => SyntaxKind::Typeof,
            Token::Is => SyntaxKind::Is,
            Token::Isnt => SyntaxKind::Isnt,
            // Braces
            Token::LParen => SyntaxKind::LParen,
            Token::RParen => SyntaxKind::RParen,
            Token::LBrace => SyntaxKind::LBrace,
            Token::RBrace => SyntaxKind::RBrace,
            Token::LBracket => SyntaxKind::LBracket,
            Token::RBracket => SyntaxKind::RBracket,
            // Punctuation
            Token::Semicolon => SyntaxKind::Semicolon,
            Token::Comma => SyntaxKind::Comma,
            Token::Dot => SyntaxKind::Dot,
            Token::QuestionDot => SyntaxKind::QuestionDot,
            Token::Colon => SyntaxKind::Colon,
            Token::Question => SyntaxKind::Question,
            // Operators
            Token::Equals => SyntaxKind::Equals,
            Token::Plus => SyntaxKind::Plus,
            Token::Minus => SyntaxKind::Minus,
            Token::Star => SyntaxKind::Star,
            Token::Slash => SyntaxKind::Slash,
            Token::Percent => SyntaxKind::Percent,
            Token::StarStar => SyntaxKind::StarStar,
            Token::Ampersand => SyntaxKind::Ampersand,
            Token::Pipe => SyntaxKind::Pipe,
            Token::Caret => SyntaxKind::Caret,
            Token::Tilde => SyntaxKind::Tilde,
            Token::Bang => SyntaxKind::Bang,
            Token::AmpersandAmpersand => SyntaxKind::AmpersandAmpersand,
            Token::PipePipe => SyntaxKind::PipePipe,
            Token::QuestionQuestion => SyntaxKind::QuestionQuestion,
            Token::EqualsEquals => SyntaxKind::EqualsEquals,
            Token::BangEquals => SyntaxKind::BangEquals,
            Token::Less => SyntaxKind::Less,
            Token::Greater => SyntaxKind::Greater,
            Token::LessEquals => SyntaxKind::LessEquals,
            Token::GreaterEquals => SyntaxKind::GreaterEquals,
            Token::LessLess => SyntaxKind::LessLess,
            Token::GreaterGreater => SyntaxKind::GreaterGreater,
            Token::GreaterGreaterGreater => SyntaxKind::GreaterGreaterGreater,
            Token::PlusPlus => SyntaxKind::PlusPlus,
            Token::MinusMinus => SyntaxKind::MinusMinus,
            // Compound assignment
            Token::PlusEquals => SyntaxKind::PlusEquals,
            Token::MinusEquals => SyntaxKind::MinusEquals,
            Token::StarEquals => SyntaxKind::StarEquals,
            Token::SlashEquals => SyntaxKind::SlashEquals,
            Token::PercentEquals => SyntaxKind::PercentEquals,
            Token::StarStarEquals => SyntaxKind::StarStarEquals,
            Token::AmpersandEquals => SyntaxKind::AmpersandEquals,
            Token::PipeEquals => SyntaxKind::PipeEquals,
            Token::CaretEquals => SyntaxKind::CaretEquals,
            Token::LessLessEquals => SyntaxKind::LessLessEquals,
            Token::GreaterGreaterEquals => SyntaxKind::GreaterGreaterEquals,
            Token::GreaterGreaterGreaterEquals => SyntaxKind::GreaterGreaterGreaterEquals,
            Token::QuestionQuestionEquals => SyntaxKind::QuestionQuestionEquals,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PloverLanguage;

impl Language for PloverLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SyntaxKind::ALL
            .get(raw.0 as usize)
            .copied()
            .unwrap_or(SyntaxKind::Error)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<PloverLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<PloverLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<PloverLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_round_trip() {
        for kind in SyntaxKind::ALL {
            let raw: rowan::SyntaxKind = (*kind).into();
            assert_eq!(PloverLanguage::kind_from_raw(raw), *kind);
        }
    }

    #[test]
    fn test_token_conversion() {
        assert_eq!(SyntaxKind::from(Token::Isnt), SyntaxKind::Isnt);
        assert_eq!(SyntaxKind::from(Token::Identifier), SyntaxKind::Identifier);
        assert_eq!(
            SyntaxKind::from(Token::QuestionQuestionEquals),
            SyntaxKind::QuestionQuestionEquals
        );
    }

    #[test]
    fn test_compound_operator() {
        assert_eq!(SyntaxKind::PlusEquals.compound_operator(), Some(SyntaxKind::Plus));
        assert_eq!(
            SyntaxKind::QuestionQuestionEquals.compound_operator(),
            Some(SyntaxKind::QuestionQuestion)
        );
        assert_eq!(SyntaxKind::Equals.compound_operator(), None);
    }
}
