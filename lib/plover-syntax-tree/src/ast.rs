//! Typed views over the untyped syntax tree.
//!
//! Each wrapper holds a `SyntaxNode` of one known kind and exposes its
//! children by role. Accessors return `Option` because the tree may be
//! incomplete after a parse error.

use plover_span::Span;

use crate::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;

    fn cast(syntax: SyntaxNode) -> Option<Self>;

    fn syntax(&self) -> &SyntaxNode;

    /// Source span of the node, excluding leading trivia
    fn span(&self) -> Span {
        node_span(self.syntax())
    }
}

macro_rules! ast_node {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash)]
            pub struct $name {
                pub syntax: SyntaxNode,
            }

            impl AstNode for $name {
                fn can_cast(kind: SyntaxKind) -> bool {
                    kind == SyntaxKind::$name
                }

                fn cast(syntax: SyntaxNode) -> Option<Self> {
                    Self::can_cast(syntax.kind()).then(|| Self { syntax })
                }

                fn syntax(&self) -> &SyntaxNode {
                    &self.syntax
                }
            }
        )*
    };
}

/// Get the span of a syntax node, excluding leading trivia
pub fn node_span(node: &SyntaxNode) -> Span {
    let range = node.text_range();
    let end: usize = range.end().into();
    let start = first_significant_start(node).unwrap_or_else(|| range.start().into());
    start..end
}

fn first_significant_start(node: &SyntaxNode) -> Option<usize> {
    for child in node.children_with_tokens() {
        match child {
            SyntaxElement::Token(token) if !token.kind().is_trivia() => {
                return Some(token.text_range().start().into());
            }
            SyntaxElement::Token(_) => {}
            SyntaxElement::Node(inner) => {
                if let Some(start) = first_significant_start(&inner) {
                    return Some(start);
                }
            }
        }
    }
    None
}

pub fn token_span(token: &SyntaxToken) -> Span {
    let range = token.text_range();
    range.start().into()..range.end().into()
}

fn child<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

fn children<N: AstNode>(parent: &SyntaxNode) -> impl Iterator<Item = N> {
    parent.children().filter_map(N::cast)
}

/// Direct, non-trivia tokens of a node
fn tokens(parent: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !token.kind().is_trivia())
}

fn token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    tokens(parent).find(|token| token.kind() == kind)
}

fn has_token(parent: &SyntaxNode, kind: SyntaxKind) -> bool {
    token(parent, kind).is_some()
}

fn nth_expr(parent: &SyntaxNode, n: usize) -> Option<Expr> {
    parent.children().filter_map(Expr::cast).nth(n)
}

ast_node! {
    CompilationUnit,
    StructDeclaration,
    FieldDeclaration,
    FunctionDeclaration,
    ParameterList,
    Parameter,
    TypeClause,
    Attribute,
    GlobalStatement,

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
}

// ===== Declarations =====

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Member {
    Struct(StructDeclaration),
    Function(FunctionDeclaration),
    GlobalStatement(GlobalStatement),
}

impl AstNode for Member {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::StructDeclaration
                | SyntaxKind::FunctionDeclaration
                | SyntaxKind::GlobalStatement
        )
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        let member = match syntax.kind() {
            SyntaxKind::StructDeclaration => Member::Struct(StructDeclaration { syntax }),
            SyntaxKind::FunctionDeclaration => Member::Function(FunctionDeclaration { syntax }),
            SyntaxKind::GlobalStatement => Member::GlobalStatement(GlobalStatement { syntax }),
            _ => return None,
        };
        Some(member)
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Member::Struct(node) => &node.syntax,
            Member::Function(node) => &node.syntax,
            Member::GlobalStatement(node) => &node.syntax,
        }
    }
}

impl CompilationUnit {
    pub fn members(&self) -> impl Iterator<Item = Member> {
        children(&self.syntax)
    }
}

impl StructDeclaration {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Identifier)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldDeclaration> {
        children(&self.syntax)
    }
}

impl FieldDeclaration {
    pub fn type_clause(&self) -> Option<TypeClause> {
        child(&self.syntax)
    }

    pub fn identifier(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Identifier)
    }
}

/// A function declared at the top level or inside a block.
///
/// Both forms share one shape: a return type clause, a name, a parameter
/// list and a body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionNode {
    pub syntax: SyntaxNode,
}

impl AstNode for FunctionNode {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::FunctionDeclaration | SyntaxKind::LocalFunctionStatement
        )
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        Self::can_cast(syntax.kind()).then(|| Self { syntax })
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl FunctionNode {
    pub fn return_type(&self) -> Option<TypeClause> {
        child(&self.syntax)
    }

    pub fn identifier(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Identifier)
    }

    pub fn parameters(&self) -> impl Iterator<Item = Parameter> {
        child::<ParameterList>(&self.syntax)
            .into_iter()
            .flat_map(|list| list.parameters().collect::<Vec<_>>())
    }

    pub fn body(&self) -> Option<BlockStatement> {
        child(&self.syntax)
    }

    pub fn is_local(&self) -> bool {
        self.syntax.kind() == SyntaxKind::LocalFunctionStatement
    }
}

impl FunctionDeclaration {
    pub fn function(&self) -> FunctionNode {
        FunctionNode {
            syntax: self.syntax.clone(),
        }
    }
}

impl LocalFunctionStatement {
    pub fn function(&self) -> FunctionNode {
        FunctionNode {
            syntax: self.syntax.clone(),
        }
    }
}

impl ParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> {
        children(&self.syntax)
    }
}

impl Parameter {
    pub fn type_clause(&self) -> Option<TypeClause> {
        child(&self.syntax)
    }

    pub fn identifier(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Identifier)
    }

    pub fn default_value(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

/// Reference and constness modifiers written before a type name.
///
/// `const ref T` is a constant reference, `ref const T` is a reference to a
/// constant, and a lone `const` marks the variable itself constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeModifiers {
    pub is_constant_reference: bool,
    pub is_reference: bool,
    pub is_constant: bool,
}

impl TypeClause {
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> {
        children(&self.syntax)
    }

    pub fn modifiers(&self) -> TypeModifiers {
        let mut modifiers = TypeModifiers::default();
        let mut pending_const = false;

        for token in tokens(&self.syntax) {
            match token.kind() {
                SyntaxKind::Const => pending_const = true,
                SyntaxKind::Ref => {
                    modifiers.is_reference = true;
                    modifiers.is_constant_reference = pending_const;
                    pending_const = false;
                }
                _ => break,
            }
        }

        modifiers.is_constant = pending_const;
        modifiers
    }

    /// The written type name: an identifier, `var`, or a builtin type keyword
    pub fn type_name(&self) -> Option<SyntaxToken> {
        tokens(&self.syntax).find(|token| {
            token.kind() == SyntaxKind::Identifier
                || token.kind() == SyntaxKind::Var
                || token.kind().is_builtin_type()
        })
    }

    /// Number of `[]` pairs after the type name
    pub fn rank(&self) -> usize {
        tokens(&self.syntax)
            .filter(|token| token.kind() == SyntaxKind::LBracket)
            .count()
    }
}

impl Attribute {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Identifier)
    }
}

impl GlobalStatement {
    pub fn statement(&self) -> Option<Stmt> {
        child(&self.syntax)
    }
}

// ===== Statements =====

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    Block(BlockStatement),
    VariableDeclaration(VariableDeclaration),
    LocalFunction(LocalFunctionStatement),
    If(IfStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    For(ForStatement),
    Try(TryStatement),
    Break(BreakStatement),
    Continue(ContinueStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
}

impl AstNode for Stmt {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::BlockStatement
                | SyntaxKind::VariableDeclaration
                | SyntaxKind::LocalFunctionStatement
                | SyntaxKind::IfStatement
                | SyntaxKind::WhileStatement
                | SyntaxKind::DoWhileStatement
                | SyntaxKind::ForStatement
                | SyntaxKind::TryStatement
                | SyntaxKind::BreakStatement
                | SyntaxKind::ContinueStatement
                | SyntaxKind::ReturnStatement
                | SyntaxKind::ExpressionStatement
        )
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        let stmt = match syntax.kind() {
            SyntaxKind::BlockStatement => Stmt::Block(BlockStatement { syntax }),
            SyntaxKind::VariableDeclaration => {
                Stmt::VariableDeclaration(VariableDeclaration { syntax })
            }
            SyntaxKind::LocalFunctionStatement => {
                Stmt::LocalFunction(LocalFunctionStatement { syntax })
            }
            SyntaxKind::IfStatement => Stmt::If(IfStatement { syntax }),
            SyntaxKind::WhileStatement => Stmt::While(WhileStatement { syntax }),
            SyntaxKind::DoWhileStatement => Stmt::DoWhile(DoWhileStatement { syntax }),
            SyntaxKind::ForStatement => Stmt::For(ForStatement { syntax }),
            SyntaxKind::TryStatement => Stmt::Try(TryStatement { syntax }),
            SyntaxKind::BreakStatement => Stmt::Break(BreakStatement { syntax }),
            SyntaxKind::ContinueStatement => Stmt::Continue(ContinueStatement { syntax }),
            SyntaxKind::ReturnStatement => Stmt::Return(ReturnStatement { syntax }),
            SyntaxKind::ExpressionStatement => Stmt::Expression(ExpressionStatement { syntax }),
            _ => return None,
        };
        Some(stmt)
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Stmt::Block(node) => &node.syntax,
            Stmt::VariableDeclaration(node) => &node.syntax,
            Stmt::LocalFunction(node) => &node.syntax,
            Stmt::If(node) => &node.syntax,
            Stmt::While(node) => &node.syntax,
            Stmt::DoWhile(node) => &node.syntax,
            Stmt::For(node) => &node.syntax,
            Stmt::Try(node) => &node.syntax,
            Stmt::Break(node) => &node.syntax,
            Stmt::Continue(node) => &node.syntax,
            Stmt::Return(node) => &node.syntax,
            Stmt::Expression(node) => &node.syntax,
        }
    }
}

impl BlockStatement {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> {
        children(&self.syntax)
    }
}

impl VariableDeclaration {
    pub fn type_clause(&self) -> Option<TypeClause> {
        child(&self.syntax)
    }

    pub fn identifier(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Identifier)
    }

    pub fn initializer(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

impl IfStatement {
    pub fn condition(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn then_branch(&self) -> Option<Stmt> {
        child(&self.syntax)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        child(&self.syntax)
    }
}

impl ElseClause {
    pub fn body(&self) -> Option<Stmt> {
        child(&self.syntax)
    }
}

impl WhileStatement {
    pub fn condition(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn body(&self) -> Option<Stmt> {
        child(&self.syntax)
    }
}

impl DoWhileStatement {
    pub fn body(&self) -> Option<Stmt> {
        child(&self.syntax)
    }

    pub fn condition(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

impl ForStatement {
    pub fn initializer(&self) -> Option<Stmt> {
        child(&self.syntax)
    }

    pub fn condition(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn step(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 1)
    }

    pub fn body(&self) -> Option<Stmt> {
        children::<Stmt>(&self.syntax).nth(1)
    }
}

impl TryStatement {
    pub fn body(&self) -> Option<BlockStatement> {
        child(&self.syntax)
    }

    pub fn catch_clause(&self) -> Option<CatchClause> {
        child(&self.syntax)
    }

    pub fn finally_clause(&self) -> Option<FinallyClause> {
        child(&self.syntax)
    }
}

impl CatchClause {
    pub fn body(&self) -> Option<BlockStatement> {
        child(&self.syntax)
    }
}

impl FinallyClause {
    pub fn body(&self) -> Option<BlockStatement> {
        child(&self.syntax)
    }
}

impl BreakStatement {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Break)
    }
}

impl ContinueStatement {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Continue)
    }
}

impl ReturnStatement {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Return)
    }

    pub fn value(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

impl ExpressionStatement {
    pub fn expression(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

// ===== Expressions =====

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(LiteralExpression),
    Name(NameExpression),
    Assignment(AssignmentExpression),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    Ternary(TernaryExpression),
    Parenthesized(ParenthesizedExpression),
    Call(CallExpression),
    Index(IndexExpression),
    MemberAccess(MemberAccessExpression),
    Prefix(PrefixExpression),
    Postfix(PostfixExpression),
    Cast(CastExpression),
    Reference(ReferenceExpression),
    Typeof(TypeofExpression),
    InitializerList(InitializerListExpression),
    Empty(EmptyExpression),
}

impl AstNode for Expr {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::LiteralExpression
                | SyntaxKind::NameExpression
                | SyntaxKind::AssignmentExpression
                | SyntaxKind::UnaryExpression
                | SyntaxKind::BinaryExpression
                | SyntaxKind::TernaryExpression
                | SyntaxKind::ParenthesizedExpression
                | SyntaxKind::CallExpression
                | SyntaxKind::IndexExpression
                | SyntaxKind::MemberAccessExpression
                | SyntaxKind::PrefixExpression
                | SyntaxKind::PostfixExpression
                | SyntaxKind::CastExpression
                | SyntaxKind::ReferenceExpression
                | SyntaxKind::TypeofExpression
                | SyntaxKind::InitializerListExpression
                | SyntaxKind::EmptyExpression
        )
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        let expr = match syntax.kind() {
            SyntaxKind::LiteralExpression => Expr::Literal(LiteralExpression { syntax }),
            SyntaxKind::NameExpression => Expr::Name(NameExpression { syntax }),
            SyntaxKind::AssignmentExpression => Expr::Assignment(AssignmentExpression { syntax }),
            SyntaxKind::UnaryExpression => Expr::Unary(UnaryExpression { syntax }),
            SyntaxKind::BinaryExpression => Expr::Binary(BinaryExpression { syntax }),
            SyntaxKind::TernaryExpression => Expr::Ternary(TernaryExpression { syntax }),
            SyntaxKind::ParenthesizedExpression => {
                Expr::Parenthesized(ParenthesizedExpression { syntax })
            }
            SyntaxKind::CallExpression => Expr::Call(CallExpression { syntax }),
            SyntaxKind::IndexExpression => Expr::Index(IndexExpression { syntax }),
            SyntaxKind::MemberAccessExpression => {
                Expr::MemberAccess(MemberAccessExpression { syntax })
            }
            SyntaxKind::PrefixExpression => Expr::Prefix(PrefixExpression { syntax }),
            SyntaxKind::PostfixExpression => Expr::Postfix(PostfixExpression { syntax }),
            SyntaxKind::CastExpression => Expr::Cast(CastExpression { syntax }),
            SyntaxKind::ReferenceExpression => Expr::Reference(ReferenceExpression { syntax }),
            SyntaxKind::TypeofExpression => Expr::Typeof(TypeofExpression { syntax }),
            SyntaxKind::InitializerListExpression => {
                Expr::InitializerList(InitializerListExpression { syntax })
            }
            SyntaxKind::EmptyExpression => Expr::Empty(EmptyExpression { syntax }),
            _ => return None,
        };
        Some(expr)
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Expr::Literal(node) => &node.syntax,
            Expr::Name(node) => &node.syntax,
            Expr::Assignment(node) => &node.syntax,
            Expr::Unary(node) => &node.syntax,
            Expr::Binary(node) => &node.syntax,
            Expr::Ternary(node) => &node.syntax,
            Expr::Parenthesized(node) => &node.syntax,
            Expr::Call(node) => &node.syntax,
            Expr::Index(node) => &node.syntax,
            Expr::MemberAccess(node) => &node.syntax,
            Expr::Prefix(node) => &node.syntax,
            Expr::Postfix(node) => &node.syntax,
            Expr::Cast(node) => &node.syntax,
            Expr::Reference(node) => &node.syntax,
            Expr::Typeof(node) => &node.syntax,
            Expr::InitializerList(node) => &node.syntax,
            Expr::Empty(node) => &node.syntax,
        }
    }
}

impl LiteralExpression {
    pub fn token(&self) -> Option<SyntaxToken> {
        tokens(&self.syntax).next()
    }
}

impl NameExpression {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Identifier)
    }
}

impl AssignmentExpression {
    pub fn target(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    /// `=` or one of the compound assignment tokens
    pub fn operator(&self) -> Option<SyntaxToken> {
        tokens(&self.syntax).next()
    }

    pub fn value(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 1)
    }
}

impl UnaryExpression {
    pub fn operator(&self) -> Option<SyntaxToken> {
        tokens(&self.syntax).next()
    }

    pub fn operand(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

impl BinaryExpression {
    pub fn left(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        tokens(&self.syntax).next()
    }

    pub fn right(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 1)
    }
}

impl TernaryExpression {
    pub fn left(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn left_operator(&self) -> Option<SyntaxToken> {
        tokens(&self.syntax).next()
    }

    pub fn center(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 1)
    }

    pub fn right_operator(&self) -> Option<SyntaxToken> {
        tokens(&self.syntax).nth(1)
    }

    pub fn right(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 2)
    }
}

impl ParenthesizedExpression {
    pub fn expression(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

impl CallExpression {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Identifier)
    }

    pub fn arguments(&self) -> impl Iterator<Item = Argument> {
        child::<ArgumentList>(&self.syntax)
            .into_iter()
            .flat_map(|list| children::<Argument>(&list.syntax).collect::<Vec<_>>())
    }
}

impl Argument {
    /// The `name` of a named argument `name: value`
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Identifier)
    }

    pub fn value(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

impl IndexExpression {
    pub fn operand(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn index(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 1)
    }
}

impl MemberAccessExpression {
    pub fn operand(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn is_null_conditional(&self) -> bool {
        has_token(&self.syntax, SyntaxKind::QuestionDot)
    }

    pub fn identifier(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Identifier)
    }
}

impl PrefixExpression {
    pub fn operator(&self) -> Option<SyntaxToken> {
        tokens(&self.syntax).next()
    }

    pub fn operand(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

impl PostfixExpression {
    pub fn operand(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        tokens(&self.syntax).next()
    }
}

impl CastExpression {
    pub fn type_clause(&self) -> Option<TypeClause> {
        child(&self.syntax)
    }

    pub fn expression(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

impl ReferenceExpression {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        token(&self.syntax, SyntaxKind::Identifier)
    }
}

impl TypeofExpression {
    pub fn type_clause(&self) -> Option<TypeClause> {
        child(&self.syntax)
    }
}

impl InitializerListExpression {
    pub fn items(&self) -> impl Iterator<Item = Expr> {
        children(&self.syntax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GreenNodeBuilder;

    fn build(f: impl FnOnce(&mut GreenNodeBuilder)) -> SyntaxNode {
        let mut builder = GreenNodeBuilder::new();
        f(&mut builder);
        SyntaxNode::new_root(builder.finish())
    }

    #[test]
    fn test_binary_roles() {
        let tree = build(|b| {
            b.start_node(SyntaxKind::BinaryExpression.into());
            b.start_node(SyntaxKind::NameExpression.into());
            b.token(SyntaxKind::Identifier.into(), "a");
            b.finish_node();
            b.token(SyntaxKind::Whitespace.into(), " ");
            b.token(SyntaxKind::Plus.into(), "+");
            b.token(SyntaxKind::Whitespace.into(), " ");
            b.start_node(SyntaxKind::LiteralExpression.into());
            b.token(SyntaxKind::IntegerLiteral.into(), "1");
            b.finish_node();
            b.finish_node();
        });

        let binary = BinaryExpression::cast(tree).unwrap();
        assert!(matches!(binary.left(), Some(Expr::Name(_))));
        assert_eq!(binary.operator().unwrap().kind(), SyntaxKind::Plus);
        assert!(matches!(binary.right(), Some(Expr::Literal(_))));
        assert_eq!(binary.span(), 0..5);
    }

    #[test]
    fn test_span_skips_leading_trivia() {
        let tree = build(|b| {
            b.start_node(SyntaxKind::NameExpression.into());
            b.token(SyntaxKind::Whitespace.into(), "  ");
            b.token(SyntaxKind::Identifier.into(), "x");
            b.finish_node();
        });

        assert_eq!(node_span(&tree), 2..3);
    }

    #[test]
    fn test_type_modifiers() {
        let tree = build(|b| {
            b.start_node(SyntaxKind::TypeClause.into());
            b.token(SyntaxKind::Const.into(), "const");
            b.token(SyntaxKind::Whitespace.into(), " ");
            b.token(SyntaxKind::Ref.into(), "ref");
            b.token(SyntaxKind::Whitespace.into(), " ");
            b.token(SyntaxKind::Int.into(), "int");
            b.token(SyntaxKind::LBracket.into(), "[");
            b.token(SyntaxKind::RBracket.into(), "]");
            b.finish_node();
        });

        let clause = TypeClause::cast(tree).unwrap();
        let modifiers = clause.modifiers();
        assert!(modifiers.is_reference);
        assert!(modifiers.is_constant_reference);
        assert!(!modifiers.is_constant);
        assert_eq!(clause.type_name().unwrap().text(), "int");
        assert_eq!(clause.rank(), 1);
    }

    #[test]
    fn test_lone_const_is_implicit_constant() {
        let tree = build(|b| {
            b.start_node(SyntaxKind::TypeClause.into());
            b.token(SyntaxKind::Const.into(), "const");
            b.finish_node();
        });

        let clause = TypeClause::cast(tree).unwrap();
        assert!(clause.modifiers().is_constant);
        assert!(clause.type_name().is_none());
    }
}
