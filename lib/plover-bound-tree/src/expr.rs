//! Bound expressions.
//!
//! Every expression carries its resolved type and, when it can be computed
//! at compile time, its constant value. Constructors fold eagerly, so a
//! parent only ever inspects its children's `constant`.

use std::fmt;
use std::rc::Rc;

use plover_span::Span;

use crate::constant::BoundConstant;
use crate::fold::{fold_binary, fold_ternary, fold_unary};
use crate::operators::{BoundBinaryOperator, BoundTernaryOperator, BoundUnaryOperator};
use crate::symbols::{FunctionSymbol, StructSymbol, VariableSymbol};
use crate::ty::{BoundType, TypeSymbol};

#[derive(Debug, Clone, PartialEq)]
pub struct BoundExpression {
    pub kind: BoundExpressionKind,
    pub ty: BoundType,
    pub constant: Option<BoundConstant>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoundExpressionKind {
    /// Binding failed and a diagnostic has already been reported
    Error,
    Empty,
    Literal,
    Variable(Rc<VariableSymbol>),
    Assignment {
        target: Box<BoundExpression>,
        value: Box<BoundExpression>,
    },
    CompoundAssignment {
        target: Box<BoundExpression>,
        op: BoundBinaryOperator,
        value: Box<BoundExpression>,
    },
    Unary {
        op: BoundUnaryOperator,
        operand: Box<BoundExpression>,
    },
    Binary {
        left: Box<BoundExpression>,
        op: BoundBinaryOperator,
        right: Box<BoundExpression>,
    },
    Ternary {
        left: Box<BoundExpression>,
        op: BoundTernaryOperator,
        center: Box<BoundExpression>,
        right: Box<BoundExpression>,
    },
    Call {
        function: Rc<FunctionSymbol>,
        arguments: Vec<BoundExpression>,
    },
    Cast {
        operand: Box<BoundExpression>,
    },
    Index {
        operand: Box<BoundExpression>,
        index: Box<BoundExpression>,
    },
    MemberAccess {
        operand: Box<BoundExpression>,
        member: Rc<VariableSymbol>,
        is_null_conditional: bool,
    },
    InitializerList {
        items: Vec<BoundExpression>,
    },
    Reference(Rc<VariableSymbol>),
    Typeof(BoundType),
    Constructor(Rc<StructSymbol>),
}

impl BoundExpression {
    fn new(kind: BoundExpressionKind, ty: BoundType, span: Span) -> Self {
        Self {
            kind,
            ty,
            constant: None,
            span,
        }
    }

    fn folded(mut self, constant: Option<BoundConstant>) -> Self {
        self.constant = constant;
        self
    }

    pub fn error(span: Span) -> Self {
        Self::new(BoundExpressionKind::Error, BoundType::error(), span)
    }

    pub fn empty(span: Span) -> Self {
        Self::new(BoundExpressionKind::Empty, BoundType::void(), span)
    }

    /// A literal whose type follows from its value.
    pub fn literal(value: BoundConstant, span: Span) -> Self {
        let ty = match &value {
            BoundConstant::Null => BoundType::null_literal(),
            BoundConstant::Bool(_) => BoundType::literal(TypeSymbol::Bool),
            BoundConstant::Int(_) => BoundType::literal(TypeSymbol::Int),
            BoundConstant::Decimal(_) => BoundType::literal(TypeSymbol::Decimal),
            BoundConstant::String(_) => BoundType::literal(TypeSymbol::String),
        };
        Self::typed_literal(value, ty, span)
    }

    pub fn typed_literal(value: BoundConstant, ty: BoundType, span: Span) -> Self {
        Self::new(BoundExpressionKind::Literal, ty, span).folded(Some(value))
    }

    pub fn variable(variable: Rc<VariableSymbol>, span: Span) -> Self {
        let ty = variable.ty.clone();
        let constant = variable.constant.clone();
        Self::new(BoundExpressionKind::Variable(variable), ty, span).folded(constant)
    }

    pub fn assignment(target: BoundExpression, value: BoundExpression, span: Span) -> Self {
        let ty = value.ty.clone();
        let kind = BoundExpressionKind::Assignment {
            target: Box::new(target),
            value: Box::new(value),
        };
        Self::new(kind, ty, span)
    }

    pub fn compound_assignment(
        target: BoundExpression,
        op: BoundBinaryOperator,
        value: BoundExpression,
        span: Span,
    ) -> Self {
        let ty = target.ty.clone();
        let kind = BoundExpressionKind::CompoundAssignment {
            target: Box::new(target),
            op,
            value: Box::new(value),
        };
        Self::new(kind, ty, span)
    }

    pub fn unary(op: BoundUnaryOperator, operand: BoundExpression, span: Span) -> Self {
        let constant = operand.constant.as_ref().and_then(|c| fold_unary(&op, c));
        let ty = op.result_type.clone();
        let kind = BoundExpressionKind::Unary {
            op,
            operand: Box::new(operand),
        };
        Self::new(kind, ty, span).folded(constant)
    }

    pub fn binary(
        left: BoundExpression,
        op: BoundBinaryOperator,
        right: BoundExpression,
        span: Span,
    ) -> Self {
        let constant = fold_binary(&op, left.constant.as_ref(), right.constant.as_ref());
        let ty = op.result_type.clone();
        let kind = BoundExpressionKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        };
        Self::new(kind, ty, span).folded(constant)
    }

    pub fn ternary(
        left: BoundExpression,
        op: BoundTernaryOperator,
        center: BoundExpression,
        right: BoundExpression,
        span: Span,
    ) -> Self {
        let constant = fold_ternary(
            &op,
            left.constant.as_ref(),
            center.constant.as_ref(),
            right.constant.as_ref(),
        );
        let ty = op.result_type.clone();
        let kind = BoundExpressionKind::Ternary {
            left: Box::new(left),
            op,
            center: Box::new(center),
            right: Box::new(right),
        };
        Self::new(kind, ty, span).folded(constant)
    }

    pub fn call(function: Rc<FunctionSymbol>, arguments: Vec<BoundExpression>, span: Span) -> Self {
        let ty = function.return_type.clone();
        Self::new(BoundExpressionKind::Call { function, arguments }, ty, span)
    }

    /// Convert `operand` to `ty`, folding constants through the conversion.
    pub fn cast(ty: BoundType, operand: BoundExpression, span: Span) -> Self {
        let constant = match (&operand.constant, ty.symbol()) {
            (Some(constant), _) if constant.is_null() => Some(BoundConstant::Null),
            (Some(constant), Some(symbol)) if ty.dimensions() == 0 => constant.convert(symbol),
            _ => None,
        };
        let kind = BoundExpressionKind::Cast {
            operand: Box::new(operand),
        };
        Self::new(kind, ty, span).folded(constant)
    }

    pub fn index(operand: BoundExpression, index: BoundExpression, span: Span) -> Self {
        let ty = operand.ty.child_type().unwrap_or_else(BoundType::error);
        let kind = BoundExpressionKind::Index {
            operand: Box::new(operand),
            index: Box::new(index),
        };
        Self::new(kind, ty, span)
    }

    pub fn member_access(
        operand: BoundExpression,
        member: Rc<VariableSymbol>,
        is_null_conditional: bool,
        span: Span,
    ) -> Self {
        let ty = if is_null_conditional {
            member.ty.clone().nullable()
        } else {
            member.ty.clone()
        };
        let kind = BoundExpressionKind::MemberAccess {
            operand: Box::new(operand),
            member,
            is_null_conditional,
        };
        Self::new(kind, ty, span)
    }

    pub fn initializer_list(items: Vec<BoundExpression>, ty: BoundType, span: Span) -> Self {
        Self::new(BoundExpressionKind::InitializerList { items }, ty, span)
    }

    pub fn reference(variable: Rc<VariableSymbol>, span: Span) -> Self {
        let ty = variable.ty.clone().as_reference();
        Self::new(BoundExpressionKind::Reference(variable), ty, span)
    }

    pub fn type_of(operand: BoundType, span: Span) -> Self {
        Self::new(BoundExpressionKind::Typeof(operand), BoundType::type_(), span)
    }

    pub fn constructor(symbol: Rc<StructSymbol>, span: Span) -> Self {
        let ty = BoundType::new(symbol.type_symbol());
        Self::new(BoundExpressionKind::Constructor(symbol), ty, span)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, BoundExpressionKind::Error)
    }

    /// Whether this expression names a storage location.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            BoundExpressionKind::Variable(_)
                | BoundExpressionKind::MemberAccess { .. }
                | BoundExpressionKind::Index { .. }
        )
    }

    /// The variable an assignable expression ultimately writes to.
    pub fn root_variable(&self) -> Option<&Rc<VariableSymbol>> {
        match &self.kind {
            BoundExpressionKind::Variable(variable) => Some(variable),
            BoundExpressionKind::MemberAccess { operand, .. }
            | BoundExpressionKind::Index { operand, .. } => operand.root_variable(),
            _ => None,
        }
    }

    pub fn is_null_constant(&self) -> bool {
        matches!(self.constant, Some(BoundConstant::Null))
    }
}

impl fmt::Display for BoundExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BoundExpressionKind::*;

        match &self.kind {
            Error => f.write_str("?"),
            Empty => Ok(()),
            Literal => match &self.constant {
                Some(BoundConstant::String(text)) => write!(f, "{:?}", text),
                Some(constant) => write!(f, "{}", constant),
                None => f.write_str("?"),
            },
            Variable(variable) => f.write_str(&variable.name),
            Assignment { target, value } => write!(f, "{} = {}", target, value),
            CompoundAssignment { target, op, value } => {
                write!(f, "{} {}= {}", target, op.syntax.text(), value)
            }
            Unary { op, operand } => write!(f, "{}{}", op.syntax.text(), operand),
            Binary { left, op, right } => write!(f, "({} {} {})", left, op.syntax.text(), right),
            Ternary {
                left,
                op,
                center,
                right,
            } => write!(
                f,
                "({} {} {} {} {})",
                left,
                op.left_syntax.text(),
                center,
                op.right_syntax.text(),
                right
            ),
            Call {
                function,
                arguments,
            } => {
                write!(f, "{}(", function.name)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                f.write_str(")")
            }
            Cast { operand } => write!(f, "({}){}", self.ty, operand),
            Index { operand, index } => write!(f, "{}[{}]", operand, index),
            MemberAccess {
                operand,
                member,
                is_null_conditional,
            } => {
                let dot = if *is_null_conditional { "?." } else { "." };
                write!(f, "{}{}{}", operand, dot, member.name)
            }
            InitializerList { items } => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("}")
            }
            Reference(variable) => write!(f, "ref {}", variable.name),
            Typeof(ty) => write!(f, "typeof({})", ty),
            Constructor(symbol) => write!(f, "{}()", symbol.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::VariableKind;
    use plover_syntax_tree::SyntaxKind;

    fn int(value: i64) -> BoundExpression {
        BoundExpression::literal(BoundConstant::Int(value), 0..0)
    }

    #[test]
    fn test_binary_folds_on_construction() {
        let op = BoundBinaryOperator::bind(SyntaxKind::Star, &int(6).ty, &int(7).ty).unwrap();
        let product = BoundExpression::binary(int(6), op, int(7), 0..5);
        assert_eq!(product.constant, Some(BoundConstant::Int(42)));
        assert_eq!(product.to_string(), "(6 * 7)");
    }

    #[test]
    fn test_variable_carries_constant() {
        let symbol = Rc::new(
            VariableSymbol::new(
                "limit",
                BoundType::int().with_constant(true),
                VariableKind::Local,
            )
            .with_constant(Some(BoundConstant::Int(10))),
        );
        let expr = BoundExpression::variable(symbol, 0..5);
        assert_eq!(expr.constant, Some(BoundConstant::Int(10)));
        assert!(expr.is_assignable());
    }

    #[test]
    fn test_cast_folds_and_truncates() {
        let value = BoundExpression::literal(BoundConstant::Decimal(3.75), 0..4);
        let cast = BoundExpression::cast(BoundType::int(), value, 0..9);
        assert_eq!(cast.constant, Some(BoundConstant::Int(3)));
    }

    #[test]
    fn test_literal_types() {
        assert!(BoundExpression::literal(BoundConstant::Null, 0..4).ty.is_null_literal());
        assert_eq!(
            BoundExpression::literal(BoundConstant::Bool(true), 0..4).ty,
            BoundType::literal(TypeSymbol::Bool)
        );
    }

    #[test]
    fn test_index_drops_a_dimension() {
        let array = Rc::new(VariableSymbol::new(
            "items",
            BoundType::nullable_int().with_dimensions(1),
            VariableKind::Local,
        ));
        let expr = BoundExpression::index(BoundExpression::variable(array, 0..5), int(0), 0..8);
        assert_eq!(expr.ty, BoundType::nullable_int());
        assert_eq!(expr.root_variable().map(|v| v.name.as_str()), Some("items"));
    }
}
