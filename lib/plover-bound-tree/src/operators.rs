//! Operator tables.
//!
//! Each operator family is a flat table of `(token, operand types) -> result`
//! entries scanned in order. An operand matches an entry when its
//! nullability-stripped type converts implicitly to the entry's type, so
//! `int?` matches an `int` entry. The first match wins, which is why `int`
//! entries come before `decimal` ones.

use plover_syntax_tree::SyntaxKind;

use crate::cast::Cast;
use crate::ty::{BoundType, TypeSymbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    Power,
    LogicalAnd,
    LogicalOr,
    LogicalXor,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    ConditionalAnd,
    ConditionalOr,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
    NullCoalescing,
    Is,
    Isnt,
}

impl BinaryOperatorKind {
    pub fn is_division(self) -> bool {
        matches!(self, BinaryOperatorKind::Division | BinaryOperatorKind::Modulo)
    }

    /// Operators whose meaning is defined for a `null` operand.
    pub fn handles_null(self) -> bool {
        matches!(
            self,
            BinaryOperatorKind::NullCoalescing | BinaryOperatorKind::Is | BinaryOperatorKind::Isnt
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperatorKind {
    NumericalIdentity,
    NumericalNegation,
    BooleanNegation,
    BitwiseComplement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncrementKind {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TernaryOperatorKind {
    Conditional,
}

/// Operand type of a table entry. Kept `Copy` so the tables can be `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    Int,
    Decimal,
    Bool,
    String,
    NullableInt,
    NullableDecimal,
    NullableBool,
    NullableString,
    NullableAny,
}

impl Operand {
    fn ty(self) -> BoundType {
        match self {
            Operand::Int => BoundType::int(),
            Operand::Decimal => BoundType::decimal(),
            Operand::Bool => BoundType::bool(),
            Operand::String => BoundType::string(),
            Operand::NullableInt => BoundType::nullable_int(),
            Operand::NullableDecimal => BoundType::nullable_decimal(),
            Operand::NullableBool => BoundType::nullable_bool(),
            Operand::NullableString => BoundType::nullable_string(),
            Operand::NullableAny => BoundType::nullable_any(),
        }
    }
}

fn matches(operand: &BoundType, entry: Operand) -> bool {
    let stripped = operand.clone().non_nullable();
    Cast::classify(&stripped, &entry.ty()).is_implicit()
}

/// Propagate a nullable operand into the operator's types.
fn lift(ty: BoundType, nullable: bool) -> BoundType {
    if nullable {
        ty.nullable()
    } else {
        ty
    }
}

/// A resolved binary operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundBinaryOperator {
    pub syntax: SyntaxKind,
    pub kind: BinaryOperatorKind,
    pub left_type: BoundType,
    pub right_type: BoundType,
    pub result_type: BoundType,
}

struct BinaryEntry(SyntaxKind, BinaryOperatorKind, Operand, Operand, Operand);

const fn same(syntax: SyntaxKind, kind: BinaryOperatorKind, ty: Operand) -> BinaryEntry {
    BinaryEntry(syntax, kind, ty, ty, ty)
}

const fn compare(syntax: SyntaxKind, kind: BinaryOperatorKind, ty: Operand) -> BinaryEntry {
    BinaryEntry(syntax, kind, ty, ty, Operand::Bool)
}

use BinaryOperatorKind as B;
use SyntaxKind as S;

const BINARY_OPERATORS: &[BinaryEntry] = &[
    // int
    same(S::Plus, B::Addition, Operand::Int),
    same(S::Minus, B::Subtraction, Operand::Int),
    same(S::Star, B::Multiplication, Operand::Int),
    same(S::Slash, B::Division, Operand::Int),
    same(S::StarStar, B::Power, Operand::Int),
    same(S::Ampersand, B::LogicalAnd, Operand::Int),
    same(S::Pipe, B::LogicalOr, Operand::Int),
    same(S::Caret, B::LogicalXor, Operand::Int),
    same(S::LessLess, B::LeftShift, Operand::Int),
    same(S::GreaterGreater, B::RightShift, Operand::Int),
    same(S::GreaterGreaterGreater, B::UnsignedRightShift, Operand::Int),
    compare(S::EqualsEquals, B::Equal, Operand::Int),
    compare(S::BangEquals, B::NotEqual, Operand::Int),
    compare(S::Less, B::Less, Operand::Int),
    compare(S::Greater, B::Greater, Operand::Int),
    compare(S::LessEquals, B::LessOrEqual, Operand::Int),
    compare(S::GreaterEquals, B::GreaterOrEqual, Operand::Int),
    same(S::Percent, B::Modulo, Operand::Int),
    same(S::QuestionQuestion, B::NullCoalescing, Operand::NullableInt),
    // bool
    same(S::AmpersandAmpersand, B::ConditionalAnd, Operand::Bool),
    same(S::PipePipe, B::ConditionalOr, Operand::Bool),
    same(S::Ampersand, B::LogicalAnd, Operand::Bool),
    same(S::Pipe, B::LogicalOr, Operand::Bool),
    same(S::Caret, B::LogicalXor, Operand::Bool),
    compare(S::EqualsEquals, B::Equal, Operand::Bool),
    compare(S::BangEquals, B::NotEqual, Operand::Bool),
    same(S::QuestionQuestion, B::NullCoalescing, Operand::NullableBool),
    // string
    same(S::Plus, B::Addition, Operand::String),
    compare(S::EqualsEquals, B::Equal, Operand::String),
    compare(S::BangEquals, B::NotEqual, Operand::String),
    same(S::QuestionQuestion, B::NullCoalescing, Operand::NullableString),
    // decimal
    same(S::Plus, B::Addition, Operand::Decimal),
    same(S::Minus, B::Subtraction, Operand::Decimal),
    same(S::Star, B::Multiplication, Operand::Decimal),
    same(S::Slash, B::Division, Operand::Decimal),
    same(S::StarStar, B::Power, Operand::Decimal),
    compare(S::EqualsEquals, B::Equal, Operand::Decimal),
    compare(S::BangEquals, B::NotEqual, Operand::Decimal),
    compare(S::Less, B::Less, Operand::Decimal),
    compare(S::Greater, B::Greater, Operand::Decimal),
    compare(S::LessEquals, B::LessOrEqual, Operand::Decimal),
    compare(S::GreaterEquals, B::GreaterOrEqual, Operand::Decimal),
    same(S::Percent, B::Modulo, Operand::Decimal),
    same(S::QuestionQuestion, B::NullCoalescing, Operand::NullableDecimal),
    // any
    compare(S::Is, B::Is, Operand::NullableAny),
    compare(S::Isnt, B::Isnt, Operand::NullableAny),
];

impl BoundBinaryOperator {
    /// Resolve `syntax` applied to operands of the given types.
    pub fn bind(syntax: SyntaxKind, left: &BoundType, right: &BoundType) -> Option<Self> {
        let entry = BINARY_OPERATORS.iter().find(|entry| {
            entry.0 == syntax && matches(left, entry.2) && matches(right, entry.3)
        })?;

        let nullable =
            !entry.1.handles_null() && (left.is_nullable() || right.is_nullable());

        Some(Self {
            syntax,
            kind: entry.1,
            left_type: lift(entry.2.ty(), nullable),
            right_type: lift(entry.3.ty(), nullable),
            result_type: lift(entry.4.ty(), nullable),
        })
    }
}

/// A resolved unary operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundUnaryOperator {
    pub syntax: SyntaxKind,
    pub kind: UnaryOperatorKind,
    pub operand_type: BoundType,
    pub result_type: BoundType,
}

const UNARY_OPERATORS: &[(SyntaxKind, UnaryOperatorKind, Operand)] = &[
    (S::Plus, UnaryOperatorKind::NumericalIdentity, Operand::Int),
    (S::Minus, UnaryOperatorKind::NumericalNegation, Operand::Int),
    (S::Tilde, UnaryOperatorKind::BitwiseComplement, Operand::Int),
    (S::Bang, UnaryOperatorKind::BooleanNegation, Operand::Bool),
    (S::Plus, UnaryOperatorKind::NumericalIdentity, Operand::Decimal),
    (S::Minus, UnaryOperatorKind::NumericalNegation, Operand::Decimal),
];

impl BoundUnaryOperator {
    pub fn bind(syntax: SyntaxKind, operand: &BoundType) -> Option<Self> {
        let (_, kind, ty) = UNARY_OPERATORS
            .iter()
            .find(|(entry, _, ty)| *entry == syntax && matches(operand, *ty))?;

        let ty = lift(ty.ty(), operand.is_nullable());
        Some(Self {
            syntax,
            kind: *kind,
            operand_type: ty.clone(),
            result_type: ty,
        })
    }
}

/// A resolved `++` or `--`, prefix or postfix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundIncrementOperator {
    pub syntax: SyntaxKind,
    pub kind: IncrementKind,
    pub operand_type: BoundType,
}

const INCREMENT_OPERATORS: &[(SyntaxKind, IncrementKind, Operand)] = &[
    (S::PlusPlus, IncrementKind::Increment, Operand::Int),
    (S::MinusMinus, IncrementKind::Decrement, Operand::Int),
    (S::PlusPlus, IncrementKind::Increment, Operand::Decimal),
    (S::MinusMinus, IncrementKind::Decrement, Operand::Decimal),
];

impl BoundIncrementOperator {
    pub fn bind(syntax: SyntaxKind, operand: &BoundType) -> Option<Self> {
        let (_, kind, ty) = INCREMENT_OPERATORS
            .iter()
            .find(|(entry, _, ty)| *entry == syntax && matches(operand, *ty))?;

        Some(Self {
            syntax,
            kind: *kind,
            operand_type: lift(ty.ty(), operand.is_nullable()),
        })
    }

    /// The binary operator token this increment applies with a `1` operand.
    pub fn binary_syntax(&self) -> SyntaxKind {
        match self.kind {
            IncrementKind::Increment => SyntaxKind::Plus,
            IncrementKind::Decrement => SyntaxKind::Minus,
        }
    }

    /// The binary operator token that undoes this increment.
    pub fn reverse_syntax(&self) -> SyntaxKind {
        match self.kind {
            IncrementKind::Increment => SyntaxKind::Minus,
            IncrementKind::Decrement => SyntaxKind::Plus,
        }
    }
}

/// A resolved ternary operator. The result has the center operand's type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundTernaryOperator {
    pub left_syntax: SyntaxKind,
    pub right_syntax: SyntaxKind,
    pub kind: TernaryOperatorKind,
    pub left_type: BoundType,
    pub center_type: BoundType,
    pub right_type: BoundType,
    pub result_type: BoundType,
}

/// Entry operand types; `None` accepts any operand.
const TERNARY_OPERATORS: &[(SyntaxKind, SyntaxKind, TernaryOperatorKind, Option<Operand>)] = &[(
    S::Question,
    S::Colon,
    TernaryOperatorKind::Conditional,
    Some(Operand::Bool),
)];

impl BoundTernaryOperator {
    pub fn bind(
        left_syntax: SyntaxKind,
        right_syntax: SyntaxKind,
        left: &BoundType,
        center: &BoundType,
        right: &BoundType,
    ) -> Option<Self> {
        let (_, _, kind, condition) = TERNARY_OPERATORS.iter().find(|(l, r, _, condition)| {
            *l == left_syntax
                && *r == right_syntax
                && condition.map_or(true, |ty| matches(left, ty))
        })?;

        Some(Self {
            left_syntax,
            right_syntax,
            kind: *kind,
            left_type: condition.map_or_else(|| left.clone(), |ty| ty.ty()),
            center_type: center.clone(),
            right_type: right.clone(),
            result_type: center.clone(),
        })
    }
}

/// Whether `ty` is a scalar that an increment can apply to.
pub fn is_numeric(ty: &BoundType) -> bool {
    ty.dimensions() == 0 && (ty.is(&TypeSymbol::Int) || ty.is(&TypeSymbol::Decimal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_addition() {
        let op = BoundBinaryOperator::bind(S::Plus, &BoundType::int(), &BoundType::int()).unwrap();
        assert_eq!(op.kind, B::Addition);
        assert_eq!(op.result_type, BoundType::int());
    }

    #[test]
    fn test_mixed_numeric_resolves_to_decimal() {
        let op = BoundBinaryOperator::bind(S::Plus, &BoundType::int(), &BoundType::decimal())
            .unwrap();
        assert_eq!(op.result_type, BoundType::decimal());
    }

    #[test]
    fn test_nullable_operand_matches_and_lifts() {
        let op = BoundBinaryOperator::bind(
            S::Less,
            &BoundType::nullable_int(),
            &BoundType::literal(TypeSymbol::Int),
        )
        .unwrap();
        assert_eq!(op.kind, B::Less);
        assert_eq!(op.result_type, BoundType::nullable_bool());
    }

    #[test]
    fn test_string_concatenation() {
        let op = BoundBinaryOperator::bind(S::Plus, &BoundType::string(), &BoundType::string())
            .unwrap();
        assert_eq!(op.result_type, BoundType::string());
        assert!(
            BoundBinaryOperator::bind(S::Minus, &BoundType::string(), &BoundType::string())
                .is_none()
        );
    }

    #[test]
    fn test_no_operator_for_bool_plus_int() {
        assert!(BoundBinaryOperator::bind(S::Plus, &BoundType::bool(), &BoundType::int()).is_none());
    }

    #[test]
    fn test_is_accepts_any_operand() {
        let op = BoundBinaryOperator::bind(
            S::Is,
            &BoundType::nullable_string(),
            &BoundType::null_literal(),
        )
        .unwrap();
        assert_eq!(op.kind, B::Is);
        assert_eq!(op.result_type, BoundType::bool());
    }

    #[test]
    fn test_unary_table() {
        let op = BoundUnaryOperator::bind(S::Minus, &BoundType::decimal()).unwrap();
        assert_eq!(op.kind, UnaryOperatorKind::NumericalNegation);
        assert_eq!(op.result_type, BoundType::decimal());
        assert!(BoundUnaryOperator::bind(S::Bang, &BoundType::int()).is_none());
        assert!(BoundUnaryOperator::bind(S::Tilde, &BoundType::decimal()).is_none());
    }

    #[test]
    fn test_increment_table() {
        let op = BoundIncrementOperator::bind(S::PlusPlus, &BoundType::nullable_int()).unwrap();
        assert_eq!(op.operand_type, BoundType::nullable_int());
        assert_eq!(op.binary_syntax(), S::Plus);
        assert!(BoundIncrementOperator::bind(S::MinusMinus, &BoundType::string()).is_none());
    }

    #[test]
    fn test_ternary_requires_bool_condition() {
        let op = BoundTernaryOperator::bind(
            S::Question,
            S::Colon,
            &BoundType::nullable_bool(),
            &BoundType::string(),
            &BoundType::string(),
        )
        .unwrap();
        assert_eq!(op.result_type, BoundType::string());

        assert!(BoundTernaryOperator::bind(
            S::Question,
            S::Colon,
            &BoundType::int(),
            &BoundType::string(),
            &BoundType::string(),
        )
        .is_none());
    }
}
