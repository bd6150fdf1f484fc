//! Constant folding.
//!
//! Folding never fails loudly: an operation that would trap at run time
//! (overflow, division by zero) simply produces no constant, and the
//! expression is left for evaluation.

use crate::constant::BoundConstant;
use crate::operators::{
    BinaryOperatorKind, BoundBinaryOperator, BoundTernaryOperator, BoundUnaryOperator,
    UnaryOperatorKind,
};

/// Fold a binary operator. Either side may be unknown; `&&` and `||`
/// still fold when the known side decides the result.
pub fn fold_binary(
    op: &BoundBinaryOperator,
    left: Option<&BoundConstant>,
    right: Option<&BoundConstant>,
) -> Option<BoundConstant> {
    use BinaryOperatorKind::*;

    match op.kind {
        ConditionalAnd => {
            let decided = [left, right]
                .into_iter()
                .flatten()
                .any(|c| c.as_bool() == Some(false));
            if decided {
                return Some(BoundConstant::Bool(false));
            }
        }
        ConditionalOr => {
            let decided = [left, right]
                .into_iter()
                .flatten()
                .any(|c| c.as_bool() == Some(true));
            if decided {
                return Some(BoundConstant::Bool(true));
            }
        }
        _ => {}
    }

    let (left, right) = (left?, right?);

    match op.kind {
        NullCoalescing => {
            return Some(if left.is_null() { right.clone() } else { left.clone() });
        }
        Is => return Some(BoundConstant::Bool(left.is_null() == right.is_null())),
        Isnt => return Some(BoundConstant::Bool(left.is_null() != right.is_null())),
        _ => {}
    }

    if left.is_null() || right.is_null() {
        return Some(BoundConstant::Null);
    }

    let operand = op.left_type.symbol()?;
    let left = left.convert(operand)?;
    let right = right.convert(operand)?;

    match (&left, &right) {
        (BoundConstant::Int(l), BoundConstant::Int(r)) => fold_int(op.kind, *l, *r),
        (BoundConstant::Decimal(l), BoundConstant::Decimal(r)) => fold_decimal(op.kind, *l, *r),
        (BoundConstant::Bool(l), BoundConstant::Bool(r)) => fold_bool(op.kind, *l, *r),
        (BoundConstant::String(l), BoundConstant::String(r)) => fold_string(op.kind, l, r),
        _ => None,
    }
}

fn fold_int(kind: BinaryOperatorKind, l: i64, r: i64) -> Option<BoundConstant> {
    use BinaryOperatorKind::*;

    let value = match kind {
        Addition => l.checked_add(r)?,
        Subtraction => l.checked_sub(r)?,
        Multiplication => l.checked_mul(r)?,
        Division => l.checked_div(r)?,
        Modulo => l.checked_rem(r)?,
        Power => {
            let exponent = u32::try_from(r).ok()?;
            l.checked_pow(exponent)?
        }
        LogicalAnd => l & r,
        LogicalOr => l | r,
        LogicalXor => l ^ r,
        LeftShift => l.checked_shl(u32::try_from(r).ok()?)?,
        RightShift => l.checked_shr(u32::try_from(r).ok()?)?,
        UnsignedRightShift => (l as u64).checked_shr(u32::try_from(r).ok()?)? as i64,
        Equal => return Some(BoundConstant::Bool(l == r)),
        NotEqual => return Some(BoundConstant::Bool(l != r)),
        Less => return Some(BoundConstant::Bool(l < r)),
        Greater => return Some(BoundConstant::Bool(l > r)),
        LessOrEqual => return Some(BoundConstant::Bool(l <= r)),
        GreaterOrEqual => return Some(BoundConstant::Bool(l >= r)),
        _ => return None,
    };
    Some(BoundConstant::Int(value))
}

fn fold_decimal(kind: BinaryOperatorKind, l: f64, r: f64) -> Option<BoundConstant> {
    use BinaryOperatorKind::*;

    let value = match kind {
        Addition => l + r,
        Subtraction => l - r,
        Multiplication => l * r,
        Division if r == 0.0 => return None,
        Division => l / r,
        Modulo if r == 0.0 => return None,
        Modulo => l % r,
        Power => l.powf(r),
        Equal => return Some(BoundConstant::Bool(l == r)),
        NotEqual => return Some(BoundConstant::Bool(l != r)),
        Less => return Some(BoundConstant::Bool(l < r)),
        Greater => return Some(BoundConstant::Bool(l > r)),
        LessOrEqual => return Some(BoundConstant::Bool(l <= r)),
        GreaterOrEqual => return Some(BoundConstant::Bool(l >= r)),
        _ => return None,
    };
    value.is_finite().then_some(BoundConstant::Decimal(value))
}

fn fold_bool(kind: BinaryOperatorKind, l: bool, r: bool) -> Option<BoundConstant> {
    use BinaryOperatorKind::*;

    let value = match kind {
        ConditionalAnd | LogicalAnd => l & r,
        ConditionalOr | LogicalOr => l | r,
        LogicalXor => l ^ r,
        Equal => l == r,
        NotEqual => l != r,
        _ => return None,
    };
    Some(BoundConstant::Bool(value))
}

fn fold_string(kind: BinaryOperatorKind, l: &str, r: &str) -> Option<BoundConstant> {
    match kind {
        BinaryOperatorKind::Addition => Some(BoundConstant::String(format!("{}{}", l, r))),
        BinaryOperatorKind::Equal => Some(BoundConstant::Bool(l == r)),
        BinaryOperatorKind::NotEqual => Some(BoundConstant::Bool(l != r)),
        _ => None,
    }
}

/// Fold a unary operator applied to a constant operand.
pub fn fold_unary(op: &BoundUnaryOperator, operand: &BoundConstant) -> Option<BoundConstant> {
    if operand.is_null() {
        return Some(BoundConstant::Null);
    }

    let operand = operand.convert(op.operand_type.symbol()?)?;

    match (op.kind, operand) {
        (UnaryOperatorKind::NumericalIdentity, value) => Some(value),
        (UnaryOperatorKind::NumericalNegation, BoundConstant::Int(value)) => {
            value.checked_neg().map(BoundConstant::Int)
        }
        (UnaryOperatorKind::NumericalNegation, BoundConstant::Decimal(value)) => {
            Some(BoundConstant::Decimal(-value))
        }
        (UnaryOperatorKind::BooleanNegation, BoundConstant::Bool(value)) => {
            Some(BoundConstant::Bool(!value))
        }
        (UnaryOperatorKind::BitwiseComplement, BoundConstant::Int(value)) => {
            Some(BoundConstant::Int(!value))
        }
        _ => None,
    }
}

/// Fold a conditional whose condition and chosen branch are constant.
pub fn fold_ternary(
    op: &BoundTernaryOperator,
    condition: Option<&BoundConstant>,
    center: Option<&BoundConstant>,
    right: Option<&BoundConstant>,
) -> Option<BoundConstant> {
    let chosen = if condition?.as_bool()? { center } else { right };
    let value = chosen?;

    match op.result_type.symbol() {
        Some(symbol) if !value.is_null() => value.convert(symbol),
        _ => Some(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::BoundType;
    use plover_syntax_tree::SyntaxKind;

    fn binary(syntax: SyntaxKind, left: BoundType, right: BoundType) -> BoundBinaryOperator {
        BoundBinaryOperator::bind(syntax, &left, &right).unwrap()
    }

    fn int_op(syntax: SyntaxKind) -> BoundBinaryOperator {
        binary(syntax, BoundType::int(), BoundType::int())
    }

    #[test]
    fn test_integer_arithmetic() {
        let fold = |syntax, l, r| {
            fold_binary(
                &int_op(syntax),
                Some(&BoundConstant::Int(l)),
                Some(&BoundConstant::Int(r)),
            )
        };
        assert_eq!(fold(SyntaxKind::Plus, 2, 3), Some(BoundConstant::Int(5)));
        assert_eq!(fold(SyntaxKind::Star, 6, 7), Some(BoundConstant::Int(42)));
        assert_eq!(fold(SyntaxKind::Slash, -7, 2), Some(BoundConstant::Int(-3)));
        assert_eq!(fold(SyntaxKind::StarStar, 2, 10), Some(BoundConstant::Int(1024)));
        assert_eq!(fold(SyntaxKind::GreaterGreaterGreater, -1, 60), Some(BoundConstant::Int(15)));
        assert_eq!(fold(SyntaxKind::Less, 1, 2), Some(BoundConstant::Bool(true)));
    }

    #[test]
    fn test_division_by_zero_does_not_fold() {
        let five = BoundConstant::Int(5);
        let zero = BoundConstant::Int(0);
        assert_eq!(fold_binary(&int_op(SyntaxKind::Slash), Some(&five), Some(&zero)), None);
        assert_eq!(fold_binary(&int_op(SyntaxKind::Percent), Some(&five), Some(&zero)), None);

        let op = binary(SyntaxKind::Slash, BoundType::decimal(), BoundType::decimal());
        let zero = BoundConstant::Decimal(0.0);
        assert_eq!(fold_binary(&op, Some(&five), Some(&zero)), None);
    }

    #[test]
    fn test_overflow_does_not_fold() {
        let max = BoundConstant::Int(i64::MAX);
        let one = BoundConstant::Int(1);
        assert_eq!(fold_binary(&int_op(SyntaxKind::Plus), Some(&max), Some(&one)), None);
        assert_eq!(
            fold_binary(
                &int_op(SyntaxKind::StarStar),
                Some(&BoundConstant::Int(2)),
                Some(&BoundConstant::Int(-1))
            ),
            None
        );
    }

    #[test]
    fn test_short_circuit_with_unknown_side() {
        let and = binary(SyntaxKind::AmpersandAmpersand, BoundType::bool(), BoundType::bool());
        let or = binary(SyntaxKind::PipePipe, BoundType::bool(), BoundType::bool());
        let f = BoundConstant::Bool(false);
        let t = BoundConstant::Bool(true);

        assert_eq!(fold_binary(&and, None, Some(&f)), Some(f.clone()));
        assert_eq!(fold_binary(&and, Some(&f), None), Some(f.clone()));
        assert_eq!(fold_binary(&and, Some(&t), None), None);
        assert_eq!(fold_binary(&or, None, Some(&t)), Some(t.clone()));
        assert_eq!(fold_binary(&or, Some(&f), None), None);
    }

    #[test]
    fn test_null_handling() {
        let op = int_op(SyntaxKind::Plus);
        assert_eq!(
            fold_binary(&op, Some(&BoundConstant::Null), Some(&BoundConstant::Int(1))),
            Some(BoundConstant::Null)
        );

        let coalesce = binary(
            SyntaxKind::QuestionQuestion,
            BoundType::nullable_int(),
            BoundType::int(),
        );
        assert_eq!(
            fold_binary(&coalesce, Some(&BoundConstant::Null), Some(&BoundConstant::Int(4))),
            Some(BoundConstant::Int(4))
        );

        let is = binary(SyntaxKind::Is, BoundType::nullable_int(), BoundType::null_literal());
        assert_eq!(
            fold_binary(&is, Some(&BoundConstant::Int(3)), Some(&BoundConstant::Null)),
            Some(BoundConstant::Bool(false))
        );
        assert_eq!(
            fold_binary(&is, Some(&BoundConstant::Null), Some(&BoundConstant::Null)),
            Some(BoundConstant::Bool(true))
        );
    }

    #[test]
    fn test_mixed_operands_use_operator_type() {
        let op = binary(SyntaxKind::Plus, BoundType::int(), BoundType::decimal());
        assert_eq!(
            fold_binary(&op, Some(&BoundConstant::Int(1)), Some(&BoundConstant::Decimal(0.5))),
            Some(BoundConstant::Decimal(1.5))
        );
    }

    #[test]
    fn test_string_concatenation() {
        let op = binary(SyntaxKind::Plus, BoundType::string(), BoundType::string());
        assert_eq!(
            fold_binary(
                &op,
                Some(&BoundConstant::String("ab".into())),
                Some(&BoundConstant::String("cd".into()))
            ),
            Some(BoundConstant::String("abcd".into()))
        );
    }

    #[test]
    fn test_unary() {
        let neg = BoundUnaryOperator::bind(SyntaxKind::Minus, &BoundType::int()).unwrap();
        assert_eq!(fold_unary(&neg, &BoundConstant::Int(4)), Some(BoundConstant::Int(-4)));
        assert_eq!(fold_unary(&neg, &BoundConstant::Int(i64::MIN)), None);
        assert_eq!(fold_unary(&neg, &BoundConstant::Null), Some(BoundConstant::Null));

        let not = BoundUnaryOperator::bind(SyntaxKind::Bang, &BoundType::bool()).unwrap();
        assert_eq!(
            fold_unary(&not, &BoundConstant::Bool(true)),
            Some(BoundConstant::Bool(false))
        );
    }

    #[test]
    fn test_ternary() {
        let op = BoundTernaryOperator::bind(
            SyntaxKind::Question,
            SyntaxKind::Colon,
            &BoundType::bool(),
            &BoundType::int(),
            &BoundType::int(),
        )
        .unwrap();
        let t = BoundConstant::Bool(true);
        let one = BoundConstant::Int(1);
        let two = BoundConstant::Int(2);

        assert_eq!(fold_ternary(&op, Some(&t), Some(&one), None), Some(one.clone()));
        assert_eq!(fold_ternary(&op, Some(&t), None, Some(&two)), None);
        assert_eq!(fold_ternary(&op, None, Some(&one), Some(&two)), None);
    }
}
