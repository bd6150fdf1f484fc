//! Conversion classification between bound types.

use crate::ty::{BoundType, TypeSymbol};

/// How a value of one type converts to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cast {
    /// No conversion exists
    None,
    /// Same type, nothing to do
    Identity,
    /// Allowed without a cast expression
    Implicit,
    /// Requires a cast expression
    Explicit,
}

impl Cast {
    /// Classify the conversion from `from` to `to`.
    ///
    /// The underlying type table is consulted first; nullability can only
    /// adjust a conversion that already exists. Literal values are exempt from
    /// the widening rule on the source side and from the narrowing rule on the
    /// target side.
    pub fn classify(from: &BoundType, to: &BoundType) -> Cast {
        let Some(from_symbol) = from.symbol() else {
            return Cast::Identity;
        };

        if from.dimensions() != to.dimensions() {
            return Cast::None;
        }

        let mut cast = match to.symbol() {
            Some(to_symbol) => classify_symbols(from_symbol, to_symbol),
            None => Cast::None,
        };

        if cast == Cast::None {
            return cast;
        }

        if !from.is_literal() && !from.is_nullable() && to.is_nullable() && cast != Cast::Explicit {
            cast = Cast::Implicit;
        }

        if from.is_nullable() && !to.is_nullable() && !to.is_literal() {
            cast = Cast::Explicit;
        }

        cast
    }

    pub fn exists(self) -> bool {
        self != Cast::None
    }

    pub fn is_identity(self) -> bool {
        self == Cast::Identity
    }

    /// Identity counts as implicit.
    pub fn is_implicit(self) -> bool {
        matches!(self, Cast::Identity | Cast::Implicit)
    }

    pub fn is_explicit(self) -> bool {
        self == Cast::Explicit
    }
}

fn classify_symbols(from: &TypeSymbol, to: &TypeSymbol) -> Cast {
    use TypeSymbol::*;

    if from == to {
        return Cast::Identity;
    }

    match (from, to) {
        (Void, _) | (_, Void) => Cast::None,
        (_, Any) => Cast::Implicit,
        (Any, _) => Cast::Explicit,
        (Bool | Int | Decimal, String) => Cast::Explicit,
        (String, Bool | Int | Decimal) => Cast::Explicit,
        (Int, Decimal) => Cast::Implicit,
        (Decimal, Int) => Cast::Explicit,
        _ => Cast::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_types() -> Vec<BoundType> {
        let symbols = [
            TypeSymbol::Any,
            TypeSymbol::Bool,
            TypeSymbol::Int,
            TypeSymbol::Decimal,
            TypeSymbol::String,
            TypeSymbol::Void,
            TypeSymbol::Type,
            TypeSymbol::Struct("Point".into()),
        ];

        let mut types = Vec::new();
        for symbol in symbols {
            let base = BoundType::new(symbol);
            types.push(base.clone());
            types.push(base.clone().nullable());
            types.push(base.clone().with_literal(true));
            types.push(base.with_dimensions(1));
        }
        types
    }

    #[test]
    fn test_identity_on_identical_types() {
        for ty in all_types() {
            assert_eq!(Cast::classify(&ty, &ty), Cast::Identity, "{}", ty);
        }
    }

    #[test]
    fn test_int_decimal_asymmetry() {
        assert_eq!(
            Cast::classify(&BoundType::int(), &BoundType::decimal()),
            Cast::Implicit
        );
        assert_eq!(
            Cast::classify(&BoundType::decimal(), &BoundType::int()),
            Cast::Explicit
        );
    }

    #[test]
    fn test_any_rules() {
        assert_eq!(
            Cast::classify(&BoundType::string(), &BoundType::any()),
            Cast::Implicit
        );
        assert_eq!(
            Cast::classify(&BoundType::any(), &BoundType::bool()),
            Cast::Explicit
        );
        assert_eq!(
            Cast::classify(&BoundType::void(), &BoundType::any()),
            Cast::None
        );
    }

    #[test]
    fn test_string_conversions_are_explicit() {
        for ty in [BoundType::bool(), BoundType::int(), BoundType::decimal()] {
            assert_eq!(Cast::classify(&ty, &BoundType::string()), Cast::Explicit);
            assert_eq!(Cast::classify(&BoundType::string(), &ty), Cast::Explicit);
        }
    }

    #[test]
    fn test_unrelated_types() {
        assert_eq!(
            Cast::classify(&BoundType::bool(), &BoundType::int()),
            Cast::None
        );
        let point = BoundType::new(TypeSymbol::Struct("Point".into()));
        let size = BoundType::new(TypeSymbol::Struct("Size".into()));
        assert_eq!(Cast::classify(&point, &size), Cast::None);
    }

    #[test]
    fn test_missing_source_symbol_is_identity() {
        assert_eq!(
            Cast::classify(&BoundType::error(), &BoundType::int()),
            Cast::Identity
        );
        assert_eq!(
            Cast::classify(&BoundType::null_literal(), &BoundType::string()),
            Cast::Identity
        );
    }

    #[test]
    fn test_widening_into_nullable() {
        assert_eq!(
            Cast::classify(&BoundType::int(), &BoundType::nullable_int()),
            Cast::Implicit
        );
        assert_eq!(
            Cast::classify(&BoundType::literal(TypeSymbol::Int), &BoundType::nullable_int()),
            Cast::Identity
        );
        assert_eq!(
            Cast::classify(&BoundType::any(), &BoundType::nullable_int()),
            Cast::Explicit
        );
    }

    #[test]
    fn test_narrowing_forces_explicit() {
        assert_eq!(
            Cast::classify(&BoundType::nullable_int(), &BoundType::int()),
            Cast::Explicit
        );
        assert_eq!(
            Cast::classify(&BoundType::nullable_int(), &BoundType::decimal()),
            Cast::Explicit
        );
        assert_eq!(
            Cast::classify(
                &BoundType::nullable_int(),
                &BoundType::literal(TypeSymbol::Int)
            ),
            Cast::Identity
        );
    }

    #[test]
    fn test_nullable_decimal_to_int_is_not_implicit() {
        let cast = Cast::classify(&BoundType::nullable_decimal(), &BoundType::int());
        assert!(!cast.is_implicit());
    }

    #[test]
    fn test_dimensions_must_match() {
        let array = BoundType::nullable_int().with_dimensions(1);
        assert_eq!(
            Cast::classify(&array, &BoundType::nullable_int()),
            Cast::None
        );
    }

    #[test]
    fn test_classify_is_total() {
        for from in all_types() {
            for to in all_types() {
                let cast = Cast::classify(&from, &to);
                assert!(!(cast.is_explicit() && cast.is_implicit()));
            }
        }
    }
}
