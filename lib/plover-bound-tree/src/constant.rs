//! Compile-time constant values.

use std::fmt;

use crate::ty::TypeSymbol;

/// A value known at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundConstant {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(f64),
    String(String),
}

impl BoundConstant {
    pub fn is_null(&self) -> bool {
        matches!(self, BoundConstant::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BoundConstant::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Integer view of a numeric constant. Decimals truncate toward zero.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            BoundConstant::Int(value) => Some(*value),
            BoundConstant::Decimal(value) => truncate(*value),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            BoundConstant::Int(value) => Some(*value as f64),
            BoundConstant::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            BoundConstant::String(value) => Some(value),
            _ => None,
        }
    }

    /// True for an integer or decimal zero.
    pub fn is_zero(&self) -> bool {
        match self {
            BoundConstant::Int(value) => *value == 0,
            BoundConstant::Decimal(value) => *value == 0.0,
            _ => false,
        }
    }

    /// Convert to the representation of `target`, as a cast would at run time.
    ///
    /// Returns `None` when the conversion cannot be decided statically, such
    /// as parsing a string that is not a number.
    pub fn convert(&self, target: &TypeSymbol) -> Option<BoundConstant> {
        if self.is_null() {
            return Some(BoundConstant::Null);
        }

        match target {
            TypeSymbol::Any => Some(self.clone()),
            TypeSymbol::Bool => match self {
                BoundConstant::Bool(_) => Some(self.clone()),
                BoundConstant::String(text) => match text.as_str() {
                    "true" => Some(BoundConstant::Bool(true)),
                    "false" => Some(BoundConstant::Bool(false)),
                    _ => None,
                },
                _ => None,
            },
            TypeSymbol::Int => match self {
                BoundConstant::String(text) => text.trim().parse().ok().map(BoundConstant::Int),
                _ => self.as_int().map(BoundConstant::Int),
            },
            TypeSymbol::Decimal => match self {
                BoundConstant::String(text) => {
                    text.trim().parse().ok().map(BoundConstant::Decimal)
                }
                _ => self.as_decimal().map(BoundConstant::Decimal),
            },
            TypeSymbol::String => Some(BoundConstant::String(self.to_string())),
            TypeSymbol::Void | TypeSymbol::Type | TypeSymbol::Struct(_) => None,
        }
    }
}

/// Truncate toward zero, rejecting values outside the integer range.
pub fn truncate(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

impl fmt::Display for BoundConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundConstant::Null => f.write_str("null"),
            BoundConstant::Bool(value) => write!(f, "{}", value),
            BoundConstant::Int(value) => write!(f, "{}", value),
            BoundConstant::Decimal(value) => write!(f, "{}", value),
            BoundConstant::String(value) => f.write_str(value),
        }
    }
}
