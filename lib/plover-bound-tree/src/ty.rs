//! Type descriptors for bound nodes.
//!
//! A [`BoundType`] pairs an underlying [`TypeSymbol`] with the qualifiers a
//! binding site carries: nullability, constness, reference semantics and
//! array rank. Values are immutable; adjustments produce a new value through
//! the `with_*` methods.

use std::fmt;

/// The underlying type a [`BoundType`] describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSymbol {
    Any,
    Bool,
    Int,
    Decimal,
    String,
    Void,
    Type,
    /// A user-declared struct, identified by name
    Struct(String),
}

impl TypeSymbol {
    pub fn name(&self) -> &str {
        match self {
            TypeSymbol::Any => "any",
            TypeSymbol::Bool => "bool",
            TypeSymbol::Int => "int",
            TypeSymbol::Decimal => "decimal",
            TypeSymbol::String => "string",
            TypeSymbol::Void => "void",
            TypeSymbol::Type => "type",
            TypeSymbol::Struct(name) => name,
        }
    }

    /// Map a builtin type keyword to its symbol.
    pub fn builtin(name: &str) -> Option<TypeSymbol> {
        let symbol = match name {
            "any" => TypeSymbol::Any,
            "bool" => TypeSymbol::Bool,
            "int" => TypeSymbol::Int,
            "decimal" => TypeSymbol::Decimal,
            "string" => TypeSymbol::String,
            "void" => TypeSymbol::Void,
            "type" => TypeSymbol::Type,
            _ => return None,
        };
        Some(symbol)
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The type of a binding site or expression.
///
/// A missing symbol marks either the error type or the type of the `null`
/// literal (the latter is flagged `is_literal`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BoundType {
    symbol: Option<TypeSymbol>,
    is_implicit: bool,
    is_constant_reference: bool,
    is_reference: bool,
    is_constant: bool,
    is_nullable: bool,
    is_literal: bool,
    dimensions: usize,
}

impl BoundType {
    /// A non-nullable scalar of `symbol` with no qualifiers.
    pub fn new(symbol: TypeSymbol) -> Self {
        Self {
            symbol: Some(symbol),
            ..Self::default()
        }
    }

    /// The type of an expression that failed to bind.
    pub fn error() -> Self {
        Self::default()
    }

    /// The type of a literal of `symbol`.
    pub fn literal(symbol: TypeSymbol) -> Self {
        Self::new(symbol).with_literal(true)
    }

    /// The type of the `null` literal.
    pub fn null_literal() -> Self {
        Self {
            is_literal: true,
            ..Self::default()
        }
    }

    pub fn any() -> Self {
        Self::new(TypeSymbol::Any)
    }

    pub fn bool() -> Self {
        Self::new(TypeSymbol::Bool)
    }

    pub fn int() -> Self {
        Self::new(TypeSymbol::Int)
    }

    pub fn decimal() -> Self {
        Self::new(TypeSymbol::Decimal)
    }

    pub fn string() -> Self {
        Self::new(TypeSymbol::String)
    }

    pub fn void() -> Self {
        Self::new(TypeSymbol::Void)
    }

    pub fn type_() -> Self {
        Self::new(TypeSymbol::Type)
    }

    pub fn nullable_any() -> Self {
        Self::any().nullable()
    }

    pub fn nullable_bool() -> Self {
        Self::bool().nullable()
    }

    pub fn nullable_int() -> Self {
        Self::int().nullable()
    }

    pub fn nullable_decimal() -> Self {
        Self::decimal().nullable()
    }

    pub fn nullable_string() -> Self {
        Self::string().nullable()
    }

    pub fn nullable_type() -> Self {
        Self::type_().nullable()
    }

    pub fn symbol(&self) -> Option<&TypeSymbol> {
        self.symbol.as_ref()
    }

    pub fn is_implicit(&self) -> bool {
        self.is_implicit
    }

    pub fn is_constant_reference(&self) -> bool {
        self.is_constant_reference
    }

    pub fn is_reference(&self) -> bool {
        self.is_reference
    }

    pub fn is_constant(&self) -> bool {
        self.is_constant
    }

    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    pub fn is_literal(&self) -> bool {
        self.is_literal
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// True for the type of an expression that failed to bind.
    pub fn is_error(&self) -> bool {
        self.symbol.is_none() && !self.is_literal
    }

    /// True for the type of the `null` literal.
    pub fn is_null_literal(&self) -> bool {
        self.symbol.is_none() && self.is_literal
    }

    pub fn is_void(&self) -> bool {
        self.symbol == Some(TypeSymbol::Void)
    }

    pub fn is(&self, symbol: &TypeSymbol) -> bool {
        self.symbol.as_ref() == Some(symbol)
    }

    pub fn struct_name(&self) -> Option<&str> {
        match &self.symbol {
            Some(TypeSymbol::Struct(name)) => Some(name),
            _ => None,
        }
    }

    pub fn with_symbol(mut self, symbol: Option<TypeSymbol>) -> Self {
        self.symbol = symbol;
        self
    }

    pub fn with_implicit(mut self, is_implicit: bool) -> Self {
        self.is_implicit = is_implicit;
        self
    }

    /// Override reference qualifiers; `const ref` implies `ref`.
    pub fn with_reference(mut self, is_reference: bool, is_constant_reference: bool) -> Self {
        self.is_reference = is_reference || is_constant_reference;
        self.is_constant_reference = is_constant_reference;
        self
    }

    pub fn with_constant(mut self, is_constant: bool) -> Self {
        self.is_constant = is_constant;
        self
    }

    pub fn with_nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    pub fn with_literal(mut self, is_literal: bool) -> Self {
        self.is_literal = is_literal;
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn nullable(self) -> Self {
        self.with_nullable(true)
    }

    pub fn non_nullable(self) -> Self {
        self.with_nullable(false)
    }

    /// The type of a `ref` expression to a variable of this type.
    pub fn as_reference(self) -> Self {
        self.with_reference(true, false)
    }

    /// The element type of an array, or `None` for scalars.
    pub fn child_type(&self) -> Option<BoundType> {
        if self.dimensions == 0 {
            return None;
        }
        Some(self.clone().with_dimensions(self.dimensions - 1))
    }

    /// The scalar type at the bottom of every dimension.
    pub fn base_type(&self) -> BoundType {
        self.clone().with_dimensions(0)
    }
}

impl fmt::Display for BoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_nullable && !self.is_literal {
            f.write_str("[NotNull]")?;
        }
        if self.is_constant_reference {
            f.write_str("const ")?;
        }
        if self.is_reference {
            f.write_str("ref ")?;
        }
        if self.is_constant {
            f.write_str("const ")?;
        }
        match &self.symbol {
            Some(symbol) => write!(f, "{}", symbol)?,
            None if self.is_literal => f.write_str("null")?,
            None => f.write_str("?")?,
        }
        for _ in 0..self.dimensions {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(BoundType::nullable_int().to_string(), "int");
        assert_eq!(BoundType::int().to_string(), "[NotNull]int");
        assert_eq!(BoundType::literal(TypeSymbol::String).to_string(), "string");
        assert_eq!(BoundType::error().to_string(), "[NotNull]?");
        assert_eq!(BoundType::null_literal().to_string(), "null");

        let ty = BoundType::new(TypeSymbol::Struct("Point".into()))
            .nullable()
            .with_reference(true, true)
            .with_dimensions(2);
        assert_eq!(ty.to_string(), "const ref Point[][]");
    }

    #[test]
    fn test_child_and_base_type() {
        let ty = BoundType::nullable_int().with_dimensions(2);
        let child = ty.child_type().unwrap();
        assert_eq!(child.dimensions(), 1);
        assert_eq!(child.child_type().unwrap().dimensions(), 0);
        assert!(child.child_type().unwrap().child_type().is_none());
        assert_eq!(ty.base_type(), BoundType::nullable_int());
    }

    #[test]
    fn test_copy_with_leaves_original() {
        let original = BoundType::int();
        let widened = original.clone().nullable();
        assert!(!original.is_nullable());
        assert!(widened.is_nullable());
        assert_ne!(original, widened);
    }

    #[test]
    fn test_error_and_null_literal_are_distinct() {
        assert!(BoundType::error().is_error());
        assert!(!BoundType::error().is_null_literal());
        assert!(BoundType::null_literal().is_null_literal());
        assert!(!BoundType::null_literal().is_error());
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(TypeSymbol::builtin("decimal"), Some(TypeSymbol::Decimal));
        assert_eq!(TypeSymbol::builtin("Point"), None);
    }
}
