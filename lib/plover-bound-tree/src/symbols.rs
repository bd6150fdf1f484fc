//! Declared entities: variables, functions and structs.
//!
//! Symbols are created once while binding their declaration and are never
//! mutated afterwards. They are shared through `Rc` by every bound node that
//! refers to them.

use std::fmt;
use std::rc::Rc;

use plover_syntax_tree::ast::{FunctionNode, StructDeclaration};

use crate::constant::BoundConstant;
use crate::expr::BoundExpression;
use crate::ty::{BoundType, TypeSymbol};

/// Where a variable lives.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableKind {
    Global,
    Local,
    Parameter {
        ordinal: usize,
        default: Option<Box<BoundExpression>>,
    },
    Field,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableSymbol {
    pub name: String,
    pub ty: BoundType,
    pub kind: VariableKind,
    /// Folded value, recorded only for `const` variables
    pub constant: Option<BoundConstant>,
}

impl VariableSymbol {
    pub fn new(name: impl Into<String>, ty: BoundType, kind: VariableKind) -> Self {
        Self {
            name: name.into(),
            ty,
            kind,
            constant: None,
        }
    }

    pub fn parameter(name: impl Into<String>, ty: BoundType, ordinal: usize) -> Self {
        Self::new(
            name,
            ty,
            VariableKind::Parameter {
                ordinal,
                default: None,
            },
        )
    }

    pub fn with_constant(mut self, constant: Option<BoundConstant>) -> Self {
        self.constant = constant;
        self
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, VariableKind::Parameter { .. })
    }

    pub fn is_global(&self) -> bool {
        matches!(self.kind, VariableKind::Global)
    }

    pub fn default_value(&self) -> Option<&BoundExpression> {
        match &self.kind {
            VariableKind::Parameter { default, .. } => default.as_deref(),
            _ => None,
        }
    }

    /// Capture parameters are synthesized with a `$` prefix.
    pub fn is_capture(&self) -> bool {
        self.name.starts_with('$')
    }
}

impl fmt::Display for VariableSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}

/// Syntax a function was declared from, kept so its body can be bound later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionDeclarationRef {
    pub node: FunctionNode,
    pub file_id: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSymbol {
    pub name: String,
    pub parameters: Vec<Rc<VariableSymbol>>,
    pub return_type: BoundType,
    pub declaration: Option<FunctionDeclarationRef>,
}

impl FunctionSymbol {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<Rc<VariableSymbol>>,
        return_type: BoundType,
        declaration: Option<FunctionDeclarationRef>,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            declaration,
        }
    }

    /// Same name and the same parameter types, in order.
    pub fn signature_matches(&self, other: &FunctionSymbol) -> bool {
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.ty == b.ty)
    }

    pub fn is_builtin(&self) -> bool {
        self.declaration.is_none()
    }

    /// Parameters a caller has to supply, excluding capture parameters.
    pub fn visible_parameters(&self) -> impl Iterator<Item = &Rc<VariableSymbol>> {
        self.parameters.iter().filter(|p| !p.is_capture())
    }

    pub fn capture_parameters(&self) -> impl Iterator<Item = &Rc<VariableSymbol>> {
        self.parameters.iter().filter(|p| p.is_capture())
    }
}

impl fmt::Display for FunctionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", parameter.ty)?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructDeclarationRef {
    pub node: StructDeclaration,
    pub file_id: usize,
}

/// A user-declared struct. Its fields are kept alongside, not on the symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructSymbol {
    pub name: String,
    pub declaration: Option<StructDeclarationRef>,
}

impl StructSymbol {
    pub fn new(name: impl Into<String>, declaration: Option<StructDeclarationRef>) -> Self {
        Self {
            name: name.into(),
            declaration,
        }
    }

    pub fn type_symbol(&self) -> TypeSymbol {
        TypeSymbol::Struct(self.name.clone())
    }
}

impl fmt::Display for StructSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A struct together with its ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StructMembers {
    pub symbol: Rc<StructSymbol>,
    pub fields: Vec<Rc<VariableSymbol>>,
}

impl StructMembers {
    pub fn field(&self, name: &str) -> Option<&Rc<VariableSymbol>> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str, params: &[BoundType]) -> FunctionSymbol {
        let parameters = params
            .iter()
            .enumerate()
            .map(|(i, ty)| Rc::new(VariableSymbol::parameter(format!("p{}", i), ty.clone(), i)))
            .collect();
        FunctionSymbol::new(name, parameters, BoundType::void(), None)
    }

    #[test]
    fn test_signature_identity() {
        let a = function("f", &[BoundType::nullable_int()]);
        let b = function("f", &[BoundType::nullable_int()]);
        let c = function("f", &[BoundType::nullable_decimal()]);
        let d = function("g", &[BoundType::nullable_int()]);

        assert!(a.signature_matches(&b));
        assert!(!a.signature_matches(&c));
        assert!(!a.signature_matches(&d));
    }

    #[test]
    fn test_display() {
        let f = function("f", &[BoundType::nullable_int(), BoundType::string()]);
        assert_eq!(f.to_string(), "f(int, [NotNull]string)");
    }

    #[test]
    fn test_capture_parameters() {
        let mut f = function("inner", &[BoundType::nullable_int()]);
        f.parameters.push(Rc::new(VariableSymbol::parameter(
            "$count",
            BoundType::nullable_int().as_reference(),
            1,
        )));

        assert_eq!(f.visible_parameters().count(), 1);
        assert_eq!(f.capture_parameters().count(), 1);
    }
}
