//! Type clauses.

use plover_bound_tree::{BoundType, TypeSymbol};
use plover_syntax_tree::ast::{token_span, AstNode, TypeClause};
use plover_syntax_tree::SyntaxKind;

use crate::diagnostics::{ImpliedDimensions, UnknownAttribute, UnknownType};

use super::Binder;

const NOT_NULL: &str = "NotNull";

impl Binder {
    /// Bind a written type.
    ///
    /// `var` and a lone `const` produce an implicit type with no symbol yet;
    /// the declaration fills it in from its initializer. Returns `None` after
    /// reporting when the type cannot be resolved.
    pub(super) fn bind_type_clause(&mut self, clause: &TypeClause) -> Option<BoundType> {
        let mut is_nullable = true;
        for attribute in clause.attributes() {
            match attribute.identifier() {
                Some(identifier) if identifier.text() == NOT_NULL => is_nullable = false,
                Some(identifier) => self.report(UnknownAttribute {
                    name: identifier.text().to_string(),
                    span: attribute.span(),
                }),
                None => {}
            }
        }

        let modifiers = clause.modifiers();
        let base = BoundType::default()
            .with_reference(modifiers.is_reference, modifiers.is_constant_reference)
            .with_constant(modifiers.is_constant)
            .with_nullable(is_nullable)
            .with_dimensions(clause.rank());

        let Some(name) = clause.type_name() else {
            // `const x = ...`
            return Some(base.with_implicit(true));
        };

        if name.kind() == SyntaxKind::Var {
            if clause.rank() > 0 {
                self.report(ImpliedDimensions { span: clause.span() });
                return None;
            }
            return Some(base.with_implicit(true));
        }

        let symbol = match TypeSymbol::builtin(name.text()) {
            Some(symbol) => symbol,
            None => match self.scope.lookup_type(name.text()) {
                Some(symbol) => symbol.type_symbol(),
                None => {
                    self.report(UnknownType {
                        name: name.text().to_string(),
                        span: token_span(&name),
                    });
                    return None;
                }
            },
        };

        Some(base.with_symbol(Some(symbol)))
    }
}

#[cfg(test)]
mod tests {
    use plover_bound_tree::{BoundType, TypeSymbol};
    use plover_syntax_tree::ast::{Stmt, TypeClause};

    use super::super::test_support::{binder, parse_statement};

    fn clause(source: &str) -> TypeClause {
        let Some(Stmt::VariableDeclaration(declaration)) = parse_statement(source) else {
            panic!("expected a variable declaration in {:?}", source);
        };
        declaration.type_clause().unwrap()
    }

    #[test]
    fn test_builtin_types_are_nullable_by_default() {
        let mut binder = binder();
        let ty = binder.bind_type_clause(&clause("int x;")).unwrap();
        assert_eq!(ty, BoundType::nullable_int());
    }

    #[test]
    fn test_not_null_attribute_and_modifiers() {
        let mut binder = binder();
        let ty = binder
            .bind_type_clause(&clause("[NotNull]const string[] names;"))
            .unwrap();
        assert!(!ty.is_nullable());
        assert!(ty.is_constant());
        assert_eq!(ty.dimensions(), 1);
        assert!(ty.is(&TypeSymbol::String));
    }

    #[test]
    fn test_var_is_implicit() {
        let mut binder = binder();
        let ty = binder.bind_type_clause(&clause("var x = 1;")).unwrap();
        assert!(ty.is_implicit());
        assert!(ty.symbol().is_none());
    }

    #[test]
    fn test_unknown_type_and_attribute() {
        let mut binder = binder();
        assert!(binder.bind_type_clause(&clause("Missing m;")).is_none());
        binder.bind_type_clause(&clause("[Frozen]int y;"));

        let messages: Vec<_> = binder.diagnostics.iter().map(|d| d.message.clone()).collect();
        assert_eq!(
            messages,
            vec!["unknown type 'Missing'", "unknown attribute 'Frozen'"]
        );
    }
}
