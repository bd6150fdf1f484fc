//! Struct, function and parameter declarations.

use std::rc::Rc;

use plover_bound_tree::{
    BoundType, FunctionDeclarationRef, FunctionSymbol, StructDeclarationRef, StructMembers,
    StructSymbol, VariableKind, VariableSymbol,
};
use plover_syntax_tree::ast::{token_span, AstNode, FunctionNode, StructDeclaration};

use crate::diagnostics::{
    DefaultBeforeNoDefault, DefaultMustBeConstant, FunctionAlreadyDeclared,
    ParameterAlreadyDeclared, StructAlreadyDeclared, VoidVariable,
};
use crate::error::{BindResult, BinderError};

use super::{required, Binder};

impl Binder {
    /// Declare a struct's name so later declarations can refer to it.
    ///
    /// Returns `None` after reporting when the name is already taken.
    pub(super) fn declare_struct(
        &mut self,
        node: &StructDeclaration,
    ) -> BindResult<Option<Rc<StructSymbol>>> {
        let identifier = required(node.identifier(), &node.syntax, "identifier")?;
        let name = identifier.text().to_string();

        let declaration = StructDeclarationRef {
            node: node.clone(),
            file_id: self.file_id,
        };
        let symbol = Rc::new(StructSymbol::new(name.clone(), Some(declaration)));
        if !self.scope.try_declare_type(symbol) {
            self.report(StructAlreadyDeclared {
                name,
                span: token_span(&identifier),
            });
            return Ok(None);
        }

        self.scope
            .lookup_type(&name)
            .cloned()
            .map(Some)
            .ok_or(BinderError::StructRegistration(name))
    }

    /// Bind the fields of a declared struct.
    pub(super) fn bind_struct_members(
        &mut self,
        node: &StructDeclaration,
        symbol: Rc<StructSymbol>,
    ) -> BindResult<StructMembers> {
        let mut fields = Vec::new();

        self.scope.push();
        for field in node.fields() {
            let identifier = required(field.identifier(), &field.syntax, "identifier")?;
            let clause = required(field.type_clause(), &field.syntax, "type clause")?;
            let ty = self.bind_type_clause(&clause).unwrap_or_else(BoundType::error);
            if ty.is_void() {
                self.report(VoidVariable { span: clause.span() });
            }

            let variable = VariableSymbol::new(identifier.text(), ty, VariableKind::Field);
            fields.push(self.declare_variable(&identifier, variable));
        }
        self.scope.pop();

        Ok(StructMembers { symbol, fields })
    }

    /// Bind a top-level function's signature and declare it.
    pub(super) fn bind_function_declaration(&mut self, node: &FunctionNode) -> BindResult<()> {
        let identifier = required(node.identifier(), &node.syntax, "identifier")?;
        let function = self.bind_function_signature(node)?;

        if self.scope.try_declare_function(function).is_none() {
            self.report(FunctionAlreadyDeclared {
                name: identifier.text().to_string(),
                span: token_span(&identifier),
            });
        }
        Ok(())
    }

    /// Bind the return type and parameters of `node`.
    ///
    /// The body is left for later; the symbol keeps a reference to the syntax
    /// so it can be found again.
    pub(super) fn bind_function_signature(&mut self, node: &FunctionNode) -> BindResult<FunctionSymbol> {
        let identifier = required(node.identifier(), &node.syntax, "identifier")?;
        let return_clause = required(node.return_type(), &node.syntax, "return type")?;
        let return_type = self
            .bind_type_clause(&return_clause)
            .unwrap_or_else(BoundType::error);

        let parameters = self.bind_parameters(node)?;
        let declaration = FunctionDeclarationRef {
            node: node.clone(),
            file_id: self.file_id,
        };

        Ok(FunctionSymbol::new(
            identifier.text(),
            parameters,
            return_type,
            Some(declaration),
        ))
    }

    fn bind_parameters(&mut self, node: &FunctionNode) -> BindResult<Vec<Rc<VariableSymbol>>> {
        let mut parameters: Vec<Rc<VariableSymbol>> = Vec::new();
        let mut seen_default = false;

        for (ordinal, parameter) in node.parameters().enumerate() {
            let identifier = required(parameter.identifier(), &parameter.syntax, "identifier")?;
            let clause = required(parameter.type_clause(), &parameter.syntax, "type clause")?;
            let ty = self.bind_type_clause(&clause).unwrap_or_else(BoundType::error);
            if ty.is_void() {
                self.report(VoidVariable { span: clause.span() });
            }

            let name = identifier.text();
            if parameters.iter().any(|other| other.name == name) {
                self.report(ParameterAlreadyDeclared {
                    name: name.to_string(),
                    span: token_span(&identifier),
                });
            }

            let default = match parameter.default_value() {
                Some(value) => {
                    seen_default = true;
                    let span = value.span();
                    let bound = self.bind_expression(&value, false, false)?;
                    if !bound.is_error() && bound.constant.is_none() {
                        self.report(DefaultMustBeConstant { span: span.clone() });
                    }
                    let (bound, _) = self.bind_cast(span, bound, &ty, false);
                    Some(Box::new(bound))
                }
                None => {
                    if seen_default {
                        self.report(DefaultBeforeNoDefault {
                            span: parameter.span(),
                        });
                    }
                    None
                }
            };

            parameters.push(Rc::new(VariableSymbol::new(
                name,
                ty,
                VariableKind::Parameter { ordinal, default },
            )));
        }

        Ok(parameters)
    }
}

#[cfg(test)]
mod tests {
    use plover_bound_tree::{BoundConstant, BoundType};
    use plover_syntax_tree::ast::{AstNode, CompilationUnit, Member};

    use super::super::test_support::binder;

    fn messages(source: &str) -> (Vec<String>, Option<plover_bound_tree::FunctionSymbol>) {
        let result = plover_parser::parse_source(source);
        let unit = CompilationUnit::cast(result.tree).unwrap();
        let mut binder = binder();
        let mut last = None;
        for member in unit.members() {
            if let Member::Function(declaration) = member {
                last = Some(binder.bind_function_signature(&declaration.function()).unwrap());
            }
        }
        let messages = binder.diagnostics.iter().map(|d| d.message.clone()).collect();
        (messages, last)
    }

    #[test]
    fn test_signature_with_default() {
        let (messages, function) = messages("int add(int a, int b = 2) { return a + b; }");
        assert!(messages.is_empty(), "{:?}", messages);

        let function = function.unwrap();
        assert_eq!(function.name, "add");
        assert_eq!(function.return_type, BoundType::nullable_int());
        let default = function.parameters[1].default_value().unwrap();
        assert_eq!(default.constant, Some(BoundConstant::Int(2)));
    }

    #[test]
    fn test_parameter_rules() {
        let (messages, _) = messages("void f(int a, void c, int a) { }");
        assert_eq!(
            messages,
            vec!["cannot use void as a type", "redefinition of parameter 'a'"]
        );
    }

    #[test]
    fn test_default_before_required() {
        let (messages, _) = messages("void g(int a = 1, int b) { }");
        assert_eq!(
            messages,
            vec!["all optional parameters must be specified after any required parameters"]
        );
    }

    #[test]
    fn test_default_must_be_constant() {
        let (messages, _) = messages("void f(int a = Input()) { }");
        assert!(messages
            .iter()
            .any(|m| m == "default values for parameters must be compile-time constants"));
    }
}
