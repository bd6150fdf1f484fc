//! Calls, constructors and lazily bound local functions.

use std::rc::Rc;

use plover_bound_tree::{BoundConstant, BoundExpression, FunctionSymbol, VariableKind, VariableSymbol};
use plover_syntax_tree::ast::{token_span, AstNode, CallExpression, Expr};
use tracing::debug;

use crate::diagnostics::{
    CannotCallNonFunction, NamedArgumentTwice, NamedBeforeUnnamed, UndefinedFunction,
};
use crate::error::{BindResult, BinderError};
use crate::overload::{Argument, OverloadResolution};

use super::{peek_body_locals, required, Binder, FunctionContext};

impl Binder {
    pub(super) fn bind_call(&mut self, node: &CallExpression) -> BindResult<BoundExpression> {
        let identifier = required(node.identifier(), &node.syntax, "identifier")?;
        let name = identifier.text().to_string();
        let span = node.span();

        if let Some(symbol) = self.scope.lookup_type(&name).cloned() {
            return Ok(BoundExpression::constructor(symbol, span));
        }

        let inner = self.find_local(&name);
        if let Some(inner) = &inner {
            if !self.resolved_locals.contains(inner) {
                self.bind_local_function(inner)?;
            }
        }

        let strict_name = inner.as_deref().unwrap_or(&name);
        let candidates: Vec<Rc<FunctionSymbol>> = self
            .scope
            .lookup_overloads(&name, strict_name)
            .into_iter()
            .map(|id| self.scope.function(id).clone())
            .collect();

        if candidates.is_empty() {
            let span = token_span(&identifier);
            if self.scope.lookup_symbol(&name).is_some() {
                self.report(CannotCallNonFunction { name, span });
            } else {
                self.report(UndefinedFunction { name, span });
            }
            return Ok(BoundExpression::error(node.span()));
        }

        let Some(arguments) = self.bind_arguments(node)? else {
            return Ok(BoundExpression::error(span));
        };

        OverloadResolution::new(self).resolve(&name, &candidates, &arguments, span)
    }

    fn bind_arguments(&mut self, node: &CallExpression) -> BindResult<Option<Vec<Argument>>> {
        let mut arguments: Vec<Argument> = Vec::new();
        let mut seen_named = false;
        let mut failed = false;

        for argument in node.arguments() {
            let value_node = required(argument.value(), &argument.syntax, "value")?;
            let span = argument.span();
            let name = argument
                .name()
                .map(|token| (token.text().to_string(), token_span(&token)));

            match &name {
                Some((name, name_span)) => {
                    let repeated = arguments
                        .iter()
                        .any(|other| other.name.as_ref().is_some_and(|(other, _)| other == name));
                    if repeated {
                        self.report(NamedArgumentTwice {
                            name: name.clone(),
                            span: name_span.clone(),
                        });
                        failed = true;
                    }
                    seen_named = true;
                }
                None if seen_named => {
                    self.report(NamedBeforeUnnamed { span: span.clone() });
                    failed = true;
                }
                None => {}
            }

            let value = match &value_node {
                // `f(1, , 3)`
                Expr::Empty(empty) => BoundExpression::literal(BoundConstant::Null, empty.span()),
                other => self.bind_expression(other, false, false)?,
            };
            if value.is_error() {
                failed = true;
            }

            arguments.push(Argument { name, value, span });
        }

        Ok((!failed).then_some(arguments))
    }

    /// Mangled name of the nearest local function called `name`, if any.
    fn find_local(&self, name: &str) -> Option<String> {
        (0..=self.inner_prefix.len())
            .rev()
            .map(|depth| {
                let mut parts = self.inner_prefix[..depth].to_vec();
                parts.push(name.to_string());
                format!("<{}>$", parts.join("::"))
            })
            .find(|inner| self.unresolved_locals.contains_key(inner))
    }

    /// Bind the body of the local function registered as `inner`.
    ///
    /// Every variable the body reads that it neither declares nor receives as
    /// a parameter becomes a `$name` reference parameter, and the symbol in
    /// scope is replaced by one carrying those parameters under its mangled
    /// name.
    pub(super) fn bind_local_function(&mut self, inner: &str) -> BindResult<()> {
        self.resolved_locals.insert(inner.to_string());
        let Some(local) = self.unresolved_locals.get(inner).cloned() else {
            return Ok(());
        };

        let node = local.node;
        let identifier = required(node.identifier(), &node.syntax, "identifier")?;
        let body_node = required(node.body(), &node.syntax, "body")?;
        let name = identifier.text().to_string();

        let function = self
            .scope
            .lookup_overloads(&name, &name)
            .into_iter()
            .map(|id| self.scope.function(id).clone())
            .find(|function| {
                function
                    .declaration
                    .as_ref()
                    .is_some_and(|declaration| declaration.node == node)
            })
            .ok_or_else(|| BinderError::MissingFunction(name.clone()))?;

        debug!(function = %name, inner, "binding local function");

        let saved = std::mem::replace(
            &mut self.context,
            FunctionContext {
                function: Some(function.clone()),
                peeked_locals: peek_body_locals(&body_node, &function),
                ..FunctionContext::default()
            },
        );
        self.inner_prefix.push(name.clone());
        self.tracked_symbols.push(Vec::new());
        self.tracked_declarations.push(Vec::new());
        self.scope.push();
        for parameter in &function.parameters {
            self.scope.try_declare_variable(parameter.clone());
        }

        let errors_before = self.diagnostics.errors().count();
        let body = self.bind_block(&body_node);

        self.scope.pop();
        let used = self.tracked_symbols.pop().unwrap_or_default();
        let declared = self.tracked_declarations.pop().unwrap_or_default();
        self.inner_prefix.pop();
        self.context = saved;

        let body = body?;
        let has_errors = self.diagnostics.errors().count() > errors_before;

        let mut captures: Vec<Rc<VariableSymbol>> = Vec::new();
        for variable in used {
            let is_own = declared.iter().any(|own| Rc::ptr_eq(own, &variable))
                || function.parameters.iter().any(|own| Rc::ptr_eq(own, &variable));
            let is_visible_anywhere = matches!(variable.kind, VariableKind::Global | VariableKind::Field);
            if is_own || is_visible_anywhere || captures.iter().any(|c| c.name == variable.name) {
                continue;
            }
            captures.push(variable);
        }

        let mut parameters = function.parameters.clone();
        for capture in &captures {
            let ordinal = parameters.len();
            parameters.push(Rc::new(VariableSymbol::parameter(
                format!("${}", capture.name),
                capture.ty.clone().as_reference(),
                ordinal,
            )));
        }

        let rewritten = FunctionSymbol::new(
            inner,
            parameters,
            function.return_type.clone(),
            function.declaration.clone(),
        );
        if !self.scope.try_modify_function(&name, rewritten.clone()) {
            return Err(BinderError::MissingFunction(name));
        }

        let rewritten = Rc::new(rewritten);
        let body = self.finish_body(&rewritten, &identifier, body, has_errors)?;
        self.function_bodies.push((rewritten, body));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use plover_bound_tree::{BoundConstant, BoundExpressionKind, BoundStatement, TypeSymbol};

    use super::super::test_support::{binder, parse_statement};
    use super::super::Binder;

    fn bind(binder: &mut Binder, source: &str) -> BoundStatement {
        let statement = parse_statement(source).unwrap();
        binder.bind_statement(&statement).unwrap()
    }

    fn messages(binder: &Binder) -> Vec<String> {
        binder.diagnostics.iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_builtin_call() {
        let mut binder = binder();
        let BoundStatement::Expression(call) = bind(&mut binder, "PrintLine(\"hi\");") else {
            panic!("expected an expression statement");
        };
        let BoundExpressionKind::Call { function, arguments } = call.kind else {
            panic!("expected a call, got {}", call);
        };
        assert_eq!(function.name, "PrintLine");
        assert_eq!(arguments.len(), 1);
        assert!(messages(&binder).is_empty());
    }

    #[test]
    fn test_has_value_null_prefers_any() {
        let mut binder = binder();
        bind(&mut binder, "var present = HasValue(null);");
        assert!(messages(&binder).is_empty(), "{:?}", messages(&binder));
    }

    #[test]
    fn test_undefined_and_non_function() {
        let mut binder = binder();
        bind(&mut binder, "int x = 1;");
        bind(&mut binder, "Missing();");
        bind(&mut binder, "x();");
        assert_eq!(
            messages(&binder),
            vec!["undefined function 'Missing'", "called object 'x' is not a function"]
        );
    }

    #[test]
    fn test_argument_count() {
        let mut binder = binder();
        bind(&mut binder, "Input(1);");
        assert_eq!(messages(&binder), vec!["function 'Input' expects 0 arguments, got 1"]);
    }

    #[test]
    fn test_no_overload_matches() {
        let mut binder = binder();
        bind(&mut binder, "PrintLine(1, 2);");
        assert_eq!(
            messages(&binder),
            vec!["no overload for function 'PrintLine' matches parameter list"]
        );
    }

    #[test]
    fn test_named_arguments() {
        let mut binder = binder();
        bind(&mut binder, "RandInt(max: 10);");
        assert!(messages(&binder).is_empty(), "{:?}", messages(&binder));

        bind(&mut binder, "RandInt(max: 1, max: 2);");
        bind(&mut binder, "RandInt(limit: 3);");
        assert_eq!(
            messages(&binder),
            vec![
                "named argument 'max' cannot be specified multiple times",
                "function 'RandInt' does not have a parameter named 'limit'",
            ]
        );
    }

    #[test]
    fn test_implicit_argument_cast() {
        let mut binder = binder();
        let BoundStatement::Expression(call) = bind(&mut binder, "RandInt(3);") else {
            panic!("expected an expression statement");
        };
        let BoundExpressionKind::Call { arguments, .. } = call.kind else {
            panic!("expected a call");
        };
        assert!(arguments[0].ty.is(&TypeSymbol::Int));
        assert_eq!(arguments[0].constant, Some(BoundConstant::Int(3)));
    }
}
