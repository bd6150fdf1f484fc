//! Statements, blocks and variable declarations.

use plover_bound_tree::{
    BoundBlockStatement, BoundConstant, BoundExpression, BoundExpressionKind, BoundStatement,
    BoundType, LoopLabels, VariableSymbol,
};
use plover_span::Span;
use plover_syntax_tree::ast::{
    token_span, AstNode, BlockStatement, BreakStatement, ContinueStatement, DoWhileStatement,
    Expr, ForStatement, FunctionNode, IfStatement, ReturnStatement, Stmt, TryStatement,
    VariableDeclaration, WhileStatement,
};
use plover_syntax_tree::SyntaxToken;

use crate::diagnostics::{
    CannotOverloadNested, ConstantReferenceToNonConstant, EmptyInitializerListOnImplicit,
    FunctionAlreadyDeclared, InvalidBreakOrContinue, InvalidExpressionStatement,
    MissingReturnValue, NameUsedInEnclosingScope, NoInitOnImplicit, NullAssignOnImplicit,
    NullInitializerListOnImplicit, ReferenceNoInitialization, ReferenceToConstant,
    ReferenceWrongInitialization, ReturnOutsideFunction, TryMustHaveCatchOrFinally,
    UnexpectedReturnValue, UnreachableCode, VoidVariable, WrongInitializationReference,
};
use crate::error::BindResult;

use super::{required, Binder, UnresolvedLocal};

impl Binder {
    pub(super) fn bind_statement(&mut self, statement: &Stmt) -> BindResult<BoundStatement> {
        match statement {
            Stmt::Block(node) => Ok(BoundStatement::Block(self.bind_block(node)?)),
            Stmt::VariableDeclaration(node) => self.bind_variable_declaration(node),
            // Declared when the enclosing block was entered, bound on first call
            Stmt::LocalFunction(_) => Ok(BoundStatement::Nop),
            Stmt::If(node) => self.bind_if(node),
            Stmt::While(node) => self.bind_while(node),
            Stmt::DoWhile(node) => self.bind_do_while(node),
            Stmt::For(node) => self.bind_for(node),
            Stmt::Try(node) => self.bind_try(node),
            Stmt::Break(node) => self.bind_break(node),
            Stmt::Continue(node) => self.bind_continue(node),
            Stmt::Return(node) => self.bind_return(node),
            Stmt::Expression(node) => {
                let expr = required(node.expression(), &node.syntax, "expression")?;
                self.bind_expression_statement(&expr)
            }
        }
    }

    /// Bind a block in its own scope.
    ///
    /// Local functions are declared before any statement is bound, so a call
    /// may precede the declaration. Any that were never called are bound on
    /// the way out so their bodies are still checked.
    pub(super) fn bind_block(&mut self, block: &BlockStatement) -> BindResult<BoundBlockStatement> {
        self.scope.push();
        self.context.check_peeked_locals += 1;

        let mut locals = Vec::new();
        for statement in block.statements() {
            if let Stmt::LocalFunction(node) = statement {
                if let Some(inner) = self.declare_local_function(&node.function())? {
                    locals.push(inner);
                }
            }
        }

        let mut statements = Vec::new();
        for statement in block.statements() {
            statements.push(self.bind_statement(&statement)?);
        }

        for inner in locals {
            if !self.resolved_locals.contains(&inner) {
                self.bind_local_function(&inner)?;
            }
        }

        self.context.check_peeked_locals -= 1;
        self.scope.pop();
        Ok(BoundBlockStatement::new(statements))
    }

    /// Declare a local function under its plain name and queue its body.
    fn declare_local_function(&mut self, node: &FunctionNode) -> BindResult<Option<String>> {
        let identifier = required(node.identifier(), &node.syntax, "identifier")?;
        let name = identifier.text().to_string();
        let inner = self.inner_name_of(&name);

        if self.unresolved_locals.contains_key(&inner) {
            self.report(CannotOverloadNested {
                name,
                span: token_span(&identifier),
            });
            return Ok(None);
        }

        let function = self.bind_function_signature(node)?;
        if self.scope.try_declare_function(function).is_none() {
            self.report(FunctionAlreadyDeclared {
                name,
                span: token_span(&identifier),
            });
            return Ok(None);
        }

        self.unresolved_locals
            .insert(inner.clone(), UnresolvedLocal { node: node.clone() });
        Ok(Some(inner))
    }

    fn bind_expression_statement(&mut self, expr: &Expr) -> BindResult<BoundStatement> {
        let bound = self.bind_expression(expr, true, true)?;

        let allowed = matches!(
            bound.kind,
            BoundExpressionKind::Call { .. }
                | BoundExpressionKind::Assignment { .. }
                | BoundExpressionKind::CompoundAssignment { .. }
                | BoundExpressionKind::Error
                | BoundExpressionKind::Empty
        );
        if !allowed && !self.is_script() {
            self.report(InvalidExpressionStatement {
                span: bound.span.clone(),
            });
        }

        Ok(BoundStatement::Expression(bound))
    }

    fn bind_if(&mut self, node: &IfStatement) -> BindResult<BoundStatement> {
        let condition_node = required(node.condition(), &node.syntax, "condition")?;
        let then_node = required(node.then_branch(), &node.syntax, "then branch")?;
        let else_node = match node.else_clause() {
            Some(clause) => Some(required(clause.body(), &clause.syntax, "body")?),
            None => None,
        };

        let mut condition = self.bind_condition(&condition_node)?;
        if let Some(BoundConstant::Bool(value)) = condition.constant {
            if !value {
                self.report(UnreachableCode {
                    span: then_node.span(),
                });
            } else if let Some(else_node) = &else_node {
                self.report(UnreachableCode {
                    span: else_node.span(),
                });
            }
            condition = BoundExpression::typed_literal(
                BoundConstant::Bool(value),
                BoundType::bool(),
                condition.span,
            );
        }

        let then = self.bind_statement(&then_node)?;
        let otherwise = match else_node {
            Some(node) => Some(Box::new(self.bind_statement(&node)?)),
            None => None,
        };

        Ok(BoundStatement::If {
            condition,
            then: Box::new(then),
            otherwise,
        })
    }

    fn bind_while(&mut self, node: &WhileStatement) -> BindResult<BoundStatement> {
        let condition_node = required(node.condition(), &node.syntax, "condition")?;
        let body_node = required(node.body(), &node.syntax, "body")?;

        let condition = self.bind_condition(&condition_node)?;
        if condition.constant == Some(BoundConstant::Bool(false)) {
            self.report(UnreachableCode {
                span: body_node.span(),
            });
        }

        let (body, labels) = self.bind_loop_body(&body_node)?;
        Ok(BoundStatement::While {
            condition,
            body: Box::new(body),
            labels,
        })
    }

    fn bind_do_while(&mut self, node: &DoWhileStatement) -> BindResult<BoundStatement> {
        let body_node = required(node.body(), &node.syntax, "body")?;
        let condition_node = required(node.condition(), &node.syntax, "condition")?;

        let (body, labels) = self.bind_loop_body(&body_node)?;
        let condition = self.bind_condition(&condition_node)?;
        Ok(BoundStatement::DoWhile {
            body: Box::new(body),
            condition,
            labels,
        })
    }

    fn bind_for(&mut self, node: &ForStatement) -> BindResult<BoundStatement> {
        let initializer_node = required(node.initializer(), &node.syntax, "initializer")?;
        let condition_node = required(node.condition(), &node.syntax, "condition")?;
        let step_node = required(node.step(), &node.syntax, "step")?;
        let body_node = required(node.body(), &node.syntax, "body")?;

        self.scope.push();
        self.context.check_peeked_locals += 1;

        let initializer = self.bind_statement(&initializer_node)?;
        let condition = match &condition_node {
            Expr::Empty(empty) => {
                BoundExpression::typed_literal(BoundConstant::Bool(true), BoundType::bool(), empty.span())
            }
            condition => self.bind_condition(condition)?,
        };
        let step = self.bind_expression(&step_node, true, true)?;
        let (body, labels) = self.bind_loop_body(&body_node)?;

        self.context.check_peeked_locals -= 1;
        self.scope.pop();

        Ok(BoundStatement::For {
            initializer: Box::new(initializer),
            condition,
            step,
            body: Box::new(body),
            labels,
        })
    }

    fn bind_loop_body(&mut self, body: &Stmt) -> BindResult<(BoundStatement, LoopLabels)> {
        let labels = self.next_loop_labels();
        self.context.loop_stack.push(labels.clone());
        let body = self.bind_statement(body);
        self.context.loop_stack.pop();
        Ok((body?, labels))
    }

    fn bind_try(&mut self, node: &TryStatement) -> BindResult<BoundStatement> {
        let body_node = required(node.body(), &node.syntax, "body")?;
        let catch_node = match node.catch_clause() {
            Some(clause) => Some(required(clause.body(), &clause.syntax, "body")?),
            None => None,
        };
        let finally_node = match node.finally_clause() {
            Some(clause) => Some(required(clause.body(), &clause.syntax, "body")?),
            None => None,
        };

        if catch_node.is_none() && finally_node.is_none() {
            self.report(TryMustHaveCatchOrFinally { span: node.span() });
            return Ok(error_statement(node.span()));
        }

        let body = self.bind_block(&body_node)?;
        let catch = match catch_node {
            Some(block) => Some(self.bind_block(&block)?),
            None => None,
        };
        let finally = match finally_node {
            Some(block) => Some(self.bind_block(&block)?),
            None => None,
        };

        Ok(BoundStatement::Try {
            body,
            catch,
            finally,
        })
    }

    fn bind_break(&mut self, node: &BreakStatement) -> BindResult<BoundStatement> {
        match self.context.loop_stack.last() {
            Some(labels) => Ok(BoundStatement::Goto(labels.break_label.clone())),
            None => {
                self.report(InvalidBreakOrContinue {
                    keyword: "break".to_string(),
                    span: node.span(),
                });
                Ok(error_statement(node.span()))
            }
        }
    }

    fn bind_continue(&mut self, node: &ContinueStatement) -> BindResult<BoundStatement> {
        match self.context.loop_stack.last() {
            Some(labels) => Ok(BoundStatement::Goto(labels.continue_label.clone())),
            None => {
                self.report(InvalidBreakOrContinue {
                    keyword: "continue".to_string(),
                    span: node.span(),
                });
                Ok(error_statement(node.span()))
            }
        }
    }

    fn bind_return(&mut self, node: &ReturnStatement) -> BindResult<BoundStatement> {
        let span = node.span();
        let value_node = node.value();

        let Some(function) = self.context.function.clone() else {
            // Global statements
            return match value_node {
                None => Ok(BoundStatement::Return { value: None, span }),
                Some(value) if self.is_script() => {
                    let bound = self.bind_expression(&value, false, false)?;
                    let (bound, _) =
                        self.bind_cast(value.span(), bound, &BoundType::nullable_any(), false);
                    Ok(BoundStatement::Return {
                        value: Some(bound),
                        span,
                    })
                }
                Some(value) => {
                    self.report(ReturnOutsideFunction { span: value.span() });
                    Ok(error_statement(span))
                }
            };
        };

        let is_void = function.return_type.is_void();
        match value_node {
            Some(value) if is_void => {
                self.report(UnexpectedReturnValue { span: value.span() });
                Ok(error_statement(span))
            }
            None if !is_void => {
                let keyword = required(node.keyword(), &node.syntax, "keyword")?;
                self.report(MissingReturnValue {
                    span: token_span(&keyword),
                });
                Ok(error_statement(span))
            }
            None => Ok(BoundStatement::Return { value: None, span }),
            Some(value) => {
                let bound = self.bind_expression(&value, false, false)?;
                let (bound, _) = self.bind_cast(value.span(), bound, &function.return_type, false);
                Ok(BoundStatement::Return {
                    value: Some(bound),
                    span,
                })
            }
        }
    }

    fn bind_variable_declaration(&mut self, node: &VariableDeclaration) -> BindResult<BoundStatement> {
        let identifier = required(node.identifier(), &node.syntax, "identifier")?;
        let clause = required(node.type_clause(), &node.syntax, "type clause")?;
        let name = identifier.text().to_string();
        let span = node.span();

        if self.context.check_peeked_locals > 1 && self.context.peeked_locals.contains(&name) {
            self.report(NameUsedInEnclosingScope {
                name: name.clone(),
                span: token_span(&identifier),
            });
        }

        let Some(declared) = self.bind_type_clause(&clause) else {
            return Ok(self.declare_failed(&identifier, BoundType::error(), span));
        };
        if declared.is_void() {
            self.report(VoidVariable { span: clause.span() });
            return Ok(self.declare_failed(&identifier, BoundType::error(), span));
        }

        if declared.is_reference() {
            return self.bind_reference_declaration(node, &identifier, declared);
        }

        let initializer = node.initializer();
        let kind = self.variable_kind();

        let (ty, initializer) = if declared.is_implicit() {
            let Some(value) = initializer else {
                self.report(NoInitOnImplicit {
                    span: token_span(&identifier),
                });
                return Ok(self.declare_failed(&identifier, BoundType::error(), span));
            };

            let bound = self.bind_initializer(&value, None)?;
            if bound.is_error() {
                return Ok(self.declare_failed(&identifier, BoundType::error(), span));
            }
            if !self.check_implicit_initializer(&value, &bound) {
                return Ok(self.declare_failed(&identifier, BoundType::error(), span));
            }

            let ty = bound
                .ty
                .clone()
                .with_literal(false)
                .with_implicit(false)
                .with_reference(false, false)
                .with_constant(declared.is_constant())
                .with_nullable(declared.is_nullable());
            (ty, Some(bound))
        } else {
            let bound = match initializer {
                Some(value) => {
                    let bound = self.bind_initializer(&value, Some(&declared))?;
                    if matches!(bound.kind, BoundExpressionKind::Reference(_)) {
                        self.report(WrongInitializationReference { span: value.span() });
                        return Ok(self.declare_failed(&identifier, declared, span));
                    }
                    let (bound, _) = self.bind_cast(value.span(), bound, &declared, false);
                    if bound.is_error() {
                        return Ok(self.declare_failed(&identifier, declared, span));
                    }
                    Some(bound)
                }
                None => None,
            };
            (declared, bound)
        };

        let constant = match &initializer {
            Some(bound) if ty.is_constant() => bound.constant.clone(),
            _ => None,
        };
        let variable = VariableSymbol::new(name.clone(), ty, kind).with_constant(constant);
        let variable = self.declare_variable(&identifier, variable);
        if initializer.as_ref().is_some_and(|bound| !bound.is_null_constant()) {
            self.scope.note_assignment(&name);
        }

        Ok(BoundStatement::VariableDeclaration {
            variable,
            initializer,
        })
    }

    /// Whether an initializer can decide an implicit type, reporting if not.
    fn check_implicit_initializer(&mut self, value: &Expr, bound: &BoundExpression) -> bool {
        let span = value.span();
        if let BoundExpressionKind::InitializerList { items } = &bound.kind {
            if items.is_empty() {
                self.report(EmptyInitializerListOnImplicit { span });
                return false;
            }
            if bound.ty.symbol().is_none() {
                self.report(NullInitializerListOnImplicit { span });
                return false;
            }
            return true;
        }

        if bound.ty.symbol().is_none() {
            self.report(NullAssignOnImplicit { span });
            return false;
        }
        if matches!(bound.kind, BoundExpressionKind::Reference(_)) {
            self.report(WrongInitializationReference { span });
            return false;
        }
        true
    }

    /// `ref int r = ref x;` and its constant forms.
    fn bind_reference_declaration(
        &mut self,
        node: &VariableDeclaration,
        identifier: &SyntaxToken,
        declared: BoundType,
    ) -> BindResult<BoundStatement> {
        let span = node.span();
        let Some(value) = node.initializer() else {
            self.report(ReferenceNoInitialization {
                span: token_span(identifier),
            });
            return Ok(self.declare_failed(identifier, declared, span));
        };

        let bound = self.bind_expression(&value, false, false)?;
        if bound.is_error() {
            return Ok(self.declare_failed(identifier, declared, span));
        }

        let BoundExpressionKind::Reference(target) = &bound.kind else {
            self.report(ReferenceWrongInitialization { span: value.span() });
            return Ok(self.declare_failed(identifier, declared, span));
        };

        if target.ty.is_constant() && !declared.is_constant() {
            self.report(ReferenceToConstant {
                is_constant: declared.is_constant_reference(),
                span: value.span(),
            });
            return Ok(self.declare_failed(identifier, declared, span));
        }
        if !target.ty.is_constant() && declared.is_constant() {
            self.report(ConstantReferenceToNonConstant {
                is_constant: declared.is_constant_reference(),
                span: value.span(),
            });
            return Ok(self.declare_failed(identifier, declared, span));
        }

        let ty = if declared.is_implicit() {
            target
                .ty
                .clone()
                .with_reference(true, declared.is_constant_reference())
                .with_constant(declared.is_constant())
        } else {
            let (checked, _) = self.bind_cast(value.span(), bound.clone(), &declared, false);
            if checked.is_error() {
                return Ok(self.declare_failed(identifier, declared, span));
            }
            declared
        };

        let kind = self.variable_kind();
        let variable = VariableSymbol::new(identifier.text(), ty, kind);
        let variable = self.declare_variable(identifier, variable);
        self.scope.note_assignment(&variable.name);

        Ok(BoundStatement::VariableDeclaration {
            variable,
            initializer: Some(bound),
        })
    }

    fn bind_initializer(&mut self, value: &Expr, target: Option<&BoundType>) -> BindResult<BoundExpression> {
        match value {
            Expr::InitializerList(list) => self.bind_initializer_list(list, target),
            other => self.bind_expression(other, false, false),
        }
    }

    /// Declare a variable whose declaration failed so later uses of the name
    /// do not cascade into more errors.
    fn declare_failed(&mut self, identifier: &SyntaxToken, ty: BoundType, span: Span) -> BoundStatement {
        let kind = self.variable_kind();
        let variable = VariableSymbol::new(identifier.text(), ty, kind);
        self.declare_variable(identifier, variable);
        error_statement(span)
    }
}

fn error_statement(span: Span) -> BoundStatement {
    BoundStatement::Expression(BoundExpression::error(span))
}

#[cfg(test)]
mod tests {
    use plover_bound_tree::{BoundConstant, BoundStatement, BoundType, TypeSymbol};

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
    fn test_implicit_declaration_takes_initializer_type() {
        let mut binder = binder();
        let BoundStatement::VariableDeclaration { variable, .. } = bind(&mut binder, "var x = 2.5;")
        else {
            panic!("expected a declaration");
        };
        assert_eq!(variable.ty, BoundType::nullable_decimal());
        assert!(messages(&binder).is_empty());
    }

    #[test]
    fn test_constant_declaration_records_value() {
        let mut binder = binder();
        let BoundStatement::VariableDeclaration { variable, .. } =
            bind(&mut binder, "const int limit = 4 * 5;")
        else {
            panic!("expected a declaration");
        };
        assert_eq!(variable.constant, Some(BoundConstant::Int(20)));
    }

    #[test]
    fn test_implicit_rules() {
        let mut binder = binder();
        bind(&mut binder, "var a;");
        bind(&mut binder, "var b = null;");
        bind(&mut binder, "var c = {};");
        assert_eq!(
            messages(&binder),
            vec![
                "implicitly-typed variable must have initializer",
                "cannot assign 'null' to an implicitly-typed variable",
                "cannot assign empty initializer list to an implicitly-typed variable",
            ]
        );
    }

    #[test]
    fn test_array_declaration() {
        let mut binder = binder();
        let BoundStatement::VariableDeclaration {
            variable,
            initializer,
        } = bind(&mut binder, "int[] values = {1, 2, 3};")
        else {
            panic!("expected a declaration");
        };
        assert!(messages(&binder).is_empty(), "{:?}", messages(&binder));
        assert_eq!(variable.ty.dimensions(), 1);
        assert!(initializer.unwrap().ty.is(&TypeSymbol::Int));
    }

    #[test]
    fn test_null_into_not_null() {
        let mut binder = binder();
        bind(&mut binder, "[NotNull]int x = null;");
        assert_eq!(messages(&binder), vec!["cannot assign null to non-nullable variable"]);
    }

    #[test]
    fn test_redeclaration() {
        let mut binder = binder();
        bind(&mut binder, "int x = 1;");
        bind(&mut binder, "int x = 2;");
        assert_eq!(messages(&binder), vec!["redefinition of 'x'"]);
    }

    #[test]
    fn test_reference_rules() {
        let mut binder = binder();
        bind(&mut binder, "int x = 1;");
        bind(&mut binder, "const int c = 2;");
        bind(&mut binder, "ref int a;");
        bind(&mut binder, "ref int b = x;");
        bind(&mut binder, "ref int d = ref c;");
        bind(&mut binder, "ref const int e = ref x;");
        bind(&mut binder, "ref int f = ref x;");
        assert_eq!(
            messages(&binder),
            vec![
                "reference variable must have an initializer",
                "reference variable must be initialized with a reference",
                "cannot assign a reference to a constant to a by-reference variable expecting a reference to a variable",
                "cannot assign a reference to a variable to a by-reference variable expecting a reference to a constant",
            ]
        );
    }

    #[test]
    fn test_constant_assignment() {
        let mut binder = binder();
        bind(&mut binder, "const int c = 2;");
        bind(&mut binder, "c = 3;");
        assert_eq!(messages(&binder), vec!["'c' cannot be assigned to as it is a constant"]);
    }

    #[test]
    fn test_break_outside_loop() {
        let mut binder = binder();
        bind(&mut binder, "break;");
        assert_eq!(messages(&binder), vec!["break statement not within a loop"]);
    }

    #[test]
    fn test_constant_false_condition_is_unreachable() {
        let mut binder = binder();
        let statement = bind(&mut binder, "if (false) { PrintLine(); }");
        assert!(matches!(statement, BoundStatement::If { .. }));
        assert_eq!(messages(&binder), vec!["unreachable code"]);
    }

    #[test]
    fn test_expression_statement_whitelist() {
        let mut binder = binder();
        bind(&mut binder, "1 + 2;");
        assert_eq!(
            messages(&binder),
            vec!["only assignment and call expressions can be used as a statement"]
        );
    }

    #[test]
    fn test_try_requires_handler() {
        let mut binder = binder();
        bind(&mut binder, "try { }");
        assert_eq!(messages(&binder), vec!["try statement must have a catch or finally"]);
    }
}
