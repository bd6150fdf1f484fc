//! Expression binding and conversions.

use plover_bound_tree::{
    BinaryOperatorKind, BoundBinaryOperator, BoundConstant, BoundExpression, BoundExpressionKind,
    BoundIncrementOperator, BoundTernaryOperator, BoundType, BoundUnaryOperator, Cast,
};
use plover_span::Span;
use plover_syntax_tree::ast::{
    token_span, AssignmentExpression, AstNode, BinaryExpression, CastExpression, Expr,
    IndexExpression, InitializerListExpression, LiteralExpression, MemberAccessExpression,
    NameExpression, ReferenceExpression, TernaryExpression, TypeofExpression, UnaryExpression,
};
use plover_syntax_tree::{SyntaxKind, SyntaxToken};

use crate::diagnostics::{
    AlwaysValue, CannotApplyIndexing, CannotAssign, CannotConvert, CannotConvertImplicitly,
    ConstantAssignment, DivideByZero, InvalidBinaryOperatorUse, InvalidLiteral,
    InvalidTernaryOperatorUse, InvalidUnaryOperatorUse, NoSuchMember, NoValue, NotAVariable,
    NullAssignOnNotNull, PossibleNullDereference, UndefinedName, UnsupportedIsOperator,
    WrongInitializationReference,
};
use crate::error::{BindResult, BinderError};
use crate::scope::Symbol;

use super::{required, Binder};

impl Binder {
    /// Bind an expression.
    ///
    /// `own_statement` is set for the top expression of an expression
    /// statement, where a postfix increment's old value is never read.
    pub(super) fn bind_expression(
        &mut self,
        expr: &Expr,
        can_be_void: bool,
        own_statement: bool,
    ) -> BindResult<BoundExpression> {
        let bound = self.bind_expression_kind(expr, own_statement)?;
        if !can_be_void && bound.ty.is_void() {
            self.report(NoValue {
                span: bound.span.clone(),
            });
            return Ok(BoundExpression::error(bound.span));
        }
        Ok(bound)
    }

    fn bind_expression_kind(&mut self, expr: &Expr, own_statement: bool) -> BindResult<BoundExpression> {
        match expr {
            Expr::Literal(node) => self.bind_literal(node),
            Expr::Name(node) => self.bind_name(node),
            Expr::Assignment(node) => self.bind_assignment(node),
            Expr::Unary(node) => self.bind_unary(node),
            Expr::Binary(node) => self.bind_binary(node),
            Expr::Ternary(node) => self.bind_ternary(node),
            Expr::Parenthesized(node) => {
                let inner = required(node.expression(), &node.syntax, "expression")?;
                self.bind_expression_kind(&inner, false)
            }
            Expr::Call(node) => self.bind_call(node),
            Expr::Index(node) => self.bind_index(node),
            Expr::MemberAccess(node) => self.bind_member_access(node),
            Expr::Prefix(node) => {
                let operand = required(node.operand(), &node.syntax, "operand")?;
                let operator = required(node.operator(), &node.syntax, "operator")?;
                self.bind_increment(&operand, &operator, node.span(), true, own_statement)
            }
            Expr::Postfix(node) => {
                let operand = required(node.operand(), &node.syntax, "operand")?;
                let operator = required(node.operator(), &node.syntax, "operator")?;
                self.bind_increment(&operand, &operator, node.span(), false, own_statement)
            }
            Expr::Cast(node) => self.bind_cast_expression(node),
            Expr::Reference(node) => self.bind_reference(node),
            Expr::Typeof(node) => self.bind_typeof(node),
            Expr::InitializerList(node) => self.bind_initializer_list(node, None),
            Expr::Empty(node) => Ok(BoundExpression::empty(node.span())),
        }
    }

    /// Convert `expr` to `to`, reporting when no allowed conversion exists.
    ///
    /// Returns the converted expression, an error expression after
    /// reporting, and the classification that was applied.
    pub(crate) fn bind_cast(
        &mut self,
        span: Span,
        expr: BoundExpression,
        to: &BoundType,
        allow_explicit: bool,
    ) -> (BoundExpression, Cast) {
        if expr.is_error() || to.is_error() {
            return (expr, Cast::Identity);
        }

        if expr.is_null_constant() && !to.is_nullable() {
            self.report(NullAssignOnNotNull { span: span.clone() });
            return (BoundExpression::error(span), Cast::None);
        }

        let cast = Cast::classify(&expr.ty, to);
        if !cast.exists() {
            self.report(CannotConvert {
                from: expr.ty.to_string(),
                to: to.to_string(),
                span: span.clone(),
            });
            return (BoundExpression::error(span), cast);
        }

        if cast.is_explicit() && !allow_explicit {
            self.report(CannotConvertImplicitly {
                from: expr.ty.to_string(),
                to: to.to_string(),
                span: span.clone(),
            });
            return (BoundExpression::error(span), cast);
        }

        if cast.is_identity() {
            if expr.ty.symbol().is_some() {
                return (expr, cast);
            }
            // `null` takes on the type it is converted to
            let value = expr.constant.unwrap_or(BoundConstant::Null);
            return (BoundExpression::typed_literal(value, to.clone(), expr.span), cast);
        }

        (BoundExpression::cast(to.clone(), expr, span), cast)
    }

    /// Bind a condition and convert it to `bool?`.
    pub(super) fn bind_condition(&mut self, expr: &Expr) -> BindResult<BoundExpression> {
        let bound = self.bind_expression(expr, false, false)?;
        let (bound, _) = self.bind_cast(expr.span(), bound, &BoundType::nullable_bool(), false);
        Ok(bound)
    }

    fn bind_literal(&mut self, node: &LiteralExpression) -> BindResult<BoundExpression> {
        let token = required(node.token(), &node.syntax, "token")?;
        let span = node.span();
        let text = token.text();

        let value = match token.kind() {
            SyntaxKind::IntegerLiteral => match text.parse::<i64>() {
                Ok(value) => BoundConstant::Int(value),
                Err(_) => return Ok(self.invalid_literal(text, span)),
            },
            SyntaxKind::DecimalLiteral => match text.parse::<f64>() {
                Ok(value) if value.is_finite() => BoundConstant::Decimal(value),
                _ => return Ok(self.invalid_literal(text, span)),
            },
            SyntaxKind::StringLiteral => BoundConstant::String(parse_string(text)),
            SyntaxKind::True => BoundConstant::Bool(true),
            SyntaxKind::False => BoundConstant::Bool(false),
            SyntaxKind::Null => BoundConstant::Null,
            found => {
                return Err(BinderError::UnexpectedSyntax {
                    expected: "literal token",
                    found,
                })
            }
        };

        Ok(BoundExpression::literal(value, span))
    }

    fn invalid_literal(&mut self, text: &str, span: Span) -> BoundExpression {
        self.report(InvalidLiteral {
            text: text.to_string(),
            span: span.clone(),
        });
        BoundExpression::error(span)
    }

    fn bind_name(&mut self, node: &NameExpression) -> BindResult<BoundExpression> {
        let identifier = required(node.identifier(), &node.syntax, "identifier")?;
        let span = node.span();
        self.bind_variable_name(&identifier, span)
    }

    fn bind_variable_name(&mut self, identifier: &SyntaxToken, span: Span) -> BindResult<BoundExpression> {
        let name = identifier.text();

        match self.scope.lookup_symbol(name).cloned() {
            Some(Symbol::Variable(variable)) => {
                self.track_usage(&variable);
                Ok(BoundExpression::variable(variable, span))
            }
            Some(Symbol::Function(_)) => {
                self.report(NotAVariable {
                    name: name.to_string(),
                    span: span.clone(),
                });
                Ok(BoundExpression::error(span))
            }
            Some(Symbol::Type(_)) | None => {
                self.report(UndefinedName {
                    name: name.to_string(),
                    span: span.clone(),
                });
                Ok(BoundExpression::error(span))
            }
        }
    }

    fn bind_assignment(&mut self, node: &AssignmentExpression) -> BindResult<BoundExpression> {
        let target_node = required(node.target(), &node.syntax, "target")?;
        let operator = required(node.operator(), &node.syntax, "operator")?;
        let value_node = required(node.value(), &node.syntax, "value")?;
        let span = node.span();

        let target = self.bind_expression(&target_node, false, false)?;
        let value = self.bind_expression(&value_node, false, false)?;
        if target.is_error() || value.is_error() {
            return Ok(BoundExpression::error(span));
        }

        if !target.is_assignable() {
            self.report(CannotAssign {
                span: target.span.clone(),
            });
            return Ok(BoundExpression::error(span));
        }

        let is_reference = matches!(value.kind, BoundExpressionKind::Reference(_));
        if (target.ty.is_constant() && !is_reference)
            || (target.ty.is_constant_reference() && is_reference)
        {
            self.report(ConstantAssignment {
                name: target.to_string(),
                span: target.span.clone(),
            });
            return Ok(BoundExpression::error(span));
        }

        if let Some(syntax) = operator.kind().compound_operator() {
            return self.bind_compound_assignment(target, syntax, value, span);
        }

        if is_reference && !target.ty.is_reference() {
            self.report(WrongInitializationReference {
                span: value.span.clone(),
            });
            return Ok(BoundExpression::error(span));
        }

        let value_span = value.span.clone();
        let (value, _) = self.bind_cast(value_span, value, &target.ty, false);
        if value.is_error() {
            return Ok(BoundExpression::error(span));
        }

        self.note_assignment(&target, &value);
        Ok(BoundExpression::assignment(target, value, span))
    }

    fn bind_compound_assignment(
        &mut self,
        target: BoundExpression,
        syntax: SyntaxKind,
        value: BoundExpression,
        span: Span,
    ) -> BindResult<BoundExpression> {
        let Some(op) = BoundBinaryOperator::bind(syntax, &target.ty, &value.ty) else {
            self.report(InvalidBinaryOperatorUse {
                op: syntax.text().to_string(),
                left: target.ty.to_string(),
                right: value.ty.to_string(),
                span: span.clone(),
            });
            return Ok(BoundExpression::error(span));
        };

        if op.kind.is_division() && value.constant.as_ref().is_some_and(BoundConstant::is_zero) {
            self.report(DivideByZero {
                span: value.span.clone(),
            });
            return Ok(BoundExpression::error(span));
        }

        let result = Cast::classify(&op.result_type, &target.ty);
        if !result.is_implicit() {
            let (from, to) = (op.result_type.to_string(), target.ty.to_string());
            if result.exists() {
                self.report(CannotConvertImplicitly { from, to, span: span.clone() });
            } else {
                self.report(CannotConvert { from, to, span: span.clone() });
            }
            return Ok(BoundExpression::error(span));
        }

        let value_span = value.span.clone();
        let (value, _) = self.bind_cast(value_span, value, &op.right_type, false);
        if value.is_error() {
            return Ok(BoundExpression::error(span));
        }

        Ok(BoundExpression::compound_assignment(target, op, value, span))
    }

    /// Remember that a variable now holds a non-null value.
    fn note_assignment(&mut self, target: &BoundExpression, value: &BoundExpression) {
        if value.is_null_constant() {
            return;
        }
        if let BoundExpressionKind::Variable(variable) = &target.kind {
            self.scope.note_assignment(&variable.name);
        }
    }

    fn bind_unary(&mut self, node: &UnaryExpression) -> BindResult<BoundExpression> {
        let operator = required(node.operator(), &node.syntax, "operator")?;
        let operand_node = required(node.operand(), &node.syntax, "operand")?;
        let span = node.span();

        let operand = self.bind_expression(&operand_node, false, false)?;
        if operand.is_error() {
            return Ok(BoundExpression::error(span));
        }

        let op = match operand.ty.symbol() {
            Some(_) => BoundUnaryOperator::bind(operator.kind(), &operand.ty),
            None => None,
        };
        let Some(op) = op else {
            self.report(InvalidUnaryOperatorUse {
                op: operator.text().to_string(),
                operand: operand.ty.to_string(),
                span: span.clone(),
            });
            return Ok(BoundExpression::error(span));
        };

        let operand_span = operand.span.clone();
        let (operand, _) = self.bind_cast(operand_span, operand, &op.operand_type, false);
        Ok(BoundExpression::unary(op, operand, span))
    }

    fn bind_binary(&mut self, node: &BinaryExpression) -> BindResult<BoundExpression> {
        let left_node = required(node.left(), &node.syntax, "left operand")?;
        let operator = required(node.operator(), &node.syntax, "operator")?;
        let right_node = required(node.right(), &node.syntax, "right operand")?;
        let span = node.span();

        let left = self.bind_expression(&left_node, false, false)?;
        let right = self.bind_expression(&right_node, false, false)?;
        if left.is_error() || right.is_error() {
            return Ok(BoundExpression::error(span));
        }

        let syntax = operator.kind();
        if matches!(syntax, SyntaxKind::Is | SyntaxKind::Isnt) && !right.is_null_constant() {
            self.report(UnsupportedIsOperator { span: span.clone() });
            return Ok(BoundExpression::error(span));
        }

        let Some(op) = BoundBinaryOperator::bind(syntax, &left.ty, &right.ty) else {
            self.report(InvalidBinaryOperatorUse {
                op: operator.text().to_string(),
                left: left.ty.to_string(),
                right: right.ty.to_string(),
                span: span.clone(),
            });
            return Ok(BoundExpression::error(span));
        };

        if matches!(op.kind, BinaryOperatorKind::Equal | BinaryOperatorKind::NotEqual)
            && (left.is_null_constant() || right.is_null_constant())
        {
            self.report(AlwaysValue {
                value: "null".to_string(),
                span: span.clone(),
            });
            return Ok(BoundExpression::literal(BoundConstant::Null, span));
        }

        if op.kind.is_division() && right.constant.as_ref().is_some_and(BoundConstant::is_zero) {
            self.report(DivideByZero {
                span: right.span.clone(),
            });
            return Ok(BoundExpression::error(span));
        }

        let left_span = left.span.clone();
        let right_span = right.span.clone();
        let (left, _) = self.bind_cast(left_span, left, &op.left_type, false);
        let (right, _) = self.bind_cast(right_span, right, &op.right_type, false);
        if left.is_error() || right.is_error() {
            return Ok(BoundExpression::error(span));
        }

        Ok(BoundExpression::binary(left, op, right, span))
    }

    fn bind_ternary(&mut self, node: &TernaryExpression) -> BindResult<BoundExpression> {
        let left_node = required(node.left(), &node.syntax, "condition")?;
        let left_operator = required(node.left_operator(), &node.syntax, "'?'")?;
        let center_node = required(node.center(), &node.syntax, "center operand")?;
        let right_operator = required(node.right_operator(), &node.syntax, "':'")?;
        let right_node = required(node.right(), &node.syntax, "right operand")?;
        let span = node.span();

        let left = self.bind_expression(&left_node, false, false)?;
        let center = self.bind_expression(&center_node, false, false)?;
        let right = self.bind_expression(&right_node, false, false)?;
        if left.is_error() || center.is_error() || right.is_error() {
            return Ok(BoundExpression::error(span));
        }

        let op = BoundTernaryOperator::bind(
            left_operator.kind(),
            right_operator.kind(),
            &left.ty,
            &center.ty,
            &right.ty,
        );
        let Some(op) = op else {
            self.report(InvalidTernaryOperatorUse {
                op: format!("{}{}", left_operator.text(), right_operator.text()),
                left: left.ty.to_string(),
                center: center.ty.to_string(),
                right: right.ty.to_string(),
                span: span.clone(),
            });
            return Ok(BoundExpression::error(span));
        };

        // Both branches take the center operand's type
        let condition_type = op.left_type.clone().with_nullable(left.ty.is_nullable());
        let left_span = left.span.clone();
        let center_span = center.span.clone();
        let right_span = right.span.clone();
        let (left, _) = self.bind_cast(left_span, left, &condition_type, false);
        let (center, _) = self.bind_cast(center_span, center, &op.center_type, false);
        let (right, _) = self.bind_cast(right_span, right, &op.center_type, false);
        if left.is_error() || center.is_error() || right.is_error() {
            return Ok(BoundExpression::error(span));
        }

        Ok(BoundExpression::ternary(left, op, center, right, span))
    }

    fn bind_index(&mut self, node: &IndexExpression) -> BindResult<BoundExpression> {
        let operand_node = required(node.operand(), &node.syntax, "operand")?;
        let index_node = required(node.index(), &node.syntax, "index")?;
        let span = node.span();

        let operand = self.bind_expression(&operand_node, false, false)?;
        let index = self.bind_expression(&index_node, false, false)?;
        if operand.is_error() || index.is_error() {
            return Ok(BoundExpression::error(span));
        }

        if operand.ty.dimensions() == 0 {
            self.report(CannotApplyIndexing {
                ty: operand.ty.to_string(),
                span: span.clone(),
            });
            return Ok(BoundExpression::error(span));
        }

        let index_span = index.span.clone();
        let (index, _) = self.bind_cast(index_span, index, &BoundType::nullable_int(), false);
        if index.is_error() {
            return Ok(BoundExpression::error(span));
        }

        Ok(BoundExpression::index(operand, index, span))
    }

    fn bind_member_access(&mut self, node: &MemberAccessExpression) -> BindResult<BoundExpression> {
        let operand_node = required(node.operand(), &node.syntax, "operand")?;
        let identifier = required(node.identifier(), &node.syntax, "member")?;
        let is_null_conditional = node.is_null_conditional();
        let span = node.span();

        let operand = self.bind_expression(&operand_node, false, false)?;
        if operand.is_error() {
            return Ok(BoundExpression::error(span));
        }

        let member = match operand.ty.struct_name() {
            Some(name) if operand.ty.dimensions() == 0 => self
                .struct_members(name)
                .and_then(|members| members.field(identifier.text()))
                .cloned(),
            _ => None,
        };
        let Some(member) = member else {
            self.report(NoSuchMember {
                ty: operand.ty.to_string(),
                member: identifier.text().to_string(),
                span: token_span(&identifier),
            });
            return Ok(BoundExpression::error(span));
        };

        if is_null_conditional && operand.ty.is_nullable() {
            if let BoundExpressionKind::Variable(variable) = &operand.kind {
                if !self.scope.is_assigned(&variable.name) {
                    self.report(PossibleNullDereference { span: span.clone() });
                }
            }
        }

        Ok(BoundExpression::member_access(
            operand,
            member,
            is_null_conditional,
            span,
        ))
    }

    /// `++x`, `x++`, `--x` and `x--`.
    ///
    /// Bound as `x += 1`. A postfix whose value is read becomes
    /// `(x += 1) - 1` so it still yields the old value.
    fn bind_increment(
        &mut self,
        operand_node: &Expr,
        operator: &SyntaxToken,
        span: Span,
        is_prefix: bool,
        own_statement: bool,
    ) -> BindResult<BoundExpression> {
        let operand = self.bind_expression(operand_node, false, false)?;
        if operand.is_error() {
            return Ok(BoundExpression::error(span));
        }

        if !operand.is_assignable() {
            self.report(CannotAssign {
                span: operand.span.clone(),
            });
            return Ok(BoundExpression::error(span));
        }

        if operand.ty.is_constant() {
            self.report(ConstantAssignment {
                name: operand.to_string(),
                span: operand.span.clone(),
            });
            return Ok(BoundExpression::error(span));
        }

        let increment = BoundIncrementOperator::bind(operator.kind(), &operand.ty);
        let one = BoundExpression::literal(BoundConstant::Int(1), span.clone());
        let step = increment.as_ref().and_then(|increment| {
            BoundBinaryOperator::bind(increment.binary_syntax(), &operand.ty, &one.ty)
        });
        let (Some(increment), Some(step)) = (increment, step) else {
            self.report(InvalidUnaryOperatorUse {
                op: operator.text().to_string(),
                operand: operand.ty.to_string(),
                span: span.clone(),
            });
            return Ok(BoundExpression::error(span));
        };

        let (step_value, _) = self.bind_cast(span.clone(), one.clone(), &step.right_type, false);
        let assignment = BoundExpression::compound_assignment(operand, step, step_value, span.clone());
        if is_prefix || own_statement {
            return Ok(assignment);
        }

        let Some(reverse) =
            BoundBinaryOperator::bind(increment.reverse_syntax(), &assignment.ty, &one.ty)
        else {
            return Ok(assignment);
        };
        let (one, _) = self.bind_cast(span.clone(), one, &reverse.right_type, false);
        let (assignment, _) = self.bind_cast(span.clone(), assignment, &reverse.left_type, false);
        Ok(BoundExpression::binary(assignment, reverse, one, span))
    }

    fn bind_cast_expression(&mut self, node: &CastExpression) -> BindResult<BoundExpression> {
        let clause = required(node.type_clause(), &node.syntax, "type clause")?;
        let operand_node = required(node.expression(), &node.syntax, "expression")?;
        let span = node.span();

        let Some(ty) = self.bind_type_clause(&clause) else {
            return Ok(BoundExpression::error(span));
        };
        let operand = self.bind_expression(&operand_node, false, false)?;
        let (bound, _) = self.bind_cast(span, operand, &ty, true);
        Ok(bound)
    }

    fn bind_reference(&mut self, node: &ReferenceExpression) -> BindResult<BoundExpression> {
        let identifier = required(node.identifier(), &node.syntax, "identifier")?;
        let span = node.span();

        let variable = self.bind_variable_name(&identifier, span.clone())?;
        match variable.kind {
            BoundExpressionKind::Variable(variable) => Ok(BoundExpression::reference(variable, span)),
            _ => Ok(BoundExpression::error(span)),
        }
    }

    fn bind_typeof(&mut self, node: &TypeofExpression) -> BindResult<BoundExpression> {
        let clause = required(node.type_clause(), &node.syntax, "type clause")?;
        let span = node.span();

        match self.bind_type_clause(&clause) {
            Some(ty) => Ok(BoundExpression::type_of(ty, span)),
            None => Ok(BoundExpression::error(span)),
        }
    }

    /// Bind `{a, b, ...}`.
    ///
    /// With a `target` array type every item converts to its element type.
    /// Without one, the element type is taken from the first item that has a
    /// type; a list of only `null`s (or no items) keeps no symbol.
    pub(super) fn bind_initializer_list(
        &mut self,
        node: &InitializerListExpression,
        target: Option<&BoundType>,
    ) -> BindResult<BoundExpression> {
        let span = node.span();
        let target_item = target.and_then(BoundType::child_type);

        let mut items = Vec::new();
        for item in node.items() {
            let bound = match (&item, &target_item) {
                (Expr::InitializerList(inner), Some(child)) => {
                    self.bind_initializer_list(inner, Some(child))?
                }
                _ => self.bind_expression(&item, false, false)?,
            };
            if bound.is_error() {
                return Ok(BoundExpression::error(span));
            }
            items.push(bound);
        }

        let item_type = match target_item {
            Some(child) => Some(child),
            None => items
                .iter()
                .find(|item| item.ty.symbol().is_some())
                .map(|item| item.ty.clone().with_literal(false).nullable()),
        };

        let Some(item_type) = item_type else {
            let ty = BoundType::null_literal().with_dimensions(1);
            return Ok(BoundExpression::initializer_list(items, ty, span));
        };

        let mut converted = Vec::with_capacity(items.len());
        for item in items {
            let item_span = item.span.clone();
            let (item, _) = self.bind_cast(item_span, item, &item_type, false);
            if item.is_error() {
                return Ok(BoundExpression::error(span));
            }
            converted.push(item);
        }

        let ty = item_type
            .clone()
            .with_dimensions(item_type.dimensions() + 1)
            .with_literal(true);
        Ok(BoundExpression::initializer_list(converted, ty, span))
    }
}

/// The value of a string literal token, quotes removed and escapes applied.
fn parse_string(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|text| text.strip_suffix('"'))
        .unwrap_or(text);

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use plover_bound_tree::{BoundConstant, BoundExpression, BoundExpressionKind, BoundType};
    use plover_syntax_tree::ast::Stmt;

    use super::super::test_support::{binder, parse_statement};
    use super::parse_string;

    fn bind(source: &str) -> (BoundExpression, Vec<String>) {
        let Some(Stmt::Expression(statement)) = parse_statement(source) else {
            panic!("expected an expression statement in {:?}", source);
        };
        let mut binder = binder();
        let bound = binder
            .bind_expression(&statement.expression().unwrap(), true, false)
            .unwrap();
        let messages = binder.diagnostics.iter().map(|d| d.message.clone()).collect();
        (bound, messages)
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(parse_string(r#""hello""#), "hello");
        assert_eq!(parse_string(r#""a\nb""#), "a\nb");
        assert_eq!(parse_string(r#""say \"hi\"""#), "say \"hi\"");
        assert_eq!(parse_string(r#""\q""#), "\\q");
    }

    #[test]
    fn test_arithmetic_folds() {
        let (bound, messages) = bind("1 + 2 * 3;");
        assert!(messages.is_empty(), "{:?}", messages);
        assert_eq!(bound.constant, Some(BoundConstant::Int(7)));
    }

    #[test]
    fn test_mixed_arithmetic_widens() {
        let (bound, _) = bind("1 + 2.5;");
        assert!(bound.ty.is(&plover_bound_tree::TypeSymbol::Decimal));
        assert_eq!(bound.constant, Some(BoundConstant::Decimal(3.5)));
    }

    #[test]
    fn test_divide_by_constant_zero() {
        let (bound, messages) = bind("10 / 0;");
        assert!(bound.is_error());
        assert_eq!(messages, vec!["cannot divide by zero"]);
    }

    #[test]
    fn test_comparison_with_null_warns() {
        let (bound, messages) = bind("1 == null;");
        assert!(bound.is_null_constant());
        assert_eq!(messages, vec!["expression will always result to 'null'"]);
    }

    #[test]
    fn test_is_requires_null() {
        let (bound, messages) = bind("1 is 2;");
        assert!(bound.is_error());
        assert_eq!(
            messages,
            vec!["cannot use 'is' or 'isnt' operators against non-null values"]
        );
    }

    #[test]
    fn test_undefined_name() {
        let (bound, messages) = bind("missing + 1;");
        assert!(bound.is_error());
        assert_eq!(messages, vec!["undefined symbol 'missing'"]);
    }

    #[test]
    fn test_invalid_operator() {
        let (_, messages) = bind("true + 1;");
        assert_eq!(
            messages,
            vec!["operator '+' is not defined for types 'bool' and 'int'"]
        );
    }

    #[test]
    fn test_explicit_cast() {
        let (bound, messages) = bind("(int)3.9;");
        assert!(messages.is_empty(), "{:?}", messages);
        assert_eq!(bound.ty, BoundType::nullable_int());
        assert_eq!(bound.constant, Some(BoundConstant::Int(3)));
    }

    #[test]
    fn test_ternary_folds() {
        let (bound, messages) = bind("true ? 1 : 2;");
        assert!(messages.is_empty(), "{:?}", messages);
        assert_eq!(bound.constant, Some(BoundConstant::Int(1)));
    }

    #[test]
    fn test_ternary_branches_share_center_type() {
        let (bound, messages) = bind("true ? 1 : 2;");
        assert!(messages.is_empty(), "{:?}", messages);
        let BoundExpressionKind::Ternary { op, center, right, .. } = &bound.kind else {
            panic!("expected a ternary, got {}", bound);
        };
        assert_eq!(center.ty, op.center_type);
        assert_eq!(right.ty, op.center_type);
        assert_eq!(bound.ty, op.result_type);
    }

    #[test]
    fn test_ternary_branch_needs_implicit_conversion() {
        let (bound, messages) = bind("true ? 1 : 2.5;");
        assert!(bound.is_error());
        assert_eq!(messages.len(), 1, "{:?}", messages);
        assert!(messages[0].ends_with("implicitly"), "{:?}", messages);
    }

    #[test]
    fn test_void_call_has_no_value() {
        let Some(Stmt::Expression(statement)) = parse_statement("PrintLine() + 1;") else {
            panic!("expected an expression statement");
        };
        let mut binder = binder();
        let bound = binder
            .bind_expression(&statement.expression().unwrap(), true, false)
            .unwrap();
        assert!(bound.is_error());
        let messages: Vec<_> = binder.diagnostics.iter().map(|d| d.message.clone()).collect();
        assert_eq!(messages, vec!["expression must have a value"]);
    }
}
