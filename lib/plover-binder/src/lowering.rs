//! Lowering of structured control flow.
//!
//! `if`, `while`, `do`/`while` and `for` become labels, gotos and
//! conditional gotos, and nested blocks are flattened into one statement
//! list. `try` keeps its shape with each part lowered in place. After
//! lowering, conditional gotos on constants are resolved and statements the
//! control-flow graph cannot reach are removed.

use std::rc::Rc;

use plover_bound_tree::{
    builtins, BinaryOperatorKind, BoundBlockStatement, BoundConstant, BoundExpression,
    BoundExpressionKind, BoundLabel, BoundStatement, BoundType, BoundUnaryOperator, FunctionSymbol,
    UnaryOperatorKind,
};
use plover_span::Span;
use plover_syntax_tree::SyntaxKind;
use tracing::trace;

use crate::cfg::ControlFlowGraph;
use crate::error::BindResult;

/// Lower the bound body of `function`.
///
/// A void function that can fall off its end gets a trailing `return;`.
pub fn lower(function: &FunctionSymbol, body: BoundBlockStatement) -> BindResult<BoundBlockStatement> {
    trace!(function = %function.name, "lowering body");
    let mut lowerer = Lowerer::default();
    let mut statements = lowerer.flatten(body);
    statements = fold_constant_gotos(statements);

    if function.return_type.is_void() && !statements.last().is_some_and(BoundStatement::is_return) {
        statements.push(BoundStatement::Return {
            value: None,
            span: 0..0,
        });
    }

    remove_dead_code(statements).map(BoundBlockStatement::new)
}

#[derive(Debug, Default)]
struct Lowerer {
    label_count: usize,
}

impl Lowerer {
    fn next_label(&mut self) -> BoundLabel {
        self.label_count += 1;
        BoundLabel::new(format!("Label{}", self.label_count))
    }

    fn flatten(&mut self, block: BoundBlockStatement) -> Vec<BoundStatement> {
        let mut out = Vec::new();
        for statement in block.statements {
            self.lower_statement(statement, &mut out);
        }
        out
    }

    fn lower_statement(&mut self, statement: BoundStatement, out: &mut Vec<BoundStatement>) {
        match statement {
            BoundStatement::Block(block) => {
                for statement in block.statements {
                    self.lower_statement(statement, out);
                }
            }
            BoundStatement::Expression(expr) => {
                out.push(BoundStatement::Expression(rewrite(expr)));
            }
            BoundStatement::VariableDeclaration {
                variable,
                initializer,
            } => out.push(BoundStatement::VariableDeclaration {
                variable,
                initializer: initializer.map(rewrite),
            }),
            BoundStatement::If {
                condition,
                then,
                otherwise: None,
            } => {
                // goto end unless condition
                // then
                // end:
                let end = self.next_label();
                out.push(BoundStatement::ConditionalGoto {
                    label: end.clone(),
                    condition: rewrite(condition),
                    jump_if_true: false,
                });
                self.lower_statement(*then, out);
                out.push(BoundStatement::Label(end));
            }
            BoundStatement::If {
                condition,
                then,
                otherwise: Some(otherwise),
            } => {
                // goto else unless condition
                // then
                // goto end
                // else:
                // otherwise
                // end:
                let else_label = self.next_label();
                let end = self.next_label();
                out.push(BoundStatement::ConditionalGoto {
                    label: else_label.clone(),
                    condition: rewrite(condition),
                    jump_if_true: false,
                });
                self.lower_statement(*then, out);
                out.push(BoundStatement::Goto(end.clone()));
                out.push(BoundStatement::Label(else_label));
                self.lower_statement(*otherwise, out);
                out.push(BoundStatement::Label(end));
            }
            BoundStatement::While {
                condition,
                body,
                labels,
            } => {
                // goto continue
                // body:
                // body
                // continue:
                // goto body if condition
                // break:
                let body_label = self.next_label();
                out.push(BoundStatement::Goto(labels.continue_label.clone()));
                out.push(BoundStatement::Label(body_label.clone()));
                self.lower_statement(*body, out);
                out.push(BoundStatement::Label(labels.continue_label));
                out.push(BoundStatement::ConditionalGoto {
                    label: body_label,
                    condition: rewrite(condition),
                    jump_if_true: true,
                });
                out.push(BoundStatement::Label(labels.break_label));
            }
            BoundStatement::DoWhile {
                body,
                condition,
                labels,
            } => {
                let body_label = self.next_label();
                out.push(BoundStatement::Label(body_label.clone()));
                self.lower_statement(*body, out);
                out.push(BoundStatement::Label(labels.continue_label));
                out.push(BoundStatement::ConditionalGoto {
                    label: body_label,
                    condition: rewrite(condition),
                    jump_if_true: true,
                });
                out.push(BoundStatement::Label(labels.break_label));
            }
            BoundStatement::For {
                initializer,
                condition,
                step,
                body,
                labels,
            } => {
                // initializer
                // goto check
                // body:
                // body
                // continue:
                // step
                // check:
                // goto body if condition
                // break:
                let body_label = self.next_label();
                let check = self.next_label();
                self.lower_statement(*initializer, out);
                out.push(BoundStatement::Goto(check.clone()));
                out.push(BoundStatement::Label(body_label.clone()));
                self.lower_statement(*body, out);
                out.push(BoundStatement::Label(labels.continue_label));
                if !matches!(step.kind, BoundExpressionKind::Empty) {
                    out.push(BoundStatement::Expression(rewrite(step)));
                }
                out.push(BoundStatement::Label(check));
                out.push(BoundStatement::ConditionalGoto {
                    label: body_label,
                    condition: rewrite(condition),
                    jump_if_true: true,
                });
                out.push(BoundStatement::Label(labels.break_label));
            }
            BoundStatement::Try {
                body,
                catch,
                finally,
            } => {
                let body = BoundBlockStatement::new(self.flatten(body));
                let catch = catch.map(|block| BoundBlockStatement::new(self.flatten(block)));
                let finally = finally.map(|block| BoundBlockStatement::new(self.flatten(block)));
                out.push(BoundStatement::Try {
                    body,
                    catch,
                    finally,
                });
            }
            BoundStatement::Return { value, span } => out.push(BoundStatement::Return {
                value: value.map(rewrite),
                span,
            }),
            BoundStatement::ConditionalGoto {
                label,
                condition,
                jump_if_true,
            } => out.push(BoundStatement::ConditionalGoto {
                label,
                condition: rewrite(condition),
                jump_if_true,
            }),
            BoundStatement::Nop => {}
            other @ (BoundStatement::Goto(_) | BoundStatement::Label(_)) => out.push(other),
        }
    }
}

/// `goto L if true` becomes `goto L`; `goto L if false` disappears.
fn fold_constant_gotos(statements: Vec<BoundStatement>) -> Vec<BoundStatement> {
    statements
        .into_iter()
        .filter_map(|statement| match statement {
            BoundStatement::ConditionalGoto {
                label,
                condition,
                jump_if_true,
            } => match condition.constant {
                Some(BoundConstant::Bool(value)) if value == jump_if_true => {
                    Some(BoundStatement::Goto(label))
                }
                Some(BoundConstant::Bool(_)) => None,
                _ => Some(BoundStatement::ConditionalGoto {
                    label,
                    condition,
                    jump_if_true,
                }),
            },
            other => Some(other),
        })
        .collect()
}

fn remove_dead_code(statements: Vec<BoundStatement>) -> BindResult<Vec<BoundStatement>> {
    let reachable = ControlFlowGraph::build(&statements)?.reachable_statements();
    Ok(statements
        .into_iter()
        .enumerate()
        .filter(|(index, _)| reachable.binary_search(index).is_ok())
        .map(|(_, statement)| statement)
        .collect())
}

/// Rewrite `x is null` to `!HasValue(x)` and `x isnt null` to `HasValue(x)`,
/// everywhere inside `expr`.
fn rewrite(expr: BoundExpression) -> BoundExpression {
    let BoundExpression {
        kind,
        ty,
        constant,
        span,
    } = expr;

    let boxed = |expr: Box<BoundExpression>| Box::new(rewrite(*expr));

    let kind = match kind {
        BoundExpressionKind::Binary { left, op, right: _ }
            if matches!(op.kind, BinaryOperatorKind::Is | BinaryOperatorKind::Isnt)
                && constant.is_none() =>
        {
            let has_value = has_value(rewrite(*left), span.clone());
            if op.kind == BinaryOperatorKind::Isnt {
                return has_value;
            }
            return negate(has_value, span);
        }
        BoundExpressionKind::Binary { left, op, right } => BoundExpressionKind::Binary {
            left: boxed(left),
            op,
            right: boxed(right),
        },
        BoundExpressionKind::Assignment { target, value } => BoundExpressionKind::Assignment {
            target: boxed(target),
            value: boxed(value),
        },
        BoundExpressionKind::CompoundAssignment { target, op, value } => {
            BoundExpressionKind::CompoundAssignment {
                target: boxed(target),
                op,
                value: boxed(value),
            }
        }
        BoundExpressionKind::Unary { op, operand } => BoundExpressionKind::Unary {
            op,
            operand: boxed(operand),
        },
        BoundExpressionKind::Ternary {
            left,
            op,
            center,
            right,
        } => BoundExpressionKind::Ternary {
            left: boxed(left),
            op,
            center: boxed(center),
            right: boxed(right),
        },
        BoundExpressionKind::Call {
            function,
            arguments,
        } => BoundExpressionKind::Call {
            function,
            arguments: arguments.into_iter().map(rewrite).collect(),
        },
        BoundExpressionKind::Cast { operand } => BoundExpressionKind::Cast {
            operand: boxed(operand),
        },
        BoundExpressionKind::Index { operand, index } => BoundExpressionKind::Index {
            operand: boxed(operand),
            index: boxed(index),
        },
        BoundExpressionKind::MemberAccess {
            operand,
            member,
            is_null_conditional,
        } => BoundExpressionKind::MemberAccess {
            operand: boxed(operand),
            member,
            is_null_conditional,
        },
        BoundExpressionKind::InitializerList { items } => BoundExpressionKind::InitializerList {
            items: items.into_iter().map(rewrite).collect(),
        },
        other => other,
    };

    BoundExpression {
        kind,
        ty,
        constant,
        span,
    }
}

fn has_value(operand: BoundExpression, span: Span) -> BoundExpression {
    let function = Rc::new(builtins::has_value_any());
    let parameter = BoundType::nullable_any();
    let argument = BoundExpression::cast(parameter, operand, span.clone());
    BoundExpression::call(function, vec![argument], span)
}

fn negate(operand: BoundExpression, span: Span) -> BoundExpression {
    let op = BoundUnaryOperator {
        syntax: SyntaxKind::Bang,
        kind: UnaryOperatorKind::BooleanNegation,
        operand_type: BoundType::bool(),
        result_type: BoundType::bool(),
    };
    BoundExpression::unary(op, operand, span)
}
