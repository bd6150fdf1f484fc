//! Bound statements.
//!
//! Structured statements (`If`, loops, `Block`) come out of the binder;
//! `Goto`, `ConditionalGoto`, `Label` and `Nop` are only introduced by
//! lowering.

use std::fmt;
use std::rc::Rc;

use plover_span::Span;

use crate::expr::BoundExpression;
use crate::symbols::VariableSymbol;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundLabel(pub String);

impl BoundLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoundLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Jump targets of an enclosing loop.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoopLabels {
    pub break_label: BoundLabel,
    pub continue_label: BoundLabel,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundBlockStatement {
    pub statements: Vec<BoundStatement>,
}

impl BoundBlockStatement {
    pub fn new(statements: Vec<BoundStatement>) -> Self {
        Self { statements }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoundStatement {
    Block(BoundBlockStatement),
    Expression(BoundExpression),
    VariableDeclaration {
        variable: Rc<VariableSymbol>,
        initializer: Option<BoundExpression>,
    },
    If {
        condition: BoundExpression,
        then: Box<BoundStatement>,
        otherwise: Option<Box<BoundStatement>>,
    },
    While {
        condition: BoundExpression,
        body: Box<BoundStatement>,
        labels: LoopLabels,
    },
    DoWhile {
        body: Box<BoundStatement>,
        condition: BoundExpression,
        labels: LoopLabels,
    },
    For {
        initializer: Box<BoundStatement>,
        condition: BoundExpression,
        step: BoundExpression,
        body: Box<BoundStatement>,
        labels: LoopLabels,
    },
    Try {
        body: BoundBlockStatement,
        catch: Option<BoundBlockStatement>,
        finally: Option<BoundBlockStatement>,
    },
    Return {
        value: Option<BoundExpression>,
        span: Span,
    },
    Goto(BoundLabel),
    ConditionalGoto {
        label: BoundLabel,
        condition: BoundExpression,
        jump_if_true: bool,
    },
    Label(BoundLabel),
    Nop,
}

impl BoundStatement {
    pub fn is_return(&self) -> bool {
        matches!(self, BoundStatement::Return { .. })
    }

    /// Statements after which control never falls through to the next one.
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            BoundStatement::Goto(_)
                | BoundStatement::ConditionalGoto { .. }
                | BoundStatement::Return { .. }
        )
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "    ".repeat(indent);

        match self {
            BoundStatement::Block(block) => {
                writeln!(f, "{}{{", pad)?;
                for statement in &block.statements {
                    statement.write(f, indent + 1)?;
                }
                writeln!(f, "{}}}", pad)
            }
            BoundStatement::Expression(expr) => writeln!(f, "{}{};", pad, expr),
            BoundStatement::VariableDeclaration {
                variable,
                initializer,
            } => match initializer {
                Some(init) => writeln!(f, "{}{} = {};", pad, variable, init),
                None => writeln!(f, "{}{};", pad, variable),
            },
            BoundStatement::If {
                condition,
                then,
                otherwise,
            } => {
                writeln!(f, "{}if ({})", pad, condition)?;
                then.write(f, indent + 1)?;
                if let Some(otherwise) = otherwise {
                    writeln!(f, "{}else", pad)?;
                    otherwise.write(f, indent + 1)?;
                }
                Ok(())
            }
            BoundStatement::While {
                condition, body, ..
            } => {
                writeln!(f, "{}while ({})", pad, condition)?;
                body.write(f, indent + 1)
            }
            BoundStatement::DoWhile {
                body, condition, ..
            } => {
                writeln!(f, "{}do", pad)?;
                body.write(f, indent + 1)?;
                writeln!(f, "{}while ({});", pad, condition)
            }
            BoundStatement::For {
                initializer,
                condition,
                step,
                body,
                ..
            } => {
                writeln!(f, "{}for", pad)?;
                initializer.write(f, indent + 1)?;
                writeln!(f, "{}    ({}; {})", pad, condition, step)?;
                body.write(f, indent + 1)
            }
            BoundStatement::Try {
                body,
                catch,
                finally,
            } => {
                writeln!(f, "{}try", pad)?;
                BoundStatement::Block(body.clone()).write(f, indent)?;
                if let Some(catch) = catch {
                    writeln!(f, "{}catch", pad)?;
                    BoundStatement::Block(catch.clone()).write(f, indent)?;
                }
                if let Some(finally) = finally {
                    writeln!(f, "{}finally", pad)?;
                    BoundStatement::Block(finally.clone()).write(f, indent)?;
                }
                Ok(())
            }
            BoundStatement::Return { value, .. } => match value {
                Some(value) => writeln!(f, "{}return {};", pad, value),
                None => writeln!(f, "{}return;", pad),
            },
            BoundStatement::Goto(label) => writeln!(f, "{}goto {};", pad, label),
            BoundStatement::ConditionalGoto {
                label,
                condition,
                jump_if_true,
            } => {
                let keyword = if *jump_if_true { "if" } else { "unless" };
                writeln!(f, "{}goto {} {} ({});", pad, label, keyword, condition)
            }
            BoundStatement::Label(label) => writeln!(f, "{}:", label),
            BoundStatement::Nop => writeln!(f, "{}nop;", pad),
        }
    }
}

impl fmt::Display for BoundStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, 0)
    }
}

impl fmt::Display for BoundBlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            statement.write(f, 0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::BoundConstant;

    #[test]
    fn test_terminators() {
        let ret = BoundStatement::Return {
            value: None,
            span: 0..6,
        };
        assert!(ret.is_terminator());
        assert!(ret.is_return());
        assert!(BoundStatement::Goto(BoundLabel::new("Label1")).is_terminator());
        assert!(!BoundStatement::Label(BoundLabel::new("Label1")).is_terminator());
        assert!(!BoundStatement::Nop.is_terminator());
    }

    #[test]
    fn test_display_lowered_body() {
        let block = BoundBlockStatement::new(vec![
            BoundStatement::ConditionalGoto {
                label: BoundLabel::new("Label1"),
                condition: BoundExpression::literal(BoundConstant::Bool(true), 0..4),
                jump_if_true: false,
            },
            BoundStatement::Return {
                value: Some(BoundExpression::literal(BoundConstant::Int(1), 0..1)),
                span: 0..9,
            },
            BoundStatement::Label(BoundLabel::new("Label1")),
        ]);
        assert_eq!(
            block.to_string(),
            "goto Label1 unless (true);\nreturn 1;\nLabel1:\n"
        );
    }
}
