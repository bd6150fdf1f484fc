//! Control-flow graphs over lowered function bodies.
//!
//! A body is split into basic blocks at labels and after every goto,
//! conditional goto and return. Edges whose condition folds to `false` are
//! never added, and blocks nothing can reach are pruned, so code after an
//! unconditional return does not count as falling off the end.

use std::io;

use plover_bound_tree::{BoundBlockStatement, BoundConstant, BoundExpression, BoundLabel, BoundStatement};
use tracing::trace;

use crate::error::{BindResult, BinderError};

const START: usize = 0;
const END: usize = 1;

/// Statements of a body, by index, that run in sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicBlock {
    pub statements: Vec<usize>,
}

/// The condition an edge is taken under.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeCondition {
    pub expression: BoundExpression,
    /// Taken when `expression` is false
    pub negated: bool,
}

impl EdgeCondition {
    /// `Some` when the condition is a known boolean.
    fn fold(&self) -> Option<bool> {
        match self.expression.constant {
            Some(BoundConstant::Bool(value)) => Some(value != self.negated),
            _ => None,
        }
    }

    fn negate(&self) -> Self {
        Self {
            expression: self.expression.clone(),
            negated: !self.negated,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlockEdge {
    pub from: usize,
    pub to: usize,
    pub condition: Option<EdgeCondition>,
}

/// Blocks `0` and `1` are the synthetic start and end; body blocks follow
/// in statement order.
#[derive(Debug)]
pub struct ControlFlowGraph<'a> {
    statements: &'a [BoundStatement],
    blocks: Vec<BasicBlock>,
    edges: Vec<BasicBlockEdge>,
    removed: Vec<bool>,
}

impl<'a> ControlFlowGraph<'a> {
    /// Build the graph of a lowered statement list.
    ///
    /// A goto to a label that is not in `statements` is an internal error.
    pub fn build(statements: &'a [BoundStatement]) -> BindResult<Self> {
        let mut blocks = vec![BasicBlock::default(), BasicBlock::default()];
        blocks.extend(partition(statements));

        let mut graph = Self {
            statements,
            removed: vec![false; blocks.len()],
            blocks,
            edges: Vec::new(),
        };
        graph.connect()?;
        graph.prune();
        trace!(
            blocks = graph.blocks().count(),
            edges = graph.edges.len(),
            "built control-flow graph"
        );
        Ok(graph)
    }

    /// Whether every path from the start of `body` ends in a return.
    pub fn all_paths_return(body: &BoundBlockStatement) -> BindResult<bool> {
        let graph = ControlFlowGraph::build(&body.statements)?;
        Ok(graph.returns_on_all_paths())
    }

    fn returns_on_all_paths(&self) -> bool {
        self.edges
            .iter()
            .filter(|edge| edge.to == END)
            .all(|edge| {
                self.blocks[edge.from]
                    .statements
                    .last()
                    .is_some_and(|&index| self.statements[index].is_return())
            })
    }

    pub fn blocks(&self) -> impl Iterator<Item = (usize, &BasicBlock)> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.removed[*index])
    }

    pub fn edges(&self) -> &[BasicBlockEdge] {
        &self.edges
    }

    /// Indices of statements in blocks the start can reach, in order.
    pub fn reachable_statements(&self) -> Vec<usize> {
        let mut reachable: Vec<usize> = self
            .blocks()
            .flat_map(|(_, block)| block.statements.iter().copied())
            .collect();
        reachable.sort_unstable();
        reachable
    }

    fn block_of_label(&self, label: &BoundLabel) -> BindResult<usize> {
        self.blocks
            .iter()
            .position(|block| {
                block.statements.first().is_some_and(|&index| {
                    matches!(&self.statements[index], BoundStatement::Label(found) if found == label)
                })
            })
            .ok_or_else(|| BinderError::MissingLabel(label.name().to_string()))
    }

    fn connect(&mut self) -> BindResult<()> {
        let statements = self.statements;
        let count = self.blocks.len();
        if count == 2 {
            self.add_edge(START, END, None);
            return Ok(());
        }
        self.add_edge(START, END + 1, None);

        for from in END + 1..count {
            let next = if from + 1 == count { END } else { from + 1 };
            let last = self.blocks[from]
                .statements
                .last()
                .map(|&index| &statements[index]);

            match last {
                Some(BoundStatement::Goto(label)) => {
                    let to = self.block_of_label(label)?;
                    self.add_edge(from, to, None);
                }
                Some(BoundStatement::ConditionalGoto {
                    label,
                    condition,
                    jump_if_true,
                }) => {
                    let to = self.block_of_label(label)?;
                    let taken = EdgeCondition {
                        expression: condition.clone(),
                        negated: !jump_if_true,
                    };
                    let fallthrough = taken.negate();
                    self.add_edge(from, to, Some(taken));
                    self.add_edge(from, next, Some(fallthrough));
                }
                Some(BoundStatement::Return { .. }) => self.add_edge(from, END, None),
                _ => self.add_edge(from, next, None),
            }
        }
        Ok(())
    }

    fn add_edge(&mut self, from: usize, to: usize, condition: Option<EdgeCondition>) {
        let condition = match condition {
            Some(condition) => match condition.fold() {
                Some(false) => return,
                Some(true) => None,
                None => Some(condition),
            },
            None => None,
        };
        self.edges.push(BasicBlockEdge {
            from,
            to,
            condition,
        });
    }

    /// Remove blocks with no incoming edges until none are left.
    fn prune(&mut self) {
        loop {
            let unreachable = (END..self.blocks.len()).find(|&block| {
                !self.removed[block] && !self.edges.iter().any(|edge| edge.to == block)
            });
            let Some(block) = unreachable else {
                break;
            };
            self.removed[block] = true;
            self.edges.retain(|edge| edge.from != block);
        }
    }

    /// Write the graph in Graphviz format.
    pub fn write_dot(&self, out: &mut impl io::Write) -> io::Result<()> {
        writeln!(out, "digraph G {{")?;
        for (index, block) in self.blocks() {
            let label = match index {
                START => "<Start>".to_string(),
                END => "<End>".to_string(),
                _ => block
                    .statements
                    .iter()
                    .map(|&statement| self.statements[statement].to_string())
                    .collect::<String>(),
            };
            writeln!(out, "    N{} [label = \"{}\", shape = box]", index, escape(&label))?;
        }
        for edge in &self.edges {
            let label = match &edge.condition {
                Some(condition) if condition.negated => format!("!({})", condition.expression),
                Some(condition) => condition.expression.to_string(),
                None => String::new(),
            };
            writeln!(out, "    N{} -> N{} [label = \"{}\"]", edge.from, edge.to, escape(&label))?;
        }
        writeln!(out, "}}")
    }
}

/// Split `statements` into basic blocks.
fn partition(statements: &[BoundStatement]) -> Vec<BasicBlock> {
    let mut blocks = Vec::new();
    let mut current = BasicBlock::default();

    for (index, statement) in statements.iter().enumerate() {
        if matches!(statement, BoundStatement::Label(_)) && !current.statements.is_empty() {
            blocks.push(std::mem::take(&mut current));
        }
        current.statements.push(index);
        if statement.is_terminator() {
            blocks.push(std::mem::take(&mut current));
        }
    }

    if !current.statements.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn escape(text: &str) -> String {
    text.replace('"', "\\\"").replace('\n', "\\l")
}

#[cfg(test)]
mod tests {
    use plover_bound_tree::{BoundConstant, BoundExpression, BoundLabel, BoundStatement};

    use super::*;

    fn label(name: &str) -> BoundLabel {
        BoundLabel::new(name)
    }

    fn ret() -> BoundStatement {
        BoundStatement::Return {
            value: Some(BoundExpression::literal(BoundConstant::Int(1), 0..1)),
            span: 0..9,
        }
    }

    fn unknown_condition() -> BoundExpression {
        BoundExpression::error(0..1)
    }

    fn returns(statements: Vec<BoundStatement>) -> bool {
        ControlFlowGraph::all_paths_return(&BoundBlockStatement::new(statements)).unwrap()
    }

    #[test]
    fn test_empty_body_does_not_return() {
        assert!(!returns(vec![]));
    }

    #[test]
    fn test_straight_line_return() {
        assert!(returns(vec![BoundStatement::Nop, ret()]));
    }

    #[test]
    fn test_one_branch_missing_return() {
        // goto Label1 unless (?); return 1; Label1:
        let statements = vec![
            BoundStatement::ConditionalGoto {
                label: label("Label1"),
                condition: unknown_condition(),
                jump_if_true: false,
            },
            ret(),
            BoundStatement::Label(label("Label1")),
        ];
        assert!(!returns(statements));
    }

    #[test]
    fn test_both_branches_return() {
        let statements = vec![
            BoundStatement::ConditionalGoto {
                label: label("Label1"),
                condition: unknown_condition(),
                jump_if_true: false,
            },
            ret(),
            BoundStatement::Label(label("Label1")),
            ret(),
        ];
        assert!(returns(statements));
    }

    #[test]
    fn test_code_after_return_is_pruned() {
        let statements = vec![ret(), BoundStatement::Nop];
        let graph = ControlFlowGraph::build(&statements).unwrap();
        assert_eq!(graph.reachable_statements(), vec![0]);
        assert!(graph.returns_on_all_paths());
    }

    #[test]
    fn test_constant_false_edge_is_dropped() {
        // goto Label1 if (false); return 1; Label1:
        let statements = vec![
            BoundStatement::ConditionalGoto {
                label: label("Label1"),
                condition: BoundExpression::literal(BoundConstant::Bool(false), 0..5),
                jump_if_true: true,
            },
            ret(),
            BoundStatement::Label(label("Label1")),
        ];
        assert!(returns(statements));
    }

    #[test]
    fn test_infinite_loop_never_reaches_end() {
        let statements = vec![
            BoundStatement::Label(label("Label1")),
            BoundStatement::Goto(label("Label1")),
        ];
        assert!(returns(statements));
    }

    #[test]
    fn test_missing_label_is_internal_error() {
        let statements = vec![BoundStatement::Goto(label("Nowhere"))];
        assert_eq!(
            ControlFlowGraph::build(&statements).unwrap_err(),
            BinderError::MissingLabel("Nowhere".to_string())
        );
    }

    #[test]
    fn test_write_dot() {
        let statements = vec![ret()];
        let graph = ControlFlowGraph::build(&statements).unwrap();
        let mut out = Vec::new();
        graph.write_dot(&mut out).unwrap();
        let dot = String::from_utf8(out).unwrap();
        assert!(dot.starts_with("digraph G {"));
        assert!(dot.contains("N0 -> N2"));
        assert!(dot.contains("N2 -> N1"));
    }
}
