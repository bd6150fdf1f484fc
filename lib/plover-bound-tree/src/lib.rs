//! The bound tree: the typed, resolved form of a Plover program.
//!
//! This crate holds the value types shared by the binder and everything
//! downstream of it, along with the pure rules that operate on them:
//! cast classification, operator resolution and constant folding.

pub mod builtins;
pub mod cast;
pub mod constant;
pub mod expr;
pub mod fold;
pub mod operators;
pub mod stmt;
pub mod symbols;
pub mod ty;

pub use cast::Cast;
pub use constant::BoundConstant;
pub use expr::{BoundExpression, BoundExpressionKind};
pub use operators::{
    BinaryOperatorKind, BoundBinaryOperator, BoundIncrementOperator, BoundTernaryOperator,
    BoundUnaryOperator, IncrementKind, TernaryOperatorKind, UnaryOperatorKind,
};
pub use stmt::{BoundBlockStatement, BoundLabel, BoundStatement, LoopLabels};
pub use symbols::{
    FunctionDeclarationRef, FunctionSymbol, StructDeclarationRef, StructMembers, StructSymbol,
    VariableKind, VariableSymbol,
};
pub use ty::{BoundType, TypeSymbol};
