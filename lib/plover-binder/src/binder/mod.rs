//! The binder.
//!
//! A [`Binder`] walks syntax depth first and produces bound nodes, pushing
//! user-facing problems onto its [`DiagnosticQueue`] and returning
//! [`BinderError`] only for malformed trees and broken invariants.
//!
//! One binder is created for the global scope of a submission and one per
//! function body. Local functions are bound by the binder of their enclosing
//! function, lazily, the first time they are called.
//!
//! # Module Structure
//!
//! - [`global`]: global scope binding and entry point selection
//! - [`program`]: per-function body binding
//! - `declarations`: struct, function and parameter declarations
//! - `types`: type clauses
//! - `statements`: statements, blocks and variable declarations
//! - `expressions`: expression dispatch and casts
//! - `calls`: calls and lazy local function binding

mod calls;
mod declarations;
mod expressions;
mod global;
mod program;
mod statements;
mod types;

pub use global::{bind_global_scope, BoundGlobalScope, SourceTree};
pub use program::{bind_program, BoundProgram};

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use plover_bound_tree::{
    builtins, BoundBlockStatement, BoundLabel, FunctionSymbol, LoopLabels, StructMembers,
    VariableKind, VariableSymbol,
};
use plover_reporting::{DiagnosticQueue, IntoDiagnostic};
use plover_syntax_tree::ast::{token_span, BlockStatement, FunctionNode, Stmt};
use plover_syntax_tree::{SyntaxNode, SyntaxToken};

use crate::diagnostics::AlreadyDeclared;
use crate::error::{BindResult, BinderError};
use crate::scope::BoundScope;
use crate::BinderOptions;

/// A local function whose declaration has been seen but whose body has not
/// been bound yet.
#[derive(Debug, Clone)]
struct UnresolvedLocal {
    node: FunctionNode,
}

/// State that belongs to the function currently being bound.
///
/// Swapped out while a local function's body is bound and restored after.
#[derive(Debug, Default)]
struct FunctionContext {
    function: Option<Rc<FunctionSymbol>>,
    loop_stack: Vec<LoopLabels>,
    peeked_locals: Vec<String>,
    check_peeked_locals: usize,
}

pub(crate) struct Binder {
    options: BinderOptions,
    pub(crate) scope: BoundScope,
    pub(crate) diagnostics: DiagnosticQueue,
    /// File that diagnostics are currently attributed to
    file_id: usize,
    context: FunctionContext,
    label_count: usize,
    /// Enclosing function names, outermost first
    inner_prefix: Vec<String>,
    unresolved_locals: HashMap<String, UnresolvedLocal>,
    resolved_locals: HashSet<String>,
    /// Lowered bodies of every local function bound so far
    function_bodies: Vec<(Rc<FunctionSymbol>, BoundBlockStatement)>,
    /// One frame per local function being bound; variables read inside it
    tracked_symbols: Vec<Vec<Rc<VariableSymbol>>>,
    /// One frame per local function being bound; variables declared inside it
    tracked_declarations: Vec<Vec<Rc<VariableSymbol>>>,
    struct_members: Vec<StructMembers>,
}

impl Binder {
    pub(crate) fn new(options: BinderOptions, scope: BoundScope, file_id: usize) -> Self {
        Self {
            options,
            scope,
            diagnostics: DiagnosticQueue::new(),
            file_id,
            context: FunctionContext::default(),
            label_count: 0,
            inner_prefix: Vec::new(),
            unresolved_locals: HashMap::new(),
            resolved_locals: HashSet::new(),
            function_bodies: Vec::new(),
            tracked_symbols: Vec::new(),
            tracked_declarations: Vec::new(),
            struct_members: Vec::new(),
        }
    }

    /// A binder for the body of `function`, with its parameters in scope.
    pub(crate) fn for_function(
        options: BinderOptions,
        mut scope: BoundScope,
        function: Rc<FunctionSymbol>,
        file_id: usize,
        struct_members: Vec<StructMembers>,
    ) -> Self {
        scope.push();
        for parameter in &function.parameters {
            scope.try_declare_variable(parameter.clone());
        }

        let mut binder = Self::new(options, scope, file_id);
        binder.inner_prefix.push(function.name.clone());
        binder.context.function = Some(function);
        binder.struct_members = struct_members;
        binder
    }

    pub(crate) fn report<D: IntoDiagnostic>(&mut self, diagnostic: D) {
        self.diagnostics.push(diagnostic, self.file_id);
    }

    fn is_script(&self) -> bool {
        self.options.script_mode
    }

    fn variable_kind(&self) -> VariableKind {
        if self.context.function.is_some() {
            VariableKind::Local
        } else {
            VariableKind::Global
        }
    }

    /// Declare a variable in the current frame, reporting a redefinition.
    fn declare_variable(&mut self, identifier: &SyntaxToken, variable: VariableSymbol) -> Rc<VariableSymbol> {
        let variable = Rc::new(variable);
        if !self.scope.try_declare_variable(variable.clone()) {
            self.report(AlreadyDeclared {
                name: variable.name.clone(),
                span: token_span(identifier),
            });
        }

        for frame in &mut self.tracked_declarations {
            frame.push(variable.clone());
        }
        variable
    }

    /// Record a read of `variable` for capture inference.
    pub(crate) fn track_usage(&mut self, variable: &Rc<VariableSymbol>) {
        for frame in &mut self.tracked_symbols {
            if !frame.iter().any(|tracked| Rc::ptr_eq(tracked, variable)) {
                frame.push(variable.clone());
            }
        }
    }

    /// Mangled name of the innermost entry in the prefix, e.g. `<main::inner>$`.
    fn inner_name(&self) -> String {
        format!("<{}>$", self.inner_prefix.join("::"))
    }

    fn inner_name_of(&mut self, name: &str) -> String {
        self.inner_prefix.push(name.to_string());
        let inner = self.inner_name();
        self.inner_prefix.pop();
        inner
    }

    fn next_loop_labels(&mut self) -> LoopLabels {
        self.label_count += 1;
        LoopLabels {
            break_label: BoundLabel::new(format!("Break{}", self.label_count)),
            continue_label: BoundLabel::new(format!("Continue{}", self.label_count)),
        }
    }

    fn struct_members(&self, name: &str) -> Option<&StructMembers> {
        self.struct_members
            .iter()
            .find(|members| members.symbol.name == name)
    }

    /// Hand over every local function body bound so far.
    pub(crate) fn take_function_bodies(&mut self) -> Vec<(Rc<FunctionSymbol>, BoundBlockStatement)> {
        std::mem::take(&mut self.function_bodies)
    }
}

/// Top-level variable names of a body plus its parameter names.
///
/// A declaration in a nested block that reuses one of these names is
/// reported as shadowing.
fn peek_locals<'a>(
    statements: impl Iterator<Item = Stmt>,
    parameters: impl Iterator<Item = &'a Rc<VariableSymbol>>,
) -> Vec<String> {
    let mut locals: Vec<String> = statements
        .filter_map(|statement| match statement {
            Stmt::VariableDeclaration(declaration) => declaration.identifier(),
            _ => None,
        })
        .map(|identifier| identifier.text().to_string())
        .collect();
    locals.extend(parameters.map(|parameter| parameter.name.clone()));
    locals
}

fn peek_body_locals(body: &BlockStatement, function: &FunctionSymbol) -> Vec<String> {
    peek_locals(body.statements(), function.parameters.iter())
}

/// Unwrap a child the parser always produces for well-formed input.
fn required<T>(value: Option<T>, node: &SyntaxNode, part: &'static str) -> BindResult<T> {
    value.ok_or(BinderError::MissingSyntax {
        kind: node.kind(),
        part,
    })
}

/// A scope holding the builtins, then one frame per global scope in `chain`.
///
/// `chain` is newest first, as produced by following `previous` links.
fn layered_scope(chain: &[&BoundGlobalScope]) -> BoundScope {
    let mut scope = BoundScope::new();
    for function in builtins::all() {
        scope.try_declare_function(function);
    }

    for global in chain.iter().rev() {
        scope.push();
        for function in &global.functions {
            scope.try_declare_function(FunctionSymbol::clone(function));
        }
        for variable in &global.variables {
            scope.try_declare_variable(variable.clone());
        }
        for ty in &global.types {
            scope.try_declare_type(ty.clone());
        }
    }
    scope
}

/// Struct members declared by `global` and every earlier submission.
fn collect_struct_members(chain: &[&BoundGlobalScope]) -> Vec<StructMembers> {
    chain
        .iter()
        .flat_map(|global| global.struct_members.iter().cloned())
        .collect()
}

#[cfg(test)]
mod test_support {
    use plover_syntax_tree::ast::{AstNode, CompilationUnit, Member, Stmt};

    use super::{layered_scope, Binder};
    use crate::BinderOptions;

    /// A global-scope binder with only the builtins declared.
    pub(super) fn binder() -> Binder {
        Binder::new(BinderOptions::default(), layered_scope(&[]), 0)
    }

    /// The first top-level statement of `source`.
    pub(super) fn parse_statement(source: &str) -> Option<Stmt> {
        let result = plover_parser::parse_source(source);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let unit = CompilationUnit::cast(result.tree)?;
        unit.members().find_map(|member| match member {
            Member::GlobalStatement(global) => global.statement(),
            _ => None,
        })
    }
}
