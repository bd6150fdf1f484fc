//! Plover Test Suite
//!
//! A fluent test API for testing the Plover compiler.
//!
//! # Example
//!
//! ```
//! use plover_test_suite::*;
//!
//! Test::new("int Twice(int x) { return x * 2; }")
//!     .expect(Compiles)
//!     .expect(Symbol::new("Twice").is(SymbolKind::Function).has(Behavior::ParameterCount(1)));
//! ```
//!
//! # Submissions
//!
//! Script tests can continue with more submissions; every expectation is
//! checked against the latest one.
//!
//! ```
//! use plover_test_suite::*;
//!
//! Test::script("var total = 4;")
//!     .then("total + 1;")
//!     .expect(Compiles);
//! ```

use std::rc::Rc;

use codespan_reporting::term::termcolor::NoColor;
use plover_bound_tree::{BoundExpression, BoundExpressionKind, BoundStatement, FunctionSymbol};
use plover_compiler::{Compilation, CompilationOptions};
use plover_reporting::Severity;

/// Test context containing compilation results
pub struct TestContext {
    pub compilation: Compilation,
}

impl TestContext {
    fn messages(&self, severity: Severity) -> Vec<&str> {
        self.compilation
            .diagnostics()
            .diagnostics()
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .map(|diagnostic| diagnostic.message.as_str())
            .collect()
    }

    fn errors(&self) -> Vec<&str> {
        self.messages(Severity::Error)
    }

    /// Every diagnostic, rendered without color.
    fn rendered(&self) -> String {
        let mut out = NoColor::new(Vec::new());
        if self.compilation.diagnostics().emit_to(&mut out).is_err() {
            return String::from("<diagnostics could not be rendered>");
        }
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }
}

/// A test case that can be run against the Plover compiler
pub struct Test {
    files: Vec<(String, String)>,
    options: CompilationOptions,
    submissions: Vec<String>,
    context: Option<TestContext>,
}

impl Test {
    /// Create a new test from a single source string
    pub fn new(source: &str) -> Self {
        Self::with_files(&[("test.plv", source)])
    }

    /// Create a test from multiple source files
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        Test {
            files: files
                .iter()
                .map(|(name, content)| (name.to_string(), content.to_string()))
                .collect(),
            options: CompilationOptions::new(),
            submissions: Vec::new(),
            context: None,
        }
    }

    /// Create a test bound in script mode
    pub fn script(source: &str) -> Self {
        let mut test = Self::new(source);
        test.options = test.options.script_mode(true);
        test
    }

    pub fn warnings_as_errors(mut self) -> Self {
        self.options = self.options.warnings_as_errors(true);
        self
    }

    /// Queue another submission that continues from the previous one
    pub fn then(mut self, source: &str) -> Self {
        self.submissions.push(source.to_string());
        self.context = None;
        self
    }

    /// Compile the test files and every submission, keeping the last
    fn compile(&mut self) {
        if self.context.is_some() {
            return;
        }

        let builder = Compilation::builder().options(self.options);
        let mut compilation = self
            .files
            .iter()
            .fold(builder, |builder, (name, source)| builder.add_source(name.clone(), source.clone()))
            .build()
            .unwrap_or_else(|error| panic!("compiler failed: {}", error));

        for (index, source) in self.submissions.iter().enumerate() {
            let name = format!("submission{}.plv", index + 1);
            compilation = compilation
                .continue_with([(name, source.clone())])
                .unwrap_or_else(|error| panic!("compiler failed: {}", error));
        }

        self.context = Some(TestContext { compilation });
    }

    /// Apply an expectation to this test
    pub fn expect<E: Expectable>(mut self, expectation: E) -> Self {
        self.compile();
        let ctx = self.context.as_ref().unwrap();
        if let Err(e) = expectation.check(ctx) {
            if !ctx.compilation.diagnostics().is_empty() {
                eprintln!("\n--- Compiler Diagnostics ---\n{}", ctx.rendered());
            }
            panic!("Expectation failed: {}", e);
        }
        self
    }

    /// The compilation of the latest submission
    pub fn compilation(&mut self) -> &Compilation {
        self.compile();
        &self.context.as_ref().unwrap().compilation
    }
}

/// Trait for test expectations
pub trait Expectable {
    fn check(&self, ctx: &TestContext) -> Result<(), String>;
}

/// Expects compilation to succeed with no errors
pub struct Compiles;

impl Expectable for Compiles {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let errors = ctx.errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "Expected compilation to succeed, but got {} error(s): {:?}",
                errors.len(),
                errors
            ))
        }
    }
}

/// Expects compilation to fail with an error containing a specific message
pub struct HasError(pub &'static str);

impl Expectable for HasError {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let errors = ctx.errors();
        if errors.is_empty() {
            return Err("Expected compilation to fail with an error, but it succeeded".to_string());
        }

        if errors.iter().any(|message| message.contains(self.0)) {
            Ok(())
        } else {
            Err(format!(
                "Expected an error containing '{}', but got: {:?}",
                self.0, errors
            ))
        }
    }
}

/// Expects a warning containing a specific message
pub struct HasWarning(pub &'static str);

impl Expectable for HasWarning {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let warnings = ctx.messages(Severity::Warning);
        if warnings.iter().any(|message| message.contains(self.0)) {
            Ok(())
        } else {
            Err(format!(
                "Expected a warning containing '{}', but got: {:?}",
                self.0, warnings
            ))
        }
    }
}

/// Expects exactly N errors
pub struct HasErrorCount(pub usize);

impl Expectable for HasErrorCount {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let errors = ctx.errors();
        if errors.len() == self.0 {
            Ok(())
        } else {
            Err(format!(
                "Expected {} error(s), but got {}: {:?}",
                self.0,
                errors.len(),
                errors
            ))
        }
    }
}

/// Expects exactly N warnings
pub struct HasWarningCount(pub usize);

impl Expectable for HasWarningCount {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let warnings = ctx.messages(Severity::Warning);
        if warnings.len() == self.0 {
            Ok(())
        } else {
            Err(format!(
                "Expected {} warning(s), but got {}: {:?}",
                self.0,
                warnings.len(),
                warnings
            ))
        }
    }
}

/// Expects compilation to fail (with any error)
pub struct Fails;

impl Expectable for Fails {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        if ctx.compilation.has_errors() {
            Ok(())
        } else {
            Err("Expected compilation to fail, but it succeeded".to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Function,
    Variable,
    Struct,
}

/// A symbol found by name in the global scope chain or among the bound
/// function bodies.
enum Found {
    Function(Rc<FunctionSymbol>),
    Variable(Rc<plover_bound_tree::VariableSymbol>),
    Struct(Rc<plover_bound_tree::StructSymbol>),
}

impl Found {
    fn kind(&self) -> SymbolKind {
        match self {
            Found::Function(_) => SymbolKind::Function,
            Found::Variable(_) => SymbolKind::Variable,
            Found::Struct(_) => SymbolKind::Struct,
        }
    }
}

/// Symbol expectation with chainable behavior checks
///
/// Local functions are found by their mangled name, e.g. `<Outer::Inner>$`.
pub struct Symbol {
    name: String,
    kind: Option<SymbolKind>,
    behaviors: Vec<Behavior>,
    negated_behaviors: Vec<Behavior>,
}

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol {
            name: name.to_string(),
            kind: None,
            behaviors: Vec::new(),
            negated_behaviors: Vec::new(),
        }
    }

    /// Assert the symbol is of a specific kind
    pub fn is(mut self, kind: SymbolKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Assert the symbol has a specific behavior/property
    pub fn has(mut self, behavior: Behavior) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// Assert the symbol does NOT have a specific behavior/property
    pub fn not(mut self, behavior: Behavior) -> Self {
        self.negated_behaviors.push(behavior);
        self
    }

    fn find(&self, ctx: &TestContext) -> Option<Found> {
        let name = self.name.as_str();
        for global in ctx.compilation.global_scope().chain() {
            if let Some(function) = global.functions.iter().find(|f| f.name == name) {
                return Some(Found::Function(function.clone()));
            }
            if let Some(variable) = global.variables.iter().find(|v| v.name == name) {
                return Some(Found::Variable(variable.clone()));
            }
            if let Some(symbol) = global.types.iter().find(|t| t.name == name) {
                return Some(Found::Struct(symbol.clone()));
            }
        }

        let mut program = Some(ctx.compilation.program());
        while let Some(current) = program {
            if let Some((function, _)) = current.functions.iter().find(|(f, _)| f.name == name) {
                return Some(Found::Function(function.clone()));
            }
            program = current.previous.as_deref();
        }
        None
    }
}

impl Expectable for Symbol {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let found = self
            .find(ctx)
            .ok_or_else(|| format!("Symbol '{}' not found", self.name))?;

        if let Some(expected) = self.kind {
            if found.kind() != expected {
                return Err(format!(
                    "Symbol '{}' has kind {:?}, expected {:?}",
                    self.name,
                    found.kind(),
                    expected
                ));
            }
        }

        for behavior in &self.behaviors {
            behavior.check_symbol(&self.name, &found, ctx, false)?;
        }
        for behavior in &self.negated_behaviors {
            behavior.check_symbol(&self.name, &found, ctx, true)?;
        }
        Ok(())
    }
}

/// Behaviors are properties that symbols can have
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Number of parameters, capture parameters included
    ParameterCount(usize),
    /// Parameter names in order
    Parameters(&'static [&'static str]),
    /// Display form of a function's return type or a variable's type
    Type(&'static str),
    /// Number of fields (structs only)
    FieldCount(usize),
    /// Whether the function has a bound body
    HasBody(bool),
    /// Whether the variable is a folded constant
    IsConstant(bool),
}

impl Behavior {
    fn check_symbol(
        &self,
        name: &str,
        found: &Found,
        ctx: &TestContext,
        negated: bool,
    ) -> Result<(), String> {
        let result = self.check_symbol_inner(name, found, ctx);
        if negated {
            match result {
                Ok(()) => Err(format!("Symbol '{}' should NOT have {:?}, but it does", name, self)),
                Err(_) => Ok(()),
            }
        } else {
            result
        }
    }

    fn check_symbol_inner(&self, name: &str, found: &Found, ctx: &TestContext) -> Result<(), String> {
        match (self, found) {
            (Behavior::ParameterCount(expected), Found::Function(function)) => {
                let function = bound_symbol(ctx, function);
                let count = function.parameters.len();
                if count != *expected {
                    return Err(format!(
                        "Symbol '{}' has {} parameter(s), expected {}",
                        name, count, expected
                    ));
                }
                Ok(())
            }
            (Behavior::Parameters(expected), Found::Function(function)) => {
                let function = bound_symbol(ctx, function);
                let actual: Vec<&str> = function.parameters.iter().map(|p| p.name.as_str()).collect();
                if actual != *expected {
                    return Err(format!(
                        "Symbol '{}' has parameters {:?}, expected {:?}",
                        name, actual, expected
                    ));
                }
                Ok(())
            }
            (Behavior::Type(expected), Found::Function(function)) => {
                check_display(name, &function.return_type, expected)
            }
            (Behavior::Type(expected), Found::Variable(variable)) => {
                check_display(name, &variable.ty, expected)
            }
            (Behavior::FieldCount(expected), Found::Struct(symbol)) => {
                let count = ctx
                    .compilation
                    .global_scope()
                    .chain()
                    .iter()
                    .flat_map(|global| global.struct_members.iter())
                    .find(|members| Rc::ptr_eq(&members.symbol, symbol))
                    .map(|members| members.fields.len())
                    .unwrap_or(0);
                if count != *expected {
                    return Err(format!(
                        "Symbol '{}' has {} field(s), expected {}",
                        name, count, expected
                    ));
                }
                Ok(())
            }
            (Behavior::HasBody(expected), Found::Function(function)) => {
                let has_body = ctx.compilation.program().body(&function.name).is_some();
                if has_body != *expected {
                    return Err(format!(
                        "Symbol '{}' has_body={}, expected {}",
                        name, has_body, expected
                    ));
                }
                Ok(())
            }
            (Behavior::IsConstant(expected), Found::Variable(variable)) => {
                let is_constant = variable.constant.is_some();
                if is_constant != *expected {
                    return Err(format!(
                        "Symbol '{}' is_constant={}, expected {}",
                        name, is_constant, expected
                    ));
                }
                Ok(())
            }
            (behavior, found) => Err(format!(
                "{:?} does not apply to '{}' of kind {:?}",
                behavior,
                name,
                found.kind()
            )),
        }
    }
}

/// The symbol as it appears in the program, where capture parameters of
/// local functions have been filled in.
fn bound_symbol(ctx: &TestContext, function: &Rc<FunctionSymbol>) -> Rc<FunctionSymbol> {
    ctx.compilation
        .program()
        .functions
        .iter()
        .find(|(bound, _)| bound.name == function.name)
        .map(|(bound, _)| bound.clone())
        .unwrap_or_else(|| function.clone())
}

fn check_display(name: &str, actual: &impl std::fmt::Display, expected: &str) -> Result<(), String> {
    let actual = actual.to_string();
    if actual == expected {
        Ok(())
    } else {
        Err(format!("Symbol '{}' has type '{}', expected '{}'", name, actual, expected))
    }
}

/// Expects every call to a function to resolve to one overload
///
/// The overload is given in its display form, e.g. `RandInt(int?)`.
pub struct Call {
    name: String,
    overload: Option<String>,
}

impl Call {
    /// Calls to `name`; local functions match by their declared name
    pub fn to(name: &str) -> Self {
        Call {
            name: name.to_string(),
            overload: None,
        }
    }

    pub fn resolves_to(mut self, overload: &str) -> Self {
        self.overload = Some(overload.to_string());
        self
    }

    fn matches(&self, function: &FunctionSymbol) -> bool {
        function.name == self.name || function.name.ends_with(&format!("::{}>$", self.name))
    }
}

impl Expectable for Call {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let mut calls = Vec::new();
        for (_, body) in &ctx.compilation.program().functions {
            for statement in &body.statements {
                collect_calls(statement, &mut calls);
            }
        }

        let resolved: Vec<String> = calls
            .into_iter()
            .filter(|function| self.matches(function))
            .map(|function| function.to_string())
            .collect();

        if resolved.is_empty() {
            return Err(format!("No call to '{}' found", self.name));
        }
        match &self.overload {
            Some(expected) if resolved.iter().any(|actual| actual != expected) => Err(format!(
                "Calls to '{}' resolved to {:?}, expected '{}'",
                self.name, resolved, expected
            )),
            _ => Ok(()),
        }
    }
}

fn collect_calls(statement: &BoundStatement, calls: &mut Vec<Rc<FunctionSymbol>>) {
    match statement {
        BoundStatement::Block(block) => {
            for statement in &block.statements {
                collect_calls(statement, calls);
            }
        }
        BoundStatement::Expression(expression) => collect_expression_calls(expression, calls),
        BoundStatement::VariableDeclaration { initializer, .. } => {
            if let Some(initializer) = initializer {
                collect_expression_calls(initializer, calls);
            }
        }
        BoundStatement::If {
            condition,
            then,
            otherwise,
        } => {
            collect_expression_calls(condition, calls);
            collect_calls(then, calls);
            if let Some(otherwise) = otherwise {
                collect_calls(otherwise, calls);
            }
        }
        BoundStatement::While { condition, body, .. }
        | BoundStatement::DoWhile { condition, body, .. } => {
            collect_expression_calls(condition, calls);
            collect_calls(body, calls);
        }
        BoundStatement::For {
            initializer,
            condition,
            step,
            body,
            ..
        } => {
            collect_calls(initializer, calls);
            collect_expression_calls(condition, calls);
            collect_expression_calls(step, calls);
            collect_calls(body, calls);
        }
        BoundStatement::Try {
            body,
            catch,
            finally,
        } => {
            for block in std::iter::once(body).chain(catch).chain(finally) {
                for statement in &block.statements {
                    collect_calls(statement, calls);
                }
            }
        }
        BoundStatement::Return { value, .. } => {
            if let Some(value) = value {
                collect_expression_calls(value, calls);
            }
        }
        BoundStatement::ConditionalGoto { condition, .. } => {
            collect_expression_calls(condition, calls);
        }
        BoundStatement::Goto(_) | BoundStatement::Label(_) | BoundStatement::Nop => {}
    }
}

fn collect_expression_calls(expression: &BoundExpression, calls: &mut Vec<Rc<FunctionSymbol>>) {
    match &expression.kind {
        BoundExpressionKind::Call {
            function,
            arguments,
        } => {
            calls.push(function.clone());
            for argument in arguments {
                collect_expression_calls(argument, calls);
            }
        }
        BoundExpressionKind::Assignment { target, value }
        | BoundExpressionKind::CompoundAssignment { target, value, .. } => {
            collect_expression_calls(target, calls);
            collect_expression_calls(value, calls);
        }
        BoundExpressionKind::Binary { left, right, .. } => {
            collect_expression_calls(left, calls);
            collect_expression_calls(right, calls);
        }
        BoundExpressionKind::Ternary {
            left,
            center,
            right,
            ..
        } => {
            collect_expression_calls(left, calls);
            collect_expression_calls(center, calls);
            collect_expression_calls(right, calls);
        }
        BoundExpressionKind::Index { operand, index } => {
            collect_expression_calls(operand, calls);
            collect_expression_calls(index, calls);
        }
        BoundExpressionKind::Unary { operand, .. }
        | BoundExpressionKind::Cast { operand }
        | BoundExpressionKind::MemberAccess { operand, .. } => {
            collect_expression_calls(operand, calls);
        }
        BoundExpressionKind::InitializerList { items } => {
            for item in items {
                collect_expression_calls(item, calls);
            }
        }
        BoundExpressionKind::Error
        | BoundExpressionKind::Empty
        | BoundExpressionKind::Literal
        | BoundExpressionKind::Variable(_)
        | BoundExpressionKind::Reference(_)
        | BoundExpressionKind::Typeof(_)
        | BoundExpressionKind::Constructor(_) => {}
    }
}
