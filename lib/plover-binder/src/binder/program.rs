//! Function body binding.

use std::rc::Rc;

use plover_bound_tree::{
    BoundBlockStatement, BoundConstant, BoundExpression, BoundStatement, BoundType, FunctionSymbol,
    StructMembers, VariableSymbol,
};
use plover_reporting::DiagnosticQueue;
use plover_syntax_tree::ast::token_span;
use plover_syntax_tree::SyntaxToken;
use tracing::debug;

use crate::cfg::ControlFlowGraph;
use crate::diagnostics::NotAllPathsReturn;
use crate::error::BindResult;
use crate::lowering::lower;
use crate::BinderOptions;

use super::{collect_struct_members, layered_scope, peek_body_locals, required, Binder, BoundGlobalScope};

/// Every lowered function body of a submission.
#[derive(Debug, Clone, Default)]
pub struct BoundProgram {
    pub previous: Option<Rc<BoundProgram>>,
    /// Diagnostics reported while binding bodies
    pub diagnostics: DiagnosticQueue,
    pub main_function: Option<Rc<FunctionSymbol>>,
    pub script_function: Option<Rc<FunctionSymbol>>,
    pub functions: Vec<(Rc<FunctionSymbol>, BoundBlockStatement)>,
    pub struct_members: Vec<StructMembers>,
}

impl BoundProgram {
    /// The body of the function called `name`, searching earlier
    /// submissions too. Local functions are found by their mangled name.
    pub fn body(&self, name: &str) -> Option<&BoundBlockStatement> {
        self.functions
            .iter()
            .find(|(function, _)| function.name == name)
            .map(|(_, body)| body)
            .or_else(|| self.previous.as_deref().and_then(|previous| previous.body(name)))
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Bind, lower and check the body of every function in `global`.
///
/// Nothing is bound when the global scope already failed.
pub fn bind_program(
    options: BinderOptions,
    previous: Option<Rc<BoundProgram>>,
    global: &BoundGlobalScope,
) -> BindResult<BoundProgram> {
    if global.has_errors() {
        return Ok(BoundProgram {
            previous,
            ..BoundProgram::default()
        });
    }

    let chain = global.chain();
    let struct_members = collect_struct_members(&chain);
    let mut diagnostics = DiagnosticQueue::new();
    let mut functions = Vec::new();

    for function in &global.functions {
        let Some(declaration) = &function.declaration else {
            continue;
        };
        debug!(function = %function.name, "binding function body");

        let node = &declaration.node;
        let identifier = required(node.identifier(), &node.syntax, "identifier")?;
        let body_node = required(node.body(), &node.syntax, "body")?;

        let mut binder = Binder::for_function(
            options,
            layered_scope(&chain),
            function.clone(),
            declaration.file_id,
            struct_members.clone(),
        );
        binder.context.peeked_locals = peek_body_locals(&body_node, function);

        let body = binder.bind_block(&body_node)?;
        let has_errors = binder.diagnostics.has_errors();
        let body = binder.finish_body(function, &identifier, body, has_errors)?;

        functions.extend(binder.take_function_bodies().into_iter().map(strip_captures));
        functions.push((function.clone(), body));
        diagnostics.move_from(&mut binder.diagnostics);
    }

    functions.extend(global.function_bodies.iter().cloned().map(strip_captures));

    let statements = global.statements.clone();
    if let Some(main) = global.main_function.as_ref().filter(|main| main.declaration.is_none()) {
        let body = lower(main, BoundBlockStatement::new(statements))?;
        functions.push((main.clone(), body));
    } else if let Some(script) = &global.script_function {
        let body = lower(script, script_body(statements))?;
        functions.push((script.clone(), body));
    }

    debug!(functions = functions.len(), errors = diagnostics.has_errors(), "bound program");

    Ok(BoundProgram {
        previous,
        diagnostics,
        main_function: global.main_function.clone(),
        script_function: global.script_function.clone(),
        functions,
        struct_members,
    })
}

impl Binder {
    /// Lower a bound body and check that a value-returning function returns
    /// on every path. A body that already has errors is kept as bound.
    pub(super) fn finish_body(
        &mut self,
        function: &FunctionSymbol,
        identifier: &SyntaxToken,
        body: BoundBlockStatement,
        has_errors: bool,
    ) -> BindResult<BoundBlockStatement> {
        if has_errors {
            return Ok(body);
        }

        let lowered = lower(function, body)?;
        let returns_value = !function.return_type.is_void() && !function.return_type.is_error();
        if returns_value && !ControlFlowGraph::all_paths_return(&lowered)? {
            self.report(NotAllPathsReturn {
                function: identifier.text().to_string(),
                span: token_span(identifier),
            });
        }
        Ok(lowered)
    }
}

/// A script returns its lone expression statement's value, or null.
fn script_body(mut statements: Vec<BoundStatement>) -> BoundBlockStatement {
    if let [BoundStatement::Expression(expression)] = statements.as_slice() {
        if !expression.ty.is_void() && !expression.is_error() {
            let span = expression.span.clone();
            let value = BoundExpression::cast(BoundType::nullable_any(), expression.clone(), span.clone());
            return BoundBlockStatement::new(vec![BoundStatement::Return {
                value: Some(value),
                span,
            }]);
        }
    }

    statements.push(BoundStatement::Return {
        value: Some(BoundExpression::literal(BoundConstant::Null, 0..0)),
        span: 0..0,
    });
    BoundBlockStatement::new(statements)
}

/// Rename `$name` capture parameters back to the variable they capture.
fn strip_captures(
    (function, body): (Rc<FunctionSymbol>, BoundBlockStatement),
) -> (Rc<FunctionSymbol>, BoundBlockStatement) {
    if function.capture_parameters().next().is_none() {
        return (function, body);
    }

    let parameters = function
        .parameters
        .iter()
        .map(|parameter| match parameter.name.strip_prefix('$') {
            Some(name) => Rc::new(VariableSymbol {
                name: name.to_string(),
                ..VariableSymbol::clone(parameter)
            }),
            None => parameter.clone(),
        })
        .collect();

    let function = FunctionSymbol {
        parameters,
        ..FunctionSymbol::clone(&function)
    };
    (Rc::new(function), body)
}

#[cfg(test)]
mod tests {
    use plover_syntax_tree::ast::{AstNode, CompilationUnit};

    use super::*;
    use crate::binder::{bind_global_scope, SourceTree};

    fn bind(options: BinderOptions, source: &str) -> (BoundGlobalScope, BoundProgram) {
        let result = plover_parser::parse_source(source);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let tree = SourceTree {
            file_id: 0,
            root: CompilationUnit::cast(result.tree).unwrap(),
            diagnostics: DiagnosticQueue::new(),
        };
        let global = bind_global_scope(options, None, &[tree]).unwrap();
        let program = bind_program(options, None, &global).unwrap();
        (global, program)
    }

    fn messages(program: &BoundProgram) -> Vec<String> {
        program.diagnostics.iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_not_all_paths_return() {
        let source = "int Sign(int x) { if (x > 0) { return 1; } }";
        let (_, program) = bind(BinderOptions::default(), source);
        assert_eq!(messages(&program), vec!["not all code paths return a value"]);
    }

    #[test]
    fn test_both_branches_return() {
        let source = "int Sign(int x) { if (x > 0) { return 1; } else { return -1; } }";
        let (_, program) = bind(BinderOptions::default(), source);
        assert!(messages(&program).is_empty(), "{:?}", messages(&program));
        assert!(program.body("Sign").is_some());
    }

    #[test]
    fn test_synthesized_main_body() {
        let (_, program) = bind(BinderOptions::default(), "PrintLine(\"hi\");");
        let main = program.main_function.as_ref().unwrap();
        let body = program.body(&main.name).unwrap();
        assert!(body.statements.last().unwrap().is_return());
    }

    #[test]
    fn test_script_returns_lone_expression() {
        let options = BinderOptions::new().script_mode(true);
        let (_, program) = bind(options, "1 + 2;");
        let script = program.script_function.as_ref().unwrap();
        let body = program.body(&script.name).unwrap();
        let [BoundStatement::Return { value: Some(value), .. }] = body.statements.as_slice() else {
            panic!("expected a single return, got {:?}", body.statements);
        };
        assert_eq!(value.constant, Some(BoundConstant::Int(3)));
    }

    #[test]
    fn test_captures_lose_their_prefix() {
        let source = "void Outer() { int count = 0; void Bump() { count++; } Bump(); }";
        let (_, program) = bind(BinderOptions::default(), source);
        assert!(messages(&program).is_empty(), "{:?}", messages(&program));

        let (bump, _) = program
            .functions
            .iter()
            .find(|(function, _)| function.name == "<Outer::Bump>$")
            .unwrap();
        let names: Vec<&str> = bump.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["count"]);
    }

    #[test]
    fn test_global_errors_skip_bodies() {
        let source = "int Twice(int n) { return n * 2; }\nint Twice(int n) { return n; }";
        let (global, program) = bind(BinderOptions::default(), source);
        assert!(global.has_errors());
        assert!(program.functions.is_empty());
    }
}
