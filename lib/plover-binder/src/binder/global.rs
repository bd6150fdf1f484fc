//! Global scope binding.

use std::rc::Rc;

use plover_bound_tree::{
    BoundBlockStatement, BoundStatement, BoundType, FunctionSymbol, StructMembers, StructSymbol,
    TypeSymbol, VariableSymbol,
};
use plover_reporting::DiagnosticQueue;
use plover_span::Span;
use plover_syntax_tree::ast::{token_span, AstNode, CompilationUnit, Member, Stmt};
use tracing::debug;

use crate::diagnostics::{
    GlobalStatementsInMultipleFiles, InvalidMainParameters, InvalidMainReturnType, MainAndGlobals,
};
use crate::error::BindResult;
use crate::BinderOptions;

use super::{collect_struct_members, layered_scope, peek_locals, required, Binder};

/// Name of the function synthesized from global statements.
pub const MAIN_NAME: &str = "<Main>$";
/// Name of the function synthesized from global statements in script mode.
pub const EVAL_NAME: &str = "<Eval>$";

/// A parsed file, ready to be bound.
#[derive(Debug, Clone)]
pub struct SourceTree {
    pub file_id: usize,
    pub root: CompilationUnit,
    /// Everything the lexer and parser reported for this file
    pub diagnostics: DiagnosticQueue,
}

/// Everything one submission declares at the top level.
///
/// Submissions chain through `previous`; a later submission sees every
/// symbol of the earlier ones, with its own declarations shadowing theirs.
#[derive(Debug, Clone, Default)]
pub struct BoundGlobalScope {
    pub previous: Option<Rc<BoundGlobalScope>>,
    pub diagnostics: DiagnosticQueue,
    pub main_function: Option<Rc<FunctionSymbol>>,
    pub script_function: Option<Rc<FunctionSymbol>>,
    pub functions: Vec<Rc<FunctionSymbol>>,
    pub variables: Vec<Rc<VariableSymbol>>,
    pub types: Vec<Rc<StructSymbol>>,
    pub struct_members: Vec<StructMembers>,
    /// Global statements of every file, in order
    pub statements: Vec<BoundStatement>,
    /// Local functions declared inside global statements
    pub function_bodies: Vec<(Rc<FunctionSymbol>, BoundBlockStatement)>,
}

impl BoundGlobalScope {
    /// This scope followed by every earlier one, newest first.
    pub fn chain(&self) -> Vec<&BoundGlobalScope> {
        std::iter::successors(Some(self), |scope| scope.previous.as_deref()).collect()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Bind the declarations and global statements of `trees`.
///
/// Structs are declared first, then functions, then global statements, so
/// anything may refer to a declaration later in the same or another file.
/// Parse errors in any tree stop binding before it starts.
pub fn bind_global_scope(
    options: BinderOptions,
    previous: Option<Rc<BoundGlobalScope>>,
    trees: &[SourceTree],
) -> BindResult<BoundGlobalScope> {
    debug!(files = trees.len(), script = options.script_mode, "binding global scope");

    let chain = previous.as_deref().map(BoundGlobalScope::chain).unwrap_or_default();
    let mut scope = layered_scope(&chain);
    scope.push();
    let mut binder = Binder::new(options, scope, 0);
    binder.struct_members = collect_struct_members(&chain);
    binder.context.check_peeked_locals = 1;

    for tree in trees {
        binder.diagnostics.extend(tree.diagnostics.iter().cloned());
    }
    if binder.diagnostics.has_errors() {
        return Ok(BoundGlobalScope {
            previous,
            diagnostics: binder.diagnostics,
            ..BoundGlobalScope::default()
        });
    }

    let mut structs = Vec::new();
    for tree in trees {
        binder.file_id = tree.file_id;
        for member in tree.root.members() {
            if let Member::Struct(node) = member {
                if let Some(symbol) = binder.declare_struct(&node)? {
                    structs.push((tree.file_id, node, symbol));
                }
            }
        }
    }

    let mut struct_members = Vec::new();
    for (file_id, node, symbol) in structs {
        binder.file_id = file_id;
        let members = binder.bind_struct_members(&node, symbol)?;
        binder.struct_members.push(members.clone());
        struct_members.push(members);
    }

    for tree in trees {
        binder.file_id = tree.file_id;
        for member in tree.root.members() {
            if let Member::Function(node) = member {
                binder.bind_function_declaration(&node.function())?;
            }
        }
    }

    let mut statements = Vec::new();
    let mut first_globals: Vec<(usize, Span)> = Vec::new();
    for tree in trees {
        binder.file_id = tree.file_id;
        let globals = global_statements(&tree.root)?;
        if let Some(first) = globals.first() {
            first_globals.push((tree.file_id, first.span()));
        }

        binder.context.peeked_locals = peek_locals(globals.iter().cloned(), std::iter::empty());
        for statement in &globals {
            statements.push(binder.bind_statement(statement)?);
        }
    }

    if first_globals.len() > 1 {
        for (file_id, span) in &first_globals {
            binder.file_id = *file_id;
            binder.report(GlobalStatementsInMultipleFiles { span: span.clone() });
        }
    }

    let functions = binder.scope.declared_functions();
    let (main_function, script_function) =
        choose_entry_point(&mut binder, &functions, &first_globals)?;

    debug!(
        functions = functions.len(),
        statements = statements.len(),
        main = main_function.as_ref().map(|f| f.name.as_str()),
        "bound global scope"
    );

    Ok(BoundGlobalScope {
        previous,
        main_function,
        script_function,
        variables: binder.scope.declared_variables(),
        types: binder.scope.declared_types(),
        functions,
        struct_members,
        statements,
        function_bodies: binder.take_function_bodies(),
        diagnostics: binder.diagnostics,
    })
}

fn global_statements(root: &CompilationUnit) -> BindResult<Vec<Stmt>> {
    root.members()
        .filter_map(|member| match member {
            Member::GlobalStatement(node) => Some(node),
            _ => None,
        })
        .map(|node| required(node.statement(), &node.syntax, "statement"))
        .collect()
}

type EntryPoint = (Option<Rc<FunctionSymbol>>, Option<Rc<FunctionSymbol>>);

/// Decide between a declared `main`, a synthesized one, and a script
/// function, reporting conflicting entry points.
fn choose_entry_point(
    binder: &mut Binder,
    functions: &[Rc<FunctionSymbol>],
    first_globals: &[(usize, Span)],
) -> BindResult<EntryPoint> {
    let has_globals = !first_globals.is_empty();

    if binder.is_script() {
        let script = has_globals.then(|| {
            Rc::new(FunctionSymbol::new(EVAL_NAME, Vec::new(), BoundType::nullable_any(), None))
        });
        return Ok((None, script));
    }

    let main = functions
        .iter()
        .find(|function| function.name == "main" || function.name == "Main")
        .cloned();

    let Some(main) = main else {
        let synthesized = has_globals
            .then(|| Rc::new(FunctionSymbol::new(MAIN_NAME, Vec::new(), BoundType::void(), None)));
        return Ok((synthesized, None));
    };

    if let Some(declaration) = &main.declaration {
        let node = &declaration.node;
        let identifier = required(node.identifier(), &node.syntax, "identifier")?;
        let span = token_span(&identifier);
        binder.file_id = declaration.file_id;

        let return_type = &main.return_type;
        if !(return_type.is_void() || return_type.is(&TypeSymbol::Int)) {
            let clause = required(node.return_type(), &node.syntax, "return type")?;
            binder.report(InvalidMainReturnType { span: clause.span() });
        }
        if !main.parameters.is_empty() {
            binder.report(InvalidMainParameters { span: span.clone() });
        }

        if has_globals {
            binder.report(MainAndGlobals { span });
            for (file_id, span) in first_globals {
                binder.file_id = *file_id;
                binder.report(MainAndGlobals { span: span.clone() });
            }
        }
    }

    Ok((Some(main), None))
}

#[cfg(test)]
mod tests {
    use plover_reporting::DiagnosticQueue;
    use plover_syntax_tree::ast::{AstNode, CompilationUnit};

    use super::*;

    fn tree(file_id: usize, source: &str) -> SourceTree {
        let result = plover_parser::parse_source(source);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        SourceTree {
            file_id,
            root: CompilationUnit::cast(result.tree).unwrap(),
            diagnostics: DiagnosticQueue::new(),
        }
    }

    fn messages(scope: &BoundGlobalScope) -> Vec<String> {
        scope.diagnostics.iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_declarations_are_visible_before_use() {
        let source = "int x = Twice(2);\nint Twice(int n) { return n * 2; }";
        let scope = bind_global_scope(BinderOptions::default(), None, &[tree(0, source)]).unwrap();

        assert!(messages(&scope).is_empty(), "{:?}", messages(&scope));
        assert_eq!(scope.functions.len(), 1);
        assert_eq!(scope.variables.len(), 1);
        assert_eq!(scope.main_function.as_ref().unwrap().name, MAIN_NAME);
    }

    #[test]
    fn test_struct_fields() {
        let source = "struct Point { int x; int y; }";
        let scope = bind_global_scope(BinderOptions::default(), None, &[tree(0, source)]).unwrap();

        assert_eq!(scope.types.len(), 1);
        let members = &scope.struct_members[0];
        assert_eq!(members.fields.len(), 2);
        assert!(members.field("y").is_some());
        assert!(scope.main_function.is_none());
    }

    #[test]
    fn test_main_signature() {
        let source = "string main(int argc) { return \"\"; }";
        let scope = bind_global_scope(BinderOptions::default(), None, &[tree(0, source)]).unwrap();
        assert_eq!(
            messages(&scope),
            vec![
                "invalid main signature: must return void or int",
                "invalid main signature: must take no arguments",
            ]
        );
    }

    #[test]
    fn test_main_and_globals() {
        let source = "void main() { }\nPrintLine();";
        let scope = bind_global_scope(BinderOptions::default(), None, &[tree(0, source)]).unwrap();
        assert_eq!(messages(&scope).len(), 2);
        assert!(messages(&scope)
            .iter()
            .all(|m| m.starts_with("declaring a main function and using global statements")));
    }

    #[test]
    fn test_globals_in_multiple_files() {
        let trees = [tree(0, "PrintLine();"), tree(1, "PrintLine();")];
        let scope = bind_global_scope(BinderOptions::default(), None, &trees).unwrap();
        assert_eq!(
            messages(&scope),
            vec![
                "multiple files with global statements creates ambiguous entry point",
                "multiple files with global statements creates ambiguous entry point",
            ]
        );
    }

    #[test]
    fn test_script_mode_synthesizes_eval() {
        let options = BinderOptions::new().script_mode(true);
        let scope = bind_global_scope(options, None, &[tree(0, "1 + 2;")]).unwrap();
        assert!(messages(&scope).is_empty(), "{:?}", messages(&scope));
        assert_eq!(scope.script_function.as_ref().unwrap().name, EVAL_NAME);
        assert!(scope.main_function.is_none());
    }

    #[test]
    fn test_previous_submission_is_visible() {
        let options = BinderOptions::new().script_mode(true);
        let first = bind_global_scope(options, None, &[tree(0, "var total = 4;")]).unwrap();
        let second =
            bind_global_scope(options, Some(Rc::new(first)), &[tree(0, "total = total + 1;")])
                .unwrap();
        assert!(messages(&second).is_empty(), "{:?}", messages(&second));
        assert_eq!(second.chain().len(), 2);
    }
}
