use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use plover_compiler::{Compilation, CompilationOptions, ControlFlowGraph};
use plover_lexer::lex;
use plover_parser::parse_source;
use plover_reporting::{Diagnostic, DiagnosticContext, DiagnosticQueue, Label};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plover")]
#[command(about = "The Plover compiler front end", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Source files to process
    #[arg(global = true)]
    files: Vec<String>,

    /// Bind in script mode; every file is its own submission
    #[arg(long, global = true)]
    script: bool,

    /// Report warnings as errors
    #[arg(long, global = true)]
    warnings_as_errors: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Type-check source files
    Check {
        /// Source files to check
        files: Vec<String>,
    },
    /// Parse source files and show syntax tree
    Parse {
        /// Source files to parse
        files: Vec<String>,

        /// Print the token stream too
        #[arg(long)]
        tokens: bool,
    },
    /// Bind source files and print every lowered function body
    Bind {
        /// Source files to bind
        files: Vec<String>,
    },
    /// Print the control-flow graph of a function in Graphviz format
    Graph {
        /// Function to print, by name or mangled local name
        function: String,

        /// Source files to bind
        files: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

/// Read every file, keeping the name it is reported under.
fn read_sources(files: &[String]) -> Option<Vec<(String, String)>> {
    let mut sources = Vec::new();
    for path in files {
        match fs::read_to_string(path) {
            Ok(content) => sources.push((path.clone(), content)),
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", path, e);
                return None;
            }
        }
    }
    Some(sources)
}

/// Compile `files` as one submission, or as a chain of submissions in
/// script mode. Diagnostics are emitted for every submission.
fn compile(files: &[String], options: CompilationOptions) -> Option<Compilation> {
    if files.is_empty() {
        eprintln!("error: no input files");
        eprintln!("Run 'plover --help' for usage.");
        return None;
    }
    let sources = read_sources(files)?;

    let submissions: Vec<Vec<(String, String)>> = if options.script_mode {
        sources.into_iter().map(|source| vec![source]).collect()
    } else {
        vec![sources]
    };

    let mut current: Option<Compilation> = None;
    for submission in submissions {
        debug!(files = submission.len(), "compiling submission");
        let result = match &current {
            Some(previous) => previous.continue_with(submission),
            None => submission
                .into_iter()
                .fold(Compilation::builder().options(options), |builder, (name, source)| {
                    builder.add_source(name, source)
                })
                .build(),
        };

        let compilation = match result {
            Ok(compilation) => compilation,
            Err(e) => {
                eprintln!("internal compiler error: {}", e);
                return None;
            }
        };
        if let Err(e) = compilation.diagnostics().emit() {
            eprintln!("error: cannot emit diagnostics: {}", e);
        }
        current = Some(compilation);
    }
    current
}

fn run_check(files: &[String], options: CompilationOptions, verbose: bool) -> ExitCode {
    let Some(compilation) = compile(files, options) else {
        return ExitCode::from(1);
    };

    if compilation.has_errors() {
        ExitCode::from(1)
    } else {
        if verbose {
            eprintln!("  No errors found.");
        }
        ExitCode::SUCCESS
    }
}

fn run_parse(files: &[String], show_tokens: bool) -> ExitCode {
    if files.is_empty() {
        eprintln!("error: no input files");
        return ExitCode::from(1);
    }
    let Some(sources) = read_sources(files) else {
        return ExitCode::from(1);
    };

    let mut diagnostics = DiagnosticContext::new();
    for (name, content) in sources {
        println!("=== {} ===", name);

        if show_tokens {
            for token in lex(&content).flatten().filter(|token| !token.value.is_trivia()) {
                println!("{:?} @ {:?}", token.value, token.span);
            }
            println!();
        }

        let result = parse_source(&content);
        let file_id = diagnostics.add_file(name, content.clone());
        let mut errors = DiagnosticQueue::new();
        for error in &result.errors {
            let span = error.span.clone().unwrap_or(0..0);
            errors.push_diagnostic(
                Diagnostic::error()
                    .with_message(&error.message)
                    .with_labels(vec![Label::primary(file_id, span)]),
            );
        }
        diagnostics.report(&errors);

        println!("{:#?}", result.tree);
    }

    if diagnostics.is_empty() {
        ExitCode::SUCCESS
    } else {
        diagnostics.emit().ok();
        ExitCode::from(1)
    }
}

fn run_bind(files: &[String], options: CompilationOptions) -> ExitCode {
    let Some(compilation) = compile(files, options) else {
        return ExitCode::from(1);
    };
    if compilation.has_errors() {
        return ExitCode::from(1);
    }

    let program = compilation.program();
    for (function, body) in &program.functions {
        println!("{} -> {}", function, function.return_type);
        println!("{}", body);
    }
    ExitCode::SUCCESS
}

fn run_graph(name: &str, files: &[String], options: CompilationOptions) -> ExitCode {
    let Some(compilation) = compile(files, options) else {
        return ExitCode::from(1);
    };
    if compilation.has_errors() {
        return ExitCode::from(1);
    }

    let Some(body) = compilation.program().body(name) else {
        eprintln!("error: no function named '{}'", name);
        return ExitCode::from(1);
    };

    let written = ControlFlowGraph::build(&body.statements)
        .map_err(|e| e.to_string())
        .and_then(|graph| {
            let mut out = io::stdout().lock();
            graph
                .write_dot(&mut out)
                .and_then(|()| out.flush())
                .map_err(|e| e.to_string())
        });

    match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = CompilationOptions::new()
        .script_mode(cli.script)
        .warnings_as_errors(cli.warnings_as_errors);

    match cli.command {
        Some(Commands::Check { files }) => run_check(&files, options, cli.verbose),
        Some(Commands::Parse { files, tokens }) => run_parse(&files, tokens),
        Some(Commands::Bind { files }) => run_bind(&files, options),
        Some(Commands::Graph { function, files }) => run_graph(&function, &files, options),
        None => run_check(&cli.files, options, cli.verbose),
    }
}
