//! Thin CLI collaborator: `lex`/`parse` subcommands over the `lang_lr1`
//! library. Narrow interface, no parsing logic of its own: everything
//! here is path/IO glue and argument parsing, wrapping the library's
//! typed errors in `anyhow::Result` at the binary boundary rather than
//! inside the library.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lang_lr1::token::Token;
use lang_lr1::util::Log;
use lang_lr1::Parser as LangParser;

#[derive(Parser, Debug)]
#[command(name = "rlitec")]
#[command(about = "Lexer/parser front end for a small Rust-flavored language", long_about = None)]
struct Cli {
    /// Debug-trace verbosity (only printed in debug builds; see
    /// `lang_lr1::util::Log`).
    #[arg(long, global = true, value_enum, default_value = "none")]
    trace: TraceLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TraceLevel {
    None,
    Default,
    Success,
    Result,
    Verbose,
}

impl TraceLevel {
    fn into_log(self) -> Log<&'static str> {
        match self {
            TraceLevel::None => Log::None,
            TraceLevel::Default => Log::Default("rlitec"),
            TraceLevel::Success => Log::Success("rlitec"),
            TraceLevel::Result => Log::Result("rlitec"),
            TraceLevel::Verbose => Log::Verbose("rlitec"),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenize a source file and print its tokens, one per line.
    Lex { path: PathBuf },
    /// Tokenize and parse a source file, writing `output/tokens.txt` and
    /// `output/ast.txt`.
    Parse { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let trace = cli.trace.into_log();
    match cli.command {
        Commands::Lex { path } => run_lex(&path, trace),
        Commands::Parse { path } => run_parse(&path, trace),
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))
}

fn print_tokens<W: std::io::Write>(tokens: &[Token], mut out: W) -> std::io::Result<()> {
    for token in tokens {
        writeln!(out, "{}", token)?;
    }
    Ok(())
}

fn run_lex(path: &Path, trace: Log<&'static str>) -> Result<()> {
    let source = read_source(path)?;
    let parser =
        LangParser::with_trace(trace).context("failed to build the fixed grammar's LR(1) table")?;
    let tokens = parser
        .tokenize(&source)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    print_tokens(&tokens, std::io::stdout())?;
    Ok(())
}

fn run_parse(path: &Path, trace: Log<&'static str>) -> Result<()> {
    let source = read_source(path)?;
    let parser =
        LangParser::with_trace(trace).context("failed to build the fixed grammar's LR(1) table")?;
    let (tokens, tree) = parser
        .tokenize_and_parse(&source)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    fs::create_dir_all("output").context("failed to create `output` directory")?;

    let tokens_path = Path::new("output/tokens.txt");
    let tokens_file = fs::File::create(tokens_path)
        .with_context(|| format!("failed to create `{}`", tokens_path.display()))?;
    print_tokens(&tokens, tokens_file)?;

    // `ptree`-rendered indented text stands in for a Graphviz-style PNG
    // renderer, which is out of scope here.
    let ast_path = Path::new("output/ast.txt");
    let ast_file = fs::File::create(ast_path)
        .with_context(|| format!("failed to create `{}`", ast_path.display()))?;
    tree.write_tree(ast_file)
        .with_context(|| format!("failed to write `{}`", ast_path.display()))?;

    Ok(())
}
