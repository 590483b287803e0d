// Cuppa3: parse a program and print or browse its syntax tree

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use tracing_subscriber::EnvFilter;

use cuppa3::parser::{self, Node};
use cuppa3::ui::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `('tag', child, ...)`
    Tuple,
    /// `["tag", child, ...]` on one line
    Json,
    /// Indented JSON
    PrettyJson,
}

#[derive(Debug, Parser)]
#[command(
    name = "cuppa3",
    version,
    about = "Parse a Cuppa3 program and print or browse its syntax tree"
)]
struct Cli {
    /// Cuppa3 source file
    file: PathBuf,

    /// Output format for the syntax tree
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tuple)]
    format: OutputFormat,

    /// Open the interactive tree viewer instead of printing
    #[arg(long)]
    tui: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn to_json<F: Formatter>(ast: &Node, mut formatter: F) -> anyhow::Result<String> {
    let mut out = Vec::new();
    ast.write_json(&mut out, &mut formatter)?;
    Ok(String::from_utf8(out)?)
}

fn render(ast: &Node, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Tuple => Ok(ast.to_string()),
        OutputFormat::Json => to_json(ast, CompactFormatter),
        OutputFormat::PrettyJson => to_json(ast, PrettyFormatter::new()),
    }
}

fn run_viewer(source: String, ast: Node) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, ast);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("tree viewer failed")
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read '{}'", cli.file.display()))?;

    tracing::info!(file = %cli.file.display(), bytes = source.len(), "parsing");

    let ast = match parser::parse(&source) {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("{}: {}", cli.file.display(), e);
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.tui {
        run_viewer(source, ast)?;
    } else {
        println!("{}", render(&ast, cli.format)?);
    }

    Ok(ExitCode::SUCCESS)
}
