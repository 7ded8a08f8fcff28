//! `pocat`: command-line tools for gettext PO catalogs.
//!
//! - `pocat check` validates catalogs and reports per-entry warnings
//! - `pocat stats` counts translated, fuzzy and untranslated entries
//! - `pocat eval` tabulates a Plural-Forms rule over counts
//! - `pocat get` looks up one message
//! - `pocat fmt` rewrites a catalog in canonical form

mod commands;
mod output;

use std::io::stderr;
use std::process::exit;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{
    run_check, run_eval, run_fmt, run_get, run_stats, CheckArgs, EvalArgs, FmtArgs, GetArgs,
    StatsArgs,
};
use miette::{MietteHandlerOpts, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pocat", version, about = "gettext PO catalog tools", long_about = None)]
pub struct Cli {
    /// When to color output
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true, env = "POCAT_COLOR")]
    pub color: ColorWhen,

    /// Log parser and lookup events to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    /// Color when stdout is a terminal and NO_COLOR is unset
    Auto,
    Always,
    Never,
}

impl ColorWhen {
    fn apply(self) {
        match self {
            ColorWhen::Auto => owo_colors::unset_override(),
            ColorWhen::Always => owo_colors::set_override(true),
            ColorWhen::Never => owo_colors::set_override(false),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse catalogs and report warnings and errors
    Check(CheckArgs),
    /// Report translation progress per catalog
    Stats(StatsArgs),
    /// Evaluate a Plural-Forms rule for a range of counts
    Eval(EvalArgs),
    /// Look up a translation in a catalog
    Get(GetArgs),
    /// Rewrite a catalog in canonical form
    Fmt(FmtArgs),
}

impl Commands {
    /// Run the command and return its exit code.
    fn run(self) -> Result<i32> {
        match self {
            Commands::Check(args) => run_check(args),
            Commands::Stats(args) => run_stats(args),
            Commands::Eval(args) => run_eval(args),
            Commands::Get(args) => run_get(args),
            Commands::Fmt(args) => run_fmt(args),
        }
    }
}

/// Library events go to stderr so stdout stays machine-readable.
/// `RUST_LOG` overrides the level picked by `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Parse diagnostics quote the offending catalog lines.
fn init_reports() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .context_lines(1)
                .tab_width(4)
                .unicode(true)
                .build(),
        )
    }))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.color.apply();
    init_tracing(cli.verbose);
    init_reports()?;

    let code = cli.command.run().unwrap_or_else(|report| {
        eprintln!("{report:?}");
        exitcode::SOFTWARE
    });
    exit(code)
}
