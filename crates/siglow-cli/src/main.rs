//! siglow command-line tool
//!
//! Lowers a type-checked program model (JSON) into overload sets and prints
//! the result as target source or JSON, with diagnostics on stderr.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "siglow")]
#[command(about = "Lower optional, default and nullable parameters into overload sets", long_about = None)]
#[command(version)]
struct Cli {
    /// Log lowering decisions (same as SIGLOW_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// When to use colors: auto, always, never
    #[arg(long, global = true)]
    color: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower a program model and print the result
    Lower {
        /// Program model (JSON)
        model: PathBuf,
        #[command(flatten)]
        input: InputArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = LowerFormat::Text)]
        format: LowerFormat,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Lower a program model and report diagnostics only
    Check {
        /// Program model (JSON)
        model: PathBuf,
        #[command(flatten)]
        input: InputArgs,
        /// Diagnostic format
        #[arg(short, long, value_enum, default_value_t = CheckFormat::Pretty)]
        format: CheckFormat,
    },
}

#[derive(clap::Args)]
pub struct InputArgs {
    /// Lowering configuration (defaults to siglow.toml next to the model)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Source file the model's spans point into
    #[arg(short, long)]
    pub source: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LowerFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CheckFormat {
    Pretty,
    Json,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("SIGLOW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let color = output::resolve_color_choice(cli.color.as_deref());

    let result = match cli.command {
        Commands::Lower {
            model,
            input,
            format,
            out,
        } => commands::lower::execute(&model, &input, format, out.as_deref(), color),
        Commands::Check {
            model,
            input,
            format,
        } => commands::check::execute(&model, &input, format, color),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            let mut out = output::StyledOutput::new(color);
            out.error_line(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
