//! evfilter command-line interface

use clap::{Parser, Subcommand};
use evfilter::cli::{check, output, run};
use std::path::PathBuf;

/// evfilter command-line tool
#[derive(Parser)]
#[command(name = "evfilter")]
#[command(author, version, about = "Filter predicate evaluation scenarios", long_about = None)]
struct Cli {
    /// Verbose output (raises the default log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, pretty)
    #[arg(short = 'f', long, global = true)]
    format: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario file
    Run {
        /// Scenario file (JSON)
        file: PathBuf,
    },

    /// Summarize a compiled expression tree
    Check {
        /// Expression file (JSON)
        file: PathBuf,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Run { file } => run::run(run::RunConfig {
            file,
            verbose: cli.verbose,
            output_format: cli.format.clone(),
            output_file: cli.output.clone(),
        }),

        Commands::Check { file } => check::check(check::CheckConfig {
            file,
            output_format: cli.format.clone(),
            output_file: cli.output.clone(),
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
