//! localcorr CLI - Command Line Operations for Local Correlation Analysis
//!
//! This is the operational entry point for the local Gaussian correlation
//! workspace.
//!
//! # Commands
//!
//! - `localcorr analyse --input <file>` - Analyse two columns of a CSV file
//! - `localcorr demo` - Analyse a synthetic bivariate normal sample
//! - `localcorr check` - Print the effective configuration
//!
//! # Configuration
//!
//! Settings come from `localcorr.toml` (or `--config`), then `LOCALCORR_*`
//! environment variables, then command-line flags. `RUST_LOG` overrides the
//! configured log level.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::{build_config, AnalysisArgs};

/// Local Gaussian correlation analysis CLI
#[derive(Parser)]
#[command(name = "localcorr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse two numeric columns of a CSV file
    Analyse {
        /// Path to CSV file with a header row
        #[arg(short, long)]
        input: PathBuf,

        /// Column holding the first variable
        #[arg(short = 'x', long, default_value = "x")]
        x_column: String,

        /// Column holding the second variable
        #[arg(short = 'y', long, default_value = "y")]
        y_column: String,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Analyse a synthetic bivariate normal sample
    Demo {
        /// Number of samples
        #[arg(short, long, default_value = "500")]
        n: usize,

        /// Correlation of the generating distribution
        #[arg(short, long, default_value = "0.5")]
        rho: f64,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Check system configuration
    Check,
}

impl Commands {
    fn analysis_args(&self) -> AnalysisArgs {
        match self {
            Commands::Analyse { analysis, .. } | Commands::Demo { analysis, .. } => {
                analysis.clone()
            }
            Commands::Check => AnalysisArgs::default(),
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(cli.config.as_deref(), &cli.command.analysis_args())?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_filter_str()
    };
    init_tracing(level);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Analyse {
            input,
            x_column,
            y_column,
            ..
        } => commands::analyse::run(&input, &x_column, &y_column, &config),
        Commands::Demo { n, rho, .. } => commands::demo::run(n, rho, &config),
        Commands::Check => commands::check::run(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyse() {
        let cli = Cli::parse_from([
            "localcorr", "analyse", "-i", "data.csv", "-x", "a", "--bootstrap", "0", "-g", "12",
        ]);
        match cli.command {
            Commands::Analyse {
                input,
                x_column,
                y_column,
                analysis,
            } => {
                assert_eq!(input, PathBuf::from("data.csv"));
                assert_eq!(x_column, "a");
                assert_eq!(y_column, "y");
                assert_eq!(analysis.bootstrap, Some(0));
                assert_eq!(analysis.grid_size, Some(12));
            }
            _ => panic!("Expected Analyse"),
        }
    }

    #[test]
    fn test_parse_demo_defaults() {
        let cli = Cli::parse_from(["localcorr", "demo", "--seed", "3"]);
        let args = cli.command.analysis_args();
        assert_eq!(args.seed, Some(3));
        match cli.command {
            Commands::Demo { n, rho, .. } => {
                assert_eq!(n, 500);
                assert_eq!(rho, 0.5);
            }
            _ => panic!("Expected Demo"),
        }
    }
}
