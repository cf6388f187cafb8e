//! layer-lint CLI tool.
//!
//! Usage:
//! ```bash
//! layer-lint check [OPTIONS] <GRAPH>
//! layer-lint list-rules
//! layer-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use layer_lint_core::MatchMode;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Layer-boundary linter over exported symbol graphs
#[derive(Parser)]
#[command(name = "layer-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "LAYER_LINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lint checks over a symbol graph (JSON)
    Check {
        /// Symbol graph exported by the host
        graph: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Override the forbidden namespace family
        #[arg(long)]
        family: Option<String>,

        /// Override how namespaces are matched against the family
        #[arg(long)]
        match_mode: Option<MatchModeArg>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

/// Namespace matching mode as accepted on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum MatchModeArg {
    /// Match whole dotted segments.
    Segment,
    /// Match any namespace starting with the family string.
    Prefix,
}

impl From<MatchModeArg> for MatchMode {
    fn from(arg: MatchModeArg) -> Self {
        match arg {
            MatchModeArg::Segment => Self::Segment,
            MatchModeArg::Prefix => Self::Prefix,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "info" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            graph,
            format,
            rules,
            family,
            match_mode,
        } => {
            let source = config_resolver::resolve(Path::new("."), cli.config.as_deref());
            let overrides = commands::check::Overrides {
                rules,
                family,
                match_mode: match_mode.map(MatchMode::from),
            };
            commands::check::run(&graph, format, &overrides, &source)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
