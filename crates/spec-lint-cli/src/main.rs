//! spec-lint CLI tool.
//!
//! Usage:
//! ```bash
//! spec-lint changes [OPTIONS]
//! spec-lint glossary-refs [OPTIONS]
//! spec-lint naked-terms [OPTIONS]
//! spec-lint context-imports [OPTIONS]
//! spec-lint all [OPTIONS]
//! spec-lint list-checks
//! spec-lint init
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use spec_lint_checks::{ChangePackages, ContextImports, GlossaryRefs, NakedTerms};

mod commands;
mod config_resolver;

/// Governance checks for documentation-as-code repositories
#[derive(Parser)]
#[command(name = "spec-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Repository root
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check change requests against the change set
    #[command(alias = "change-packages")]
    Changes(RunArgs),

    /// Check that wrapped terms are declared in the glossary
    GlossaryRefs(RunArgs),

    /// Check that declared terms are never used unwrapped in labels
    NakedTerms(RunArgs),

    /// Check cross-context imports against the context map
    ContextImports(RunArgs),

    /// Run every check
    All(RunArgs),

    /// List available checks
    ListChecks,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Options shared by every check command.
#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Use these changed paths instead of asking git (comma-separated)
    #[arg(long, value_delimiter = ',')]
    changed: Option<Vec<String>>,

    /// Pull request event payload providing the base and head revisions
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Remote branch used for the merge-base fallback
    #[arg(long, default_value = "origin/main")]
    remote_main: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Scan the whole repository even when no relevant file changed
    #[arg(long)]
    full: bool,
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Rich diagnostics with source snippets.
    Fancy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let source = config_resolver::resolve(&cli.root, cli.config.as_deref());

    let (args, checks) = match cli.command {
        Commands::Changes(args) => (args, vec![ChangePackages::NAME]),
        Commands::GlossaryRefs(args) => (args, vec![GlossaryRefs::NAME]),
        Commands::NakedTerms(args) => (args, vec![NakedTerms::NAME]),
        Commands::ContextImports(args) => (args, vec![ContextImports::NAME]),
        Commands::All(args) => (
            args,
            vec![
                ChangePackages::NAME,
                GlossaryRefs::NAME,
                NakedTerms::NAME,
                ContextImports::NAME,
            ],
        ),
        Commands::ListChecks => {
            commands::list_checks::run();
            return Ok(());
        }
        Commands::Init { force } => return commands::init::run(&cli.root, force),
    };

    commands::check::run(&cli.root, &source, &args, &checks)
}
