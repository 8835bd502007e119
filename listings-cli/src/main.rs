//! Listings CLI - keeps manuscript code listings in sync with source files

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use listings::interface::Context;
use listings::DiffResult;

#[derive(Parser)]
#[command(name = "listings")]
#[command(author, version, about = "Keep code listings in Markdown manuscripts in sync with source files", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    directory: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse manuscripts and verify they round-trip unchanged
    Check {
        /// Specific files or glob patterns (default: all manuscripts)
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// List the source files named by each manuscript's listings
    Listings {
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Show comment blocks, code paths included
    Comments {
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Report whether each listing resolves to a file on disk
    ValidatePaths {
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Insert code path comments for listings that lack a valid one
    InsertPaths {
        /// Replace the manuscript instead of writing a regenerated copy
        #[arg(long)]
        apply: bool,

        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Compare listings with their source files
    Compare {
        /// Show line diffs for listings that differ
        #[arg(short, long)]
        diff: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Only report listings with this result
        #[arg(long, value_enum)]
        only: Option<DiffResult>,

        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Replace listings with the contents of their source files
    Update {
        /// Also replace listings whose content differs, not just blank lines
        #[arg(long)]
        include_content: bool,

        /// Replace the manuscript instead of writing a regenerated copy
        #[arg(long)]
        apply: bool,

        /// Show line diffs of replaced listings
        #[arg(short, long)]
        diff: bool,

        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Determine working directory
    let base_dir = cli
        .directory
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = match cli.config {
        Some(ref path) => listings::config::read_config_file(path),
        None => listings::config::read_config(&base_dir),
    };

    let ctx = match config.and_then(|config| Context::new(config, base_dir)) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error initializing: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Check { files } => commands::check(&ctx, commands::CheckOptions { files }),
        Commands::Listings { files } => {
            commands::listings(&ctx, commands::ListingsOptions { files })
        }
        Commands::Comments { files } => {
            commands::comments(&ctx, commands::CommentsOptions { files })
        }
        Commands::ValidatePaths { files } => {
            commands::validate_paths(&ctx, commands::ValidateOptions { files })
        }
        Commands::InsertPaths { apply, files } => {
            commands::insert_paths(&ctx, commands::InsertOptions { apply, files })
        }
        Commands::Compare {
            diff,
            json,
            only,
            files,
        } => {
            let options = commands::CompareOptions {
                diff,
                json,
                only,
                files,
            };
            commands::compare(&ctx, options)
        }
        Commands::Update {
            include_content,
            apply,
            diff,
            files,
        } => {
            let options = commands::UpdateOptions {
                include_content,
                apply,
                diff,
                files,
            };
            commands::update(&ctx, options)
        }
        Commands::Config => commands::config(&ctx),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
