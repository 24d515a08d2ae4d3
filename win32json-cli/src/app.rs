use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// win32json - Win32 API metadata to per-API JSON documents
#[derive(Debug, Parser)]
#[command(name = "win32json", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output: -v for progress, -vv for per-group detail.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl GlobalOptions {
    /// Log level of the library, before `RUST_LOG` is applied
    pub fn log_level(&self) -> log::LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => log::LevelFilter::Error,
            (false, 0) => log::LevelFilter::Warn,
            (false, 1) => log::LevelFilter::Info,
            (false, _) => log::LevelFilter::Debug,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate one JSON document per API group.
    Generate {
        /// Path to the winmd file.
        #[arg(value_name = "WINMD")]
        path: PathBuf,

        /// Output directory, created if missing.
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,

        /// Additional patch table (JSON), merged with the built-in one.
        #[arg(long, value_name = "JSON")]
        patches: Option<PathBuf>,

        /// Do not apply the built-in patch table.
        #[arg(long)]
        no_default_patches: bool,

        /// Keep `*.json` files already in the output directory.
        #[arg(long)]
        keep_existing: bool,

        /// Leave a namespace out entirely (repeatable).
        #[arg(long, value_name = "NAMESPACE")]
        skip_namespace: Vec<String>,
    },

    /// List API groups with their type, constant and function counts.
    List {
        /// Path to the winmd file.
        #[arg(value_name = "WINMD")]
        path: PathBuf,
    },

    /// Check that every document in a directory is a well-formed API document.
    Validate {
        /// Directory of generated documents.
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}
