mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // win32json logs on stderr at warn; -v/-vv/--quiet adjust it, RUST_LOG overrides
    env_logger::Builder::new()
        .filter_module("win32json", cli.global.log_level())
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    match &cli.command {
        Command::Generate {
            path,
            out,
            patches,
            no_default_patches,
            keep_existing,
            skip_namespace,
        } => commands::generate::run(
            path,
            &commands::generate::GenerateOptions {
                out,
                patches: patches.as_deref(),
                no_default_patches: *no_default_patches,
                keep_existing: *keep_existing,
                skip_namespaces: skip_namespace,
                global: &cli.global,
            },
        ),
        Command::List { path } => commands::list::run(path, &cli.global),
        Command::Validate { dir } => commands::validate::run(dir, &cli.global),
    }
}
