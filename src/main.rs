//! swagdoc - Command-line tool generating a Swagger 2.0 document from the
//! `@directive` doc comments of a Rust project.
//!
//! # Usage
//!
//! ```bash
//! swagdoc [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Write `swagger.json` for the project in the current directory:
//! ```bash
//! swagdoc . -o docs/swagger.json
//! ```
//!
//! Read metadata from another entry file and emit YAML:
//! ```bash
//! swagdoc ./my-api -m src/bin/server.rs -f yaml
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagdoc::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("swagdoc starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Swagger document generation completed successfully");

    Ok(())
}
