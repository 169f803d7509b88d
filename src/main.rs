// SPDX-License-Identifier: MIT
//
// synesthesia — compile keyword → style schemes into syntax highlighting.
//
// This is the front end that wires the crates together:
//
//   syn-colour → colour engine (hashing, prettify/uglify, cyclic hues, names)
//   syn-scheme → scheme documents, include resolution, keyword compilation
//   syn-output → generate / derive the grammar, theme and settings documents
//
// Every command prints one status line per item to stdout. Diagnostics go
// through tracing to stderr; RUST_LOG overrides --log-level.

mod commands;
mod config;
mod pipeline;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Keyword highlighting compiler
#[derive(Parser)]
#[command(name = "synesthesia")]
#[command(about = "Compile keyword → style schemes into grammars, themes and settings")]
#[command(version)]
struct Args {
    /// Directory compiled artifacts are written to
    #[arg(long, global = true, env = "SYNESTHESIA_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Directory searched for shared include documents
    #[arg(long, global = true, env = "SYNESTHESIA_INCLUDE_DIR")]
    include_dir: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile one or more scheme files
    Compile {
        /// Scheme files to compile
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Theme document whose global colours seed generated themes
        #[arg(long)]
        base_theme: Option<PathBuf>,
    },
    /// Remove the compiled artifacts of one or more schemes
    Delete {
        /// Scheme names
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Write a template scheme file
    New {
        /// Where to write it
        path: PathBuf,
    },
    /// List compiled schemes
    List,
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ─── Commands ───────────────────────────────────────────────────────────────

/// Compile each file independently. One failure doesn't stop the rest.
fn run_compile(config: &Config, files: &[PathBuf]) -> bool {
    let mut ok = true;
    for file in files {
        match pipeline::compile_file(file, config) {
            Ok(compiled) => {
                tracing::debug!(written = ?compiled.written, "done");
                println!("{}", compiled.status_message());
            }
            Err(e) => {
                tracing::error!(file = %file.display(), "{e}");
                println!("{}", e.status_message());
                ok = false;
            }
        }
    }
    ok
}

fn run_delete(config: &Config, names: &[String]) -> bool {
    let mut ok = true;
    for name in names {
        match commands::delete(config, name) {
            Ok(status) => println!("{status}"),
            Err(e) => {
                tracing::error!("{e}");
                println!("Could not delete {name}: {e}");
                ok = false;
            }
        }
    }
    ok
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let base_theme = match &args.command {
        Command::Compile { base_theme, .. } => base_theme.clone(),
        _ => None,
    };
    let config = Config::resolve(args.output_dir, args.include_dir, base_theme);
    tracing::debug!(?config, "configuration resolved");

    let ok = match &args.command {
        Command::Compile { files, .. } => run_compile(&config, files),
        Command::Delete { names } => run_delete(&config, names),
        Command::New { path } => match commands::scaffold(path) {
            Ok(status) => {
                println!("{status}");
                true
            }
            Err(e) => {
                println!("Could not create {}: {e}", path.display());
                false
            }
        },
        Command::List => match commands::list(&config) {
            Ok(names) => {
                for name in names {
                    println!("{name}");
                }
                true
            }
            Err(e) => {
                println!("{e}");
                false
            }
        },
    };

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
