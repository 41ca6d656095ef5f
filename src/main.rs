// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Pantograph CLI.
//!
//! This is the main entry point for the Pantograph Flow bridge. It
//! checks single files from the command line and diagnoses project
//! setup; editors embed the library surface directly.

#![allow(clippy::print_stdout, reason = "CLI tool needs to output to stdout")]
#![allow(clippy::print_stderr, reason = "CLI tool needs to output to stderr")]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ignore::WalkBuilder;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pantograph::cli::{self, ColorConfig};
use pantograph::config::Config;
use pantograph::flow::Severity;
use pantograph::linter::Linter;
use pantograph::process::{CommandRunner, SystemRunner};
use pantograph::workspace::{self, FLOW_CONFIG};

/// Command-line arguments for Pantograph.
#[derive(Parser, Debug)]
#[command(name = "pantograph")]
#[command(about = "Editor-side bridge to the Flow type checker")]
#[command(version = env!("PANTOGRAPH_VERSION"))]
struct Args {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Command,

    /// Absolute path to the Flow executable on your system.
    /// Overrides the config file.
    #[arg(long, global = true)]
    executable: Option<String>,

    /// Typecheck all files, not just @flow.
    #[arg(long, global = true)]
    all: bool,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

/// Subcommands supported by Pantograph.
#[derive(Subcommand, Debug)]
enum Command {
    /// Check one file and print its diagnostics.
    Check {
        /// The file to check.
        file: PathBuf,

        /// Read unsaved buffer contents from stdin instead of the disk copy.
        #[arg(long)]
        stdin: bool,

        /// Print raw JSON instead of formatted lines.
        #[arg(long)]
        json: bool,

        /// Filter messages by regex pattern.
        #[arg(long, short)]
        filter: Option<String>,

        /// Disable colored output.
        #[arg(long)]
        nocolor: bool,
    },

    /// Check Flow availability and project setup for a directory.
    Doctor {
        /// Directory to examine.
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Disable colored output.
        #[arg(long)]
        nocolor: bool,
    },
}

/// Entry point for the Pantograph binary.
///
/// # Errors
///
/// Returns an error if the subcommand fails.
#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        command,
        executable,
        all,
        config,
    } = Args::parse();

    match command {
        Command::Check {
            file,
            stdin,
            json,
            filter,
            nocolor,
        } => run_check(config, executable, all, file, stdin, json, filter, nocolor).await,
        Command::Doctor { dir, nocolor } => run_doctor(config, executable, all, dir, nocolor).await,
    }
}

/// Loads configuration and applies CLI overrides.
fn load_config(
    config_file: Option<PathBuf>,
    executable: Option<String>,
    all: bool,
) -> Result<Config> {
    let mut config = Config::load(config_file)?;

    if let Some(executable) = executable {
        config.executable_path = executable;
    }
    if all {
        config.enable_all = true;
    }

    Ok(config)
}

/// Checks one file and prints its normalized diagnostics.
#[allow(
    clippy::too_many_arguments,
    reason = "Flattened CLI flags; grouping them would not clarify anything"
)]
async fn run_check(
    config_file: Option<PathBuf>,
    executable: Option<String>,
    all: bool,
    file: PathBuf,
    stdin: bool,
    json: bool,
    filter: Option<String>,
    nocolor: bool,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pantograph=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(config_file, executable, all)?;
    let colors = ColorConfig::new(nocolor);
    let file = resolve_path(file)?;

    let (text, modified) = if stdin {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .context("Failed to read buffer contents from stdin")?;
        (buffer, true)
    } else {
        let text = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        (text, false)
    };

    let linter = Linter::new(config.lint_options());
    let result = linter.lint_file(&file, &text, modified).await;

    for status in linter.server_statuses().await {
        debug!(
            "flow server {} (pid {:?}, all_files {}, uptime {}s)",
            status.root.display(),
            status.pid,
            status.all_files,
            status.uptime_secs
        );
    }

    // The CLI is a short-lived host: deactivate before reporting.
    linter.shutdown().await;
    let mut messages = result?;

    if let Some(pattern) = filter {
        let re = Regex::new(&pattern).context("Invalid filter pattern")?;
        messages.retain(|message| re.is_match(&message.text));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
    } else if messages.is_empty() {
        println!("{}", colors.green("No errors!"));
    } else {
        println!("{}", cli::format_messages_compact(&messages, &colors));
    }

    if messages
        .iter()
        .any(|message| message.severity == Severity::Error)
    {
        std::process::exit(1);
    }

    Ok(())
}

/// Reports checker availability and project setup for a directory.
async fn run_doctor(
    config_file: Option<PathBuf>,
    executable: Option<String>,
    all: bool,
    dir: PathBuf,
    nocolor: bool,
) -> Result<()> {
    let colors = ColorConfig::new(nocolor);

    // Print version header
    println!("Pantograph {}", env!("PANTOGRAPH_VERSION"));
    println!();

    let config = load_config(config_file, executable, all)?;
    let dir = dir
        .canonicalize()
        .with_context(|| format!("Cannot access {}", dir.display()))?;

    println!("{} {}", colors.bold("Project:"), dir.display());
    println!();

    // 1. Is the checker binary runnable?
    let runner = SystemRunner;
    match runner
        .run(&config.executable_path, &["version".to_string()], &dir, None)
        .await
    {
        Ok(output) if output.exit_code == Some(0) => {
            println!(
                "{} {}  {}",
                colors.green("✓"),
                config.executable_path,
                colors.dim(output.stdout.trim())
            );
        }
        Ok(output) => {
            println!(
                "{} {}  {}",
                colors.red("✗"),
                config.executable_path,
                colors.red(&format!("exited with {:?}", output.exit_code))
            );
        }
        Err(e) => {
            println!(
                "{} {}  {}",
                colors.red("✗"),
                config.executable_path,
                colors.red(&format!("not runnable: {e}"))
            );
        }
    }

    // 2. Is there a project config?
    let Some(flow_config) = workspace::find_upward(&dir, FLOW_CONFIG) else {
        println!(
            "{} no {FLOW_CONFIG} found {}",
            colors.red("✗"),
            colors.dim("— to get started with Flow, run `flow init`")
        );
        return Ok(());
    };
    println!("{} {}", colors.green("✓"), flow_config.display());

    // 3. How much of the project opts in?
    let (marked, total) = count_opt_in_files(&dir);
    println!(
        "{} {marked} of {total} JavaScript files opt in via {}",
        colors.green("✓"),
        workspace::OPT_IN_MARKER
    );
    if config.enable_all {
        println!(
            "  {}",
            colors.dim("enable_all is set; unmarked files are checked too")
        );
    }

    Ok(())
}

/// Counts JavaScript files under `root` and how many carry the opt-in
/// marker. Honors ignore files the way the checker's own scan does.
fn count_opt_in_files(root: &Path) -> (usize, usize) {
    let mut marked = 0usize;
    let mut total = 0usize;

    for entry in WalkBuilder::new(root).build().flatten() {
        if !entry.file_type().is_some_and(|kind| kind.is_file()) {
            continue;
        }

        let is_js = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext, "js" | "jsx" | "mjs" | "cjs"));
        if !is_js {
            continue;
        }

        total += 1;
        if std::fs::read_to_string(entry.path())
            .is_ok_and(|text| workspace::has_opt_in_marker(&text))
        {
            marked += 1;
        }
    }

    (marked, total)
}

/// Resolves a file path to an absolute path.
fn resolve_path(file: PathBuf) -> Result<PathBuf> {
    if file.is_absolute() {
        Ok(file)
    } else {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Ok(cwd.join(file))
    }
}
