// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! A configurable mock Flow binary for testing.
//!
//! Speaks just enough of the Flow CLI surface for the bridge: `version`,
//! `server`, `status --json`, `check-contents --json`, and `stop`.
//! Environment variables control behavior:
//!
//! - `MOCKFLOW_REPORT` — JSON report emitted by the check subcommands
//!   (defaults to a clean report).
//! - `MOCKFLOW_LOG` — file to append one line per invocation to, so
//!   tests can assert how often the binary was used and with what.

#![allow(clippy::print_stdout, reason = "Mock binary emits reports on stdout")]

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::time::Duration;

use clap::{Parser, Subcommand};

const DEFAULT_REPORT: &str = r#"{"flowVersion":"0.287.0","errors":[],"passed":true}"#;

/// Mock Flow binary for integration testing.
#[derive(Parser, Debug)]
#[command(name = "mockflow")]
struct Args {
    /// The Flow subcommand being mimicked.
    #[command(subcommand)]
    command: Command,
}

/// Subcommands of the Flow CLI the bridge uses.
#[derive(Subcommand, Debug)]
#[allow(
    dead_code,
    reason = "Flags are parsed for CLI fidelity, not read by the mock"
)]
enum Command {
    /// Print the checker version.
    Version,

    /// Run as a foreground background-server: park until killed.
    Server {
        /// Check all files, not just those marked @flow.
        #[arg(long)]
        all: bool,
    },

    /// Emit the scripted report for a saved file.
    Status {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,

        /// File under check (ignored by the mock).
        file: Option<String>,
    },

    /// Read buffer contents from stdin, then emit the scripted report.
    CheckContents {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,

        /// File under check (ignored by the mock).
        file: Option<String>,
    },

    /// Stop a running server (always succeeds).
    Stop,
}

fn main() {
    let args = Args::parse();
    log_invocation();

    match args.command {
        Command::Version => {
            println!("Flow, a static type checker for JavaScript, version 0.287.0-mock");
        }
        Command::Server { all: _ } => {
            // The real server stays warm until terminated; the bridge
            // kills us via the process handle.
            loop {
                std::thread::sleep(Duration::from_secs(60));
            }
        }
        Command::Status { .. } => {
            emit_report();
        }
        Command::CheckContents { .. } => {
            // Drain stdin first so the writer never blocks on a full pipe.
            let mut buffer = String::new();
            let _ = std::io::stdin().read_to_string(&mut buffer);
            emit_report();
        }
        Command::Stop => {}
    }
}

/// Prints the scripted report and exits 2 when it carries errors,
/// mirroring the real checker's exit convention.
fn emit_report() {
    let report =
        std::env::var("MOCKFLOW_REPORT").unwrap_or_else(|_| DEFAULT_REPORT.to_string());
    println!("{report}");

    let has_errors = serde_json::from_str::<serde_json::Value>(&report)
        .ok()
        .and_then(|value| value.get("errors").and_then(|errors| errors.as_array()).map(|errors| !errors.is_empty()))
        .unwrap_or(false);

    if has_errors {
        std::process::exit(2);
    }
}

/// Appends this invocation's argv to `MOCKFLOW_LOG`, if set.
fn log_invocation() {
    if let Ok(log_path) = std::env::var("MOCKFLOW_LOG") {
        let line = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
        if let Ok(mut log) = OpenOptions::new().create(true).append(true).open(&log_path) {
            let _ = writeln!(log, "{line}");
        }
    }
}
