// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Error taxonomy for the lint pipeline.
//!
//! Not-applicable outcomes (no opt-in marker, no `.flowconfig`) are not
//! errors — the lint surface returns an empty message list for those.
//! Everything here is a genuine failure the host may log or surface.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the lint operation.
#[derive(Debug, Error)]
pub enum LintError {
    /// The background Flow server could not be launched. The registry is
    /// left unchanged so a later lint can retry cleanly.
    #[error("failed to launch flow server in {}: {source}", .root.display())]
    Launch {
        /// Project root the launch was attempted in.
        root: PathBuf,
        /// Underlying spawn error.
        #[source]
        source: io::Error,
    },

    /// The one-shot check process could not be run to completion.
    #[error("flow invocation failed: {source}")]
    Invoke {
        /// Underlying process error.
        #[source]
        source: io::Error,
    },

    /// The checker produced output that does not parse as a report.
    /// Categorically different from "no errors found" — never collapsed
    /// into an empty diagnostic list.
    #[error("malformed checker output (exit code {exit_code:?}): {source}")]
    MalformedReport {
        /// Underlying JSON parse error.
        #[source]
        source: serde_json::Error,
        /// Exit code of the one-shot invocation, if it exited normally.
        exit_code: Option<i32>,
        /// Excerpt of the checker's stderr, for the host's logs.
        stderr: String,
    },
}
