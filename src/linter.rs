// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! The lint surface exposed upward to the host editor.
//!
//! One operation: [`Linter::lint_file`] takes a file path, its buffer
//! text, and a modified flag, and returns the ordered normalized message
//! list. "Not applicable" outcomes — no opt-in marker while all-files
//! mode is off, or no `.flowconfig` anywhere above the file — return an
//! empty list, not an error.

use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::error::LintError;
use crate::flow::{LintMessage, ServerManager, ServerStatus, normalize, run_check};
use crate::notify::{LogNotifier, Notifier};
use crate::process::{CommandRunner, SystemRunner};
use crate::workspace::{self, FLOW_CONFIG};

/// Process-wide lint options.
#[derive(Debug, Clone)]
pub struct LintOptions {
    /// Path to the Flow executable; a bare name resolves via `PATH`.
    pub executable_path: String,
    /// Typecheck all files, not just those with the `@flow` marker.
    pub enable_all: bool,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            executable_path: "flow".to_string(),
            enable_all: false,
        }
    }
}

/// Lints files through warm per-project Flow servers.
pub struct Linter<R: CommandRunner> {
    options: LintOptions,
    runner: Arc<R>,
    servers: ServerManager<R>,
    notifier: Arc<dyn Notifier>,
}

impl Linter<SystemRunner> {
    /// Creates a linter over real processes with the log-backed notifier.
    #[must_use]
    pub fn new(options: LintOptions) -> Self {
        Self::with_runner(options, Arc::new(SystemRunner), Arc::new(LogNotifier))
    }
}

impl<R: CommandRunner> Linter<R> {
    /// Creates a linter over a custom runner and notifier.
    pub fn with_runner(options: LintOptions, runner: Arc<R>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            options,
            servers: ServerManager::new(Arc::clone(&runner)),
            runner,
            notifier,
        }
    }

    /// Lints one file and returns its normalized messages.
    ///
    /// Ensures the project's background server first (idempotent), then
    /// runs the one-shot check: unsaved buffers are piped on stdin,
    /// saved buffers are checked on disk.
    ///
    /// # Errors
    ///
    /// [`LintError::Launch`] when the background server cannot be
    /// started (no one-shot check is attempted in that case),
    /// [`LintError::Invoke`] / [`LintError::MalformedReport`] from the
    /// check itself.
    pub async fn lint_file(
        &self,
        path: &Path,
        text: &str,
        modified: bool,
    ) -> Result<Vec<LintMessage>, LintError> {
        if !self.options.enable_all && !workspace::has_opt_in_marker(text) {
            debug!("{} does not opt into checking", path.display());
            return Ok(Vec::new());
        }

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let Some(flow_config) = workspace::find_upward(dir, FLOW_CONFIG) else {
            self.notifier.warn(
                "Missing .flowconfig file.",
                "To get started with Flow, run `flow init`.",
            );
            return Ok(Vec::new());
        };

        self.servers
            .ensure_server(
                &self.options.executable_path,
                &flow_config,
                self.options.enable_all,
            )
            .await?;

        let report = run_check(
            self.runner.as_ref(),
            &self.options.executable_path,
            path,
            text,
            modified,
        )
        .await?;

        if let Some(version) = &report.flow_version {
            debug!(
                "flow {version} reported {} error entr{} for {}",
                report.errors.len(),
                if report.errors.len() == 1 { "y" } else { "ies" },
                path.display()
            );
        }

        Ok(normalize(&report, path))
    }

    /// Tears down every background server. Call on host deactivation.
    pub async fn shutdown(&self) {
        self.servers.shutdown_all().await;
    }

    /// Snapshots of the tracked servers, for logs and status queries.
    pub async fn server_statuses(&self) -> Vec<ServerStatus> {
        self.servers.statuses().await
    }
}
