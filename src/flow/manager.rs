// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Lifecycle manager for per-project Flow servers.
//!
//! `ensure_server` is idempotent: the common case observes a healthy
//! record and returns without touching the external binary. A launch
//! happens only when no server is tracked for the project, the tracked
//! server has exited, or the all-files mode was toggled. Launches for
//! the same project are serialized through the slot mutex — a caller
//! arriving mid-launch awaits that launch's outcome instead of starting
//! a second one. Projects never block each other.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::registry::{Registry, ServerRecord, ServerStatus};
use crate::error::LintError;
use crate::process::CommandRunner;

/// Manages the lifecycle of background Flow servers (launch-once, reuse,
/// relaunch on staleness, shutdown).
pub struct ServerManager<R: CommandRunner> {
    runner: Arc<R>,
    registry: Registry,
}

impl<R: CommandRunner> ServerManager<R> {
    /// Creates a manager with an empty registry.
    #[must_use]
    pub fn new(runner: Arc<R>) -> Self {
        Self {
            runner,
            registry: Registry::new(),
        }
    }

    /// Ensures a healthy server exists for the project owning
    /// `flow_config`, launching `executable` in background-server mode
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Launch`] when the spawn fails. The registry
    /// is left without a record for the project, so a later call can
    /// retry cleanly.
    pub async fn ensure_server(
        &self,
        executable: &str,
        flow_config: &Path,
        all_files: bool,
    ) -> Result<(), LintError> {
        let root = project_root(flow_config);
        let slot = self.registry.slot(&root);
        let mut slot = slot.lock().await;

        if let Some(record) = slot.record.as_mut() {
            if record.all_files == all_files && matches!(record.process.try_wait(), Ok(None)) {
                // Healthy and in the requested mode: the fast path.
                debug!("Reusing flow server for {}", root.display());
                return Ok(());
            }

            if record.all_files == all_files {
                warn!("Flow server for {} exited, relaunching", root.display());
            } else {
                info!("Check-all-files toggled for {}, relaunching", root.display());
            }
        }

        if let Some(mut stale) = slot.record.take() {
            // Terminating an already-dead process is success, not an error.
            if let Err(e) = stale.process.start_kill() {
                debug!("Old flow server was already gone: {e}");
            }
        }

        info!(
            "Launching flow server in {} (all_files: {all_files})",
            root.display()
        );

        let process = self
            .runner
            .spawn_server(executable, &server_args(all_files), &root)
            .map_err(|source| LintError::Launch {
                root: root.clone(),
                source,
            })?;

        slot.record = Some(ServerRecord {
            root,
            all_files,
            process,
            started_at: Utc::now(),
        });

        Ok(())
    }

    /// Best-effort terminates every tracked server and clears the
    /// registry. Processes that already exited are skipped silently.
    pub async fn shutdown_all(&self) {
        for slot in self.registry.take_all() {
            let mut slot = slot.lock().await;
            if let Some(mut record) = slot.record.take() {
                info!("Stopping flow server for {}", record.root.display());
                if let Err(e) = record.process.start_kill() {
                    debug!(
                        "Flow server for {} was already gone: {e}",
                        record.root.display()
                    );
                }
            }
        }
    }

    /// Snapshots of every tracked server, for logs and status queries.
    pub async fn statuses(&self) -> Vec<ServerStatus> {
        let mut statuses = Vec::new();

        for slot in self.registry.slots_snapshot() {
            let mut slot = slot.lock().await;
            if let Some(record) = slot.record.as_mut() {
                statuses.push(record.status());
            }
        }

        statuses
    }

    /// True when a server record is tracked for `root`.
    pub async fn is_tracked(&self, root: &Path) -> bool {
        match self.registry.get(root) {
            Some(slot) => slot.lock().await.record.is_some(),
            None => false,
        }
    }
}

/// Project identity: the directory containing the config file.
fn project_root(flow_config: &Path) -> PathBuf {
    flow_config
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn server_args(all_files: bool) -> Vec<String> {
    let mut args = vec!["server".to_string()];
    if all_files {
        args.push("--all".to_string());
    }
    args
}
