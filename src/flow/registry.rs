// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Keyed store of managed Flow server processes.
//!
//! One slot per project root (the directory holding `.flowconfig`). The
//! outer map lock is held only long enough to look up or create a slot;
//! the per-slot mutex serializes launches for one project without
//! blocking any other project. The store is owned exclusively by the
//! lifecycle manager.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::Mutex;

use crate::process::ServerProcess;

/// A single managed Flow server.
pub struct ServerRecord {
    /// Project root the server was launched for.
    pub root: PathBuf,
    /// Whether the server was launched in all-files mode.
    pub all_files: bool,
    /// Handle to the launched process.
    pub process: Box<dyn ServerProcess>,
    /// When the launch call returned.
    pub started_at: DateTime<Utc>,
}

impl ServerRecord {
    /// Snapshot of this record for logs and status queries.
    pub fn status(&mut self) -> ServerStatus {
        // A handle that cannot be observed is treated as exited.
        let state = match self.process.try_wait() {
            Ok(None) => ServerState::Running,
            Ok(Some(_)) | Err(_) => ServerState::Exited,
        };

        let uptime = Utc::now().signed_duration_since(self.started_at);

        ServerStatus {
            root: self.root.clone(),
            pid: self.process.id(),
            all_files: self.all_files,
            state,
            uptime_secs: u64::try_from(uptime.num_seconds()).unwrap_or(0),
        }
    }
}

/// Mutable per-project slot guarding launch and teardown.
#[derive(Default)]
pub struct ServerSlot {
    /// The tracked server, if one has been launched.
    pub record: Option<ServerRecord>,
}

/// Process state reported in a [`ServerStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    /// The server process is still running.
    Running,
    /// The server process has exited.
    Exited,
}

/// Serializable snapshot of one managed server.
#[derive(Debug, Clone, Serialize)]
pub struct ServerStatus {
    /// Project root (directory containing `.flowconfig`).
    pub root: PathBuf,
    /// OS process id, if still attached.
    pub pid: Option<u32>,
    /// Whether the server checks all files.
    pub all_files: bool,
    /// Current process state.
    pub state: ServerState,
    /// Seconds since launch.
    pub uptime_secs: u64,
}

/// Mapping from project root to its server slot.
#[derive(Default)]
pub struct Registry {
    slots: StdMutex<HashMap<PathBuf, Arc<Mutex<ServerSlot>>>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `root`, creating an empty one if absent.
    pub fn slot(&self, root: &Path) -> Arc<Mutex<ServerSlot>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(root.to_path_buf()).or_default())
    }

    /// Returns the slot for `root` without creating one.
    pub fn get(&self, root: &Path) -> Option<Arc<Mutex<ServerSlot>>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(root).cloned()
    }

    /// Snapshot of every slot, in arbitrary order.
    pub fn slots_snapshot(&self) -> Vec<Arc<Mutex<ServerSlot>>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().cloned().collect()
    }

    /// Drains every slot for shutdown.
    pub fn take_all(&self) -> Vec<Arc<Mutex<ServerSlot>>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.drain().map(|(_, slot)| slot).collect()
    }

    /// Number of tracked project roots.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.len()
    }

    /// True when no project root is tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;
    use std::path::Path;

    #[test]
    fn new_registry_is_empty() {
        let registry = Registry::new();
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
        assert!(registry.get(Path::new("/project")).is_none());
    }

    #[test]
    fn slot_is_created_once_and_shared() {
        let registry = Registry::new();

        let first = registry.slot(Path::new("/project"));
        let second = registry.slot(Path::new("/project"));
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn distinct_roots_get_distinct_slots() {
        let registry = Registry::new();

        let a = registry.slot(Path::new("/a"));
        let b = registry.slot(Path::new("/b"));
        assert!(!std::sync::Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn take_all_drains_the_map() {
        let registry = Registry::new();
        registry.slot(Path::new("/a"));
        registry.slot(Path::new("/b"));

        let drained = registry.take_all();
        assert_eq!(drained.len(), 2);
        assert!(registry.is_empty());
    }
}
