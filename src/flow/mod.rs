// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

/// One-shot check invocation.
pub mod invoke;
/// Lifecycle management for per-project background servers.
pub mod manager;
/// Diagnostic normalization.
pub mod normalize;
/// Keyed store of managed server processes.
pub mod registry;
/// Raw checker report schema.
pub mod report;

pub use invoke::{CheckMode, run_check};
pub use manager::ServerManager;
pub use normalize::{LintMessage, Severity, normalize};
pub use registry::{Registry, ServerRecord, ServerState, ServerStatus};
pub use report::CheckReport;
