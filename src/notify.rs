// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Advisory notifications surfaced to the host editor.
//!
//! A fire-and-forget sink: the bridge emits at most a short summary and a
//! detail line, and never depends on delivery. Hosts that render
//! notifications implement [`Notifier`]; everything else gets the
//! tracing-backed default.

use tracing::warn;

/// Fire-and-forget warning surface for the host.
pub trait Notifier: Send + Sync {
    /// Emits a non-fatal advisory.
    fn warn(&self, summary: &str, detail: &str);
}

/// Default notifier that routes advisories to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn warn(&self, summary: &str, detail: &str) {
        warn!("{summary} {detail}");
    }
}
