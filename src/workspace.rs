// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Project discovery and opt-in detection.
//!
//! A file belongs to a Flow project when a `.flowconfig` exists in one of
//! its ancestor directories; that directory is the project root and the
//! identity a background server is keyed on. Absence of a config is a
//! "not applicable" outcome, not an error.

use std::path::{Path, PathBuf};

/// File name of the Flow project configuration.
pub const FLOW_CONFIG: &str = ".flowconfig";

/// The opt-in marker: files containing it are checked even when
/// all-files mode is off.
pub const OPT_IN_MARKER: &str = "@flow";

/// Searches upward from `start` for a file named `name`.
///
/// Returns the full path of the first match, visiting `start` itself
/// before its ancestors.
#[must_use]
pub fn find_upward(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let candidate = current.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

/// Returns true when the buffer text opts into checking via the
/// `@flow` marker.
#[must_use]
pub fn has_opt_in_marker(text: &str) -> bool {
    text.contains(OPT_IN_MARKER)
}
