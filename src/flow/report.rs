// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Raw report schema for the checker's `--json` output.
//!
//! Decoded defensively: every field is defaulted, so a partial or
//! unexpected entry degrades to an empty value instead of failing the
//! whole report. Shape checks (does a piece carry a location?) are
//! explicit predicates, never assumed.

use lsp_types::{Position, Range};
use serde::Deserialize;

/// Top-level report emitted by `flow status --json` and
/// `flow check-contents --json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckReport {
    /// Version of the checker that produced the report.
    #[serde(default, rename = "flowVersion")]
    pub flow_version: Option<String>,
    /// True when the check found no errors.
    #[serde(default)]
    pub passed: bool,
    /// Error entries, in checker order.
    #[serde(default)]
    pub errors: Vec<ReportError>,
}

/// One error entry in a report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportError {
    /// Severity tag; `"warning"` downgrades the entry.
    #[serde(default)]
    pub level: Option<String>,
    /// Ordered pieces composing the primary complaint.
    #[serde(default)]
    pub message: Vec<MessagePiece>,
    /// Trace chains explaining why the error holds.
    #[serde(default)]
    pub extra: Vec<TraceChain>,
}

/// An ordered chain of pieces giving explanatory context for an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraceChain {
    /// Pieces of the explanation, in rank order.
    #[serde(default)]
    pub message: Vec<MessagePiece>,
}

/// One (location, text) fragment of a diagnostic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePiece {
    /// Descriptive text of the fragment.
    #[serde(default)]
    pub descr: String,
    /// File the fragment points into; empty is the no-location sentinel.
    #[serde(default)]
    pub path: String,
    /// 1-based start line.
    #[serde(default)]
    pub line: u32,
    /// 1-based end line.
    #[serde(default)]
    pub endline: u32,
    /// 1-based start column.
    #[serde(default)]
    pub start: u32,
    /// 1-based end column.
    #[serde(default)]
    pub end: u32,
}

impl MessagePiece {
    /// True when the piece points at a real file location. The predicate
    /// is a non-empty `path`; sentinel pieces carry only text.
    #[must_use]
    pub fn has_location(&self) -> bool {
        !self.path.is_empty()
    }

    /// The piece's 0-based range, if it has a location.
    ///
    /// The raw report is 1-based; conversion saturates so a malformed
    /// zero coordinate degrades to 0 instead of wrapping.
    #[must_use]
    pub fn range(&self) -> Option<Range> {
        if !self.has_location() {
            return None;
        }

        Some(Range {
            start: Position {
                line: self.line.saturating_sub(1),
                character: self.start.saturating_sub(1),
            },
            end: Position {
                line: self.endline.saturating_sub(1),
                character: self.end.saturating_sub(1),
            },
        })
    }
}
