// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Diagnostic normalization: raw checker report → flat message list.
//!
//! A pure function over the decoded report. No I/O, no state. Degraded
//! entries (missing pieces, missing locations) become partial messages,
//! never errors and never silent drops.

use lsp_types::Range;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::report::{CheckReport, MessagePiece, ReportError};

/// Prefix marking an appended trace chain as explanatory context rather
/// than part of the primary complaint.
const TRACE_PREFIX: &str = "See: ";

/// Severity of a normalized message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A type error, or an internal checker error.
    Error,
    /// An entry the checker tagged as a warning.
    Warning,
}

/// A normalized, located diagnostic ready for the editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintMessage {
    /// Message severity.
    pub severity: Severity,
    /// Human-readable text; trace explanations follow on their own lines.
    pub text: String,
    /// File the message points into — not necessarily the checked file.
    pub file: PathBuf,
    /// 0-based location of the message.
    pub range: Range,
}

/// Converts a raw report into the ordered message list for `checked_file`.
///
/// An empty or absent error list is the success case and yields an empty
/// vec. Output order preserves report order.
#[must_use]
pub fn normalize(report: &CheckReport, checked_file: &Path) -> Vec<LintMessage> {
    report
        .errors
        .iter()
        .map(|error| normalize_error(error, checked_file))
        .collect()
}

fn normalize_error(error: &ReportError, checked_file: &Path) -> LintMessage {
    let mut text = join_pieces(&error.message);

    for trace in &error.extra {
        let explanation = join_pieces(&trace.message);
        if !explanation.is_empty() {
            text.push('\n');
            text.push_str(TRACE_PREFIX);
            text.push_str(&explanation);
        }
    }

    // First piece with a real location anchors the message; without one
    // the message degrades to an unlocated range on the checked file.
    let (file, range) = error
        .message
        .iter()
        .find_map(|piece| piece.range().map(|range| (PathBuf::from(&piece.path), range)))
        .unwrap_or_else(|| (checked_file.to_path_buf(), Range::default()));

    LintMessage {
        severity: classify(error),
        text,
        file,
        range,
    }
}

/// Severity precedence: a first piece with no file is an internal
/// checker error and always error-severity; otherwise the entry's own
/// `level` tag decides, defaulting to error.
fn classify(error: &ReportError) -> Severity {
    if let Some(first) = error.message.first()
        && !first.has_location()
    {
        return Severity::Error;
    }

    match error.level.as_deref() {
        Some("warning") => Severity::Warning,
        _ => Severity::Error,
    }
}

/// Joins piece texts in sequence. The clause connectors ("This type is
/// incompatible with") are themselves pieces, so a single space is the
/// only separator needed.
fn join_pieces(pieces: &[MessagePiece]) -> String {
    pieces
        .iter()
        .map(|piece| piece.descr.as_str())
        .filter(|descr| !descr.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{LintMessage, Severity, normalize};
    use crate::flow::report::CheckReport;
    use anyhow::Result;
    use std::path::{Path, PathBuf};

    fn run(raw: &str) -> Result<Vec<LintMessage>> {
        let report: CheckReport = serde_json::from_str(raw)?;
        Ok(normalize(&report, Path::new("/project/checked.js")))
    }

    #[test]
    fn empty_report_yields_no_messages() -> Result<()> {
        assert!(run(r#"{"errors":[],"passed":true}"#)?.is_empty());
        assert!(run(r"{}")?.is_empty());
        Ok(())
    }

    #[test]
    fn single_error_is_located_and_converted() -> Result<()> {
        let messages = run(
            r#"{"errors":[{"level":"error","message":[
                {"descr":"type mismatch","path":"a.js","line":5,"endline":5,"start":3,"end":8}
            ]}]}"#,
        )?;

        assert_eq!(messages.len(), 1);
        let message = &messages[0];
        assert_eq!(message.severity, Severity::Error);
        assert!(message.text.contains("type mismatch"));
        assert_eq!(message.file, PathBuf::from("a.js"));
        assert_eq!(message.range.start.line, 4);
        assert_eq!(message.range.start.character, 2);
        Ok(())
    }

    #[test]
    fn connector_pieces_compose_a_sentence() -> Result<()> {
        let messages = run(
            r#"{"errors":[{"message":[
                {"descr":"number","path":"a.js","line":2,"endline":2,"start":1,"end":6},
                {"descr":"This type is incompatible with","path":"","line":0,"endline":0,"start":1,"end":1},
                {"descr":"string","path":"b.js","line":9,"endline":9,"start":1,"end":6}
            ]}]}"#,
        )?;

        assert_eq!(
            messages[0].text,
            "number This type is incompatible with string"
        );
        // Location comes from the first located piece, not the last.
        assert_eq!(messages[0].file, PathBuf::from("a.js"));
        assert_eq!(messages[0].range.start.line, 1);
        Ok(())
    }

    #[test]
    fn warning_level_downgrades() -> Result<()> {
        let messages = run(
            r#"{"errors":[{"level":"warning","message":[
                {"descr":"unused suppression","path":"a.js","line":1,"endline":1,"start":1,"end":2}
            ]}]}"#,
        )?;

        assert_eq!(messages[0].severity, Severity::Warning);
        Ok(())
    }

    #[test]
    fn internal_checker_error_is_error_severity() -> Result<()> {
        // First piece has no file: internal error, even when tagged warning.
        let messages = run(
            r#"{"errors":[{"level":"warning","message":[
                {"descr":"internal failure","path":"","line":0,"endline":0,"start":1,"end":1}
            ]}]}"#,
        )?;

        assert_eq!(messages[0].severity, Severity::Error);
        Ok(())
    }

    #[test]
    fn entry_without_pieces_degrades() -> Result<()> {
        let messages = run(r#"{"errors":[{"level":"error"}]}"#)?;

        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.is_empty());
        assert_eq!(messages[0].file, PathBuf::from("/project/checked.js"));
        assert_eq!(messages[0].range.start.line, 0);
        assert_eq!(messages[0].range.start.character, 0);
        assert_eq!(messages[0].range.end.line, 0);
        assert_eq!(messages[0].range.end.character, 0);
        Ok(())
    }

    #[test]
    fn unlocated_entry_anchors_to_checked_file() -> Result<()> {
        let messages = run(
            r#"{"errors":[{"message":[
                {"descr":"missing annotation","path":"","line":0,"endline":0,"start":1,"end":1}
            ]}]}"#,
        )?;

        assert_eq!(messages[0].text, "missing annotation");
        assert_eq!(messages[0].file, PathBuf::from("/project/checked.js"));
        assert_eq!(messages[0].range, lsp_types::Range::default());
        Ok(())
    }

    #[test]
    fn cross_file_errors_keep_their_path() -> Result<()> {
        let messages = run(
            r#"{"errors":[{"message":[
                {"descr":"import not found","path":"lib/other.js","line":3,"endline":3,"start":1,"end":10}
            ]}]}"#,
        )?;

        assert_eq!(messages[0].file, PathBuf::from("lib/other.js"));
        Ok(())
    }

    #[test]
    fn traces_are_appended_in_rank_order() -> Result<()> {
        let messages = run(
            r#"{"errors":[{
                "message":[{"descr":"bad call","path":"a.js","line":1,"endline":1,"start":1,"end":4}],
                "extra":[
                    {"message":[{"descr":"expected number","path":"","line":0,"endline":0,"start":1,"end":1}]},
                    {"message":[{"descr":"got string","path":"","line":0,"endline":0,"start":1,"end":1}]}
                ]
            }]}"#,
        )?;

        assert_eq!(
            messages[0].text,
            "bad call\nSee: expected number\nSee: got string"
        );
        Ok(())
    }

    #[test]
    fn report_order_is_preserved() -> Result<()> {
        let messages = run(
            r#"{"errors":[
                {"message":[{"descr":"first","path":"a.js","line":1,"endline":1,"start":1,"end":2}]},
                {"message":[{"descr":"second","path":"a.js","line":9,"endline":9,"start":1,"end":2}]}
            ]}"#,
        )?;

        assert_eq!(messages[0].text, "first");
        assert_eq!(messages[1].text, "second");
        Ok(())
    }
}
