// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! One-shot check invocation against a prepared server.
//!
//! The mode decision is pure and has exactly two branches: a buffer with
//! unsaved modifications is piped to `check-contents`, a saved buffer is
//! checked on disk via `status`. No retries — a failed invocation
//! surfaces upward for the host to log or ignore.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::report::CheckReport;
use crate::error::LintError;
use crate::process::CommandRunner;

/// How a one-shot check reads the file under check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Pipe the unsaved buffer on stdin (`check-contents`).
    Contents,
    /// Check the saved file on disk (`status`).
    Status,
}

impl CheckMode {
    /// Picks the mode for a buffer based solely on whether it has
    /// unsaved modifications.
    #[must_use]
    pub const fn for_buffer(modified: bool) -> Self {
        if modified { Self::Contents } else { Self::Status }
    }

    fn args(self, file: &Path) -> Vec<String> {
        let subcommand = match self {
            Self::Contents => "check-contents",
            Self::Status => "status",
        };

        vec![
            subcommand.to_string(),
            "--json".to_string(),
            file.display().to_string(),
        ]
    }
}

/// Runs a one-shot check for `file` and decodes the raw report.
///
/// The checker exits non-zero when errors are found; the report on
/// stdout is still authoritative, so the exit code is not inspected.
///
/// # Errors
///
/// [`LintError::Invoke`] when the process cannot be run, and
/// [`LintError::MalformedReport`] when stdout does not parse as a
/// report — never collapsed into an empty diagnostic list.
pub async fn run_check<R: CommandRunner>(
    runner: &R,
    executable: &str,
    file: &Path,
    text: &str,
    modified: bool,
) -> Result<CheckReport, LintError> {
    let mode = CheckMode::for_buffer(modified);
    let cwd = file
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let stdin = match mode {
        CheckMode::Contents => Some(text),
        CheckMode::Status => None,
    };

    debug!("Checking {} ({mode:?})", file.display());

    let output = runner
        .run(executable, &mode.args(file), &cwd, stdin)
        .await
        .map_err(|source| LintError::Invoke { source })?;

    serde_json::from_str(&output.stdout).map_err(|source| LintError::MalformedReport {
        source,
        exit_code: output.exit_code,
        stderr: excerpt(&output.stderr),
    })
}

/// Caps stderr to a log-line-sized excerpt.
fn excerpt(stderr: &str) -> String {
    const MAX_CHARS: usize = 400;
    stderr.chars().take(MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::{CheckMode, run_check};
    use crate::error::LintError;
    use crate::process::testing::FakeRunner;
    use anyhow::Result;
    use std::path::{Path, PathBuf};
    use std::sync::PoisonError;
    use std::sync::atomic::Ordering;

    const CLEAN: &str = r#"{"flowVersion":"0.287.0","errors":[],"passed":true}"#;

    #[test]
    fn mode_decision_is_pure() {
        assert_eq!(CheckMode::for_buffer(true), CheckMode::Contents);
        assert_eq!(CheckMode::for_buffer(false), CheckMode::Status);
    }

    #[tokio::test]
    async fn saved_buffer_checks_the_file_on_disk() -> Result<()> {
        let runner = FakeRunner::with_stdout(CLEAN);

        let report = run_check(&runner, "flow", Path::new("/project/a.js"), "text", false).await?;
        assert!(report.passed);

        let runs = runner.runs.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(runs.len(), 1);
        assert_eq!(
            runs[0].args,
            vec![
                "status".to_string(),
                "--json".to_string(),
                "/project/a.js".to_string()
            ]
        );
        assert_eq!(runs[0].cwd, PathBuf::from("/project"));
        assert_eq!(runs[0].stdin, None);
        Ok(())
    }

    #[tokio::test]
    async fn modified_buffer_is_piped_on_stdin() -> Result<()> {
        let runner = FakeRunner::with_stdout(CLEAN);

        run_check(
            &runner,
            "flow",
            Path::new("/project/a.js"),
            "// @flow\nlet x: number = 'no';\n",
            true,
        )
        .await?;

        let runs = runner.runs.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(
            runs[0].args,
            vec![
                "check-contents".to_string(),
                "--json".to_string(),
                "/project/a.js".to_string()
            ]
        );
        assert_eq!(
            runs[0].stdin.as_deref(),
            Some("// @flow\nlet x: number = 'no';\n")
        );
        Ok(())
    }

    #[tokio::test]
    async fn malformed_output_fails_fast() -> Result<()> {
        let runner = FakeRunner::with_stdout("flow is still initializing; this can take a while");

        let err = run_check(&runner, "flow", Path::new("/project/a.js"), "", false).await;
        assert!(matches!(err, Err(LintError::MalformedReport { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn process_failure_is_an_invoke_error() -> Result<()> {
        let runner = FakeRunner::default();
        runner.fail_run.store(true, Ordering::SeqCst);

        let err = run_check(&runner, "flow", Path::new("/project/a.js"), "", false).await;
        assert!(matches!(err, Err(LintError::Invoke { .. })));
        Ok(())
    }
}
