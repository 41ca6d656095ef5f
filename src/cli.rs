/*
 * Copyright (C) 2026 Mark Wells Dev
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! CLI utilities for terminal output formatting and colors.

use crossterm::tty::IsTty;
use std::io::stdout;

use crate::flow::{LintMessage, Severity};

/// Configuration for color output
#[derive(Debug, Clone)]
pub struct ColorConfig {
    /// Whether ANSI colors are emitted.
    pub enabled: bool,
}

impl ColorConfig {
    /// Create a new `ColorConfig`, auto-detecting TTY unless nocolor is true
    #[must_use]
    pub fn new(nocolor: bool) -> Self {
        Self {
            enabled: !nocolor && stdout().is_tty(),
        }
    }

    /// ANSI escape code for green (healthy/clean)
    #[must_use]
    pub fn green(&self, s: &str) -> String {
        if self.enabled {
            format!("\x1b[32m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    /// ANSI escape code for red (errors)
    #[must_use]
    pub fn red(&self, s: &str) -> String {
        if self.enabled {
            format!("\x1b[31m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    /// ANSI escape code for yellow (warnings)
    #[must_use]
    pub fn yellow(&self, s: &str) -> String {
        if self.enabled {
            format!("\x1b[33m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    /// ANSI escape code for cyan (file paths)
    #[must_use]
    pub fn cyan(&self, s: &str) -> String {
        if self.enabled {
            format!("\x1b[36m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    /// ANSI escape code for bold text
    #[must_use]
    pub fn bold(&self, s: &str) -> String {
        if self.enabled {
            format!("\x1b[1m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    /// ANSI escape code for dim text
    #[must_use]
    pub fn dim(&self, s: &str) -> String {
        if self.enabled {
            format!("\x1b[2m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }
}

/// Formats normalized messages as compact `file:line:col` lines.
///
/// Lines and columns are printed 1-based for humans even though the
/// messages carry 0-based ranges. Trace lines within a message are
/// indented under its location line.
#[must_use]
pub fn format_messages_compact(messages: &[LintMessage], colors: &ColorConfig) -> String {
    messages
        .iter()
        .map(|message| {
            let severity = match message.severity {
                Severity::Error => colors.red("[error]"),
                Severity::Warning => colors.yellow("[warning]"),
            };
            let location = format!(
                "{}:{}:{}",
                message.file.display(),
                message.range.start.line + 1,
                message.range.start.character + 1,
            );

            let mut lines = message.text.lines();
            let first = lines.next().unwrap_or_default();
            let mut formatted = format!("{} {severity} {first}", colors.cyan(&location));
            for line in lines {
                formatted.push_str("\n    ");
                formatted.push_str(&colors.dim(line));
            }
            formatted
        })
        .collect::<Vec<_>>()
        .join("\n")
}
