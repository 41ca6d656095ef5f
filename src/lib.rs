// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Pantograph is an editor-side bridge to the Flow static type checker.
//!
//! It keeps one warm background Flow server per project (keyed by the
//! directory holding `.flowconfig`), runs one-shot checks against saved
//! or unsaved buffer contents, and normalizes the checker's raw JSON
//! reports into flat, 0-based, editor-consumable diagnostics.

/// Command-line output formatting and colors.
pub mod cli;
/// Configuration handling for the checker executable and opt-in mode.
pub mod config;
/// Error taxonomy for the lint pipeline.
pub mod error;
/// Flow server lifecycle and diagnostic normalization.
pub mod flow;
/// The lint surface exposed to the host editor.
pub mod linter;
/// Advisory notifications surfaced to the host.
pub mod notify;
/// External process invocation seam.
pub mod process;
/// Project discovery and opt-in detection.
pub mod workspace;
