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

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::linter::LintOptions;

/// Process-wide configuration, merged from defaults, the user config
/// file, an explicit `--config` file, and `PANTOGRAPH_*` environment
/// variables (later sources win).
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Absolute path to the Flow executable on your system (default: "flow")
    #[serde(default = "default_executable_path")]
    pub executable_path: String,

    /// Typecheck all files, not just @flow (default: false)
    #[serde(default)]
    pub enable_all: bool,
}

fn default_executable_path() -> String {
    "flow".to_string()
}

impl Config {
    /// Load configuration from standard paths or a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error when a source file is unreadable or a value has
    /// the wrong type.
    pub fn load(explicit_file: Option<PathBuf>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // 1. Start with defaults
        builder = builder
            .set_default("executable_path", "flow")?
            .set_default("enable_all", false)?;

        // 2. Load from user config directory (~/.config/pantograph/config.toml)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("pantograph").join("config.toml");
            if config_path.exists() {
                builder = builder.add_source(config::File::from(config_path));
            }
        }

        // 3. Load from explicit file if provided
        if let Some(path) = explicit_file {
            builder = builder.add_source(config::File::from(path));
        }

        // 4. Load from environment variables (PANTOGRAPH_ENABLE_ALL, etc.)
        builder = builder.add_source(config::Environment::with_prefix("PANTOGRAPH"));

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Lint options carrying this configuration.
    #[must_use]
    pub fn lint_options(&self) -> LintOptions {
        LintOptions {
            executable_path: self.executable_path.clone(),
            enable_all: self.enable_all,
        }
    }
}
