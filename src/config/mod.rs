// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Application configuration.
//!
//! This module manages the application configuration file and the location of
//! the local track database.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "partoui";

const DB_FILE_NAME: &str = "partoui.db";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub version: u32,
    pub celebration_name: String,
    pub metadata_lookup: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            celebration_name: "Friend".to_string(),
            metadata_lookup: true,
        }
    }
}

// confy writes the file with defaults on first load, so users always have a
// config file to edit even though the app itself never writes one back.
pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

/// Returns the path of the track database, alongside the configuration file.
pub fn store_path() -> Result<String> {
    let config_file = confy::get_configuration_file_path(CONFIG_NAME, None)
        .context("Failed to locate configuration directory")?;
    let dir = config_file
        .parent()
        .context("Configuration file has no parent directory")?;
    Ok(dir.join(DB_FILE_NAME).to_string_lossy().into_owned())
}
