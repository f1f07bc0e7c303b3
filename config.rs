/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Editor configuration, read from TOML.

use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

const CONFIG_DIR_NAME: &str = "mapgraph";
const CONFIG_FILE_NAME: &str = "editor.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub initial_zoom: u8,
    pub max_zoom: u8,
    /// Tile URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub tile_url: String,
    pub node_icon_url: String,
    pub node_active_icon_url: String,
    pub edge_color: String,
    pub edge_active_color: String,
    /// Maximum undo depth. `None` keeps every step.
    pub history_limit: Option<usize>,
    /// Map center applied on mount. Kept last: it is written as a TOML table.
    pub initial_view: LatLng,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_zoom: 16,
            max_zoom: 19,
            tile_url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
            node_icon_url: "crosspoint-blue.png".to_string(),
            node_active_icon_url: "crosspoint-red.png".to_string(),
            edge_color: "#3a8ece".to_string(),
            edge_active_color: "#f00".to_string(),
            history_limit: None,
            initial_view: LatLng::new(39.1319066, -84.5148446),
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// `<config dir>/mapgraph/editor.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        let mut dir = dirs::config_dir()?;
        dir.push(CONFIG_DIR_NAME);
        dir.push(CONFIG_FILE_NAME);
        Some(dir)
    }

    /// Load `path` if it exists, falling back to defaults on any failure.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring editor config: {e}");
                Self::default()
            },
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Errors from loading the editor config
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {e}"),
            ConfigError::Parse(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
