//! Settings file support
//!
//! A settings file is TOML with optional `[layout]` and `[svg]` tables:
//!
//! ```toml
//! [layout]
//! default_margin = 4
//! max_turns = 32
//!
//! [svg]
//! show_anchors = true
//! class_prefix = "demo-"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::LayoutConfig;
use crate::renderer::SvgConfig;

/// Errors that can occur when loading or parsing settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Layout and rendering settings; every field is optional in the file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutConfig,
    pub svg: SvgConfig,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load settings from a TOML string
    pub fn from_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }
}
