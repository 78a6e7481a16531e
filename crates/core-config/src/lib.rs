//! Configuration loading and parsing.
//!
//! Parses `deepline.toml` (or an override path provided by the binary). Every
//! table and field is optional; absent values take the defaults below and
//! unknown fields are ignored so older binaries tolerate newer files.
//!
//! ```toml
//! [prompt]
//! text = "dl> "
//! [startup]
//! welcome = true
//! [print]
//! number_width = 6
//! ```
//!
//! A file that fails to parse is reported with `warn!` on the `config` target
//! and replaced by defaults; a broken config never prevents startup.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "deepline.toml";

/// Bounds applied to `[print] number_width`.
pub const NUMBER_WIDTH_MIN: usize = 1;
pub const NUMBER_WIDTH_MAX: usize = 16;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    #[serde(default = "PromptConfig::default_text")]
    pub text: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            text: Self::default_text(),
        }
    }
}

impl PromptConfig {
    fn default_text() -> String {
        "dl> ".to_string()
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct StartupConfig {
    #[serde(default = "StartupConfig::default_welcome")]
    pub welcome: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            welcome: Self::default_welcome(),
        }
    }
}

impl StartupConfig {
    const fn default_welcome() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PrintConfig {
    #[serde(default = "PrintConfig::default_number_width")]
    pub number_width: usize,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            number_width: Self::default_number_width(),
        }
    }
}

impl PrintConfig {
    const fn default_number_width() -> usize {
        6
    }

    /// Raw width clamped to `NUMBER_WIDTH_MIN..=NUMBER_WIDTH_MAX`.
    pub fn effective_number_width(&self) -> usize {
        let clamped = self.number_width.clamp(NUMBER_WIDTH_MIN, NUMBER_WIDTH_MAX);
        if clamped != self.number_width {
            info!(
                target: "config",
                raw = self.number_width,
                clamped,
                "print_number_width_clamped"
            );
        }
        clamped
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub startup: StartupConfig,
    #[serde(default)]
    pub print: PrintConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub source: Option<PathBuf>,
}

/// Best-effort config path: `deepline.toml` in the working directory, then
/// the platform config directory (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("deepline").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                source: Some(path),
            })
        }
        Err(e) => {
            warn!(
                target: "config",
                path = %path.display(),
                error = %e,
                "config_parse_failed_using_defaults"
            );
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn prompt(&self) -> &str {
        &self.file.prompt.text
    }

    pub fn welcome(&self) -> bool {
        self.file.startup.welcome
    }
}
