//! Configuration loading and parsing.
//!
//! Parses `vimcore.toml` (or an override path provided by the host) into the
//! handful of settings the command core consults:
//!
//! ```toml
//! [editing]
//! shift_width = 4
//! tab_stop = 8
//! expand_tab = true
//! virtual_edit = "none"   # none | onemore | all
//!
//! [marks]
//! beep_on_jump_failure = false
//! ```
//!
//! Unknown fields are ignored (TOML deserialization tolerance) and missing
//! sections fall back to defaults. A `shift_width` of zero follows Vim and
//! means "use `tab_stop`"; the effective value is resolved by
//! `Config::shift_width` and the fallback is logged once, at parse time.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};
use tracing::{info, warn};

/// File name looked up by `discover`.
pub const CONFIG_FILE_NAME: &str = "vimcore.toml";

/// Where the caret may rest relative to the end of a line.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VirtualEditSetting {
    #[default]
    None,
    OneMore,
    All,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EditingConfig {
    #[serde(default = "EditingConfig::default_shift_width")]
    pub shift_width: u16,
    #[serde(default = "EditingConfig::default_tab_stop")]
    pub tab_stop: u16,
    #[serde(default = "EditingConfig::default_expand_tab")]
    pub expand_tab: bool,
    #[serde(default)]
    pub virtual_edit: VirtualEditSetting,
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            shift_width: Self::default_shift_width(),
            tab_stop: Self::default_tab_stop(),
            expand_tab: Self::default_expand_tab(),
            virtual_edit: VirtualEditSetting::default(),
        }
    }
}

impl EditingConfig {
    const fn default_shift_width() -> u16 {
        4
    }
    const fn default_tab_stop() -> u16 {
        8
    }
    const fn default_expand_tab() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MarkConfig {
    /// Beep when a jump to a mark fails (set-mark failures always beep).
    #[serde(default)]
    pub beep_on_jump_failure: bool,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editing: EditingConfig,
    #[serde(default)]
    pub marks: MarkConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vimcore").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Load configuration from `path` (or the discovered location). A missing file
/// yields defaults; a malformed file is reported and also yields defaults.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    match fs::read_to_string(&path) {
        Ok(content) => match Config::from_toml_str(&content) {
            Ok(cfg) => {
                info!(target: "config", path = %path.display(), "config_loaded");
                Ok(cfg)
            }
            Err(e) => {
                warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
                Ok(Config::default())
            }
        },
        Err(_) => Ok(Config::default()),
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file = toml::from_str::<ConfigFile>(content).context("parsing vimcore config")?;
        if file.editing.shift_width == 0 {
            info!(target: "config", tab_stop = file.editing.tab_stop.max(1), "shift_width_zero_uses_tab_stop");
        }
        Ok(Self {
            raw: Some(content.to_string()),
            file,
        })
    }

    /// Strict variant of `load_from` for hosts that want parse errors surfaced.
    pub fn load_strict(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Effective shift width in columns (`shift_width`, or `tab_stop` when zero).
    pub fn shift_width(&self) -> usize {
        let editing = &self.file.editing;
        if editing.shift_width == 0 {
            self.tab_stop()
        } else {
            editing.shift_width as usize
        }
    }

    pub fn tab_stop(&self) -> usize {
        self.file.editing.tab_stop.max(1) as usize
    }

    pub fn expand_tab(&self) -> bool {
        self.file.editing.expand_tab
    }

    pub fn virtual_edit(&self) -> VirtualEditSetting {
        self.file.editing.virtual_edit
    }

    pub fn beep_on_jump_failure(&self) -> bool {
        self.file.marks.beep_on_jump_failure
    }
}
