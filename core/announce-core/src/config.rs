//! Runtime configuration loaded from `~/.announce/config.toml`.
//!
//! Every key is optional; a missing file means defaults.
//!
//! ```toml
//! [lifecycle]
//! expire_after_days = 7
//! highlight_after_days = 1
//! saturday_rule = "intended"
//!
//! [markers.new]
//! label = "new"
//! color = "#0033a0"
//!
//! [guard]
//! stale_after_secs = 900
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AnnounceError, Result};
use crate::host::{MarkerPurpose, MarkerStyle};

const DEFAULT_CONFIG_RELATIVE_PATH: &str = ".announce/config.toml";

/// How a slide created on a Saturday extends its highlight window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaturdayRule {
    /// Saturday gets `saturday_extra_days`, so the badge lasts through Monday.
    #[default]
    Intended,
    /// Saturday behaves like any other weekday (the adjustment is dropped).
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LifecycleSection {
    pub expire_after_days: u64,
    pub highlight_after_days: u64,
    pub friday_extra_days: u64,
    pub saturday_extra_days: u64,
    pub saturday_rule: SaturdayRule,
}

impl Default for LifecycleSection {
    fn default() -> Self {
        Self {
            expire_after_days: 7,
            highlight_after_days: 1,
            friday_extra_days: 2,
            saturday_extra_days: 1,
            saturday_rule: SaturdayRule::Intended,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkersSection {
    pub new: MarkerStyle,
    pub expired: MarkerStyle,
    pub zombie: MarkerStyle,
}

impl Default for MarkersSection {
    fn default() -> Self {
        Self {
            new: MarkerStyle::new("new", "#0033a0"),
            expired: MarkerStyle::new("expired", "#7f7f7f"),
            zombie: MarkerStyle::new("Zombie (see Notes)", "#7FBF3F"),
        }
    }
}

impl MarkersSection {
    pub fn style(&self, purpose: MarkerPurpose) -> &MarkerStyle {
        match purpose {
            MarkerPurpose::New => &self.new,
            MarkerPurpose::Expired => &self.expired,
            MarkerPurpose::Zombie => &self.zombie,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuardSection {
    pub stale_after_secs: u64,
}

impl Default for GuardSection {
    fn default() -> Self {
        Self {
            stale_after_secs: 15 * 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LifecycleConfig {
    #[serde(default)]
    pub lifecycle: LifecycleSection,
    #[serde(default)]
    pub markers: MarkersSection,
    #[serde(default)]
    pub guard: GuardSection,
}

pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(AnnounceError::HomeDirNotFound)?;
    Ok(home.join(DEFAULT_CONFIG_RELATIVE_PATH))
}

/// Loads configuration from `path`, or the default location when `None`.
pub fn load_config(path: Option<&Path>) -> Result<LifecycleConfig> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    if !config_path.exists() {
        return Ok(LifecycleConfig::default());
    }

    let content = fs_err::read_to_string(&config_path).map_err(|source| AnnounceError::Io {
        context: format!("reading config {}", config_path.display()),
        source,
    })?;
    toml::from_str::<LifecycleConfig>(&content).map_err(|err| AnnounceError::ConfigMalformed {
        path: config_path.clone(),
        details: err.to_string(),
    })
}
