//! Loader configuration, read from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! campaigns_dir = "GameData/Campaigns"
//! campaigns = [1, 2, 3, 4, 5]
//!
//! [files]
//! campaign = "campaign.def"
//! zones = "zones.def"
//! missions = "Missions.def"
//! templates = "Templates.def"
//! scenes = "Scenes"
//! scene_extension = "def"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub campaigns_dir: PathBuf,
    /// Campaign numbers; campaign `n` lives in directory `{n:02}`.
    pub campaigns: Vec<u32>,
    pub files: FileNames,
}

/// File and directory names inside one campaign directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileNames {
    pub campaign: String,
    pub zones: String,
    pub missions: String,
    pub templates: String,
    pub scenes: String,
    pub scene_extension: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            campaigns_dir: PathBuf::from("GameData/Campaigns"),
            campaigns: vec![1, 2, 3, 4, 5],
            files: FileNames::default(),
        }
    }
}

impl Default for FileNames {
    fn default() -> Self {
        FileNames {
            campaign: "campaign.def".to_owned(),
            zones: "zones.def".to_owned(),
            missions: "Missions.def".to_owned(),
            templates: "Templates.def".to_owned(),
            scenes: "Scenes".to_owned(),
            scene_extension: "def".to_owned(),
        }
    }
}

impl LoaderConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            file: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Directory of campaign number `n`.
    pub fn campaign_dir(&self, n: u32) -> PathBuf {
        self.campaigns_dir.join(format!("{:02}", n))
    }
}
