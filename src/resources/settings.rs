//! Operator-facing configuration and its JSON persistence.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default vision range in grid units.
pub const DEFAULT_VISION_RANGE: f32 = 10.0;
/// Default maximum blur strength.
pub const DEFAULT_BLUR_STRENGTH: f32 = 2.0;

/// Which lighting rule applies when conditional blur is switched on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "camelCase")]
pub enum GatingRule {
    /// Blur only observers that see by darkvision outside of any light.
    #[default]
    Darkvision,
    /// Blur any observer standing outside of any light, regardless of vision mode.
    AmbientLight,
}

impl GatingRule {
    pub fn label(&self) -> &'static str {
        match self {
            GatingRule::Darkvision => "Darkvision",
            GatingRule::AmbientLight => "Ambient light",
        }
    }
}

/// Vision blur configuration. Read-only to the decision engine and compositor.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
#[serde(rename_all = "camelCase", default)]
pub struct VisionBlurSettings {
    /// Distance in grid units an observer can see clearly.
    pub vision_range: f32,
    /// Intensity of the blur effect.
    pub blur_strength: f32,
    /// If true, the GM sees the blur while controlling a token.
    pub gm_blur_enabled: bool,
    /// If true, blur only activates under the configured gating rule.
    #[serde(alias = "darkvisionBlurOnly")]
    pub conditional_blur_only: bool,
    pub gating_rule: GatingRule,
}

impl Default for VisionBlurSettings {
    fn default() -> Self {
        Self {
            vision_range: DEFAULT_VISION_RANGE,
            blur_strength: DEFAULT_BLUR_STRENGTH,
            gm_blur_enabled: false,
            conditional_blur_only: false,
            gating_rule: GatingRule::Darkvision,
        }
    }
}

impl VisionBlurSettings {
    /// Replaces non-positive or non-finite numbers with their defaults.
    pub fn sanitized(mut self) -> Self {
        if !(self.vision_range.is_finite() && self.vision_range > 0.0) {
            warn!("Vision range {} is invalid, using {}", self.vision_range, DEFAULT_VISION_RANGE);
            self.vision_range = DEFAULT_VISION_RANGE;
        }
        if !(self.blur_strength.is_finite() && self.blur_strength > 0.0) {
            warn!("Blur strength {} is invalid, using {}", self.blur_strength, DEFAULT_BLUR_STRENGTH);
            self.blur_strength = DEFAULT_BLUR_STRENGTH;
        }
        self
    }
}

/// Errors raised while reading or writing the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no platform config directory available")]
    NoConfigDir,

    #[error("settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("settings for {path} could not be serialized: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where settings are persisted.
#[derive(Resource, Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted in the platform config directory.
    pub fn platform_default() -> Result<Self, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(dir.join("vision_blur").join("settings.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads settings from disk. A missing file yields the defaults.
    pub fn load(&self) -> Result<VisionBlurSettings, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(VisionBlurSettings::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let settings: VisionBlurSettings =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(settings.sanitized())
    }

    /// Writes settings as pretty JSON, creating the parent directory if needed.
    pub fn save(&self, settings: &VisionBlurSettings) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(settings).map_err(|source| ConfigError::Serialize {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(io_err)
    }

    /// Loads settings, logging and falling back to defaults on any error.
    pub fn load_or_default(&self) -> VisionBlurSettings {
        match self.load() {
            Ok(settings) => {
                info!("Loaded vision blur settings from {}", self.path.display());
                settings
            }
            Err(e) => {
                warn!("Failed to load vision blur settings ({}), using defaults", e);
                VisionBlurSettings::default()
            }
        }
    }
}
