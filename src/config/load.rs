use std::env;
use std::path::{Path, PathBuf};

use ::config::{Config, ConfigError, Environment, File};

use super::schema::{LayoutSettings, Settings, VisualizerSettings};

/// Prefix of environment overrides, e.g. `TAGWALL__AUDIO__START_MUTED`.
const ENV_PREFIX: &str = "TAGWALL";
/// Explicit config file location, bypassing the XDG lookup.
const CONFIG_PATH_VAR: &str = "TAGWALL_CONFIG_PATH";
const APP_DIR: &str = "tagwall";

impl Settings {
    /// Defaults, overlaid by the config file at [`resolve_config_path`], overlaid
    /// by `TAGWALL__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(resolve_config_path().as_deref())
    }

    /// Same layering with an explicit (optional, possibly missing) file.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(p) = path {
            builder = builder.add_source(File::from(p).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        self.layout.validate()?;
        self.visualizer.validate()
    }
}

impl LayoutSettings {
    fn validate(&self) -> Result<(), String> {
        if self.narrow_max_px == 0 || self.narrow_max_px >= self.medium_max_px {
            return Err(format!(
                "layout breakpoints must satisfy 0 < narrow_max_px < medium_max_px (got {} and {})",
                self.narrow_max_px, self.medium_max_px
            ));
        }
        if self.cell_width_px == 0 {
            return Err("layout.cell_width_px must be >= 1".into());
        }
        Ok(())
    }
}

impl VisualizerSettings {
    fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() || !(32..=32768).contains(&self.fft_size) {
            return Err(format!(
                "visualizer.fft_size must be a power of two in 32..=32768 (got {})",
                self.fft_size
            ));
        }
        if self.bars == 0 || self.bars > self.fft_size / 2 {
            return Err(format!("visualizer.bars must be in 1..={}", self.fft_size / 2));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err("visualizer.smoothing must be in [0, 1)".into());
        }
        Ok(())
    }
}

/// `TAGWALL_CONFIG_PATH` if set, else [`default_config_path`].
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/tagwall/config.toml`, else `~/.config/tagwall/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join(APP_DIR).join("config.toml"))
}
