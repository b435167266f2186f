use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BridgeError, BridgeResult};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub watch: WatchConfig,
    pub surface: SurfaceConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WatchConfig {
    /// Trailing-edge debounce for file-change notifications, in milliseconds.
    /// Zero reloads on every notification, matching the historical behavior.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 0 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SurfaceConfig {
    /// JavaScript hook the viewer frontend exposes for inbound bridge events.
    pub trigger_function: String,
}

impl SurfaceConfig {
    pub const DEFAULT_TRIGGER_FUNCTION: &str = "triggerMessageEvent";
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            trigger_function: Self::DEFAULT_TRIGGER_FUNCTION.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> BridgeResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(BridgeError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            BridgeError::io_with_context(
                source,
                format!("failed to read config: {}", path.display()),
            )
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            BridgeError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        // The trigger function name is spliced into executed script text, so
        // it must stay a plain dotted identifier.
        let name = &self.surface.trigger_function;
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'));
        if !valid {
            self.surface.trigger_function = SurfaceConfig::default().trigger_function;
        }
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("PVB_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("pvb").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("pvb")
                .join("config.toml"),
        );
    }
    None
}
