//! Configuration management for Siteforge.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Progress pacing
    pub pacing: PacingConfig,

    /// AI backend settings
    pub ai: AiConfig,

    /// UI settings
    pub ui: UiConfig,

    /// Export settings
    pub export: ExportConfig,
}

/// Artificial delays that pace the pipeline for a human watching it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after a preference selection before advancing
    pub advance_delay_ms: u64,

    /// Pause between the first and second half of the compile log
    pub compile_delay_ms: u64,

    /// Pause before showing the preview after generation
    pub preview_delay_ms: u64,

    /// Pause before stepping back after a generation failure
    pub failure_delay_ms: u64,

    /// Interval between cosmetic analysis status updates
    pub analysis_tick_ms: u64,
}

/// AI backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Backend provider (gemini)
    pub provider: String,

    /// Text / structured-output model
    pub model: String,

    /// Image generation model
    pub image_model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Override for the API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Card theme. The only UI state persisted across runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Light => write!(f, "light"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// UI settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Card theme
    pub theme: Theme,
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exported sites are written to
    pub output_dir: PathBuf,
}

/// Resolved pacing delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub advance_delay: Duration,
    pub compile_delay: Duration,
    pub preview_delay: Duration,
    pub failure_delay: Duration,
    pub analysis_tick: Duration,
}

impl Pacing {
    /// No artificial delays at all.
    pub fn immediate() -> Self {
        Self {
            advance_delay: Duration::ZERO,
            compile_delay: Duration::ZERO,
            preview_delay: Duration::ZERO,
            failure_delay: Duration::ZERO,
            analysis_tick: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from(&PacingConfig::default())
    }
}

impl From<&PacingConfig> for Pacing {
    fn from(config: &PacingConfig) -> Self {
        Self {
            advance_delay: Duration::from_millis(config.advance_delay_ms),
            compile_delay: Duration::from_millis(config.compile_delay_ms),
            preview_delay: Duration::from_millis(config.preview_delay_ms),
            failure_delay: Duration::from_millis(config.failure_delay_ms),
            analysis_tick: Duration::from_millis(config.analysis_tick_ms),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.siteforge.toml` in current directory
    /// 2. `~/.config/siteforge/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        // Try local config first
        let local_config = PathBuf::from(".siteforge.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        // Try global config
        if let Some(global_config) = Self::global_config_path() {
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        // Return defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the global config file.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let config_path = Self::global_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to_file(&config_path)?;
        Ok(config_path)
    }

    /// Save configuration to a specific file.
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("siteforge"))
    }

    /// Get the global config file path.
    pub fn global_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Resolved pacing delays.
    pub fn pacing(&self) -> Pacing {
        Pacing::from(&self.pacing)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            advance_delay_ms: 300,
            compile_delay_ms: 500,
            preview_delay_ms: 1000,
            failure_delay_ms: 1500,
            analysis_tick_ms: 800,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { output_dir: PathBuf::from(".") }
    }
}
