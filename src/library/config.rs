//! Configuration primitives for the PersonaBase studio workspace.
//!
//! Stored as a machine-readable TOML file at the workspace root. The root
//! itself resolves to the platform data directory, or to `PERSONABASE_HOME`
//! when set (tests point this at a temp directory).

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.toml";
const HOME_ENV: &str = "PERSONABASE_HOME";

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Identifier of the schema that was active when the app last shut down.
    pub last_active_schema_id: Option<String>,
    /// Generation knobs (temperature, pass brevity, few-shot cap).
    #[serde(default)]
    pub generation: GenerationSettings,
    /// Revision ledger and export housekeeping.
    #[serde(default)]
    pub ledger: LedgerSettings,
}

/// Defaults applied to every generation run unless the caller overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Sampling temperature used when a request does not set one.
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    /// Per-value word ceiling applied to every pass except the last.
    #[serde(default = "default_draft_word_ceiling")]
    pub draft_word_ceiling: u32,
    /// Maximum number of few-shot example profiles attached on pass 0.
    #[serde(default = "default_few_shot_limit")]
    pub few_shot_limit: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            default_temperature: default_temperature(),
            draft_word_ceiling: default_draft_word_ceiling(),
            few_shot_limit: default_few_shot_limit(),
        }
    }
}

const fn default_temperature() -> f64 {
    0.9
}

const fn default_draft_word_ceiling() -> u32 {
    60
}

const fn default_few_shot_limit() -> u32 {
    2
}

/// Ledger and export housekeeping knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Maximum number of export archives retained per workspace.
    #[serde(default = "default_export_retention")]
    pub export_retention: u32,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            export_retention: default_export_retention(),
        }
    }
}

const fn default_export_retention() -> u32 {
    20
}

/// Resolves the workspace root directory.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    let dirs = ProjectDirs::from("", "", "PersonaBase")
        .ok_or_else(|| anyhow!("Could not determine a platform data directory"))?;
    Ok(dirs.data_dir().to_path_buf())
}

pub fn config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Loads the workspace config, falling back to defaults when absent.
pub fn load_or_default(root: &Path) -> Result<AppConfig> {
    let path = config_file_path(root);
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let data = fs::read_to_string(&path)
        .with_context(|| format!("Failed reading config {}", path.display()))?;
    let config = toml::from_str(&data)
        .with_context(|| format!("Failed parsing config {}", path.display()))?;
    Ok(config)
}

/// Persists the workspace config.
pub fn save(root: &Path, config: &AppConfig) -> Result<()> {
    fs::create_dir_all(root)
        .with_context(|| format!("Failed creating workspace root {}", root.display()))?;
    let path = config_file_path(root);
    let data = toml::to_string_pretty(config).context("Failed serializing config")?;
    fs::write(&path, data).with_context(|| format!("Failed writing config {}", path.display()))?;
    Ok(())
}
