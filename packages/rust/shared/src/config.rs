//! Application configuration for SiteForge.
//!
//! User config lives at `~/.siteforge/siteforge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteForgeError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "siteforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".siteforge";

// ---------------------------------------------------------------------------
// Config structs (matching siteforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// External generative capability settings.
    #[serde(default)]
    pub generative: GenerativeConfig,

    /// Generation retry/concurrency/timeout knobs.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Quality gate thresholds.
    #[serde(default)]
    pub quality: QualityConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default bundle output directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "~/siteforge-bundles".into()
}

/// `[generative]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerativeConfig {
    /// Endpoint URL of the generative HTTP service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier passed through to the service.
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".into()
}
fn default_model() -> String {
    "moonshotai/kimi-k2.5".into()
}
fn default_api_key_env() -> String {
    "SITEFORGE_API_KEY".into()
}

/// `[generation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Attempts per section before the deterministic fallback kicks in.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff delay in ms; doubles on each retry.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Maximum concurrent generative calls.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Per-call timeout in seconds; exceeding it counts as transient.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Overall run timeout in seconds.
    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            concurrency: default_concurrency(),
            call_timeout_secs: default_call_timeout_secs(),
            run_timeout_secs: default_run_timeout_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_backoff_base_ms() -> u64 {
    250
}
fn default_concurrency() -> u32 {
    4
}
fn default_call_timeout_secs() -> u64 {
    30
}
fn default_run_timeout_secs() -> u64 {
    300
}

/// `[quality]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Per-category score threshold on a 0..=10 scale.
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Maximum repair rounds before the bundle ships as-is.
    #[serde(default = "default_max_repair_rounds")]
    pub max_repair_rounds: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            max_repair_rounds: default_max_repair_rounds(),
        }
    }
}

fn default_threshold() -> f32 {
    7.5
}
fn default_max_repair_rounds() -> u32 {
    2
}

// ---------------------------------------------------------------------------
// Pipeline config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime pipeline configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Attempts per generative call before fallback.
    pub max_attempts: u32,
    /// Base backoff delay; doubles each retry.
    pub backoff_base: Duration,
    /// Maximum concurrent generative calls.
    pub concurrency: u32,
    /// Per-call timeout.
    pub call_timeout: Duration,
    /// Overall run timeout.
    pub run_timeout: Duration,
    /// Per-category quality threshold.
    pub quality_threshold: f32,
    /// Maximum quality repair rounds.
    pub max_repair_rounds: u32,
    /// Tool version string recorded in bundle metadata.
    pub tool_version: String,
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.generation.max_attempts,
            backoff_base: Duration::from_millis(config.generation.backoff_base_ms),
            concurrency: config.generation.concurrency,
            call_timeout: Duration::from_secs(config.generation.call_timeout_secs),
            run_timeout: Duration::from_secs(config.generation.run_timeout_secs),
            quality_threshold: config.quality.threshold,
            max_repair_rounds: config.quality.max_repair_rounds,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.siteforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SiteForgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.siteforge/siteforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SiteForgeError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SiteForgeError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SiteForgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SiteForgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SiteForgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that the generative API key env var is set and non-empty.
pub fn validate_api_key(config: &AppConfig) -> Result<()> {
    let var_name = &config.generative.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(()),
        _ => Err(SiteForgeError::config(format!(
            "generative API key not found. Set the {var_name} environment variable."
        ))),
    }
}
