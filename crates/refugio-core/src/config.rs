use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default image-generation endpoint (Imagen `predict`).
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/imagen-4.0-generate-001:predict";

/// Timezone all date-derived logic is anchored to.
pub const DEFAULT_TIMEZONE: &str = "America/Bogota";

/// Environment variables consulted (in order) when the config has no API key.
pub const API_KEY_ENV_VARS: [&str; 2] = ["REFUGIO_API_KEY", "GEMINI_API_KEY"];

/// Retry policy parameters (`[retry]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per generation (including the first).
    pub max_attempts: u32,
    /// Delay before the second attempt, in milliseconds.
    pub base_delay_ms: u64,
    /// Multiplier applied to the delay after every failed attempt. Must be > 1.
    pub backoff_factor: f64,
    /// HTTP statuses treated as transient.
    pub retry_on_status: Vec<u16>,
    /// Retry connection failures and timeouts.
    pub retry_transport: bool,
    /// Retry a 2xx response that lacks the expected image field.
    pub retry_malformed: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 1000,
            backoff_factor: 2.0,
            retry_on_status: vec![429, 500, 502, 503, 504],
            retry_transport: true,
            retry_malformed: true,
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts < 1 {
            bail!("retry.max_attempts must be at least 1");
        }
        if self.base_delay_ms == 0 {
            bail!("retry.base_delay_ms must be greater than 0");
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor <= 1.0 {
            bail!(
                "retry.backoff_factor must be a finite number greater than 1 (got {})",
                self.backoff_factor
            );
        }
        Ok(())
    }
}

/// Shape of the `instances` field in the request body.
///
/// `array` is canonical; `object` is what an older client revision sent and is
/// kept for endpoints that only accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstancesShape {
    #[default]
    Array,
    Object,
}

/// Image-generation endpoint settings (`[imagen]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagenConfig {
    pub endpoint: String,
    /// API key sent as the `key` query parameter. Falls back to the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub instances_shape: InstancesShape,
    pub sample_count: u32,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for ImagenConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            instances_shape: InstancesShape::Array,
            sample_count: 1,
            connect_timeout_secs: 15,
            timeout_secs: 120,
        }
    }
}

impl ImagenConfig {
    /// API key from the config file, then `REFUGIO_API_KEY`, then `GEMINI_API_KEY`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Like `resolve_api_key` but with an injectable environment lookup.
    /// Blank values count as absent.
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |s: String| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        self.api_key
            .clone()
            .and_then(non_blank)
            .or_else(|| API_KEY_ENV_VARS.iter().find_map(|v| lookup(*v).and_then(non_blank)))
    }
}

/// Global configuration loaded from `~/.config/refugio/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefugioConfig {
    /// IANA timezone the verse rotation is anchored to.
    pub timezone: String,
    /// Seconds between verse recomputations.
    pub tick_secs: u64,
    pub imagen: ImagenConfig,
    pub retry: RetryConfig,
}

impl Default for RefugioConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            tick_secs: 60,
            imagen: ImagenConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl RefugioConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_secs == 0 {
            bail!("tick_secs must be at least 1");
        }
        if self.imagen.sample_count == 0 {
            bail!("imagen.sample_count must be at least 1");
        }
        self.retry.validate()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("refugio")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RefugioConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<RefugioConfig> {
    if !path.exists() {
        let default_cfg = RefugioConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: RefugioConfig = toml::from_str(&data)?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = RefugioConfig::default();
        assert_eq!(cfg.timezone, "America/Bogota");
        assert_eq!(cfg.tick_secs, 60);
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.retry.base_delay_ms, 1000);
        assert_eq!(cfg.imagen.instances_shape, InstancesShape::Array);
        assert!(cfg.imagen.api_key.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = RefugioConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: RefugioConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.timezone, cfg.timezone);
        assert_eq!(parsed.imagen.endpoint, cfg.imagen.endpoint);
        assert_eq!(parsed.retry.retry_on_status, cfg.retry.retry_on_status);
    }

    #[test]
    fn config_toml_partial_sections_use_defaults() {
        let toml = r#"
            timezone = "America/Lima"

            [retry]
            max_attempts = 3
            backoff_factor = 1.5
        "#;
        let cfg: RefugioConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.timezone, "America/Lima");
        assert_eq!(cfg.tick_secs, 60);
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.retry.base_delay_ms, 1000);
        assert!((cfg.retry.backoff_factor - 1.5).abs() < 1e-9);
        assert!(cfg.retry.retry_malformed);
    }

    #[test]
    fn config_toml_legacy_object_shape() {
        let toml = r#"
            [imagen]
            api_key = "abc"
            instances_shape = "object"
        "#;
        let cfg: RefugioConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.imagen.instances_shape, InstancesShape::Object);
        assert_eq!(cfg.imagen.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.imagen.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn retry_validation_rejects_bad_values() {
        let mut retry = RetryConfig::default();
        retry.max_attempts = 0;
        assert!(retry.validate().is_err());

        let mut retry = RetryConfig::default();
        retry.base_delay_ms = 0;
        assert!(retry.validate().is_err());

        let mut retry = RetryConfig::default();
        retry.backoff_factor = 1.0;
        assert!(retry.validate().is_err());
        retry.backoff_factor = f64::NAN;
        assert!(retry.validate().is_err());
    }

    #[test]
    fn api_key_prefers_config_then_env_order() {
        let mut imagen = ImagenConfig::default();
        let env = |name: &str| match name {
            "REFUGIO_API_KEY" => Some("  ".to_string()),
            "GEMINI_API_KEY" => Some("from-gemini".to_string()),
            _ => None,
        };
        assert_eq!(imagen.resolve_api_key_with(env).as_deref(), Some("from-gemini"));

        imagen.api_key = Some("from-config".to_string());
        assert_eq!(imagen.resolve_api_key_with(env).as_deref(), Some("from-config"));

        imagen.api_key = Some(String::new());
        assert!(imagen.resolve_api_key_with(|_| None).is_none());
    }

    #[test]
    fn load_or_init_writes_default_then_reads_it_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refugio").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(loaded.timezone, created.timezone);
        assert_eq!(loaded.retry.max_attempts, created.retry.max_attempts);
    }

    #[test]
    fn load_rejects_invalid_retry_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[retry]\nbackoff_factor = 0.5\n").unwrap();
        assert!(load_or_init_at(&path).is_err());
    }
}
