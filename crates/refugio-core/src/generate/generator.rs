//! `generate(style_id)`: the entry point the presentation layer calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::artifact::Artifact;
use super::error::GenerateError;
use super::executor::RequestExecutor;
use super::request::RequestSpec;
use super::styles::find_style;
use super::transport::Transport;
use crate::config::{InstancesShape, RefugioConfig, RetryConfig};

/// Everything a `Generator` needs, with the API key already resolved.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub instances_shape: InstancesShape,
    pub sample_count: u32,
    pub retry: RetryConfig,
}

impl GeneratorSettings {
    /// Take endpoint and retry settings from config; the key may come from the environment.
    pub fn from_config(cfg: &RefugioConfig) -> Self {
        Self {
            endpoint: cfg.imagen.endpoint.clone(),
            api_key: cfg.imagen.resolve_api_key(),
            instances_shape: cfg.imagen.instances_shape,
            sample_count: cfg.imagen.sample_count,
            retry: cfg.retry.clone(),
        }
    }
}

/// Clears the busy flag when dropped.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Style-driven wallpaper generation with at most one request in flight.
pub struct Generator {
    settings: GeneratorSettings,
    executor: RequestExecutor,
    busy: AtomicBool,
}

impl Generator {
    pub fn new(settings: GeneratorSettings, transport: Arc<dyn Transport>) -> Self {
        let executor = RequestExecutor::new(transport, settings.retry.clone());
        Self {
            settings,
            executor,
            busy: AtomicBool::new(false),
        }
    }

    /// True while a `generate` call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Generate a wallpaper for `style_id`.
    ///
    /// A call made while another is in flight returns `Busy` and does nothing.
    pub async fn generate(&self, style_id: &str) -> Result<Artifact, GenerateError> {
        let _guard = BusyGuard::acquire(&self.busy).ok_or(GenerateError::Busy)?;

        let style = find_style(style_id)
            .ok_or_else(|| GenerateError::UnknownStyle(style_id.to_string()))?;
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                GenerateError::Configuration(
                    "missing API key (set imagen.api_key or REFUGIO_API_KEY)".to_string(),
                )
            })?;

        let spec = RequestSpec::for_style(
            style,
            &self.settings.endpoint,
            api_key,
            self.settings.instances_shape,
            self.settings.sample_count,
        )?;

        tracing::info!(style = style.id, "generating wallpaper");
        let bytes = self.executor.execute(&spec).await?;
        tracing::info!(style = style.id, bytes = bytes.len(), "wallpaper ready");
        Ok(Artifact::new(bytes, style.id))
    }
}
