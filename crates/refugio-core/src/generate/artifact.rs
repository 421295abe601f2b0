//! Decoded image returned by a successful generation.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::checksum;

pub const MIME_TYPE: &str = "image/png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    bytes: Vec<u8>,
    style_id: String,
}

impl Artifact {
    /// `bytes` must be non-empty; the executor guarantees this.
    pub(crate) fn new(bytes: Vec<u8>, style_id: impl Into<String>) -> Self {
        debug_assert!(!bytes.is_empty());
        Self {
            bytes,
            style_id: style_id.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn style_id(&self) -> &str {
        &self.style_id
    }

    /// `data:image/png;base64,...` for embedding in a view.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", MIME_TYPE, STANDARD.encode(&self.bytes))
    }

    /// `refugio-<style>-<YYYYMMDD>.png`, dated in the anchored timezone.
    pub fn suggested_filename(&self, date: NaiveDate) -> String {
        format!("refugio-{}-{}.png", self.style_id, date.format("%Y%m%d"))
    }

    pub fn sha256_hex(&self) -> String {
        checksum::sha256_bytes(&self.bytes)
    }

    /// Write the bytes to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(path, &self.bytes).with_context(|| format!("write {}", path.display()))
    }
}
