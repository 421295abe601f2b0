//! CLI command handlers. Each command is in its own file.

mod completions;
mod generate;
mod share;
mod styles;
mod verse;

pub use completions::run_completions;
pub use generate::run_generate;
pub use share::run_share;
pub use styles::run_styles;
pub use verse::run_verse;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use refugio_core::config::RefugioConfig;
use refugio_core::verse::{AnchoredSelector, Clock, ManualClock, SystemClock, VERSES};
use std::sync::Arc;

/// Selector for the configured timezone over the built-in catalog.
fn build_selector(cfg: &RefugioConfig) -> Result<AnchoredSelector> {
    AnchoredSelector::new(&cfg.timezone, VERSES.to_vec())
        .with_context(|| format!("cannot anchor verses to timezone {:?}", cfg.timezone))
}

/// System clock, or a frozen one when `--at` was given.
fn clock_for(at: Option<DateTime<Utc>>) -> Arc<dyn Clock> {
    match at {
        Some(instant) => Arc::new(ManualClock::new(instant)),
        None => Arc::new(SystemClock),
    }
}
