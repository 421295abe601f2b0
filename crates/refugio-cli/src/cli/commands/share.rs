//! `refugio share` – print the current verse as share text.

use anyhow::Result;
use chrono::{DateTime, Utc};
use refugio_core::config::RefugioConfig;
use refugio_core::verse::Clock as _;

use super::{build_selector, clock_for};

pub fn run_share(cfg: &RefugioConfig, at: Option<DateTime<Utc>>) -> Result<()> {
    let selector = build_selector(cfg)?;
    let selection = selector.select_at(clock_for(at).now());
    println!("{}", selection.verse.share_text());
    Ok(())
}
