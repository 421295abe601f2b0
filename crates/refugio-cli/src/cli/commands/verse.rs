//! `refugio verse` – show the anchored verse, optionally following the ticker.

use anyhow::Result;
use chrono::{DateTime, Utc};
use refugio_core::config::RefugioConfig;
use refugio_core::verse::{Selection, SelectionTicker};
use std::sync::Arc;
use std::time::Duration;

use super::{build_selector, clock_for};

pub(super) fn print_selection(selection: &Selection) {
    println!(
        "[{} {}] \"{}\" - {}",
        selection.date, selection.time_label, selection.verse.text, selection.verse.reference
    );
}

pub async fn run_verse(
    cfg: &RefugioConfig,
    watch: bool,
    ticks: Option<u32>,
    at: Option<DateTime<Utc>>,
) -> Result<()> {
    let selector = Arc::new(build_selector(cfg)?);
    let ticker = SelectionTicker::start(
        selector,
        clock_for(at),
        Duration::from_secs(cfg.tick_secs),
    );
    print_selection(&ticker.current());

    if !watch {
        ticker.stop().await;
        return Ok(());
    }

    let mut updates = ticker.subscribe();
    let mut seen = 0u32;
    while ticks.map_or(true, |limit| seen < limit) {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                print_selection(&updates.borrow_and_update());
                seen += 1;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupted, stopping verse watch");
                break;
            }
        }
    }

    ticker.stop().await;
    Ok(())
}
