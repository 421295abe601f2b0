//! Day-anchored verse selection.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use super::catalog::Verse;

#[derive(Debug, Error)]
pub enum SelectorError {
    /// The anchored timezone cannot be resolved, so no day can be derived.
    #[error("clock unavailable: unknown timezone {0}")]
    ClockUnavailable(String),
    #[error("verse catalog is empty")]
    EmptyCatalog,
}

/// `day mod len`, or `None` for an empty catalog.
pub fn select_index(day: u32, len: usize) -> Option<usize> {
    (day as usize).checked_rem(len)
}

/// Result of one recomputation. Replaced wholesale on every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub verse: Verse,
    pub index: usize,
    /// Day of month in the anchored timezone.
    pub day: u32,
    /// Calendar date in the anchored timezone.
    pub date: NaiveDate,
    /// `HH:MM` in the anchored timezone.
    pub time_label: String,
}

/// Picks the active verse from the calendar day in one fixed timezone,
/// whatever the local timezone of the machine.
#[derive(Debug, Clone)]
pub struct AnchoredSelector {
    tz: Tz,
    catalog: Vec<Verse>,
}

impl AnchoredSelector {
    pub fn new(timezone: &str, catalog: Vec<Verse>) -> Result<Self, SelectorError> {
        let tz: Tz = timezone
            .trim()
            .parse()
            .map_err(|e| SelectorError::ClockUnavailable(format!("{:?} ({})", timezone, e)))?;
        if catalog.is_empty() {
            return Err(SelectorError::EmptyCatalog);
        }
        Ok(Self { tz, catalog })
    }

    pub fn select_at(&self, now: DateTime<Utc>) -> Selection {
        let local = now.with_timezone(&self.tz);
        let day = local.day();
        // `new` rejects empty catalogs.
        let index = select_index(day, self.catalog.len()).unwrap_or(0);
        Selection {
            verse: self.catalog[index],
            index,
            day,
            date: local.date_naive(),
            time_label: local.format("%H:%M").to_string(),
        }
    }
}
