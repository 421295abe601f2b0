//! Daily verse rotation anchored to one timezone.
//!
//! `AnchoredSelector` maps the calendar day in the anchored timezone onto the
//! catalog (`day % len`). `SelectionTicker` recomputes it periodically and
//! publishes the result independently of any network activity.

mod catalog;
mod clock;
mod select;
mod ticker;

pub use catalog::{Verse, VERSES};
pub use clock::{Clock, ManualClock, SystemClock};
pub use select::{select_index, AnchoredSelector, Selection, SelectorError};
pub use ticker::{SelectionTicker, TickerHandle};
