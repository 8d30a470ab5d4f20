//! Typed records shared by the forecast engine, importers and profile store.

pub mod item;
pub mod week;

pub use item::{monthly_equivalent, sanitize_amount, Frequency, ItemKind, RecurringItem};
pub use week::{Occurrence, OccurrenceKind, WeekSummary, WeekWindow};
