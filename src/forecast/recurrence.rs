use chrono::NaiveDate;

use crate::domain::{Frequency, WeekWindow};

/// Result of evaluating one item against one week window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekOccurrence {
    pub is_due: bool,
    /// The occurrence date when due; otherwise the item's anchor date.
    pub actual_date: NaiveDate,
}

impl WeekOccurrence {
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.is_due.then_some(self.actual_date)
    }
}

/// Finds the (single) day inside `window` on which an item anchored on
/// `next_date` with the given `frequency` falls due.
///
/// Weekly items match every window regardless of the anchor; biweekly and
/// monthly items never match days before the anchor.
pub fn occurrence_in_week(
    next_date: NaiveDate,
    frequency: Frequency,
    window: WeekWindow,
) -> WeekOccurrence {
    match window
        .days()
        .find(|day| frequency.occurs_on(next_date, *day))
    {
        Some(day) => WeekOccurrence {
            is_due: true,
            actual_date: day,
        },
        None => WeekOccurrence {
            is_due: false,
            actual_date: next_date,
        },
    }
}
