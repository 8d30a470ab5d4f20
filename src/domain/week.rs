use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_WEEK: i64 = 7;

/// Seven consecutive calendar days, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Duration::days(DAYS_PER_WEEK - 1),
        }
    }

    /// Window for the 1-based `week_number` counted from `reference`.
    pub fn nth(reference: NaiveDate, week_number: u32) -> Self {
        let offset = (week_number.max(1) as i64 - 1) * DAYS_PER_WEEK;
        Self::starting(reference + Duration::days(offset))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..DAYS_PER_WEEK).map(move |offset| start + Duration::days(offset))
    }

    pub fn next(&self) -> Self {
        Self::starting(self.end + Duration::days(1))
    }
}

/// Classifies a single due instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OccurrenceKind {
    Income,
    Expense {
        #[serde(rename = "isEssential")]
        essential: bool,
    },
}

impl OccurrenceKind {
    pub fn is_income(&self) -> bool {
        matches!(self, OccurrenceKind::Income)
    }

    pub fn is_essential(&self) -> bool {
        matches!(self, OccurrenceKind::Expense { essential: true })
    }
}

/// One concrete due instance of a recurring item inside a week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub name: String,
    pub amount: f64,
    #[serde(flatten)]
    pub kind: OccurrenceKind,
    pub date: NaiveDate,
}

impl Occurrence {
    /// Amount with the cash-flow direction applied.
    pub fn signed_amount(&self) -> f64 {
        if self.kind.is_income() {
            self.amount
        } else {
            -self.amount
        }
    }
}

/// Per-week ledger emitted by the forecast builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub week_number: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub starting_balance: f64,
    pub inflow: f64,
    pub outflow: f64,
    pub net_change: f64,
    pub ending_balance: f64,
    pub items_due: Vec<Occurrence>,
}

impl WeekSummary {
    pub fn window(&self) -> WeekWindow {
        WeekWindow {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn is_deficit(&self) -> bool {
        self.net_change < 0.0
    }

    pub fn ends_negative(&self) -> bool {
        self.ending_balance < 0.0
    }

    /// Items ordered by due date; ties keep production order.
    pub fn items_by_date(&self) -> Vec<Occurrence> {
        let mut items = self.items_due.clone();
        items.sort_by_key(|item| item.date);
        items
    }
}
