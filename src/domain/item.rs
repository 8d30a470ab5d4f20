use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const WEEKS_PER_MONTH: f64 = 4.33;
const BIWEEKLY_PERIODS_PER_MONTH: f64 = 2.17;
const BIWEEKLY_SPACING_DAYS: i64 = 14;

/// Enumerates the supported recurrence cadences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    #[default]
    Monthly,
}

impl Frequency {
    /// Resolves a canonical stored value; anything unrecognized is monthly.
    pub fn from_stored(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Frequency::Weekly,
            "biweekly" => Frequency::Biweekly,
            _ => Frequency::Monthly,
        }
    }

    /// Multiplier converting one occurrence into an average monthly figure.
    pub fn monthly_factor(self) -> f64 {
        match self {
            Frequency::Weekly => WEEKS_PER_MONTH,
            Frequency::Biweekly => BIWEEKLY_PERIODS_PER_MONTH,
            Frequency::Monthly => 1.0,
        }
    }

    /// Returns whether an item anchored on `anchor` has an occurrence on `day`.
    pub fn occurs_on(self, anchor: NaiveDate, day: NaiveDate) -> bool {
        match self {
            Frequency::Weekly => day.weekday() == anchor.weekday(),
            Frequency::Biweekly => {
                day >= anchor && (day - anchor).num_days() % BIWEEKLY_SPACING_DAYS == 0
            }
            Frequency::Monthly => day.day() == anchor.day() && day >= anchor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Biweekly",
            Frequency::Monthly => "Monthly",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which side of the cash flow an item sits on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Income,
    Expense,
}

impl ItemKind {
    pub fn unnamed_label(self) -> &'static str {
        match self {
            ItemKind::Income => "Unnamed Income",
            ItemKind::Expense => "Unnamed Expense",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Income => f.write_str("income"),
            ItemKind::Expense => f.write_str("expense"),
        }
    }
}

/// A recurring income or expense source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringItem {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub frequency: Frequency,
    pub next_date: NaiveDate,
    #[serde(default, rename = "isEssential")]
    pub essential: bool,
}

impl RecurringItem {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        frequency: Frequency,
        next_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount: sanitize_amount(amount),
            frequency,
            next_date,
            essential: false,
        }
    }

    /// A blank item as created by an "add row" action: monthly, due today.
    pub fn blank(today: NaiveDate) -> Self {
        Self::new("", 0.0, Frequency::Monthly, today)
    }

    pub fn with_essential(mut self, essential: bool) -> Self {
        self.essential = essential;
        self
    }

    /// Amount as used by forecast math: never negative, never NaN.
    pub fn effective_amount(&self) -> f64 {
        sanitize_amount(self.amount)
    }

    pub fn display_name(&self, kind: ItemKind) -> String {
        if self.name.trim().is_empty() {
            kind.unnamed_label().to_string()
        } else {
            self.name.clone()
        }
    }

    /// A row counts as complete once it has a name and a positive amount.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && self.effective_amount() > 0.0
    }

    pub fn monthly_equivalent(&self) -> f64 {
        monthly_equivalent(self.amount, self.frequency)
    }

    /// First occurrence on or after `from`, if one exists within a year.
    pub fn next_occurrence_from(&self, from: NaiveDate) -> Option<NaiveDate> {
        (0..=366)
            .map(|offset| from + Duration::days(offset))
            .find(|day| self.frequency.occurs_on(self.next_date, *day))
    }
}

/// Clamps an amount into the non-negative, finite range.
pub fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Expresses a recurring amount as an average monthly figure.
pub fn monthly_equivalent(amount: f64, frequency: Frequency) -> f64 {
    let amount = sanitize_amount(amount);
    if amount == 0.0 {
        return 0.0;
    }
    amount * frequency.monthly_factor()
}
