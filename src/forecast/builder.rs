use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::recurrence::occurrence_in_week;
use crate::domain::{
    ItemKind, Occurrence, OccurrenceKind, RecurringItem, WeekSummary, WeekWindow,
};

/// Number of week windows produced by every forecast.
pub const FORECAST_WEEKS: u32 = 6;

/// Six consecutive week summaries projected from a reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub reference_date: NaiveDate,
    pub starting_balance: f64,
    pub weeks: Vec<WeekSummary>,
}

impl Forecast {
    pub fn week(&self, week_number: u32) -> Option<&WeekSummary> {
        self.weeks.iter().find(|week| week.week_number == week_number)
    }

    pub fn final_balance(&self) -> f64 {
        self.weeks
            .last()
            .map(|week| week.ending_balance)
            .unwrap_or(self.starting_balance)
    }

    pub fn negative_balance_weeks(&self) -> impl Iterator<Item = &WeekSummary> {
        self.weeks.iter().filter(|week| week.ends_negative())
    }

    pub fn deficit_weeks(&self) -> impl Iterator<Item = &WeekSummary> {
        self.weeks.iter().filter(|week| week.is_deficit())
    }

    pub fn total_inflow(&self) -> f64 {
        self.weeks.iter().map(|week| week.inflow).sum()
    }

    pub fn total_outflow(&self) -> f64 {
        self.weeks.iter().map(|week| week.outflow).sum()
    }
}

/// Projects `starting_balance` across [`FORECAST_WEEKS`] weeks beginning on
/// `reference_date`, placing each income and expense in the weeks it falls due.
///
/// The item slices are read only. Items with unusable amounts contribute zero
/// instead of failing the forecast.
pub fn build_forecast(
    starting_balance: f64,
    incomes: &[RecurringItem],
    expenses: &[RecurringItem],
    reference_date: NaiveDate,
) -> Forecast {
    let mut weeks = Vec::with_capacity(FORECAST_WEEKS as usize);
    let mut balance = starting_balance;

    for week_number in 1..=FORECAST_WEEKS {
        let window = WeekWindow::nth(reference_date, week_number);
        let mut items_due = Vec::new();

        let inflow = collect_due(incomes, ItemKind::Income, window, &mut items_due);
        let outflow = collect_due(expenses, ItemKind::Expense, window, &mut items_due);

        let net_change = inflow - outflow;
        let starting = balance;
        balance += net_change;

        weeks.push(WeekSummary {
            week_number,
            start_date: window.start,
            end_date: window.end,
            starting_balance: starting,
            inflow,
            outflow,
            net_change,
            ending_balance: balance,
            items_due,
        });
    }

    debug!(
        reference = %reference_date,
        incomes = incomes.len(),
        expenses = expenses.len(),
        final_balance = balance,
        "forecast built"
    );

    Forecast {
        reference_date,
        starting_balance,
        weeks,
    }
}

fn collect_due(
    items: &[RecurringItem],
    kind: ItemKind,
    window: WeekWindow,
    items_due: &mut Vec<Occurrence>,
) -> f64 {
    let mut total = 0.0;
    for item in items {
        let occurrence = occurrence_in_week(item.next_date, item.frequency, window);
        if !occurrence.is_due {
            continue;
        }
        let amount = item.effective_amount();
        if amount != item.amount {
            debug!(item = %item.id, raw = item.amount, "unusable amount counted as zero");
        }
        total += amount;
        items_due.push(Occurrence {
            name: item.display_name(kind),
            amount,
            kind: match kind {
                ItemKind::Income => OccurrenceKind::Income,
                ItemKind::Expense => OccurrenceKind::Expense {
                    essential: item.essential,
                },
            },
            date: occurrence.actual_date,
        });
    }
    total
}
