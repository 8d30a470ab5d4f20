//! Profiles hold the mutable state the forecast engine reads from.

pub mod book;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{ItemKind, RecurringItem};
use crate::errors::{CashflowError, Result};
use crate::forecast::{
    build_forecast, cycle, ActionPlan, CycleAdvance, Forecast, MonthlySummary,
};
use crate::import::{ImportMode, ImportedItems};

pub use book::{ProfileBook, DEFAULT_PROFILE_NAME};

pub const MAX_SAVINGS_PERCENT: u8 = 100;

/// One named set of incomes, expenses and balance settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub incomes: Vec<RecurringItem>,
    #[serde(default)]
    pub expenses: Vec<RecurringItem>,
    #[serde(default)]
    pub current_balance: f64,
    #[serde(default)]
    pub savings_percent: u8,
    pub forecast_start_date: NaiveDate,
}

impl Profile {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            incomes: Vec::new(),
            expenses: Vec::new(),
            current_balance: 0.0,
            savings_percent: 0,
            forecast_start_date: today,
        }
    }

    pub fn items(&self, kind: ItemKind) -> &[RecurringItem] {
        match kind {
            ItemKind::Income => &self.incomes,
            ItemKind::Expense => &self.expenses,
        }
    }

    fn items_mut(&mut self, kind: ItemKind) -> &mut Vec<RecurringItem> {
        match kind {
            ItemKind::Income => &mut self.incomes,
            ItemKind::Expense => &mut self.expenses,
        }
    }

    pub fn add_item(&mut self, kind: ItemKind, item: RecurringItem) -> Uuid {
        let id = item.id;
        debug!(%kind, %id, name = %item.name, "adding item");
        self.items_mut(kind).push(item);
        id
    }

    pub fn remove_item(&mut self, kind: ItemKind, id: Uuid) -> Result<RecurringItem> {
        let items = self.items_mut(kind);
        let index = items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CashflowError::ItemNotFound(id))?;
        Ok(items.remove(index))
    }

    /// Applies `edit` to the item with `id`, re-clamping its amount afterwards.
    pub fn update_item<F>(&mut self, kind: ItemKind, id: Uuid, edit: F) -> Result<()>
    where
        F: FnOnce(&mut RecurringItem),
    {
        let item = self
            .items_mut(kind)
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(CashflowError::ItemNotFound(id))?;
        edit(item);
        item.id = id;
        item.amount = item.effective_amount();
        Ok(())
    }

    pub fn set_savings_percent(&mut self, percent: u8) {
        self.savings_percent = percent.min(MAX_SAVINGS_PERCENT);
    }

    pub fn forecast(&self) -> Forecast {
        build_forecast(
            self.current_balance,
            &self.incomes,
            &self.expenses,
            self.forecast_start_date,
        )
    }

    pub fn monthly_summary(&self) -> MonthlySummary {
        MonthlySummary::from_items(&self.incomes, &self.expenses, self.savings_percent)
    }

    pub fn action_plan(&self) -> ActionPlan {
        ActionPlan::build(
            &self.incomes,
            &self.expenses,
            self.current_balance,
            self.savings_percent,
            &self.forecast(),
        )
    }

    pub fn current_week(&self, today: NaiveDate) -> u32 {
        cycle::current_week_number(self.forecast_start_date, today)
    }

    /// Closes out the week `today` falls in, carrying its ending balance forward.
    pub fn advance_week(&mut self, today: NaiveDate) -> CycleAdvance {
        let outcome = cycle::advance(&self.forecast(), today).unwrap_or(CycleAdvance::NewCycle {
            balance: self.current_balance,
            forecast_start: today,
        });
        self.current_balance = outcome.balance();
        self.forecast_start_date = outcome.forecast_start();
        info!(
            balance = self.current_balance,
            start = %self.forecast_start_date,
            "advanced forecast cycle"
        );
        outcome
    }

    /// Restarts the cycle today without touching the balance.
    pub fn reset_cycle(&mut self, today: NaiveDate) {
        self.forecast_start_date = today;
        info!(start = %today, "reset forecast cycle");
    }

    /// Wipes items, balance and savings target, and starts a new cycle today.
    pub fn clear(&mut self, today: NaiveDate) {
        *self = Self::new(today);
        info!(start = %today, "cleared profile data");
    }

    pub fn apply_import(&mut self, items: ImportedItems, mode: ImportMode) {
        info!(
            incomes = items.incomes.len(),
            expenses = items.expenses.len(),
            ?mode,
            "applying import"
        );
        if mode == ImportMode::Replace {
            self.incomes.clear();
            self.expenses.clear();
        }
        self.incomes.extend(items.incomes);
        self.expenses.extend(items.expenses);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Frequency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(name: &str, amount: f64, frequency: Frequency) -> RecurringItem {
        RecurringItem::new(name, amount, frequency, date(2025, 1, 1))
    }

    #[test]
    fn add_update_remove_items() {
        let mut profile = Profile::new(date(2025, 1, 1));
        let id = profile.add_item(ItemKind::Expense, item("Gym", 30.0, Frequency::Monthly));
        assert_eq!(profile.items(ItemKind::Expense).len(), 1);
        assert!(profile.items(ItemKind::Income).is_empty());

        profile
            .update_item(ItemKind::Expense, id, |item| {
                item.amount = -12.0;
                item.essential = true;
            })
            .unwrap();
        let stored = &profile.expenses[0];
        assert_eq!(stored.amount, 0.0);
        assert!(stored.essential);

        let removed = profile.remove_item(ItemKind::Expense, id).unwrap();
        assert_eq!(removed.id, id);
        assert!(matches!(
            profile.remove_item(ItemKind::Expense, id),
            Err(CashflowError::ItemNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn removing_from_wrong_side_fails() {
        let mut profile = Profile::new(date(2025, 1, 1));
        let id = profile.add_item(ItemKind::Income, item("Pay", 10.0, Frequency::Weekly));
        assert!(profile.remove_item(ItemKind::Expense, id).is_err());
    }

    #[test]
    fn savings_percent_is_clamped() {
        let mut profile = Profile::new(date(2025, 1, 1));
        profile.set_savings_percent(140);
        assert_eq!(profile.savings_percent, 100);
        profile.set_savings_percent(20);
        assert_eq!(profile.savings_percent, 20);
    }

    #[test]
    fn forecast_starts_from_profile_state() {
        let mut profile = Profile::new(date(2025, 1, 1));
        profile.current_balance = 250.0;
        profile.add_item(ItemKind::Income, item("Pay", 100.0, Frequency::Weekly));
        let forecast = profile.forecast();
        assert_eq!(forecast.reference_date, date(2025, 1, 1));
        assert_eq!(forecast.weeks[0].starting_balance, 250.0);
        assert_eq!(forecast.final_balance(), 850.0);
    }

    #[test]
    fn advance_and_reset_move_the_cycle() {
        let mut profile = Profile::new(date(2025, 1, 1));
        profile.add_item(ItemKind::Income, item("Pay", 100.0, Frequency::Weekly));

        let outcome = profile.advance_week(date(2025, 1, 3));
        assert!(matches!(outcome, CycleAdvance::NextWeek { completed_week: 1, .. }));
        assert_eq!(profile.current_balance, 100.0);
        assert_eq!(profile.forecast_start_date, date(2025, 1, 8));

        profile.reset_cycle(date(2025, 1, 20));
        assert_eq!(profile.forecast_start_date, date(2025, 1, 20));
        assert_eq!(profile.current_balance, 100.0);
        assert_eq!(profile.current_week(date(2025, 1, 28)), 2);
    }

    #[test]
    fn clear_wipes_everything_and_restarts_cycle() {
        let mut profile = Profile::new(date(2025, 1, 1));
        profile.current_balance = 820.0;
        profile.set_savings_percent(25);
        profile.add_item(ItemKind::Income, item("Pay", 10.0, Frequency::Weekly));
        profile.add_item(ItemKind::Expense, item("Rent", 500.0, Frequency::Monthly));

        profile.clear(date(2025, 3, 9));
        assert!(profile.incomes.is_empty());
        assert!(profile.expenses.is_empty());
        assert_eq!(profile.current_balance, 0.0);
        assert_eq!(profile.savings_percent, 0);
        assert_eq!(profile.forecast_start_date, date(2025, 3, 9));
    }

    #[test]
    fn import_modes_replace_or_append() {
        let mut profile = Profile::new(date(2025, 1, 1));
        profile.add_item(ItemKind::Expense, item("Old", 5.0, Frequency::Monthly));

        let batch = ImportedItems {
            incomes: vec![item("Pay", 10.0, Frequency::Weekly)],
            expenses: vec![item("New", 7.0, Frequency::Monthly)],
        };
        profile.apply_import(batch.clone(), ImportMode::Append);
        assert_eq!(profile.expenses.len(), 2);

        profile.apply_import(batch, ImportMode::Replace);
        assert_eq!(profile.expenses.len(), 1);
        assert_eq!(profile.expenses[0].name, "New");
        assert_eq!(profile.incomes.len(), 1);
    }
}
