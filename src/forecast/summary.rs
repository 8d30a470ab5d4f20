//! Monthly roll-ups built from monthly-equivalent amounts.

use serde::{Deserialize, Serialize};

use crate::domain::RecurringItem;

/// Average-month view of a set of recurring items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_monthly: f64,
    pub savings_percent: u8,
    pub savings_amount: f64,
    pub net_after_savings: f64,
    pub essential_total: f64,
    pub non_essential_total: f64,
}

impl MonthlySummary {
    pub fn from_items(
        incomes: &[RecurringItem],
        expenses: &[RecurringItem],
        savings_percent: u8,
    ) -> Self {
        let total_income = monthly_total(incomes.iter());
        let total_expenses = monthly_total(expenses.iter());
        let essential_total = monthly_total(expenses.iter().filter(|item| item.essential));
        let non_essential_total = monthly_total(expenses.iter().filter(|item| !item.essential));
        let net_monthly = total_income - total_expenses;
        let savings_amount = if net_monthly > 0.0 {
            net_monthly * f64::from(savings_percent) / 100.0
        } else {
            0.0
        };

        Self {
            total_income,
            total_expenses,
            net_monthly,
            savings_percent,
            savings_amount,
            net_after_savings: net_monthly - savings_amount,
            essential_total,
            non_essential_total,
        }
    }

    pub fn has_savings_target(&self) -> bool {
        self.savings_percent > 0
    }
}

fn monthly_total<'a>(items: impl Iterator<Item = &'a RecurringItem>) -> f64 {
    items.map(RecurringItem::monthly_equivalent).sum()
}
