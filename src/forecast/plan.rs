use serde::{Deserialize, Serialize};

use super::{builder::Forecast, summary::MonthlySummary};
use crate::domain::{Frequency, ItemKind, RecurringItem};

const EMERGENCY_FUND_MONTHS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Positive monthly cash flow and a non-negative balance.
    Healthy,
    /// Monthly expenses exceed monthly income.
    Deficit,
    /// Positive cash flow but the balance is already below zero.
    Unclassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    ReduceNonEssential,
    MaintainCashFlow,
    BuildEmergencyFund,
    ConsiderInvesting,
}

impl Recommendation {
    pub fn message(self) -> &'static str {
        match self {
            Recommendation::ReduceNonEssential => "Focus on reducing non-essential expenses first",
            Recommendation::MaintainCashFlow => "Continue maintaining positive cash flow",
            Recommendation::BuildEmergencyFund => {
                "Build an emergency fund of 3-6 months expenses"
            }
            Recommendation::ConsiderInvesting => {
                "Consider investment opportunities for surplus funds"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegativeWeek {
    pub week_number: u32,
    pub ending_balance: f64,
}

/// One line of the income/expense breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub name: String,
    pub amount: f64,
    pub frequency: Frequency,
    pub monthly_equivalent: f64,
}

impl BreakdownLine {
    fn from_item(item: &RecurringItem, kind: ItemKind) -> Self {
        Self {
            name: item.display_name(kind),
            amount: item.effective_amount(),
            frequency: item.frequency,
            monthly_equivalent: item.monthly_equivalent(),
        }
    }

    /// Only non-monthly items carry a distinct monthly figure worth showing.
    pub fn shows_monthly_equivalent(&self) -> bool {
        self.frequency != Frequency::Monthly
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub health: HealthStatus,
    pub summary: MonthlySummary,
    pub negative_weeks: Vec<NegativeWeek>,
    pub incomes: Vec<BreakdownLine>,
    pub essential_expenses: Vec<BreakdownLine>,
    pub non_essential_expenses: Vec<BreakdownLine>,
    pub recommendations: Vec<Recommendation>,
}

impl ActionPlan {
    pub fn build(
        incomes: &[RecurringItem],
        expenses: &[RecurringItem],
        current_balance: f64,
        savings_percent: u8,
        forecast: &Forecast,
    ) -> Self {
        let summary = MonthlySummary::from_items(incomes, expenses, savings_percent);

        let health = if summary.net_monthly >= 0.0 && current_balance >= 0.0 {
            HealthStatus::Healthy
        } else if summary.net_monthly < 0.0 {
            HealthStatus::Deficit
        } else {
            HealthStatus::Unclassified
        };

        let negative_weeks = forecast
            .negative_balance_weeks()
            .map(|week| NegativeWeek {
                week_number: week.week_number,
                ending_balance: week.ending_balance,
            })
            .collect();

        let mut recommendations = Vec::with_capacity(2);
        recommendations.push(if summary.net_monthly < 0.0 {
            Recommendation::ReduceNonEssential
        } else {
            Recommendation::MaintainCashFlow
        });
        recommendations.push(
            if current_balance < summary.total_expenses * EMERGENCY_FUND_MONTHS {
                Recommendation::BuildEmergencyFund
            } else {
                Recommendation::ConsiderInvesting
            },
        );

        Self {
            health,
            negative_weeks,
            incomes: breakdown(incomes.iter(), ItemKind::Income),
            essential_expenses: breakdown(
                expenses.iter().filter(|item| item.essential),
                ItemKind::Expense,
            ),
            non_essential_expenses: breakdown(
                expenses.iter().filter(|item| !item.essential),
                ItemKind::Expense,
            ),
            recommendations,
            summary,
        }
    }
}

fn breakdown<'a>(
    items: impl Iterator<Item = &'a RecurringItem>,
    kind: ItemKind,
) -> Vec<BreakdownLine> {
    items
        .map(|item| BreakdownLine::from_item(item, kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::build_forecast;
    use chrono::NaiveDate;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn deficit_plan_flags_negative_weeks() {
        let expenses = vec![RecurringItem::new("Rent", 500.0, Frequency::Weekly, anchor())];
        let forecast = build_forecast(600.0, &[], &expenses, anchor());
        let plan = ActionPlan::build(&[], &expenses, 600.0, 0, &forecast);

        assert_eq!(plan.health, HealthStatus::Deficit);
        assert_eq!(plan.negative_weeks.len(), 5);
        assert_eq!(plan.negative_weeks[0].week_number, 2);
        assert_eq!(plan.negative_weeks[0].ending_balance, -400.0);
        assert_eq!(
            plan.recommendations,
            vec![
                Recommendation::ReduceNonEssential,
                Recommendation::BuildEmergencyFund
            ]
        );
        assert_eq!(plan.non_essential_expenses.len(), 1);
        assert!(plan.non_essential_expenses[0].shows_monthly_equivalent());
    }

    #[test]
    fn healthy_plan_with_large_reserve_suggests_investing() {
        let incomes = vec![RecurringItem::new("Pay", 3000.0, Frequency::Monthly, anchor())];
        let expenses = vec![
            RecurringItem::new("Rent", 1000.0, Frequency::Monthly, anchor()).with_essential(true),
        ];
        let forecast = build_forecast(10_000.0, &incomes, &expenses, anchor());
        let plan = ActionPlan::build(&incomes, &expenses, 10_000.0, 0, &forecast);

        assert_eq!(plan.health, HealthStatus::Healthy);
        assert!(plan.negative_weeks.is_empty());
        assert_eq!(plan.essential_expenses.len(), 1);
        assert_eq!(
            plan.recommendations,
            vec![
                Recommendation::MaintainCashFlow,
                Recommendation::ConsiderInvesting
            ]
        );
    }
}
