//! Week tracking for a running forecast cycle.

use chrono::{Duration, NaiveDate};

use super::builder::{Forecast, FORECAST_WEEKS};
use crate::domain::week::DAYS_PER_WEEK;

/// Returns the 1-based week of the cycle that `today` falls in, clamped to the horizon.
pub fn current_week_number(forecast_start: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - forecast_start).num_days();
    let week = days.div_euclid(DAYS_PER_WEEK) + 1;
    week.clamp(1, FORECAST_WEEKS as i64) as u32
}

/// Outcome of closing out the current week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleAdvance {
    /// The cycle moved on by one week.
    NextWeek {
        completed_week: u32,
        balance: f64,
        forecast_start: NaiveDate,
    },
    /// The last week was closed; a fresh cycle starts today.
    NewCycle {
        balance: f64,
        forecast_start: NaiveDate,
    },
}

impl CycleAdvance {
    pub fn balance(&self) -> f64 {
        match self {
            CycleAdvance::NextWeek { balance, .. } | CycleAdvance::NewCycle { balance, .. } => {
                *balance
            }
        }
    }

    pub fn forecast_start(&self) -> NaiveDate {
        match self {
            CycleAdvance::NextWeek { forecast_start, .. }
            | CycleAdvance::NewCycle { forecast_start, .. } => *forecast_start,
        }
    }
}

/// Computes the new balance and start date after completing the current week.
///
/// Returns `None` only when the forecast has no week for the current position.
pub fn advance(forecast: &Forecast, today: NaiveDate) -> Option<CycleAdvance> {
    let current = current_week_number(forecast.reference_date, today);
    if current >= FORECAST_WEEKS {
        let last = forecast.week(FORECAST_WEEKS)?;
        return Some(CycleAdvance::NewCycle {
            balance: last.ending_balance,
            forecast_start: today,
        });
    }
    let week = forecast.week(current)?;
    Some(CycleAdvance::NextWeek {
        completed_week: current,
        balance: week.ending_balance,
        forecast_start: week.end_date + Duration::days(1),
    })
}
