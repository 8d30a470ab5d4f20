#![doc(test(attr(deny(warnings))))]

//! Cashflow Core projects recurring incomes and expenses across a six-week
//! horizon, and carries the profile, import and reporting plumbing that the
//! `cashflow_core_cli` binary is built on.
//!
//! ```
//! use chrono::NaiveDate;
//! use cashflow_core::domain::{Frequency, RecurringItem};
//! use cashflow_core::forecast::build_forecast;
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let pay = RecurringItem::new("Pay", 500.0, Frequency::Weekly, start);
//! let forecast = build_forecast(1000.0, &[pay], &[], start);
//! assert_eq!(forecast.final_balance(), 4000.0);
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod forecast;
pub mod import;
pub mod profile;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Cashflow Core tracing initialized.");
    });
}
