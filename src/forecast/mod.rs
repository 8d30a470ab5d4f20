//! Forecast engine: recurrence evaluation, the six-week builder and the
//! reporting helpers layered on top of it.

pub mod builder;
pub mod cycle;
pub mod plan;
pub mod recurrence;
pub mod summary;

pub use builder::{build_forecast, Forecast, FORECAST_WEEKS};
pub use cycle::{current_week_number, CycleAdvance};
pub use plan::{ActionPlan, BreakdownLine, HealthStatus, NegativeWeek, Recommendation};
pub use recurrence::{occurrence_in_week, WeekOccurrence};
pub use summary::MonthlySummary;
