pub mod distribution;
pub mod summary;
pub mod weekly;

pub use distribution::{HistogramBin, ReturnHistogram};
pub use summary::SummaryStats;
pub use weekly::{aggregate_weekly, week_ending, WeeklyAggregate};
