//a Rust-based performance report for brokerage options trade executions

pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod trades;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{BucketField, ReportConfig};
    pub use crate::data::{load_csv, RawTradeRow};
    pub use crate::error::ReportError;
    pub use crate::metrics::{
        aggregate_weekly, week_ending, HistogramBin, ReturnHistogram, SummaryStats,
        WeeklyAggregate,
    };
    pub use crate::pipeline::ReportPipeline;
    pub use crate::report::{
        pretty_print_table, write_closed_trades_csv, write_json, write_weekly_csv, Diagnostics,
        Report,
    };
    pub use crate::trades::{
        apply_lookback, classify, normalize, ClosedTrade, ClosedTrades, NormalizedTrades,
        TradeRecord,
    };
}
