pub mod classifier;
pub mod normalizer;
pub mod record;

pub use classifier::{classify, ClosedTrade, ClosedTrades};
pub use normalizer::{apply_lookback, normalize, NormalizationCounts, NormalizedTrades};
pub use record::TradeRecord;
