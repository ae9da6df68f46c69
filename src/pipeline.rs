use crate::config::ReportConfig;
use crate::data::RawTradeRow;
use crate::error::Result;
use crate::metrics::{aggregate_weekly, ReturnHistogram, SummaryStats};
use crate::report::Report;
use crate::trades::{apply_lookback, classify, normalize};

//runs raw trade rows through every stage and assembles the report
//holds only its configuration, so one pipeline can be reused across runs
#[derive(Debug, Clone, Default)]
pub struct ReportPipeline {
    config: ReportConfig,
}

impl ReportPipeline {
    pub fn new(config: ReportConfig) -> Self {
        ReportPipeline { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    //row-level problems end up in the report diagnostics
    //an empty closed-trade set aborts with EmptyDataset
    pub fn run(&self, rows: &[RawTradeRow]) -> Result<Report> {
        let mut normalized = normalize(rows);
        if let Some(days) = self.config.lookback_days {
            normalized = apply_lookback(normalized, days);
        }

        let closed = classify(&normalized.records);

        let summary = SummaryStats::calculate(&normalized.records, &closed.trades, &self.config)?;
        let weekly = aggregate_weekly(&closed.trades, &self.config);
        let distribution =
            ReturnHistogram::from_returns(&closed.defined_returns(), self.config.histogram_bins);

        let counts = normalized.counts();
        let report = Report::assemble(
            summary,
            weekly,
            closed,
            distribution,
            counts,
            normalized.rejected,
        );

        tracing::info!(
            closed_trades = report.closed_trades().len(),
            weeks = report.weekly().len(),
            "report assembled"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;

    #[test]
    fn empty_input_is_empty_dataset() {
        let err = ReportPipeline::default().run(&[]).unwrap_err();
        assert!(matches!(err, ReportError::EmptyDataset(_)));
    }

    #[test]
    fn only_opening_fills_is_empty_dataset() {
        let rows = vec![RawTradeRow::new()
            .with("symbol", "QQQ")
            .with("strike", "400")
            .with("quantity", "1")
            .with("orderTime", "20240102;100000")
            .with("dateTime", "20240102;100001")
            .with("netCash", "-250")
            .with("ibCommission", "-1")
            .with("fifoPnlRealized", "0")];

        let err = ReportPipeline::default().run(&rows).unwrap_err();
        assert!(matches!(err, ReportError::EmptyDataset(_)));
    }

    #[test]
    fn huge_lookback_keeps_every_trade() {
        let rows = vec![RawTradeRow::new()
            .with("symbol", "QQQ")
            .with("strike", "400")
            .with("quantity", "-1")
            .with("orderTime", "20240102;100000")
            .with("dateTime", "20240102;100001")
            .with("netCash", "300")
            .with("ibCommission", "-1")
            .with("fifoPnlRealized", "50")];

        let pipeline = ReportPipeline::new(ReportConfig {
            lookback_days: Some(200_000_000),
            ..Default::default()
        });
        assert_eq!(pipeline.config().lookback_days, Some(200_000_000));

        let report = pipeline.run(&rows).unwrap();
        assert_eq!(report.closed_trades().len(), 1);
    }
}
