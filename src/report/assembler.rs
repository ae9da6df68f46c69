use crate::error::ReportError;
use crate::metrics::{ReturnHistogram, SummaryStats, WeeklyAggregate};
use crate::trades::{ClosedTrade, ClosedTrades, NormalizationCounts};
use serde::{Serialize, Serializer};

//what each pipeline stage filtered out, so nothing disappears silently
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    #[serde(flatten)]
    pub normalization: NormalizationCounts,

    #[serde(serialize_with = "errors_as_strings")]
    pub rejected_rows: Vec<ReportError>,

    //executions with zero realized pnl
    pub non_closing_excluded: usize,

    //closed trades left out of return averages
    pub undefined_return_count: usize,

    #[serde(serialize_with = "errors_as_strings")]
    pub undefined_metrics: Vec<ReportError>,
}

fn errors_as_strings<S: Serializer>(
    errors: &[ReportError],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}

//the finished report handed to renderers and plotters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    summary: SummaryStats,
    weekly: Vec<WeeklyAggregate>,
    closed_trades: Vec<ClosedTrade>,
    return_distribution: ReturnHistogram,
    diagnostics: Diagnostics,
}

impl Report {
    //combines finished pipeline outputs, no calculation happens here
    pub fn assemble(
        summary: SummaryStats,
        weekly: Vec<WeeklyAggregate>,
        closed: ClosedTrades,
        return_distribution: ReturnHistogram,
        normalization: NormalizationCounts,
        rejected_rows: Vec<ReportError>,
    ) -> Self {
        let diagnostics = Diagnostics {
            normalization,
            rejected_rows,
            non_closing_excluded: closed.non_closing_excluded,
            undefined_return_count: closed.undefined_return_count,
            undefined_metrics: summary.undefined_metrics(),
        };

        Report {
            summary,
            weekly,
            closed_trades: closed.trades,
            return_distribution,
            diagnostics,
        }
    }

    pub fn summary(&self) -> &SummaryStats {
        &self.summary
    }

    //ascending by week ending
    pub fn weekly(&self) -> &[WeeklyAggregate] {
        &self.weekly
    }

    //ascending by execution time
    pub fn closed_trades(&self) -> &[ClosedTrade] {
        &self.closed_trades
    }

    pub fn return_distribution(&self) -> &ReturnHistogram {
        &self.return_distribution
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}
