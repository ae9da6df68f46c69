use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::metrics::weekly::{average_return, total};
use crate::trades::{ClosedTrade, TradeRecord};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const AVG_RETURN_PER_TRADE: &str = "avgReturnPerTrade";
pub const AVG_FEE_PER_CONTRACT: &str = "avgFeePerContract";

//whole-period metrics for a report run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    //span of order dates over all normalized records
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub business_days_in_period: i64,

    //closed-trade metrics
    pub total_trades: usize,
    pub positive_trade_count: usize,
    pub win_rate_pct: Decimal,
    pub total_capital_deployed: Decimal,
    pub avg_return_per_trade: Option<f64>,
    pub net_realized_pnl: Decimal,

    //fee metrics over every normalized execution
    pub total_fees_paid: Decimal,
    pub total_contracts: u64,
    pub avg_fee_per_contract: Option<Decimal>,
}

impl SummaryStats {
    //calculate summary stats from the normalized records and their closed subset
    pub fn calculate(
        records: &[TradeRecord],
        closed: &[ClosedTrade],
        config: &ReportConfig,
    ) -> Result<Self> {
        if closed.is_empty() {
            return Err(ReportError::EmptyDataset(format!(
                "no closed trades among {} normalized records",
                records.len()
            )));
        }

        //closed trades always come from the records, fall back to them if none were passed
        let order_dates = records
            .iter()
            .map(TradeRecord::order_date)
            .chain(closed.iter().map(|t| t.record.order_date()));
        let (period_start, period_end) = order_dates.fold(
            (NaiveDate::MAX, NaiveDate::MIN),
            |(start, end), date| (start.min(date), end.max(date)),
        );

        let total_trades = closed.len();
        let positive_trade_count = closed
            .iter()
            .filter(|t| t.realized_pnl() > config.positive_threshold)
            .count();
        let win_rate_pct = Decimal::from(positive_trade_count) / Decimal::from(total_trades)
            * Decimal::ONE_HUNDRED;

        let total_capital_deployed = total(closed.iter().map(|t| t.initial_capital));
        let net_realized_pnl = total(closed.iter().map(|t| t.realized_pnl()));
        let avg_return_per_trade = average_return(closed);

        let total_fees_paid = total(records.iter().map(|r| r.commission.abs()));
        let total_contracts = records
            .iter()
            .map(TradeRecord::contracts)
            .fold(0u64, u64::saturating_add);
        let avg_fee_per_contract = if total_contracts == 0 {
            None
        } else {
            Some(total_fees_paid / Decimal::from(total_contracts))
        };

        let stats = SummaryStats {
            period_start,
            period_end,
            business_days_in_period: business_days_between(period_start, period_end),
            total_trades,
            positive_trade_count,
            win_rate_pct,
            total_capital_deployed,
            avg_return_per_trade,
            net_realized_pnl,
            total_fees_paid,
            total_contracts,
            avg_fee_per_contract,
        };

        for err in stats.undefined_metrics() {
            tracing::warn!(%err, "metric left out of summary");
        }

        Ok(stats)
    }

    pub fn avg_return_per_trade(&self) -> Result<f64> {
        self.avg_return_per_trade.ok_or_else(|| {
            ReportError::undefined(
                AVG_RETURN_PER_TRADE,
                "no closed trade has a defined return",
            )
        })
    }

    pub fn avg_fee_per_contract(&self) -> Result<Decimal> {
        self.avg_fee_per_contract.ok_or_else(|| {
            ReportError::undefined(AVG_FEE_PER_CONTRACT, "no contracts were traded")
        })
    }

    //every metric that is absent for this dataset, with the reason
    pub fn undefined_metrics(&self) -> Vec<ReportError> {
        let mut undefined = Vec::new();
        if let Err(err) = self.avg_return_per_trade() {
            undefined.push(err);
        }
        if let Err(err) = self.avg_fee_per_contract() {
            undefined.push(err);
        }
        undefined
    }

    //closed trades that were neither wins nor above the threshold
    pub fn non_positive_trade_count(&self) -> usize {
        self.total_trades - self.positive_trade_count
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

//counts monday-friday dates in [start, end), no holiday calendar
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        return -business_days_between(end, start);
    }

    let total_days = (end - start).num_days();
    let full_weeks = total_days / 7;
    let mut count = full_weeks * 5;

    //walk the leftover partial week
    let mut day = start + Duration::days(full_weeks * 7);
    while day < end {
        if !is_weekend(day) {
            count += 1;
        }
        day += Duration::days(1);
    }

    count
}
