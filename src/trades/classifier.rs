use crate::trades::record::TradeRecord;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

//a closing execution together with its economics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedTrade {
    #[serde(flatten)]
    pub record: TradeRecord,

    //capital base the realized pnl is measured against
    pub initial_capital: Decimal,

    //None when initial capital is zero or the ratio leaves Decimal range
    pub pct_return: Option<f64>,
}

impl ClosedTrade {
    //derives the economics of a closing execution
    pub fn from_record(record: TradeRecord) -> Self {
        //normalized records are bounded, saturation only guards hand-built ones
        let initial_capital = record.net_cash.saturating_sub(record.realized_pnl);
        let pct_return = pct_return(record.realized_pnl, initial_capital);

        ClosedTrade {
            record,
            initial_capital,
            pct_return,
        }
    }

    pub fn realized_pnl(&self) -> Decimal {
        self.record.realized_pnl
    }

    pub fn has_defined_return(&self) -> bool {
        self.pct_return.is_some()
    }
}

//realized pnl as a percentage of initial capital
pub fn pct_return(realized_pnl: Decimal, initial_capital: Decimal) -> Option<f64> {
    if initial_capital.is_zero() {
        return None;
    }

    realized_pnl
        .checked_div(initial_capital)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
}

//closed trades sorted by execution time, with the counts of what was left out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClosedTrades {
    pub trades: Vec<ClosedTrade>,
    //executions with zero realized pnl: opening or otherwise non-closing fills
    pub non_closing_excluded: usize,
    //closed trades kept for totals but left out of return means
    pub undefined_return_count: usize,
}

impl ClosedTrades {
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    //pct returns of the trades that have one
    pub fn defined_returns(&self) -> Vec<f64> {
        self.trades.iter().filter_map(|t| t.pct_return).collect()
    }
}

//selects closing executions and computes their return
//in typical broker data most executions are opening fills, so most rows end up excluded here
pub fn classify(records: &[TradeRecord]) -> ClosedTrades {
    let mut closed = ClosedTrades::default();

    for record in records {
        if !record.is_closing() {
            closed.non_closing_excluded += 1;
            continue;
        }

        let trade = ClosedTrade::from_record(record.clone());
        if !trade.has_defined_return() {
            let reason = if trade.initial_capital.is_zero() {
                "zero initial capital"
            } else {
                "return out of range"
            };
            tracing::warn!(
                order_id = %trade.record.order_id,
                execution_time = %trade.record.execution_time,
                reason,
                "closed trade return undefined, excluded from return averages"
            );
            closed.undefined_return_count += 1;
        }
        closed.trades.push(trade);
    }

    //stable sort keeps input order for simultaneous executions
    closed
        .trades
        .sort_by(|a, b| a.record.execution_time.cmp(&b.record.execution_time));

    tracing::info!(
        closed = closed.trades.len(),
        non_closing_excluded = closed.non_closing_excluded,
        undefined_return = closed.undefined_return_count,
        "classified closed trades"
    );

    closed
}
