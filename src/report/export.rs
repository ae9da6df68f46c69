use crate::metrics::WeeklyAggregate;
use crate::report::Report;
use crate::trades::ClosedTrade;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use prettytable::{Cell, Row, Table};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;

//flat csv row for a closed trade
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClosedTradeRow<'a> {
    order_id: &'a str,
    symbol: &'a str,
    strike: Decimal,
    quantity: i64,
    order_time: NaiveDateTime,
    execution_time: NaiveDateTime,
    net_cash: Decimal,
    commission: Decimal,
    realized_pnl: Decimal,
    initial_capital: Decimal,
    pct_return: Option<f64>,
}

impl<'a> From<&'a ClosedTrade> for ClosedTradeRow<'a> {
    fn from(trade: &'a ClosedTrade) -> Self {
        let rec = &trade.record;
        ClosedTradeRow {
            order_id: &rec.order_id,
            symbol: &rec.symbol,
            strike: rec.strike,
            quantity: rec.quantity,
            order_time: rec.order_time,
            execution_time: rec.execution_time,
            net_cash: rec.net_cash,
            commission: rec.commission,
            realized_pnl: rec.realized_pnl,
            initial_capital: trade.initial_capital,
            pct_return: trade.pct_return,
        }
    }
}

//writes the weekly table, one row per week ending
pub fn write_weekly_csv(weekly: &[WeeklyAggregate], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create weekly csv {:?}", path))?;

    for week in weekly {
        writer.serialize(week)?;
    }
    writer.flush()?;

    Ok(())
}

pub fn write_closed_trades_csv(trades: &[ClosedTrade], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create trades csv {:?}", path))?;

    for trade in trades {
        writer.serialize(ClosedTradeRow::from(trade))?;
    }
    writer.flush()?;

    Ok(())
}

pub fn write_json(report: &Report, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write report {:?}", path))?;
    Ok(())
}

fn metric_row(table: &mut Table, name: &str, value: String) {
    table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
}

fn pct_or_na(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}%", v))
        .unwrap_or_else(|| "n/a".to_string())
}

//summary metrics as a two-column table
pub fn summary_table(report: &Report) -> Table {
    let summary = report.summary();
    let diagnostics = report.diagnostics();
    let mut table = Table::new();

    table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

    metric_row(
        &mut table,
        "Period",
        format!(
            "{} - {} ({} days)",
            summary.period_start, summary.period_end, summary.business_days_in_period
        ),
    );
    metric_row(
        &mut table,
        "Total Trades",
        format!(
            "{} ({:.2}% positive)",
            summary.total_trades, summary.win_rate_pct
        ),
    );
    metric_row(
        &mut table,
        "Wins / Others",
        format!(
            "{} / {}",
            summary.positive_trade_count,
            summary.non_positive_trade_count()
        ),
    );
    metric_row(
        &mut table,
        "Total K Traded",
        format!("${:.2}", summary.total_capital_deployed),
    );
    metric_row(
        &mut table,
        "Avg Return/Trade",
        pct_or_na(summary.avg_return_per_trade),
    );
    metric_row(
        &mut table,
        "Net Income",
        format!("${:.2}", summary.net_realized_pnl),
    );
    metric_row(
        &mut table,
        "Total Fees Paid",
        format!("${:.2}", summary.total_fees_paid),
    );
    metric_row(
        &mut table,
        "Total Contracts",
        format!("{}", summary.total_contracts),
    );
    metric_row(
        &mut table,
        "Avg Fee/Contract",
        summary
            .avg_fee_per_contract
            .map(|fee| format!("${:.2}", fee))
            .unwrap_or_else(|| "n/a".to_string()),
    );
    metric_row(
        &mut table,
        "Rows Kept",
        format!(
            "{} of {} ({} no strike, {} rejected)",
            diagnostics.normalization.records_kept,
            diagnostics.normalization.rows_seen,
            diagnostics.normalization.rows_dropped_no_strike,
            diagnostics.normalization.rows_rejected
        ),
    );

    table
}

//weekly rollup, one row per week
pub fn weekly_table(report: &Report) -> Table {
    let mut table = Table::new();

    table.add_row(Row::new(vec![
        Cell::new("Week Ended"),
        Cell::new("Trades"),
        Cell::new("P&L"),
        Cell::new("Avg Return"),
        Cell::new("Capital"),
    ]));

    for week in report.weekly() {
        table.add_row(Row::new(vec![
            Cell::new(&week.week_ending.to_string()),
            Cell::new(&week.num_trades.to_string()),
            Cell::new(&format!("${:.2}", week.pnl_realized)),
            Cell::new(&pct_or_na(week.avg_return)),
            Cell::new(&format!("${:.2}", week.capital_deployed)),
        ]));
    }

    table
}

//prints the report in formatted tables
pub fn pretty_print_table(report: &Report) {
    summary_table(report).printstd();
    println!();
    weekly_table(report).printstd();
}
