use crate::data::RawTradeRow;
use crate::error::{ReportError, Result};
use crate::trades::record::TradeRecord;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

//field names, with the flex-query spellings accepted as aliases
const ORDER_ID: &[&str] = &["orderId", "ibOrderID"];
const SYMBOL: &[&str] = &["symbol"];
const STRIKE: &[&str] = &["strike"];
const QUANTITY: &[&str] = &["quantity"];
const ORDER_TIME: &[&str] = &["orderTime"];
const EXECUTION_TIME: &[&str] = &["executionTime", "dateTime"];
const NET_CASH: &[&str] = &["netCash"];
const COMMISSION: &[&str] = &["commission", "ibCommission"];
const REALIZED_PNL: &[&str] = &["realizedPnl", "fifoPnlRealized"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y%m%d;%H%M%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d, %H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

//largest cash amount (1e15) accepted on a single execution
//keeps every derived difference and report-wide sum well inside Decimal range
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);
pub const MAX_QUANTITY: i64 = 1_000_000_000;

//output of the normalizer: typed records plus what was filtered and why
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTrades {
    pub records: Vec<TradeRecord>,
    pub rows_seen: usize,
    //rows without a strike (stock, cash or incomplete rows)
    pub dropped_no_strike: usize,
    //rows that could not be coerced, one MalformedRecord per row
    pub rejected: Vec<ReportError>,
    //rows removed by a lookback window, zero when none was applied
    pub outside_lookback: usize,
}

//summary counts of the normalization step, used in report diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationCounts {
    pub rows_seen: usize,
    pub rows_dropped_no_strike: usize,
    pub rows_rejected: usize,
    pub rows_outside_lookback: usize,
    pub records_kept: usize,
}

impl NormalizedTrades {
    pub fn counts(&self) -> NormalizationCounts {
        NormalizationCounts {
            rows_seen: self.rows_seen,
            rows_dropped_no_strike: self.dropped_no_strike,
            rows_rejected: self.rejected.len(),
            rows_outside_lookback: self.outside_lookback,
            records_kept: self.records.len(),
        }
    }
}

//normalizes raw rows into trade records
//row-level failures are collected, never fatal to the batch
pub fn normalize(rows: &[RawTradeRow]) -> NormalizedTrades {
    let mut result = NormalizedTrades {
        rows_seen: rows.len(),
        ..Default::default()
    };
    let mut seen_keys: HashSet<(String, NaiveDateTime)> = HashSet::new();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;

        match normalize_row(row_number, row) {
            Ok(Some(record)) => {
                let key = (record.order_id.clone(), record.execution_time);
                if seen_keys.insert(key) {
                    result.records.push(record);
                } else {
                    let err = ReportError::malformed(
                        row_number,
                        EXECUTION_TIME[0],
                        format!(
                            "duplicates execution {} of order '{}'",
                            record.execution_time, record.order_id
                        ),
                    );
                    tracing::warn!(%err, "rejected trade row");
                    result.rejected.push(err);
                }
            }
            Ok(None) => {
                tracing::debug!(row = row_number, "dropped row without strike");
                result.dropped_no_strike += 1;
            }
            Err(err) => {
                tracing::warn!(%err, "rejected trade row");
                result.rejected.push(err);
            }
        }
    }

    tracing::info!(
        rows_seen = result.rows_seen,
        kept = result.records.len(),
        dropped_no_strike = result.dropped_no_strike,
        rejected = result.rejected.len(),
        "normalized trade rows"
    );

    result
}

//normalizes one row; Ok(None) means the row is not an options trade
pub fn normalize_row(row_number: usize, row: &RawTradeRow) -> Result<Option<TradeRecord>> {
    if let Some(reason) = row.invalid() {
        return Err(ReportError::malformed(row_number, "row", reason));
    }

    let strike = match row.get_any(STRIKE) {
        Some(raw) => parse_decimal(row_number, STRIKE[0], raw)?,
        None => return Ok(None),
    };

    let symbol = required(row_number, row, SYMBOL)?.to_string();
    let quantity = parse_quantity(row_number, required(row_number, row, QUANTITY)?)?;
    let order_time = parse_time_field(row_number, row, ORDER_TIME)?;
    let execution_time = parse_time_field(row_number, row, EXECUTION_TIME)?;
    let net_cash = parse_decimal(row_number, NET_CASH[0], required(row_number, row, NET_CASH)?)?;
    let commission = parse_decimal(
        row_number,
        COMMISSION[0],
        required(row_number, row, COMMISSION)?,
    )?
    .abs();

    //a missing realized pnl means the broker reported nothing closed
    let realized_pnl = match row.get_any(REALIZED_PNL) {
        Some(raw) => parse_decimal(row_number, REALIZED_PNL[0], raw)?,
        None => Decimal::ZERO,
    };

    let order_id = row.get_any(ORDER_ID).unwrap_or_default().to_string();

    if net_cash.checked_sub(realized_pnl).is_none() {
        return Err(ReportError::malformed(
            row_number,
            NET_CASH[0],
            "initial capital out of range",
        ));
    }
    check_amount(row_number, NET_CASH[0], net_cash)?;
    check_amount(row_number, COMMISSION[0], commission)?;
    check_amount(row_number, REALIZED_PNL[0], realized_pnl)?;

    if execution_time < order_time {
        return Err(ReportError::malformed(
            row_number,
            EXECUTION_TIME[0],
            format!("{} precedes order time {}", execution_time, order_time),
        ));
    }

    Ok(Some(TradeRecord {
        order_id,
        symbol,
        strike,
        quantity,
        order_time,
        execution_time,
        net_cash,
        commission,
        realized_pnl,
    }))
}

//keeps only records whose order date is within `days` of the latest order date
pub fn apply_lookback(mut trades: NormalizedTrades, days: u32) -> NormalizedTrades {
    let latest = match trades.records.iter().map(|r| r.order_date()).max() {
        Some(date) => date,
        None => return trades,
    };
    //a window reaching past the calendar keeps everything
    let cutoff = latest
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MIN);

    let before = trades.records.len();
    trades.records.retain(|r| r.order_date() >= cutoff);
    trades.outside_lookback += before - trades.records.len();

    tracing::info!(
        days,
        %cutoff,
        removed = trades.outside_lookback,
        "applied lookback window"
    );

    trades
}

fn required<'a>(row_number: usize, row: &'a RawTradeRow, keys: &[&str]) -> Result<&'a str> {
    row.get_any(keys)
        .ok_or_else(|| ReportError::malformed(row_number, keys[0], "is missing"))
}

fn check_amount(row_number: usize, field: &str, value: Decimal) -> Result<()> {
    if value.abs() > MAX_AMOUNT {
        return Err(ReportError::malformed(
            row_number,
            field,
            format!("is out of range: {}", value),
        ));
    }
    Ok(())
}

fn parse_decimal(row_number: usize, field: &str, raw: &str) -> Result<Decimal> {
    let cleaned = raw.replace(',', "");
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| {
            ReportError::malformed(row_number, field, format!("is not a decimal: '{}'", raw))
        })
}

fn parse_quantity(row_number: usize, raw: &str) -> Result<i64> {
    if let Ok(qty) = raw.parse::<i64>() {
        if qty.unsigned_abs() > MAX_QUANTITY.unsigned_abs() {
            return Err(ReportError::malformed(
                row_number,
                QUANTITY[0],
                format!("is out of range: '{}'", raw),
            ));
        }
        return Ok(qty);
    }

    //some exports write whole quantities as "1.0"
    let value = parse_decimal(row_number, QUANTITY[0], raw)?;
    if !value.fract().is_zero() {
        return Err(ReportError::malformed(
            row_number,
            QUANTITY[0],
            format!("is not a whole number of contracts: '{}'", raw),
        ));
    }

    value
        .to_i64()
        .filter(|qty| qty.unsigned_abs() <= MAX_QUANTITY.unsigned_abs())
        .ok_or_else(|| {
            ReportError::malformed(row_number, QUANTITY[0], format!("is out of range: '{}'", raw))
        })
}

fn parse_time_field(
    row_number: usize,
    row: &RawTradeRow,
    keys: &[&str],
) -> Result<NaiveDateTime> {
    let raw = required(row_number, row, keys)?;
    parse_timestamp(raw).ok_or_else(|| {
        ReportError::malformed(row_number, keys[0], format!("is not a timestamp: '{}'", raw))
    })
}

//parses the timestamp spellings seen in broker exports
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
