use crate::config::{BucketField, ReportConfig};
use crate::trades::ClosedTrade;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

//closed-trade totals for one week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAggregate {
    //always falls on the configured week anchor
    pub week_ending: NaiveDate,
    pub num_trades: usize,
    pub pnl_realized: Decimal,
    //mean pct return over trades with a defined return, None if there are none
    pub avg_return: Option<f64>,
    pub capital_deployed: Decimal,
}

//the anchor day on or after `date`
//a date that already falls on the anchor belongs to that same week
pub fn week_ending(date: NaiveDate, anchor: Weekday) -> NaiveDate {
    let from = date.weekday().num_days_from_monday();
    let to = anchor.num_days_from_monday();
    let days_ahead = (to + 7 - from) % 7;
    date + Duration::days(i64::from(days_ahead))
}

//mean pct return over the trades that have one
pub fn average_return<'a, I>(trades: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a ClosedTrade>,
{
    let returns: Vec<f64> = trades.into_iter().filter_map(|t| t.pct_return).collect();

    if returns.is_empty() {
        return None;
    }

    Some(returns.as_slice().mean())
}

//sum of amounts; normalized inputs never reach the saturation point
pub fn total<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

//date a closed trade is bucketed on
pub fn bucket_date(trade: &ClosedTrade, field: BucketField) -> NaiveDate {
    match field {
        BucketField::OrderTime => trade.record.order_date(),
        BucketField::ExecutionTime => trade.record.execution_date(),
    }
}

//groups closed trades into weekly buckets, ascending by week ending
//weeks without closed trades are not emitted
pub fn aggregate_weekly(trades: &[ClosedTrade], config: &ReportConfig) -> Vec<WeeklyAggregate> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&ClosedTrade>> = BTreeMap::new();

    for trade in trades {
        let week = week_ending(bucket_date(trade, config.bucket_field), config.week_anchor);
        buckets.entry(week).or_default().push(trade);
    }

    let weeks: Vec<WeeklyAggregate> = buckets
        .into_iter()
        .map(|(week_ending, bucket)| WeeklyAggregate {
            week_ending,
            num_trades: bucket.len(),
            pnl_realized: total(bucket.iter().map(|t| t.realized_pnl())),
            avg_return: average_return(bucket.iter().copied()),
            capital_deployed: total(bucket.iter().map(|t| t.initial_capital)),
        })
        .collect();

    tracing::debug!(
        weeks = weeks.len(),
        anchor = %config.week_anchor,
        "aggregated closed trades by week"
    );

    weeks
}
