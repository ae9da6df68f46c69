//! Property-based checks of the report pipeline invariants.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tradereport::prelude::*;

#[derive(Debug, Clone)]
struct RowSpec {
    has_strike: bool,
    quantity: i64,
    day_offset: i64,
    hour: u32,
    net_cash_cents: i64,
    pnl_cents: i64,
    commission_cents: i64,
}

fn arb_pnl_cents() -> impl Strategy<Value = i64> {
    prop_oneof![
        2 => Just(0i64),
        3 => -50_000i64..50_000,
    ]
}

fn arb_row() -> impl Strategy<Value = RowSpec> {
    (
        prop::bool::weighted(0.8),
        -5i64..=5,
        0i64..90,
        9u32..16,
        -200_000i64..200_000,
        arb_pnl_cents(),
        -500i64..500,
    )
        .prop_map(
            |(has_strike, quantity, day_offset, hour, net_cash_cents, pnl_cents, commission_cents)| {
                RowSpec {
                    has_strike,
                    quantity,
                    day_offset,
                    hour,
                    net_cash_cents,
                    pnl_cents,
                    commission_cents,
                }
            },
        )
}

fn arb_rows() -> impl Strategy<Value = Vec<RawTradeRow>> {
    prop::collection::vec(arb_row(), 0..40).prop_map(|cases| {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        cases
            .iter()
            .enumerate()
            .map(|(i, case)| {
                let order_time = (start + Duration::days(case.day_offset))
                    .and_hms_opt(case.hour, 0, 0)
                    .unwrap();
                let stamp = order_time.format("%Y%m%d;%H%M%S").to_string();
                RawTradeRow::new()
                    .with("symbol", "SPY")
                    .with("strike", if case.has_strike { "450" } else { "" })
                    .with("quantity", &case.quantity.to_string())
                    .with("orderTime", &stamp)
                    .with("dateTime", &stamp)
                    .with("netCash", &Decimal::new(case.net_cash_cents, 2).to_string())
                    .with("ibCommission", &Decimal::new(case.commission_cents, 2).to_string())
                    .with("fifoPnlRealized", &Decimal::new(case.pnl_cents, 2).to_string())
                    .with("ibOrderID", &i.to_string())
            })
            .collect()
    })
}

fn arb_anchor() -> impl Strategy<Value = Weekday> {
    prop_oneof![
        Just(Weekday::Mon),
        Just(Weekday::Wed),
        Just(Weekday::Fri),
        Just(Weekday::Sun),
    ]
}

proptest! {
    /// Normalized records always carry a strike; nothing without one slips through.
    #[test]
    fn normalized_records_all_have_strike(rows in arb_rows()) {
        let normalized = normalize(&rows);
        let with_strike = rows.iter().filter(|r| r.get("strike").is_some()).count();

        prop_assert_eq!(normalized.records.len(), with_strike);
        prop_assert_eq!(normalized.dropped_no_strike, rows.len() - with_strike);
        prop_assert!(normalized.rejected.is_empty());
    }

    /// Closed trades never include executions with zero realized pnl.
    #[test]
    fn closed_trades_have_nonzero_pnl(rows in arb_rows()) {
        let normalized = normalize(&rows);
        let closed = classify(&normalized.records);

        prop_assert!(closed.trades.iter().all(|t| !t.realized_pnl().is_zero()));
        prop_assert_eq!(
            closed.trades.len() + closed.non_closing_excluded,
            normalized.records.len()
        );
        prop_assert!(closed
            .trades
            .windows(2)
            .all(|w| w[0].record.execution_time <= w[1].record.execution_time));
    }
}

proptest! {
    /// Net pnl in the summary equals the closed-trade sum exactly, and the weekly
    /// partition adds up to the same total.
    #[test]
    fn pnl_totals_agree(rows in arb_rows(), anchor in arb_anchor()) {
        let config = ReportConfig { week_anchor: anchor, ..Default::default() };

        match ReportPipeline::new(config).run(&rows) {
            Ok(report) => {
                let closed_sum: Decimal = report.closed_trades().iter().map(|t| t.realized_pnl()).sum();
                let weekly_sum: Decimal = report.weekly().iter().map(|w| w.pnl_realized).sum();
                let weekly_count: usize = report.weekly().iter().map(|w| w.num_trades).sum();

                prop_assert_eq!(report.summary().net_realized_pnl, closed_sum);
                prop_assert_eq!(weekly_sum, closed_sum);
                prop_assert_eq!(weekly_count, report.closed_trades().len());
            }
            Err(err) => {
                prop_assert!(matches!(err, ReportError::EmptyDataset(_)));
                let closed = classify(&normalize(&rows).records);
                prop_assert!(closed.is_empty());
            }
        }
    }

    /// Every week ends on the anchor, weeks ascend, and each trade sits in the
    /// seven days ending on its week.
    #[test]
    fn weeks_end_on_anchor(rows in arb_rows(), anchor in arb_anchor()) {
        let config = ReportConfig { week_anchor: anchor, ..Default::default() };
        let closed = classify(&normalize(&rows).records);
        let weekly = aggregate_weekly(&closed.trades, &config);

        prop_assert!(weekly.iter().all(|w| w.week_ending.weekday() == anchor));
        prop_assert!(weekly.windows(2).all(|w| w[0].week_ending < w[1].week_ending));

        for trade in &closed.trades {
            let date = trade.record.order_date();
            let week = week_ending(date, anchor);
            prop_assert!(week >= date);
            prop_assert!(week - date < Duration::days(7));
            prop_assert!(weekly.iter().any(|w| w.week_ending == week));
        }
    }

    /// Running the pipeline twice on the same rows gives byte-identical output.
    #[test]
    fn pipeline_is_idempotent(rows in arb_rows()) {
        let pipeline = ReportPipeline::default();
        let first = pipeline.run(&rows).map(|r| serde_json::to_string(&r).unwrap());
        let second = pipeline.run(&rows).map(|r| serde_json::to_string(&r).unwrap());

        prop_assert_eq!(first, second);
    }

    /// Undefined returns are never reported as NaN or infinity.
    #[test]
    fn averages_are_finite_or_absent(rows in arb_rows()) {
        if let Ok(report) = ReportPipeline::default().run(&rows) {
            if let Some(avg) = report.summary().avg_return_per_trade {
                prop_assert!(avg.is_finite());
            }
            for week in report.weekly() {
                if let Some(avg) = week.avg_return {
                    prop_assert!(avg.is_finite());
                }
            }
            let zero_contracts = report.summary().total_contracts == 0;
            prop_assert_eq!(report.summary().avg_fee_per_contract.is_none(), zero_contracts);
        }
    }
}
