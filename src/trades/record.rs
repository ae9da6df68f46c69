use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

//a single normalized options execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    //broker order id, shared by partial fills of the same order
    pub order_id: String,

    pub symbol: String,

    //always present after normalization, non-options rows are filtered out
    pub strike: Decimal,

    //signed: positive buys, negative sells
    pub quantity: i64,

    pub order_time: NaiveDateTime,
    pub execution_time: NaiveDateTime,

    //cash impact of the execution
    pub net_cash: Decimal,

    //absolute cost, never negative
    pub commission: Decimal,

    //zero when the execution did not close a position
    pub realized_pnl: Decimal,
}

impl TradeRecord {
    //returns true if this execution closed (part of) a position
    pub fn is_closing(&self) -> bool {
        !self.realized_pnl.is_zero()
    }

    //number of contracts regardless of direction
    pub fn contracts(&self) -> u64 {
        self.quantity.unsigned_abs()
    }

    pub fn order_date(&self) -> NaiveDate {
        self.order_time.date()
    }

    pub fn execution_date(&self) -> NaiveDate {
        self.execution_time.date()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::NaiveDate;

    pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    //a one-lot option execution with the given economics
    pub fn record(
        order_id: &str,
        order_time: NaiveDateTime,
        net_cash: Decimal,
        realized_pnl: Decimal,
    ) -> TradeRecord {
        TradeRecord {
            order_id: order_id.to_string(),
            symbol: "SPY".to_string(),
            strike: Decimal::from(450),
            quantity: -1,
            order_time,
            execution_time: order_time,
            net_cash,
            commission: Decimal::new(105, 2),
            realized_pnl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn contracts_ignore_direction() {
        let mut rec = record("1", at(2024, 1, 2, 10), Decimal::from(100), Decimal::ZERO);
        assert_eq!(rec.contracts(), 1);

        rec.quantity = 3;
        assert_eq!(rec.contracts(), 3);
    }

    #[test]
    fn closing_depends_on_realized_pnl() {
        let open = record("1", at(2024, 1, 2, 10), Decimal::from(-250), Decimal::ZERO);
        let close = record("2", at(2024, 1, 3, 10), Decimal::from(300), Decimal::from(50));

        assert!(!open.is_closing());
        assert!(close.is_closing());
    }
}
