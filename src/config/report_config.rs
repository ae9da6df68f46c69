use anyhow::Context;
use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

//which timestamp a closed trade is bucketed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum BucketField {
    //broker dashboards report by the week the order was placed
    #[default]
    OrderTime,
    ExecutionTime,
}

impl BucketField {
    //parse bucket field from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "order" | "ordertime" | "order_time" => Some(BucketField::OrderTime),
            "execution" | "executiontime" | "execution_time" | "datetime" => {
                Some(BucketField::ExecutionTime)
            }
            _ => None,
        }
    }
}

//everything the analytics core needs for one report run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportConfig {
    //inclusive right boundary of every weekly bucket
    pub week_anchor: Weekday,

    pub bucket_field: BucketField,

    //a closed trade counts as positive when realized pnl is strictly above this
    pub positive_threshold: Decimal,

    //only keep records whose order date is within this many days of the latest one
    pub lookback_days: Option<u32>,

    pub histogram_bins: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            week_anchor: Weekday::Fri,
            bucket_field: BucketField::OrderTime,
            positive_threshold: Decimal::ZERO,
            lookback_days: None,
            histogram_bins: 10,
        }
    }
}

impl ReportConfig {
    //load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: ReportConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_statement_conventions() {
        let config = ReportConfig::default();
        assert_eq!(config.week_anchor, Weekday::Fri);
        assert_eq!(config.bucket_field, BucketField::OrderTime);
        assert_eq!(config.positive_threshold, Decimal::ZERO);
        assert_eq!(config.lookback_days, None);
    }

    #[test]
    fn bucket_field_parse() {
        assert_eq!(BucketField::parse("order"), Some(BucketField::OrderTime));
        assert_eq!(
            BucketField::parse("dateTime"),
            Some(BucketField::ExecutionTime)
        );
        assert_eq!(BucketField::parse("settlement"), None);
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let config = ReportConfig {
            week_anchor: Weekday::Sun,
            bucket_field: BucketField::ExecutionTime,
            positive_threshold: Decimal::new(5, 1),
            lookback_days: Some(30),
            histogram_bins: 4,
        };
        config.to_json_file(&path).unwrap();

        let loaded = ReportConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ReportConfig = serde_json::from_str(r#"{"lookbackDays": 7}"#).unwrap();
        assert_eq!(config.lookback_days, Some(7));
        assert_eq!(config.week_anchor, Weekday::Fri);
        assert_eq!(config.histogram_bins, 10);
    }
}
