use anyhow::{Context, Result};
use chrono::Weekday;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use tradereport::prelude::*;

#[derive(Parser)]
#[command(name = "tradereport")]
#[command(about = "Performance report for brokerage options trade executions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //build a report from a trade export
    Run {
        //path to flex-query trades csv
        #[arg(long)]
        trades: PathBuf,

        //json config file, flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        //weekday that closes each weekly bucket (eg fri, sun)
        #[arg(long)]
        week_anchor: Option<String>,

        //timestamp to bucket on (order, execution)
        #[arg(long)]
        bucket_by: Option<String>,

        //realized pnl a trade must exceed to count as positive
        #[arg(long)]
        positive_threshold: Option<String>,

        //only report the last n days of orders
        #[arg(long)]
        lookback_days: Option<u32>,

        //number of bins in the return distribution
        #[arg(long)]
        histogram_bins: Option<usize>,

        //output options
        #[arg(long)]
        output_weekly_csv: Option<PathBuf>,

        #[arg(long)]
        output_trades_csv: Option<PathBuf>,

        #[arg(long)]
        output_json: Option<PathBuf>,
    },

    //write a default config file to start from
    InitConfig {
        #[arg(long, default_value = "tradereport.json")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            trades,
            config,
            week_anchor,
            bucket_by,
            positive_threshold,
            lookback_days,
            histogram_bins,
            output_weekly_csv,
            output_trades_csv,
            output_json,
        } => {
            let mut report_config = match config {
                Some(path) => ReportConfig::from_json_file(&path)?,
                None => ReportConfig::default(),
            };

            if let Some(anchor) = week_anchor {
                report_config.week_anchor = Weekday::from_str(&anchor)
                    .map_err(|_| anyhow::anyhow!("Unknown weekday: {}", anchor))?;
            }
            if let Some(field) = bucket_by {
                report_config.bucket_field = BucketField::parse(&field)
                    .ok_or_else(|| anyhow::anyhow!("Unknown bucket field: {}", field))?;
            }
            if let Some(threshold) = positive_threshold {
                report_config.positive_threshold = Decimal::from_str(&threshold)
                    .context(format!("Invalid positive threshold: {}", threshold))?;
            }
            if lookback_days.is_some() {
                report_config.lookback_days = lookback_days;
            }
            if let Some(bins) = histogram_bins {
                report_config.histogram_bins = bins;
            }

            run_report(
                trades,
                report_config,
                output_weekly_csv,
                output_trades_csv,
                output_json,
            )?;
        }
        Commands::InitConfig { path } => {
            ReportConfig::default().to_json_file(&path)?;
            println!("Default config written to {:?}", path);
        }
    }

    Ok(())
}

fn run_report(
    trades_path: PathBuf,
    config: ReportConfig,
    output_weekly_csv: Option<PathBuf>,
    output_trades_csv: Option<PathBuf>,
    output_json: Option<PathBuf>,
) -> Result<()> {
    let rows = load_csv(&trades_path)
        .context(format!("Failed to load trades from {:?}", trades_path))?;

    let pipeline = ReportPipeline::new(config);
    tracing::info!(
        anchor = %pipeline.config().week_anchor,
        bucket_field = ?pipeline.config().bucket_field,
        lookback_days = ?pipeline.config().lookback_days,
        "building trading report"
    );

    let report = pipeline
        .run(&rows)
        .context(format!("Failed to build report from {:?}", trades_path))?;

    let summary = report.summary();
    println!(
        "Trading report for: {} - {} ({} days)\n",
        summary.period_start, summary.period_end, summary.business_days_in_period
    );
    pretty_print_table(&report);

    let diagnostics = report.diagnostics();
    for err in &diagnostics.rejected_rows {
        eprintln!("skipped: {}", err);
    }
    for err in &diagnostics.undefined_metrics {
        eprintln!("note: {}", err);
    }

    //save outputs if requested
    if let Some(path) = output_weekly_csv {
        write_weekly_csv(report.weekly(), &path)?;
        println!("\nWeekly table saved to {:?}", path);
    }

    if let Some(path) = output_trades_csv {
        write_closed_trades_csv(report.closed_trades(), &path)?;
        println!("Closed trades saved to {:?}", path);
    }

    if let Some(path) = output_json {
        write_json(&report, &path)?;
        println!("Report saved to {:?}", path);
    }

    Ok(())
}
