use chrono::Local;
use clap::Args;
use sales_sim::analytics::SalesAnalytics;
use sales_sim::dataset::{DatasetCounts, SalesDataGenerator, SalesDataset};
use sales_sim::error::AppError;
use sales_sim::export::export_dataset;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Copy)]
pub(crate) struct CountArgs {
    /// Number of sales reps to synthesize.
    #[arg(long, default_value_t = 8)]
    pub(crate) reps: usize,
    /// Number of accounts to synthesize.
    #[arg(long, default_value_t = 100)]
    pub(crate) accounts: usize,
    /// Number of opportunities to synthesize.
    #[arg(long, default_value_t = 200)]
    pub(crate) opportunities: usize,
    /// Number of activities to synthesize.
    #[arg(long, default_value_t = 500)]
    pub(crate) activities: usize,
}

impl CountArgs {
    fn counts(self) -> DatasetCounts {
        DatasetCounts {
            sales_reps: self.reps,
            accounts: self.accounts,
            opportunities: self.opportunities,
            activities: self.activities,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Generator seed. Omit for a fresh dataset every run.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    #[command(flatten)]
    pub(crate) counts: CountArgs,
    /// How many leaderboard rows to print.
    #[arg(long, default_value_t = 3)]
    pub(crate) top: usize,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Directory receiving the six CSV files (created if missing).
    #[arg(long, default_value = "./sales-data")]
    pub(crate) out_dir: PathBuf,
    /// Generator seed. Omit for a fresh dataset every run.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    #[command(flatten)]
    pub(crate) counts: CountArgs,
}

fn generate(seed: Option<u64>, counts: DatasetCounts) -> Result<SalesDataset, AppError> {
    let now = Local::now().naive_local();
    let mut generator = match seed {
        Some(seed) => SalesDataGenerator::seeded(seed, now),
        None => SalesDataGenerator::from_entropy(now),
    };
    generator.generate(&counts).map_err(AppError::from)
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let dataset = generate(args.seed, args.counts.counts())?;
    let written = export_dataset(&dataset, &args.out_dir)?;
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = Local::now().naive_local();
    let dataset = generate(args.seed, args.counts.counts())?;

    println!("Generated {} territories", dataset.territories.len());
    println!("Generated {} sales reps", dataset.sales_reps.len());
    println!("Generated {} products", dataset.products.len());
    println!("Generated {} accounts", dataset.accounts.len());
    println!("Generated {} opportunities", dataset.opportunities.len());
    println!("Generated {} activities", dataset.activities.len());

    let analytics = SalesAnalytics::new(&dataset);
    let metrics = analytics.key_metrics();

    println!("\nKey metrics");
    println!("- Total pipeline: {}", usd(metrics.total_pipeline));
    println!("- Weighted pipeline: {}", usd(metrics.weighted_pipeline));
    println!("- Total revenue: {}", usd(metrics.total_revenue));
    println!("- Win rate: {:.1}%", metrics.win_rate);
    println!("- Avg deal size: {}", usd(metrics.avg_deal_size));
    match metrics.avg_sales_cycle_days {
        Some(days) => println!("- Avg sales cycle: {days:.0} days"),
        None => println!("- Avg sales cycle: n/a (nothing closed yet)"),
    }
    println!("- Sales velocity: {}/day", usd(analytics.sales_velocity()));

    println!("\nPipeline by stage");
    for entry in analytics.pipeline_by_stage() {
        println!(
            "- {}: {} across {} opportunities",
            entry.stage_label,
            usd(entry.amount),
            entry.count
        );
    }

    println!("\nForecast (next 90 days)");
    let forecast = analytics.forecast_next_quarter(now);
    println!("- Best case: {}", usd(forecast.best_case));
    println!("- Weighted: {}", usd(forecast.weighted));
    println!("- Conservative: {}", usd(forecast.conservative));
    println!(
        "- Opportunities in forecast: {}",
        forecast.opportunities_in_forecast
    );

    println!("\nTop {} performers", args.top);
    for entry in analytics.rep_performance().into_iter().take(args.top) {
        println!(
            "- {} ({}): revenue {} | win rate {:.1}% | pipeline {}",
            entry.rep_name,
            entry.territory_id,
            usd(entry.revenue),
            entry.win_rate,
            usd(entry.pipeline_value)
        );
    }

    println!("\nData quality check");
    for finding in analytics.data_quality_report(now) {
        println!("- {finding}");
    }

    Ok(())
}

/// Whole-dollar display with thousands separators.
fn usd(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_groups_thousands() {
        assert_eq!(usd(0.0), "$0");
        assert_eq!(usd(950.4), "$950");
        assert_eq!(usd(1234.6), "$1,235");
        assert_eq!(usd(9_876_543.0), "$9,876,543");
        assert_eq!(usd(-12_500.0), "-$12,500");
    }

    #[test]
    fn demo_runs_with_small_counts() {
        let args = DemoArgs {
            seed: Some(42),
            counts: CountArgs {
                reps: 3,
                accounts: 8,
                opportunities: 15,
                activities: 20,
            },
            top: 2,
        };
        run_demo(args).expect("demo completes");
    }

    #[test]
    fn demo_surfaces_empty_dependency_error() {
        let args = DemoArgs {
            seed: Some(42),
            counts: CountArgs {
                reps: 0,
                accounts: 8,
                opportunities: 15,
                activities: 20,
            },
            top: 3,
        };
        let err = run_demo(args).expect_err("zero reps must fail");
        assert!(err.to_string().contains("sales_reps"));
    }
}
