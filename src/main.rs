use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod data;
mod engine;
mod models;
mod report;

use models::FilterSelection;

#[derive(Parser)]
#[command(name = "rice-dashboard")]
#[command(about = "Sales analytics engine for the basmati rice field team", long_about = None)]
struct Cli {
    /// Path to the weekly sales CSV export
    #[arg(long, global = true, default_value = "Rice_sales_CSV.csv")]
    csv: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the built-in sample dataset as a CSV file
    Seed {
        #[arg(long, default_value = "Rice_sales_CSV.csv")]
        out: PathBuf,
    },
    /// List the months, weeks, and supervisors available as filters
    Filters,
    /// Print the KPI snapshot and active alerts for a selection
    Kpis {
        #[arg(long)]
        month: String,
        #[arg(long)]
        week: Option<u32>,
        #[arg(long)]
        supervisor: Option<String>,
    },
    /// Emit the chart-ready dashboard payload as JSON
    Dashboard {
        #[arg(long)]
        month: String,
        #[arg(long)]
        week: Option<u32>,
        #[arg(long)]
        supervisor: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        month: String,
        #[arg(long)]
        week: Option<u32>,
        #[arg(long)]
        supervisor: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Seed { out } => {
            let written = data::write_seed_csv(&out)?;
            println!("Wrote {written} sample records to {}.", out.display());
        }
        Commands::Filters => {
            let records = data::load_records(&cli.csv)?;
            println!("Months:");
            for month in data::distinct_months(&records) {
                let weeks: Vec<String> = data::weeks_in_month(&records, &month)
                    .iter()
                    .map(|week| week.to_string())
                    .collect();
                println!("- {month} (weeks {})", weeks.join(", "));
            }
            println!("Supervisors:");
            for supervisor in data::distinct_supervisors(&records) {
                println!("- {supervisor}");
            }
        }
        Commands::Kpis {
            month,
            week,
            supervisor,
        } => {
            let records = data::load_records(&cli.csv)?;
            let selection = FilterSelection {
                month,
                week,
                supervisor,
            };
            data::validate_selection(&records, &selection)?;

            let filtered = engine::filter_records(&records, &selection);
            if filtered.is_empty() {
                println!("No sales records match this selection.");
                return Ok(());
            }

            let aggregate = engine::compute_aggregate(&filtered);
            println!(
                "Performance snapshot for {} across {} records:",
                selection.month, aggregate.record_count
            );
            println!("- Total bags sold: {}", aggregate.total_bags_sold);
            println!("- Billed customers: {}", aggregate.billed_customers);
            println!("- Conversion rate: {:.1}%", aggregate.conversion_rate_pct);
            println!("- Repeat rate: {:.1}%", aggregate.month_repeat_rate_pct);
            println!("- Sampling reach: {:.1}%", aggregate.sampling_reach_pct);
            println!("- Lapsers: {}", aggregate.funnel_lapsers);

            let alerts = engine::evaluate_alerts(&aggregate, &filtered);
            for alert in &alerts {
                println!("! {}", alert.message);
            }
        }
        Commands::Dashboard {
            month,
            week,
            supervisor,
            out,
        } => {
            let records = data::load_records(&cli.csv)?;
            let selection = FilterSelection {
                month,
                week,
                supervisor,
            };
            data::validate_selection(&records, &selection)?;

            let payload = report::build_dashboard(&records, &selection);
            let json = serde_json::to_string_pretty(&payload)
                .context("failed to serialize dashboard payload")?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Dashboard payload written to {}.", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Report {
            month,
            week,
            supervisor,
            out,
        } => {
            let records = data::load_records(&cli.csv)?;
            let selection = FilterSelection {
                month,
                week,
                supervisor,
            };
            data::validate_selection(&records, &selection)?;

            let rendered = report::build_report(&records, &selection);
            std::fs::write(&out, rendered)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
