use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use loan_core::{LivingSituation, PlanId, Region};
use loan_data::ReferenceLoader;
use tracing_subscriber::EnvFilter;

/// Validate a directory of reference tables and summarise each tax year.
///
/// The directory must contain:
/// - plans.csv: tax_year, plan, annual/monthly/weekly thresholds, repayment_rate,
///   write_off_years, interest_rate
/// - brackets.csv: tax_year, kind (income_tax or national_insurance), min_income,
///   max_income (empty for unlimited), rate
/// - maintenance.csv: tax_year, region, living, income, amount
/// - plan2_interest.csv: tax_year, lower_threshold, upper_threshold, rpi, max_premium
#[derive(Parser, Debug)]
#[command(name = "loan-data-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the CSV files
    #[arg(short, long)]
    dir: PathBuf,

    /// Print every plan and maintenance table, not just counts
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    println!("Checking reference tables in: {}", args.dir.display());

    let configs = ReferenceLoader::load_dir(&args.dir)
        .with_context(|| format!("Invalid reference tables in: {}", args.dir.display()))?;

    for config in &configs {
        println!(
            "{}: {} plans, {} income tax brackets, {} NI brackets, {} maintenance tables",
            config.tax_year,
            config.plans.len(),
            config.income_tax.len(),
            config.national_insurance.len(),
            config.maintenance.len(),
        );

        if !args.verbose {
            continue;
        }
        for id in PlanId::all() {
            match config.plan(*id) {
                Some(plan) => println!(
                    "  {:<18} £{} a year, {}%, written off after {} years",
                    plan.name(),
                    plan.annual_threshold,
                    plan.repayment_rate * rust_decimal::Decimal::ONE_HUNDRED,
                    plan.write_off_years,
                ),
                None => println!("  {:<18} missing", id.label()),
            }
        }
        for region in Region::all() {
            for living in LivingSituation::all() {
                if let Some(table) = config.maintenance_table(*region, *living) {
                    println!(
                        "  {region}, {living}: £{} to £{}",
                        table.max_amount(),
                        table.min_amount()
                    );
                }
            }
        }
    }

    println!("All {} tax years are valid.", configs.len());

    Ok(())
}
