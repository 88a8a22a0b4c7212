//! Command-line definition for `loan-calc`.
//!
//! Amounts are taken as text and coerced leniently, so `£28,470`, `28470`
//! and an empty string (zero) are all accepted.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use loan_core::{LivingSituation, PayFrequency, PlanId, Region};

use crate::config::Overrides;
use crate::report::OutputFormat;

/// UK student loan calculators.
///
/// Repayments, PAYE deductions across several jobs, part-year employment,
/// salary sacrifice, maintenance loans and interest, calculated against
/// versioned reference tables.
#[derive(Debug, Parser)]
#[command(name = "loan-calc", version)]
pub struct Cli {
    /// TOML settings file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Tax year to calculate for, e.g. `2025/26` or `2025`. Defaults to the
    /// latest year the reference source holds.
    #[arg(long, global = true)]
    pub year: Option<String>,

    /// Reference source (`builtin` or `csv`).
    #[arg(long, global = true)]
    pub source: Option<String>,

    /// Directory of reference CSV files. Implies `--source csv`.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Log filter, e.g. `debug` or `loan_core=trace`. `RUST_LOG` wins.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log lines to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            tax_year: self.year.clone(),
            source: self.source.clone(),
            data_dir: self.data_dir.clone(),
            format: self.format,
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Repayments at a salary and a projection to payoff or write-off.
    Repayment(RepaymentArgs),
    /// Deductions per payslip, and the shortfall across several jobs.
    Paye(PayeArgs),
    /// A tax year with months out of work, and any refund due.
    PartYear(PartYearArgs),
    /// Savings from salary sacrifice.
    Sacrifice(SacrificeArgs),
    /// Maintenance loan for a household income.
    Maintenance(MaintenanceArgs),
    /// Interest rates and first-year interest on a balance.
    Interest(InterestArgs),
    /// Look up glossary terms.
    Glossary(GlossaryArgs),
    /// List the tax years the reference source holds.
    Years,
}

#[derive(Debug, Args)]
pub struct RepaymentArgs {
    #[arg(long, default_value = "plan2", value_parser = parse_plan)]
    pub plan: PlanId,

    /// Annual salary before tax.
    #[arg(long)]
    pub salary: String,

    /// Outstanding balance.
    #[arg(long, default_value = "0")]
    pub balance: String,

    /// Yearly salary growth, as `3%` or `0.03`.
    #[arg(long, default_value = "0")]
    pub growth: String,

    /// Postgraduate loan balance repaid alongside the main plan.
    #[arg(long)]
    pub postgrad_balance: Option<String>,
}

#[derive(Debug, Args)]
pub struct PayeArgs {
    #[arg(long, default_value = "plan2", value_parser = parse_plan)]
    pub plan: PlanId,

    /// Also deduct for a Postgraduate loan.
    #[arg(long)]
    pub postgrad: bool,

    /// A job as `AMOUNT[:FREQUENCY[:EMPLOYER]]`. Repeat for each job.
    #[arg(long = "job")]
    pub jobs: Vec<String>,

    /// CSV file of jobs with `amount,frequency,employer,label` columns.
    #[arg(long)]
    pub jobs_file: Option<PathBuf>,

    /// Pay on a single payslip; prints that payslip's deduction.
    #[arg(long, conflicts_with_all = ["jobs", "jobs_file"])]
    pub pay: Option<String>,

    /// Pay frequency of `--pay`.
    #[arg(long, default_value = "monthly", value_parser = parse_frequency, requires = "pay")]
    pub frequency: PayFrequency,
}

#[derive(Debug, Args)]
pub struct PartYearArgs {
    #[arg(long, default_value = "plan2", value_parser = parse_plan)]
    pub plan: PlanId,

    /// Monthly pay in the months worked.
    #[arg(long)]
    pub monthly_income: String,

    /// One mark per month from April: `1` worked, `0` not, e.g. `111111000000`.
    #[arg(long, default_value = "111111111111")]
    pub pattern: String,

    /// Balance at the start of April.
    #[arg(long, default_value = "0")]
    pub balance: String,
}

#[derive(Debug, Args)]
pub struct SacrificeArgs {
    #[arg(long, default_value = "plan2", value_parser = parse_plan)]
    pub plan: PlanId,

    /// Annual salary before the sacrifice.
    #[arg(long)]
    pub salary: String,

    /// Annual amount sacrificed.
    #[arg(long)]
    pub sacrifice: String,

    /// Also repaying a Postgraduate loan.
    #[arg(long)]
    pub postgrad: bool,
}

#[derive(Debug, Args)]
pub struct MaintenanceArgs {
    #[arg(long, default_value = "england", value_parser = parse_region)]
    pub region: Region,

    /// `at-home`, `away` or `london`.
    #[arg(long, default_value = "away", value_parser = parse_living)]
    pub living: LivingSituation,

    /// Household income.
    #[arg(long)]
    pub income: String,
}

#[derive(Debug, Args)]
pub struct InterestArgs {
    #[arg(long)]
    pub balance: String,

    /// Annual income, which sets the Plan 2 rate.
    #[arg(long, default_value = "0")]
    pub income: String,
}

#[derive(Debug, Clone, Args)]
pub struct GlossaryArgs {
    /// Exact title, ignoring case.
    #[arg(long, conflicts_with_all = ["tag", "plan"])]
    pub term: Option<String>,

    #[arg(long)]
    pub tag: Option<String>,

    /// Terms relevant to this plan.
    #[arg(long, value_parser = parse_plan)]
    pub plan: Option<PlanId>,
}

fn parse_plan(s: &str) -> Result<PlanId, String> {
    PlanId::parse(s).ok_or_else(|| {
        let known: Vec<_> = PlanId::all().iter().map(PlanId::as_str).collect();
        format!("unknown plan '{s}'; expected one of {}", known.join(", "))
    })
}

fn parse_region(s: &str) -> Result<Region, String> {
    Region::parse(s).ok_or_else(|| {
        let known: Vec<_> = Region::all().iter().map(Region::as_str).collect();
        format!("unknown region '{s}'; expected one of {}", known.join(", "))
    })
}

fn parse_living(s: &str) -> Result<LivingSituation, String> {
    LivingSituation::parse(s).ok_or_else(|| {
        let known: Vec<_> = LivingSituation::all()
            .iter()
            .map(LivingSituation::as_str)
            .collect();
        format!("unknown living situation '{s}'; expected one of {}", known.join(", "))
    })
}

fn parse_frequency(s: &str) -> Result<PayFrequency, String> {
    PayFrequency::parse(s).ok_or_else(|| format!("unknown pay frequency '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "loan-calc",
            "maintenance",
            "--income",
            "40000",
            "--living",
            "at-home",
            "--format",
            "json",
            "--year",
            "2024",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.overrides().tax_year.as_deref(), Some("2024"));
        let Command::Maintenance(args) = cli.command else {
            panic!("expected maintenance");
        };
        assert_eq!(args.region, Region::England);
        assert_eq!(args.living, LivingSituation::AtHome);
    }

    #[test]
    fn jobs_repeat() {
        let cli = Cli::try_parse_from([
            "loan-calc",
            "paye",
            "--job",
            "2000:monthly:Acme",
            "--job",
            "2000:monthly:Globex",
        ])
        .unwrap();

        let Command::Paye(args) = cli.command else {
            panic!("expected paye");
        };
        assert_eq!(args.plan, PlanId::Plan2);
        assert_eq!(args.jobs.len(), 2);
        assert_eq!(args.pay, None);
    }

    #[test]
    fn payslip_and_jobs_conflict() {
        let result = Cli::try_parse_from([
            "loan-calc", "paye", "--pay", "2500", "--job", "2000",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn unknown_plan_is_rejected() {
        let err = Cli::try_parse_from(["loan-calc", "repayment", "--plan", "plan9", "--salary", "1"])
            .unwrap_err();

        assert!(err.to_string().contains("unknown plan 'plan9'"));
    }
}
