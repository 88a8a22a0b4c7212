//! Dispatch of a parsed command to its calculator.

use anyhow::{Context, Result, bail};
use loan_core::calculations::calculators::{
    InterestCalculator, InterestInput, MaintenanceCalculator, MaintenanceInput,
    PartYearCalculator, PartYearInput, PayeCalculator, PayeInput, RepaymentCalculator,
    RepaymentInput, SalarySacrificeCalculator, SalarySacrificeInput,
};
use loan_core::calculations::common::parse_amount;
use loan_core::glossary;
use loan_core::reference::{ReferenceRepository, SourceRegistry};
use loan_core::{IncomeSource, TaxYearConfig};
use tracing::{debug, info, warn};

use crate::cli::{Command, GlossaryArgs, PayeArgs};
use crate::config::Settings;
use crate::csv_loader;
use crate::report::{GlossaryReport, YearsReport, render};
use crate::utils::{parse_job, parse_pattern, parse_rate};

/// Every reference source the binary knows about.
pub fn build_registry() -> SourceRegistry {
    loan_data::registry()
}

fn open_repository(settings: &Settings) -> Result<Box<dyn ReferenceRepository>> {
    debug!(
        source = %settings.reference.source,
        location = %settings.reference.location,
        "opening reference source"
    );
    build_registry()
        .open(&settings.reference)
        .with_context(|| format!("cannot open reference source '{}'", settings.reference.source))
}

/// Tables for the configured tax year, or the latest year available.
pub fn load_tables(settings: &Settings) -> Result<TaxYearConfig> {
    let repo = open_repository(settings)?;
    let year = match settings.tax_year {
        Some(year) => year,
        None => repo.latest_tax_year()?,
    };
    info!(tax_year = %year, "loading reference tables");
    repo.get_tax_year_config(year)
        .with_context(|| format!("cannot load reference tables for {year}"))
}

/// Runs one command and returns the rendered report.
pub fn run(
    command: &Command,
    settings: &Settings,
) -> Result<String> {
    let format = settings.format;
    match command {
        Command::Glossary(args) => render(None, &glossary_terms(args), format),
        Command::Years => {
            let repo = open_repository(settings)?;
            let configs = repo
                .list_tax_years()?
                .into_iter()
                .map(|year| repo.get_tax_year_config(year))
                .collect::<Result<Vec<_>, _>>()?;
            render(None, &YearsReport(configs), format)
        }
        command => {
            let config = load_tables(settings)?;
            run_calculator(command, &config, settings)
        }
    }
}

fn run_calculator(
    command: &Command,
    config: &TaxYearConfig,
    settings: &Settings,
) -> Result<String> {
    let year = Some(config.tax_year);
    let format = settings.format;
    match command {
        Command::Repayment(args) => {
            let mut input =
                RepaymentInput::new(args.plan, parse_amount(&args.salary), parse_amount(&args.balance))
                    .with_growth(parse_rate(&args.growth));
            if let Some(balance) = &args.postgrad_balance {
                input = input.with_postgraduate(parse_amount(balance));
            }
            let result = RepaymentCalculator::new(config).calculate(&input)?;
            render(year, &result, format)
        }
        Command::Paye(args) => {
            let calculator = PayeCalculator::new(config);
            if let Some(pay) = &args.pay {
                let result = calculator.period_deduction(args.plan, parse_amount(pay), args.frequency)?;
                return render(year, &result, format);
            }
            let input = PayeInput {
                plan: args.plan,
                include_postgraduate: args.postgrad,
                sources: collect_jobs(args)?,
            };
            let result = calculator.calculate(&input)?;
            render(year, &result, format)
        }
        Command::PartYear(args) => {
            let pattern = parse_pattern(&args.pattern)?;
            let input = PartYearInput::from_pattern(
                args.plan,
                parse_amount(&args.balance),
                parse_amount(&args.monthly_income),
                &pattern,
            );
            let result = PartYearCalculator::new(config).calculate(&input)?;
            render(year, &result, format)
        }
        Command::Sacrifice(args) => {
            let input = SalarySacrificeInput {
                plan: args.plan,
                include_postgraduate: args.postgrad,
                gross_salary: parse_amount(&args.salary),
                sacrifice: parse_amount(&args.sacrifice),
            };
            let result = SalarySacrificeCalculator::new(config).calculate(&input)?;
            render(year, &result, format)
        }
        Command::Maintenance(args) => {
            let input = MaintenanceInput {
                region: args.region,
                living: args.living,
                household_income: parse_amount(&args.income),
            };
            let result = MaintenanceCalculator::new(config).calculate(&input)?;
            render(year, &result, format)
        }
        Command::Interest(args) => {
            let input = InterestInput {
                balance: parse_amount(&args.balance),
                annual_income: parse_amount(&args.income),
            };
            render(year, &InterestCalculator::new(config).calculate(&input), format)
        }
        Command::Glossary(_) | Command::Years => bail!("command does not use reference tables"),
    }
}

/// Jobs from `--job` flags followed by any jobs file, numbered in that order.
fn collect_jobs(args: &PayeArgs) -> Result<Vec<IncomeSource>> {
    let mut sources = args
        .jobs
        .iter()
        .zip(1..)
        .map(|(job, id)| parse_job(id, job))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(path) = &args.jobs_file {
        let offset = u32::try_from(sources.len()).context("too many jobs on the command line")?;
        let from_file = csv_loader::load_from_file(path)
            .with_context(|| format!("cannot load jobs from {}", path.display()))?;
        for mut source in from_file {
            let file_id = source.id;
            source.id = file_id
                .checked_add(offset)
                .with_context(|| format!("job id {file_id} in {} is too large", path.display()))?;
            if source.label == format!("Job {file_id}") {
                source.label = format!("Job {}", source.id);
            }
            sources.push(source);
        }
    }

    if sources.is_empty() {
        bail!("no jobs given; use --job AMOUNT[:FREQUENCY[:EMPLOYER]] or --jobs-file");
    }
    debug!(jobs = sources.len(), "collected jobs");
    Ok(sources)
}

fn glossary_terms(args: &GlossaryArgs) -> GlossaryReport {
    if let Some(title) = &args.term {
        let found: Vec<_> = glossary::find(title).into_iter().collect();
        if found.is_empty() {
            warn!(term = %title, "no glossary term with this title");
        }
        return GlossaryReport(found);
    }

    let mut terms = match (&args.tag, args.plan) {
        (Some(tag), _) => glossary::with_tag(tag),
        (None, Some(plan)) => glossary::for_plan(plan),
        (None, None) => glossary::terms().iter().collect(),
    };
    if let (Some(tag), Some(plan)) = (&args.tag, args.plan) {
        terms.retain(|term| term.applies_to(plan));
        debug!(tag = %tag, plan = %plan, "filtered tagged terms by plan");
    }
    if terms.is_empty() {
        if let Some(tag) = &args.tag {
            warn!(tag = %tag, known = ?glossary::tags(), "no glossary terms with this tag");
        }
    }
    GlossaryReport(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::config::{FileConfig, Overrides};
    use crate::report::OutputFormat;
    use clap::Parser;
    use loan_core::{PlanId, TaxYear};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn settings(format: OutputFormat) -> Settings {
        let overrides = Overrides {
            format: Some(format),
            ..Overrides::default()
        };
        Settings::resolve(FileConfig::default(), overrides).unwrap()
    }

    fn run_args(
        args: &[&str],
        format: OutputFormat,
    ) -> Result<String> {
        let cli = Cli::try_parse_from(args).unwrap();
        run(&cli.command, &settings(format))
    }

    #[test]
    fn latest_builtin_year_is_default() {
        let config = load_tables(&settings(OutputFormat::Text)).unwrap();

        assert_eq!(config.tax_year, TaxYear(2025));
    }

    #[test]
    fn two_employers_report_underpayment() {
        let json = run_args(
            &["loan-calc", "paye", "--job", "2000:monthly:Bar", "--job", "2000:monthly:Shop"],
            OutputFormat::Json,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["result"]["requires_self_assessment"], true);
        let underpayment: Decimal = value["result"]["total_underpayment"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(underpayment, dec!(1757.70));
    }

    #[test]
    fn single_payslip_deduction() {
        let text = run_args(
            &["loan-calc", "paye", "--pay", "2500", "--frequency", "monthly"],
            OutputFormat::Text,
        )
        .unwrap();

        // (2500 - 2373) * 9%
        assert!(text.contains("£11.43"), "{text}");
    }

    #[test]
    fn paye_without_jobs_fails() {
        let err = run_args(&["loan-calc", "paye"], OutputFormat::Text).unwrap_err();

        assert!(err.to_string().contains("no jobs given"));
    }

    #[test]
    fn file_jobs_are_numbered_after_command_line_jobs() {
        let fixture = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/jobs.csv");
        let cli = Cli::try_parse_from([
            "loan-calc",
            "paye",
            "--job",
            "1000:monthly:Cafe",
            "--jobs-file",
            fixture,
        ])
        .unwrap();
        let Command::Paye(args) = cli.command else {
            panic!("expected the paye command");
        };

        let jobs = collect_jobs(&args).unwrap();

        let ids: Vec<u32> = jobs.iter().map(|job| job.id).collect();
        let labels: Vec<&str> = jobs.iter().map(|job| job.label.as_str()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(labels, vec!["Job 1", "Bar shifts", "Shop", "Weekend cover"]);
    }

    #[test]
    fn bad_pattern_fails() {
        let result = run_args(
            &["loan-calc", "part-year", "--monthly-income", "2000", "--pattern", "11x"],
            OutputFormat::Text,
        );

        assert!(result.is_err());
    }

    #[test]
    fn glossary_lookup_needs_no_tables() {
        let args = GlossaryArgs {
            term: Some("write-off".to_string()),
            tag: None,
            plan: None,
        };

        let report = glossary_terms(&args);

        assert_eq!(report.0.len(), 1);
        assert_eq!(report.0[0].title, "Write-off");
    }

    #[test]
    fn glossary_filters_by_tag_and_plan() {
        let tagged = GlossaryArgs {
            term: None,
            tag: Some("interest".to_string()),
            plan: None,
        };
        let tagged_for_plan1 = GlossaryArgs {
            plan: Some(PlanId::Plan1),
            ..tagged.clone()
        };

        let all_interest = glossary_terms(&tagged);
        let plan1_interest = glossary_terms(&tagged_for_plan1);

        assert!(all_interest.0.iter().any(|t| t.title == "Income-linked interest"));
        assert!(plan1_interest.0.iter().all(|t| t.applies_to(PlanId::Plan1)));
        assert!(!plan1_interest.0.iter().any(|t| t.title == "Income-linked interest"));
        assert!(plan1_interest.0.len() < all_interest.0.len());
    }

    #[test]
    fn unknown_tag_matches_nothing() {
        let args = GlossaryArgs {
            term: None,
            tag: Some("mortgage".to_string()),
            plan: None,
        };

        assert!(glossary_terms(&args).0.is_empty());
    }

    #[test]
    fn years_lists_builtin_tables() {
        let text = run_args(&["loan-calc", "years"], OutputFormat::Text).unwrap();

        assert!(text.contains("2024/25"));
        assert!(text.contains("2025/26"));
    }
}
