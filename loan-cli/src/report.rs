//! Rendering calculator results as text or JSON.

use std::fmt::{self, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use loan_core::calculations::calculators::{
    InterestResult, MaintenanceResult, PartYearResult, PayeResult, PeriodDeduction, PlanRepayment,
    RepaymentResult, SalarySacrificeResult,
};
use loan_core::glossary::GlossaryTerm;
use loan_core::{TaxYear, TaxYearConfig};
use serde::{Deserialize, Serialize};

use crate::utils::{format_money, format_percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// A result that can be printed for a person to read.
pub trait TextReport {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result;
}

/// A report together with the tax year it was calculated for, if any.
#[derive(Debug, Serialize)]
pub struct Report<'a, T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_year: Option<TaxYear>,
    pub result: &'a T,
}

pub fn render<T: Serialize + TextReport>(
    tax_year: Option<TaxYear>,
    result: &T,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&Report { tax_year, result })
            .context("failed to serialise report"),
        OutputFormat::Text => {
            let mut out = String::new();
            if let Some(year) = tax_year {
                writeln!(out, "Tax year {year}")?;
            }
            result.write_text(&mut out)?;
            Ok(out)
        }
    }
}

fn row(
    out: &mut String,
    label: &str,
    value: impl fmt::Display,
) -> fmt::Result {
    writeln!(out, "  {label:<34} {value}")
}

fn flag(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn write_plan_repayment(
    out: &mut String,
    repayment: &PlanRepayment,
) -> fmt::Result {
    writeln!(out, "{}", repayment.plan)?;
    row(out, "Income above threshold", format_money(repayment.income_above_threshold))?;
    row(out, "Annual repayment", format_money(repayment.annual_repayment))?;
    row(out, "Monthly repayment", format_money(repayment.monthly_repayment))?;
    row(out, "Weekly repayment", format_money(repayment.weekly_repayment))?;
    row(out, "Interest rate", format_percent(repayment.interest_rate))?;

    let projection = &repayment.projection;
    row(out, "Total repaid", format_money(projection.total_repaid))?;
    row(out, "Total interest", format_money(projection.total_interest))?;
    match projection.payoff_month {
        Some(month) => row(
            out,
            "Paid off",
            format!("month {month} ({} years {} months)", month / 12, month % 12),
        )?,
        None => row(out, "Written off", format_money(projection.written_off))?,
    }
    Ok(())
}

impl TextReport for RepaymentResult {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        row(out, "Salary", format_money(self.salary))?;
        write_plan_repayment(out, &self.primary)?;
        if let Some(pg) = &self.postgraduate {
            write_plan_repayment(out, pg)?;
            writeln!(out, "Combined")?;
            row(out, "Annual repayment", format_money(self.total_annual_repayment))?;
            row(out, "Monthly repayment", format_money(self.total_monthly_repayment))?;
        }
        if self.critical_warning {
            writeln!(out, "WARNING: the balance grows in the first year despite repayments")?;
        }
        Ok(())
    }
}

impl TextReport for PeriodDeduction {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        writeln!(out, "{} ({} pay)", self.plan, self.frequency)?;
        row(out, "Pay", format_money(self.pay))?;
        row(out, "Threshold", format_money(self.threshold))?;
        row(out, "Above threshold", format_money(self.income_above_threshold))?;
        row(out, "Deduction", format_money(self.deduction))
    }
}

impl TextReport for PayeResult {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        for plan in &self.plans {
            let aggregation = &plan.aggregation;
            writeln!(out, "{}", plan.plan)?;
            for group in &aggregation.groups {
                let employer = group.employer.as_deref().unwrap_or("(no employer)");
                writeln!(
                    out,
                    "  {employer}: {} {} pay against {}, deducting {} a period",
                    format_money(group.combined_period_pay),
                    group.frequency,
                    format_money(group.period_threshold),
                    format_money(group.period_deduction),
                )?;
            }
            for job in &aggregation.jobs {
                writeln!(
                    out,
                    "    {:<30} {} a year, {} deducted",
                    job.label,
                    format_money(job.annual_income),
                    format_money(job.annual_deduction),
                )?;
            }
            row(out, "Total annual income", format_money(aggregation.total_annual_income))?;
            row(out, "Collected through PAYE", format_money(aggregation.paye_collected))?;
            row(out, "Owed on total income", format_money(aggregation.true_liability))?;
            row(out, "Underpayment", format_money(aggregation.underpayment))?;
            if !aggregation.overcollected.is_zero() {
                row(out, "Overcollected", format_money(aggregation.overcollected))?;
            }
        }
        row(out, "Self Assessment required", flag(self.requires_self_assessment))
    }
}

impl TextReport for PartYearResult {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        writeln!(out, "{}", self.plan)?;
        writeln!(
            out,
            "  {:<16} {:>10} {:>10} {:>10} {:>12}",
            "Month", "Income", "Deduction", "Interest", "Balance"
        )?;
        for month in &self.months {
            let entry = &month.breakdown;
            writeln!(
                out,
                "  {:<16} {:>10} {:>10} {:>10} {:>12}",
                month.label,
                if entry.employed { format_money(entry.income) } else { "break".to_string() },
                format_money(entry.deduction),
                format_money(entry.interest),
                format_money(entry.balance_end_of_month),
            )?;
        }
        row(out, "Annual income", format_money(self.annual_income))?;
        row(out, "Deducted through PAYE", format_money(self.paye_deductions))?;
        row(out, "Owed on annual income", format_money(self.annual_liability))?;
        row(out, "Eligible for refund", flag(self.eligible_for_refund))?;
        if self.eligible_for_refund {
            row(out, "Refund", format_money(self.refund_amount))?;
        }
        row(out, "Months on break", self.months_on_break)?;
        row(out, "Interest while on break", format_money(self.additional_interest_from_break))?;
        row(out, "Write-off delay (approx.)", format!("{} months", self.write_off_impact_months))
    }
}

impl TextReport for SalarySacrificeResult {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        writeln!(out, "  {:<22} {:>14} {:>14} {:>12}", "", "Before", "After", "Saving")?;
        let lines = [
            ("Salary", self.before.salary, self.after.salary, None),
            ("Student loan", self.before.student_loan, self.after.student_loan, Some(self.student_loan_saving)),
            ("Postgraduate loan", self.before.postgraduate_loan, self.after.postgraduate_loan, Some(self.postgraduate_saving)),
            ("Income tax", self.before.income_tax, self.after.income_tax, Some(self.income_tax_saving)),
            ("National Insurance", self.before.national_insurance, self.after.national_insurance, Some(self.national_insurance_saving)),
            ("Take-home pay", self.before.take_home, self.after.take_home, None),
        ];
        for (label, before, after, saving) in lines {
            writeln!(
                out,
                "  {:<22} {:>14} {:>14} {:>12}",
                label,
                format_money(before),
                format_money(after),
                saving.map(format_money).unwrap_or_default(),
            )?;
        }
        writeln!(out, "Income tax by band")?;
        let bands = self
            .before
            .income_tax_bands
            .iter()
            .zip(&self.after.income_tax_bands);
        for (before, after) in bands {
            let from = format_money(before.min_income);
            let rate = format_percent(before.rate);
            let band = match before.max_income {
                Some(max) => format!("{from} to {} at {rate}", format_money(max)),
                None => format!("over {from} at {rate}"),
            };
            writeln!(
                out,
                "  {:<36} {:>12} {:>12}",
                band,
                format_money(before.charge),
                format_money(after.charge),
            )?;
        }
        row(out, "Total saving", format_money(self.total_saving))?;
        row(out, "Net cost of sacrifice", format_money(self.net_cost))?;
        if self.critical_warning {
            writeln!(out, "WARNING: the sacrifice is larger than the gross salary")?;
        }
        Ok(())
    }
}

impl TextReport for MaintenanceResult {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        writeln!(out, "{}, {}", self.region, self.living)?;
        row(out, "Household income", format_money(self.household_income))?;
        row(out, "Maintenance loan", format_money(self.annual_amount))?;
        row(out, "Maximum loan", format_money(self.max_amount))?;
        row(out, "Reduction for income", format_money(self.reduction))?;
        for instalment in &self.instalments {
            row(
                out,
                &format!("Term {} ({})", instalment.term, format_percent(instalment.share.round_dp(4))),
                format_money(instalment.amount),
            )?;
        }
        Ok(())
    }
}

impl TextReport for InterestResult {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        row(out, "Balance", format_money(self.balance))?;
        row(out, "Annual income", format_money(self.annual_income))?;
        row(out, "Plan 2 rate at this income", format_percent(self.plan2_rate))?;
        for plan in &self.plans {
            writeln!(
                out,
                "  {:<20} {:>8}  {} this month, {} over a year",
                plan.plan.label(),
                format_percent(plan.annual_rate),
                format_money(plan.monthly_interest),
                format_money(plan.first_year_interest),
            )?;
        }
        Ok(())
    }
}

/// Glossary lookups print every matching term.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct GlossaryReport(pub Vec<&'static GlossaryTerm>);

impl TextReport for GlossaryReport {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(out, "No matching terms.");
        }
        for term in &self.0 {
            writeln!(out, "{}", term.title)?;
            writeln!(out, "  {}", term.definition)?;
            writeln!(out, "  tags: {}", term.tags.join(", "))?;
        }
        Ok(())
    }
}

/// The tax years a reference source holds, with their plan thresholds.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct YearsReport(pub Vec<TaxYearConfig>);

impl TextReport for YearsReport {
    fn write_text(
        &self,
        out: &mut String,
    ) -> fmt::Result {
        for config in &self.0 {
            writeln!(out, "{}", config.tax_year)?;
            for plan in &config.plans {
                writeln!(
                    out,
                    "  {:<20} {:>10} a year  {:>9} a month  {:>7} a week  {:>4}",
                    plan.name(),
                    format_money(plan.annual_threshold),
                    format_money(plan.monthly_threshold),
                    format_money(plan.weekly_threshold),
                    format_percent(plan.repayment_rate),
                )?;
            }
        }
        Ok(())
    }
}
