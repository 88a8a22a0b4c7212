//! Reference definitions of student loan terms.
//!
//! The set is static. Lookups are case-insensitive; tags are lowercase.

use serde::Serialize;

use crate::models::PlanId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlossaryTerm {
    pub title: &'static str,
    pub definition: &'static str,
    pub tags: &'static [&'static str],
    /// Plans the term applies to; empty when it applies to all of them.
    pub plans: &'static [PlanId],
}

impl GlossaryTerm {
    pub fn applies_to(
        &self,
        plan: PlanId,
    ) -> bool {
        self.plans.is_empty() || self.plans.contains(&plan)
    }

    pub fn has_tag(
        &self,
        tag: &str,
    ) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag.trim()))
    }
}

const TERMS: &[GlossaryTerm] = &[
    GlossaryTerm {
        title: "Repayment threshold",
        definition: "The income level above which student loan repayments are due. Repayments are a fixed percentage of income above it, assessed per pay period through payroll and per year through Self Assessment.",
        tags: &["repayment", "threshold"],
        plans: &[],
    },
    GlossaryTerm {
        title: "Repayment rate",
        definition: "The share of income above the threshold that is repaid: 9% for undergraduate plans and 6% for the Postgraduate loan.",
        tags: &["repayment"],
        plans: &[],
    },
    GlossaryTerm {
        title: "PAYE",
        definition: "Pay As You Earn. Employers deduct tax, National Insurance and student loan repayments from each payslip, treating every pay period on its own.",
        tags: &["paye", "employment"],
        plans: &[],
    },
    GlossaryTerm {
        title: "Non-cumulative deduction",
        definition: "Student loan deductions look only at the current pay period. Low-paid months do not offset high-paid months, so deductions can be taken in a year whose total income is below the annual threshold.",
        tags: &["paye", "refund"],
        plans: &[],
    },
    GlossaryTerm {
        title: "Refund",
        definition: "Money returned when more was deducted than was owed on annual income, for example after a part-year of employment or after the loan was cleared.",
        tags: &["refund"],
        plans: &[],
    },
    GlossaryTerm {
        title: "Self Assessment",
        definition: "The annual tax return. Borrowers with several jobs or untaxed income settle any student loan repayment their payroll deductions missed through it.",
        tags: &["paye", "self-assessment"],
        plans: &[],
    },
    GlossaryTerm {
        title: "Write-off",
        definition: "Cancellation of any remaining balance a fixed number of years after repayments became due. The period depends on the plan.",
        tags: &["write-off"],
        plans: &[],
    },
    GlossaryTerm {
        title: "RPI",
        definition: "Retail Prices Index, the inflation measure used to set student loan interest rates.",
        tags: &["interest"],
        plans: &[],
    },
    GlossaryTerm {
        title: "Income-linked interest",
        definition: "Plan 2 interest runs from RPI at or below the lower income threshold to RPI plus 3% at or above the upper threshold, rising in a straight line between them.",
        tags: &["interest"],
        plans: &[PlanId::Plan2],
    },
    GlossaryTerm {
        title: "Plan 1",
        definition: "Loans for students who started in England or Wales before September 2012, and for students from Northern Ireland.",
        tags: &["plans"],
        plans: &[PlanId::Plan1],
    },
    GlossaryTerm {
        title: "Plan 2",
        definition: "Loans for students from England or Wales who started between September 2012 and July 2023.",
        tags: &["plans"],
        plans: &[PlanId::Plan2],
    },
    GlossaryTerm {
        title: "Plan 4",
        definition: "Loans for students from Scotland.",
        tags: &["plans"],
        plans: &[PlanId::Plan4],
    },
    GlossaryTerm {
        title: "Plan 5",
        definition: "Loans for students from England who started on or after 1 August 2023, written off after 40 years.",
        tags: &["plans", "write-off"],
        plans: &[PlanId::Plan5],
    },
    GlossaryTerm {
        title: "Postgraduate loan",
        definition: "Master's and doctoral loans, repaid at 6% above their own threshold and at the same time as any undergraduate plan.",
        tags: &["plans", "repayment"],
        plans: &[PlanId::Postgraduate],
    },
    GlossaryTerm {
        title: "Salary sacrifice",
        definition: "An agreement to give up part of contractual salary in exchange for a benefit such as a pension contribution. The lower salary is what payroll deductions are calculated on.",
        tags: &["salary-sacrifice", "employment"],
        plans: &[],
    },
    GlossaryTerm {
        title: "Maintenance loan",
        definition: "A loan towards living costs while studying. The amount falls as household income rises and depends on where the student lives.",
        tags: &["maintenance"],
        plans: &[],
    },
    GlossaryTerm {
        title: "Household income",
        definition: "The income used to means-test a maintenance loan, usually the student's parents' or partner's income.",
        tags: &["maintenance"],
        plans: &[],
    },
    GlossaryTerm {
        title: "Underpayment",
        definition: "The gap between what is owed on total annual income and what payroll deducted. It arises when several jobs are each below the per-period threshold.",
        tags: &["paye", "self-assessment"],
        plans: &[],
    },
];

pub fn terms() -> &'static [GlossaryTerm] {
    TERMS
}

/// The term with `title`, ignoring case.
pub fn find(title: &str) -> Option<&'static GlossaryTerm> {
    let title = title.trim();
    TERMS.iter().find(|t| t.title.eq_ignore_ascii_case(title))
}

pub fn with_tag(tag: &str) -> Vec<&'static GlossaryTerm> {
    TERMS.iter().filter(|t| t.has_tag(tag)).collect()
}

/// Terms that apply to `plan`, including those that apply to every plan.
pub fn for_plan(plan: PlanId) -> Vec<&'static GlossaryTerm> {
    TERMS.iter().filter(|t| t.applies_to(plan)).collect()
}

/// Every tag in use, sorted.
pub fn tags() -> Vec<&'static str> {
    let mut tags: Vec<&'static str> = TERMS.iter().flat_map(|t| t.tags.iter().copied()).collect();
    tags.sort_unstable();
    tags.dedup();
    tags
}
