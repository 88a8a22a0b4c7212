//! Reference tables shipped with the crate.
//!
//! Figures follow the published Student Loans Company, HMRC and funding-body
//! tables for each year. Maintenance tables for Scotland, Wales and Northern
//! Ireland are simplified to a single linear taper between the income at
//! which support starts to reduce and the income at which it bottoms out.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    BracketKind, IncomeBand, LivingSituation, LoanPlan, MaintenanceTable, Plan2InterestConfig,
    PlanId, Region, TaxBracket, TaxYear, TaxYearConfig,
};

/// Every built-in tax year, oldest first.
pub fn all() -> Vec<TaxYearConfig> {
    vec![tax_year_2024(), tax_year_2025()]
}

/// Tax year 2024/25.
pub fn tax_year_2024() -> TaxYearConfig {
    TaxYearConfig {
        tax_year: TaxYear(2024),
        plans: vec![
            plan(PlanId::Plan1, dec!(24990), dec!(2082), dec!(480), dec!(0.09), 25, dec!(0.043)),
            plan(PlanId::Plan2, dec!(27295), dec!(2274), dec!(524), dec!(0.09), 30, dec!(0.073)),
            plan(PlanId::Plan4, dec!(31395), dec!(2616), dec!(603), dec!(0.09), 30, dec!(0.043)),
            plan(PlanId::Plan5, dec!(25000), dec!(2083), dec!(480), dec!(0.09), 40, dec!(0.043)),
            plan(PlanId::Postgraduate, dec!(21000), dec!(1750), dec!(403), dec!(0.06), 30, dec!(0.073)),
        ],
        income_tax: income_tax_rest_of_uk(),
        national_insurance: class1_employee_ni(),
        plan2_interest: Plan2InterestConfig {
            lower_threshold: dec!(27295),
            upper_threshold: dec!(49130),
            rpi: dec!(0.043),
            max_premium: dec!(0.03),
        },
        maintenance: vec![
            table(Region::England, LivingSituation::AtHome, &[
                (dec!(25000), dec!(8610)),
                (dec!(30000), dec!(7865)),
                (dec!(35000), dec!(7120)),
                (dec!(40000), dec!(6375)),
                (dec!(45000), dec!(5630)),
                (dec!(50000), dec!(4885)),
                (dec!(56410), dec!(3930)),
            ]),
            table(Region::England, LivingSituation::AwayOther, &[
                (dec!(25000), dec!(10227)),
                (dec!(30000), dec!(9482)),
                (dec!(35000), dec!(8737)),
                (dec!(40000), dec!(7992)),
                (dec!(45000), dec!(7247)),
                (dec!(50000), dec!(6502)),
                (dec!(55000), dec!(5757)),
                (dec!(61645), dec!(4767)),
            ]),
            table(Region::England, LivingSituation::AwayLondon, &[
                (dec!(25000), dec!(13348)),
                (dec!(30000), dec!(12603)),
                (dec!(35000), dec!(11858)),
                (dec!(40000), dec!(11113)),
                (dec!(45000), dec!(10368)),
                (dec!(50000), dec!(9623)),
                (dec!(55000), dec!(8878)),
                (dec!(60000), dec!(8133)),
                (dec!(65000), dec!(7388)),
                (dec!(69975), dec!(6647)),
            ]),
            linear(Region::Scotland, LivingSituation::AtHome, (dec!(21000), dec!(10000)), (dec!(34000), dec!(9000))),
            linear(Region::Scotland, LivingSituation::AwayOther, (dec!(21000), dec!(10000)), (dec!(34000), dec!(9000))),
            linear(Region::Scotland, LivingSituation::AwayLondon, (dec!(21000), dec!(10000)), (dec!(34000), dec!(9000))),
            linear(Region::Wales, LivingSituation::AtHome, (dec!(18370), dec!(11720)), (dec!(59200), dec!(9720))),
            linear(Region::Wales, LivingSituation::AwayOther, (dec!(18370), dec!(13940)), (dec!(59200), dec!(11940))),
            linear(Region::Wales, LivingSituation::AwayLondon, (dec!(18370), dec!(17400)), (dec!(59200), dec!(15400))),
            linear(Region::NorthernIreland, LivingSituation::AtHome, (dec!(19203), dec!(4840)), (dec!(41065), dec!(3750))),
            linear(Region::NorthernIreland, LivingSituation::AwayOther, (dec!(19203), dec!(5250)), (dec!(41065), dec!(4090))),
            linear(Region::NorthernIreland, LivingSituation::AwayLondon, (dec!(19203), dec!(7304)), (dec!(41065), dec!(6015))),
        ],
    }
}

/// Tax year 2025/26.
pub fn tax_year_2025() -> TaxYearConfig {
    TaxYearConfig {
        tax_year: TaxYear(2025),
        plans: vec![
            plan(PlanId::Plan1, dec!(26065), dec!(2172), dec!(501), dec!(0.09), 25, dec!(0.032)),
            plan(PlanId::Plan2, dec!(28470), dec!(2373), dec!(547), dec!(0.09), 30, dec!(0.062)),
            plan(PlanId::Plan4, dec!(32745), dec!(2728), dec!(629), dec!(0.09), 30, dec!(0.032)),
            plan(PlanId::Plan5, dec!(25000), dec!(2083), dec!(480), dec!(0.09), 40, dec!(0.032)),
            plan(PlanId::Postgraduate, dec!(21000), dec!(1750), dec!(403), dec!(0.06), 30, dec!(0.062)),
        ],
        income_tax: income_tax_rest_of_uk(),
        national_insurance: class1_employee_ni(),
        plan2_interest: Plan2InterestConfig {
            lower_threshold: dec!(28470),
            upper_threshold: dec!(51245),
            rpi: dec!(0.032),
            max_premium: dec!(0.03),
        },
        maintenance: vec![
            table(Region::England, LivingSituation::AtHome, &[
                (dec!(25000), dec!(8877)),
                (dec!(30000), dec!(8132)),
                (dec!(35000), dec!(7387)),
                (dec!(40000), dec!(6642)),
                (dec!(45000), dec!(5897)),
                (dec!(50000), dec!(5152)),
                (dec!(55000), dec!(4407)),
                (dec!(57500), dec!(4035)),
            ]),
            table(Region::England, LivingSituation::AwayOther, &[
                (dec!(25000), dec!(10544)),
                (dec!(30000), dec!(9799)),
                (dec!(35000), dec!(9054)),
                (dec!(40000), dec!(8309)),
                (dec!(45000), dec!(7564)),
                (dec!(50000), dec!(6819)),
                (dec!(55000), dec!(6074)),
                (dec!(62780), dec!(4915)),
            ]),
            table(Region::England, LivingSituation::AwayLondon, &[
                (dec!(25000), dec!(13762)),
                (dec!(30000), dec!(13017)),
                (dec!(35000), dec!(12272)),
                (dec!(40000), dec!(11527)),
                (dec!(45000), dec!(10782)),
                (dec!(50000), dec!(10037)),
                (dec!(55000), dec!(9292)),
                (dec!(60000), dec!(8547)),
                (dec!(65000), dec!(7802)),
                (dec!(70000), dec!(7057)),
                (dec!(71310), dec!(6862)),
            ]),
            linear(Region::Scotland, LivingSituation::AtHome, (dec!(21000), dec!(10000)), (dec!(34000), dec!(9000))),
            linear(Region::Scotland, LivingSituation::AwayOther, (dec!(21000), dec!(10000)), (dec!(34000), dec!(9000))),
            linear(Region::Scotland, LivingSituation::AwayLondon, (dec!(21000), dec!(10000)), (dec!(34000), dec!(9000))),
            linear(Region::Wales, LivingSituation::AtHome, (dec!(18370), dec!(12150)), (dec!(59200), dec!(10150))),
            linear(Region::Wales, LivingSituation::AwayOther, (dec!(18370), dec!(14480)), (dec!(59200), dec!(12480))),
            linear(Region::Wales, LivingSituation::AwayLondon, (dec!(18370), dec!(18080)), (dec!(59200), dec!(16080))),
            linear(Region::NorthernIreland, LivingSituation::AtHome, (dec!(19203), dec!(4990)), (dec!(41540), dec!(3875))),
            linear(Region::NorthernIreland, LivingSituation::AwayOther, (dec!(19203), dec!(5410)), (dec!(41540), dec!(4215))),
            linear(Region::NorthernIreland, LivingSituation::AwayLondon, (dec!(19203), dec!(7530)), (dec!(41540), dec!(6200))),
        ],
    }
}

fn plan(
    plan: PlanId,
    annual: Decimal,
    monthly: Decimal,
    weekly: Decimal,
    rate: Decimal,
    write_off_years: u32,
    interest: Decimal,
) -> LoanPlan {
    LoanPlan {
        plan,
        annual_threshold: annual,
        monthly_threshold: monthly,
        weekly_threshold: weekly,
        repayment_rate: rate,
        write_off_years,
        interest_rate: interest,
    }
}

// England, Wales and Northern Ireland bands; personal allowance taper ignored.
fn income_tax_rest_of_uk() -> Vec<TaxBracket> {
    vec![
        bracket(BracketKind::IncomeTax, dec!(0), Some(dec!(12570)), dec!(0)),
        bracket(BracketKind::IncomeTax, dec!(12570), Some(dec!(50270)), dec!(0.20)),
        bracket(BracketKind::IncomeTax, dec!(50270), Some(dec!(125140)), dec!(0.40)),
        bracket(BracketKind::IncomeTax, dec!(125140), None, dec!(0.45)),
    ]
}

fn class1_employee_ni() -> Vec<TaxBracket> {
    vec![
        bracket(BracketKind::NationalInsurance, dec!(0), Some(dec!(12570)), dec!(0)),
        bracket(BracketKind::NationalInsurance, dec!(12570), Some(dec!(50270)), dec!(0.08)),
        bracket(BracketKind::NationalInsurance, dec!(50270), None, dec!(0.02)),
    ]
}

fn bracket(
    kind: BracketKind,
    min: Decimal,
    max: Option<Decimal>,
    rate: Decimal,
) -> TaxBracket {
    TaxBracket {
        kind,
        min_income: min,
        max_income: max,
        rate,
    }
}

fn table(
    region: Region,
    living: LivingSituation,
    points: &[(Decimal, Decimal)],
) -> MaintenanceTable {
    MaintenanceTable {
        region,
        living,
        bands: points
            .iter()
            .map(|&(income, amount)| IncomeBand::new(income, amount))
            .collect(),
    }
}

fn linear(
    region: Region,
    living: LivingSituation,
    full: (Decimal, Decimal),
    floor: (Decimal, Decimal),
) -> MaintenanceTable {
    table(region, living, &[full, floor])
}
