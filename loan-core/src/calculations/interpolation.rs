//! Piecewise-linear lookup over tabulated income bands.

use rust_decimal::Decimal;

use crate::models::IncomeBand;

/// Amount for `income` on the curve through `bands`.
///
/// `bands` must be sorted by ascending income with non-increasing amounts
/// (see [`MaintenanceTable::validate`](crate::models::MaintenanceTable::validate)).
/// Below the first breakpoint the first amount applies, above the last the
/// last amount applies, and in between the amount is interpolated on the
/// half-open interval `[lo, hi)` that contains `income`. An empty table
/// yields zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use loan_core::calculations::interpolation::interpolate;
/// use loan_core::models::IncomeBand;
///
/// let bands = [
///     IncomeBand::new(dec!(35000), dec!(7387)),
///     IncomeBand::new(dec!(40000), dec!(6642)),
/// ];
///
/// assert_eq!(interpolate(&bands, dec!(40000)), dec!(6642));
/// assert_eq!(interpolate(&bands, dec!(37500)), dec!(7014.5));
/// ```
pub fn interpolate(
    bands: &[IncomeBand],
    income: Decimal,
) -> Decimal {
    let (Some(first), Some(last)) = (bands.first(), bands.last()) else {
        return Decimal::ZERO;
    };
    if income <= first.income {
        return first.amount;
    }
    if income >= last.income {
        return last.amount;
    }

    bands
        .windows(2)
        .find(|pair| pair[0].income <= income && income < pair[1].income)
        .map_or(last.amount, |pair| {
            let (lo, hi) = (pair[0], pair[1]);
            let position = (income - lo.income) / (hi.income - lo.income);
            lo.amount - position * (lo.amount - hi.amount)
        })
}
