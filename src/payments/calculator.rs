use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};

/// level payment that amortizes `principal` over `total_periods`
///
/// standard annuity formula `P * r * (1 + r)^n / ((1 + r)^n - 1)`. a zero rate
/// falls back to straight-line `P / n`. zero periods, overflow, or a vanishing
/// denominator are reported as computation errors, never as a zero payment.
pub fn compute_payment(principal: Money, monthly_rate: Rate, total_periods: u32) -> Result<Money> {
    if total_periods == 0 {
        return Err(LoanError::computation(
            "payment requested for zero periods",
        ));
    }

    let n = Decimal::from(total_periods);

    if monthly_rate.is_zero() {
        return principal
            .checked_div(n)
            .ok_or_else(|| LoanError::computation("straight-line payment overflowed"));
    }

    let r = monthly_rate.as_decimal();
    let compound = compound_factor(r, total_periods)?;

    let numerator = principal
        .as_decimal()
        .checked_mul(r)
        .and_then(|x| x.checked_mul(compound))
        .ok_or_else(|| LoanError::computation("payment numerator overflowed"))?;
    let denominator = compound - Decimal::ONE;

    numerator
        .checked_div(denominator)
        .map(Money::from_decimal)
        .ok_or_else(|| {
            LoanError::computation(format!(
                "annuity denominator not usable for rate {} over {} periods",
                r, total_periods
            ))
        })
}

/// (1 + r)^n by repeated multiplication
fn compound_factor(r: Decimal, n: u32) -> Result<Decimal> {
    let base = Decimal::ONE + r;
    let mut compound = Decimal::ONE;
    for _ in 0..n {
        compound = compound
            .checked_mul(base)
            .ok_or_else(|| LoanError::computation("compound factor overflowed"))?;
    }
    Ok(compound)
}
