use chrono::NaiveDate;
use log::{debug, trace};
use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::{FeeBreakdown, PeriodStepper, ScheduleRow};

/// largest scale a decimal can carry
const MAX_DISPLAY_SCALE: u32 = 28;

/// everything the generator needs for one schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTerms {
    pub principal: Money,
    pub monthly_rate: Rate,
    pub total_periods: u32,
    /// full-precision level payment
    pub payment: Money,
    pub first_date: NaiveDate,
    pub arrangement_fee_rate: Rate,
    pub property_insurance_rate: Rate,
}

impl ScheduleTerms {
    /// one-time charges at full precision
    pub fn fees(&self) -> Result<FeeBreakdown> {
        let charge = |rate: Rate, name: &str| {
            self.principal.checked_mul(rate.as_decimal()).ok_or_else(|| {
                LoanError::computation(format!(
                    "{} at {} overflowed on principal {}",
                    name, rate, self.principal
                ))
            })
        };

        Ok(FeeBreakdown {
            arrangement_fee: charge(self.arrangement_fee_rate, "arrangement fee")?,
            property_insurance: charge(self.property_insurance_rate, "property insurance")?,
        })
    }

    fn check(&self, display_scale: u32) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(LoanError::computation(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if self.total_periods == 0 {
            return Err(LoanError::computation("schedule requested for zero periods"));
        }
        if self.monthly_rate.is_negative() {
            return Err(LoanError::computation(format!(
                "negative periodic rate {}",
                self.monthly_rate.as_decimal()
            )));
        }
        if self.arrangement_fee_rate.is_negative() || self.property_insurance_rate.is_negative() {
            return Err(LoanError::computation("negative fee rate"));
        }
        if display_scale > MAX_DISPLAY_SCALE {
            return Err(LoanError::computation(format!(
                "display scale {} exceeds {}",
                display_scale, MAX_DISPLAY_SCALE
            )));
        }
        Ok(())
    }
}

/// generated schedule with its aggregate totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmortizationSchedule {
    pub rows: Vec<ScheduleRow>,
    /// amount amortized, rounded for display
    pub principal: Money,
    /// one-time charges, rounded for display
    pub fees: FeeBreakdown,
    /// level payment times periods, rounded
    pub scheduled_total: Money,
    /// scheduled total plus one-time charges
    pub total_payment: Money,
    /// scheduled total less principal
    pub total_interest: Money,
}

impl AmortizationSchedule {
    /// regular payment rows, fee row excluded
    pub fn regular_rows(&self) -> impl Iterator<Item = &ScheduleRow> {
        self.rows.iter().filter(|row| row.is_regular())
    }

    /// fee row, present only when origination charges are nonzero
    pub fn fee_row(&self) -> Option<&ScheduleRow> {
        self.rows.first().filter(|row| row.is_initial_fee)
    }
}

/// build the period-by-period schedule
///
/// the running balance is carried unclamped at full precision; each emitted row
/// is rounded to `display_scale` and its balance floored at zero.
pub fn generate_schedule(
    terms: &ScheduleTerms,
    stepper: &dyn PeriodStepper,
    display_scale: u32,
) -> Result<AmortizationSchedule> {
    terms.check(display_scale)?;

    let last_step = terms.total_periods - 1;
    if stepper.advance(terms.first_date, last_step).is_none() {
        return Err(LoanError::computation(format!(
            "payment date {} periods after {} is out of range",
            last_step, terms.first_date
        )));
    }

    let round = |m: Money| m.round_dp(display_scale);
    let fees = terms.fees()?;
    let fee_total = fees
        .total()
        .ok_or_else(|| LoanError::computation("one-time charges overflowed"))?;
    let rate = terms.monthly_rate.as_decimal();

    let mut rows = Vec::with_capacity(terms.total_periods as usize + 1);

    if !fees.arrangement_fee.is_zero() || !fees.property_insurance.is_zero() {
        rows.push(ScheduleRow {
            period: 0,
            date: terms.first_date,
            payment: round(fee_total),
            principal_paid: round(Money::ZERO),
            interest: round(Money::ZERO),
            balance: round(terms.principal),
            is_initial_fee: true,
            fee_breakdown: Some(FeeBreakdown {
                arrangement_fee: round(fees.arrangement_fee),
                property_insurance: round(fees.property_insurance),
            }),
        });
    }

    let mut balance = terms.principal;

    for period in 1..=terms.total_periods {
        let interest = balance
            .checked_mul(rate)
            .ok_or_else(|| LoanError::computation(format!("interest overflowed in period {}", period)))?;
        let principal_paid = terms
            .payment
            .checked_sub(interest)
            .ok_or_else(|| LoanError::computation(format!("principal overflowed in period {}", period)))?;
        balance = balance
            .checked_sub(principal_paid)
            .ok_or_else(|| LoanError::computation(format!("balance overflowed in period {}", period)))?;

        let date = stepper.advance(terms.first_date, period - 1).ok_or_else(|| {
            LoanError::computation(format!("payment date for period {} is out of range", period))
        })?;

        trace!(
            "period {}: interest {} principal {} balance {}",
            period,
            interest,
            principal_paid,
            balance
        );

        rows.push(ScheduleRow {
            period,
            date,
            payment: round(terms.payment),
            principal_paid: round(principal_paid),
            interest: round(interest),
            balance: round(balance.non_negative()),
            is_initial_fee: false,
            fee_breakdown: None,
        });
    }

    let fees = FeeBreakdown {
        arrangement_fee: round(fees.arrangement_fee),
        property_insurance: round(fees.property_insurance),
    };
    let scheduled_total = terms
        .payment
        .checked_mul(Decimal::from(terms.total_periods))
        .map(round)
        .ok_or_else(|| LoanError::computation("scheduled total overflowed"))?;
    let principal = round(terms.principal);
    let total_payment = fees
        .total()
        .and_then(|charges| scheduled_total.checked_add(charges))
        .ok_or_else(|| LoanError::computation("total payment overflowed"))?;
    // derived from rounded parts so principal + interest + fees is exact
    let total_interest = scheduled_total
        .checked_sub(principal)
        .ok_or_else(|| LoanError::computation("total interest overflowed"))?;

    debug!(
        "generated {} rows for principal {} (residual balance {})",
        rows.len(),
        terms.principal,
        balance
    );

    Ok(AmortizationSchedule {
        rows,
        principal,
        fees,
        scheduled_total,
        total_payment,
        total_interest,
    })
}
