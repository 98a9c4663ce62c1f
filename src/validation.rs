//! range checks on a typed [`LoanInput`].
//!
//! every rule runs; nothing short-circuits. the caller gets the full set of
//! field messages and decides whether to block the calculation.

use log::warn;

use crate::config::LoanInput;
use crate::decimal::{Money, Rate};
use crate::errors::{FieldErrors, LoanField};

/// range rules over whichever values are known
///
/// a `None` field skips its own rules. the down payment ceiling needs both
/// amounts.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RangeCheck {
    pub loan_balance: Option<Money>,
    pub down_payment: Option<Money>,
    pub interest_rate: Option<Rate>,
    pub arrangement_fee_rate: Option<Rate>,
    pub property_insurance_rate: Option<Rate>,
    pub loan_term_months: Option<u32>,
}

impl RangeCheck {
    pub fn violations(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.loan_balance.is_some_and(|balance| !balance.is_positive()) {
            errors.insert(LoanField::LoanBalance, "loan balance must be greater than 0");
        }

        if self.interest_rate.is_some_and(|rate| !rate.is_positive()) {
            errors.insert(LoanField::InterestRate, "interest rate must be greater than 0");
        }

        if self.down_payment.is_some_and(|down| down.is_negative()) {
            errors.insert(LoanField::DownPayment, "down payment cannot be negative");
        }

        // overrides the negative message when both apply
        if let (Some(down), Some(balance)) = (self.down_payment, self.loan_balance) {
            if down >= balance {
                errors.insert(LoanField::DownPayment, "down payment cannot exceed loan amount");
            }
        }

        if self.arrangement_fee_rate.is_some_and(|rate| rate.is_negative()) {
            errors.insert(
                LoanField::ArrangementFeeRate,
                "arrangement fee rate cannot be negative",
            );
        }

        if self.property_insurance_rate.is_some_and(|rate| rate.is_negative()) {
            errors.insert(
                LoanField::PropertyInsuranceRate,
                "property insurance rate cannot be negative",
            );
        }

        if self.loan_term_months == Some(0) {
            errors.insert(LoanField::LoanTerm, "loan term must be greater than 0");
        }

        errors
    }
}

impl From<&LoanInput> for RangeCheck {
    fn from(input: &LoanInput) -> Self {
        RangeCheck {
            loan_balance: Some(input.loan_balance),
            down_payment: Some(input.down_payment),
            interest_rate: Some(input.interest_rate),
            arrangement_fee_rate: Some(input.arrangement_fee_rate),
            property_insurance_rate: Some(input.property_insurance_rate),
            loan_term_months: Some(input.loan_term_months),
        }
    }
}

/// collect every field-level violation of `input`
pub fn validate(input: &LoanInput) -> Result<(), FieldErrors> {
    let errors = RangeCheck::from(input).violations();

    if !errors.is_empty() {
        warn!("loan input rejected: {}", errors);
    }

    errors.into_result()
}
