//! the amortization engine: `LoanInput -> AmortizationResult`.
//!
//! validation, payment, schedule and totals in one pass. no state survives a
//! call, so one engine can serve any number of callers at once.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, LoanInput};
use crate::decimal::Money;
use crate::errors::Result;
use crate::payments::{compute_payment, generate_schedule, ScheduleTerms};
use crate::types::ScheduleRow;
use crate::validation::validate;

/// outcome of one calculation, never mutated after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// level payment per regular period
    pub periodic_payment: Money,
    /// all regular payments plus one-time charges
    pub total_payment: Money,
    /// all regular payments less principal
    pub total_interest: Money,
    pub principal: Money,
    pub arrangement_fee: Money,
    pub property_insurance: Money,
    pub schedule: Vec<ScheduleRow>,
}

impl AmortizationResult {
    /// regular payment rows, fee row excluded
    pub fn regular_rows(&self) -> impl Iterator<Item = &ScheduleRow> {
        self.schedule.iter().filter(|row| row.is_regular())
    }

    pub fn fee_row(&self) -> Option<&ScheduleRow> {
        self.schedule.first().filter(|row| row.is_initial_fee)
    }

    pub fn period_count(&self) -> usize {
        self.regular_rows().count()
    }

    pub fn final_balance(&self) -> Option<Money> {
        self.regular_rows().last().map(|row| row.balance)
    }
}

/// amortization engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmortizationEngine {
    config: EngineConfig,
}

impl AmortizationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// validate `input` and compute its full amortization
    pub fn calculate(&self, input: LoanInput) -> Result<AmortizationResult> {
        validate(&input)?;

        let principal = input.principal();
        let monthly_rate = input.monthly_rate();
        let total_periods = input.loan_term_months;

        debug!(
            "calculating {} periods on principal {} at {} ({})",
            total_periods, principal, input.interest_rate, input.payment_frequency
        );

        let payment = compute_payment(principal, monthly_rate, total_periods)?;

        let terms = ScheduleTerms {
            principal,
            monthly_rate,
            total_periods,
            payment,
            first_date: input.first_payment_date,
            arrangement_fee_rate: input.arrangement_fee_rate,
            property_insurance_rate: input.property_insurance_rate,
        };
        let schedule = generate_schedule(&terms, &input.payment_frequency, self.config.display_scale)?;

        let result = AmortizationResult {
            periodic_payment: payment.round_dp(self.config.display_scale),
            total_payment: schedule.total_payment,
            total_interest: schedule.total_interest,
            principal: schedule.principal,
            arrangement_fee: schedule.fees.arrangement_fee,
            property_insurance: schedule.fees.property_insurance,
            schedule: schedule.rows,
        };

        debug!(
            "periodic payment {}, total payment {}, total interest {}",
            result.periodic_payment, result.total_payment, result.total_interest
        );

        Ok(result)
    }
}

/// calculate with default settings
pub fn calculate(input: LoanInput) -> Result<AmortizationResult> {
    AmortizationEngine::default().calculate(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::errors::{LoanError, LoanField};
    use crate::types::PaymentFrequency;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn first_of_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_twelve_month_loan_at_one_percent_monthly() {
        let input = LoanInput::new(
            Money::from_major(100_000),
            Rate::from_percentage(dec!(12)),
            12,
            first_of_2025(),
        );

        let result = calculate(input).unwrap();

        assert_eq!(result.periodic_payment.to_string(), "8884.88");
        assert_eq!(result.period_count(), 12);
        assert_eq!(result.final_balance().unwrap().to_string(), "0.00");
        assert!(result.fee_row().is_none());
        assert!((result.total_interest - Money::from_decimal(dec!(6618.56))).abs() <= Money::CENT);
        assert_eq!(result.total_payment, result.principal + result.total_interest);
    }

    #[test]
    fn test_fees_and_down_payment() {
        let input = LoanInput::builder()
            .loan_balance(Money::from_major(60_000))
            .down_payment(Money::from_major(10_000))
            .interest_rate(Rate::from_percentage(dec!(6)))
            .arrangement_fee_rate(Rate::from_percentage(dec!(1)))
            .property_insurance_rate(Rate::from_percentage(dec!(0.5)))
            .term_years(2)
            .first_payment_date(first_of_2025())
            .build()
            .unwrap();

        let result = calculate(input).unwrap();

        assert_eq!(result.principal, Money::from_major(50_000));
        assert_eq!(result.arrangement_fee.to_string(), "500.00");
        assert_eq!(result.property_insurance.to_string(), "250.00");
        assert_eq!(result.periodic_payment.to_string(), "2216.03");

        let fee_row = result.fee_row().unwrap();
        assert_eq!(fee_row.payment.to_string(), "750.00");
        assert_eq!(fee_row.balance.to_string(), "50000.00");
        assert_eq!(result.schedule.len(), 25);

        assert_eq!(
            result.total_interest,
            result.total_payment - result.arrangement_fee - result.property_insurance - result.principal
        );
    }

    #[test]
    fn test_validation_blocks_computation() {
        let input = LoanInput {
            down_payment: Money::from_major(100_000),
            ..LoanInput::new(
                Money::from_major(100_000),
                Rate::from_percentage(dec!(12)),
                12,
                first_of_2025(),
            )
        };

        let err = calculate(input).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(
            errors.get(LoanField::DownPayment),
            Some("down payment cannot exceed loan amount")
        );
    }

    #[test]
    fn test_unschedulable_dates_are_computation_errors() {
        let input = LoanInput::new(
            Money::from_major(1_000),
            Rate::from_percentage(dec!(5)),
            24,
            NaiveDate::MAX,
        );

        let err = calculate(input).unwrap_err();
        assert!(matches!(err, LoanError::Computation { .. }));
        assert_eq!(err.to_string(), "error calculating mortgage details");
    }

    #[test]
    fn test_oversized_fee_is_a_computation_error() {
        let input = LoanInput {
            arrangement_fee_rate: Rate::from_percentage(dec!(10000)),
            ..LoanInput::new(
                Money::from_decimal(Decimal::from_i128_with_scale(10_i128.pow(27), 0)),
                Rate::from_percentage(dec!(12)),
                12,
                first_of_2025(),
            )
        };

        let err = calculate(input).unwrap_err();
        assert!(matches!(err, LoanError::Computation { .. }));
        assert_eq!(err.to_string(), "error calculating mortgage details");
    }

    #[test]
    fn test_echoed_principal_is_rounded() {
        let input = LoanInput::new(
            Money::from_decimal(dec!(1000.005)),
            Rate::from_percentage(dec!(12)),
            6,
            first_of_2025(),
        );

        let result = calculate(input).unwrap();
        assert_eq!(result.principal.to_string(), "1000.01");
        assert_eq!(result.total_interest.as_decimal().scale(), 2);
        assert_eq!(result.total_payment, result.principal + result.total_interest);
    }

    #[test]
    fn test_identical_input_gives_identical_result() {
        let input = LoanInput::new(
            Money::from_major(75_000),
            Rate::from_percentage(dec!(4.25)),
            180,
            first_of_2025(),
        )
        .with_frequency(PaymentFrequency::Biweekly);

        let first = calculate(input.clone()).unwrap();
        let second = calculate(input).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_engine_display_scale() {
        let engine = AmortizationEngine::new(EngineConfig { display_scale: 4 });
        let input = LoanInput::new(
            Money::from_major(100_000),
            Rate::from_percentage(dec!(12)),
            12,
            first_of_2025(),
        );

        let result = engine.calculate(input).unwrap();
        assert_eq!(result.periodic_payment.to_string(), "8884.8789");
    }
}
