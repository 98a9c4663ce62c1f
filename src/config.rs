use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate, CENTS_SCALE};
use crate::errors::{LoanError, Result};
use crate::types::{LoanTerm, PaymentFrequency};

/// loan parameters for a single calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanInput {
    /// nominal loan amount before down payment
    pub loan_balance: Money,
    pub down_payment: Money,
    /// nominal annual rate
    pub interest_rate: Rate,
    /// charged once on the principal at origination
    pub arrangement_fee_rate: Rate,
    /// charged once on the principal at origination
    pub property_insurance_rate: Rate,
    /// canonical term: total number of scheduled periods
    pub loan_term_months: u32,
    pub first_payment_date: NaiveDate,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
}

impl LoanInput {
    /// plain loan without down payment or fees, paid monthly
    pub fn new(
        loan_balance: Money,
        interest_rate: Rate,
        loan_term_months: u32,
        first_payment_date: NaiveDate,
    ) -> Self {
        Self {
            loan_balance,
            down_payment: Money::ZERO,
            interest_rate,
            arrangement_fee_rate: Rate::ZERO,
            property_insurance_rate: Rate::ZERO,
            loan_term_months,
            first_payment_date,
            payment_frequency: PaymentFrequency::Monthly,
        }
    }

    /// mortgage with down payment and origination charges
    pub fn mortgage(
        loan_balance: Money,
        down_payment: Money,
        interest_rate: Rate,
        term: LoanTerm,
        first_payment_date: NaiveDate,
        arrangement_fee_rate: Rate,
        property_insurance_rate: Rate,
    ) -> Result<Self> {
        let loan_term_months = term.total_months().ok_or_else(|| LoanError::InvalidConfiguration {
            message: format!("loan term of {} is too long", term),
        })?;

        Ok(Self {
            loan_balance,
            down_payment,
            interest_rate,
            arrangement_fee_rate,
            property_insurance_rate,
            loan_term_months,
            first_payment_date,
            payment_frequency: PaymentFrequency::Monthly,
        })
    }

    pub fn builder() -> LoanInputBuilder {
        LoanInputBuilder::new()
    }

    /// amount amortized: loan balance less down payment
    pub fn principal(&self) -> Money {
        self.loan_balance - self.down_payment
    }

    /// compounding rate applied each period
    pub fn monthly_rate(&self) -> Rate {
        self.interest_rate.monthly_rate()
    }

    pub fn with_frequency(mut self, frequency: PaymentFrequency) -> Self {
        self.payment_frequency = frequency;
        self
    }
}

/// engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// fraction digits applied to emitted amounts
    pub display_scale: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            display_scale: CENTS_SCALE,
        }
    }
}

/// builder for loan inputs
#[derive(Debug, Clone, Default)]
pub struct LoanInputBuilder {
    loan_balance: Option<Money>,
    down_payment: Option<Money>,
    interest_rate: Option<Rate>,
    arrangement_fee_rate: Option<Rate>,
    property_insurance_rate: Option<Rate>,
    term: Option<LoanTerm>,
    first_payment_date: Option<NaiveDate>,
    payment_frequency: Option<PaymentFrequency>,
}

impl LoanInputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loan_balance(mut self, amount: Money) -> Self {
        self.loan_balance = Some(amount);
        self
    }

    pub fn down_payment(mut self, amount: Money) -> Self {
        self.down_payment = Some(amount);
        self
    }

    pub fn interest_rate(mut self, rate: Rate) -> Self {
        self.interest_rate = Some(rate);
        self
    }

    pub fn arrangement_fee_rate(mut self, rate: Rate) -> Self {
        self.arrangement_fee_rate = Some(rate);
        self
    }

    pub fn property_insurance_rate(mut self, rate: Rate) -> Self {
        self.property_insurance_rate = Some(rate);
        self
    }

    pub fn term(mut self, term: LoanTerm) -> Self {
        self.term = Some(term);
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term = Some(LoanTerm::from_months(months));
        self
    }

    pub fn term_years(mut self, years: u32) -> Self {
        self.term = Some(LoanTerm::from_years(years));
        self
    }

    pub fn first_payment_date(mut self, date: NaiveDate) -> Self {
        self.first_payment_date = Some(date);
        self
    }

    pub fn payment_frequency(mut self, frequency: PaymentFrequency) -> Self {
        self.payment_frequency = Some(frequency);
        self
    }

    /// assemble the input; range checks are left to the validator
    pub fn build(self) -> Result<LoanInput> {
        let loan_balance = self.loan_balance.ok_or(LoanError::InvalidConfiguration {
            message: "Loan balance required".to_string(),
        })?;

        let interest_rate = self.interest_rate.ok_or(LoanError::InvalidConfiguration {
            message: "Interest rate required".to_string(),
        })?;

        let term = self.term.ok_or(LoanError::InvalidConfiguration {
            message: "Loan term required".to_string(),
        })?;

        let first_payment_date = self.first_payment_date.ok_or(LoanError::InvalidConfiguration {
            message: "First payment date required".to_string(),
        })?;

        let loan_term_months = term.total_months().ok_or_else(|| LoanError::InvalidConfiguration {
            message: format!("loan term of {} is too long", term),
        })?;

        Ok(LoanInput {
            loan_balance,
            down_payment: self.down_payment.unwrap_or(Money::ZERO),
            interest_rate,
            arrangement_fee_rate: self.arrangement_fee_rate.unwrap_or(Rate::ZERO),
            property_insurance_rate: self.property_insurance_rate.unwrap_or(Rate::ZERO),
            loan_term_months,
            first_payment_date,
            payment_frequency: self.payment_frequency.unwrap_or_default(),
        })
    }
}
