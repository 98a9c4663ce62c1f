use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// input fields that can carry a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoanField {
    LoanBalance,
    InterestRate,
    DownPayment,
    ArrangementFeeRate,
    PropertyInsuranceRate,
    LoanTerm,
    FirstPaymentDate,
    PaymentFrequency,
}

impl LoanField {
    /// form field name as the input layer knows it
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanField::LoanBalance => "loanBalance",
            LoanField::InterestRate => "interestRate",
            LoanField::DownPayment => "downPayment",
            LoanField::ArrangementFeeRate => "arrangementFeeRate",
            LoanField::PropertyInsuranceRate => "propertyInsuranceRate",
            LoanField::LoanTerm => "loanTerm",
            LoanField::FirstPaymentDate => "firstPaymentDate",
            LoanField::PaymentFrequency => "paymentFrequency",
        }
    }

    /// human readable label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            LoanField::LoanBalance => "loan balance",
            LoanField::InterestRate => "interest rate",
            LoanField::DownPayment => "down payment",
            LoanField::ArrangementFeeRate => "arrangement fee rate",
            LoanField::PropertyInsuranceRate => "property insurance rate",
            LoanField::LoanTerm => "loan term",
            LoanField::FirstPaymentDate => "first payment date",
            LoanField::PaymentFrequency => "payment frequency",
        }
    }
}

impl fmt::Display for LoanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// field-keyed validation messages, at most one per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<LoanField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// record a message, replacing any earlier one for the same field
    pub fn insert(&mut self, field: LoanField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: LoanField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: LoanField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LoanField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// merge another set, later messages win per field
    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> std::result::Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoanError {
    #[error("invalid loan input: {0}")]
    Validation(FieldErrors),

    /// internal numeric failure; the reason is kept for logs, never shown to the user
    #[error("error calculating mortgage details")]
    Computation {
        reason: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl LoanError {
    pub fn computation(reason: impl Into<String>) -> Self {
        LoanError::Computation {
            reason: reason.into(),
        }
    }

    /// field errors when this is a validation rejection
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            LoanError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for LoanError {
    fn from(errors: FieldErrors) -> Self {
        LoanError::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
