//! string-typed form input and its conversion into a [`LoanInput`].
//!
//! form layers hand over whatever the user typed. this module owns coercion:
//! numbers, the years+months term, the date and the frequency label. anything
//! that does not parse becomes a field message; anything that parses is then
//! range-checked by the validator.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::LoanInput;
use crate::decimal::{Money, Rate};
use crate::errors::{FieldErrors, LoanField};
use crate::types::{LoanTerm, PaymentFrequency};
use crate::validation::{validate, RangeCheck};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// loan term as two text boxes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTermForm {
    #[serde(default, deserialize_with = "text_or_number")]
    pub years: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub months: String,
}

/// raw form values, keyed like the web form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanForm {
    #[serde(default, deserialize_with = "text_or_number")]
    pub loan_balance: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub interest_rate: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub down_payment: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub arrangement_fee_rate: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub property_insurance_rate: String,
    #[serde(default)]
    pub loan_term: LoanTermForm,
    #[serde(default)]
    pub payment_frequency: String,
    #[serde(default)]
    pub first_payment_date: String,
}

impl LoanForm {
    /// parse every field, then range-check the typed result
    pub fn to_input(&self) -> Result<LoanInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let loan_balance = required_decimal(&self.loan_balance, LoanField::LoanBalance, &mut errors);
        let interest_rate = required_decimal(&self.interest_rate, LoanField::InterestRate, &mut errors);
        let down_payment = optional_decimal(&self.down_payment, LoanField::DownPayment, &mut errors);
        let arrangement_fee_rate =
            optional_decimal(&self.arrangement_fee_rate, LoanField::ArrangementFeeRate, &mut errors);
        let property_insurance_rate = optional_decimal(
            &self.property_insurance_rate,
            LoanField::PropertyInsuranceRate,
            &mut errors,
        );
        let term = self.parse_term(&mut errors);
        let first_payment_date = self.parse_date(&mut errors);
        let payment_frequency = self.parse_frequency(&mut errors);

        let loan_balance = loan_balance.map(Money::from_decimal);
        let down_payment = down_payment.map(Money::from_decimal);
        let interest_rate = interest_rate.map(Rate::from_percentage);
        let arrangement_fee_rate = arrangement_fee_rate.map(Rate::from_percentage);
        let property_insurance_rate = property_insurance_rate.map(Rate::from_percentage);

        let (
            Some(loan_balance),
            Some(interest_rate),
            Some(down_payment),
            Some(arrangement_fee_rate),
            Some(property_insurance_rate),
            Some(loan_term_months),
            Some(first_payment_date),
            Some(payment_frequency),
        ) = (
            loan_balance,
            interest_rate,
            down_payment,
            arrangement_fee_rate,
            property_insurance_rate,
            term,
            first_payment_date,
            payment_frequency,
        )
        else {
            // range-check whatever did parse so the caller sees every problem at once
            errors.extend(
                RangeCheck {
                    loan_balance,
                    down_payment,
                    interest_rate,
                    arrangement_fee_rate,
                    property_insurance_rate,
                    loan_term_months: term,
                }
                .violations(),
            );
            return Err(errors);
        };

        let input = LoanInput {
            loan_balance,
            down_payment,
            interest_rate,
            arrangement_fee_rate,
            property_insurance_rate,
            loan_term_months,
            first_payment_date,
            payment_frequency,
        };

        validate(&input)?;
        Ok(input)
    }

    fn parse_term(&self, errors: &mut FieldErrors) -> Option<u32> {
        let years = whole_number(&self.loan_term.years);
        let months = whole_number(&self.loan_term.months);

        match (years, months) {
            (Some(years), Some(months)) => {
                let total = LoanTerm::new(years, months).total_months();
                if total.is_none() {
                    errors.insert(LoanField::LoanTerm, "loan term is too long");
                }
                total
            }
            _ => {
                errors.insert(
                    LoanField::LoanTerm,
                    "loan term must be a whole number of years and months",
                );
                None
            }
        }
    }

    fn parse_date(&self, errors: &mut FieldErrors) -> Option<NaiveDate> {
        match NaiveDate::parse_from_str(self.first_payment_date.trim(), DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.insert(
                    LoanField::FirstPaymentDate,
                    "first payment date must be a valid date",
                );
                None
            }
        }
    }

    fn parse_frequency(&self, errors: &mut FieldErrors) -> Option<PaymentFrequency> {
        let label = self.payment_frequency.trim();
        if label.is_empty() {
            return Some(PaymentFrequency::default());
        }
        match PaymentFrequency::from_str(label) {
            Ok(frequency) => Some(frequency),
            Err(_) => {
                errors.insert(LoanField::PaymentFrequency, "payment frequency is not recognized");
                None
            }
        }
    }
}

/// strip grouping separators and parse
fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| !matches!(c, ',' | '_')).collect();
    Decimal::from_str_exact(&cleaned).ok()
}

/// empty counts as missing, which the range check would reject anyway
fn required_decimal(raw: &str, field: LoanField, errors: &mut FieldErrors) -> Option<Decimal> {
    if raw.trim().is_empty() {
        errors.insert(field, format!("{} must be greater than 0", field.label()));
        return None;
    }
    numeric(raw, field, errors)
}

/// empty means zero
fn optional_decimal(raw: &str, field: LoanField, errors: &mut FieldErrors) -> Option<Decimal> {
    if raw.trim().is_empty() {
        return Some(Decimal::ZERO);
    }
    numeric(raw, field, errors)
}

fn numeric(raw: &str, field: LoanField, errors: &mut FieldErrors) -> Option<Decimal> {
    let parsed = parse_decimal(raw);
    if parsed.is_none() {
        errors.insert(field, format!("{} must be a number", field.label()));
    }
    parsed
}

fn whole_number(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }
    raw.parse().ok()
}

/// accept `"12.5"`, `12.5` or `null` for a text field
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected text or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn filled_form() -> LoanForm {
        LoanForm {
            loan_balance: "60,000".to_string(),
            interest_rate: "6".to_string(),
            down_payment: "10000".to_string(),
            arrangement_fee_rate: "1".to_string(),
            property_insurance_rate: "0.5".to_string(),
            loan_term: LoanTermForm {
                years: "2".to_string(),
                months: "0".to_string(),
            },
            payment_frequency: "Monthly".to_string(),
            first_payment_date: "2025-01-01".to_string(),
        }
    }

    #[test]
    fn test_filled_form_parses() {
        let input = filled_form().to_input().unwrap();

        assert_eq!(input.loan_balance, Money::from_major(60_000));
        assert_eq!(input.principal(), Money::from_major(50_000));
        assert_eq!(input.interest_rate.as_decimal(), dec!(0.06));
        assert_eq!(input.property_insurance_rate.as_decimal(), dec!(0.005));
        assert_eq!(input.loan_term_months, 24);
        assert_eq!(input.payment_frequency, PaymentFrequency::Monthly);
    }

    #[test]
    fn test_optional_fields_default_to_zero() {
        let form = LoanForm {
            down_payment: String::new(),
            arrangement_fee_rate: " ".to_string(),
            property_insurance_rate: String::new(),
            payment_frequency: String::new(),
            ..filled_form()
        };

        let input = form.to_input().unwrap();
        assert_eq!(input.down_payment, Money::ZERO);
        assert_eq!(input.arrangement_fee_rate, Rate::ZERO);
        assert_eq!(input.payment_frequency, PaymentFrequency::Monthly);
    }

    #[test]
    fn test_parse_errors_are_field_keyed() {
        let form = LoanForm {
            loan_balance: "lots".to_string(),
            interest_rate: String::new(),
            loan_term: LoanTermForm {
                years: "two".to_string(),
                months: "0".to_string(),
            },
            payment_frequency: "hourly".to_string(),
            first_payment_date: "01/01/2025".to_string(),
            ..filled_form()
        };

        let errors = form.to_input().unwrap_err();
        assert_eq!(errors.get(LoanField::LoanBalance), Some("loan balance must be a number"));
        assert_eq!(
            errors.get(LoanField::InterestRate),
            Some("interest rate must be greater than 0")
        );
        assert_eq!(
            errors.get(LoanField::LoanTerm),
            Some("loan term must be a whole number of years and months")
        );
        assert_eq!(
            errors.get(LoanField::PaymentFrequency),
            Some("payment frequency is not recognized")
        );
        assert_eq!(
            errors.get(LoanField::FirstPaymentDate),
            Some("first payment date must be a valid date")
        );
    }

    #[test]
    fn test_parsed_values_are_range_checked() {
        let form = LoanForm {
            down_payment: "60000".to_string(),
            loan_term: LoanTermForm {
                years: "0".to_string(),
                months: "0".to_string(),
            },
            ..filled_form()
        };

        let errors = form.to_input().unwrap_err();
        assert_eq!(
            errors.get(LoanField::DownPayment),
            Some("down payment cannot exceed loan amount")
        );
        assert_eq!(errors.get(LoanField::LoanTerm), Some("loan term must be greater than 0"));
    }

    #[test]
    fn test_parse_failure_still_range_checks_other_fields() {
        let form = LoanForm {
            loan_balance: "abc".to_string(),
            down_payment: "-5".to_string(),
            arrangement_fee_rate: "-1".to_string(),
            loan_term: LoanTermForm {
                years: "0".to_string(),
                months: String::new(),
            },
            ..filled_form()
        };

        let errors = form.to_input().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get(LoanField::LoanBalance), Some("loan balance must be a number"));
        // no balance to compare against, so only the sign rule applies
        assert_eq!(
            errors.get(LoanField::DownPayment),
            Some("down payment cannot be negative")
        );
        assert_eq!(
            errors.get(LoanField::ArrangementFeeRate),
            Some("arrangement fee rate cannot be negative")
        );
        assert_eq!(errors.get(LoanField::LoanTerm), Some("loan term must be greater than 0"));
    }

    #[test]
    fn test_years_and_months_combine() {
        let form = LoanForm {
            loan_term: LoanTermForm {
                years: "1".to_string(),
                months: "6".to_string(),
            },
            ..filled_form()
        };
        assert_eq!(form.to_input().unwrap().loan_term_months, 18);

        let months_only = LoanForm {
            loan_term: LoanTermForm {
                years: String::new(),
                months: "30".to_string(),
            },
            ..filled_form()
        };
        assert_eq!(months_only.to_input().unwrap().loan_term_months, 30);
    }

    #[test]
    fn test_json_accepts_numbers_and_text() {
        let json = r#"{
            "loanBalance": 100000,
            "interestRate": "12",
            "downPayment": null,
            "loanTerm": { "years": 1, "months": "0" },
            "paymentFrequency": "Fortnightly",
            "firstPaymentDate": "2025-01-01"
        }"#;

        let form: LoanForm = serde_json::from_str(json).unwrap();
        let input = form.to_input().unwrap();

        assert_eq!(input.loan_balance, Money::from_major(100_000));
        assert_eq!(input.loan_term_months, 12);
        assert_eq!(input.payment_frequency, PaymentFrequency::Biweekly);
    }

    #[test]
    fn test_json_rejects_structured_amounts() {
        let json = r#"{ "loanBalance": [1, 2] }"#;
        assert!(serde_json::from_str::<LoanForm>(json).is_err());
    }
}
