use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decimal::Money;

/// payment frequency
///
/// only selects the calendar spacing between rows. payment math stays on a
/// monthly-equivalent basis whatever is chosen here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    #[serde(alias = "fortnightly", alias = "bi-weekly")]
    Biweekly,
    Weekly,
    Quarterly,
    #[serde(alias = "semiannually", alias = "semi-annual")]
    SemiAnnually,
    #[serde(alias = "annual", alias = "yearly")]
    Annually,
}

impl PaymentFrequency {
    pub const ALL: [PaymentFrequency; 6] = [
        PaymentFrequency::Monthly,
        PaymentFrequency::Biweekly,
        PaymentFrequency::Weekly,
        PaymentFrequency::Quarterly,
        PaymentFrequency::SemiAnnually,
        PaymentFrequency::Annually,
    ];

    /// display label
    pub fn label(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "Monthly",
            PaymentFrequency::Biweekly => "Biweekly",
            PaymentFrequency::Weekly => "Weekly",
            PaymentFrequency::Quarterly => "Quarterly",
            PaymentFrequency::SemiAnnually => "Semi-annually",
            PaymentFrequency::Annually => "Annually",
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// unrecognized payment frequency label
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown payment frequency: {0}")]
pub struct UnknownFrequency(pub String);

impl FromStr for PaymentFrequency {
    type Err = UnknownFrequency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "monthly" => Ok(PaymentFrequency::Monthly),
            "biweekly" | "fortnightly" => Ok(PaymentFrequency::Biweekly),
            "weekly" => Ok(PaymentFrequency::Weekly),
            "quarterly" => Ok(PaymentFrequency::Quarterly),
            "semiannually" | "semiannual" => Ok(PaymentFrequency::SemiAnnually),
            "annually" | "annual" | "yearly" => Ok(PaymentFrequency::Annually),
            _ => Err(UnknownFrequency(s.to_string())),
        }
    }
}

/// advances a calendar anchor by whole periods
pub trait PeriodStepper {
    /// date that lies `steps` periods after `anchor`, `None` past the calendar's range
    fn advance(&self, anchor: NaiveDate, steps: u32) -> Option<NaiveDate>;
}

impl PeriodStepper for PaymentFrequency {
    fn advance(&self, anchor: NaiveDate, steps: u32) -> Option<NaiveDate> {
        // always offset from the anchor so month-end dates don't drift
        match self {
            PaymentFrequency::Monthly => anchor.checked_add_months(Months::new(steps)),
            PaymentFrequency::Quarterly => {
                anchor.checked_add_months(Months::new(steps.checked_mul(3)?))
            }
            PaymentFrequency::SemiAnnually => {
                anchor.checked_add_months(Months::new(steps.checked_mul(6)?))
            }
            PaymentFrequency::Annually => {
                anchor.checked_add_months(Months::new(steps.checked_mul(12)?))
            }
            PaymentFrequency::Weekly => anchor.checked_add_days(Days::new(u64::from(steps) * 7)),
            PaymentFrequency::Biweekly => {
                anchor.checked_add_days(Days::new(u64::from(steps) * 14))
            }
        }
    }
}

/// loan term as entered: years plus months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoanTerm {
    #[serde(default)]
    pub years: u32,
    #[serde(default)]
    pub months: u32,
}

impl LoanTerm {
    pub fn new(years: u32, months: u32) -> Self {
        Self { years, months }
    }

    pub fn from_years(years: u32) -> Self {
        Self { years, months: 0 }
    }

    pub fn from_months(months: u32) -> Self {
        Self { years: 0, months }
    }

    /// canonical number of monthly periods, `None` on overflow
    pub fn total_months(&self) -> Option<u32> {
        self.years.checked_mul(12)?.checked_add(self.months)
    }

    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0
    }
}

impl fmt::Display for LoanTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} years {} months", self.years, self.months)
    }
}

/// one-time origination charges shown on the fee row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub arrangement_fee: Money,
    pub property_insurance: Money,
}

impl FeeBreakdown {
    /// sum of both charges, `None` on overflow
    pub fn total(&self) -> Option<Money> {
        self.arrangement_fee.checked_add(self.property_insurance)
    }
}

/// a single line of the amortization schedule, rounded for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 0 for the fee row, 1..=N for regular payments
    pub period: u32,
    pub date: NaiveDate,
    pub payment: Money,
    pub principal_paid: Money,
    pub interest: Money,
    pub balance: Money,
    #[serde(default)]
    pub is_initial_fee: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_breakdown: Option<FeeBreakdown>,
}

impl ScheduleRow {
    pub fn is_regular(&self) -> bool {
        !self.is_initial_fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_frequency_labels_parse() {
        assert_eq!("Monthly".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Monthly);
        assert_eq!("Fortnightly".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Biweekly);
        assert_eq!("bi-weekly".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Biweekly);
        assert_eq!(
            "Semi-annually".parse::<PaymentFrequency>().unwrap(),
            PaymentFrequency::SemiAnnually
        );
        assert_eq!("ANNUALLY".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Annually);
        assert!("daily".parse::<PaymentFrequency>().is_err());
    }

    #[test]
    fn test_unknown_frequency_error() {
        let err = " Daily ".parse::<PaymentFrequency>().unwrap_err();
        assert_eq!(err, UnknownFrequency(" Daily ".to_string()));
        assert_eq!(err.to_string(), "unknown payment frequency:  Daily ");

        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_frequency_serde_names() {
        let json = serde_json::to_string(&PaymentFrequency::SemiAnnually).unwrap();
        assert_eq!(json, "\"semi-annually\"");

        let parsed: PaymentFrequency = serde_json::from_str("\"fortnightly\"").unwrap();
        assert_eq!(parsed, PaymentFrequency::Biweekly);
    }

    #[test]
    fn test_label_round_trips_through_parse() {
        for frequency in PaymentFrequency::ALL {
            assert_eq!(frequency.label().parse::<PaymentFrequency>().unwrap(), frequency);
        }
    }

    #[test]
    fn test_monthly_steps_from_anchor() {
        let anchor = date(2025, 1, 31);
        let monthly = PaymentFrequency::Monthly;

        assert_eq!(monthly.advance(anchor, 0), Some(anchor));
        assert_eq!(monthly.advance(anchor, 1), Some(date(2025, 2, 28)));
        // clamped in february, back to the 31st in march
        assert_eq!(monthly.advance(anchor, 2), Some(date(2025, 3, 31)));
    }

    #[test]
    fn test_day_based_steps() {
        let anchor = date(2025, 1, 1);
        assert_eq!(PaymentFrequency::Weekly.advance(anchor, 2), Some(date(2025, 1, 15)));
        assert_eq!(PaymentFrequency::Biweekly.advance(anchor, 2), Some(date(2025, 1, 29)));
    }

    #[test]
    fn test_month_multiples() {
        let anchor = date(2025, 1, 1);
        assert_eq!(PaymentFrequency::Quarterly.advance(anchor, 1), Some(date(2025, 4, 1)));
        assert_eq!(PaymentFrequency::SemiAnnually.advance(anchor, 1), Some(date(2025, 7, 1)));
        assert_eq!(PaymentFrequency::Annually.advance(anchor, 3), Some(date(2028, 1, 1)));
    }

    #[test]
    fn test_step_past_calendar_range() {
        let anchor = date(2025, 1, 1);
        assert_eq!(PaymentFrequency::Annually.advance(anchor, u32::MAX), None);
    }

    #[test]
    fn test_loan_term_total_months() {
        assert_eq!(LoanTerm::new(2, 6).total_months(), Some(30));
        assert_eq!(LoanTerm::from_years(30).total_months(), Some(360));
        assert_eq!(LoanTerm::from_months(18).total_months(), Some(18));
        assert!(LoanTerm::new(0, 0).is_zero());
        assert_eq!(LoanTerm::new(u32::MAX, 0).total_months(), None);
        assert_eq!(LoanTerm::new(1, 3).to_string(), "1 years 3 months");
    }
}
