//! serializable report of a calculation for exporters and the cli
use std::fmt::Write as _;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LoanInput;
use crate::decimal::{Money, CENTS_SCALE};
use crate::engine::AmortizationResult;
use crate::types::{LoanTerm, ScheduleRow};

/// column headers of the schedule table
pub const SCHEDULE_HEADERS: [&str; 6] = [
    "Period",
    "Date",
    "Payment",
    "Principal",
    "Interest",
    "Remaining Balance",
];

/// headline figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryView {
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
}

/// loan parameters echoed back, rates in percent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDetailsView {
    pub loan_balance: Money,
    pub interest_rate: Decimal,
    pub arrangement_fee_rate: Decimal,
    pub property_insurance_rate: Decimal,
    pub down_payment: Money,
    pub loan_term: String,
    pub payment_frequency: String,
    pub first_payment_date: NaiveDate,
}

/// one table line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleLine {
    pub period: u32,
    pub date: NaiveDate,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub remaining_balance: Money,
}

impl From<&ScheduleRow> for ScheduleLine {
    fn from(row: &ScheduleRow) -> Self {
        ScheduleLine {
            period: row.period,
            date: row.date,
            payment: row.payment,
            principal: row.principal_paid,
            interest: row.interest,
            remaining_balance: row.balance,
        }
    }
}

impl ScheduleLine {
    /// cells in `SCHEDULE_HEADERS` order
    pub fn cells(&self) -> [String; 6] {
        [
            self.period.to_string(),
            self.date.to_string(),
            self.payment.to_string(),
            self.principal.to_string(),
            self.interest.to_string(),
            self.remaining_balance.to_string(),
        ]
    }
}

/// full report: summary, echoed inputs, schedule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationReport {
    pub summary: SummaryView,
    pub loan_details: LoanDetailsView,
    pub schedule: Vec<ScheduleLine>,
}

impl AmortizationReport {
    pub fn new(input: &LoanInput, result: &AmortizationResult) -> Self {
        let term = LoanTerm::new(input.loan_term_months / 12, input.loan_term_months % 12);

        AmortizationReport {
            summary: SummaryView {
                monthly_payment: result.periodic_payment,
                total_payment: result.total_payment,
                total_interest: result.total_interest,
            },
            loan_details: LoanDetailsView {
                loan_balance: input.loan_balance,
                interest_rate: input.interest_rate.as_percentage(),
                arrangement_fee_rate: input.arrangement_fee_rate.as_percentage(),
                property_insurance_rate: input.property_insurance_rate.as_percentage(),
                down_payment: input.down_payment,
                loan_term: term.to_string(),
                payment_frequency: input.payment_frequency.label().to_string(),
                first_payment_date: input.first_payment_date,
            },
            schedule: result.schedule.iter().map(ScheduleLine::from).collect(),
        }
    }

    /// labelled summary block followed by the echoed loan details
    pub fn summary_rows(&self) -> Vec<(&'static str, String)> {
        let details = &self.loan_details;
        vec![
            ("Monthly Payment", format_amount(self.summary.monthly_payment)),
            ("Total Payment", format_amount(self.summary.total_payment)),
            ("Total Interest", format_amount(self.summary.total_interest)),
            ("Loan Balance", format_amount(details.loan_balance)),
            ("Interest Rate", format!("{}%", details.interest_rate)),
            ("Arrangement Fee Rate", format!("{}%", details.arrangement_fee_rate)),
            ("Property Insurance Rate", format!("{}%", details.property_insurance_rate)),
            ("Down Payment", format_amount(details.down_payment)),
            ("Loan Term", details.loan_term.clone()),
            ("Payment Frequency", details.payment_frequency.clone()),
            ("First Payment Date", details.first_payment_date.to_string()),
        ]
    }

    /// plain text rendering: summary block then the schedule table
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let label_width = self
            .summary_rows()
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0);
        for (label, value) in self.summary_rows() {
            let _ = writeln!(out, "{:<width$}  {}", label, value, width = label_width);
        }
        out.push('\n');

        let rows: Vec<[String; 6]> = self.schedule.iter().map(ScheduleLine::cells).collect();
        let mut widths = SCHEDULE_HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.len());
            }
        }

        let header: Vec<String> = SCHEDULE_HEADERS
            .iter()
            .zip(widths.iter())
            .map(|(h, w)| format!("{:>w$}", h, w = *w))
            .collect();
        let _ = writeln!(out, "{}", header.join("  "));

        for row in &rows {
            let line: Vec<String> = row
                .iter()
                .zip(widths.iter())
                .map(|(cell, w)| format!("{:>w$}", cell, w = *w))
                .collect();
            let _ = writeln!(out, "{}", line.join("  "));
        }

        out
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// cents with comma thousands separators, e.g. `1,234,567.89`
pub fn format_amount(amount: Money) -> String {
    let text = amount.round_dp(CENTS_SCALE).abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.round_dp(CENTS_SCALE).is_negative() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}
