pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod form;
pub mod payments;
pub mod report;
pub mod types;
pub mod validation;

// re-export key types
pub use config::{EngineConfig, LoanInput, LoanInputBuilder};
pub use decimal::{Money, Rate};
pub use engine::{calculate, AmortizationEngine, AmortizationResult};
pub use errors::{FieldErrors, LoanError, LoanField, Result};
pub use form::{LoanForm, LoanTermForm};
pub use payments::{compute_payment, generate_schedule, AmortizationSchedule, ScheduleTerms};
pub use report::{AmortizationReport, SCHEDULE_HEADERS};
pub use types::{FeeBreakdown, LoanTerm, PaymentFrequency, PeriodStepper, ScheduleRow};
pub use validation::validate;

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
