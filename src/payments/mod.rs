pub mod calculator;
pub mod schedule;

pub use calculator::compute_payment;
pub use schedule::{generate_schedule, AmortizationSchedule, ScheduleTerms};
