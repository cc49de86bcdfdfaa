use chrono::{Local, NaiveDate};
use thiserror::Error;

/// Why a requested date range was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateValidation {
    #[error("Start date must be after today's date.")]
    StartInPast,
    #[error("End date must be after the start date.")]
    EndBeforeStart,
}

/// True iff `start` is today or later.
pub fn check_date(start: NaiveDate, today: NaiveDate) -> bool {
    start >= today
}

/// [`check_date`] against the local wall clock.
pub fn check_date_today(start: NaiveDate) -> bool {
    check_date(start, Local::now().date_naive())
}

/// True iff `start` is not after `end`. Equal dates are a single-day stay.
pub fn check_date_order(start: NaiveDate, end: NaiveDate) -> bool {
    start <= end
}

/// Run both checks and report the first one that fails.
pub fn validate_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(), DateValidation> {
    if !check_date(start, today) {
        return Err(DateValidation::StartInPast);
    }
    if !check_date_order(start, end) {
        return Err(DateValidation::EndBeforeStart);
    }
    Ok(())
}
