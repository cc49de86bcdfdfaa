//! Booking rules for WildStays: date validation, availability checks,
//! listing filters and reservation creation on top of `wildstays-db`.

pub mod availability;
pub mod dates;
pub mod filter;
pub mod listing;
pub mod reservation;

pub use availability::{DateRange, is_available};
pub use dates::{DateValidation, check_date, check_date_order, check_date_today, validate_range};
pub use filter::{ListingFilter, filter_listings};
pub use listing::{ListingValidation, validate_listing};
pub use reservation::{
    CancelOutcome, NewReservation, ReservationError, cancel_reservation, create_reservation,
};

#[cfg(test)]
pub(crate) mod test_util;
