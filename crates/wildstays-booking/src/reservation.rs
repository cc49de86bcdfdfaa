use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info};
use wildstays_db::Database;
use wildstays_db::models::ReservationRow;
use wildstays_db::queries;

use crate::availability::{DateRange, conflicts};
use crate::dates::{DateValidation, validate_range};

#[derive(Debug, Clone)]
pub struct NewReservation {
    pub listing_id: i64,
    pub renter_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Failure outcomes of [`create_reservation`]. `Unavailable` and `Storage`
/// look alike to end users but are logged differently.
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("Listing {0} not found.")]
    ListingNotFound(i64),
    #[error(transparent)]
    InvalidDates(#[from] DateValidation),
    #[error("This listing is not available for the selected dates.")]
    Unavailable,
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Validate and store a reservation.
///
/// The listing lookup, availability check and insert share one immediate
/// transaction, so two overlapping requests cannot both pass the check. The
/// overlap trigger in the schema covers writers outside this process; its
/// abort is reported as [`ReservationError::Unavailable`] too.
pub fn create_reservation(
    db: &Database,
    req: &NewReservation,
    today: NaiveDate,
) -> Result<ReservationRow, ReservationError> {
    let range = DateRange::new(req.start_date, req.end_date);

    let result = db.transaction(|tx| {
        let listing = queries::listing_by_id(tx, req.listing_id)?
            .ok_or(ReservationError::ListingNotFound(req.listing_id))?;

        validate_range(req.start_date, req.end_date, today)?;

        let existing = queries::reservations_for_listing(tx, listing.id)?;
        if conflicts(&existing, &range) {
            return Err(ReservationError::Unavailable);
        }

        // place is denormalized from the listing at booking time
        queries::insert_reservation(
            tx,
            listing.id,
            &req.renter_id,
            &listing.place,
            req.start_date,
            req.end_date,
        )
        .map_err(insert_failure)
    });

    match &result {
        Ok(row) => info!(
            "Reservation {} created for listing {} ({} to {})",
            row.id, row.listing_id, row.start_date, row.end_date
        ),
        Err(ReservationError::Unavailable) => info!(
            "Listing {} unavailable for {} to {}",
            req.listing_id, req.start_date, req.end_date
        ),
        Err(ReservationError::Storage(e)) => {
            error!("Reservation creation failed for {:?}: {}", req, e)
        }
        Err(_) => {}
    }

    result
}

/// An insert rejected by the overlap trigger is a conflict, not a storage fault.
fn insert_failure(err: anyhow::Error) -> ReservationError {
    if queries::is_overlap_violation(&err) {
        ReservationError::Unavailable
    } else {
        ReservationError::Storage(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    NotFound,
    NotOwner,
}

/// Cancel a reservation on behalf of its renter.
pub fn cancel_reservation(
    db: &Database,
    renter_id: &str,
    reservation_id: i64,
) -> anyhow::Result<CancelOutcome> {
    let outcome = match db.get_reservation(reservation_id)? {
        None => CancelOutcome::NotFound,
        Some(r) if r.renter_id != renter_id => CancelOutcome::NotOwner,
        Some(_) if db.delete_reservation(reservation_id)? => CancelOutcome::Cancelled,
        // deleted between the lookup and the delete
        Some(_) => CancelOutcome::NotFound,
    };

    if outcome == CancelOutcome::Cancelled {
        info!("Reservation {} cancelled", reservation_id);
    }
    Ok(outcome)
}
