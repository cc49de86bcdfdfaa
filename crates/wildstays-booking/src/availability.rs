use anyhow::Result;
use chrono::NaiveDate;
use wildstays_db::Database;
use wildstays_db::models::ReservationRow;

/// A closed interval of calendar days, `start` and `end` both included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// Closed-interval intersection. Also catches a range that strictly
    /// contains `other`, which an endpoint-in-range test would miss.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

impl From<&ReservationRow> for DateRange {
    fn from(r: &ReservationRow) -> Self {
        Self::new(r.start_date, r.end_date)
    }
}

/// True if any of `existing` intersects `range`.
pub fn conflicts(existing: &[ReservationRow], range: &DateRange) -> bool {
    existing.iter().any(|r| DateRange::from(r).overlaps(range))
}

/// Whether `range` is free for the listing. This is a read-only check;
/// `create_reservation` repeats it inside the inserting transaction.
pub fn is_available(db: &Database, listing_id: i64, range: DateRange) -> Result<bool> {
    let existing = db.get_reservations_for_listing(listing_id)?;
    Ok(!conflicts(&existing, &range))
}
