//! Database row types. These map directly to SQLite rows and stay distinct
//! from the wildstays-types API models to keep the DB layer independent.

use chrono::NaiveDate;

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

/// Writable columns of a listing, shared by insert and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDraft {
    pub name: String,
    pub description: String,
    pub kind: String,
    pub place: String,
    pub price: u32,
    pub guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub place: String,
    pub price: u32,
    pub guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRow {
    pub id: i64,
    pub listing_id: i64,
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRow {
    pub id: i64,
    pub listing_id: i64,
    pub renter_id: String,
    pub place: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: String,
}

/// A reservation joined with the name of its listing.
pub struct RenterReservationRow {
    pub reservation: ReservationRow,
    pub listing_name: String,
}
