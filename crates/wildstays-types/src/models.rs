use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable property as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub place: String,
    pub price: u32,
    pub guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub listing_id: i64,
    pub file_path: String,
}

/// `place` is copied from the listing when the reservation is made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub listing_id: i64,
    pub renter_id: Uuid,
    pub place: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
