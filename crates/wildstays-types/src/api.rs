use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

use crate::models::{Listing, Reservation};

// -- JWT Claims --

/// JWT claims issued by the auth handlers and checked by the API middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Listings --

/// Body of `POST /listings` and `PUT /listings/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListingRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub place: String,
    pub price: u32,
    pub guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Query string of `GET /listings`. Every field is optional; a missing or
/// empty field (`?guests=`, as a browse form sends it) places no constraint
/// on the result.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ListingQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub place: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub guests: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub bathrooms: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_price: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_price: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub end_date: Option<NaiveDate>,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListingDetailsResponse {
    pub listing: Listing,
    pub reservations: Vec<Reservation>,
}

// -- Images --

#[derive(Debug, Deserialize)]
pub struct UploadImageQuery {
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub id: i64,
    pub file_path: String,
    pub size: u64,
}

// -- Reservations --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateReservationRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct PlaceQuery {
    pub place: String,
}

/// A renter's reservation together with the name of the booked listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct MyReservation {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub listing_name: String,
}
