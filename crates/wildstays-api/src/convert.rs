//! Row → API model conversion.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use wildstays_db::models::{ImageRow, ListingRow, ReservationRow};
use wildstays_types::models::{Image, Listing, Reservation};

pub fn image(row: ImageRow) -> Image {
    Image {
        id: row.id,
        listing_id: row.listing_id,
        file_path: row.file_path,
    }
}

pub fn listing(row: ListingRow, images: Vec<ImageRow>) -> Listing {
    Listing {
        id: row.id,
        owner_id: parse_uuid(&row.owner_id, "owner_id", row.id),
        name: row.name,
        description: row.description,
        kind: row.kind,
        place: row.place,
        price: row.price,
        guests: row.guests,
        bedrooms: row.bedrooms,
        bathrooms: row.bathrooms,
        start_date: row.start_date,
        end_date: row.end_date,
        images: images.into_iter().map(image).collect(),
    }
}

/// Attach each listing's images from one batch query result.
pub fn listings_with_images(rows: Vec<ListingRow>, images: Vec<ImageRow>) -> Vec<Listing> {
    let mut by_listing: HashMap<i64, Vec<ImageRow>> = HashMap::new();
    for img in images {
        by_listing.entry(img.listing_id).or_default().push(img);
    }

    rows.into_iter()
        .map(|row| {
            let images = by_listing.remove(&row.id).unwrap_or_default();
            listing(row, images)
        })
        .collect()
}

pub fn reservation(row: ReservationRow) -> Reservation {
    Reservation {
        id: row.id,
        listing_id: row.listing_id,
        renter_id: parse_uuid(&row.renter_id, "renter_id", row.id),
        created_at: parse_timestamp(&row.created_at, row.id),
        place: row.place,
        start_date: row.start_date,
        end_date: row.end_date,
    }
}

fn parse_uuid(raw: &str, column: &str, row_id: i64) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}' on row {}: {}", column, raw, row_id, e);
        Uuid::default()
    })
}

fn parse_timestamp(raw: &str, row_id: i64) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
            // Parse as naive UTC and convert.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on row {}: {}", raw, row_id, e);
            DateTime::default()
        })
}
