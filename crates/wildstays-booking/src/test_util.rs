use chrono::NaiveDate;
use wildstays_db::Database;
use wildstays_db::models::ListingDraft;
use wildstays_db::queries;

use crate::availability::DateRange;

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn range(start: &str, end: &str) -> DateRange {
    DateRange::new(date(start), date(end))
}

pub fn draft(place: &str, guests: u32, price: u32) -> ListingDraft {
    ListingDraft {
        name: format!("{place} retreat"),
        description: "Cabin with a view".into(),
        kind: "Cabin".into(),
        place: place.into(),
        price,
        guests,
        bedrooms: 2,
        bathrooms: 1,
        start_date: date("2024-01-01"),
        end_date: date("2024-12-31"),
    }
}

pub fn add_user(db: &Database, username: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    db.create_user(&id, username, "hash").unwrap();
    id
}

pub fn add_listing(db: &Database, owner: &str, place: &str, guests: u32, price: u32) -> i64 {
    db.insert_listing(owner, &draft(place, guests, price)).unwrap()
}

/// Fresh database with one owner and one listing.
pub fn seed_listing(place: &str, guests: u32, price: u32) -> (Database, String, i64) {
    let db = Database::open_in_memory().unwrap();
    let owner = add_user(&db, "owner");
    let listing = add_listing(&db, &owner, place, guests, price);
    (db, owner, listing)
}

pub fn seed_reservation(db: &Database, listing_id: i64, renter: &str, start: &str, end: &str) {
    db.with_conn(|conn| {
        queries::insert_reservation(conn, listing_id, renter, "seed", date(start), date(end))
    })
    .unwrap();
}
