use std::collections::HashSet;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::debug;
use wildstays_db::Database;
use wildstays_db::models::ListingRow;

use crate::availability::DateRange;

pub type Predicate = Box<dyn Fn(&ListingRow) -> bool + Send + Sync>;

/// Optional constraints for browsing listings. A `None` field does not
/// narrow the result; it is never read as zero or empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListingFilter {
    pub place: Option<String>,
    pub min_guests: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub min_bedrooms: Option<u32>,
    pub min_price: Option<u32>,
    pub max_price: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ListingFilter {
    /// Days that must be free of reservations. A single supplied bound is a
    /// one-day window.
    pub fn window(&self) -> Option<DateRange> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)),
            (Some(day), None) | (None, Some(day)) => Some(DateRange::single_day(day)),
            (None, None) => None,
        }
    }

    /// One predicate per supplied attribute constraint.
    pub fn predicates(&self) -> Vec<Predicate> {
        let place = self.place.clone();
        [
            place.map(|p| Box::new(move |l: &ListingRow| l.place == p) as Predicate),
            self.min_guests
                .map(|n| Box::new(move |l: &ListingRow| l.guests >= n) as Predicate),
            self.min_bathrooms
                .map(|n| Box::new(move |l: &ListingRow| l.bathrooms >= n) as Predicate),
            self.min_bedrooms
                .map(|n| Box::new(move |l: &ListingRow| l.bedrooms >= n) as Predicate),
            self.min_price
                .map(|n| Box::new(move |l: &ListingRow| l.price >= n) as Predicate),
            self.max_price
                .map(|n| Box::new(move |l: &ListingRow| l.price <= n) as Predicate),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Keep listings that satisfy every predicate and are not in `booked`.
    /// Output is ordered by listing id.
    pub fn apply(&self, listings: Vec<ListingRow>, booked: &HashSet<i64>) -> Vec<ListingRow> {
        let predicates = self.predicates();
        let mut matched: Vec<ListingRow> = listings
            .into_iter()
            .filter(|l| !booked.contains(&l.id))
            .filter(|l| predicates.iter().all(|p| p(l)))
            .collect();
        matched.sort_by_key(|l| l.id);
        matched
    }
}

/// Run `filter` over every stored listing.
pub fn filter_listings(db: &Database, filter: &ListingFilter) -> Result<Vec<ListingRow>> {
    let listings = db.get_listings()?;
    let booked = match filter.window() {
        Some(window) => db.get_booked_listing_ids(window.start, window.end)?,
        None => HashSet::new(),
    };

    let total = listings.len();
    let matched = filter.apply(listings, &booked);
    debug!("Listing filter kept {} of {} listings ({} booked in window)", matched.len(), total, booked.len());
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{add_listing, add_user, date, seed_reservation};

    fn ids(rows: &[ListingRow]) -> Vec<i64> {
        rows.iter().map(|l| l.id).collect()
    }

    /// Three listings: Bergen/2 guests/500, Bergen/4 guests/900, Oslo/6 guests/1500.
    fn seeded() -> (Database, String, [i64; 3]) {
        let db = Database::open_in_memory().unwrap();
        let owner = add_user(&db, "owner");
        let a = add_listing(&db, &owner, "Bergen", 2, 500);
        let b = add_listing(&db, &owner, "Bergen", 4, 900);
        let c = add_listing(&db, &owner, "Oslo", 6, 1500);
        (db, owner, [a, b, c])
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let (db, _, all) = seeded();
        let rows = filter_listings(&db, &ListingFilter::default()).unwrap();
        assert_eq!(ids(&rows), all.to_vec());
        assert!(ListingFilter::default().predicates().is_empty());
    }

    #[test]
    fn test_min_guests() {
        let (db, _, [_, b, c]) = seeded();
        let filter = ListingFilter { min_guests: Some(4), ..Default::default() };
        let rows = filter_listings(&db, &filter).unwrap();
        assert_eq!(ids(&rows), vec![b, c]);
        assert!(rows.iter().all(|l| l.guests >= 4));
    }

    #[test]
    fn test_place_and_price_range_compose() {
        let (db, _, [a, b, _]) = seeded();
        let filter = ListingFilter {
            place: Some("Bergen".into()),
            max_price: Some(1000),
            ..Default::default()
        };
        assert_eq!(ids(&filter_listings(&db, &filter).unwrap()), vec![a, b]);

        let filter = ListingFilter {
            place: Some("Bergen".into()),
            min_price: Some(600),
            max_price: Some(1000),
            ..Default::default()
        };
        assert_eq!(ids(&filter_listings(&db, &filter).unwrap()), vec![b]);

        let filter = ListingFilter { place: Some("bergen".into()), ..Default::default() };
        assert!(filter_listings(&db, &filter).unwrap().is_empty());
    }

    #[test]
    fn test_bedroom_and_bathroom_minimums() {
        let (db, _, _) = seeded();
        // seeded listings all have 2 bedrooms, 1 bathroom
        let filter = ListingFilter { min_bedrooms: Some(2), min_bathrooms: Some(1), ..Default::default() };
        assert_eq!(filter_listings(&db, &filter).unwrap().len(), 3);

        let filter = ListingFilter { min_bathrooms: Some(2), ..Default::default() };
        assert!(filter_listings(&db, &filter).unwrap().is_empty());
    }

    #[test]
    fn test_date_window_excludes_booked_listings() {
        let (db, owner, [a, b, c]) = seeded();
        seed_reservation(&db, a, &owner, "2024-06-01", "2024-06-10");

        let filter = ListingFilter {
            start_date: Some(date("2024-06-10")),
            end_date: Some(date("2024-06-14")),
            ..Default::default()
        };
        assert_eq!(ids(&filter_listings(&db, &filter).unwrap()), vec![b, c]);

        let filter = ListingFilter {
            start_date: Some(date("2024-06-11")),
            end_date: Some(date("2024-06-14")),
            ..Default::default()
        };
        assert_eq!(ids(&filter_listings(&db, &filter).unwrap()), vec![a, b, c]);
    }

    #[test]
    fn test_single_bound_is_one_day_window() {
        let (db, owner, [a, b, c]) = seeded();
        seed_reservation(&db, b, &owner, "2024-06-01", "2024-06-10");

        let filter = ListingFilter { end_date: Some(date("2024-06-10")), ..Default::default() };
        assert_eq!(filter.window(), Some(DateRange::single_day(date("2024-06-10"))));
        assert_eq!(ids(&filter_listings(&db, &filter).unwrap()), vec![a, c]);
    }

    #[test]
    fn test_apply_sorts_by_id() {
        let (db, _, [a, b, c]) = seeded();
        let mut rows = db.get_listings().unwrap();
        rows.reverse();
        let out = ListingFilter::default().apply(rows, &HashSet::from([b]));
        assert_eq!(ids(&out), vec![a, c]);
    }
}
