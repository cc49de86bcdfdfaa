use std::collections::HashSet;

use crate::Database;
use crate::models::{
    ImageRow, ListingDraft, ListingRow, RenterReservationRow, ReservationRow, UserRow,
};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, Row};

const LISTING_COLUMNS: &str = "id, owner_id, name, description, kind, place, price, guests, \
     bedrooms, bathrooms, start_date, end_date, created_at";

const RESERVATION_COLUMNS: &str =
    "id, listing_id, renter_id, place, start_date, end_date, created_at";

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)",
                (id, username, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, password, created_at FROM users WHERE username = ?1",
            )?;

            let row = stmt
                .query_row([username], |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })
                .optional()?;

            Ok(row)
        })
    }

    // -- Listings --

    pub fn insert_listing(&self, owner_id: &str, draft: &ListingDraft) -> Result<i64> {
        self.with_conn(|conn| insert_listing(conn, owner_id, draft))
    }

    /// Returns false when no listing has this id.
    pub fn update_listing(&self, id: i64, draft: &ListingDraft) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE listings SET name = ?1, description = ?2, kind = ?3, place = ?4,
                     price = ?5, guests = ?6, bedrooms = ?7, bathrooms = ?8,
                     start_date = ?9, end_date = ?10
                 WHERE id = ?11",
                rusqlite::params![
                    draft.name,
                    draft.description,
                    draft.kind,
                    draft.place,
                    draft.price,
                    draft.guests,
                    draft.bedrooms,
                    draft.bathrooms,
                    draft.start_date,
                    draft.end_date,
                    id,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Delete a listing together with its image rows and reservations.
    ///
    /// Returns the deleted image rows so the caller can remove their files
    /// after the commit, or `None` if the listing did not exist.
    pub fn delete_listing(&self, id: i64) -> Result<Option<Vec<ImageRow>>> {
        self.transaction(|tx| {
            if listing_by_id(tx, id)?.is_none() {
                return Ok(None);
            }
            let images = images_for_listing(tx, id)?;
            // images and reservations go with it via ON DELETE CASCADE
            tx.execute("DELETE FROM listings WHERE id = ?1", [id])?;
            Ok(Some(images))
        })
    }

    pub fn get_listing(&self, id: i64) -> Result<Option<ListingRow>> {
        self.with_conn(|conn| listing_by_id(conn, id))
    }

    /// Every listing, ordered by id.
    pub fn get_listings(&self) -> Result<Vec<ListingRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {LISTING_COLUMNS} FROM listings ORDER BY id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], listing_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_listings_by_owner(&self, owner_id: &str) -> Result<Vec<ListingRow>> {
        self.with_conn(|conn| {
            let sql =
                format!("SELECT {LISTING_COLUMNS} FROM listings WHERE owner_id = ?1 ORDER BY id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([owner_id], listing_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Images --

    pub fn insert_image(&self, listing_id: i64, file_path: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO images (listing_id, file_path) VALUES (?1, ?2)",
                rusqlite::params![listing_id, file_path],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_image(&self, id: i64) -> Result<Option<ImageRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, listing_id, file_path FROM images WHERE id = ?1",
                [id],
                image_from_row,
            )
            .optional()
        })
    }

    pub fn get_images_for_listing(&self, listing_id: i64) -> Result<Vec<ImageRow>> {
        self.with_conn(|conn| images_for_listing(conn, listing_id))
    }

    /// Batch-fetch images for a set of listing ids.
    pub fn get_images_for_listings(&self, listing_ids: &[i64]) -> Result<Vec<ImageRow>> {
        if listing_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> =
                (1..=listing_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT id, listing_id, file_path FROM images WHERE listing_id IN ({}) ORDER BY id",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(listing_ids), image_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Returns false when the image did not exist.
    pub fn delete_image(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM images WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }

    // -- Reservations --

    pub fn get_reservation(&self, id: i64) -> Result<Option<ReservationRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?1");
            conn.query_row(&sql, [id], reservation_from_row).optional()
        })
    }

    pub fn get_reservations_for_listing(&self, listing_id: i64) -> Result<Vec<ReservationRow>> {
        self.with_conn(|conn| reservations_for_listing(conn, listing_id))
    }

    pub fn get_reservations_by_renter(&self, renter_id: &str) -> Result<Vec<RenterReservationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT r.id, r.listing_id, r.renter_id, r.place, r.start_date, r.end_date,
                        r.created_at, l.name
                 FROM reservations r
                 JOIN listings l ON l.id = r.listing_id
                 WHERE r.renter_id = ?1
                 ORDER BY r.start_date, r.id",
            )?;
            let rows = stmt
                .query_map([renter_id], |row| {
                    Ok(RenterReservationRow {
                        reservation: reservation_from_row(row)?,
                        listing_name: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Uses the place copied onto each reservation, no join needed.
    pub fn get_reservations_by_place(&self, place: &str) -> Result<Vec<ReservationRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE place = ?1 ORDER BY start_date, id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([place], reservation_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Ids of listings holding at least one reservation that intersects
    /// `[start, end]` (both ends inclusive).
    pub fn get_booked_listing_ids(&self, start: NaiveDate, end: NaiveDate) -> Result<HashSet<i64>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT listing_id FROM reservations
                 WHERE start_date <= ?2 AND end_date >= ?1",
            )?;
            let ids = stmt
                .query_map(rusqlite::params![start, end], |row| row.get::<_, i64>(0))?
                .collect::<std::result::Result<HashSet<_>, _>>()?;
            Ok(ids)
        })
    }

    /// Returns false when the reservation did not exist.
    pub fn delete_reservation(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM reservations WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }
}

// -- Connection-level queries, usable inside a transaction --

pub fn insert_listing(conn: &Connection, owner_id: &str, draft: &ListingDraft) -> Result<i64> {
    conn.execute(
        "INSERT INTO listings (owner_id, name, description, kind, place, price, guests,
                               bedrooms, bathrooms, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        rusqlite::params![
            owner_id,
            draft.name,
            draft.description,
            draft.kind,
            draft.place,
            draft.price,
            draft.guests,
            draft.bedrooms,
            draft.bathrooms,
            draft.start_date,
            draft.end_date,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn listing_by_id(conn: &Connection, id: i64) -> Result<Option<ListingRow>> {
    let sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?1");
    conn.query_row(&sql, [id], listing_from_row).optional()
}

pub fn images_for_listing(conn: &Connection, listing_id: i64) -> Result<Vec<ImageRow>> {
    let mut stmt =
        conn.prepare("SELECT id, listing_id, file_path FROM images WHERE listing_id = ?1 ORDER BY id")?;
    let rows = stmt
        .query_map([listing_id], image_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Reservations of one listing, earliest first.
pub fn reservations_for_listing(conn: &Connection, listing_id: i64) -> Result<Vec<ReservationRow>> {
    let sql = format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE listing_id = ?1 ORDER BY start_date, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([listing_id], reservation_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn insert_reservation(
    conn: &Connection,
    listing_id: i64,
    renter_id: &str,
    place: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<ReservationRow> {
    conn.execute(
        "INSERT INTO reservations (listing_id, renter_id, place, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![listing_id, renter_id, place, start_date, end_date],
    )?;
    let id = conn.last_insert_rowid();

    let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?1");
    let row = conn.query_row(&sql, [id], reservation_from_row)?;
    Ok(row)
}

/// True when `err` is the overlap trigger rejecting a double booking.
pub fn is_overlap_violation(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<rusqlite::Error>() {
        Some(rusqlite::Error::SqliteFailure(e, Some(msg))) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation && msg.contains(crate::OVERLAP_ERROR)
        }
        _ => false,
    }
}

fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<ListingRow> {
    Ok(ListingRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        kind: row.get(4)?,
        place: row.get(5)?,
        price: row.get(6)?,
        guests: row.get(7)?,
        bedrooms: row.get(8)?,
        bathrooms: row.get(9)?,
        start_date: row.get(10)?,
        end_date: row.get(11)?,
        created_at: row.get(12)?,
    })
}

fn image_from_row(row: &Row<'_>) -> rusqlite::Result<ImageRow> {
    Ok(ImageRow {
        id: row.get(0)?,
        listing_id: row.get(1)?,
        file_path: row.get(2)?,
    })
}

fn reservation_from_row(row: &Row<'_>) -> rusqlite::Result<ReservationRow> {
    Ok(ReservationRow {
        id: row.get(0)?,
        listing_id: row.get(1)?,
        renter_id: row.get(2)?,
        place: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
