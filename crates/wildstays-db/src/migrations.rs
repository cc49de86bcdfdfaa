use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Message raised by the overlap trigger when an insert would double-book a listing.
pub const OVERLAP_ERROR: &str = "reservation overlaps an existing reservation";

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| {
            r.get(0)
        })?;

    if version < 1 {
        info!("Running migration v1 (users, listings, images, reservations)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE listings (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id    TEXT NOT NULL REFERENCES users(id),
                name        TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                kind        TEXT NOT NULL DEFAULT '',
                place       TEXT NOT NULL,
                price       INTEGER NOT NULL CHECK (price > 0),
                guests      INTEGER NOT NULL CHECK (guests > 0),
                bedrooms    INTEGER NOT NULL CHECK (bedrooms > 0),
                bathrooms   INTEGER NOT NULL CHECK (bathrooms > 0),
                start_date  TEXT NOT NULL,
                end_date    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                CHECK (start_date <= end_date)
            );

            CREATE INDEX idx_listings_owner ON listings(owner_id);

            CREATE TABLE images (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                listing_id  INTEGER NOT NULL REFERENCES listings(id) ON DELETE CASCADE,
                file_path   TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_images_listing ON images(listing_id);

            CREATE TABLE reservations (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                listing_id  INTEGER NOT NULL REFERENCES listings(id) ON DELETE CASCADE,
                renter_id   TEXT NOT NULL REFERENCES users(id),
                place       TEXT NOT NULL,
                start_date  TEXT NOT NULL,
                end_date    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                CHECK (start_date <= end_date)
            );

            CREATE INDEX idx_reservations_listing ON reservations(listing_id, start_date);
            CREATE INDEX idx_reservations_renter ON reservations(renter_id);
            CREATE INDEX idx_reservations_place ON reservations(place);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    if version < 2 {
        info!("Running migration v2 (reservation overlap trigger)");
        // Dates are ISO-8601 text, so string comparison is date comparison.
        conn.execute_batch(&format!(
            "
            CREATE TRIGGER reservations_no_overlap
            BEFORE INSERT ON reservations
            WHEN EXISTS (
                SELECT 1 FROM reservations r
                WHERE r.listing_id = NEW.listing_id
                  AND NEW.start_date <= r.end_date
                  AND NEW.end_date >= r.start_date
            )
            BEGIN
                SELECT RAISE(ABORT, '{OVERLAP_ERROR}');
            END;

            INSERT INTO schema_version (version) VALUES (2);
            "
        ))?;
    }

    info!("Database migrations complete");
    Ok(())
}
