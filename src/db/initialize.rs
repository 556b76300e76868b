use crate::errors::AppResult;
use rusqlite::Connection;

/// Create the `records` and `log` tables if they do not exist yet.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS records (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            location           TEXT NOT NULL,
            date               TEXT NOT NULL,
            domestic_confirmed INTEGER NOT NULL DEFAULT 0,
            foreign_confirmed  INTEGER NOT NULL DEFAULT 0,
            recovered          INTEGER NOT NULL DEFAULT 0,
            deceased           INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_records_location_date ON records(location, date);

        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}
