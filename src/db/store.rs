//! File-backed record store (single SQLite connection, CLI sized).

use crate::db::initialize::init_db;
use crate::errors::{AppError, AppResult};
use crate::models::record::Record;
use rusqlite::{Connection, params};
use std::fs;
use std::path::Path;

pub struct RecordStore {
    pub conn: Connection,
}

impl RecordStore {
    /// Open the store, creating the file and schema on first use.
    ///
    /// A file created by this call is removed again if the schema cannot be
    /// applied, so a broken store never survives a failed bootstrap.
    pub fn open(path: &str) -> AppResult<Self> {
        let p = Path::new(path);
        let is_created = !p.exists();

        if is_created {
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::File::create(p)?;
        }

        let conn = match Connection::open(p) {
            Ok(conn) => conn,
            Err(e) => {
                if is_created {
                    remove_created(path)?;
                }
                return Err(AppError::Db(e));
            }
        };

        if let Err(e) = init_db(&conn) {
            drop(conn);
            if is_created {
                remove_created(path)?;
            }
            return Err(e);
        }

        Ok(Self { conn })
    }

    pub fn count(&self) -> AppResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(n)
    }

    /// Insert all records in one transaction, unless the store already holds data.
    ///
    /// Returns the number of inserted rows (0 when seeding is skipped).
    pub fn insert_records(&mut self, records: &[Record]) -> AppResult<usize> {
        if records.is_empty() || self.count()? > 0 {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO records (location, date, domestic_confirmed, foreign_confirmed, recovered, deceased)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;

            for r in records {
                stmt.execute(params![
                    r.location,
                    r.date.format("%Y-%m-%d").to_string(),
                    r.domestic_confirmed,
                    r.foreign_confirmed,
                    r.recovered,
                    r.deceased,
                ])?;
            }
        }
        tx.commit()?;

        Ok(records.len())
    }
}

fn remove_created(path: &str) -> AppResult<()> {
    fs::remove_file(path).map_err(|e| {
        AppError::Other(format!(
            "unable to delete newly created database, remove the file '{}' manually: {}",
            path, e
        ))
    })
}
