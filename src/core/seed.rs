//! Wide-format CSV ingestion.
//!
//! Row 1 holds a date per column, row 2 the label of the count in that column
//! (`TCIN`, `TCFN`, `Cured`, `Death`), rows 3.. one location each. The first
//! column names the location; the last row is a totals row and is skipped.

use crate::db::log::audit;
use crate::db::store::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::models::record::Record;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DATE_FORMAT: &str = "%d/%m/%y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    DomesticConfirmed,
    ForeignConfirmed,
    Recovered,
    Deceased,
}

impl Column {
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "TCIN" => Some(Column::DomesticConfirmed),
            "TCFN" => Some(Column::ForeignConfirmed),
            "Cured" => Some(Column::Recovered),
            "Death" => Some(Column::Deceased),
            _ => None,
        }
    }
}

pub struct SeedLogic;

impl SeedLogic {
    /// Parse the dataset and insert it, unless the store already has rows.
    pub fn seed(store: &mut RecordStore, path: &Path) -> AppResult<usize> {
        let records = Self::parse_file(path)?;
        let inserted = store.insert_records(&records)?;

        let operation = if inserted > 0 { "seed" } else { "seed_skipped" };
        audit(
            &store.conn,
            operation,
            &path.to_string_lossy(),
            &format!("{} of {} parsed records inserted", inserted, records.len()),
        );
        Ok(inserted)
    }

    pub fn parse_file(path: &Path) -> AppResult<Vec<Record>> {
        let file = File::open(path)
            .map_err(|e| AppError::Ingest(format!("unable to open csv file {:?}, {}", path, e)))?;
        Self::parse_reader(file)
    }

    /// Records deduplicated by (date, location), sorted by date then location.
    pub fn parse_reader<R: Read>(reader: R) -> AppResult<Vec<Record>> {
        let mut csv = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows: Vec<StringRecord> = Vec::new();
        for row in csv.records() {
            rows.push(row.map_err(|e| AppError::Ingest(format!("unable to read csv row, {}", e)))?);
        }

        if rows.len() < 3 {
            return Err(AppError::Ingest(
                "expected at least three rows in the csv file".to_string(),
            ));
        }

        let columns = Self::header_columns(&rows[0], &rows[1])?;

        let mut entries: BTreeMap<(NaiveDate, String), Record> = BTreeMap::new();
        let data_rows = &rows[2..rows.len() - 1];

        for (offset, row) in data_rows.iter().enumerate() {
            let location = row.get(0).map(str::trim).unwrap_or("");
            if location.is_empty() {
                continue;
            }

            for (idx, slot) in columns.iter().enumerate() {
                let Some((date, column)) = slot else {
                    continue;
                };
                let raw = row.get(idx).unwrap_or("");
                let value = parse_count(raw).ok_or_else(|| {
                    AppError::Ingest(format!(
                        "invalid count '{}' at row {}, column {}",
                        raw,
                        offset + 3,
                        idx + 1
                    ))
                })?;

                let entry = entries
                    .entry((*date, location.to_string()))
                    .or_insert_with(|| Record::empty(location, *date));

                match column {
                    Column::DomesticConfirmed => entry.domestic_confirmed = value,
                    Column::ForeignConfirmed => entry.foreign_confirmed = value,
                    Column::Recovered => entry.recovered = value,
                    Column::Deceased => entry.deceased = value,
                }
            }
        }

        Ok(entries.into_values().collect())
    }

    /// Resolve `(date, column)` for every cell index. Column 0 and unlabeled
    /// columns map to `None`. A blank date cell repeats the previous date, which
    /// is how merged header cells come out of a spreadsheet export.
    fn header_columns(
        dates: &StringRecord,
        labels: &StringRecord,
    ) -> AppResult<Vec<Option<(NaiveDate, Column)>>> {
        let width = dates.len().max(labels.len());
        let mut out = vec![None; width];
        let mut current: Option<NaiveDate> = None;

        for (idx, slot) in out.iter_mut().enumerate().skip(1) {
            let raw_date = dates.get(idx).map(str::trim).unwrap_or("");
            if !raw_date.is_empty() {
                let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT)
                    .map_err(|_| AppError::InvalidDate(raw_date.to_string()))?;
                current = Some(date);
            }

            let label = labels.get(idx).map(str::trim).unwrap_or("");
            if label.is_empty() {
                continue;
            }
            let column = Column::from_label(label).ok_or_else(|| {
                AppError::Ingest(format!("unknown label '{}' in column {}", label, idx + 1))
            })?;
            let date = current.ok_or_else(|| {
                AppError::Ingest(format!("column {} has a label but no date", idx + 1))
            })?;

            *slot = Some((date, column));
        }

        Ok(out)
    }
}

/// Non-negative count; blank cells and `-` count as zero.
fn parse_count(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return Some(0);
    }
    s.parse::<i64>().ok().filter(|v| *v >= 0)
}
