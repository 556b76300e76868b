use chrono::NaiveDate;
use serde::Serialize;

/// One row of the `records` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub location: String,        // ⇔ records.location (TEXT NOT NULL)
    pub date: NaiveDate,         // ⇔ records.date (TEXT "YYYY-MM-DD")
    pub domestic_confirmed: i64, // ⇔ records.domestic_confirmed
    pub foreign_confirmed: i64,  // ⇔ records.foreign_confirmed
    pub recovered: i64,          // ⇔ records.recovered
    pub deceased: i64,           // ⇔ records.deceased
}

impl Record {
    /// A record with every count at zero.
    pub fn empty(location: &str, date: NaiveDate) -> Self {
        Self {
            location: location.to_string(),
            date,
            domestic_confirmed: 0,
            foreign_confirmed: 0,
            recovered: 0,
            deceased: 0,
        }
    }
}
