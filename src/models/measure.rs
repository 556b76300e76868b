use serde::Serialize;

/// Which stored quantity a query aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Measure {
    Confirmed, // domestic + foreign
    Recovered,
    Deceased,
}

impl Measure {
    /// Map the `case_type` entity. Absent or unknown values mean total confirmed.
    pub fn from_case_type(case_type: Option<&str>) -> Self {
        match case_type {
            Some("recovery_cases") => Measure::Recovered,
            Some("death_cases") => Measure::Deceased,
            _ => Measure::Confirmed,
        }
    }

    /// SQL expression over the `records` columns.
    pub fn sql_expr(&self) -> &'static str {
        match self {
            Measure::Confirmed => "(domestic_confirmed + foreign_confirmed)",
            Measure::Recovered => "(recovered)",
            Measure::Deceased => "(deceased)",
        }
    }
}
