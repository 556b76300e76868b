//! Relative date windows built from the `duration` entity.
//!
//! The interpreter emits durations such as `- 7 days`, `-2 weeks` or
//! `- 1 months`. Only this closed grammar is accepted; anything else is a
//! decode error so that no free text ever reaches a query.

use crate::errors::{AppError, AppResult};
use chrono::{Days, Months, NaiveDate};
use regex::Regex;

/// Literal that disables the date filter.
pub const ALL_TIME: &str = "all_time";

const DURATION_PATTERN: &str = r"^\s*([+-])?\s*(\d+)\s*(day|week|month|year)s?\s*$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Days,
    Weeks,
    Months,
    Years,
}

/// Inclusive date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    /// `[today + offset, today]`; `None` for `all_time` or an absent duration.
    pub fn from_duration(duration: Option<&str>, today: NaiveDate) -> AppResult<Option<Self>> {
        let raw = match duration.map(str::trim) {
            None | Some("") | Some(ALL_TIME) => return Ok(None),
            Some(d) => d,
        };

        let (amount, unit) = parse_duration(raw)?;
        let start = shift(today, amount, unit)
            .ok_or_else(|| AppError::Decode(format!("duration '{}' is out of range", raw)))?;

        Ok(Some(Self { start, end: today }))
    }
}

/// Parse `[+|-] N unit[s]` into a signed amount and its unit.
pub fn parse_duration(raw: &str) -> AppResult<(i64, Unit)> {
    let re = Regex::new(&format!("(?i){}", DURATION_PATTERN))
        .map_err(|e| AppError::Other(e.to_string()))?;

    let caps = re
        .captures(raw)
        .ok_or_else(|| AppError::Decode(format!("unsupported duration '{}'", raw)))?;

    let magnitude: i64 = caps[2]
        .parse()
        .map_err(|_| AppError::Decode(format!("duration '{}' is out of range", raw)))?;
    let amount = match caps.get(1).map(|m| m.as_str()) {
        Some("-") => -magnitude,
        _ => magnitude,
    };

    let unit = match caps[3].to_lowercase().as_str() {
        "day" => Unit::Days,
        "week" => Unit::Weeks,
        "month" => Unit::Months,
        _ => Unit::Years,
    };

    Ok((amount, unit))
}

fn shift(date: NaiveDate, amount: i64, unit: Unit) -> Option<NaiveDate> {
    let magnitude = amount.unsigned_abs();
    let forward = amount >= 0;

    match unit {
        Unit::Days | Unit::Weeks => {
            let days = if unit == Unit::Weeks {
                magnitude.checked_mul(7)?
            } else {
                magnitude
            };
            if forward {
                date.checked_add_days(Days::new(days))
            } else {
                date.checked_sub_days(Days::new(days))
            }
        }
        Unit::Months | Unit::Years => {
            let months = if unit == Unit::Years {
                magnitude.checked_mul(12)?
            } else {
                magnitude
            };
            let months = Months::new(u32::try_from(months).ok()?);
            if forward {
                date.checked_add_months(months)
            } else {
                date.checked_sub_months(months)
            }
        }
    }
}
