//! Aggregate query templates over the `records` table.
//!
//! Query text is assembled only from `Measure`/`Aggregate` enums and a fixed
//! window clause; location, threshold and window bounds are always bound
//! parameters.

use crate::db::store::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::models::measure::Measure;
use crate::models::window::Window;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, params_from_iter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Max,
    Avg,
}

impl Aggregate {
    fn sql_fn(&self) -> &'static str {
        match self {
            Aggregate::Sum => "SUM",
            Aggregate::Max => "MAX",
            Aggregate::Avg => "AVG",
        }
    }
}

/// Scalar produced by a windowed aggregate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Int(i64),
    Real(f64),
}

fn date_value(d: NaiveDate) -> Value {
    Value::Text(d.format("%Y-%m-%d").to_string())
}

/// Append the window predicate, binding its bounds after the existing args.
fn push_window(sql: &mut String, args: &mut Vec<Value>, window: Option<Window>) {
    if let Some(w) = window {
        sql.push_str(&format!(
            " AND date >= ?{} AND date <= ?{}",
            args.len() + 1,
            args.len() + 2
        ));
        args.push(date_value(w.start));
        args.push(date_value(w.end));
    }
}

/// Sum of the measure for one location on one date; `None` when no row exists.
pub fn sum_on_date(
    store: &RecordStore,
    measure: Measure,
    location: &str,
    date: NaiveDate,
) -> AppResult<Option<i64>> {
    let sql = format!(
        "SELECT COUNT(*), COALESCE(SUM({}), 0) FROM records WHERE location = ?1 AND date = ?2",
        measure.sql_expr()
    );

    let (rows, total): (i64, i64) = store
        .conn
        .query_row(
            &sql,
            params_from_iter([Value::Text(location.to_string()), date_value(date)]),
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(AppError::Query)?;

    Ok((rows > 0).then_some(total))
}

/// SUM / MAX / AVG of the measure for one location, 0 when nothing matches.
pub fn aggregate_in_window(
    store: &RecordStore,
    aggregate: Aggregate,
    measure: Measure,
    location: &str,
    window: Option<Window>,
) -> AppResult<Scalar> {
    let mut sql = format!(
        "SELECT COALESCE({}({}), 0) FROM records WHERE location = ?1",
        aggregate.sql_fn(),
        measure.sql_expr()
    );
    let mut args = vec![Value::Text(location.to_string())];
    push_window(&mut sql, &mut args, window);

    let value = match aggregate {
        Aggregate::Avg => store
            .conn
            .query_row(&sql, params_from_iter(args.iter()), |row| {
                row.get::<_, f64>(0)
            })
            .map(Scalar::Real),
        Aggregate::Sum | Aggregate::Max => store
            .conn
            .query_row(&sql, params_from_iter(args.iter()), |row| {
                row.get::<_, i64>(0)
            })
            .map(Scalar::Int),
    };

    value.map_err(AppError::Query)
}

/// Location with the largest all-time sum; ties go to the smallest name.
pub fn top_location(store: &RecordStore, measure: Measure) -> AppResult<Option<String>> {
    let sql = format!(
        "SELECT location, COALESCE(SUM({}), 0) AS total
         FROM records
         GROUP BY location
         ORDER BY total DESC, location ASC
         LIMIT 1",
        measure.sql_expr()
    );

    store
        .conn
        .query_row(&sql, [], |row| row.get::<_, String>(0))
        .optional()
        .map_err(AppError::Query)
}

/// Date (YYYY-MM-DD) with the largest per-date sum at or above `threshold`.
/// Ties go to the most recent date.
pub fn top_date(
    store: &RecordStore,
    measure: Measure,
    location: &str,
    window: Option<Window>,
    threshold: i64,
) -> AppResult<Option<String>> {
    let mut sql = format!(
        "SELECT date, COALESCE(SUM({}), 0) AS total FROM records WHERE location = ?1",
        measure.sql_expr()
    );
    let mut args = vec![Value::Text(location.to_string())];
    push_window(&mut sql, &mut args, window);

    sql.push_str(&format!(
        " GROUP BY date HAVING total >= ?{} ORDER BY total DESC, date DESC LIMIT 1",
        args.len() + 1
    ));
    args.push(Value::Integer(threshold));

    store
        .conn
        .query_row(&sql, params_from_iter(args.iter()), |row| {
            row.get::<_, String>(0)
        })
        .optional()
        .map_err(AppError::Query)
}
