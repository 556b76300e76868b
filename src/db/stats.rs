use crate::db::store::RecordStore;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(store: &RecordStore, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TOTAL RECORDS / LOCATIONS
    //
    let count: i64 = store
        .conn
        .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
    let locations: i64 = store.conn.query_row(
        "SELECT COUNT(DISTINCT location) FROM records",
        [],
        |row| row.get(0),
    )?;
    println!(
        "{}• Total records:{} {}{}{}",
        CYAN, RESET, GREEN, count, RESET
    );
    println!(
        "{}• Locations:{} {}{}{}",
        CYAN, RESET, GREEN, locations, RESET
    );

    //
    // 3) DATE RANGE
    //
    let range: Option<(Option<String>, Option<String>)> = store
        .conn
        .query_row("SELECT MIN(date), MAX(date) FROM records", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .optional()?;

    let (first, last) = range.unwrap_or((None, None));
    let fmt_first = first.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    println!();
    Ok(())
}
