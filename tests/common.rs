#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use covidvisor::db::store::RecordStore;
use covidvisor::models::record::Record;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn cvi() -> Command {
    cargo_bin_cmd!("covidvisor")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_covidvisor.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Write `content` to a temp file and return its path
pub fn temp_file(name: &str, ext: &str, content: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_covidvisor.{}", name, ext));
    fs::write(&path, content).expect("write temp file");
    path
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("fixture date")
}

pub fn rec(location: &str, day: &str, domestic: i64, foreign: i64, recovered: i64, deceased: i64) -> Record {
    Record {
        location: location.to_string(),
        date: date(day),
        domestic_confirmed: domestic,
        foreign_confirmed: foreign,
        recovered,
        deceased,
    }
}

/// Fresh store at a unique temp path, seeded with `records`
pub fn store_with(name: &str, records: &[Record]) -> RecordStore {
    let db_path = setup_test_db(name);
    let mut store = RecordStore::open(&db_path).expect("open store");
    store.insert_records(records).expect("seed store");
    store
}

/// Reference date used by `fixture_records`
pub fn fixture_today() -> NaiveDate {
    date("2020-03-10")
}

/// Kerala: confirmed 15 10 5 8 3 (41), recovered 12, deceased 3.
/// Delhi: confirmed 20 7 (27), recovered 10, deceased 3.
pub fn fixture_records() -> Vec<Record> {
    vec![
        rec("Kerala", "2020-03-01", 10, 0, 2, 0),
        rec("Kerala", "2020-03-02", 15, 0, 5, 1),
        rec("Kerala", "2020-03-04", 4, 1, 0, 0),
        rec("Kerala", "2020-03-08", 6, 2, 1, 0),
        rec("Kerala", "2020-03-10", 3, 0, 4, 2),
        rec("Delhi", "2020-03-09", 20, 0, 9, 3),
        rec("Delhi", "2020-03-10", 7, 0, 1, 0),
    ]
}

/// Wide-format dataset: two dates x four labels, two locations and a totals row
pub const DATASET_CSV: &str = "\
Name of State / UT,01/03/20,01/03/20,01/03/20,01/03/20,02/03/20,02/03/20,02/03/20,02/03/20
,TCIN,TCFN,Cured,Death,TCIN,TCFN,Cured,Death
Kerala,10,0,2,0,15,0,5,1
Delhi,1,2,0,0,3,1,1,0
Total,11,2,2,0,18,1,6,1
";

/// Initialize a DB through the CLI and seed it with `DATASET_CSV`
pub fn init_seeded_db(name: &str) -> String {
    let db_path = setup_test_db(name);
    let csv = temp_file(name, "csv", DATASET_CSV);

    cvi()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    cvi()
        .args(["--db", &db_path, "seed", "--file", &csv.to_string_lossy()])
        .assert()
        .success();

    db_path
}
