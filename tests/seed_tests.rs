use covidvisor::core::seed::SeedLogic;
use covidvisor::db::log::load_log;
use covidvisor::db::store::RecordStore;
use covidvisor::errors::AppError;
use std::path::Path;

mod common;
use common::{DATASET_CSV, rec, setup_test_db, temp_file};

#[test]
fn parses_wide_format_and_skips_totals_row() {
    let records = SeedLogic::parse_reader(DATASET_CSV.as_bytes()).expect("parse");

    assert_eq!(
        records,
        vec![
            rec("Delhi", "2020-03-01", 1, 2, 0, 0),
            rec("Kerala", "2020-03-01", 10, 0, 2, 0),
            rec("Delhi", "2020-03-02", 3, 1, 1, 0),
            rec("Kerala", "2020-03-02", 15, 0, 5, 1),
        ]
    );
    assert!(records.iter().all(|r| r.location != "Total"));
}

#[test]
fn blank_date_cells_repeat_previous_date() {
    let csv = "\
State,05/04/20,,,
,TCIN,TCFN,Cured,Death
Goa,7,1,3,0
Total,7,1,3,0
";
    let records = SeedLogic::parse_reader(csv.as_bytes()).expect("parse");
    assert_eq!(records, vec![rec("Goa", "2020-04-05", 7, 1, 3, 0)]);
}

#[test]
fn duplicate_location_rows_are_merged_by_key() {
    let csv = "\
State,01/03/20,01/03/20
,TCIN,Death
Goa,4,0
Goa,6,2
Total,10,2
";
    let records = SeedLogic::parse_reader(csv.as_bytes()).expect("parse");
    assert_eq!(records, vec![rec("Goa", "2020-03-01", 6, 0, 0, 2)]);
}

#[test]
fn rejects_bad_inputs() {
    assert!(matches!(
        SeedLogic::parse_reader("a,b\n,TCIN\n".as_bytes()),
        Err(AppError::Ingest(_))
    ));

    let bad_label = "State,01/03/20\n,Active\nGoa,1\nTotal,1\n";
    assert!(matches!(
        SeedLogic::parse_reader(bad_label.as_bytes()),
        Err(AppError::Ingest(_))
    ));

    let bad_date = "State,2020-03-01\n,TCIN\nGoa,1\nTotal,1\n";
    assert!(matches!(
        SeedLogic::parse_reader(bad_date.as_bytes()),
        Err(AppError::InvalidDate(_))
    ));

    let negative = "State,01/03/20\n,TCIN\nGoa,-4\nTotal,-4\n";
    assert!(matches!(
        SeedLogic::parse_reader(negative.as_bytes()),
        Err(AppError::Ingest(_))
    ));
}

#[test]
fn open_creates_store_file_and_schema() {
    let db_path = setup_test_db("seed_open_creates");
    assert!(!Path::new(&db_path).exists());

    let store = RecordStore::open(&db_path).expect("open");
    assert!(Path::new(&db_path).exists());
    assert_eq!(store.count().expect("count"), 0);

    let columns: Vec<String> = {
        let mut stmt = store
            .conn
            .prepare("PRAGMA table_info('records')")
            .expect("table info");
        let names: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query")
            .map(|c| c.expect("column"))
            .collect();
        names
    };
    assert_eq!(
        columns,
        [
            "id",
            "location",
            "date",
            "domestic_confirmed",
            "foreign_confirmed",
            "recovered",
            "deceased"
        ]
    );
}

#[test]
fn seeding_twice_keeps_row_count() {
    let db_path = setup_test_db("seed_idempotent");
    let csv = temp_file("seed_idempotent", "csv", DATASET_CSV);
    let mut store = RecordStore::open(&db_path).expect("open");

    assert_eq!(SeedLogic::seed(&mut store, &csv).expect("first seed"), 4);
    assert_eq!(store.count().expect("count"), 4);

    assert_eq!(SeedLogic::seed(&mut store, &csv).expect("second seed"), 0);
    assert_eq!(store.count().expect("count"), 4);

    let ops: Vec<String> = load_log(&store.conn)
        .expect("log")
        .into_iter()
        .map(|e| e.operation)
        .collect();
    assert_eq!(ops, ["seed", "seed_skipped"]);
}

#[test]
fn insert_is_skipped_when_store_has_rows() {
    let db_path = setup_test_db("seed_skip_non_empty");
    let mut store = RecordStore::open(&db_path).expect("open");

    let first = [rec("Goa", "2020-03-01", 1, 0, 0, 0)];
    assert_eq!(store.insert_records(&first).expect("insert"), 1);

    let second = [
        rec("Goa", "2020-03-02", 2, 0, 0, 0),
        rec("Goa", "2020-03-03", 3, 0, 0, 0),
    ];
    assert_eq!(store.insert_records(&second).expect("insert"), 0);
    assert_eq!(store.count().expect("count"), 1);
}

#[test]
fn failed_parse_inserts_nothing() {
    let db_path = setup_test_db("seed_failed_parse");
    let csv = temp_file("seed_failed_parse", "csv", "State,01/03/20\n,TCIN\nGoa,x\nTotal,1\n");
    let mut store = RecordStore::open(&db_path).expect("open");

    assert!(SeedLogic::seed(&mut store, &csv).is_err());
    assert_eq!(store.count().expect("count"), 0);
}
