use super::*;
use std::io::Write;

/// Header row using the pre-rename legacy names for the three affected
/// category pairs, as the upstream export produces them.
fn legacy_header() -> String {
    let mut headers = vec![
        "date_".to_string(),
        "overall_sessions".to_string(),
        "overall_messages".to_string(),
    ];
    for category in &CATEGORIES {
        let prefix = match category.prefix {
            "sb_hardware" => "sb",
            "edc_hardware" => "edc",
            "payment_acceptance" => "payment_acceptence",
            other => other,
        };
        headers.push(format!("{prefix}_sessions"));
        headers.push(format!("{prefix}_messages"));
    }
    headers.join(",")
}

/// One data row: the date, the two overall totals, then `value` in every
/// category cell (or empty cells when `value` is None).
fn data_row(date: &str, overall: u64, value: Option<u64>) -> String {
    let cell = value.map(|v| v.to_string()).unwrap_or_default();
    let mut row = vec![date.to_string(), overall.to_string(), overall.to_string()];
    for _ in 0..CATEGORIES.len() * 2 {
        row.push(cell.clone());
    }
    row.join(",")
}

fn write_fixture(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("base_dod_data.csv");
    let mut file = fs::File::create(&path).expect("create fixture");
    file.write_all(content.as_bytes()).expect("write fixture");
    (dir, path)
}

#[test]
fn renames_legacy_columns_exactly() {
    let content = format!(
        "{}\n{}\n{}\n",
        legacy_header(),
        data_row("2024-01-01", 5, Some(1)),
        data_row("2024-01-02", 7, Some(2)),
    );
    let (_dir, path) = write_fixture(&content);
    let table = parse_file(&path).expect("parse fixture");

    for legacy in [
        "sb_sessions",
        "sb_messages",
        "edc_sessions",
        "edc_messages",
        "payment_acceptence_sessions",
        "payment_acceptence_messages",
    ] {
        assert!(!table.has_column(legacy), "legacy column {legacy} survived");
    }
    for canonical in [
        "sb_hardware_sessions",
        "sb_hardware_messages",
        "edc_hardware_sessions",
        "edc_hardware_messages",
        "payment_acceptance_sessions",
        "payment_acceptance_messages",
    ] {
        let column = table.column(canonical).expect("canonical column present");
        assert_eq!(column.values, vec![Some(1), Some(2)]);
    }
}

#[test]
fn sorts_rows_by_date_and_accepts_datetime_cells() {
    let content = format!(
        "{}\n{}\n{}\n",
        legacy_header(),
        data_row("2024-01-03 00:00:00", 3, Some(3)),
        data_row("2024-01-01", 5, Some(1)),
    );
    let (_dir, path) = write_fixture(&content);
    let table = parse_file(&path).expect("parse fixture");

    let expected: Vec<NaiveDate> = ["2024-01-01", "2024-01-03"]
        .iter()
        .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap())
        .collect();
    assert_eq!(table.dates, expected);
    // Column values follow the rows into sorted order.
    assert_eq!(
        table.column("overall_sessions").unwrap().values,
        vec![Some(5), Some(3)]
    );
}

#[test]
fn empty_cells_become_nulls() {
    let content = format!(
        "{}\n{}\n",
        legacy_header(),
        data_row("2024-01-01", 9, None),
    );
    let (_dir, path) = write_fixture(&content);
    let table = parse_file(&path).expect("parse fixture");

    assert_eq!(
        table.column("refund_sessions").unwrap().values,
        vec![None]
    );
    assert_eq!(
        table.column("overall_sessions").unwrap().values,
        vec![Some(9)]
    );
}

#[test]
fn rejects_missing_required_columns() {
    let (_dir, path) = write_fixture("date_,overall_sessions\n2024-01-01,5\n");
    let err = parse_file(&path).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("missing required column"), "got: {msg}");
    assert!(msg.contains("overall_messages"), "got: {msg}");
}

#[test]
fn rejects_bad_cells_and_duplicate_dates() {
    let header = legacy_header();

    let mut bad_row = data_row("2024-01-01", 5, Some(1));
    bad_row = bad_row.replace(",5,", ",not-a-number,");
    let (_dir, path) = write_fixture(&format!("{header}\n{bad_row}\n"));
    let err = parse_file(&path).unwrap_err();
    assert!(format!("{err}").contains("non-negative integer"));

    let content = format!(
        "{}\n{}\n{}\n",
        header,
        data_row("2024-01-01", 5, Some(1)),
        data_row("2024-01-01", 7, Some(2)),
    );
    let (_dir, path) = write_fixture(&content);
    let err = parse_file(&path).unwrap_err();
    assert!(format!("{err}").contains("duplicate date"));

    let (_dir, path) = write_fixture("");
    let err = parse_file(&path).unwrap_err();
    assert!(format!("{err}").contains("dataset is empty"));
}

#[test]
fn load_is_idempotent_and_reads_the_source_once() {
    let content = format!(
        "{}\n{}\n",
        legacy_header(),
        data_row("2024-01-01", 5, Some(1)),
    );
    let (_dir, path) = write_fixture(&content);
    set_test_data_path(path.clone());

    let first = load(&path).expect("first load");
    assert_eq!(first.num_rows(), 1);

    // Removing the source proves the second call never re-reads it.
    fs::remove_file(&path).expect("remove fixture");
    let second = load(&path).expect("second load");
    assert!(std::ptr::eq(first, second));
}
