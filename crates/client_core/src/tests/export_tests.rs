use super::*;

use chrono::{TimeZone, Utc};
use shared::domain::{RelationshipId, RelationshipRef, RowId};

fn row(id: i64, image: Option<&str>) -> MonitoredRow {
    MonitoredRow {
        id: RowId(id),
        relationship_id: Some(RelationshipId(1)),
        column_1: Some(format!("text-{id}")),
        column_2: None,
        column_3: None,
        column_4: None,
        column_5: None,
        column_6: None,
        column_7: image.map(str::to_string),
        column_8: Some("https://files.example/report.pdf".to_string()),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
        relationship: Some(RelationshipRef {
            name: "Country A - Country B".to_string(),
        }),
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 7).expect("date")
}

#[test]
fn filename_is_suffixed_with_date() {
    assert_eq!(
        export_filename(date()),
        "country_monitored_relationships_20240307.xlsx"
    );
}

#[test]
fn table_has_one_row_per_loaded_row_with_raw_attachments() {
    let rows = vec![
        row(11, Some("data:image/png;base64,AAAA")),
        row(12, None),
        row(13, None),
    ];
    let table = build_export_table(&rows, date());

    assert_eq!(table.sheet_name, "Country Monitored Relationships");
    assert_eq!(table.headers.len(), 11);
    assert_eq!(table.headers[0], "S.No");
    assert_eq!(table.headers[10], "Created At");
    assert_eq!(table.rows.len(), 3);

    let first = &table.rows[0];
    assert_eq!(first[0], "1");
    assert_eq!(first[1], "Country A - Country B");
    assert_eq!(first[2], "text-11");
    assert_eq!(first[8], "data:image/png;base64,AAAA");
    assert_eq!(first[9], "https://files.example/report.pdf");
    assert_eq!(table.rows[1][8], "");
    assert_eq!(table.rows[2][0], "3");
}

#[test]
fn xlsx_sink_writes_named_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let sink = XlsxExportSink::new(dir.path().join("exports"));
    let table = build_export_table(&[row(1, None)], date());

    let path = sink.write(&table).expect("write");

    assert_eq!(
        path,
        dir.path()
            .join("exports")
            .join("country_monitored_relationships_20240307.xlsx")
    );
    let bytes = std::fs::read(&path).expect("read");
    assert!(bytes.starts_with(b"PK"), "xlsx files are zip archives");
}

#[test]
fn oversized_cells_are_clipped_to_the_cell_limit() {
    let long = "a".repeat(MAX_CELL_CHARS + 10);
    assert_eq!(clip_cell(&long).len(), MAX_CELL_CHARS);
    assert_eq!(clip_cell("short"), "short");
}
