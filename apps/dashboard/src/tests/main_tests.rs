use super::*;

use shared::domain::{MonitoredRow, RelationshipRef};

#[test]
fn edit_arguments_parse_into_row_fields() {
    let cli = Cli::try_parse_from([
        "dashboard",
        "--store-url",
        "sqlite::memory:",
        "edit",
        "--relationship",
        "3",
        "--page",
        "2",
        "--row",
        "17",
        "--col2",
        "updated",
        "--image",
        "photo.png",
    ])
    .expect("parse");

    match cli.command {
        Command::Edit {
            relationship,
            page,
            row,
            fields,
        } => {
            assert_eq!((relationship, page, row), (3, 2, 17));
            assert_eq!(fields.col2.as_deref(), Some("updated"));
            assert_eq!(fields.col1, None);
            assert_eq!(fields.image, Some(PathBuf::from("photo.png")));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn news_rejects_both_relationship_and_query() {
    let result = Cli::try_parse_from([
        "dashboard",
        "news",
        "--relationship-name",
        "A - B",
        "--query",
        "trade",
    ]);
    assert!(result.is_err());
}

#[test]
fn unset_fields_keep_current_form_values() {
    let row = MonitoredRow {
        id: RowId(5),
        relationship_id: Some(RelationshipId(1)),
        column_1: Some("one".to_string()),
        column_2: Some("two".to_string()),
        column_3: None,
        column_4: None,
        column_5: None,
        column_6: None,
        column_7: None,
        column_8: None,
        created_at: "2024-03-01T10:00:00Z".parse().expect("timestamp"),
        relationship: Some(RelationshipRef {
            name: "A - B".to_string(),
        }),
    };
    let mut form = EditForm::for_edit(RowId(5), Some(&row), Vec::new());

    RowFields {
        col2: Some("changed".to_string()),
        target_relationship: Some(9),
        ..RowFields::default()
    }
    .apply(&mut form);

    assert_eq!(form.columns[0], "one");
    assert_eq!(form.columns[1], "changed");
    assert_eq!(form.relationship_id, Some(RelationshipId(9)));
    assert_eq!(form.image_file, None);
}

