use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(RelationshipId);
id_newtype!(RowId);

/// Table holding the monitored rows.
pub const MONITORED_TABLE: &str = "country_monitored_relationships";
/// Table holding the relationships that scope monitored rows.
pub const RELATIONSHIPS_TABLE: &str = "relationships";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub name: String,
}

/// Embedded `relationships(name)` join returned alongside a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredRow {
    pub id: RowId,
    #[serde(default)]
    pub relationship_id: Option<RelationshipId>,
    #[serde(default)]
    pub column_1: Option<String>,
    #[serde(default)]
    pub column_2: Option<String>,
    #[serde(default)]
    pub column_3: Option<String>,
    #[serde(default)]
    pub column_4: Option<String>,
    #[serde(default)]
    pub column_5: Option<String>,
    #[serde(default)]
    pub column_6: Option<String>,
    /// Image attachment, stored as a data URL or remote URL.
    #[serde(default)]
    pub column_7: Option<String>,
    /// Document attachment, stored as a data URL or remote URL.
    #[serde(default)]
    pub column_8: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, rename = "relationships")]
    pub relationship: Option<RelationshipRef>,
}

impl MonitoredRow {
    /// The six free-text columns, absent values as empty strings.
    pub fn text_columns(&self) -> [&str; 6] {
        [
            self.column_1.as_deref().unwrap_or_default(),
            self.column_2.as_deref().unwrap_or_default(),
            self.column_3.as_deref().unwrap_or_default(),
            self.column_4.as_deref().unwrap_or_default(),
            self.column_5.as_deref().unwrap_or_default(),
            self.column_6.as_deref().unwrap_or_default(),
        ]
    }

    /// Joined relationship name, if the row references one.
    pub fn relationship_name(&self) -> Option<&str> {
        self.relationship_id?;
        self.relationship.as_ref().map(|r| r.name.as_str())
    }

    pub fn image(&self) -> Option<&str> {
        self.column_7.as_deref().filter(|v| !v.is_empty())
    }

    pub fn document(&self) -> Option<&str> {
        self.column_8.as_deref().filter(|v| !v.is_empty())
    }
}

/// Write shape for insert and update.
///
/// Attachment columns are only serialized when a new file was chosen, so an
/// update leaves the stored attachment untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowPayload {
    pub relationship_id: Option<RelationshipId>,
    pub column_1: String,
    pub column_2: String,
    pub column_3: String,
    pub column_4: String,
    pub column_5: String,
    pub column_6: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_7: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_8: Option<String>,
}

impl RowPayload {
    pub fn text_columns(&self) -> [&str; 6] {
        [
            &self.column_1,
            &self.column_2,
            &self.column_3,
            &self.column_4,
            &self.column_5,
            &self.column_6,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_row_with_embedded_relationship() {
        let row: MonitoredRow = serde_json::from_value(serde_json::json!({
            "id": 4,
            "relationship_id": 2,
            "column_1": "a",
            "column_2": null,
            "column_7": "data:image/png;base64,AAAA",
            "created_at": "2024-03-01T10:00:00+00:00",
            "relationships": { "name": "Country A - Country B" }
        }))
        .expect("row");

        assert_eq!(row.id, RowId(4));
        assert_eq!(row.relationship_name(), Some("Country A - Country B"));
        assert_eq!(row.text_columns(), ["a", "", "", "", "", ""]);
        assert_eq!(row.image(), Some("data:image/png;base64,AAAA"));
        assert_eq!(row.document(), None);
    }

    #[test]
    fn relationship_name_requires_reference() {
        let row: MonitoredRow = serde_json::from_value(serde_json::json!({
            "id": 1,
            "relationship_id": null,
            "created_at": "2024-03-01T10:00:00Z",
            "relationships": { "name": "stale" }
        }))
        .expect("row");
        assert_eq!(row.relationship_name(), None);
    }

    #[test]
    fn payload_omits_unchanged_attachments() {
        let payload = RowPayload {
            relationship_id: Some(RelationshipId(3)),
            column_1: "x".into(),
            ..RowPayload::default()
        };
        let value = serde_json::to_value(&payload).expect("json");
        let object = value.as_object().expect("object");
        assert_eq!(object["relationship_id"], 3);
        assert!(!object.contains_key("column_7"));
        assert!(!object.contains_key("column_8"));
    }
}
