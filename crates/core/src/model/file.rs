use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

//
// ─── FILE TYPES ────────────────────────────────────────────────────────────────
//

/// Drive-assigned identifier of a listed file.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(String);

impl FileId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file as returned by the folder listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub id: FileId,
    pub name: String,
    pub view_url: String,
}

/// Per-file study progress. Absent progress reads as the default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileProgress {
    pub watched: bool,
    pub notes: String,
}

/// One table row: the listed file merged with its stored progress.
///
/// This flat shape is also what the local store persists, so the field names
/// are pinned to the stored JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRow {
    pub id: FileId,
    pub name: String,
    #[serde(rename = "webViewLink")]
    pub view_url: String,
    #[serde(default)]
    pub watched: bool,
    #[serde(default)]
    pub notes: String,
}

impl FileRow {
    #[must_use]
    pub fn progress(&self) -> FileProgress {
        FileProgress {
            watched: self.watched,
            notes: self.notes.clone(),
        }
    }
}

//
// ─── MERGE ─────────────────────────────────────────────────────────────────────
//

/// Merges a folder listing with stored progress.
///
/// Produces one row per listed file, in listing order. Files without a stored
/// entry get `watched = false` and empty notes. Stored entries whose id is not
/// in the listing are ignored.
#[must_use]
pub fn merge_rows(
    records: Vec<FileRecord>,
    saved: &HashMap<FileId, FileProgress>,
) -> Vec<FileRow> {
    records
        .into_iter()
        .map(|record| {
            let progress = saved.get(&record.id).cloned().unwrap_or_default();
            FileRow {
                id: record.id,
                name: record.name,
                view_url: record.view_url,
                watched: progress.watched,
                notes: progress.notes,
            }
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> FileRecord {
        FileRecord {
            id: FileId::new(id),
            name: name.to_string(),
            view_url: format!("https://drive.example/{id}/view"),
        }
    }

    #[test]
    fn merge_defaults_unsaved_rows() {
        let mut saved = HashMap::new();
        saved.insert(
            FileId::new("a"),
            FileProgress {
                watched: true,
                notes: String::new(),
            },
        );

        let rows = merge_rows(vec![record("a", "Lesson 1"), record("b", "Lesson 2")], &saved);

        assert_eq!(rows.len(), 2);
        assert!(rows[0].watched);
        assert!(!rows[1].watched);
        assert_eq!(rows[0].notes, "");
        assert_eq!(rows[1].notes, "");
    }

    #[test]
    fn merge_preserves_listing_order() {
        let rows = merge_rows(
            vec![record("z", "Last"), record("a", "First")],
            &HashMap::new(),
        );
        assert_eq!(rows[0].id, FileId::new("z"));
        assert_eq!(rows[1].id, FileId::new("a"));
    }

    #[test]
    fn merge_ignores_progress_for_unlisted_files() {
        let mut saved = HashMap::new();
        saved.insert(
            FileId::new("gone"),
            FileProgress {
                watched: true,
                notes: "old".to_string(),
            },
        );

        let rows = merge_rows(vec![record("a", "Lesson 1")], &saved);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, FileId::new("a"));
        assert!(!rows[0].watched);
    }

    #[test]
    fn merge_carries_saved_notes() {
        let mut saved = HashMap::new();
        saved.insert(
            FileId::new("a"),
            FileProgress {
                watched: false,
                notes: "revise tajwid".to_string(),
            },
        );

        let rows = merge_rows(vec![record("a", "Lesson 1")], &saved);
        assert_eq!(rows[0].notes, "revise tajwid");
    }

    #[test]
    fn row_progress_extraction() {
        let row = FileRow {
            id: FileId::new("a"),
            name: "Lesson 1".into(),
            view_url: "https://drive.example/a/view".into(),
            watched: true,
            notes: "n".into(),
        };
        let progress = row.progress();
        assert!(progress.watched);
        assert_eq!(progress.notes, "n");
    }

    #[test]
    fn row_json_uses_stored_field_names() {
        let row = FileRow {
            id: FileId::new("abc"),
            name: "Lesson 1".into(),
            view_url: "https://drive.example/abc/view".into(),
            watched: true,
            notes: String::new(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["webViewLink"], "https://drive.example/abc/view");
        assert_eq!(json["watched"], true);
        assert_eq!(json["notes"], "");
    }

    #[test]
    fn row_json_tolerates_missing_progress_fields() {
        let row: FileRow = serde_json::from_str(
            r#"{"id":"abc","name":"Lesson 1","webViewLink":"https://drive.example/abc/view"}"#,
        )
        .unwrap();
        assert!(!row.watched);
        assert_eq!(row.notes, "");
    }
}
