//! Storage layer for tally.
//!
//! Events live in a single JSON document (`storage.json`) shared with the
//! goal-tracking web app. The document holds goals, time blocks, weekly
//! plans, UI categories, analytics and the synced calendar events under
//! `syncedEvents`. This crate only reads events and appends imported ones;
//! every other field is carried through untouched.
//!
//! # Concurrency
//!
//! Each write is a plain read-modify-write of the whole file with no
//! locking. Two writers racing on the same file can lose each other's
//! changes.
//!
//! # Format
//!
//! The document is written as pretty JSON with two-space indentation.
//! Key order is preserved, so unrelated fields round-trip unchanged.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tally_core::CalendarEvent;
use thiserror::Error;

/// Key holding the synced calendar events.
pub const SYNCED_EVENTS_KEY: &str = "syncedEvents";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage document does not exist yet.
    #[error("storage document not found at {}", path.display())]
    NotFound { path: PathBuf },
    /// Reading or writing the file failed.
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file is not valid JSON.
    #[error("invalid JSON in {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The JSON does not have the expected shape.
    #[error("invalid storage document: {0}")]
    InvalidDocument(String),
}

/// An opened storage document.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    doc: Map<String, Value>,
}

impl Store {
    /// Opens and parses the document at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let Value::Object(doc) = value else {
            return Err(StoreError::InvalidDocument(
                "top level must be an object".to_string(),
            ));
        };
        tracing::debug!(path = %path.display(), "opened storage document");
        Ok(Self {
            path: path.to_path_buf(),
            doc,
        })
    }

    /// Writes the default document if none exists.
    ///
    /// Returns `true` when a file was created. An existing file is never
    /// overwritten.
    pub fn init(path: &Path) -> Result<bool, StoreError> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let store = Self {
            path: path.to_path_buf(),
            doc: default_document(),
        };
        store.save()?;
        tracing::info!(path = %path.display(), "created storage document");
        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The raw document.
    pub const fn document(&self) -> &Map<String, Value> {
        &self.doc
    }

    /// Synced events that parse as [`CalendarEvent`].
    ///
    /// A missing `syncedEvents` key reads as no events. Entries that are not
    /// event objects are skipped with a warning.
    pub fn events(&self) -> Vec<CalendarEvent> {
        let Some(Value::Array(raw)) = self.doc.get(SYNCED_EVENTS_KEY) else {
            return Vec::new();
        };
        raw.iter()
            .enumerate()
            .filter_map(|(idx, value)| {
                match serde_json::from_value::<CalendarEvent>(value.clone()) {
                    Ok(event) => Some(event),
                    Err(e) => {
                        tracing::warn!(index = idx, error = %e, "skipping invalid synced event");
                        None
                    }
                }
            })
            .collect()
    }

    /// Appends raw event objects to `syncedEvents`.
    ///
    /// Events whose string `id` is already present (in the document or
    /// earlier in `incoming`) are skipped. Returns the number appended.
    /// Nothing is written until [`save`](Self::save).
    pub fn append_events(
        &mut self,
        incoming: impl IntoIterator<Item = Value>,
    ) -> Result<usize, StoreError> {
        let synced = self
            .doc
            .entry(SYNCED_EVENTS_KEY)
            .or_insert_with(|| Value::Array(Vec::new()));
        let Value::Array(synced) = synced else {
            return Err(StoreError::InvalidDocument(format!(
                "{SYNCED_EVENTS_KEY} must be an array"
            )));
        };

        let mut seen: HashSet<String> = synced.iter().filter_map(event_id).collect();
        let mut added = 0;
        for value in incoming {
            if !value.is_object() {
                return Err(StoreError::InvalidDocument(
                    "imported events must be objects".to_string(),
                ));
            }
            if let Some(id) = event_id(&value) {
                if !seen.insert(id) {
                    continue;
                }
            }
            synced.push(value);
            added += 1;
        }
        Ok(added)
    }

    /// Writes the document back to its path.
    pub fn save(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.doc).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, text).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn event_id(value: &Value) -> Option<String> {
    value.get("id").and_then(Value::as_str).map(str::to_string)
}

/// The document the web app creates on first start.
pub fn default_document() -> Map<String, Value> {
    let value = json!({
        "goals": [],
        "timeBlocks": [],
        "weeklyPlans": [],
        "categories": [
            { "id": "play", "name": "Play", "color": "#FF6B6B" },
            { "id": "stand-up-production", "name": "Stand Up Production", "color": "#4ECDC4" },
            { "id": "stand-up-writing", "name": "Stand Up Writing", "color": "#45B7D1" },
            { "id": "technical-professional", "name": "Technical/Professional", "color": "#96CEB4" },
            { "id": "communication", "name": "Communication", "color": "#FFEAA7" },
            { "id": "chores", "name": "Chores", "color": "#DDA0DD" }
        ],
        "analytics": {
            "productivityPatterns": {
                "byTimeOfDay": {},
                "byCategory": {}
            },
            "suggestions": []
        }
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("storage.json");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn open_missing_file_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let err = Store::open(&temp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }), "{err:?}");
    }

    #[test]
    fn open_rejects_non_object() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), "[1, 2]");
        let err = Store::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)), "{err:?}");

        let path = write(temp.path(), "{not json");
        let err = Store::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }), "{err:?}");
    }

    #[test]
    fn events_missing_key_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), r#"{"goals": []}"#);
        let store = Store::open(&path).unwrap();
        assert!(store.events().is_empty());
    }

    #[test]
    fn events_skip_invalid_entries() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(
            temp.path(),
            r##"{"syncedEvents": [
                {"title": "Yoga", "startTime": "2024-01-01T07:00:00Z", "endTime": "2024-01-01T08:00:00Z", "allDay": false, "color": "#fff"},
                "not an event",
                {"title": 42}
            ]}"##,
        );
        let store = Store::open(&path).unwrap();
        let events = store.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Yoga");
    }

    #[test]
    fn init_creates_default_once() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("data").join("storage.json");

        assert!(Store::init(&path).unwrap());
        let store = Store::open(&path).unwrap();
        let categories = store.document()["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 6);
        assert_eq!(categories[0]["id"], "play");
        assert!(store.events().is_empty());

        std::fs::write(&path, r#"{"goals": [1]}"#).unwrap();
        assert!(!Store::init(&path).unwrap());
        let store = Store::open(&path).unwrap();
        assert_eq!(store.document()["goals"], json!([1]));
    }

    #[test]
    fn append_skips_duplicate_ids() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(
            temp.path(),
            r#"{"syncedEvents": [{"id": "a", "title": "Yoga"}]}"#,
        );
        let mut store = Store::open(&path).unwrap();
        let added = store
            .append_events([
                json!({"id": "a", "title": "Yoga again"}),
                json!({"id": "b", "title": "Work"}),
                json!({"id": "b", "title": "Work twice"}),
                json!({"title": "No id"}),
            ])
            .unwrap();
        assert_eq!(added, 2);

        let titles: Vec<_> = store.events().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, ["Yoga", "Work", "No id"]);
    }

    #[test]
    fn append_creates_missing_array_and_rejects_bad_shapes() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), r#"{"goals": []}"#);
        let mut store = Store::open(&path).unwrap();
        assert_eq!(store.append_events([json!({"title": "Hike"})]).unwrap(), 1);
        assert!(store.append_events([json!("oops")]).is_err());

        let path = write(temp.path(), r#"{"syncedEvents": {}}"#);
        let mut store = Store::open(&path).unwrap();
        assert!(store.append_events([json!({"title": "Hike"})]).is_err());
    }

    #[test]
    fn save_preserves_unknown_fields_and_order() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(
            temp.path(),
            r#"{"zeta": 1, "goals": [{"id": "g1", "progress": 40}], "syncedEvents": [{"id": "a", "title": "Yoga", "color": "blue"}]}"#,
        );
        let mut store = Store::open(&path).unwrap();
        store.append_events([json!({"id": "b", "title": "Run"})]).unwrap();
        store.save().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"zeta\": 1,"), "{text}");

        let reopened = Store::open(&path).unwrap();
        let doc = reopened.document();
        assert_eq!(doc["goals"][0]["progress"], 40);
        assert_eq!(doc[SYNCED_EVENTS_KEY][0]["color"], "blue");
        assert_eq!(reopened.events().len(), 2);
    }
}
