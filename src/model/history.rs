use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One extension's entry in a daily history snapshot.
///
/// Snapshots key extensions by `name`, not by store id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub download_count: u64,
}

/// The download counts recorded for one calendar day, indexed by name.
///
/// The index is built once per snapshot; lookups are exact-match only, with
/// no case folding or fuzzy matching.
#[derive(Debug, Clone, Default)]
pub struct DaySnapshot {
    records: HashMap<String, HistoryRecord>,
}

impl DaySnapshot {
    pub fn new(records: Vec<HistoryRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.name.clone(), record))
                .collect(),
        }
    }

    /// The substitute for a failed or missing fetch.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&HistoryRecord> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The three historical windows used for growth computation.
///
/// `day1` is yesterday, `day2` two days ago, `day7` seven days ago. "Today"
/// never exists in the history store, so the last-day window compares day1
/// against day2, and the last-week window compares day2 against day7.
#[derive(Debug, Clone, Default)]
pub struct History {
    pub day1: DaySnapshot,
    pub day2: DaySnapshot,
    pub day7: DaySnapshot,
}

/// Per-extension trailing download counts from the metadata document,
/// oldest day first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaEntry {
    pub name: String,
    #[serde(default)]
    pub previous_days_downloads: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_index_lookup() {
        let snapshot = DaySnapshot::new(vec![
            HistoryRecord {
                name: "pomodoro".to_string(),
                created_at: 1_600_000_000,
                updated_at: 1_650_000_000,
                download_count: 321,
            },
            HistoryRecord {
                name: "jira".to_string(),
                created_at: 1_600_000_000,
                updated_at: 1_650_000_000,
                download_count: 10,
            },
        ]);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("pomodoro").unwrap().download_count, 321);
        assert_eq!(snapshot.get("Pomodoro"), None);
        assert_eq!(snapshot.get("missing"), None);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = DaySnapshot::empty();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.get("anything"), None);
    }

    #[test]
    fn test_history_record_parses_store_document() {
        let json = r#"[
            {"name": "pomodoro", "created_at": 1636012800, "updated_at": 1678838400, "download_count": 4210},
            {"name": "jira", "created_at": 1636012800, "updated_at": 1678838400, "download_count": 998}
        ]"#;

        let records: Vec<HistoryRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "pomodoro");
        assert_eq!(records[0].download_count, 4210);
    }

    #[test]
    fn test_meta_entry_defaults_missing_series() {
        let entry: MetaEntry = serde_json::from_str(r#"{"name": "pomodoro"}"#).unwrap();
        assert!(entry.previous_days_downloads.is_empty());

        let entry: MetaEntry =
            serde_json::from_str(r#"{"name": "pomodoro", "previous_days_downloads": [10, 20, 30]}"#)
                .unwrap();
        assert_eq!(entry.previous_days_downloads, vec![10, 20, 30]);
    }
}
