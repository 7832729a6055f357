//! Staff directory: read-only roster of researchers keyed by staff code.
//!
//! The directory file is produced by a separate spreadsheet ETL job as a
//! JSON object `{ "<code>": { name, department, lab, ... }, ... }`. Key order
//! is preserved so that match ties resolve in file order.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::error::DirectoryError;

/// Department values the ETL job emits for blank spreadsheet cells.
const PLACEHOLDER_DEPARTMENTS: &[&str] = &["nan", "-"];

/// One staff member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    /// Unique staff code (the directory key).
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lab: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Whether `email` was confirmed by hand rather than a placeholder.
    #[serde(default, deserialize_with = "null_as_default")]
    pub email_verified: bool,
    /// Free-text notes from the ETL job.
    #[serde(default, alias = "note", deserialize_with = "null_as_default")]
    pub notes: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ordered, read-only staff directory.
#[derive(Debug, Clone, Default)]
pub struct StaffDirectory {
    records: Vec<StaffRecord>,
}

impl StaffDirectory {
    /// Build from records, keeping their order.
    pub fn from_records(records: Vec<StaffRecord>) -> Self {
        Self { records }
    }

    /// Parse the JSON object form. Entries that are not objects of the
    /// expected shape are skipped with a warning.
    pub fn from_json_str(json: &str) -> Result<Self, DirectoryError> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut records = Vec::with_capacity(raw.len());

        for (code, value) in raw {
            match serde_json::from_value::<StaffRecord>(value) {
                Ok(mut record) => {
                    record.code = code;
                    records.push(record);
                }
                Err(e) => warn!(code = %code, error = %e, "Skipping malformed staff entry"),
            }
        }

        Ok(Self { records })
    }

    /// Load the directory from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        if !path.exists() {
            return Err(DirectoryError::NotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        let directory = Self::from_json_str(&json)?;
        info!(count = directory.len(), path = %path.display(), "Staff directory loaded");
        Ok(directory)
    }

    /// Load the directory, degrading to an empty one on any failure.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(directory) => directory,
            Err(DirectoryError::NotFound(p)) => {
                warn!(
                    path = %p.display(),
                    "Staff directory not found; run the directory import first. Matching disabled"
                );
                Self::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load staff directory; matching disabled");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StaffRecord> {
        self.records.iter()
    }

    pub fn get(&self, code: &str) -> Option<&StaffRecord> {
        self.records.iter().find(|r| r.code == code)
    }

    /// Department → labs rollup used to ground the backend's routing guess.
    ///
    /// One `- department: lab, lab` line per department, departments and
    /// labs sorted, placeholder departments skipped.
    pub fn department_summary(&self) -> String {
        let mut departments: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

        for record in &self.records {
            let dept = record.department.trim();
            if dept.is_empty() || PLACEHOLDER_DEPARTMENTS.contains(&dept) {
                continue;
            }
            let labs = departments.entry(dept).or_default();
            let lab = record.lab.trim();
            if !lab.is_empty() {
                labs.insert(lab);
            }
        }

        departments
            .iter()
            .map(|(dept, labs)| {
                format!(
                    "- {}: {}",
                    dept,
                    labs.iter().copied().collect::<Vec<_>>().join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "KSH01": {"name": "김수현", "department": "스킨케어연구소", "lab": "보습랩", "team": "1팀", "position": "책임", "email": "MANUAL_CHECK_REQUIRED@cosmax.com", "email_verified": false, "note": "확인 필요"},
        "AHJ01": {"name": "안현정", "department": "메이크업연구소", "lab": "베이스랩", "team": "", "position": "선임", "email": "hyunjung.ahn@cosmax.com", "email_verified": true},
        "PJY01": {"name": "박지연", "department": "스킨케어연구소", "lab": "선케어랩", "team": null},
        "XXX01": {"name": "무소속", "department": "nan", "lab": "랩"}
    }"#;

    #[test]
    fn parses_records_in_file_order() {
        let dir = StaffDirectory::from_json_str(SAMPLE).unwrap();
        let codes: Vec<&str> = dir.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["KSH01", "AHJ01", "PJY01", "XXX01"]);
    }

    #[test]
    fn fills_defaults_and_aliases() {
        let dir = StaffDirectory::from_json_str(SAMPLE).unwrap();
        let ksh = dir.get("KSH01").unwrap();
        assert_eq!(ksh.notes, "확인 필요");
        assert!(!ksh.email_verified);

        let pjy = dir.get("PJY01").unwrap();
        assert_eq!(pjy.team, "");
        assert_eq!(pjy.email, "");
        assert!(!pjy.email_verified);
    }

    #[test]
    fn skips_non_object_entries() {
        let dir = StaffDirectory::from_json_str(r#"{"A1": {"name": "a"}, "B2": 42}"#).unwrap();
        assert_eq!(dir.len(), 1);
        assert!(dir.get("A1").is_some());
    }

    #[test]
    fn department_summary_is_sorted_and_skips_placeholders() {
        let dir = StaffDirectory::from_json_str(SAMPLE).unwrap();
        assert_eq!(
            dir.department_summary(),
            "- 메이크업연구소: 베이스랩\n- 스킨케어연구소: 보습랩, 선케어랩"
        );
    }

    #[test]
    fn department_summary_of_empty_directory_is_empty() {
        assert_eq!(StaffDirectory::default().department_summary(), "");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let dir = StaffDirectory::load(file.path()).unwrap();
        assert_eq!(dir.len(), 4);
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing.json");
        assert!(matches!(
            StaffDirectory::load(&path),
            Err(DirectoryError::NotFound(_))
        ));
        assert!(StaffDirectory::load_or_empty(&path).is_empty());
    }

    #[test]
    fn malformed_file_degrades_to_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[not an object").unwrap();
        assert!(matches!(
            StaffDirectory::load(file.path()),
            Err(DirectoryError::Json(_))
        ));
        assert!(StaffDirectory::load_or_empty(file.path()).is_empty());
    }
}
