//! A JSON file backed repository.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    domain::Requirement,
    storage::{Repository, StoreError},
};

/// Stores the requirement collection in a single JSON document.
///
/// The document is a versioned envelope. A bare array of requirements (the
/// shape of a seed dataset) is also accepted when loading. A missing file
/// loads as an empty collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Creates a repository backed by the file at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Repository for JsonFileRepository {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Vec<Requirement>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("data file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let document: Document =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        let requirements = document.into_requirements();
        tracing::debug!(count = requirements.len(), "loaded requirements");
        Ok(requirements)
    }

    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    fn save(&self, requirements: &[Requirement]) -> Result<(), StoreError> {
        let envelope = Envelope::V1 {
            requirements: requirements.to_vec(),
        };
        let content = serde_json::to_string_pretty(&envelope).map_err(StoreError::Encode)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(count = requirements.len(), "saved requirements");
        Ok(())
    }
}

/// Anything the data file may contain.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Versioned(Envelope),
    Seed(Vec<Requirement>),
}

impl Document {
    fn into_requirements(self) -> Vec<Requirement> {
        match self {
            Self::Versioned(Envelope::V1 { requirements }) | Self::Seed(requirements) => {
                requirements
            }
        }
    }
}

/// The serialized versions of the data file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Envelope {
    #[serde(rename = "1")]
    V1 { requirements: Vec<Requirement> },
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::domain::{ActionType, EquipmentType, IsoDate, Recurrence};

    fn requirement(action: &str) -> Requirement {
        let mut requirement = Requirement::new(
            ActionType::Inspections,
            Recurrence::Quarterly,
            action.to_string(),
            EquipmentType::Flare,
        );
        requirement.needed_by = Some(IsoDate::new("2026-03-31"));
        requirement
    }

    #[test]
    fn missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let repository = JsonFileRepository::new(tmp.path().join("requirements.json"));

        assert!(repository.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order_and_content() {
        let tmp = TempDir::new().unwrap();
        let repository = JsonFileRepository::new(tmp.path().join("nested/requirements.json"));
        let requirements = vec![requirement("first"), requirement("second")];

        repository.save(&requirements).unwrap();
        let loaded = repository.load().unwrap();

        assert_eq!(loaded, requirements);
    }

    #[test]
    fn saved_file_is_versioned() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("requirements.json");
        JsonFileRepository::new(path.clone())
            .save(&[requirement("only")])
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(raw["_version"], "1");
        assert_eq!(raw["requirements"][0]["action"], "only");
        assert_eq!(raw["requirements"][0]["neededBy"], "2026-03-31");
    }

    #[test]
    fn loads_bare_seed_array() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seed.json");
        fs::write(
            &path,
            r#"[{
                "id": "seed-1",
                "typeOfAction": "Throughput Reports",
                "recurrence": "Monthly",
                "action": "Report monthly condensate throughput",
                "requirementsCovered": "30 TAC 106.352",
                "neededBy": "2026-02-15",
                "completedDate": null,
                "fileUploaded": null,
                "equipmentType": "Storage Tank"
            }]"#,
        )
        .unwrap();

        let loaded = JsonFileRepository::new(path).load().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id.as_str(), "seed-1");
        assert_eq!(loaded[0].equipment_type, EquipmentType::StorageTank);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("requirements.json");
        fs::write(&path, "{ not json").unwrap();

        let error = JsonFileRepository::new(path).load().unwrap_err();
        assert!(matches!(error, StoreError::Parse { .. }));
    }
}
