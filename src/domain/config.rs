use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{
    permit::{PermitRegistry, PermitType},
    sort::SortKey,
};

/// Configuration for a compliance tracking workspace.
///
/// This struct holds settings that control where requirement data lives, how
/// much the dashboard shows, and which permit types are registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Path of the requirement data file, relative to the workspace root.
    data_file: PathBuf,

    /// How many upcoming deadlines the dashboard lists.
    pub upcoming_limit: usize,

    /// How many recent completions the dashboard lists.
    pub recent_limit: usize,

    /// The compliance score (percent) considered healthy.
    pub compliance_target: usize,

    /// The column requirement tables are sorted by unless told otherwise.
    pub default_sort: SortKey,

    /// The registered permit types and the active one.
    permits: PermitRegistry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            upcoming_limit: default_upcoming_limit(),
            recent_limit: default_recent_limit(),
            compliance_target: default_compliance_target(),
            default_sort: SortKey::default(),
            permits: PermitRegistry::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the data file path, relative to the workspace root.
    #[must_use]
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Sets the data file path.
    pub fn set_data_file(&mut self, path: PathBuf) {
        self.data_file = path;
    }

    /// Returns the permit registry.
    #[must_use]
    pub const fn permits(&self) -> &PermitRegistry {
        &self.permits
    }

    /// Returns the permit registry for editing.
    pub const fn permits_mut(&mut self) -> &mut PermitRegistry {
        &mut self.permits
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("requirements.json")
}

const fn default_upcoming_limit() -> usize {
    8
}

const fn default_recent_limit() -> usize {
    5
}

const fn default_compliance_target() -> usize {
    80
}

fn default_permits() -> Vec<PermitType> {
    PermitRegistry::default().into_parts().0
}

fn default_active_permit() -> String {
    PermitRegistry::default().into_parts().1
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_data_file")]
        data_file: PathBuf,

        #[serde(default = "default_upcoming_limit")]
        upcoming_limit: usize,

        #[serde(default = "default_recent_limit")]
        recent_limit: usize,

        /// Dashboard cards turn amber below this score.
        #[serde(default = "default_compliance_target")]
        compliance_target: usize,

        #[serde(default)]
        default_sort: SortKey,

        #[serde(default = "default_active_permit")]
        active_permit: String,

        #[serde(default = "default_permits")]
        permits: Vec<PermitType>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                data_file,
                upcoming_limit,
                recent_limit,
                compliance_target,
                default_sort,
                active_permit,
                permits,
            } => Self {
                data_file,
                upcoming_limit,
                recent_limit,
                compliance_target,
                default_sort,
                permits: PermitRegistry::from_parts(permits, active_permit),
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        let (permits, active_permit) = config.permits.into_parts();
        Self::V1 {
            data_file: config.data_file,
            upcoming_limit: config.upcoming_limit,
            recent_limit: config.recent_limit,
            compliance_target: config.compliance_target,
            default_sort: config.default_sort,
            active_permit,
            permits,
        }
    }
}
