//! The derivations in [`crate::domain`] only ever see snapshots. A
//! [`Repository`] loads and saves the whole collection, and a
//! [`RequirementStore`] owns the working copy and applies the single-record
//! mutations (marking requirements complete or incomplete).

use std::{io, path::PathBuf};

use crate::domain::{Requirement, RequirementId};

mod json_file;
mod memory;
mod store;

pub use json_file::JsonFileRepository;
pub use memory::MemoryRepository;
pub use store::RequirementStore;

/// Loads and saves a whole requirement collection.
pub trait Repository {
    /// Loads the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read or decoded.
    fn load(&self) -> Result<Vec<Requirement>, StoreError>;

    /// Replaces the stored collection with `requirements`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, requirements: &[Requirement]) -> Result<(), StoreError>;
}

/// Errors loading, saving or mutating requirements.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The data file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The file concerned.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The data file is not valid requirement JSON.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The file concerned.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },
    /// The collection could not be encoded.
    #[error("failed to encode requirements: {0}")]
    Encode(#[source] serde_json::Error),
    /// Two requirements share an id.
    #[error("duplicate requirement id '{0}'")]
    DuplicateId(RequirementId),
    /// No requirement has the given id.
    #[error("requirement '{0}' not found")]
    NotFound(RequirementId),
}
