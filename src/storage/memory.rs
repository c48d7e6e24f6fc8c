use std::sync::{Mutex, PoisonError};

use crate::{
    domain::Requirement,
    storage::{Repository, StoreError},
};

/// Keeps the requirement collection in memory.
///
/// Useful for tests and for operating on a dataset without touching disk.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    requirements: Mutex<Vec<Requirement>>,
}

impl MemoryRepository {
    /// Creates a repository holding `requirements`.
    #[must_use]
    pub const fn new(requirements: Vec<Requirement>) -> Self {
        Self {
            requirements: Mutex::new(requirements),
        }
    }

    /// A copy of what was last saved.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Requirement> {
        self.requirements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Repository for MemoryRepository {
    fn load(&self) -> Result<Vec<Requirement>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, requirements: &[Requirement]) -> Result<(), StoreError> {
        *self
            .requirements
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = requirements.to_vec();
        Ok(())
    }
}
