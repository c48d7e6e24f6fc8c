use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::instrument;

use crate::{
    domain::{Requirement, RequirementId},
    storage::{Repository, StoreError},
};

/// The working copy of a requirement collection.
///
/// Mutations apply to the in-memory collection and are persisted with
/// [`RequirementStore::flush`]. Record order is preserved.
#[derive(Debug)]
pub struct RequirementStore<R> {
    repository: R,
    requirements: Vec<Requirement>,
    dirty: bool,
}

impl<R: Repository> RequirementStore<R> {
    /// Loads the collection from `repository`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be read, or
    /// [`StoreError::DuplicateId`] if two records share an id.
    #[instrument(level = "debug", skip(repository))]
    pub fn open(repository: R) -> Result<Self, StoreError> {
        let requirements = repository.load()?;
        check_unique(&requirements)?;
        tracing::debug!(count = requirements.len(), "opened requirement store");
        Ok(Self {
            repository,
            requirements,
            dirty: false,
        })
    }

    /// The current collection, in stored order.
    #[must_use]
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Looks up a requirement by id.
    #[must_use]
    pub fn get(&self, id: &RequirementId) -> Option<&Requirement> {
        self.requirements.iter().find(|r| &r.id == id)
    }

    /// Whether there are mutations not yet flushed.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flips the completion state of a requirement, stamping `today` when it
    /// becomes complete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no requirement has that id.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_completed(
        &mut self,
        id: &RequirementId,
        today: NaiveDate,
    ) -> Result<&Requirement, StoreError> {
        self.update(id, |requirement| requirement.toggle_completed(today))
    }

    /// Marks a requirement completed on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no requirement has that id.
    #[instrument(level = "debug", skip(self))]
    pub fn mark_completed(
        &mut self,
        id: &RequirementId,
        date: NaiveDate,
    ) -> Result<&Requirement, StoreError> {
        self.update(id, |requirement| requirement.mark_completed(date))
    }

    /// Clears the completion date of a requirement.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no requirement has that id.
    #[instrument(level = "debug", skip(self))]
    pub fn mark_incomplete(&mut self, id: &RequirementId) -> Result<&Requirement, StoreError> {
        self.update(id, Requirement::mark_incomplete)
    }

    /// Replaces the whole collection with `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if two seed records share an id.
    /// The collection is left untouched in that case.
    #[instrument(level = "debug", skip_all, fields(count = seed.len()))]
    pub fn reset(&mut self, seed: Vec<Requirement>) -> Result<(), StoreError> {
        check_unique(&seed)?;
        self.requirements = seed;
        self.dirty = true;
        Ok(())
    }

    /// Persists the collection if it has changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be written.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if self.dirty {
            self.repository.save(&self.requirements)?;
            self.dirty = false;
            tracing::debug!(count = self.requirements.len(), "flushed requirement store");
        }
        Ok(())
    }

    /// The backing repository.
    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    fn update(
        &mut self,
        id: &RequirementId,
        f: impl FnOnce(&mut Requirement),
    ) -> Result<&Requirement, StoreError> {
        let requirement = self
            .requirements
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        f(requirement);
        self.dirty = true;
        Ok(&*requirement)
    }
}

fn check_unique(requirements: &[Requirement]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(requirements.len());
    for requirement in requirements {
        if !seen.insert(&requirement.id) {
            return Err(StoreError::DuplicateId(requirement.id.clone()));
        }
    }
    Ok(())
}
