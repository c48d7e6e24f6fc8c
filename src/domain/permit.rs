//! The permit types a facility tracks requirements under.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The id of the permit that is active when nothing else is.
pub const DEFAULT_PERMIT_ID: &str = "title-v";

/// A kind of operating permit, such as Title V or a Permit by Rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitType {
    /// Slug derived from the name.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What the permit authorizes.
    #[serde(default)]
    pub description: String,
    /// When the permit type was registered.
    pub created: DateTime<Utc>,
}

impl PermitType {
    /// Registers a permit type now, deriving its id from `name`.
    #[must_use]
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            id: slugify(name),
            name: name.trim().to_string(),
            description: description.to_string(),
            created: Utc::now(),
        }
    }
}

/// Lowercases `name` and replaces each run of whitespace with `-`.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Errors editing a [`PermitRegistry`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PermitError {
    /// The name was blank.
    #[error("permit name must not be empty")]
    EmptyName,
    /// A permit with the same id is already registered.
    #[error("permit '{0}' already exists")]
    Duplicate(String),
    /// No permit has the given id.
    #[error("unknown permit '{0}'")]
    Unknown(String),
}

/// The registered permit types and which one is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitRegistry {
    permits: Vec<PermitType>,
    active: String,
}

impl Default for PermitRegistry {
    fn default() -> Self {
        Self {
            permits: vec![
                PermitType::new(
                    "Title V",
                    "Air quality operating permit for major sources under Title V of the Clean \
                     Air Act",
                ),
                PermitType::new(
                    "PBR",
                    "Permit by Rule - standard authorization for specific types of air \
                     emission sources",
                ),
            ],
            active: DEFAULT_PERMIT_ID.to_string(),
        }
    }
}

impl PermitRegistry {
    /// Rebuilds a registry from stored parts.
    #[must_use]
    pub const fn from_parts(permits: Vec<PermitType>, active: String) -> Self {
        Self { permits, active }
    }

    /// Splits the registry into its stored parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<PermitType>, String) {
        (self.permits, self.active)
    }

    /// Registers a new permit type.
    ///
    /// # Errors
    ///
    /// Returns [`PermitError::EmptyName`] for a blank name, and
    /// [`PermitError::Duplicate`] if the derived id is already registered.
    pub fn add(&mut self, name: &str, description: &str) -> Result<&PermitType, PermitError> {
        if name.trim().is_empty() {
            return Err(PermitError::EmptyName);
        }
        let permit = PermitType::new(name, description);
        if self.get(&permit.id).is_some() {
            return Err(PermitError::Duplicate(permit.id));
        }
        tracing::debug!(id = %permit.id, "registered permit type");
        self.permits.push(permit);
        Ok(&self.permits[self.permits.len() - 1])
    }

    /// Removes a permit type, returning it if it was registered.
    ///
    /// Removing the active permit activates the first remaining one, or
    /// [`DEFAULT_PERMIT_ID`] if none remain.
    pub fn remove(&mut self, id: &str) -> Option<PermitType> {
        let position = self.permits.iter().position(|permit| permit.id == id)?;
        let removed = self.permits.remove(position);

        if self.active == id {
            self.active = self
                .permits
                .first()
                .map_or_else(|| DEFAULT_PERMIT_ID.to_string(), |permit| permit.id.clone());
        }

        Some(removed)
    }

    /// Makes `id` the active permit.
    ///
    /// # Errors
    ///
    /// Returns [`PermitError::Unknown`] if no permit has that id.
    pub fn set_active(&mut self, id: &str) -> Result<(), PermitError> {
        if self.get(id).is_none() {
            return Err(PermitError::Unknown(id.to_string()));
        }
        self.active = id.to_string();
        Ok(())
    }

    /// The active permit, if it is registered.
    #[must_use]
    pub fn active(&self) -> Option<&PermitType> {
        self.get(&self.active)
    }

    /// The id of the active permit.
    #[must_use]
    pub fn active_id(&self) -> &str {
        &self.active
    }

    /// Looks up a permit by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PermitType> {
        self.permits.iter().find(|permit| permit.id == id)
    }

    /// Iterates over the registered permits in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PermitType> {
        self.permits.iter()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("Title V", "title-v"; "two words")]
    #[test_case("  Permit   by Rule ", "permit-by-rule"; "collapses whitespace")]
    #[test_case("NSR", "nsr"; "single word")]
    fn slugs(name: &str, expected: &str) {
        assert_eq!(slugify(name), expected);
    }

    #[test]
    fn defaults_to_title_v() {
        let registry = PermitRegistry::default();
        let ids: Vec<_> = registry.iter().map(|permit| permit.id.as_str()).collect();

        assert_eq!(ids, ["title-v", "pbr"]);
        assert_eq!(registry.active().unwrap().name, "Title V");
    }

    #[test]
    fn add_rejects_duplicates_and_blank_names() {
        let mut registry = PermitRegistry::default();

        let added = registry.add("State Operating Permit", "").unwrap();
        assert_eq!(added.id, "state-operating-permit");

        assert_eq!(
            registry.add("title v", "again"),
            Err(PermitError::Duplicate("title-v".to_string()))
        );
        assert_eq!(registry.add("  ", ""), Err(PermitError::EmptyName));
    }

    #[test]
    fn removing_the_active_permit_falls_back() {
        let mut registry = PermitRegistry::default();
        registry.set_active("pbr").unwrap();

        let removed = registry.remove("pbr").unwrap();
        assert_eq!(removed.id, "pbr");
        assert_eq!(registry.active_id(), "title-v");

        registry.remove("title-v").unwrap();
        assert_eq!(registry.active_id(), DEFAULT_PERMIT_ID);
        assert!(registry.active().is_none());
    }

    #[test]
    fn removing_an_inactive_permit_keeps_the_active_one() {
        let mut registry = PermitRegistry::default();
        registry.remove("pbr").unwrap();
        assert_eq!(registry.active_id(), "title-v");
        assert!(registry.remove("pbr").is_none());
    }

    #[test]
    fn set_active_requires_a_known_permit() {
        let mut registry = PermitRegistry::default();
        assert_eq!(
            registry.set_active("nsr"),
            Err(PermitError::Unknown("nsr".to_string()))
        );
        assert_eq!(registry.active_id(), "title-v");
    }
}
