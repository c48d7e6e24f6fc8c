//! Permit compliance tracking
//!
//! Recurring regulatory obligations ("requirements") are tracked against
//! their due dates. Status, dashboard metrics, filtering, sorting and the
//! calendar view are all derived from a snapshot of the collection and a
//! reference date.

pub mod domain;
pub use domain::{
    Config, FilterState, Metrics, PermitRegistry, Requirement, RequirementId, SortKey, Status,
};

/// Persistence of requirement collections.
pub mod storage;
pub use storage::{JsonFileRepository, Repository, RequirementStore, StoreError};

pub mod export;
