//! Domain models for compliance tracking.
//!
//! This module contains the requirement record model and the pure derivations
//! over requirement collections: status, dashboard metrics, filtering, sorting
//! and calendar grouping.

/// Requirement records and their closed enumerations.
pub mod requirement;
pub use requirement::{
    ActionType, EquipmentType, IsoDate, ParseLabelError, Recurrence, Requirement, RequirementId,
};

/// Status resolution.
pub mod status;
pub use status::{resolve_status, today, Status};

pub mod metrics;
pub use metrics::{compute_metrics, Dashboard, Metrics};

pub mod filter;
pub use filter::{apply_filters, DateRange, FilterState};

/// Sorting of requirement tables.
pub mod sort;
pub use sort::{sort_records, SortDirection, SortKey, SortState};

pub mod calendar;
pub use calendar::{bucket_by_day, CalendarMonth, MonthGrid, YearMonth};

pub mod permit;
pub use permit::{PermitRegistry, PermitType};

mod config;
pub use config::Config;
