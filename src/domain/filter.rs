//! Multi-dimensional filtering of requirement collections.
//!
//! A [`FilterState`] has one dimension per axis the dashboard lets users
//! narrow on. A requirement is kept only if it satisfies every dimension.
//! Within a set-valued dimension any selected value matches, and an empty set
//! matches everything.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    calendar::YearMonth,
    requirement::{ActionType, EquipmentType, Recurrence, Requirement},
    status::{resolve_status, Status},
};

/// Inclusive bounds on the due date. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// The earliest due date kept.
    pub start: Option<NaiveDate>,
    /// The latest due date kept.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// A range with both bounds set.
    #[must_use]
    pub const fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Whether neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a requirement with the given due date is inside the range.
    ///
    /// A requirement with no due date cannot satisfy a bound.
    #[must_use]
    pub fn contains(&self, due: Option<NaiveDate>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(due) = due else {
            return false;
        };
        self.start.is_none_or(|start| due >= start) && self.end.is_none_or(|end| due <= end)
    }
}

/// A query over a requirement collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    /// Action types to keep.
    pub action_types: BTreeSet<ActionType>,
    /// Recurrence patterns to keep.
    pub recurrence_patterns: BTreeSet<Recurrence>,
    /// Equipment types to keep.
    pub equipment_types: BTreeSet<EquipmentType>,
    /// Computed statuses to keep.
    pub statuses: BTreeSet<Status>,
    /// Case-insensitive free-text search.
    pub search_query: String,
    /// Bounds on the due date.
    pub date_range: DateRange,
}

impl FilterState {
    /// Whether no dimension is active, so every requirement matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.action_types.is_empty()
            && self.recurrence_patterns.is_empty()
            && self.equipment_types.is_empty()
            && self.statuses.is_empty()
            && self.search_query.trim().is_empty()
            && self.date_range.is_unbounded()
    }

    /// Whether `requirement` satisfies every active dimension as of `today`.
    #[must_use]
    pub fn matches(&self, requirement: &Requirement, today: NaiveDate) -> bool {
        if !self.action_types.is_empty() && !self.action_types.contains(&requirement.type_of_action)
        {
            return false;
        }

        if !self.recurrence_patterns.is_empty()
            && !self.recurrence_patterns.contains(&requirement.recurrence)
        {
            return false;
        }

        if !self.equipment_types.is_empty()
            && !self.equipment_types.contains(&requirement.equipment_type)
        {
            return false;
        }

        if !self.statuses.is_empty()
            && !self.statuses.contains(&resolve_status(requirement, today))
        {
            return false;
        }

        if !self.search_query.trim().is_empty() {
            let needle = self.search_query.to_lowercase();
            if !requirement.search_haystack().to_lowercase().contains(&needle) {
                return false;
            }
        }

        self.date_range.contains(requirement.due_date())
    }

    /// Adds `action_type` to the selection, or removes it if already selected.
    pub fn toggle_action_type(&mut self, action_type: ActionType) {
        toggle(&mut self.action_types, action_type);
    }

    /// Adds `recurrence` to the selection, or removes it if already selected.
    pub fn toggle_recurrence(&mut self, recurrence: Recurrence) {
        toggle(&mut self.recurrence_patterns, recurrence);
    }

    /// Adds `equipment_type` to the selection, or removes it if already
    /// selected.
    pub fn toggle_equipment_type(&mut self, equipment_type: EquipmentType) {
        toggle(&mut self.equipment_types, equipment_type);
    }

    /// Adds `status` to the selection, or removes it if already selected.
    pub fn toggle_status(&mut self, status: Status) {
        toggle(&mut self.statuses, status);
    }

    /// Replaces the search query.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Replaces the due-date bounds.
    pub const fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.date_range = DateRange { start, end };
    }

    /// Clears every dimension.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Open requirements due in the month containing `today`.
    #[must_use]
    pub fn due_this_month(today: NaiveDate) -> Self {
        let month = YearMonth::containing(today);
        Self {
            statuses: BTreeSet::from([Status::Pending]),
            date_range: DateRange::between(month.first_day(), month.last_day()),
            ..Self::default()
        }
    }

    /// Overdue requirements only.
    #[must_use]
    pub fn overdue_only() -> Self {
        Self {
            statuses: BTreeSet::from([Status::Overdue]),
            ..Self::default()
        }
    }

    /// Completed requirements only.
    #[must_use]
    pub fn completed_only() -> Self {
        Self {
            statuses: BTreeSet::from([Status::Completed]),
            ..Self::default()
        }
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if set.contains(&value) {
        set.remove(&value);
    } else {
        set.insert(value);
    }
}

/// Returns the requirements matching `filters` as of `today`, in input order.
#[must_use]
pub fn apply_filters<'a>(
    requirements: &'a [Requirement],
    filters: &FilterState,
    today: NaiveDate,
) -> Vec<&'a Requirement> {
    let matched: Vec<_> = requirements
        .iter()
        .filter(|requirement| filters.matches(requirement, today))
        .collect();
    tracing::debug!(
        total = requirements.len(),
        matched = matched.len(),
        "applied filters"
    );
    matched
}

/// The distinct recurrence patterns present, ordered by label.
#[must_use]
pub fn recurrence_options(requirements: &[Requirement]) -> Vec<Recurrence> {
    let mut options: Vec<_> = requirements
        .iter()
        .map(|requirement| &requirement.recurrence)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect();
    options.sort_by(|a, b| a.label().cmp(b.label()));
    options
}
