use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    requirement::{IsoDate, ParseLabelError, Requirement},
    status::resolve_status,
};

/// The field a requirement table is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// The action type label.
    TypeOfAction,
    /// The recurrence label.
    Recurrence,
    /// The equipment type label.
    EquipmentType,
    /// The stored due date.
    #[default]
    NeededBy,
    /// The computed status.
    Status,
}

impl SortKey {
    /// Every key, in canonical order.
    pub const ALL: &'static [Self] = &[
        Self::TypeOfAction,
        Self::Recurrence,
        Self::EquipmentType,
        Self::NeededBy,
        Self::Status,
    ];

    /// The kebab-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TypeOfAction => "type-of-action",
            Self::Recurrence => "recurrence",
            Self::EquipmentType => "equipment-type",
            Self::NeededBy => "needed-by",
            Self::Status => "status",
        }
    }

    /// The string a requirement is compared by under this key.
    ///
    /// A missing or unparsable due date compares as the empty string.
    fn sort_value<'a>(self, requirement: &'a Requirement, today: NaiveDate) -> &'a str {
        match self {
            Self::TypeOfAction => requirement.type_of_action.label(),
            Self::Recurrence => requirement.recurrence.label(),
            Self::EquipmentType => requirement.equipment_type.label(),
            Self::NeededBy => requirement
                .needed_by
                .as_ref()
                .filter(|date| date.date().is_some())
                .map_or("", IsoDate::as_str),
            Self::Status => resolve_status(requirement, today).label(),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for SortKey {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ParseLabelError::new("sort key", s))
    }
}

/// Ascending or descending order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// The active sort key and direction of a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    /// The field being sorted on.
    pub key: SortKey,
    /// The direction.
    pub direction: SortDirection,
}

impl SortState {
    /// Selects a column: the active key flips direction, a new key starts
    /// ascending.
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.reversed();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }

    /// Sorts `requirements` by this state.
    #[must_use]
    pub fn sort<'a>(
        &self,
        requirements: &[&'a Requirement],
        today: NaiveDate,
    ) -> Vec<&'a Requirement> {
        sort_records(requirements, self.key, self.direction, today)
    }
}

/// Returns `requirements` ordered by `key`.
///
/// Values are compared as strings. The sort is stable and descending order
/// reverses each comparison, so equal elements keep their input order in
/// both directions.
#[must_use]
pub fn sort_records<'a>(
    requirements: &[&'a Requirement],
    key: SortKey,
    direction: SortDirection,
    today: NaiveDate,
) -> Vec<&'a Requirement> {
    let mut sorted = requirements.to_vec();
    sorted.sort_by(|a, b| {
        direction.apply(key.sort_value(a, today).cmp(key.sort_value(b, today)))
    });
    sorted
}
