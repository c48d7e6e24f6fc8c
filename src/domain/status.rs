use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::requirement::{ParseLabelError, Requirement};

/// The derived state of a requirement.
///
/// Status is never stored. It is computed from the completion date, the due
/// date and a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// A completion date has been recorded.
    Completed,
    /// Open, and not yet past its due date (or it has none).
    Pending,
    /// Open, and past its due date.
    Overdue,
}

impl Status {
    /// Every status, in canonical order.
    pub const ALL: &'static [Self] = &[Self::Completed, Self::Pending, Self::Overdue];

    /// The lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Overdue => "overdue",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Status {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.label() == wanted)
            .ok_or_else(|| ParseLabelError::new("status", s))
    }
}

/// Resolves the status of a requirement as of `today`.
///
/// In priority order:
/// 1. a recorded completion date means [`Status::Completed`], on time or not;
/// 2. no valid due date means [`Status::Pending`];
/// 3. a due date strictly before `today` means [`Status::Overdue`];
/// 4. otherwise [`Status::Pending`].
#[must_use]
pub fn resolve_status(requirement: &Requirement, today: NaiveDate) -> Status {
    if requirement.is_completed() {
        return Status::Completed;
    }

    match requirement.due_date() {
        Some(due) if due < today => Status::Overdue,
        _ => Status::Pending,
    }
}

impl Requirement {
    /// The status of this requirement as of `today`.
    ///
    /// See [`resolve_status`].
    #[must_use]
    pub fn status(&self, today: NaiveDate) -> Status {
        resolve_status(self, today)
    }
}

/// The current local calendar date.
///
/// This is the default reference date for status resolution.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
