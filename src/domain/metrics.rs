//! Dashboard summaries over a requirement collection.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{
    calendar::YearMonth,
    requirement::{ActionType, Recurrence, Requirement},
    status::{resolve_status, Status},
};

/// The score reported when no requirement has a due date.
pub const VACUOUS_COMPLIANCE_SCORE: usize = 100;

/// Summary counters for the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Number of requirements.
    pub total_requirements: usize,
    /// Requirements due in the current calendar month.
    pub due_this_month: usize,
    /// Requirements resolving to [`Status::Overdue`].
    pub overdue: usize,
    /// Percentage of dated requirements completed on or before their due date.
    pub compliance_score: usize,
}

impl Metrics {
    /// Whether the compliance score reaches `target` percent.
    #[must_use]
    pub const fn meets_target(&self, target: usize) -> bool {
        self.compliance_score >= target
    }
}

/// Computes the dashboard counters as of `today`.
///
/// Only requirements with a valid due date are scoreable. The score is the
/// share of scoreable requirements completed on or before their due date,
/// rounded half up, and is [`VACUOUS_COMPLIANCE_SCORE`] when nothing is
/// scoreable.
#[must_use]
pub fn compute_metrics(requirements: &[Requirement], today: NaiveDate) -> Metrics {
    let month = YearMonth::containing(today);
    let (month_start, month_end) = (month.first_day(), month.last_day());

    let mut due_this_month = 0;
    let mut overdue = 0;
    let mut scoreable = 0;
    let mut on_time = 0;

    for requirement in requirements {
        if let Some(due) = requirement.due_date() {
            scoreable += 1;
            if (month_start..=month_end).contains(&due) {
                due_this_month += 1;
            }
        }
        if requirement.is_completed_on_time() {
            on_time += 1;
        }
        if resolve_status(requirement, today) == Status::Overdue {
            overdue += 1;
        }
    }

    Metrics {
        total_requirements: requirements.len(),
        due_this_month,
        overdue,
        compliance_score: percentage(on_time, scoreable),
    }
}

/// `part / whole` as a percentage rounded half up.
const fn percentage(part: usize, whole: usize) -> usize {
    if whole == 0 {
        return VACUOUS_COMPLIANCE_SCORE;
    }
    (part * 200 + whole) / (whole * 2)
}

/// Counts requirements per action type, in canonical order.
///
/// Types with no requirements are omitted.
#[must_use]
pub fn count_by_action_type(requirements: &[Requirement]) -> Vec<(ActionType, usize)> {
    let mut counts = BTreeMap::new();
    for requirement in requirements {
        *counts.entry(requirement.type_of_action).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Counts requirements per recurrence pattern, most frequent first.
///
/// Ties are ordered by label.
#[must_use]
pub fn count_by_recurrence(requirements: &[Requirement]) -> Vec<(Recurrence, usize)> {
    let mut counts: BTreeMap<&Recurrence, usize> = BTreeMap::new();
    for requirement in requirements {
        *counts.entry(&requirement.recurrence).or_insert(0) += 1;
    }

    let mut counts: Vec<_> = counts
        .into_iter()
        .map(|(recurrence, count)| (recurrence.clone(), count))
        .collect();
    counts.sort_by(|(a, a_count), (b, b_count)| {
        b_count.cmp(a_count).then_with(|| a.label().cmp(b.label()))
    });
    counts
}

/// Open requirements due on or after `today`, soonest first.
#[must_use]
pub fn upcoming_deadlines(
    requirements: &[Requirement],
    today: NaiveDate,
    limit: usize,
) -> Vec<&Requirement> {
    let mut upcoming: Vec<_> = requirements
        .iter()
        .filter(|requirement| !requirement.is_completed())
        .filter(|requirement| requirement.due_date().is_some_and(|due| due >= today))
        .collect();
    upcoming.sort_by_key(|requirement| requirement.due_date());
    upcoming.truncate(limit);
    upcoming
}

/// Completed requirements, most recently completed first.
#[must_use]
pub fn recent_activity(requirements: &[Requirement], limit: usize) -> Vec<&Requirement> {
    let mut completed: Vec<_> = requirements
        .iter()
        .filter(|requirement| requirement.is_completed())
        .collect();
    completed.sort_by(|a, b| completion_key(b).cmp(completion_key(a)));
    completed.truncate(limit);
    completed
}

fn completion_key(requirement: &Requirement) -> &str {
    requirement
        .completed_date
        .as_ref()
        .map_or("", |date| date.as_str())
}

/// Everything the dashboard shows, computed in one pass over a snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard<'a> {
    /// The summary counters.
    pub metrics: Metrics,
    /// Requirement counts per action type.
    pub by_action_type: Vec<(ActionType, usize)>,
    /// Requirement counts per recurrence pattern.
    pub by_recurrence: Vec<(Recurrence, usize)>,
    /// The next open deadlines.
    pub upcoming: Vec<&'a Requirement>,
    /// The most recent completions.
    pub recent: Vec<&'a Requirement>,
}

impl<'a> Dashboard<'a> {
    /// Builds the dashboard for `requirements` as of `today`.
    #[must_use]
    pub fn build(
        requirements: &'a [Requirement],
        today: NaiveDate,
        upcoming_limit: usize,
        recent_limit: usize,
    ) -> Self {
        Self {
            metrics: compute_metrics(requirements, today),
            by_action_type: count_by_action_type(requirements),
            by_recurrence: count_by_recurrence(requirements),
            upcoming: upcoming_deadlines(requirements, today, upcoming_limit),
            recent: recent_activity(requirements, recent_limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::requirement::{parse_date, EquipmentType, IsoDate};

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn requirement(needed_by: Option<&str>, completed_date: Option<&str>) -> Requirement {
        let mut requirement = Requirement::new(
            ActionType::Inspections,
            Recurrence::Annual,
            "Inspect".to_string(),
            EquipmentType::General,
        );
        requirement.needed_by = needed_by.map(IsoDate::from);
        requirement.completed_date = completed_date.map(IsoDate::from);
        requirement
    }

    #[test]
    fn empty_collection_is_vacuously_compliant() {
        let metrics = compute_metrics(&[], date("2026-02-01"));
        assert_eq!(
            metrics,
            Metrics {
                total_requirements: 0,
                due_this_month: 0,
                overdue: 0,
                compliance_score: 100,
            }
        );
    }

    #[test]
    fn mixed_collection_scenario() {
        let requirements = [
            requirement(Some("2026-01-10"), Some("2026-01-05")),
            requirement(Some("2026-01-10"), None),
            requirement(None, None),
        ];

        let metrics = compute_metrics(&requirements, date("2026-02-01"));

        assert_eq!(metrics.total_requirements, 3);
        assert_eq!(metrics.overdue, 1);
        assert_eq!(metrics.compliance_score, 50);
        assert_eq!(metrics.due_this_month, 0);
    }

    #[test]
    fn due_this_month_is_inclusive_of_both_ends() {
        let requirements = [
            requirement(Some("2026-01-31"), None),
            requirement(Some("2026-02-01"), None),
            requirement(Some("2026-02-28"), None),
            requirement(Some("2026-03-01"), None),
            requirement(None, None),
        ];

        let metrics = compute_metrics(&requirements, date("2026-02-14"));
        assert_eq!(metrics.due_this_month, 2);
    }

    #[test]
    fn late_and_undated_completions_are_not_on_time() {
        let requirements = [
            requirement(Some("2026-01-10"), Some("2026-01-11")),
            requirement(None, Some("2026-01-11")),
        ];

        let metrics = compute_metrics(&requirements, date("2026-02-01"));
        assert_eq!(metrics.compliance_score, 0);
    }

    #[test_case(1, 8, 13; "12.5 rounds up")]
    #[test_case(1, 3, 33; "33.3 rounds down")]
    #[test_case(2, 3, 67; "66.7 rounds up")]
    #[test_case(0, 5, 0; "none on time")]
    #[test_case(5, 5, 100; "all on time")]
    #[test_case(0, 0, 100; "nothing scoreable")]
    fn percentage_rounds_half_up(part: usize, whole: usize, expected: usize) {
        assert_eq!(percentage(part, whole), expected);
    }

    #[test]
    fn meets_target() {
        let metrics = compute_metrics(&[], date("2026-02-01"));
        assert!(metrics.meets_target(80));
        assert!(!Metrics {
            compliance_score: 79,
            ..metrics
        }
        .meets_target(80));
    }

    #[test]
    fn counts_by_action_type_in_canonical_order() {
        let mut tests = requirement(None, None);
        tests.type_of_action = ActionType::Tests;
        let mut events = requirement(None, None);
        events.type_of_action = ActionType::EventActions;
        let requirements = [tests.clone(), events, tests];

        assert_eq!(
            count_by_action_type(&requirements),
            vec![(ActionType::EventActions, 1), (ActionType::Tests, 2)]
        );
    }

    #[test]
    fn counts_by_recurrence_most_frequent_first() {
        let mut monthly = requirement(None, None);
        monthly.recurrence = Recurrence::Monthly;
        let mut custom = requirement(None, None);
        custom.recurrence = Recurrence::Other("Biweekly".to_string());
        let annual = requirement(None, None);
        let requirements = [annual, monthly.clone(), custom, monthly];

        assert_eq!(
            count_by_recurrence(&requirements),
            vec![
                (Recurrence::Monthly, 2),
                (Recurrence::Annual, 1),
                (Recurrence::Other("Biweekly".to_string()), 1),
            ]
        );
    }

    #[test]
    fn upcoming_deadlines_skips_completed_and_past() {
        let requirements = [
            requirement(Some("2026-03-01"), None),
            requirement(Some("2026-01-01"), None),
            requirement(Some("2026-02-01"), None),
            requirement(Some("2026-02-10"), Some("2026-02-01")),
            requirement(None, None),
            requirement(Some("2026-02-15"), None),
        ];

        let upcoming = upcoming_deadlines(&requirements, date("2026-02-01"), 2);
        let dates: Vec<_> = upcoming
            .iter()
            .map(|requirement| requirement.needed_by.as_ref().unwrap().as_str())
            .collect();

        assert_eq!(dates, ["2026-02-01", "2026-02-15"]);
    }

    #[test]
    fn recent_activity_is_newest_first() {
        let requirements = [
            requirement(None, Some("2026-01-05")),
            requirement(None, None),
            requirement(None, Some("2026-01-20")),
            requirement(None, Some("2026-01-10")),
        ];

        let recent = recent_activity(&requirements, 2);
        let dates: Vec<_> = recent.iter().map(|r| completion_key(r)).collect();

        assert_eq!(dates, ["2026-01-20", "2026-01-10"]);
    }

    #[test]
    fn dashboard_bundles_every_summary() {
        let requirements = [
            requirement(Some("2026-02-20"), None),
            requirement(Some("2026-01-10"), Some("2026-01-09")),
        ];

        let dashboard = Dashboard::build(&requirements, date("2026-02-01"), 8, 5);

        assert_eq!(dashboard.metrics.total_requirements, 2);
        assert_eq!(dashboard.metrics.due_this_month, 1);
        assert_eq!(dashboard.by_action_type, vec![(ActionType::Inspections, 2)]);
        assert_eq!(dashboard.upcoming.len(), 1);
        assert_eq!(dashboard.recent.len(), 1);
    }
}
