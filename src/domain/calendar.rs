//! Month grids and per-day grouping of requirements for the calendar view.

use std::{collections::BTreeMap, fmt};

use chrono::{Datelike, Months, NaiveDate};

use crate::domain::requirement::Requirement;

const DAYS_PER_WEEK: usize = 7;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Creates a month from a year and a zero-based month (`0` is January).
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if the month is greater than 11 or the year
    /// is outside the supported date range.
    pub fn from_zero_based(year: i32, month: u32) -> Result<Self, CalendarError> {
        if month > 11 {
            return Err(CalendarError::MonthOutOfRange(month));
        }
        NaiveDate::from_ymd_opt(year, month + 1, 1)
            .map(|first| Self { first })
            .ok_or(CalendarError::YearOutOfRange(year))
    }

    /// The month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// The calendar year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.first.year()
    }

    /// The zero-based month (`0` is January).
    #[must_use]
    pub fn month0(self) -> u32 {
        self.first.month0()
    }

    /// The first day of the month.
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.first
    }

    /// The last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.first
            .with_day(self.days_in_month())
            .unwrap_or(self.first)
    }

    /// The number of days in the month.
    #[must_use]
    pub fn days_in_month(self) -> u32 {
        (29..=31)
            .rev()
            .find(|&day| self.first.with_day(day).is_some())
            .unwrap_or(28)
    }

    /// Whether `date` falls within this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month0() == self.month0()
    }

    /// The following month, if representable.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// The preceding month, if representable.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.first.format("%B %Y").to_string())
    }
}

/// Errors constructing a [`YearMonth`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CalendarError {
    /// The zero-based month was not in `0..=11`.
    #[error("month {0} is out of range (expected 0-11)")]
    MonthOutOfRange(u32),
    /// The year cannot be represented.
    #[error("year {0} is out of range")]
    YearOutOfRange(i32),
}

/// The cells needed to draw a month as whole weeks, Sunday first.
///
/// Cells outside the month are `None`; the rest hold the day of the month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: YearMonth,
    cells: Vec<Option<u32>>,
}

impl MonthGrid {
    /// Lays out `month` as whole weeks.
    #[must_use]
    pub fn new(month: YearMonth) -> Self {
        let offset = month.first_day().weekday().num_days_from_sunday();

        let mut cells: Vec<Option<u32>> = (0..offset).map(|_| None).collect();
        cells.extend((1..=month.days_in_month()).map(Some));

        let trailing = (DAYS_PER_WEEK - cells.len() % DAYS_PER_WEEK) % DAYS_PER_WEEK;
        cells.extend(std::iter::repeat_n(None, trailing));

        Self { month, cells }
    }

    /// The month this grid lays out.
    #[must_use]
    pub const fn month(&self) -> YearMonth {
        self.month
    }

    /// Every cell, row by row.
    #[must_use]
    pub fn cells(&self) -> &[Option<u32>] {
        &self.cells
    }

    /// The grid split into weeks of seven cells.
    pub fn weeks(&self) -> impl Iterator<Item = &[Option<u32>]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }
}

/// Groups requirements by the day of `month` they are due.
///
/// Requirements without a valid due date, or due in another month, are left
/// out. Within a day, requirements keep their input order.
#[must_use]
pub fn bucket_by_day<'a, I>(
    requirements: I,
    month: YearMonth,
) -> BTreeMap<u32, Vec<&'a Requirement>>
where
    I: IntoIterator<Item = &'a Requirement>,
{
    let mut days: BTreeMap<u32, Vec<&'a Requirement>> = BTreeMap::new();
    for requirement in requirements {
        let Some(due) = requirement.due_date() else {
            continue;
        };
        if month.contains(due) {
            days.entry(due.day()).or_default().push(requirement);
        }
    }
    days
}

/// A month grid together with the requirements due on each day.
#[derive(Debug, Clone)]
pub struct CalendarMonth<'a> {
    grid: MonthGrid,
    days: BTreeMap<u32, Vec<&'a Requirement>>,
}

impl<'a> CalendarMonth<'a> {
    /// Lays out `month` and buckets `requirements` into it.
    #[must_use]
    pub fn build<I>(requirements: I, month: YearMonth) -> Self
    where
        I: IntoIterator<Item = &'a Requirement>,
    {
        Self {
            grid: MonthGrid::new(month),
            days: bucket_by_day(requirements, month),
        }
    }

    /// The month grid.
    #[must_use]
    pub const fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    /// The requirements due on `day`, in input order.
    #[must_use]
    pub fn records_on(&self, day: u32) -> &[&'a Requirement] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    /// The days that have at least one requirement due, with their requirements.
    #[must_use]
    pub const fn days(&self) -> &BTreeMap<u32, Vec<&'a Requirement>> {
        &self.days
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::requirement::{parse_date, ActionType, EquipmentType, IsoDate, Recurrence};

    fn requirement(action: &str, needed_by: Option<&str>) -> Requirement {
        let mut requirement = Requirement::new(
            ActionType::Samples,
            Recurrence::Monthly,
            action.to_string(),
            EquipmentType::General,
        );
        requirement.needed_by = needed_by.map(IsoDate::from);
        requirement
    }

    #[test_case(2026, 0, 31; "january")]
    #[test_case(2026, 1, 28; "february")]
    #[test_case(2024, 1, 29; "leap february")]
    #[test_case(2026, 3, 30; "april")]
    #[test_case(2026, 11, 31; "december")]
    fn days_in_month(year: i32, month: u32, expected: u32) {
        let month = YearMonth::from_zero_based(year, month).unwrap();
        assert_eq!(month.days_in_month(), expected);
        assert_eq!(month.last_day().day(), expected);
    }

    #[test]
    fn month_out_of_range_is_an_error() {
        assert_eq!(
            YearMonth::from_zero_based(2026, 12),
            Err(CalendarError::MonthOutOfRange(12))
        );
    }

    #[test]
    fn grid_is_whole_weeks_with_every_day() {
        for year in [2024, 2025, 2026] {
            for month in 0..12 {
                let month = YearMonth::from_zero_based(year, month).unwrap();
                let grid = MonthGrid::new(month);

                assert_eq!(grid.cells().len() % 7, 0);
                let days = grid.cells().iter().filter(|cell| cell.is_some()).count();
                assert_eq!(days, month.days_in_month() as usize);
            }
        }
    }

    #[test]
    fn grid_starts_on_the_right_weekday() {
        // 1 February 2026 is a Sunday; 1 March 2026 is a Sunday; 1 January 2026
        // is a Thursday.
        let february = MonthGrid::new(YearMonth::from_zero_based(2026, 1).unwrap());
        assert_eq!(february.cells()[0], Some(1));
        assert_eq!(february.cells().len(), 28);

        let january = MonthGrid::new(YearMonth::from_zero_based(2026, 0).unwrap());
        assert_eq!(&january.cells()[..5], &[None, None, None, None, Some(1)]);
        assert_eq!(january.weeks().count(), 5);
    }

    #[test]
    fn buckets_only_the_target_month() {
        let requirements = [
            requirement("a", Some("2026-03-15")),
            requirement("b", Some("2026-04-15")),
            requirement("c", Some("2025-03-15")),
            requirement("d", None),
            requirement("e", Some("garbage")),
            requirement("f", Some("2026-03-15")),
            requirement("g", Some("2026-03-01")),
        ];
        let month = YearMonth::from_zero_based(2026, 2).unwrap();

        let days = bucket_by_day(&requirements, month);

        assert_eq!(days.keys().copied().collect::<Vec<_>>(), [1, 15]);
        let fifteenth: Vec<_> = days[&15].iter().map(|r| r.action.as_str()).collect();
        assert_eq!(fifteenth, ["a", "f"]);
    }

    #[test]
    fn empty_input_gives_empty_mapping_and_full_grid() {
        let month = YearMonth::from_zero_based(2026, 1).unwrap();
        let none: [Requirement; 0] = [];
        let calendar = CalendarMonth::build(&none, month);

        assert!(calendar.days().is_empty());
        assert!(calendar.records_on(1).is_empty());
        assert_eq!(calendar.grid().cells().len() % 7, 0);
    }

    #[test]
    fn navigation_wraps_years() {
        let december = YearMonth::from_zero_based(2025, 11).unwrap();
        let january = december.next().unwrap();

        assert_eq!((january.year(), january.month0()), (2026, 0));
        assert_eq!(january.previous(), Some(december));
        assert_eq!(january.to_string(), "January 2026");
    }

    #[test]
    fn containing_finds_the_month() {
        let month = YearMonth::containing(parse_date("2026-02-17").unwrap());
        assert_eq!(month.first_day(), parse_date("2026-02-01").unwrap());
        assert_eq!(month.last_day(), parse_date("2026-02-28").unwrap());
    }
}
