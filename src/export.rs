//! CSV export of requirement tables.

use std::io;

use chrono::NaiveDate;

use crate::domain::Requirement;

/// The file name exports are written to unless told otherwise.
pub const DEFAULT_FILE_NAME: &str = "permit-requirements.csv";

const HEADERS: [&str; 8] = [
    "Type of Action",
    "Recurrence",
    "Action",
    "Requirements Covered",
    "Needed By",
    "Completed Date",
    "Equipment Type",
    "Status",
];

/// Renders `requirements` as CSV, in the order given.
///
/// The header line is unquoted. Every value is quoted with embedded quotes
/// doubled, and line breaks in the free-text columns become spaces. Lines
/// are joined with `\n` and there is no trailing newline.
#[must_use]
pub fn to_csv<'a, I>(requirements: I, today: NaiveDate) -> String
where
    I: IntoIterator<Item = &'a Requirement>,
{
    std::iter::once(HEADERS.join(","))
        .chain(requirements.into_iter().map(|r| row(r, today)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the CSV produced by [`to_csv`] to `writer`.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_csv<'a, I, W>(requirements: I, today: NaiveDate, mut writer: W) -> io::Result<()>
where
    I: IntoIterator<Item = &'a Requirement>,
    W: io::Write,
{
    writer.write_all(to_csv(requirements, today).as_bytes())?;
    writer.flush()
}

fn row(requirement: &Requirement, today: NaiveDate) -> String {
    let values = [
        requirement.type_of_action.to_string(),
        requirement.recurrence.to_string(),
        single_line(&requirement.action),
        single_line(&requirement.requirements_covered),
        requirement
            .needed_by
            .as_ref()
            .map(|d| d.as_str().to_string())
            .unwrap_or_default(),
        requirement
            .completed_date
            .as_ref()
            .map(|d| d.as_str().to_string())
            .unwrap_or_default(),
        requirement.equipment_type.to_string(),
        requirement.status(today).to_string(),
    ];

    values
        .iter()
        .map(|value| quote(value))
        .collect::<Vec<_>>()
        .join(",")
}

fn single_line(value: &str) -> String {
    value.replace('\n', " ")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionType, EquipmentType, IsoDate, Recurrence};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn empty_collection_is_just_the_header() {
        let none: [Requirement; 0] = [];
        assert_eq!(
            to_csv(&none, date("2026-01-01")),
            "Type of Action,Recurrence,Action,Requirements Covered,Needed By,Completed \
             Date,Equipment Type,Status"
        );
    }

    #[test]
    fn rows_are_quoted_and_flattened() {
        let mut requirement = Requirement::new(
            ActionType::EventActions,
            Recurrence::Annual,
            "Keep \"fuel\" logs\nfor five years".to_string(),
            EquipmentType::Heater,
        );
        requirement.requirements_covered = "30 TAC 122\n40 CFR 60".to_string();
        requirement.needed_by = Some(IsoDate::new("2026-01-10"));

        let csv = to_csv([&requirement], date("2026-02-01"));
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "\"Event Actions\",\"Annual\",\"Keep \"\"fuel\"\" logs for five years\",\"30 TAC \
             122 40 CFR 60\",\"2026-01-10\",\"\",\"Heater\",\"overdue\""
        );
    }

    #[test]
    fn write_csv_matches_to_csv() {
        let mut requirement = Requirement::new(
            ActionType::Inspections,
            Recurrence::Monthly,
            "Inspect flare".to_string(),
            EquipmentType::Flare,
        );
        requirement.mark_completed(date("2026-03-01"));
        let today = date("2026-03-02");

        let mut buffer = Vec::new();
        write_csv([&requirement], today, &mut buffer).unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), to_csv([&requirement], today));
    }
}
