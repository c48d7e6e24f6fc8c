use std::{fmt, io};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use compliance::{
    domain::{apply_filters, sort_records},
    export, Requirement, Status,
};
use serde::Serialize;
use tracing::instrument;

use super::{
    filters::{FilterArgs, SortArgs},
    terminal::Colorize,
    truncate, Session,
};

const ACTION_WIDTH: usize = 56;

/// Command arguments for `permit list`.
#[derive(Debug, Parser)]
#[command(about = "List requirements with filters and sorting")]
pub struct Command {
    #[command(flatten)]
    filters: FilterArgs,

    #[command(flatten)]
    sort: SortArgs,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Limit number of rows returned.
    #[arg(long)]
    limit: Option<usize>,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// A requirement with its derived state, as emitted by `--output json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Row<'a> {
    #[serde(flatten)]
    requirement: &'a Requirement,
    status: Status,
    completed_late: bool,
}

impl Command {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let config = session.config()?;
        let store = session.open_store(&config)?;
        let today = session.today();

        let filters = self.filters.into_state(today);
        let (key, direction) = self.sort.resolve(config.default_sort);

        let matched = apply_filters(store.requirements(), &filters, today);
        let mut rows = sort_records(&matched, key, direction, today);
        if let Some(max) = self.limit {
            rows.truncate(max);
        }
        tracing::debug!(rows = rows.len(), %key, "listing requirements");

        match self.output {
            OutputFormat::Table => {
                render_table(&rows, session);
                Ok(())
            }
            OutputFormat::Json => render_json(&rows, session),
            OutputFormat::Csv => {
                export::write_csv(rows, today, io::stdout().lock())
                    .context("failed to render csv output")?;
                println!();
                Ok(())
            }
        }
    }
}

fn render_table(rows: &[&Requirement], session: &Session) {
    if rows.is_empty() {
        println!("{}", "No requirements match.".dim());
        return;
    }

    let today = session.today();
    let headers = [
        "ID",
        "Type of Action",
        "Recurrence",
        "Action",
        "Equipment",
        "Needed By",
        "Completed",
        "Status",
    ];

    let data: Vec<(Status, [String; 8])> = rows
        .iter()
        .map(|requirement| {
            let status = requirement.status(today);
            let values = [
                requirement.id.to_string(),
                requirement.type_of_action.to_string(),
                requirement.recurrence.to_string(),
                truncate(&requirement.action, ACTION_WIDTH),
                requirement.equipment_type.to_string(),
                requirement
                    .needed_by
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                requirement
                    .completed_date
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                if requirement.is_completed_late() {
                    format!("{status} (late)")
                } else {
                    status.to_string()
                },
            ];
            (status, values)
        })
        .collect();

    // Determine column widths for alignment.
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            data.iter()
                .map(|(_, row)| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    for (header, width) in headers.iter().zip(&widths) {
        print!("{header:<width$}  ");
    }
    println!();
    for width in &widths {
        print!("{:-<width$}  ", "");
    }
    println!();

    let last = headers.len() - 1;
    for (status, row) in data {
        for (idx, value) in row.iter().enumerate() {
            let width = widths[idx];
            if idx == last {
                print!("{}", value.for_status(status));
            } else {
                print!("{value:<width$}  ");
            }
        }
        println!();
    }
}

fn render_json(rows: &[&Requirement], session: &Session) -> anyhow::Result<()> {
    let today = session.today();
    let rows_out: Vec<_> = rows
        .iter()
        .map(|requirement| Row {
            requirement,
            status: requirement.status(today),
            completed_late: requirement.is_completed_late(),
        })
        .collect();

    serde_json::to_writer_pretty(io::stdout(), &rows_out)
        .context("failed to render json output")?;
    println!();
    Ok(())
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
        })
    }
}
