use chrono::NaiveDate;
use clap::Parser;
use compliance::{Requirement, Status};
use serde::Serialize;
use tracing::instrument;

use super::{resolve_id, terminal::Colorize, Session};

#[derive(Debug, Parser)]
#[command(about = "Display detailed information about a requirement")]
pub struct Command {
    /// The requirement id (or an unambiguous prefix of it)
    id: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Detail<'a> {
    #[serde(flatten)]
    requirement: &'a Requirement,
    status: Status,
    completed_late: bool,
    completed_on_time: bool,
}

impl Command {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let config = session.config()?;
        let store = session.open_store(&config)?;
        let id = resolve_id(&store, &self.id)?;
        let Some(requirement) = store.get(&id) else {
            anyhow::bail!("Requirement '{id}' not found");
        };

        match self.output {
            OutputFormat::Pretty => output_pretty(requirement, session.today()),
            OutputFormat::Json => {
                let detail = Detail {
                    requirement,
                    status: requirement.status(session.today()),
                    completed_late: requirement.is_completed_late(),
                    completed_on_time: requirement.is_completed_on_time(),
                };
                println!("{}", serde_json::to_string_pretty(&detail)?);
            }
        }
        Ok(())
    }
}

fn output_pretty(requirement: &Requirement, today: NaiveDate) {
    let status = requirement.status(today);
    println!("# {}", requirement.action.strong());
    println!("{}\n", requirement.id.as_str().dim());

    println!("{}", "Metadata".dim());
    for (label, value) in fields(requirement) {
        println!("  {label:<21} {value}");
    }

    println!();
    println!("{}", "Status".dim());
    println!("  {}", status_line(requirement, today).for_status(status));
}

/// The labelled values shown for a requirement, blank ones as `–`.
fn fields(requirement: &Requirement) -> Vec<(&'static str, String)> {
    let or_dash = |value: Option<&str>| {
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or("–")
            .to_string()
    };

    vec![
        ("Type of action:", requirement.type_of_action.to_string()),
        ("Recurrence:", requirement.recurrence.to_string()),
        ("Equipment:", requirement.equipment_type.to_string()),
        (
            "Requirements covered:",
            or_dash(Some(requirement.requirements_covered.as_str())),
        ),
        (
            "Needed by:",
            or_dash(requirement.needed_by.as_ref().map(|d| d.as_str())),
        ),
        (
            "Completed:",
            or_dash(requirement.completed_date.as_ref().map(|d| d.as_str())),
        ),
        ("Supporting file:", or_dash(requirement.file_uploaded.as_deref())),
    ]
}

fn status_line(requirement: &Requirement, today: NaiveDate) -> String {
    let status = requirement.status(today);
    match status {
        Status::Completed if requirement.is_completed_late() => {
            format!("{status} (after its due date)")
        }
        Status::Completed if requirement.is_completed_on_time() => format!("{status} (on time)"),
        Status::Overdue => requirement.due_date().map_or_else(
            || status.to_string(),
            |due| format!("{status} by {} day(s)", (today - due).num_days()),
        ),
        _ => status.to_string(),
    }
}
