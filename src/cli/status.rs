use clap::Parser;
use compliance::{domain::Dashboard, Config, Requirement};
use tracing::instrument;

use super::{
    terminal::{is_narrow, Colorize},
    truncate, Session,
};

#[derive(Debug, Parser, Default)]
#[command(about = "Show the compliance dashboard")]
pub struct Command {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Command {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let config = session.config()?;
        let store = session.open_store(&config)?;
        let today = session.today();

        let dashboard = Dashboard::build(
            store.requirements(),
            today,
            config.upcoming_limit,
            config.recent_limit,
        );

        match self.output {
            OutputFormat::Json => Self::output_json(&config, &dashboard, session)?,
            OutputFormat::Table if self.quiet => Self::output_quiet(&dashboard),
            OutputFormat::Table => {
                if dashboard.metrics.total_requirements == 0 {
                    println!(
                        "No requirements found yet. Load some with 'permit init --seed FILE'."
                    );
                    return Ok(());
                }
                Self::output_table(&config, &dashboard, session);
            }
        }

        Ok(())
    }

    fn output_json(
        config: &Config,
        dashboard: &Dashboard<'_>,
        session: &Session,
    ) -> anyhow::Result<()> {
        use serde_json::json;

        let today = session.today();
        let summary = |requirement: &Requirement| {
            json!({
                "id": requirement.id,
                "action": requirement.action,
                "neededBy": requirement.needed_by,
                "completedDate": requirement.completed_date,
                "status": requirement.status(today),
            })
        };

        let output = json!({
            "today": today,
            "activePermit": config.permits().active_id(),
            "metrics": dashboard.metrics,
            "meetsTarget": dashboard.metrics.meets_target(config.compliance_target),
            "byActionType": dashboard
                .by_action_type
                .iter()
                .map(|(action_type, count)| json!({ "label": action_type, "count": count }))
                .collect::<Vec<_>>(),
            "byRecurrence": dashboard
                .by_recurrence
                .iter()
                .map(|(recurrence, count)| json!({ "label": recurrence, "count": count }))
                .collect::<Vec<_>>(),
            "upcoming": dashboard.upcoming.iter().map(|r| summary(r)).collect::<Vec<_>>(),
            "recent": dashboard.recent.iter().map(|r| summary(r)).collect::<Vec<_>>(),
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(dashboard: &Dashboard<'_>) {
        let metrics = dashboard.metrics;
        println!(
            "total={} due_this_month={} overdue={} score={}",
            metrics.total_requirements,
            metrics.due_this_month,
            metrics.overdue,
            metrics.compliance_score
        );
    }

    fn output_table(config: &Config, dashboard: &Dashboard<'_>, session: &Session) {
        const ACTION_WIDTH: usize = 48;
        let narrow = is_narrow();
        let today = session.today();
        let metrics = dashboard.metrics;

        let permit = config
            .permits()
            .active()
            .map_or_else(|| config.permits().active_id().to_string(), |p| p.name.clone());
        println!("{} compliance as of {today}", permit.strong());
        println!("{}", "──────────────────────────────".dim());

        println!("Total requirements   {}", metrics.total_requirements);
        println!("Due this month       {}", metrics.due_this_month);
        if metrics.overdue == 0 {
            println!("Overdue              {} ✅", "0".success());
        } else {
            println!(
                "Overdue              {} ⚠️",
                metrics.overdue.to_string().warning()
            );
        }
        let score = format!("{}%", metrics.compliance_score);
        if metrics.meets_target(config.compliance_target) {
            println!("Compliance score     {} ✅", score.success());
        } else {
            println!(
                "Compliance score     {} ⚠️  {}",
                score.warning(),
                format!("(target {}%)", config.compliance_target).dim()
            );
        }

        println!();
        println!("By type of action");
        for (action_type, count) in &dashboard.by_action_type {
            if narrow {
                println!("{action_type}: {count}");
            } else {
                println!("  {:<22} {count:>4}", action_type.label());
            }
        }

        println!();
        println!("By recurrence");
        for (recurrence, count) in &dashboard.by_recurrence {
            if narrow {
                println!("{recurrence}: {count}");
            } else {
                println!("  {:<36} {count:>4}", recurrence.label());
            }
        }

        println!();
        println!("Upcoming deadlines");
        if dashboard.upcoming.is_empty() {
            println!("  {}", "Nothing due.".dim());
        }
        for requirement in &dashboard.upcoming {
            let due = requirement.needed_by.as_ref().map_or("", |d| d.as_str());
            println!(
                "  {due:<10}  {}  {}",
                truncate(&requirement.action, ACTION_WIDTH),
                requirement.equipment_type.label().dim()
            );
        }

        println!();
        println!("Recent activity");
        if dashboard.recent.is_empty() {
            println!("  {}", "No completions recorded.".dim());
        }
        for requirement in &dashboard.recent {
            let completed = requirement.completed_date.as_ref().map_or("", |d| d.as_str());
            let marker = if requirement.is_completed_late() {
                " (late)".warning()
            } else {
                String::new()
            };
            println!(
                "  {completed:<10}  {}{marker}",
                truncate(&requirement.action, ACTION_WIDTH)
            );
        }
    }
}
