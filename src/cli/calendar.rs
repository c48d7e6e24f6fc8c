use anyhow::Context;
use chrono::Datelike;
use clap::Parser;
use compliance::{
    domain::{apply_filters, CalendarMonth, YearMonth},
    Requirement, Status,
};
use tracing::instrument;

use super::{filters::FilterArgs, terminal::Colorize, truncate, Session};

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

#[derive(Debug, Parser)]
#[command(about = "Show a month of deadlines")]
pub struct Command {
    /// Year to show (defaults to the current one)
    #[arg(long, requires = "month")]
    year: Option<i32>,

    /// Month to show, 1-12 (defaults to the current one)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    #[command(flatten)]
    filters: FilterArgs,
}

impl Command {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let config = session.config()?;
        let store = session.open_store(&config)?;
        let today = session.today();

        let current = YearMonth::containing(today);
        let month = match self.month {
            Some(month) => {
                let year = self.year.unwrap_or_else(|| current.year());
                YearMonth::from_zero_based(year, month - 1).context("invalid month")?
            }
            None => current,
        };

        let filters = self.filters.into_state(today);
        let matched = apply_filters(store.requirements(), &filters, today);
        let calendar = CalendarMonth::build(matched, month);

        render_grid(&calendar, session);
        println!();
        render_days(&calendar, session);
        render_navigation(month);

        Ok(())
    }
}

/// The status a day cell is colored by: any overdue, else any pending.
fn day_status(records: &[&Requirement], session: &Session) -> Option<Status> {
    records
        .iter()
        .map(|requirement| requirement.status(session.today()))
        .max_by_key(|status| match status {
            Status::Completed => 0,
            Status::Pending => 1,
            Status::Overdue => 2,
        })
}

fn render_grid(calendar: &CalendarMonth<'_>, session: &Session) {
    let month = calendar.grid().month();
    println!("{}", format!("{month:^28}").strong());
    println!(
        "{}",
        WEEKDAYS
            .iter()
            .map(|day| format!("{day:>3} "))
            .collect::<String>()
            .dim()
    );

    let today = session.today();
    for week in calendar.grid().weeks() {
        let mut line = String::new();
        for cell in week {
            let Some(day) = cell else {
                line.push_str("    ");
                continue;
            };
            let records = calendar.records_on(*day);
            let marker = if records.is_empty() { ' ' } else { '•' };
            let text = format!("{day:>3}{marker}");
            let text = match day_status(records, session) {
                Some(status) => text.for_status(status),
                None if month.contains(today) && today.day() == *day => text.strong(),
                None => text,
            };
            line.push_str(&text);
        }
        println!("{}", line.trim_end());
    }
}

fn render_days(calendar: &CalendarMonth<'_>, session: &Session) {
    const ACTION_WIDTH: usize = 52;

    if calendar.days().is_empty() {
        println!("{}", "Nothing due this month.".dim());
        return;
    }

    let month = calendar.grid().month();
    for (day, records) in calendar.days() {
        let heading = month
            .first_day()
            .with_day(*day)
            .map_or_else(|| day.to_string(), |date| date.format("%a %d %b").to_string());
        println!("{}", heading.strong());
        for requirement in records {
            let status = requirement.status(session.today());
            println!(
                "  {} {}  {}",
                format!("{status:<9}").for_status(status),
                truncate(&requirement.action, ACTION_WIDTH),
                requirement.id.as_str().dim()
            );
        }
    }
}

fn render_navigation(month: YearMonth) {
    let hint = |label: &str, target: Option<YearMonth>| {
        target.map(|target| {
            format!(
                "{label}: permit calendar --year {} --month {}",
                target.year(),
                target.month0() + 1
            )
        })
    };

    let hints: Vec<String> = [
        hint("Previous", month.previous()),
        hint("Next", month.next()),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !hints.is_empty() {
        println!();
        println!("{}", hints.join("   ").dim());
    }
}
