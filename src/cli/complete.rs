//! Commands that change whether a requirement is complete.

use chrono::NaiveDate;
use clap::Parser;
use tracing::instrument;

use super::{resolve_id, terminal::Colorize, Session};

#[derive(Debug, Parser)]
pub struct Complete {
    /// The requirement id (or an unambiguous prefix of it)
    id: String,

    /// The completion date (defaults to today)
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,
}

impl Complete {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let config = session.config()?;
        let mut store = session.open_store(&config)?;
        let id = resolve_id(&store, &self.id)?;
        let date = self.date.unwrap_or_else(|| session.today());

        let requirement = store.mark_completed(&id, date)?;
        let late = requirement.is_completed_late();
        let message = format!("✅ Completed '{}' on {date}", requirement.action);
        store.flush()?;

        println!("{}", message.success());
        if late {
            println!("{}", "⚠️  Completed after its due date".warning());
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Reopen {
    /// The requirement id (or an unambiguous prefix of it)
    id: String,
}

impl Reopen {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let config = session.config()?;
        let mut store = session.open_store(&config)?;
        let id = resolve_id(&store, &self.id)?;

        if store.get(&id).is_some_and(|r| !r.is_completed()) {
            println!("{}", "ℹ️  Requirement is already open".dim());
            return Ok(());
        }

        let requirement = store.mark_incomplete(&id)?;
        let message = format!(
            "✅ Reopened '{}' ({})",
            requirement.action,
            requirement.status(session.today())
        );
        store.flush()?;

        println!("{}", message.success());
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Toggle {
    /// The requirement id (or an unambiguous prefix of it)
    id: String,
}

impl Toggle {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let config = session.config()?;
        let mut store = session.open_store(&config)?;
        let id = resolve_id(&store, &self.id)?;

        let requirement = store.toggle_completed(&id, session.today())?;
        let status = requirement.status(session.today());
        let message = format!("'{}' is now {status}", requirement.action);
        store.flush()?;

        println!("{}", message.for_status(status));
        Ok(())
    }
}
