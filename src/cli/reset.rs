use std::path::PathBuf;

use tracing::instrument;

use super::{confirm, load_seed, terminal::Colorize, Session};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The JSON dataset to load
    #[arg(long, value_name = "FILE")]
    seed: PathBuf,

    /// Skip confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl Command {
    #[instrument(skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let config = session.require_config()?;
        let seed = load_seed(&self.seed)?;
        let mut store = session.open_store(&config)?;

        let existing = store.requirements().len();
        let completed = store
            .requirements()
            .iter()
            .filter(|r| r.is_completed())
            .count();

        if existing > 0 && !self.yes {
            println!(
                "{}",
                format!(
                    "⚠️  This replaces {existing} requirement(s), {completed} of them completed."
                )
                .warning()
            );
            println!(
                "{}",
                "Completion dates recorded since the last reset will be lost.".dim()
            );

            if !confirm("Proceed?")? {
                println!("Cancelled");
                std::process::exit(130);
            }
        }

        let count = seed.len();
        store.reset(seed)?;
        store.flush()?;

        println!(
            "{}",
            format!(
                "✅ Loaded {count} requirement(s) from {}",
                self.seed.display()
            )
            .success()
        );
        Ok(())
    }
}
