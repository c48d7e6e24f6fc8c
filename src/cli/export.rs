use std::{fs, io::BufWriter, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use compliance::{
    domain::{apply_filters, sort_records},
    export,
};
use tracing::instrument;

use super::{
    filters::{FilterArgs, SortArgs},
    terminal::Colorize,
    Session,
};

#[derive(Debug, Parser)]
#[command(about = "Export requirements to CSV")]
pub struct Command {
    /// Where to write the CSV file
    #[arg(long, short, value_name = "FILE", default_value = export::DEFAULT_FILE_NAME)]
    output: PathBuf,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(flatten)]
    sort: SortArgs,
}

impl Command {
    #[instrument(level = "debug", skip_all, fields(output = %self.output.display()))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let config = session.config()?;
        let store = session.open_store(&config)?;
        let today = session.today();

        let filters = self.filters.into_state(today);
        let (key, direction) = self.sort.resolve(config.default_sort);
        let matched = apply_filters(store.requirements(), &filters, today);
        let rows = sort_records(&matched, key, direction, today);
        let count = rows.len();

        let file = fs::File::create(&self.output)
            .with_context(|| format!("failed to create {}", self.output.display()))?;
        export::write_csv(rows, today, BufWriter::new(file))
            .with_context(|| format!("failed to write {}", self.output.display()))?;

        println!(
            "{}",
            format!(
                "✅ Exported {count} requirement(s) to {}",
                self.output.display()
            )
            .success()
        );
        Ok(())
    }
}
