use std::path::Path;

use compliance::Config;
use tracing::instrument;

use crate::cli::{confirm, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The permit ids to remove
    #[arg(num_args = 1..)]
    ids: Vec<String>,

    /// Skip confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl Command {
    #[instrument(skip(config))]
    pub fn run(self, config: &mut Config, config_path: &Path) -> anyhow::Result<()> {
        let active = config.permits().active_id().to_string();

        if self.ids.contains(&active) && !self.yes {
            println!(
                "{}",
                format!("⚠️  '{active}' is the active permit.").warning()
            );
            println!(
                "{}",
                "Another registered permit will become active in its place.".dim()
            );
            if !confirm("Proceed?")? {
                println!("Cancelled");
                std::process::exit(130);
            }
        }

        let mut removed = Vec::new();
        let mut not_found = Vec::new();

        for id in self.ids {
            if config.permits_mut().remove(&id).is_some() {
                removed.push(id);
            } else {
                not_found.push(id);
            }
        }

        if !removed.is_empty() {
            config
                .save(config_path)
                .map_err(|e| anyhow::anyhow!("{e}"))?;

            println!(
                "{}",
                format!(
                    "✅ Removed {} permit type(s): {}",
                    removed.len(),
                    removed.join(", ")
                )
                .success()
            );
            if config.permits().active_id() != active {
                println!(
                    "{}",
                    format!("ℹ️  Active permit: {}", config.permits().active_id()).dim()
                );
            }
        }

        if !not_found.is_empty() {
            println!(
                "{}",
                format!("ℹ️  Not found: {}", not_found.join(", ")).dim()
            );
        }

        Ok(())
    }
}
