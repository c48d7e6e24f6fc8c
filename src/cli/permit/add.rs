use std::path::Path;

use compliance::Config;
use tracing::instrument;

use crate::cli::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Display name of the permit type (e.g. "State Operating Permit")
    name: String,

    /// What the permit authorizes
    #[arg(long, short, default_value = "")]
    description: String,

    /// Make the new permit type the active one
    #[arg(long = "use")]
    activate: bool,
}

impl Command {
    #[instrument(skip(config))]
    pub fn run(self, config: &mut Config, config_path: &Path) -> anyhow::Result<()> {
        let id = config
            .permits_mut()
            .add(&self.name, &self.description)?
            .id
            .clone();
        if self.activate {
            config.permits_mut().set_active(&id)?;
        }

        config
            .save(config_path)
            .map_err(|e| anyhow::anyhow!("{e}"))?;

        println!(
            "{}",
            format!("✅ Added permit type '{}' ({id})", self.name.trim()).success()
        );
        if self.activate {
            println!("{}", format!("ℹ️  Active permit: {id}").dim());
        }
        Ok(())
    }
}
