use tracing::instrument;

use super::Session;

mod add;
mod list;
mod remove;

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: PermitCommand,
}

#[derive(Debug, clap::Parser)]
enum PermitCommand {
    /// Register a permit type
    Add(add::Command),

    /// Remove a permit type
    Remove(remove::Command),

    /// Make a permit type the active one
    Use(Use),

    /// List registered permit types
    List,
}

#[derive(Debug, clap::Parser)]
struct Use {
    /// The permit id (e.g. title-v)
    id: String,
}

impl Command {
    #[instrument(skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let config_path = session.config_path();
        let mut config = session.require_config()?;

        match self.command {
            PermitCommand::Add(add) => add.run(&mut config, &config_path),
            PermitCommand::Remove(remove) => remove.run(&mut config, &config_path),
            PermitCommand::Use(Use { id }) => {
                config.permits_mut().set_active(&id)?;
                config
                    .save(&config_path)
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
                println!("Active permit: {id}");
                Ok(())
            }
            PermitCommand::List => {
                list::run(&config);
                Ok(())
            }
        }
    }
}
