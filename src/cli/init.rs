use std::{fs, path::PathBuf};

use compliance::Config;
use tracing::instrument;

use super::{load_seed, Session, CONFIG_PATH};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Seed the workspace from a JSON dataset (an array of requirements)
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,
}

impl Command {
    #[instrument(skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let root = session.root();
        let config_path = session.config_path();
        if config_path.exists() {
            anyhow::bail!("Workspace already initialized (found existing {CONFIG_PATH})");
        }

        let config = Config::default();
        let data_path = session.data_path(&config);
        let seed = self.seed.as_deref().map(load_seed).transpose()?;

        let mut store = session.open_store(&config)?;
        let existing = store.requirements().len();
        if seed.is_some() && existing > 0 {
            anyhow::bail!(
                "{} already holds {existing} requirement(s). Remove it, or initialize without \
                 --seed and use 'permit reset --seed FILE' to replace them",
                data_path.display()
            );
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("Failed to create {}: {e}", parent.display())
            })?;
        }
        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        println!("Initialized compliance workspace in {}", root.display());
        println!("  Created: {CONFIG_PATH}");

        let count = if let Some(seed) = seed {
            let count = seed.len();
            store.reset(seed)?;
            store.flush()?;
            println!(
                "  Created: {} ({count} requirement(s))",
                config.data_file().display()
            );
            count
        } else if data_path.exists() {
            tracing::debug!(path = %data_path.display(), "keeping existing data file");
            println!(
                "  Kept:    {} ({existing} requirement(s))",
                config.data_file().display()
            );
            existing
        } else {
            store.reset(Vec::new())?;
            store.flush()?;
            println!("  Created: {} (empty)", config.data_file().display());
            0
        };

        println!();
        println!("Next steps:");
        if count == 0 {
            println!("  permit reset --seed FILE               # Load a dataset");
        }
        println!("  permit status                          # Show the dashboard");
        println!("  permit list --preset due-this-month    # What needs doing");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use compliance::{
        domain::{ActionType, EquipmentType, Recurrence},
        JsonFileRepository, Repository, Requirement,
    };
    use tempfile::TempDir;

    use super::*;

    fn session(root: &TempDir) -> Session {
        Session {
            root: root.path().to_path_buf(),
            today: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        }
    }

    fn requirement(action: &str) -> Requirement {
        Requirement::new(
            ActionType::Inspections,
            Recurrence::Monthly,
            action.to_string(),
            EquipmentType::Flare,
        )
    }

    fn write_data(root: &TempDir, file: &str, requirements: &[Requirement]) {
        JsonFileRepository::new(root.path().join(file))
            .save(requirements)
            .unwrap();
    }

    fn stored(root: &TempDir) -> Vec<Requirement> {
        JsonFileRepository::new(root.path().join("requirements.json"))
            .load()
            .unwrap()
    }

    #[test]
    fn creates_config_and_empty_data_file() {
        let root = TempDir::new().unwrap();

        Command { seed: None }.run(&session(&root)).unwrap();

        assert!(root.path().join(CONFIG_PATH).is_file());
        assert!(root.path().join("requirements.json").is_file());
        assert!(stored(&root).is_empty());
    }

    #[test]
    fn keeps_an_existing_data_file() {
        let root = TempDir::new().unwrap();
        let existing = requirement("Inspect flare tip");
        write_data(&root, "requirements.json", std::slice::from_ref(&existing));

        Command { seed: None }.run(&session(&root)).unwrap();

        assert!(root.path().join(CONFIG_PATH).is_file());
        assert_eq!(stored(&root), [existing]);
    }

    #[test]
    fn seeds_the_data_file() {
        let root = TempDir::new().unwrap();
        write_data(&root, "seed.json", &[requirement("a"), requirement("b")]);

        Command {
            seed: Some(root.path().join("seed.json")),
        }
        .run(&session(&root))
        .unwrap();

        assert_eq!(stored(&root).len(), 2);
    }

    #[test]
    fn refuses_to_seed_over_existing_data() {
        let root = TempDir::new().unwrap();
        let existing = requirement("Inspect flare tip");
        write_data(&root, "requirements.json", std::slice::from_ref(&existing));
        write_data(&root, "seed.json", &[requirement("a")]);

        let result = Command {
            seed: Some(root.path().join("seed.json")),
        }
        .run(&session(&root));

        assert!(result.is_err());
        assert!(!root.path().join(CONFIG_PATH).exists());
        assert_eq!(stored(&root), [existing]);
    }

    #[test]
    fn refuses_an_initialized_workspace() {
        let root = TempDir::new().unwrap();
        Command { seed: None }.run(&session(&root)).unwrap();

        assert!(Command { seed: None }.run(&session(&root)).is_err());
    }
}
