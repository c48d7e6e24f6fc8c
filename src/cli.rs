use std::{
    io::{self, BufRead},
    path::{Path, PathBuf},
};

mod calendar;
mod complete;
mod export;
mod filters;
mod init;
mod list;
mod permit;
mod reset;
mod show;
mod status;
mod terminal;

use anyhow::Context;
use chrono::NaiveDate;
use clap::ArgAction;
use compliance::{
    storage::MemoryRepository, Config, JsonFileRepository, Repository, Requirement,
    RequirementId, RequirementStore,
};
use tracing::instrument;

/// Where the workspace configuration lives, relative to the root.
const CONFIG_PATH: &str = ".permit/config.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the compliance workspace
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Evaluate statuses as of this date instead of today (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let session = Session {
            root: self.root,
            today: self.today.unwrap_or_else(compliance::domain::today),
        };
        tracing::debug!(today = %session.today, "resolved reference date");

        self.command
            .unwrap_or_else(|| Command::Status(status::Command::default()))
            .run(&session)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show the compliance dashboard (default)
    Status(status::Command),

    /// Initialize a new compliance workspace
    Init(init::Command),

    /// List requirements with filters and sorting
    List(list::Command),

    /// Show detailed information about a requirement
    Show(show::Command),

    /// Show a month of deadlines
    Calendar(calendar::Command),

    /// Mark a requirement completed
    Complete(complete::Complete),

    /// Clear the completion date of a requirement
    Reopen(complete::Reopen),

    /// Complete an open requirement, or reopen a completed one
    Toggle(complete::Toggle),

    /// Export requirements to CSV
    Export(export::Command),

    /// Replace every requirement with a seed dataset
    Reset(reset::Command),

    /// Manage permit types
    Permit(permit::Command),
}

impl Command {
    fn run(self, session: &Session) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(session),
            Self::Init(command) => command.run(session),
            Self::List(command) => command.run(session),
            Self::Show(command) => command.run(session),
            Self::Calendar(command) => command.run(session),
            Self::Complete(command) => command.run(session),
            Self::Reopen(command) => command.run(session),
            Self::Toggle(command) => command.run(session),
            Self::Export(command) => command.run(session),
            Self::Reset(command) => command.run(session),
            Self::Permit(command) => command.run(session),
        }
    }
}

/// The workspace and reference date every command runs against.
#[derive(Debug)]
pub struct Session {
    root: PathBuf,
    today: NaiveDate,
}

impl Session {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_PATH)
    }

    /// Loads the configuration, falling back to defaults when the workspace
    /// has none.
    pub fn config(&self) -> anyhow::Result<Config> {
        let path = self.config_path();
        if path.exists() {
            Config::load(&path).map_err(|e| anyhow::anyhow!("{e}"))
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    /// Loads the configuration of an initialized workspace.
    pub fn require_config(&self) -> anyhow::Result<Config> {
        let path = self.config_path();
        if !path.exists() {
            anyhow::bail!(
                "Workspace not initialized. Run 'permit init' first or pass --root to point at \
                 a compliance workspace"
            );
        }
        Config::load(&path).map_err(|e| anyhow::anyhow!("{e}"))
    }

    pub fn data_path(&self, config: &Config) -> PathBuf {
        self.root.join(config.data_file())
    }

    #[instrument(level = "debug", skip_all)]
    pub fn open_store(
        &self,
        config: &Config,
    ) -> anyhow::Result<RequirementStore<JsonFileRepository>> {
        let path = self.data_path(config);
        RequirementStore::open(JsonFileRepository::new(path.clone()))
            .with_context(|| format!("failed to open requirements at {}", path.display()))
    }
}

/// Reads a seed dataset and checks its ids are unique.
pub fn load_seed(path: &Path) -> anyhow::Result<Vec<Requirement>> {
    if !path.is_file() {
        anyhow::bail!("Seed file '{}' not found", path.display());
    }
    let requirements = JsonFileRepository::new(path.to_path_buf())
        .load()
        .with_context(|| format!("failed to read seed file {}", path.display()))?;

    let checked = RequirementStore::open(MemoryRepository::new(requirements))
        .with_context(|| format!("invalid seed file {}", path.display()))?;
    Ok(checked.requirements().to_vec())
}

/// Resolves a requirement id typed on the command line.
///
/// An exact match wins. Otherwise the input may be an unambiguous prefix.
pub fn resolve_id<R: Repository>(
    store: &RequirementStore<R>,
    input: &str,
) -> anyhow::Result<RequirementId> {
    let input = input.trim();
    if let Some(requirement) = store.requirements().iter().find(|r| r.id.as_str() == input) {
        return Ok(requirement.id.clone());
    }

    let mut candidates = store
        .requirements()
        .iter()
        .filter(|r| !input.is_empty() && r.id.starts_with(input));
    match (candidates.next(), candidates.next()) {
        (Some(requirement), None) => Ok(requirement.id.clone()),
        (Some(_), Some(_)) => anyhow::bail!("Requirement id '{input}' is ambiguous"),
        (None, _) => anyhow::bail!("Requirement '{input}' not found"),
    }
}

/// Asks for a y/N confirmation on stdin.
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("\n{prompt} (y/N) ");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

/// Truncates `text` to at most `max` characters, marking the cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
