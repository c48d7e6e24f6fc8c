//! Filter and sort flags shared by `list` and `export`.

use chrono::NaiveDate;
use compliance::{
    domain::{ActionType, EquipmentType, Recurrence, SortDirection},
    FilterState, SortKey, Status,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Open requirements due this month
    DueThisMonth,
    /// Overdue requirements
    Overdue,
    /// Completed requirements
    Completed,
}

#[derive(Debug, Default, clap::Args)]
pub struct FilterArgs {
    /// Start from a preset filter
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Filter by type of action (comma-separated, case-insensitive)
    #[arg(long = "type", value_delimiter = ',', value_name = "TYPE")]
    action_types: Vec<ActionType>,

    /// Filter by recurrence pattern (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "PATTERN")]
    recurrence: Vec<Recurrence>,

    /// Filter by equipment type (comma-separated, case-insensitive)
    #[arg(long, value_delimiter = ',', value_name = "EQUIPMENT")]
    equipment: Vec<EquipmentType>,

    /// Filter by status (completed, pending, overdue; comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "STATUS")]
    status: Vec<Status>,

    /// Case-insensitive substring match against action, citation and labels
    #[arg(long)]
    search: Option<String>,

    /// Earliest due date to include (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    from: Option<NaiveDate>,

    /// Latest due date to include (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    /// Builds the filter state, layering explicit flags over the preset.
    pub fn into_state(self, today: NaiveDate) -> FilterState {
        let mut state = match self.preset {
            None => FilterState::default(),
            Some(Preset::DueThisMonth) => FilterState::due_this_month(today),
            Some(Preset::Overdue) => FilterState::overdue_only(),
            Some(Preset::Completed) => FilterState::completed_only(),
        };

        state.action_types.extend(self.action_types);
        state.recurrence_patterns.extend(self.recurrence);
        state.equipment_types.extend(self.equipment);
        state.statuses.extend(self.status);

        if let Some(query) = self.search {
            state.set_search(query);
        }
        if self.from.is_some() || self.to.is_some() {
            state.set_date_range(
                self.from.or(state.date_range.start),
                self.to.or(state.date_range.end),
            );
        }

        tracing::debug!(?state, "built filter state");
        state
    }
}

#[derive(Debug, Default, clap::Args)]
pub struct SortArgs {
    /// Sort field (defaults to the workspace setting, normally needed-by)
    #[arg(long, value_name = "FIELD")]
    sort: Option<SortKey>,

    /// Sort in descending order
    #[arg(long)]
    desc: bool,
}

impl SortArgs {
    pub fn resolve(&self, default: SortKey) -> (SortKey, SortDirection) {
        let direction = if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        (self.sort.unwrap_or(default), direction)
    }
}
