use std::{fmt, ops::Deref, str::FromStr};

use chrono::NaiveDate;
use non_empty_string::NonEmptyString;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// The date format used for every stored date (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an ISO calendar date (`YYYY-MM-DD`).
///
/// Returns `None` when the string is not a valid date.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// The opaque, unique identifier of a requirement.
///
/// Identifiers are assigned when a record is created and never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequirementId(NonEmptyString);

impl RequirementId {
    /// Creates an identifier from a string.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyIdError`] if the string is empty.
    pub fn new(s: String) -> Result<Self, EmptyIdError> {
        NonEmptyString::new(s).map(Self).map_err(|_| EmptyIdError)
    }

    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string()).expect("a UUID is never empty")
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RequirementId {
    type Error = EmptyIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RequirementId {
    type Error = EmptyIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for RequirementId {
    type Err = EmptyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl From<RequirementId> for String {
    fn from(id: RequirementId) -> Self {
        id.0.as_str().to_string()
    }
}

impl Deref for RequirementId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when an identifier is empty.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("requirement id must not be empty")]
pub struct EmptyIdError;

/// A calendar date as stored on a requirement.
///
/// The raw string is kept verbatim so that malformed legacy values survive a
/// load/save cycle. A value that does not parse as `YYYY-MM-DD` behaves as
/// "no date" in every comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct IsoDate {
    raw: String,
    parsed: Option<NaiveDate>,
}

impl IsoDate {
    /// Wraps a raw date string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_date(&raw);
        if parsed.is_none() {
            tracing::trace!(date = %raw, "unparsable date treated as absent");
        }
        Self { raw, parsed }
    }

    /// The stored string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed date, if the stored string is a valid calendar date.
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        self.parsed
    }
}

impl From<NaiveDate> for IsoDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            raw: date.format(DATE_FORMAT).to_string(),
            parsed: Some(date),
        }
    }
}

impl From<String> for IsoDate {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for IsoDate {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<IsoDate> for String {
    fn from(date: IsoDate) -> Self {
        date.raw
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Deserializes an optional date, mapping `null` and blank strings to `None`.
fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<IsoDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .filter(|raw| !raw.trim().is_empty())
        .map(IsoDate::new))
}

/// Lowercases a label and folds `-`/`_` into spaces so that `storage-tank`,
/// `Storage_Tank` and `Storage Tank` compare equal.
fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// Error returned when a string is not a known label for a closed enumeration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

impl ParseLabelError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in canonical order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The display label, as used in stored data.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ParseLabelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize_label(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| normalize_label(candidate.label()) == wanted)
                    .ok_or_else(|| ParseLabelError::new($kind, s))
            }
        }
    };
}

labelled_enum! {
    /// The category of action a requirement calls for.
    ActionType, "action type" {
        /// Actions triggered by an operational event.
        EventActions => "Event Actions",
        /// Physical or visual inspections.
        Inspections => "Inspections",
        /// Sampling campaigns.
        Samples => "Samples",
        /// Performance or emissions tests.
        Tests => "Tests",
        /// Periodic throughput reporting.
        ThroughputReports => "Throughput Reports",
    }
}

labelled_enum! {
    /// The class of equipment a requirement applies to.
    EquipmentType, "equipment type" {
        /// Compressors.
        Compressor => "Compressor",
        /// Storage tanks.
        StorageTank => "Storage Tank",
        /// Flares.
        Flare => "Flare",
        /// Glycol dehydrators.
        Dehydrator => "Dehydrator",
        /// Heaters and boilers.
        Heater => "Heater",
        /// Thermal oxidizers.
        ThermalOxidizer => "Thermal Oxidizer",
        /// Amine units.
        AmineUnit => "Amine Unit",
        /// Engines.
        Engine => "Engine",
        /// Generators.
        Generator => "Generator",
        /// Facility-wide obligations not tied to one unit.
        General => "General",
    }
}

/// How often a requirement recurs.
///
/// The canonical patterns are closed variants. Labels outside that set are
/// kept as [`Recurrence::Other`] so that free-form legacy data still loads.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Recurrence {
    /// Once per triggering event.
    PerEvent,
    /// A one-off initial action.
    Initial,
    /// Ongoing at all times.
    Continual,
    /// Every month.
    Monthly,
    /// Every quarter.
    Quarterly,
    /// Twice a year.
    SemiAnnual,
    /// Once a year.
    Annual,
    /// An initial action, then annually.
    InitialAnnual,
    /// An initial action, then quarterly.
    InitialQuarterly,
    /// An initial action, then every two years.
    InitialBiannual,
    /// Any other free-form pattern.
    Other(String),
}

impl Recurrence {
    /// The canonical patterns, in canonical order.
    pub const CANONICAL: &'static [Self] = &[
        Self::PerEvent,
        Self::Initial,
        Self::Continual,
        Self::Monthly,
        Self::Quarterly,
        Self::SemiAnnual,
        Self::Annual,
        Self::InitialAnnual,
        Self::InitialQuarterly,
        Self::InitialBiannual,
    ];

    /// The display label, as used in stored data.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::PerEvent => "Per Event",
            Self::Initial => "Initial",
            Self::Continual => "Continual",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::SemiAnnual => "Semi-Annual",
            Self::Annual => "Annual",
            Self::InitialAnnual => "Initial / Annual",
            Self::InitialQuarterly => "Initial / Quarterly",
            Self::InitialBiannual => "Initial / Biannual (Every 2 Years)",
            Self::Other(label) => label,
        }
    }

    /// Whether this is one of the canonical patterns.
    #[must_use]
    pub const fn is_canonical(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for Recurrence {
    fn from(s: &str) -> Self {
        let wanted = normalize_label(s);
        Self::CANONICAL
            .iter()
            .find(|candidate| normalize_label(candidate.label()) == wanted)
            .cloned()
            .unwrap_or_else(|| Self::Other(s.to_string()))
    }
}

impl From<String> for Recurrence {
    fn from(s: String) -> Self {
        match Self::from(s.as_str()) {
            Self::Other(_) => Self::Other(s),
            canonical => canonical,
        }
    }
}

impl From<Recurrence> for String {
    fn from(recurrence: Recurrence) -> Self {
        match recurrence {
            Recurrence::Other(label) => label,
            canonical => canonical.label().to_string(),
        }
    }
}

impl FromStr for Recurrence {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One trackable compliance obligation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    /// Unique, stable identifier.
    pub id: RequirementId,
    /// The category of action.
    pub type_of_action: ActionType,
    /// How often the action recurs.
    pub recurrence: Recurrence,
    /// Free-text description of the required activity.
    pub action: String,
    /// The regulatory clauses this requirement satisfies.
    pub requirements_covered: String,
    /// The due date, if any.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub needed_by: Option<IsoDate>,
    /// The date the requirement was marked complete, if it has been.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub completed_date: Option<IsoDate>,
    /// Filename of a supporting document.
    #[serde(default)]
    pub file_uploaded: Option<String>,
    /// The class of equipment concerned.
    pub equipment_type: EquipmentType,
}

impl Requirement {
    /// Construct a new, incomplete [`Requirement`] with no due date.
    ///
    /// A new identifier is generated automatically.
    #[must_use]
    pub fn new(
        type_of_action: ActionType,
        recurrence: Recurrence,
        action: String,
        equipment_type: EquipmentType,
    ) -> Self {
        Self {
            id: RequirementId::generate(),
            type_of_action,
            recurrence,
            action,
            requirements_covered: String::new(),
            needed_by: None,
            completed_date: None,
            file_uploaded: None,
            equipment_type,
        }
    }

    /// The due date, if present and valid.
    #[must_use]
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.needed_by.as_ref().and_then(IsoDate::date)
    }

    /// The completion date, if present and valid.
    #[must_use]
    pub fn completion_date(&self) -> Option<NaiveDate> {
        self.completed_date.as_ref().and_then(IsoDate::date)
    }

    /// Whether a completion date has been recorded.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_date.is_some()
    }

    /// Whether the requirement was completed after its due date.
    ///
    /// Lateness is reported alongside, not instead of, the completed status.
    #[must_use]
    pub fn is_completed_late(&self) -> bool {
        matches!(
            (self.completion_date(), self.due_date()),
            (Some(completed), Some(due)) if completed > due
        )
    }

    /// Whether the requirement was completed on or before its due date.
    #[must_use]
    pub fn is_completed_on_time(&self) -> bool {
        matches!(
            (self.completion_date(), self.due_date()),
            (Some(completed), Some(due)) if completed <= due
        )
    }

    /// Marks the requirement complete on `today` if it is open, or reopens it
    /// if it is already complete.
    pub fn toggle_completed(&mut self, today: NaiveDate) {
        if self.completed_date.is_some() {
            self.mark_incomplete();
        } else {
            self.mark_completed(today);
        }
    }

    /// Records a completion date, replacing any existing one.
    pub fn mark_completed(&mut self, date: NaiveDate) {
        self.completed_date = Some(date.into());
    }

    /// Clears the completion date.
    pub fn mark_incomplete(&mut self) {
        self.completed_date = None;
    }

    /// The text the free-text search runs against.
    #[must_use]
    pub fn search_haystack(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.action,
            self.requirements_covered,
            self.type_of_action,
            self.equipment_type,
            self.recurrence
        )
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test_case("Storage Tank", EquipmentType::StorageTank; "label")]
    #[test_case("storage-tank", EquipmentType::StorageTank; "kebab case")]
    #[test_case("THERMAL_OXIDIZER", EquipmentType::ThermalOxidizer; "screaming snake case")]
    #[test_case("  general ", EquipmentType::General; "padded")]
    fn equipment_type_parses_loosely(input: &str, expected: EquipmentType) {
        assert_eq!(input.parse::<EquipmentType>().unwrap(), expected);
    }

    #[test]
    fn unknown_action_type_is_an_error() {
        let error = "Audits".parse::<ActionType>().unwrap_err();
        assert_eq!(error.to_string(), "unknown action type 'Audits'");
    }

    #[test_case("Semi-Annual", Recurrence::SemiAnnual; "hyphenated label")]
    #[test_case("initial / biannual (every 2 years)", Recurrence::InitialBiannual; "compound lowercase")]
    #[test_case("Every 5 Years", Recurrence::Other("Every 5 Years".to_string()); "free form")]
    fn recurrence_falls_back_to_other(input: &str, expected: Recurrence) {
        assert_eq!(Recurrence::from(input), expected);
    }

    #[test]
    fn canonical_recurrence_never_parses_as_other() {
        for recurrence in Recurrence::CANONICAL {
            assert_eq!(&Recurrence::from(recurrence.label()), recurrence);
        }
    }

    #[test]
    fn deserializes_camel_case_wire_shape() {
        let json = r#"{
            "id": "req-1",
            "typeOfAction": "Inspections",
            "recurrence": "Quarterly",
            "action": "Inspect flare FL-1",
            "requirementsCovered": "40 CFR 60.18",
            "neededBy": "2026-03-31",
            "completedDate": null,
            "fileUploaded": null,
            "equipmentType": "Flare"
        }"#;

        let requirement: Requirement = serde_json::from_str(json).unwrap();

        assert_eq!(requirement.id.as_str(), "req-1");
        assert_eq!(requirement.type_of_action, ActionType::Inspections);
        assert_eq!(requirement.recurrence, Recurrence::Quarterly);
        assert_eq!(requirement.due_date(), Some(date("2026-03-31")));
        assert!(requirement.completed_date.is_none());
        assert_eq!(requirement.equipment_type, EquipmentType::Flare);
    }

    #[test]
    fn blank_dates_deserialize_as_absent() {
        let json = r#"{
            "id": "req-2",
            "typeOfAction": "Samples",
            "recurrence": "Monthly",
            "action": "",
            "requirementsCovered": "",
            "neededBy": "",
            "completedDate": "  ",
            "equipmentType": "General"
        }"#;

        let requirement: Requirement = serde_json::from_str(json).unwrap();

        assert!(requirement.needed_by.is_none());
        assert!(requirement.completed_date.is_none());
    }

    #[test]
    fn malformed_dates_are_preserved_but_invalid() {
        let json = r#"{
            "id": "req-3",
            "typeOfAction": "Tests",
            "recurrence": "Annual",
            "action": "Stack test",
            "requirementsCovered": "",
            "neededBy": "sometime in March",
            "completedDate": null,
            "equipmentType": "Engine"
        }"#;

        let requirement: Requirement = serde_json::from_str(json).unwrap();
        assert_eq!(
            requirement.needed_by.as_ref().map(IsoDate::as_str),
            Some("sometime in March")
        );
        assert_eq!(requirement.due_date(), None);

        let out = serde_json::to_value(&requirement).unwrap();
        assert_eq!(out["neededBy"], "sometime in March");
    }

    #[test]
    fn empty_id_is_rejected() {
        assert_eq!(RequirementId::new(String::new()), Err(EmptyIdError));
    }

    #[test]
    fn toggle_completed_sets_then_clears() {
        let mut requirement = Requirement::new(
            ActionType::Inspections,
            Recurrence::Annual,
            "Inspect".to_string(),
            EquipmentType::Compressor,
        );
        let today = date("2026-02-01");

        requirement.toggle_completed(today);
        assert_eq!(requirement.completion_date(), Some(today));
        assert_eq!(
            requirement.completed_date.as_ref().map(IsoDate::as_str),
            Some("2026-02-01")
        );

        requirement.toggle_completed(today);
        assert!(requirement.completed_date.is_none());
    }

    #[test]
    fn lateness_is_reported_separately() {
        let mut requirement = Requirement::new(
            ActionType::Tests,
            Recurrence::Annual,
            "Test".to_string(),
            EquipmentType::Engine,
        );
        requirement.needed_by = Some(date("2026-01-10").into());

        requirement.mark_completed(date("2026-01-10"));
        assert!(requirement.is_completed_on_time());
        assert!(!requirement.is_completed_late());

        requirement.mark_completed(date("2026-01-11"));
        assert!(!requirement.is_completed_on_time());
        assert!(requirement.is_completed_late());
    }

    #[test]
    fn haystack_joins_searchable_fields() {
        let mut requirement = Requirement::new(
            ActionType::Inspections,
            Recurrence::Annual,
            "Inspect compressor C-1".to_string(),
            EquipmentType::Compressor,
        );
        requirement.requirements_covered = "40 CFR 60".to_string();

        assert_eq!(
            requirement.search_haystack(),
            "Inspect compressor C-1 40 CFR 60 Inspections Compressor Annual"
        );
    }
}
