use serde::{Deserialize, Serialize};

use crate::aggregation::AggregationPolicy;
use crate::breakdown::DisplayPolicy;
use crate::errors::{BarsError, SettingsError};
use crate::period::PeriodSelector;

pub const CURRENT_VERSION: u32 = 3;
pub const DEFAULT_BUDGET_NAME: &str = "Budget";
pub const DEFAULT_WARNING_LEVEL: f32 = 100.0;
pub const DEFAULT_OVER_BUDGET_LEVEL: f32 = 105.0;

/// Range of the warning level and the widest gap allowed above it for the
/// over-budget level, in percent.
pub const WARNING_LEVEL_RANGE: (f32, f32) = (50.0, 150.0);
pub const MAX_OVER_BUDGET_GAP: f32 = 50.0;

/// Field count of each stored layout version.
const FIELD_COUNTS: [(u32, usize); 3] = [(1, 7), (2, 8), (3, 9)];

/// The widget's flat configuration record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsRecord {
    pub version: u32,
    pub budget_name: String,
    pub use_full_names: bool,
    pub warning_level: f32,
    pub over_budget_level: f32,
    pub period: PeriodSelector,
    pub all_ancestors: bool,
    pub use_category_currency: bool,
    pub ignore_unbudgeted: bool,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            budget_name: DEFAULT_BUDGET_NAME.into(),
            use_full_names: false,
            warning_level: DEFAULT_WARNING_LEVEL,
            over_budget_level: DEFAULT_OVER_BUDGET_LEVEL,
            period: PeriodSelector::Automatic,
            all_ancestors: false,
            use_category_currency: false,
            ignore_unbudgeted: false,
        }
    }
}

impl SettingsRecord {
    /// Decodes any known layout and upgrades it to the current version.
    pub fn decode(raw: &str) -> Result<Self, SettingsError> {
        let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
        let tag = fields.first().copied().unwrap_or_default();
        let version: u32 = tag
            .parse()
            .map_err(|_| SettingsError::UnknownVersion(tag.to_string()))?;
        let expected = FIELD_COUNTS
            .iter()
            .find(|(known, _)| *known == version)
            .map(|(_, count)| *count)
            .ok_or_else(|| SettingsError::UnknownVersion(tag.to_string()))?;
        if fields.len() != expected {
            return Err(SettingsError::Arity {
                version,
                expected,
                found: fields.len(),
            });
        }

        let defaults = Self::default();
        Ok(Self {
            version: CURRENT_VERSION,
            budget_name: fields[1].to_string(),
            use_full_names: parse_flag(fields[2]),
            warning_level: parse_number("warningLevel", fields[3])?,
            over_budget_level: parse_number("overBudgetLevel", fields[4])?,
            period: PeriodSelector::from_index(parse_number("period", fields[5])?),
            all_ancestors: parse_flag(fields[6]),
            use_category_currency: fields
                .get(7)
                .map_or(defaults.use_category_currency, |raw| parse_flag(raw)),
            ignore_unbudgeted: fields
                .get(8)
                .map_or(defaults.ignore_unbudgeted, |raw| parse_flag(raw)),
        })
    }

    /// Decodes a stored value, falling back to defaults when it is missing or corrupt.
    pub fn from_preference(raw: &str) -> Self {
        if raw.trim().is_empty() {
            tracing::debug!("no stored settings, using defaults");
            return Self::default();
        }
        match Self::decode(raw) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, raw, "cannot parse stored settings, using defaults");
                Self::default()
            }
        }
    }

    /// Current layout. Commas in the budget name would split the record, so
    /// they are written as spaces.
    pub fn encode(&self) -> String {
        format!(
            "{},{},{},{:.1},{:.1},{},{},{},{}",
            CURRENT_VERSION,
            self.budget_name.replace(',', " "),
            self.use_full_names,
            self.warning_level,
            self.over_budget_level,
            self.period.index(),
            self.all_ancestors,
            self.use_category_currency,
            self.ignore_unbudgeted,
        )
    }

    /// Sets both thresholds, keeping `warning <= over <= warning + 50`.
    pub fn set_levels(&mut self, warning: f32, over: f32) -> Result<(), BarsError> {
        let (min, max) = WARNING_LEVEL_RANGE;
        if !(min..=max).contains(&warning) {
            return Err(BarsError::InvalidInput(format!(
                "warning level {warning} must be between {min} and {max}"
            )));
        }
        if !(warning..=warning + MAX_OVER_BUDGET_GAP).contains(&over) {
            return Err(BarsError::InvalidInput(format!(
                "over budget level {over} must be between {warning} and {}",
                warning + MAX_OVER_BUDGET_GAP
            )));
        }
        self.warning_level = warning;
        self.over_budget_level = over;
        Ok(())
    }

    pub fn display_policy(&self) -> DisplayPolicy {
        DisplayPolicy {
            use_full_names: self.use_full_names,
            show_all_ancestors: self.all_ancestors,
            warning_level: self.warning_level,
            over_budget_level: self.over_budget_level,
        }
    }

    pub fn aggregation_policy(&self) -> AggregationPolicy {
        AggregationPolicy {
            ignore_unbudgeted: self.ignore_unbudgeted,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

fn parse_number<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, SettingsError> {
    raw.parse().map_err(|_| SettingsError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}
