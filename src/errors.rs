use thiserror::Error;

/// Error type that captures failures surfaced by the budget bars core.
#[derive(Debug, Error)]
pub enum BarsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid reference: {0}")]
    InvalidRef(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("no monthly budgets exist; create a monthly budget first")]
    NoMonthlyBudgets,
    #[error("budget `{requested}` does not exist (available: {})", available.join(", "))]
    BudgetNotFound {
        requested: String,
        available: Vec<String>,
    },
}

/// Reasons a stored settings record could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("expected {expected} fields for version {version}, found {found}")]
    Arity {
        version: u32,
        expected: usize,
        found: usize,
    },
    #[error("unknown settings version `{0}`")]
    UnknownVersion(String),
    #[error("field `{field}` is not a valid number: `{value}`")]
    InvalidNumber { field: &'static str, value: String },
}
