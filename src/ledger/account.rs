use serde::{Deserialize, Serialize};

use crate::category::CategoryId;
use crate::currency::CurrencyCode;

/// A ledger account. Income and expense accounts double as budget categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: CategoryId,
    pub name: String,
    pub kind: AccountKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    /// `None` means the book's base currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    #[serde(default)]
    pub inactive: bool,
    /// Hidden from the home page and every widget on it.
    #[serde(default)]
    pub hidden: bool,
}

impl Account {
    /// Creates a new active, top-level account in the base currency.
    pub fn new(name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            id: CategoryId::generate(),
            name: name.into(),
            kind,
            parent_id: None,
            currency: None,
            inactive: false,
            hidden: false,
        }
    }

    pub fn with_parent(mut self, parent: &CategoryId) -> Self {
        self.parent_id = Some(parent.clone());
        self
    }

    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = Some(currency);
        self
    }
}

/// Supported account types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Income,
    Expense,
    Bank,
    CreditCard,
    Investment,
    Other,
}
