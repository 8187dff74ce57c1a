use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::CurrencyCode;

/// Opaque, stable identifier of a category (the UUID string of its account).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The synthetic "Income-Expenses" aggregate.
    pub fn overall() -> Self {
        Self::reserved(1)
    }

    /// The synthetic "Income" aggregate.
    pub fn income() -> Self {
        Self::reserved(2)
    }

    /// The synthetic "Expenses" aggregate.
    pub fn expense() -> Self {
        Self::reserved(3)
    }

    fn reserved(n: u128) -> Self {
        Self(Uuid::from_u128(n).hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    /// Net of all income and expenses.
    RootAggregate,
    Income,
    Expense,
    /// Wraps a real income or expense account.
    Normal,
}

/// Which side of the books a node's amounts come from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CashFlow {
    Inflow,
    Outflow,
    Net,
}

/// One category with its accumulated budget and actual totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    id: CategoryId,
    short_name: String,
    full_name: String,
    kind: CategoryKind,
    flow: CashFlow,
    indent_level: u32,
    currency: CurrencyCode,
    budget_total: i64,
    actual_total: i64,
    children: Vec<CategoryId>,
}

impl CategoryNode {
    pub(crate) fn new(
        id: CategoryId,
        short_name: String,
        full_name: String,
        kind: CategoryKind,
        flow: CashFlow,
        indent_level: u32,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            id,
            short_name,
            full_name,
            kind,
            flow,
            indent_level,
            currency,
            budget_total: 0,
            actual_total: 0,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &CategoryId {
        &self.id
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn display_name(&self, use_full_names: bool) -> &str {
        if use_full_names {
            &self.full_name
        } else {
            &self.short_name
        }
    }

    pub fn kind(&self) -> CategoryKind {
        self.kind
    }

    pub fn flow(&self) -> CashFlow {
        self.flow
    }

    pub fn indent_level(&self) -> u32 {
        self.indent_level
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn budget_total(&self) -> i64 {
        self.budget_total
    }

    pub fn actual_total(&self) -> i64 {
        self.actual_total
    }

    pub fn children(&self) -> &[CategoryId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn add_budget(&mut self, amount: i64) {
        self.budget_total += amount;
    }

    pub fn add_actual(&mut self, amount: i64) {
        self.actual_total += amount;
    }

    /// Signs an amount flowing in from a descendant on `from` side.
    /// Only the net aggregate subtracts expenses.
    pub fn signed_contribution(&self, from: CashFlow, amount: i64) -> i64 {
        match (self.kind, from) {
            (CategoryKind::RootAggregate, CashFlow::Outflow) => -amount,
            _ => amount,
        }
    }

    pub(crate) fn push_child(&mut self, child: CategoryId) {
        self.children.push(child);
    }
}
