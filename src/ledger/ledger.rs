use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::CategoryId;
use crate::config::PreferenceStore;
use crate::currency::{CurrencyCode, CurrencyConverter, RateTable};
use crate::period::DateWindow;

use super::{
    account::Account,
    budget::{Budget, BudgetList},
    sources::{AccountSource, TransactionTotals},
    transaction::Transaction,
};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// In-memory account book. Owns everything the bars read during a refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub rates: RateTable,
    #[serde(default)]
    preferences: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
    #[serde(skip)]
    index: HashMap<CategoryId, usize>,
}

impl Ledger {
    pub fn new(name: impl Into<String>, base_currency: CurrencyCode) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            accounts: Vec::new(),
            budgets: Vec::new(),
            transactions: Vec::new(),
            rates: RateTable::new(base_currency),
            preferences: BTreeMap::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
            index: HashMap::new(),
        }
    }

    /// Adds an account, keeping the account list in depth-first pre-order:
    /// a sub-account lands after the last existing descendant of its parent.
    pub fn add_account(&mut self, account: Account) -> CategoryId {
        let id = account.id.clone();
        let position = match account
            .parent_id
            .as_ref()
            .and_then(|parent| self.index.get(parent).copied())
        {
            Some(parent_pos) => {
                let parent_id = self.accounts[parent_pos].id.clone();
                let mut pos = parent_pos + 1;
                while pos < self.accounts.len() && self.is_descendant_of(&self.accounts[pos], &parent_id)
                {
                    pos += 1;
                }
                pos
            }
            None => self.accounts.len(),
        };
        self.accounts.insert(position, account);
        self.reindex();
        self.touch();
        id
    }

    pub fn add_budget(&mut self, budget: Budget) -> Uuid {
        let id = budget.id;
        self.budgets.push(budget);
        self.touch();
        id
    }

    pub fn budget_mut(&mut self, name: &str) -> Option<&mut Budget> {
        self.budgets.iter_mut().find(|budget| budget.name == name)
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        id
    }

    pub fn account_mut(&mut self, id: &CategoryId) -> Option<&mut Account> {
        let pos = *self.index.get(id)?;
        self.accounts.get_mut(pos)
    }

    pub fn monthly_budgets(&self) -> BudgetList<'_> {
        BudgetList::new(&self.budgets)
    }

    /// Rebuilds the id lookup; required after deserializing.
    pub fn reindex(&mut self) {
        self.index = self
            .accounts
            .iter()
            .enumerate()
            .map(|(pos, account)| (account.id.clone(), pos))
            .collect();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    fn is_descendant_of(&self, account: &Account, ancestor: &CategoryId) -> bool {
        let mut current = account.parent_id.as_ref();
        for _ in 0..self.accounts.len() {
            let Some(parent) = current else {
                return false;
            };
            if parent == ancestor {
                return true;
            }
            current = self.account(parent).and_then(|acct| acct.parent_id.as_ref());
        }
        false
    }
}

impl AccountSource for Ledger {
    fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    fn account(&self, id: &CategoryId) -> Option<&Account> {
        self.index.get(id).and_then(|pos| self.accounts.get(*pos))
    }

    fn base_currency(&self) -> &CurrencyCode {
        self.rates.base()
    }
}

impl TransactionTotals for Ledger {
    fn actual_total(&self, category_id: &CategoryId, window: &DateWindow) -> i64 {
        self.transactions
            .iter()
            .filter(|txn| &txn.category_id == category_id && window.contains(txn.date))
            .map(|txn| txn.amount)
            .sum()
    }
}

impl CurrencyConverter for Ledger {
    fn convert(&self, amount: i64, from: &CurrencyCode, to: &CurrencyCode) -> i64 {
        self.rates.convert(amount, from, to)
    }
}

impl PreferenceStore for Ledger {
    fn preference(&self, key: &str, default: &str) -> String {
        self.preferences
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set_preference(&mut self, key: &str, value: &str) {
        self.preferences.insert(key.to_string(), value.to_string());
        self.touch();
    }
}
