//! Read-only views of host data consumed by the aggregation engine.

use crate::category::CategoryId;
use crate::currency::CurrencyCode;
use crate::period::DateWindow;

use super::Account;

/// Iterates the book's accounts in traversal (depth-first pre-order) order.
pub trait AccountSource {
    fn accounts(&self) -> &[Account];

    fn account(&self, id: &CategoryId) -> Option<&Account>;

    fn base_currency(&self) -> &CurrencyCode;

    fn currency_of(&self, account: &Account) -> CurrencyCode {
        account
            .currency
            .clone()
            .unwrap_or_else(|| self.base_currency().clone())
    }
}

/// Planned amounts of the selected budget.
pub trait BudgetLookup {
    fn amount_budgeted(&self, category_id: &CategoryId, year: i32, month: u32) -> Option<i64>;
}

/// Totals of transactions posted directly to a category.
pub trait TransactionTotals {
    fn actual_total(&self, category_id: &CategoryId, window: &DateWindow) -> i64;
}
