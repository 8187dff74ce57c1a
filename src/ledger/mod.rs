//! The host book: accounts, budgets, transactions, rates and preferences.

pub mod account;
pub mod budget;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod sources;
pub mod transaction;

pub use account::{Account, AccountKind};
pub use budget::{Budget, BudgetItem, BudgetList, BudgetPeriod};
pub use ledger::Ledger;
pub use sources::{AccountSource, BudgetLookup, TransactionTotals};
pub use transaction::Transaction;
