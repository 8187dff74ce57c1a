//! Builds a fresh [`CategoryTree`] with budget and actual totals for a period.

use crate::category::{CategoryId, CategoryKind, CategoryTree};
use crate::currency::CurrencyConverter;
use crate::ledger::{
    AccountKind, AccountSource, Budget, BudgetLookup, Ledger, TransactionTotals,
};
use crate::period::PeriodSelection;

/// Flags from the settings record that change what gets aggregated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationPolicy {
    /// Skip actuals for categories whose rolled-up budget is zero.
    pub ignore_unbudgeted: bool,
}

/// Reads accounts, budgets and transactions and rolls them into a tree.
pub struct AggregationEngine<'a> {
    accounts: &'a dyn AccountSource,
    budget: &'a dyn BudgetLookup,
    transactions: &'a dyn TransactionTotals,
    converter: &'a dyn CurrencyConverter,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(
        accounts: &'a dyn AccountSource,
        budget: &'a dyn BudgetLookup,
        transactions: &'a dyn TransactionTotals,
        converter: &'a dyn CurrencyConverter,
    ) -> Self {
        Self {
            accounts,
            budget,
            transactions,
            converter,
        }
    }

    /// An engine reading everything from one book and one of its budgets.
    pub fn for_ledger(ledger: &'a Ledger, budget: &'a Budget) -> Self {
        Self::new(ledger, budget, ledger, ledger)
    }

    /// Builds the tree: the net aggregate, then an Income pass, then an Expense pass.
    pub fn build(&self, selection: &PeriodSelection, policy: AggregationPolicy) -> CategoryTree {
        let mut tree = CategoryTree::new(self.accounts.base_currency().clone());
        tree.add_synthetic(
            CategoryId::overall(),
            "Income-Expenses",
            CategoryKind::RootAggregate,
            0,
        );

        let passes = [
            (AccountKind::Income, CategoryId::income(), "Income", CategoryKind::Income),
            (AccountKind::Expense, CategoryId::expense(), "Expenses", CategoryKind::Expense),
        ];
        for (pass, id, label, kind) in passes {
            tree.add_synthetic(id, label, kind, 1);
            self.run_pass(&mut tree, pass, selection, policy);
        }

        tracing::debug!(
            categories = tree.len(),
            year = selection.year,
            start_month = selection.start_month,
            months = selection.month_count,
            "category tree built"
        );
        tree
    }

    /// Admits the pass's accounts first so budgets are complete before the
    /// ignore-unbudgeted rule looks at them.
    fn run_pass(
        &self,
        tree: &mut CategoryTree,
        pass: AccountKind,
        selection: &PeriodSelection,
        policy: AggregationPolicy,
    ) {
        let admitted: Vec<CategoryId> = self
            .accounts
            .accounts()
            .iter()
            .filter_map(|account| tree.add_from_account(account, pass, self.accounts))
            .collect();

        for id in &admitted {
            let is_leaf = tree.lookup(id).is_some_and(|node| !node.has_children());
            if !is_leaf {
                continue;
            }
            let budgeted: i64 = selection
                .months()
                .filter_map(|month| self.budget.amount_budgeted(id, selection.year, month))
                .sum();
            tree.add_budget(id, budgeted, self.converter);
        }

        let window = selection.window();
        for id in &admitted {
            let budget_total = tree.lookup(id).map_or(0, |node| node.budget_total());
            if budget_total == 0 && policy.ignore_unbudgeted {
                tracing::trace!(category = %id, "unbudgeted category skipped");
                continue;
            }
            let actual = self.transactions.actual_total(id, &window);
            tree.add_actual(id, actual, self.converter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyCode;
    use crate::ledger::{Account, Transaction};
    use chrono::NaiveDate;

    fn march() -> PeriodSelection {
        PeriodSelection {
            start_month: 3,
            year: 2024,
            month_count: 1,
        }
    }

    #[test]
    fn only_leaves_receive_budgets() {
        let mut ledger = Ledger::new("Engine", CurrencyCode::new("USD"));
        let food = ledger.add_account(Account::new("Food", AccountKind::Expense));
        let dining =
            ledger.add_account(Account::new("Dining", AccountKind::Expense).with_parent(&food));
        let mut budget = Budget::monthly("Budget");
        budget.set_amount(&food, 2024, 3, 99_999);
        budget.set_amount(&dining, 2024, 3, 20_000);

        let tree = AggregationEngine::for_ledger(&ledger, &budget)
            .build(&march(), AggregationPolicy::default());

        assert_eq!(tree.lookup(&dining).unwrap().budget_total(), 20_000);
        assert_eq!(tree.lookup(&food).unwrap().budget_total(), 20_000);
        assert_eq!(tree.lookup(&CategoryId::expense()).unwrap().budget_total(), 20_000);
    }

    #[test]
    fn ignore_unbudgeted_skips_actuals() {
        let mut ledger = Ledger::new("Engine", CurrencyCode::new("USD"));
        let hobby = ledger.add_account(Account::new("Hobby", AccountKind::Expense));
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        ledger.add_transaction(Transaction::new(&hobby, date, 4_000));
        let budget = Budget::monthly("Budget");

        let counted = AggregationEngine::for_ledger(&ledger, &budget)
            .build(&march(), AggregationPolicy::default());
        let skipped = AggregationEngine::for_ledger(&ledger, &budget).build(
            &march(),
            AggregationPolicy {
                ignore_unbudgeted: true,
            },
        );

        assert_eq!(counted.lookup(&hobby).unwrap().actual_total(), 4_000);
        assert_eq!(skipped.lookup(&hobby).unwrap().actual_total(), 0);
        assert_eq!(skipped.lookup(&CategoryId::expense()).unwrap().actual_total(), 0);
    }
}
