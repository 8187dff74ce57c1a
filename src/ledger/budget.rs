use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::CategoryId;

use super::sources::BudgetLookup;

/// A named budget holding planned amounts per category and month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub name: String,
    pub period: BudgetPeriod,
    #[serde(default)]
    pub items: Vec<BudgetItem>,
}

/// The planned amount for one category in one month, in the category's currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetItem {
    pub category_id: CategoryId,
    pub year: i32,
    pub month: u32,
    pub amount: i64,
}

impl Budget {
    pub fn new(name: impl Into<String>, period: BudgetPeriod) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            period,
            items: Vec::new(),
        }
    }

    pub fn monthly(name: impl Into<String>) -> Self {
        Self::new(name, BudgetPeriod::Monthly)
    }

    /// Sets the planned amount for a category/month, replacing any previous value.
    pub fn set_amount(&mut self, category_id: &CategoryId, year: i32, month: u32, amount: i64) {
        match self
            .items
            .iter_mut()
            .find(|item| &item.category_id == category_id && item.year == year && item.month == month)
        {
            Some(item) => item.amount = amount,
            None => self.items.push(BudgetItem {
                category_id: category_id.clone(),
                year,
                month,
                amount,
            }),
        }
    }

    /// Convenience for fixtures: the same amount for every month of a year.
    pub fn set_monthly_amount(&mut self, category_id: &CategoryId, year: i32, amount: i64) {
        for month in 1..=12 {
            self.set_amount(category_id, year, month, amount);
        }
    }

    pub fn is_monthly(&self) -> bool {
        self.period == BudgetPeriod::Monthly
    }
}

impl BudgetLookup for Budget {
    fn amount_budgeted(&self, category_id: &CategoryId, year: i32, month: u32) -> Option<i64> {
        self.items
            .iter()
            .find(|item| &item.category_id == category_id && item.year == year && item.month == month)
            .map(|item| item.amount)
    }
}

/// Enumeration of budgeting periods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetPeriod {
    Monthly,
    Quarterly,
    Yearly,
}

/// The monthly budgets of a book; only monthly budgets can drive the bars.
#[derive(Debug, Clone)]
pub struct BudgetList<'a> {
    budgets: Vec<&'a Budget>,
}

impl<'a> BudgetList<'a> {
    pub fn new(all: &'a [Budget]) -> Self {
        Self {
            budgets: all.iter().filter(|budget| budget.is_monthly()).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&'a Budget> {
        self.budgets.iter().copied().find(|budget| budget.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.budgets.iter().map(|budget| budget.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.budgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.budgets.is_empty()
    }
}
