use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::CategoryId;

/// A posting against a single category, in that category's currency.
///
/// Positive amounts are money spent (expense categories) or earned (income
/// categories); refunds are negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub category_id: CategoryId,
    pub date: NaiveDate,
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl Transaction {
    pub fn new(category_id: &CategoryId, date: NaiveDate, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id: category_id.clone(),
            date,
            amount,
            memo: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}
