#![doc(test(attr(deny(warnings))))]

//! Budget Bars rolls a book's budget and actual spending up a category tree
//! and reports each selected category as a progress bar with a breakdown.

pub mod aggregation;
pub mod breakdown;
pub mod category;
pub mod config;
pub mod currency;
pub mod dashboard;
pub mod errors;
pub mod ledger;
pub mod period;
pub mod refresh;
pub mod utils;

pub use aggregation::{AggregationEngine, AggregationPolicy};
pub use breakdown::{BarStatus, BarSummary, BreakdownRow};
pub use category::{CategoryId, CategoryTree};
pub use config::{SettingsRecord, SettingsStore};
pub use dashboard::{BarsSnapshot, Dashboard};
pub use errors::BarsError;
pub use period::{PeriodSelection, PeriodSelector};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Bars tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
