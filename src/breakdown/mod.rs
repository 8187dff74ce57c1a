//! Turns finished category totals into bar figures and tooltip breakdown rows.
//!
//! Everything here is a pure function of a tree, a node and the display
//! policy; rendering to text happens in [`render`].

pub mod render;

use serde::Serialize;

use crate::category::{CategoryId, CategoryNode, CategoryTree};
use crate::currency::{format_minor_units, CurrencyCode, CurrencyConverter, LocaleConfig};

pub const NOT_AVAILABLE: &str = "N/A";

/// Display flags taken from the settings record for one refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPolicy {
    pub use_full_names: bool,
    pub show_all_ancestors: bool,
    pub warning_level: f32,
    pub over_budget_level: f32,
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self {
            use_full_names: false,
            show_all_ancestors: false,
            warning_level: 100.0,
            over_budget_level: 105.0,
        }
    }
}

/// How far spending is along its budget.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BarStatus {
    Under,
    Warning,
    Over,
}

/// Both thresholds are inclusive on the lower classification.
///
/// Levels are compared exactly at tenths of a percent.
pub fn classify(actual: i64, budget: i64, warning_pct: f32, over_pct: f32) -> BarStatus {
    let scaled_actual = actual as i128 * 1000;
    let budget = budget as i128;
    if scaled_actual <= tenths_of_percent(warning_pct) * budget {
        BarStatus::Under
    } else if scaled_actual <= tenths_of_percent(over_pct) * budget {
        BarStatus::Warning
    } else {
        BarStatus::Over
    }
}

fn tenths_of_percent(level: f32) -> i128 {
    (level as f64 * 10.0).round() as i128
}

/// Progress in whole percent, 0 to 100.
pub fn progress(actual: i64, budget: i64) -> u8 {
    if budget == 0 {
        return if actual > 0 { 100 } else { 0 };
    }
    let ratio = (100.0 * actual as f64 / budget as f64).round();
    ratio.clamp(0.0, 100.0) as u8
}

/// Percentage of budget spent, or `None` when there is no budget.
pub fn percent_of_budget(actual: i64, budget: i64) -> Option<f64> {
    if budget == 0 {
        None
    } else {
        Some(100.0 * actual as f64 / budget as f64)
    }
}

pub fn percent_text(actual: i64, budget: i64) -> String {
    match percent_of_budget(actual, budget) {
        Some(pct) => format!("{pct:.2}%"),
        None => NOT_AVAILABLE.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum RowKind {
    /// A category with its own budget and rolled-up spending.
    Category,
    /// Spending posted straight to a parent rather than to any child.
    Contribution,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RowFigures {
    pub spent: i64,
    pub budget: i64,
    pub remaining: i64,
}

/// One tooltip line. `figures` is `None` for a label-only heading.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BreakdownRow {
    pub category_id: CategoryId,
    pub label: String,
    pub indent: u32,
    pub kind: RowKind,
    pub currency: CurrencyCode,
    pub figures: Option<RowFigures>,
}

impl BreakdownRow {
    pub fn percent_text(&self) -> String {
        match &self.figures {
            Some(figures) => percent_text(figures.spent, figures.budget),
            None => String::new(),
        }
    }
}

/// Rows for the bar rooted at `root_id`, parents above their children.
pub fn breakdown(
    tree: &CategoryTree,
    root_id: &CategoryId,
    show_all_ancestors: bool,
    converter: &dyn CurrencyConverter,
) -> Vec<BreakdownRow> {
    let Some(root) = tree.lookup(root_id) else {
        return Vec::new();
    };
    let walk = Walk {
        tree,
        converter,
        root_indent: root.indent_level(),
        show_all_ancestors,
    };
    walk.process(root, true)
}

struct Walk<'a> {
    tree: &'a CategoryTree,
    converter: &'a dyn CurrencyConverter,
    root_indent: u32,
    show_all_ancestors: bool,
}

impl Walk<'_> {
    fn process(&self, item: &CategoryNode, is_root: bool) -> Vec<BreakdownRow> {
        if !item.has_children() {
            return Vec::new();
        }

        let mut rows = Vec::new();
        let mut child_spent = 0i64;
        for child in self.tree.children_of(item.id(), false) {
            let (child_budget, child_actual) = (child.budget_total(), child.actual_total());
            if child_actual == 0 && child_budget == 0 {
                continue;
            }
            child_spent += self.in_currency_of(item, child);

            if child.has_children() {
                rows.extend(self.process(child, false));
            } else if is_root || self.show_all_ancestors {
                rows.push(self.row(child, RowKind::Category, child_budget, child_actual));
            }
        }

        let contribution = item.actual_total() - child_spent;
        let heading = if (is_root && contribution > 0) || (!is_root && self.show_all_ancestors) {
            Some(self.row(item, RowKind::Contribution, 0, contribution))
        } else if item.indent_level() == self.root_indent + 1 {
            Some(self.row(
                item,
                RowKind::Category,
                item.budget_total(),
                item.actual_total(),
            ))
        } else {
            None
        };

        if let Some(heading) = heading {
            rows.insert(0, heading);
        }
        rows
    }

    fn in_currency_of(&self, parent: &CategoryNode, child: &CategoryNode) -> i64 {
        let amount = if child.currency() == parent.currency() {
            child.actual_total()
        } else {
            self.converter
                .convert(child.actual_total(), child.currency(), parent.currency())
        };
        parent.signed_contribution(child.flow(), amount)
    }

    fn row(&self, node: &CategoryNode, kind: RowKind, budget: i64, actual: i64) -> BreakdownRow {
        let figures = (actual > 0 || budget > 0).then(|| RowFigures {
            spent: actual,
            budget,
            remaining: match kind {
                RowKind::Category => budget - actual,
                RowKind::Contribution => 0,
            },
        });
        BreakdownRow {
            category_id: node.id().clone(),
            label: node.short_name().to_string(),
            indent: node
                .indent_level()
                .saturating_sub(self.root_indent + 1),
            kind,
            currency: node.currency().clone(),
            figures,
        }
    }
}

/// Figures and breakdown for one bar.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarSummary {
    pub category_id: CategoryId,
    pub label: String,
    pub short_name: String,
    pub currency: CurrencyCode,
    pub spent: i64,
    pub budget: i64,
    pub remaining: i64,
    pub percent_text: String,
    pub progress: u8,
    pub status: BarStatus,
    pub rows: Vec<BreakdownRow>,
}

impl BarSummary {
    pub fn build(
        tree: &CategoryTree,
        id: &CategoryId,
        policy: &DisplayPolicy,
        converter: &dyn CurrencyConverter,
    ) -> Option<Self> {
        let node = tree.lookup(id)?;
        let (spent, budget) = (node.actual_total(), node.budget_total());
        Some(Self {
            category_id: id.clone(),
            label: node.display_name(policy.use_full_names).to_string(),
            short_name: node.short_name().to_string(),
            currency: node.currency().clone(),
            spent,
            budget,
            remaining: budget - spent,
            percent_text: percent_text(spent, budget),
            progress: progress(spent, budget),
            status: classify(
                spent,
                budget,
                policy.warning_level,
                policy.over_budget_level,
            ),
            rows: breakdown(tree, id, policy.show_all_ancestors, converter),
        })
    }
}

/// Formats amounts either in each category's currency or in the book's base currency.
pub struct AmountFormatter<'a> {
    converter: &'a dyn CurrencyConverter,
    base: CurrencyCode,
    locale: LocaleConfig,
    use_category_currency: bool,
}

impl<'a> AmountFormatter<'a> {
    pub fn new(
        converter: &'a dyn CurrencyConverter,
        base: CurrencyCode,
        locale: LocaleConfig,
        use_category_currency: bool,
    ) -> Self {
        Self {
            converter,
            base,
            locale,
            use_category_currency,
        }
    }

    pub fn format(&self, amount: i64, currency: &CurrencyCode) -> String {
        if self.use_category_currency || currency == &self.base {
            format_minor_units(amount, currency, &self.locale)
        } else {
            let converted = self.converter.convert(amount, currency, &self.base);
            format_minor_units(converted, &self.base, &self.locale)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_boundaries_are_inclusive() {
        assert_eq!(classify(10_000, 10_000, 100.0, 105.0), BarStatus::Under);
        assert_eq!(classify(10_001, 10_000, 100.0, 105.0), BarStatus::Warning);
        assert_eq!(classify(10_500, 10_000, 100.0, 105.0), BarStatus::Warning);
        assert_eq!(classify(10_501, 10_000, 100.0, 105.0), BarStatus::Over);
        assert_eq!(classify(8_000, 10_000, 80.0, 90.0), BarStatus::Under);
    }

    #[test]
    fn fractional_levels_keep_their_boundary() {
        assert_eq!(classify(8_010, 10_000, 80.1, 90.3), BarStatus::Under);
        assert_eq!(classify(8_011, 10_000, 80.1, 90.3), BarStatus::Warning);
        assert_eq!(classify(9_030, 10_000, 80.1, 90.3), BarStatus::Warning);
        assert_eq!(classify(9_031, 10_000, 80.1, 90.3), BarStatus::Over);
        assert_eq!(classify(3_333, 3_333, 100.0, 100.7), BarStatus::Under);
    }

    #[test]
    fn zero_budget_never_divides() {
        assert_eq!(percent_text(500, 0), NOT_AVAILABLE);
        assert_eq!(percent_text(0, 0), NOT_AVAILABLE);
        assert_eq!(progress(500, 0), 100);
        assert_eq!(progress(0, 0), 0);
        assert_eq!(progress(-20, 0), 0);
    }

    #[test]
    fn progress_rounds_and_caps() {
        assert_eq!(progress(1, 3), 33);
        assert_eq!(progress(2, 3), 67);
        assert_eq!(progress(30_000, 10_000), 100);
        assert_eq!(progress(-100, 10_000), 0);
        assert_eq!(percent_text(1, 3), "33.33%");
    }
}
