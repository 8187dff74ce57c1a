use std::collections::HashMap;

use crate::currency::{CurrencyCode, CurrencyConverter};
use crate::ledger::{Account, AccountKind, AccountSource};

use super::node::{CashFlow, CategoryId, CategoryKind, CategoryNode};

/// Arena of category nodes keyed by id, with a separate parent index.
///
/// Insertion order is traversal order; every read-side iteration follows it.
#[derive(Debug, Clone)]
pub struct CategoryTree {
    base_currency: CurrencyCode,
    nodes: Vec<CategoryNode>,
    index: HashMap<CategoryId, usize>,
    parents: HashMap<CategoryId, CategoryId>,
}

#[derive(Clone, Copy)]
enum Total {
    Budget,
    Actual,
}

impl CategoryTree {
    pub fn new(base_currency: CurrencyCode) -> Self {
        Self {
            base_currency,
            nodes: Vec::new(),
            index: HashMap::new(),
            parents: HashMap::new(),
        }
    }

    pub fn base_currency(&self) -> &CurrencyCode {
        &self.base_currency
    }

    /// Inserts an aggregate node with zero totals in the base currency.
    ///
    /// Income and Expense aggregates hang under the root aggregate when one exists.
    pub fn add_synthetic(
        &mut self,
        id: CategoryId,
        label: &str,
        kind: CategoryKind,
        indent_level: u32,
    ) -> CategoryId {
        let flow = match kind {
            CategoryKind::Income => CashFlow::Inflow,
            CategoryKind::Expense => CashFlow::Outflow,
            CategoryKind::RootAggregate | CategoryKind::Normal => CashFlow::Net,
        };
        let parent = match kind {
            CategoryKind::Income | CategoryKind::Expense => self
                .nodes
                .iter()
                .find(|node| node.kind() == CategoryKind::RootAggregate)
                .map(|node| node.id().clone()),
            _ => None,
        };
        let node = CategoryNode::new(
            id.clone(),
            label.to_string(),
            label.to_string(),
            kind,
            flow,
            indent_level,
            self.base_currency.clone(),
        );
        self.insert(node, parent);
        id
    }

    /// Inserts a node for `account` when it belongs to this pass and is visible.
    ///
    /// Returns `None` when the account is skipped.
    pub fn add_from_account(
        &mut self,
        account: &Account,
        pass: AccountKind,
        accounts: &dyn AccountSource,
    ) -> Option<CategoryId> {
        if account.kind != pass || !is_visible(account, accounts) {
            return None;
        }
        if self.index.contains_key(&account.id) {
            tracing::warn!(category = %account.id, "duplicate account skipped");
            return None;
        }

        let (kind, flow, pass_root) = match pass {
            AccountKind::Income => (CategoryKind::Income, CashFlow::Inflow, CategoryId::income()),
            _ => (CategoryKind::Expense, CashFlow::Outflow, CategoryId::expense()),
        };
        let parent = account
            .parent_id
            .as_ref()
            .filter(|parent| self.index.contains_key(*parent))
            .cloned()
            .or_else(|| {
                self.lookup(&pass_root)
                    .filter(|node| node.kind() == kind)
                    .map(|node| node.id().clone())
            });

        let (indent_level, full_name) = match parent.as_ref().and_then(|id| self.lookup(id)) {
            Some(parent_node) if parent_node.kind() == CategoryKind::Normal => (
                parent_node.indent_level() + 1,
                format!("{}:{}", parent_node.full_name(), account.name),
            ),
            Some(parent_node) => (parent_node.indent_level() + 1, account.name.clone()),
            None => (0, account.name.clone()),
        };

        let node = CategoryNode::new(
            account.id.clone(),
            account.name.clone(),
            full_name,
            CategoryKind::Normal,
            flow,
            indent_level,
            accounts.currency_of(account),
        );
        self.insert(node, parent);
        Some(account.id.clone())
    }

    pub fn lookup(&self, id: &CategoryId) -> Option<&CategoryNode> {
        self.index.get(id).and_then(|pos| self.nodes.get(*pos))
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.index.contains_key(id)
    }

    pub fn parent_of(&self, id: &CategoryId) -> Option<&CategoryNode> {
        self.parents.get(id).and_then(|parent| self.lookup(parent))
    }

    /// Ancestor ids, nearest first.
    pub fn ancestors(&self, id: &CategoryId) -> Vec<CategoryId> {
        let mut out = Vec::new();
        let mut current = self.parents.get(id);
        while let Some(parent) = current {
            out.push(parent.clone());
            current = self.parents.get(parent);
        }
        out
    }

    /// Direct children, or the whole subtree in depth-first pre-order.
    pub fn children_of(&self, id: &CategoryId, include_all_descendants: bool) -> Vec<&CategoryNode> {
        let mut out = Vec::new();
        if let Some(node) = self.lookup(id) {
            self.collect_children(node, include_all_descendants, &mut out);
        }
        out
    }

    fn collect_children<'a>(
        &'a self,
        node: &'a CategoryNode,
        recurse: bool,
        out: &mut Vec<&'a CategoryNode>,
    ) {
        for child in node.children().iter().filter_map(|id| self.lookup(id)) {
            out.push(child);
            if recurse {
                self.collect_children(child, recurse, out);
            }
        }
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds `amount` to the node's budget and to every ancestor's budget.
    pub fn add_budget(&mut self, id: &CategoryId, amount: i64, converter: &dyn CurrencyConverter) {
        self.roll_up(id, amount, converter, Total::Budget);
    }

    /// Adds `amount` to the node's actual total and to every ancestor's actual total.
    pub fn add_actual(&mut self, id: &CategoryId, amount: i64, converter: &dyn CurrencyConverter) {
        self.roll_up(id, amount, converter, Total::Actual);
    }

    /// Each ancestor receives the original amount converted straight into its
    /// own currency, never a partial sum converted again.
    fn roll_up(
        &mut self,
        id: &CategoryId,
        amount: i64,
        converter: &dyn CurrencyConverter,
        total: Total,
    ) {
        if amount == 0 {
            return;
        }
        let Some(source) = self.lookup(id) else {
            tracing::warn!(category = %id, "rollup for unknown category ignored");
            return;
        };
        let source_currency = source.currency().clone();
        let source_flow = source.flow();

        apply(self.node_mut(id), amount, total);
        for ancestor_id in self.ancestors(id) {
            let Some(ancestor) = self.node_mut(&ancestor_id) else {
                continue;
            };
            let converted = if ancestor.currency() == &source_currency {
                amount
            } else {
                converter.convert(amount, &source_currency, ancestor.currency())
            };
            let signed = ancestor.signed_contribution(source_flow, converted);
            apply(Some(ancestor), signed, total);
        }
    }

    fn node_mut(&mut self, id: &CategoryId) -> Option<&mut CategoryNode> {
        let pos = *self.index.get(id)?;
        self.nodes.get_mut(pos)
    }

    fn insert(&mut self, node: CategoryNode, parent: Option<CategoryId>) {
        let id = node.id().clone();
        if let Some(parent_id) = parent {
            if let Some(parent) = self.node_mut(&parent_id) {
                parent.push_child(id.clone());
            }
            self.parents.insert(id.clone(), parent_id);
        }
        self.index.insert(id, self.nodes.len());
        self.nodes.push(node);
    }
}

fn apply(node: Option<&mut CategoryNode>, amount: i64, total: Total) {
    if let Some(node) = node {
        match total {
            Total::Budget => node.add_budget(amount),
            Total::Actual => node.add_actual(amount),
        }
    }
}

/// Active, shown, and not beneath an inactive or hidden ancestor.
///
/// A parent chain longer than the account list loops, and the account is skipped.
fn is_visible(account: &Account, accounts: &dyn AccountSource) -> bool {
    let mut current = Some(account);
    for _ in 0..=accounts.accounts().len() {
        let Some(acct) = current else {
            return true;
        };
        if acct.inactive || acct.hidden {
            return false;
        }
        current = acct.parent_id.as_ref().and_then(|id| accounts.account(id));
    }
    tracing::warn!(category = %account.id, "account parent chain loops; skipped");
    false
}
