//! The widget's state machine: resolves the budget, builds the category tree
//! for the configured period and publishes the resulting bars.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::aggregation::AggregationEngine;
use crate::breakdown::{render, AmountFormatter, BarSummary};
use crate::category::{CategoryId, CategoryTree};
use crate::config::{SelectedCategories, SettingsRecord, SettingsStore};
use crate::currency::LocaleConfig;
use crate::errors::BarsError;
use crate::ledger::{AccountSource, Ledger};
use crate::period::{Clock, PeriodSelection, PeriodSelector, SystemClock};
use crate::refresh::{ChangeSource, DataChanged, RefreshScheduler};

/// Raised when the configured budget was replaced by the only monthly budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetNotice {
    Substituted { requested: String, used: String },
}

impl fmt::Display for BudgetNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetNotice::Substituted { requested, used } => write!(
                f,
                "The budget '{requested}' does not exist. Using the budget named '{used}' instead."
            ),
        }
    }
}

/// Name of the budget a refresh will read, plus any notice about how it was picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBudget {
    pub name: String,
    pub notice: Option<BudgetNotice>,
}

/// Everything one refresh produced. Never mutated after publication.
#[derive(Debug, Clone)]
pub struct BarsSnapshot {
    pub book_id: Uuid,
    pub budget_name: String,
    pub period: PeriodSelector,
    pub selection: PeriodSelection,
    pub built_at: DateTime<Utc>,
    pub tree: CategoryTree,
    pub bars: Vec<BarSummary>,
    pub notice: Option<BudgetNotice>,
}

/// A category offered by the bar editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableCategory {
    pub id: CategoryId,
    pub full_name: String,
}

pub struct Dashboard<C: Clock = SystemClock> {
    clock: C,
    store: SettingsStore,
    scheduler: RefreshScheduler,
    locale: LocaleConfig,
    snapshot: Option<Arc<BarsSnapshot>>,
}

impl Dashboard<SystemClock> {
    pub fn open(ledger: &Ledger) -> Self {
        Self::with_clock(ledger, SystemClock)
    }
}

impl<C: Clock> Dashboard<C> {
    pub fn with_clock(ledger: &Ledger, clock: C) -> Self {
        Self {
            clock,
            store: SettingsStore::load(ledger.id, ledger),
            scheduler: RefreshScheduler::default(),
            locale: LocaleConfig::default(),
            snapshot: None,
        }
    }

    pub fn with_scheduler(mut self, scheduler: RefreshScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_locale(mut self, locale: LocaleConfig) -> Self {
        self.locale = locale;
        self
    }

    pub fn settings(&self) -> &SettingsRecord {
        self.store.settings()
    }

    pub fn selected(&self) -> &SelectedCategories {
        self.store.selected()
    }

    /// The last published snapshot.
    pub fn snapshot(&self) -> Option<Arc<BarsSnapshot>> {
        self.snapshot.clone()
    }

    /// Finds the configured monthly budget, or the only monthly budget when
    /// the configured one is gone.
    pub fn resolve_budget(&self, ledger: &Ledger) -> Result<ResolvedBudget, BarsError> {
        let budgets = ledger.monthly_budgets();
        let requested = &self.store.settings().budget_name;
        if budgets.get(requested).is_some() {
            return Ok(ResolvedBudget {
                name: requested.clone(),
                notice: None,
            });
        }

        let mut names = budgets.names();
        match names.len() {
            0 => Err(BarsError::NoMonthlyBudgets),
            1 => {
                let used = names.remove(0);
                Ok(ResolvedBudget {
                    notice: Some(BudgetNotice::Substituted {
                        requested: requested.clone(),
                        used: used.clone(),
                    }),
                    name: used,
                })
            }
            _ => Err(BarsError::BudgetNotFound {
                requested: requested.clone(),
                available: names,
            }),
        }
    }

    /// Builds a new snapshot from the ledger and publishes it.
    pub fn refresh(&mut self, ledger: &mut Ledger) -> Result<Arc<BarsSnapshot>, BarsError> {
        let resolved = self.resolve_budget(ledger)?;
        if let Some(notice) = &resolved.notice {
            tracing::info!(%notice, "budget substituted");
            self.store
                .update(|settings| settings.budget_name = resolved.name.clone());
            self.store.save(ledger);
        }

        let ledger: &Ledger = ledger;
        let budgets = ledger.monthly_budgets();
        let budget = budgets
            .get(&resolved.name)
            .ok_or_else(|| BarsError::InvalidRef(format!("budget `{}`", resolved.name)))?;

        let settings = self.store.settings().clone();
        let selection = settings.period.resolve(self.clock.today());
        let tree = AggregationEngine::for_ledger(ledger, budget)
            .build(&selection, settings.aggregation_policy());

        let stale = self
            .store
            .selected_mut()
            .retain_known(|id| tree.contains(id));
        if !stale.is_empty() {
            tracing::debug!(dropped = stale.len(), "stale categories removed from the bars");
        }

        let policy = settings.display_policy();
        let bars = self
            .store
            .selected()
            .ids()
            .iter()
            .filter_map(|id| BarSummary::build(&tree, id, &policy, ledger))
            .collect();

        let snapshot = Arc::new(BarsSnapshot {
            book_id: ledger.id,
            budget_name: resolved.name,
            period: settings.period,
            selection,
            built_at: self.clock.now(),
            tree,
            bars,
            notice: resolved.notice,
        });
        self.snapshot = Some(Arc::clone(&snapshot));
        tracing::info!(
            budget = %snapshot.budget_name,
            period = %snapshot.period,
            bars = snapshot.bars.len(),
            "budget bars refreshed"
        );
        Ok(snapshot)
    }

    /// Applies a settings edit, saves it to the book and rebuilds.
    pub fn update_settings(
        &mut self,
        ledger: &mut Ledger,
        change: impl FnOnce(&mut SettingsRecord),
    ) -> Result<Arc<BarsSnapshot>, BarsError> {
        self.store.update(change);
        self.store.save(ledger);
        self.refresh(ledger)
    }

    /// Applies a selection edit, saves it to the book and rebuilds.
    pub fn edit_selection(
        &mut self,
        ledger: &mut Ledger,
        change: impl FnOnce(&mut SelectedCategories),
    ) -> Result<Arc<BarsSnapshot>, BarsError> {
        change(self.store.selected_mut());
        self.store.save(ledger);
        self.refresh(ledger)
    }

    pub fn period_changed(
        &mut self,
        ledger: &mut Ledger,
        period: PeriodSelector,
    ) -> Result<Arc<BarsSnapshot>, BarsError> {
        tracing::debug!(%period, "period changed");
        self.update_settings(ledger, |settings| settings.period = period)
    }

    /// Resolves a `BudgetNotFound` by picking one of the listed budgets.
    pub fn choose_budget(
        &mut self,
        ledger: &mut Ledger,
        name: &str,
    ) -> Result<Arc<BarsSnapshot>, BarsError> {
        let budgets = ledger.monthly_budgets();
        if budgets.get(name).is_none() {
            return Err(BarsError::BudgetNotFound {
                requested: name.to_string(),
                available: budgets.names(),
            });
        }
        let name = name.to_string();
        self.update_settings(ledger, |settings| settings.budget_name = name)
    }

    /// Categories in the current tree that are not yet shown as bars.
    pub fn available_categories(&self) -> Vec<AvailableCategory> {
        let Some(snapshot) = &self.snapshot else {
            return Vec::new();
        };
        snapshot
            .tree
            .iter()
            .filter(|node| !self.store.selected().contains(node.id()))
            .map(|node| AvailableCategory {
                id: node.id().clone(),
                full_name: node.full_name().to_string(),
            })
            .collect()
    }

    pub fn notify(&mut self, change: DataChanged) {
        self.scheduler.notify(change);
    }

    /// Rebuilds once the scheduler's quiet period has passed. Preference
    /// changes reload the settings first.
    pub fn tick(&mut self, ledger: &mut Ledger) -> Result<Option<Arc<BarsSnapshot>>, BarsError> {
        let Some(batch) = self.scheduler.poll(self.clock.now()) else {
            return Ok(None);
        };
        if batch.sources.contains(&ChangeSource::Preferences) {
            self.store.reload(ledger);
        }
        self.refresh(ledger).map(Some)
    }

    /// Drops the old snapshot and loads the settings of `ledger`, which
    /// replaces the previously open book.
    pub fn switch_book(&mut self, ledger: &mut Ledger) -> Result<Arc<BarsSnapshot>, BarsError> {
        if self.store.switch_book(ledger.id, ledger) {
            self.snapshot = None;
            self.scheduler.flush();
        }
        self.refresh(ledger)
    }

    /// Formats amounts in the category's currency or the book's base
    /// currency, per the settings.
    pub fn amount_formatter<'l>(&self, ledger: &'l Ledger) -> AmountFormatter<'l> {
        AmountFormatter::new(
            ledger,
            ledger.base_currency().clone(),
            self.locale.clone(),
            self.store.settings().use_category_currency,
        )
    }

    pub fn tooltip(&self, ledger: &Ledger, bar: &BarSummary) -> String {
        render::render_tooltip(bar, &self.amount_formatter(ledger), true)
    }
}
