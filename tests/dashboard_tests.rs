mod common;

use std::sync::Arc;

use budget_bars::{
    breakdown::BarStatus,
    category::CategoryId,
    config::{PreferenceStore, SELECTED_CATEGORIES_KEY, SETTINGS_KEY},
    currency::CurrencyCode,
    dashboard::Dashboard,
    errors::BarsError,
    ledger::{Budget, Ledger, Transaction},
    period::PeriodSelector,
    refresh::{ChangeSource, DataChanged, RefreshScheduler},
};
use chrono::Duration;
use common::{date, household, today, FixedClock, Household};

fn dashboard_for(h: &mut Household, selected: &[&CategoryId]) -> Dashboard<FixedClock> {
    let ids: Vec<&str> = selected.iter().map(|id| id.as_str()).collect();
    h.ledger
        .set_preference(SELECTED_CATEGORIES_KEY, &ids.join(","));
    h.ledger
        .set_preference(SETTINGS_KEY, "3,Budget,false,100.0,105.0,1,false,false,false");
    Dashboard::with_clock(&h.ledger, FixedClock::on(today()))
}

#[test]
fn refresh_builds_selected_bars_in_order() {
    let mut h = household();
    let (rent, food) = (h.rent.clone(), h.food.clone());
    let mut dashboard = dashboard_for(&mut h, &[&rent, &food, &CategoryId::overall()]);

    let snapshot = dashboard.refresh(&mut h.ledger).unwrap();
    let labels: Vec<&str> = snapshot.bars.iter().map(|bar| bar.label.as_str()).collect();
    assert_eq!(labels, vec!["Rent", "Food", "Income-Expenses"]);
    assert_eq!(snapshot.bars[1].spent, 47_000);
    assert_eq!(snapshot.bars[1].remaining, 18_000);
    assert_eq!(snapshot.bars[2].budget, 274_000);
    assert_eq!(snapshot.bars[0].status, BarStatus::Under);
    assert_eq!(snapshot.selection.month_count, 1);
    assert!(Arc::ptr_eq(&snapshot, &dashboard.snapshot().unwrap()));
}

#[test]
fn stale_and_hidden_selections_are_dropped() {
    let mut h = household();
    let (rent, secret) = (h.rent.clone(), h.secret.clone());
    let gone = CategoryId::new("no-such-account");
    let mut dashboard = dashboard_for(&mut h, &[&gone, &rent, &secret]);

    let snapshot = dashboard.refresh(&mut h.ledger).unwrap();
    assert_eq!(snapshot.bars.len(), 1);
    assert_eq!(dashboard.selected().ids(), &[rent]);
}

#[test]
fn rebuild_is_idempotent() {
    let mut h = household();
    let food = h.food.clone();
    let mut dashboard = dashboard_for(&mut h, &[&food]);

    let first = dashboard.refresh(&mut h.ledger).unwrap();
    let second = dashboard.refresh(&mut h.ledger).unwrap();
    assert_eq!(first.bars, second.bars);
    assert_eq!(
        dashboard.tooltip(&h.ledger, &first.bars[0]),
        dashboard.tooltip(&h.ledger, &second.bars[0])
    );
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn editing_the_selection_saves_and_rebuilds() {
    let mut h = household();
    let mut dashboard = dashboard_for(&mut h, &[]);
    dashboard.refresh(&mut h.ledger).unwrap();

    let available = dashboard.available_categories();
    assert_eq!(available.len(), 12);
    assert_eq!(available[0].full_name, "Income-Expenses");
    assert!(available
        .iter()
        .any(|category| category.full_name == "Food:Dining:Lunch"));

    let lunch = h.lunch.clone();
    let snapshot = dashboard
        .edit_selection(&mut h.ledger, |selected| {
            selected.add(lunch.clone());
        })
        .unwrap();
    assert_eq!(snapshot.bars.len(), 1);
    assert_eq!(
        h.ledger.preference(SELECTED_CATEGORIES_KEY, ""),
        lunch.as_str()
    );
    assert_eq!(dashboard.available_categories().len(), 11);
}

#[test]
fn period_change_covers_new_months() {
    let mut h = household();
    let lunch = h.lunch.clone();
    let mut dashboard = dashboard_for(&mut h, &[&lunch]);
    dashboard.refresh(&mut h.ledger).unwrap();

    let snapshot = dashboard
        .period_changed(&mut h.ledger, PeriodSelector::LastMonth)
        .unwrap();
    assert_eq!(snapshot.period, PeriodSelector::LastMonth);
    assert_eq!(snapshot.bars[0].spent, 1_234);
    assert_eq!(snapshot.bars[0].budget, 10_000);
    assert_eq!(dashboard.settings().period, PeriodSelector::LastMonth);
}

#[test]
fn change_notifications_are_debounced() {
    let mut h = household();
    let rent = h.rent.clone();
    let mut dashboard = dashboard_for(&mut h, &[&rent])
        .with_scheduler(RefreshScheduler::new(Duration::zero()));
    dashboard.refresh(&mut h.ledger).unwrap();

    assert!(dashboard.tick(&mut h.ledger).unwrap().is_none());

    let when = FixedClock::on(today()).0;
    h.ledger
        .add_transaction(Transaction::new(&rent, date(2024, 3, 18), 1_000));
    dashboard.notify(DataChanged::new(ChangeSource::Transaction, when));
    dashboard.notify(DataChanged::new(ChangeSource::Transaction, when));

    let snapshot = dashboard.tick(&mut h.ledger).unwrap().unwrap();
    assert_eq!(snapshot.bars[0].spent, 151_000);
    assert_eq!(snapshot.bars[0].status, BarStatus::Warning);
    assert!(dashboard.tick(&mut h.ledger).unwrap().is_none());
}

#[test]
fn preference_changes_reload_settings() {
    let mut h = household();
    let rent = h.rent.clone();
    let mut dashboard = dashboard_for(&mut h, &[&rent])
        .with_scheduler(RefreshScheduler::new(Duration::zero()));
    dashboard.refresh(&mut h.ledger).unwrap();

    h.ledger
        .set_preference(SETTINGS_KEY, "3,Budget,true,100.0,105.0,3,false,false,false");
    dashboard.notify(DataChanged::new(
        ChangeSource::Preferences,
        FixedClock::on(today()).0,
    ));
    let snapshot = dashboard.tick(&mut h.ledger).unwrap().unwrap();
    assert_eq!(snapshot.period, PeriodSelector::ThisYear);
    assert!(dashboard.settings().use_full_names);
}

#[test]
fn switching_books_loads_their_settings() {
    let mut h = household();
    let rent = h.rent.clone();
    let mut dashboard = dashboard_for(&mut h, &[&rent]);
    dashboard.refresh(&mut h.ledger).unwrap();

    let mut other = Ledger::new("Other", CurrencyCode::new("USD"));
    other.add_budget(Budget::monthly("Plan A"));
    other.add_budget(Budget::monthly("Plan B"));
    let result = dashboard.switch_book(&mut other);
    assert!(matches!(result, Err(BarsError::BudgetNotFound { .. })));
    assert!(dashboard.snapshot().is_none());
    assert!(dashboard.selected().is_empty());

    let snapshot = dashboard.choose_budget(&mut other, "Plan B").unwrap();
    assert_eq!(snapshot.book_id, other.id);
    assert_eq!(snapshot.budget_name, "Plan B");
    assert_eq!(dashboard.settings().budget_name, "Plan B");
}
