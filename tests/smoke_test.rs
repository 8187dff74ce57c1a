mod common;

use budget_bars::{dashboard::Dashboard, init};
use common::{household, today, FixedClock};

#[test]
fn dashboard_smoke() {
    init();

    let mut h = household();
    let mut dashboard = Dashboard::with_clock(&h.ledger, FixedClock::on(today()));
    let snapshot = dashboard.refresh(&mut h.ledger).expect("refresh");

    assert_eq!(snapshot.budget_name, "Budget");
    assert!(snapshot.bars.is_empty());
    assert!(snapshot.tree.contains(&h.food));
}
