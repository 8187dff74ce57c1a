use budget_bars::period::{PeriodSelection, PeriodSelector};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn selection(start_month: u32, year: i32, month_count: u32) -> PeriodSelection {
    PeriodSelection {
        start_month,
        year,
        month_count,
    }
}

#[test]
fn mid_july_selections() {
    let today = date(2024, 7, 15);
    assert_eq!(PeriodSelector::ThisMonth.resolve(today), selection(7, 2024, 1));
    assert_eq!(PeriodSelector::LastMonth.resolve(today), selection(6, 2024, 1));
    assert_eq!(PeriodSelector::ThisYear.resolve(today), selection(1, 2024, 12));
    assert_eq!(PeriodSelector::Automatic.resolve(today), selection(1, 2024, 7));
}

#[test]
fn january_last_month_is_previous_december() {
    let today = date(2024, 1, 10);
    assert_eq!(PeriodSelector::LastMonth.resolve(today), selection(12, 2023, 1));
    assert_eq!(PeriodSelector::Automatic.resolve(today), selection(1, 2024, 1));
}

#[test]
fn selection_months_and_window_agree() {
    let chosen = PeriodSelector::ThisYear.resolve(date(2023, 5, 2));
    assert_eq!(chosen.months().collect::<Vec<_>>(), (1..=12).collect::<Vec<_>>());
    let window = chosen.window();
    assert_eq!(window.start, date(2023, 1, 1));
    assert_eq!(window.end, date(2024, 1, 1));
    assert!(window.contains(date(2023, 12, 31)));
    assert!(!window.contains(date(2024, 1, 1)));
}
