#![allow(dead_code)]

use budget_bars::{
    category::CategoryId,
    currency::CurrencyCode,
    ledger::{Account, AccountKind, Budget, Ledger, Transaction},
    period::Clock,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

pub const BUDGET_NAME: &str = "Budget";

/// Ids of the accounts in [`household`].
pub struct Household {
    pub ledger: Ledger,
    pub salary: CategoryId,
    pub food: CategoryId,
    pub dining: CategoryId,
    pub lunch: CategoryId,
    pub dinner: CategoryId,
    pub groceries: CategoryId,
    pub rent: CategoryId,
    pub travel: CategoryId,
    pub hobby: CategoryId,
    pub secret: CategoryId,
    pub old: CategoryId,
    pub old_child: CategoryId,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The fixture's "today".
pub fn today() -> NaiveDate {
    date(2024, 3, 20)
}

pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn on(day: NaiveDate) -> Self {
        Self(Utc.from_utc_datetime(&day.and_hms_opt(9, 30, 0).unwrap()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A USD book with one EUR category. March 2024 totals:
///
/// ```text
/// Income-Expenses  budget 274000  actual 293500
///   Income         budget 500000  actual 500000
///     Salary       budget 500000  actual 500000
///   Expenses       budget 226000  actual 206500
///     Food         budget  65000  actual  47000 (2000 posted directly)
///       Dining     budget  25000  actual  15000
///         Lunch    budget  10000  actual   6000
///         Dinner   budget  15000  actual   9000
///       Groceries  budget  40000  actual  30000
///     Rent         budget 150000  actual 150000
///     Travel (EUR) budget  11000  actual   5500 (10000 / 5000 EUR at 1.1)
///     Hobby        budget      0  actual   4000
/// ```
pub fn household() -> Household {
    let mut ledger = Ledger::new("Household", CurrencyCode::new("USD"));
    ledger.rates.set_rate(CurrencyCode::new("EUR"), 1.1);

    ledger.add_account(Account::new("Checking", AccountKind::Bank));
    let salary = ledger.add_account(Account::new("Salary", AccountKind::Income));
    let food = ledger.add_account(Account::new("Food", AccountKind::Expense));
    let dining = ledger.add_account(Account::new("Dining", AccountKind::Expense).with_parent(&food));
    let lunch = ledger.add_account(Account::new("Lunch", AccountKind::Expense).with_parent(&dining));
    let dinner =
        ledger.add_account(Account::new("Dinner", AccountKind::Expense).with_parent(&dining));
    let groceries =
        ledger.add_account(Account::new("Groceries", AccountKind::Expense).with_parent(&food));
    let rent = ledger.add_account(Account::new("Rent", AccountKind::Expense));
    let travel = ledger.add_account(
        Account::new("Travel", AccountKind::Expense).with_currency(CurrencyCode::new("EUR")),
    );
    let hobby = ledger.add_account(Account::new("Hobby", AccountKind::Expense));

    let mut hidden = Account::new("Secret", AccountKind::Expense);
    hidden.hidden = true;
    let secret = ledger.add_account(hidden);

    let mut retired = Account::new("Old", AccountKind::Expense);
    retired.inactive = true;
    let old = ledger.add_account(retired);
    let old_child =
        ledger.add_account(Account::new("Old Child", AccountKind::Expense).with_parent(&old));

    let mut budget = Budget::monthly(BUDGET_NAME);
    budget.set_monthly_amount(&salary, 2024, 500_000);
    budget.set_monthly_amount(&lunch, 2024, 10_000);
    budget.set_monthly_amount(&dinner, 2024, 15_000);
    budget.set_monthly_amount(&groceries, 2024, 40_000);
    budget.set_monthly_amount(&rent, 2024, 150_000);
    budget.set_monthly_amount(&travel, 2024, 10_000);
    budget.set_monthly_amount(&old_child, 2024, 7_000);
    // Non-leaf budgets never count.
    budget.set_monthly_amount(&food, 2024, 1_000_000);
    ledger.add_budget(budget);

    let march = date(2024, 3, 5);
    let postings = [
        (&salary, march, 500_000),
        (&food, march, 2_000),
        (&lunch, march, 6_000),
        (&dinner, march, 9_000),
        (&groceries, march, 30_000),
        (&rent, march, 150_000),
        (&travel, march, 5_000),
        (&hobby, march, 4_000),
        (&secret, march, 99_900),
        (&old_child, march, 7_700),
        (&lunch, date(2024, 2, 29), 1_234),
        (&lunch, date(2024, 4, 1), 8_888),
    ];
    for (id, day, amount) in postings {
        ledger.add_transaction(Transaction::new(id, day, amount));
    }

    Household {
        ledger,
        salary,
        food,
        dining,
        lunch,
        dinner,
        groceries,
        rent,
        travel,
        hobby,
        secret,
        old,
        old_child,
    }
}
