use std::{env, path::PathBuf, process};

use budget_bars::{
    breakdown::BarStatus,
    dashboard::Dashboard,
    init,
    period::{Clock, PeriodSelector, SystemClock},
    utils::persistence,
};
use chrono::{DateTime, NaiveDate, Utc};
use colored::Colorize;

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

#[derive(Debug, Default)]
struct Options {
    snapshot: Option<PathBuf>,
    period: Option<PeriodSelector>,
    budget: Option<String>,
    today: Option<NaiveDate>,
}

/// Pins "today" when `--today` is given, otherwise reads the system clock.
struct CliClock(Option<NaiveDate>);

impl Clock for CliClock {
    fn now(&self) -> DateTime<Utc> {
        match self.0.and_then(|day| day.and_hms_opt(12, 0, 0)) {
            Some(noon) => noon.and_utc(),
            None => SystemClock.now(),
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let Some(options) = parse_args(env::args().skip(1))? else {
        return Ok(());
    };
    let Some(path) = options.snapshot else {
        print_usage();
        process::exit(1);
    };

    let mut ledger = persistence::load_snapshot(&path)?;
    let mut dashboard = Dashboard::with_clock(&ledger, CliClock(options.today));

    let mut snapshot = match &options.budget {
        Some(name) => dashboard.choose_budget(&mut ledger, name)?,
        None => dashboard.refresh(&mut ledger)?,
    };
    if let Some(period) = options.period {
        snapshot = dashboard.period_changed(&mut ledger, period)?;
    }

    if let Some(notice) = &snapshot.notice {
        println!("{} {notice}", "[i]".cyan());
    }
    println!(
        "{} | {} | {} {}-{:02}",
        ledger.name.bold(),
        snapshot.budget_name,
        snapshot.period,
        snapshot.selection.year,
        snapshot.selection.start_month
    );

    if snapshot.bars.is_empty() {
        println!("No categories selected. Available categories:");
        for category in dashboard.available_categories() {
            println!("  {} ({})", category.full_name, category.id);
        }
        return Ok(());
    }

    let amounts = dashboard.amount_formatter(&ledger);
    for bar in &snapshot.bars {
        println!();
        println!(
            "{} {} {} spent of {} ({} left)",
            status_marker(bar.status),
            bar.label.bold(),
            amounts.format(bar.spent, &bar.currency),
            amounts.format(bar.budget, &bar.currency),
            amounts.format(bar.remaining, &bar.currency),
        );
        println!("{}", dashboard.tooltip(&ledger, bar));
    }
    Ok(())
}

fn status_marker(status: BarStatus) -> String {
    match status {
        BarStatus::Under => "[OK]".green().to_string(),
        BarStatus::Warning => "[WARN]".yellow().to_string(),
        BarStatus::Over => "[OVER]".red().to_string(),
    }
}

fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> Result<Option<Options>, Box<dyn std::error::Error>> {
    let mut options = Options::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => {
                print_version();
                return Ok(None);
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            "--period" => {
                let raw = args.next().ok_or("--period needs a value")?;
                let period = PeriodSelector::parse_label(&raw)
                    .ok_or_else(|| format!("unknown period `{raw}`"))?;
                options.period = Some(period);
            }
            "--budget" => {
                options.budget = Some(args.next().ok_or("--budget needs a value")?);
            }
            "--today" => {
                let raw = args.next().ok_or("--today needs a value")?;
                options.today = Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d")?);
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option `{other}`").into());
            }
            path => options.snapshot = Some(PathBuf::from(path)),
        }
    }
    Ok(Some(options))
}

fn print_version() {
    println!(
        "budget_bars_cli {} ({} {}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUDGET_BARS_BUILD_HASH"),
        env!("BUDGET_BARS_BUILD_PROFILE"),
        env!("BUDGET_BARS_BUILD_TIMESTAMP"),
    );
}

fn print_usage() {
    eprintln!(
        "Usage: budget_bars_cli <snapshot.json> [--period <automatic|this-month|last-month|this-year>] \
         [--budget <name>] [--today YYYY-MM-DD] [--version]"
    );
}
