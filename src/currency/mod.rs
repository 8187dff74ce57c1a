//! Currency codes, conversion between currencies and amount formatting.
//!
//! Amounts are always `i64` minor units (cents for USD, yen for JPY).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Converts minor-unit amounts between currencies.
pub trait CurrencyConverter {
    fn convert(&self, amount: i64, from: &CurrencyCode, to: &CurrencyCode) -> i64;
}

/// Exchange data for one currency relative to the table's base currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrencyRate {
    /// Units of the base currency bought by one unit of this currency.
    pub rate_to_base: f64,
    pub decimals: u8,
}

/// Rates of every known currency against a single base currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTable {
    base: CurrencyCode,
    #[serde(default)]
    rates: BTreeMap<String, CurrencyRate>,
}

impl RateTable {
    pub fn new(base: CurrencyCode) -> Self {
        Self {
            base,
            rates: BTreeMap::new(),
        }
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn set_rate(&mut self, code: CurrencyCode, rate_to_base: f64) {
        let decimals = minor_units_for(code.as_str());
        self.rates.insert(
            code.0,
            CurrencyRate {
                rate_to_base,
                decimals,
            },
        );
    }

    /// Returns the rate entry for `code`; the base currency is always at parity.
    pub fn rate(&self, code: &CurrencyCode) -> Option<CurrencyRate> {
        if code == &self.base {
            return Some(CurrencyRate {
                rate_to_base: 1.0,
                decimals: minor_units_for(code.as_str()),
            });
        }
        self.rates.get(code.as_str()).cloned()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new(CurrencyCode::default())
    }
}

impl CurrencyConverter for RateTable {
    fn convert(&self, amount: i64, from: &CurrencyCode, to: &CurrencyCode) -> i64 {
        if from == to || amount == 0 {
            return amount;
        }
        let (Some(source), Some(target)) = (self.rate(from), self.rate(to)) else {
            tracing::warn!(%from, %to, "no exchange rate known; amount left unconverted");
            return amount;
        };
        if target.rate_to_base.abs() < f64::EPSILON {
            tracing::warn!(%to, "exchange rate is zero; amount left unconverted");
            return amount;
        }
        let major = amount as f64 / 10f64.powi(source.decimals as i32);
        let in_target = major * source.rate_to_base / target.rate_to_base;
        (in_target * 10f64.powi(target.decimals as i32)).round() as i64
    }
}

/// Locale-aware separators used when rendering amounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub negative_style: NegativeStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
            negative_style: NegativeStyle::Sign,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    Sign,
    Parentheses,
}

pub fn symbol_for(code: &str) -> &str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "AUD" => "A$",
        _ => code,
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" | "KRW" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Formats a minor-unit amount such as `-123456` USD as `-$1,234.56`.
pub fn format_minor_units(amount: i64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let decimals = minor_units_for(code.as_str()) as u32;
    let scale = 10u64.pow(decimals);
    let magnitude = amount.unsigned_abs();

    let mut body = group_digits(&(magnitude / scale).to_string(), locale.grouping_separator);
    if decimals > 0 {
        body.push(locale.decimal_separator);
        body.push_str(&format!(
            "{:0width$}",
            magnitude % scale,
            width = decimals as usize
        ));
    }

    let symbol = symbol_for(code.as_str());
    let separator = if symbol.chars().count() > 2 { " " } else { "" };
    let unsigned = format!("{symbol}{separator}{body}");
    if amount >= 0 {
        return unsigned;
    }
    match locale.negative_style {
        NegativeStyle::Sign => format!("-{unsigned}"),
        NegativeStyle::Parentheses => format!("({unsigned})"),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
