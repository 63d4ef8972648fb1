//! Currency amounts: parsing free-form rate strings and rendering amounts.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Currency used when neither the record nor the config names one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Extract a numeric rate from a free-form string such as `"$75.00"` or `"$75/hr"`.
///
/// Every character that is not an ASCII digit or `.` is dropped, and the
/// longest leading run that forms a decimal number is parsed, so `"1.2.3"`
/// yields `1.2`. Returns `None` when no digits remain.
///
/// The comma is not a decimal separator here: `"€75,50"` parses as `7550`.
pub fn parse_rate(raw: &str) -> Option<Decimal> {
    let mut seen_dot = false;
    let number: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .take_while(|c| {
            if *c == '.' {
                if seen_dot {
                    return false;
                }
                seen_dot = true;
            }
            true
        })
        .collect();

    if !number.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let number = number.trim_end_matches('.');
    let number = if number.starts_with('.') {
        format!("0{number}")
    } else {
        number.to_string()
    };

    Decimal::from_str(&number).ok()
}

/// Lenient variant of [`parse_rate`] for stored data: unparseable rates count as zero.
pub fn rate_or_zero(raw: &str) -> Decimal {
    parse_rate(raw).unwrap_or(Decimal::ZERO)
}

/// Parse a user-entered amount such as `"1000"`, `"1,000.50"` or `"$250"`.
///
/// Unlike [`parse_rate`] this rejects trailing garbage, since it is used to
/// validate input rather than to salvage stored strings.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-' && c != '.')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    Decimal::from_str(&cleaned).ok()
}

/// An amount left the range a [`Decimal`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("amount is too large to compute")]
pub struct AmountOverflow;

/// Sum `amounts`, failing instead of panicking when the total is out of range.
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, AmountOverflow> {
    amounts.into_iter().try_fold(Decimal::ZERO, |total, amount| {
        total.checked_add(amount).ok_or(AmountOverflow)
    })
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.to_ascii_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

/// Render an amount as currency text, e.g. `-$1,234.50`.
///
/// Amounts are rounded half away from zero to two decimals. Currencies without
/// a known symbol are prefixed with their code (`SEK 1,234.50`).
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let mut rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .abs();
    rounded.rescale(2);

    let negative = amount.is_sign_negative() && !rounded.is_zero();
    let text = rounded.to_string();
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let prefix = match currency_symbol(currency) {
        Some(symbol) => symbol.to_string(),
        None => format!("{} ", currency.to_ascii_uppercase()),
    };
    let sign = if negative { "-" } else { "" };

    format!("{sign}{prefix}{grouped}.{cents}")
}
