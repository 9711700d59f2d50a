//! Display formatting for amounts and dates.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Formats `amount` as `<symbol>1,234.50`.
pub fn format_amount(symbol: &str, amount: Decimal) -> String {
    let rounded = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));
    format!("{sign}{symbol}{}.{fraction}", group_thousands(whole))
}

/// Formats a calendar date as `Jan 6, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn format_share(percent: Decimal) -> String {
    format!("{:.1}%", percent)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
