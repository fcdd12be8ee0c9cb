use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::DisplayConfig;

/// Format an amount with thousand separators and the configured decimals.
/// e.g. `-1234567.891` → `"-$1,234,567.89"`
pub fn format_amount(val: Decimal, display: &DisplayConfig) -> String {
    let rounded = val
        .abs()
        .round_dp_with_strategy(display.decimals, RoundingStrategy::MidpointAwayFromZero);
    let formatted = format!("{rounded:.prec$}", prec = display.decimals as usize);
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next();

    let with_separators: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(&display.thousands_separator);

    let sign = if val < Decimal::ZERO && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match dec_part {
        Some(d) => format!(
            "{sign}{}{with_separators}{}{d}",
            display.currency_symbol, display.decimal_separator
        ),
        None => format!("{sign}{}{with_separators}", display.currency_symbol),
    }
}

/// Signed percentage with one decimal, or "n/a" when undefined.
pub fn format_delta(delta: Option<Decimal>) -> String {
    match delta {
        Some(d) => {
            let d = d.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            if d.is_zero() {
                "0.0%".to_string()
            } else if d > Decimal::ZERO {
                format!("+{d:.1}%")
            } else {
                format!("{d:.1}%")
            }
        }
        None => "n/a".to_string(),
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
