#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn usd() -> DisplayConfig {
    DisplayConfig::default()
}

fn euro() -> DisplayConfig {
    DisplayConfig {
        decimals: 2,
        currency_symbol: "€".into(),
        thousands_separator: ".".into(),
        decimal_separator: ",".into(),
    }
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56), &usd()), "$1,234.56");
    assert_eq!(format_amount(dec!(0), &usd()), "$0.00");
    assert_eq!(format_amount(dec!(5), &usd()), "$5.00");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(1234567.89), &usd()), "$1,234,567.89");
    assert_eq!(format_amount(dec!(100000), &usd()), "$100,000.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.5), &usd()), "-$42.50");
    assert_eq!(format_amount(dec!(-1234567.891), &usd()), "-$1,234,567.89");
}

#[test]
fn test_format_amount_rounds_half_up() {
    assert_eq!(format_amount(dec!(0.125), &usd()), "$0.13");
    assert_eq!(format_amount(dec!(370.368), &usd()), "$370.37");
}

#[test]
fn test_format_amount_negative_rounding_to_zero() {
    assert_eq!(format_amount(dec!(-0.001), &usd()), "$0.00");
}

#[test]
fn test_format_amount_no_decimals() {
    let display = DisplayConfig {
        decimals: 0,
        ..DisplayConfig::default()
    };
    assert_eq!(format_amount(dec!(1234.5), &display), "$1,235");
    assert_eq!(format_amount(dec!(999.4), &display), "$999");
}

#[test]
fn test_format_amount_locale_separators() {
    assert_eq!(format_amount(dec!(1234567.8), &euro()), "€1.234.567,80");
}

// ── format_delta ──────────────────────────────────────────────

#[test]
fn test_format_delta() {
    assert_eq!(format_delta(Some(dec!(20))), "+20.0%");
    assert_eq!(format_delta(Some(dec!(-12.345))), "-12.3%");
    assert_eq!(format_delta(Some(dec!(0))), "0.0%");
    assert_eq!(format_delta(None), "n/a");
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello world", 5), "hell…");
    assert_eq!(truncate("hello", 0), "");
    assert_eq!(truncate("café résumé", 5), "café…");
}
