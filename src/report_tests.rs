#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::db::SqliteStore;
use crate::models::{Operation, OperationType, Segment};

const USER: &str = "alice";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn store_with_data() -> SqliteStore {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.seed_default_categories(USER).unwrap();
    let cats = store.fetch_categories(USER).unwrap();
    let id = |name: &str| Category::find_by_name(&cats, name).unwrap().id.unwrap();

    let ops = vec![
        Operation::new(OperationType::Income, dec!(1000), "Pay".into(), date(2024, 3, 1))
            .with_category(id("Salary")),
        Operation::new(OperationType::Expense, dec!(600), "Rent".into(), date(2024, 3, 2))
            .with_category(id("Rent/Mortgage")),
        Operation::new(OperationType::Expense, dec!(150), "Cinema".into(), date(2024, 3, 9))
            .with_category(id("Entertainment")),
        Operation::new(OperationType::Expense, dec!(30), "Cash".into(), date(2024, 3, 12)),
        Operation::new(OperationType::Savings, dec!(200), "Fund".into(), date(2024, 3, 31))
            .with_category(id("Emergency Fund")),
        Operation::new(OperationType::Expense, dec!(999), "Next month".into(), date(2024, 4, 1))
            .with_category(id("Rent/Mortgage")),
    ];
    for op in &ops {
        store.insert_operation(USER, op).unwrap();
    }
    store
}

#[test]
fn test_summary_for_month() {
    let store = store_with_data();
    let summary = summarize(&store, USER, Period::parse_month("2024-03").unwrap()).unwrap();

    assert_eq!(summary.operation_count, 5);
    assert_eq!(summary.rule, AllocationRule::DEFAULT);
    assert!(summary.validation.is_valid);

    assert_eq!(summary.totals.income_total, dec!(1000));
    assert_eq!(summary.totals.expense_total, dec!(780));
    assert_eq!(summary.totals.needs_total, dec!(600));
    assert_eq!(summary.totals.wants_total, dec!(150));
    assert_eq!(summary.totals.savings_segment_total, dec!(200));

    let needs = summary.evaluation.get(Segment::Needs);
    assert_eq!(needs.planned, dec!(500));
    assert_eq!(needs.delta_percent, Some(dec!(20)));
    assert_eq!(summary.evaluation.wants.delta_percent, Some(dec!(-50)));
    assert_eq!(summary.evaluation.savings.delta_percent, Some(Decimal::ZERO));
    assert!(summary.inconsistent_categories.is_empty());
}

#[test]
fn test_summary_uses_saved_rule() {
    let store = store_with_data();
    store
        .save_rule(USER, &AllocationRule::new(60, 20, 20))
        .unwrap();
    let summary = summarize(&store, USER, Period::parse_month("2024-03").unwrap()).unwrap();
    assert_eq!(summary.evaluation.needs.planned, dec!(600));
    assert_eq!(summary.evaluation.needs.delta_percent, Some(Decimal::ZERO));
}

#[test]
fn test_summary_empty_period() {
    let store = store_with_data();
    let summary = summarize(&store, USER, Period::parse_month("2023-01").unwrap()).unwrap();
    assert_eq!(summary.operation_count, 0);
    assert_eq!(summary.totals, PeriodTotals::default());
    assert!(summary.evaluation.iter().all(|s| s.delta_percent.is_none()));
}

#[test]
fn test_summary_reports_inconsistent_categories() {
    let store = store_with_data();
    let odd = Category::new("Odd".into(), crate::models::OperationType::Income)
        .with_segment(Segment::Needs);
    store.insert_category(USER, &odd).unwrap();
    let summary = summarize(&store, USER, Period::parse_month("2024-03").unwrap()).unwrap();
    assert_eq!(summary.inconsistent_categories.len(), 1);
    assert_eq!(summary.inconsistent_categories[0].name, "Odd");
}

#[test]
fn test_monthly_trend_fills_gaps() {
    let store = store_with_data();
    let from = YearMonth::parse("2024-02").unwrap();
    let to = YearMonth::parse("2024-05").unwrap();
    let trend = monthly_trend(&store, USER, from, to).unwrap();

    let keys: Vec<String> = trend.keys().map(|m| m.to_string()).collect();
    assert_eq!(keys, vec!["2024-02", "2024-03", "2024-04", "2024-05"]);
    assert_eq!(trend[&from], PeriodTotals::default());
    assert_eq!(
        trend[&YearMonth::parse("2024-03").unwrap()].income_total,
        dec!(1000)
    );
    assert_eq!(
        trend[&YearMonth::parse("2024-04").unwrap()].needs_total,
        dec!(999)
    );
}
