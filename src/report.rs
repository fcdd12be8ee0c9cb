//! Dashboard figures for one period, assembled from a [`FinanceStore`].

use std::collections::BTreeMap;

use tracing::debug;

use crate::engine::{
    aggregate, aggregate_by_month, evaluate, index_categories, validate, Evaluation, PeriodTotals,
    RuleValidation,
};
use crate::errors::Result;
use crate::models::{AllocationRule, Category, Period, YearMonth};
use crate::store::FinanceStore;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub period: Period,
    pub rule: AllocationRule,
    pub validation: RuleValidation,
    pub totals: PeriodTotals,
    pub evaluation: Evaluation,
    /// Number of operations the totals were built from.
    pub operation_count: usize,
    /// Categories whose type and segment disagree.
    pub inconsistent_categories: Vec<Category>,
}

pub fn summarize<S: FinanceStore + ?Sized>(
    store: &S,
    user_id: &str,
    period: Period,
) -> Result<Summary> {
    let operations = store.fetch_operations(user_id, period.start, period.end, None)?;
    let categories = store.fetch_categories(user_id)?;
    let rule = store.load_rule(user_id)?;

    let totals = aggregate(&operations, &index_categories(&categories))?;
    debug!(user = user_id, %period, operations = operations.len(), "summarized period");

    Ok(Summary {
        period,
        rule,
        validation: validate(&rule),
        totals,
        evaluation: evaluate(&rule, &totals)?,
        operation_count: operations.len(),
        inconsistent_categories: categories
            .into_iter()
            .filter(|c| !c.is_consistent())
            .collect(),
    })
}

/// Per-month totals for the inclusive month range `from..=to`. Months without
/// operations are present with zero totals.
pub fn monthly_trend<S: FinanceStore + ?Sized>(
    store: &S,
    user_id: &str,
    from: YearMonth,
    to: YearMonth,
) -> Result<BTreeMap<YearMonth, PeriodTotals>> {
    let operations = store.fetch_operations(user_id, from.first_day(), to.last_day(), None)?;
    let categories = index_categories(&store.fetch_categories(user_id)?);
    let mut months = aggregate_by_month(&operations, &categories)?;

    let mut month = from;
    while month <= to {
        months.entry(month).or_default();
        month = month.next();
    }
    Ok(months)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
