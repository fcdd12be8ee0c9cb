use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use super::segment::classify;
use crate::errors::{Error, Result};
use crate::models::{Category, Operation, OperationType, Segment, YearMonth};

/// Sums for one period, by operation type and by segment.
///
/// Segment totals only include operations whose category resolves to a
/// segment, so `needs_total + wants_total` can be less than `expense_total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub savings_total: Decimal,
    pub needs_total: Decimal,
    pub wants_total: Decimal,
    pub savings_segment_total: Decimal,
}

impl PeriodTotals {
    pub fn type_total(&self, kind: OperationType) -> Decimal {
        match kind {
            OperationType::Income => self.income_total,
            OperationType::Expense => self.expense_total,
            OperationType::Savings => self.savings_total,
        }
    }

    pub fn segment_total(&self, segment: Segment) -> Decimal {
        match segment {
            Segment::Needs => self.needs_total,
            Segment::Wants => self.wants_total,
            Segment::Savings => self.savings_segment_total,
        }
    }

    /// Amount of `kind` that is not attributed to any segment.
    pub fn unclassified(&self, kind: OperationType) -> Decimal {
        match kind {
            OperationType::Income => self.income_total,
            OperationType::Expense => self
                .expense_total
                .saturating_sub(self.needs_total)
                .saturating_sub(self.wants_total),
            OperationType::Savings => self.savings_total.saturating_sub(self.savings_segment_total),
        }
    }

    /// Income left after expenses and savings contributions.
    pub fn net(&self) -> Decimal {
        self.income_total
            .saturating_sub(self.expense_total)
            .saturating_sub(self.savings_total)
    }

    fn add(&mut self, op: &Operation, segment: Option<Segment>) -> Result<()> {
        let type_total = match op.kind {
            OperationType::Income => &mut self.income_total,
            OperationType::Expense => &mut self.expense_total,
            OperationType::Savings => &mut self.savings_total,
        };
        accumulate(type_total, op)?;
        let segment_total = match segment {
            Some(Segment::Needs) => &mut self.needs_total,
            Some(Segment::Wants) => &mut self.wants_total,
            Some(Segment::Savings) => &mut self.savings_segment_total,
            None => return Ok(()),
        };
        accumulate(segment_total, op)
    }
}

fn accumulate(total: &mut Decimal, op: &Operation) -> Result<()> {
    *total = total.checked_add(op.amount).ok_or_else(|| {
        Error::AmountOverflow(format!("adding {} {} on {}", op.kind, op.amount, op.date))
    })?;
    Ok(())
}

/// Total a period's operations. The caller is responsible for date filtering.
/// Fails with [`Error::AmountOverflow`] if a sum leaves the `Decimal` range.
pub fn aggregate(
    operations: &[Operation],
    categories_by_id: &HashMap<i64, Category>,
) -> Result<PeriodTotals> {
    let mut totals = PeriodTotals::default();
    for op in operations {
        totals.add(op, classify(op, categories_by_id))?;
    }
    Ok(totals)
}

/// Same as [`aggregate`], bucketed by calendar month. Months with no
/// operations are absent from the map.
pub fn aggregate_by_month(
    operations: &[Operation],
    categories_by_id: &HashMap<i64, Category>,
) -> Result<BTreeMap<YearMonth, PeriodTotals>> {
    let mut months: BTreeMap<YearMonth, PeriodTotals> = BTreeMap::new();
    for op in operations {
        months
            .entry(YearMonth::from_date(op.date))
            .or_default()
            .add(op, classify(op, categories_by_id))?;
    }
    Ok(months)
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
