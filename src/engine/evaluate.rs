use rust_decimal::Decimal;

use super::aggregate::PeriodTotals;
use crate::errors::{Error, Result};
use crate::models::{AllocationRule, Segment};

/// Planned versus actual for one segment.
///
/// `delta_percent` is `None` when nothing was planned for the segment
/// (planned amount is zero or negative); a percentage is undefined there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentEvaluation {
    pub segment: Segment,
    pub percent: u8,
    pub planned: Decimal,
    pub actual: Decimal,
    pub delta_percent: Option<Decimal>,
}

impl SegmentEvaluation {
    /// Actual minus planned, in money.
    pub fn difference(&self) -> Decimal {
        self.actual.saturating_sub(self.planned)
    }

    pub fn is_over(&self) -> bool {
        self.actual > self.planned
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub needs: SegmentEvaluation,
    pub wants: SegmentEvaluation,
    pub savings: SegmentEvaluation,
}

impl Evaluation {
    pub fn get(&self, segment: Segment) -> &SegmentEvaluation {
        match segment {
            Segment::Needs => &self.needs,
            Segment::Wants => &self.wants,
            Segment::Savings => &self.savings,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentEvaluation> {
        [&self.needs, &self.wants, &self.savings].into_iter()
    }
}

/// Project a rule onto a period. Planned amounts scale with the period's
/// income, not with a fixed budget.
pub fn evaluate(rule: &AllocationRule, totals: &PeriodTotals) -> Result<Evaluation> {
    let project = |segment: Segment| -> Result<SegmentEvaluation> {
        let percent = rule.percent_for(segment);
        let planned = planned_amount(totals.income_total, percent).ok_or_else(|| {
            Error::AmountOverflow(format!("planning {percent}% of {}", totals.income_total))
        })?;
        let actual = totals.segment_total(segment);
        Ok(SegmentEvaluation {
            segment,
            percent,
            planned,
            actual,
            delta_percent: delta_percent(actual, planned),
        })
    };
    Ok(Evaluation {
        needs: project(Segment::Needs)?,
        wants: project(Segment::Wants)?,
        savings: project(Segment::Savings)?,
    })
}

/// `income * percent / 100`, or `None` if the product leaves the `Decimal` range.
pub fn planned_amount(income: Decimal, percent: u8) -> Option<Decimal> {
    income
        .checked_mul(Decimal::from(percent))?
        .checked_div(Decimal::ONE_HUNDRED)
}

/// `(actual - planned) / planned * 100`, or `None` unless `planned > 0`.
pub fn delta_percent(actual: Decimal, planned: Decimal) -> Option<Decimal> {
    if planned <= Decimal::ZERO {
        return None;
    }
    actual
        .checked_sub(planned)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_div(planned)
        .map(|d| d.normalize())
}

#[cfg(test)]
#[path = "evaluate_tests.rs"]
mod tests;
