//! Budget allocation rules and period totals.
//!
//! Everything here except [`RuleEditor`] is a pure function of its inputs.

mod aggregate;
mod editor;
mod evaluate;
mod rules;
mod segment;

pub use aggregate::{aggregate, aggregate_by_month, PeriodTotals};
pub use editor::RuleEditor;
pub use evaluate::{delta_percent, evaluate, planned_amount, Evaluation, SegmentEvaluation};
pub use rules::{validate, RuleValidation};
pub use segment::{classify, index_categories, segment_of};
