use std::collections::HashMap;

use crate::models::{Category, Operation, OperationType, Segment};

/// Segment a category belongs to. Income never has one; expense and savings
/// categories without a stored segment are unclassified.
pub fn segment_of(category: &Category) -> Option<Segment> {
    match category.kind {
        OperationType::Income => None,
        OperationType::Expense | OperationType::Savings => category.segment,
    }
}

/// Whether an operation of `kind` may count towards `segment`. Expenses feed
/// needs and wants; savings contributions feed savings.
fn accepts(kind: OperationType, segment: Segment) -> bool {
    matches!(
        (kind, segment),
        (OperationType::Expense, Segment::Needs)
            | (OperationType::Expense, Segment::Wants)
            | (OperationType::Savings, Segment::Savings)
    )
}

/// Resolve the segment an operation is counted under, if any.
///
/// Returns `None` when the operation has no category, the category id is not
/// in `categories_by_id`, the category is unclassified, or the category's
/// segment cannot hold an operation of this type.
pub fn classify(op: &Operation, categories_by_id: &HashMap<i64, Category>) -> Option<Segment> {
    let category = categories_by_id.get(&op.category_id?)?;
    segment_of(category).filter(|seg| accepts(op.kind, *seg))
}

/// Index categories by id. Categories that were never stored (no id) are skipped.
pub fn index_categories(categories: &[Category]) -> HashMap<i64, Category> {
    categories
        .iter()
        .filter_map(|c| c.id.map(|id| (id, c.clone())))
        .collect()
}

#[cfg(test)]
#[path = "segment_tests.rs"]
mod tests;
