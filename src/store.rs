use chrono::NaiveDate;

use crate::errors::Result;
use crate::models::{AllocationRule, Category, Operation, OperationType};

/// Read/write access to a user's persisted finance data.
///
/// The engine only consumes what this returns; it never decides where the
/// data lives. [`crate::db::SqliteStore`] is the bundled implementation.
pub trait FinanceStore {
    /// Operations dated within `start..=end`, optionally of a single type.
    fn fetch_operations(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        kind: Option<OperationType>,
    ) -> Result<Vec<Operation>>;

    fn fetch_categories(&self, user_id: &str) -> Result<Vec<Category>>;

    /// The user's stored rule, or [`AllocationRule::DEFAULT`] when none is stored.
    fn load_rule(&self, user_id: &str) -> Result<AllocationRule>;

    /// Persist a rule as-is. Callers validate first; see
    /// [`crate::engine::RuleEditor::save`].
    fn save_rule(&self, user_id: &str, rule: &AllocationRule) -> Result<()>;
}
