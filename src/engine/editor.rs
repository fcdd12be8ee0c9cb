use tracing::{debug, info, warn};

use super::rules::{validate, RuleValidation};
use crate::errors::{Error, Result};
use crate::models::{AllocationRule, Segment};
use crate::store::FinanceStore;

/// An editing session for one user's allocation rule.
///
/// Tracks the last persisted rule next to the in-memory one; the session is
/// dirty whenever the two differ.
#[derive(Debug, Clone)]
pub struct RuleEditor {
    user_id: String,
    persisted: AllocationRule,
    current: AllocationRule,
}

impl RuleEditor {
    pub fn load<S: FinanceStore + ?Sized>(store: &S, user_id: &str) -> Result<Self> {
        let rule = store.load_rule(user_id)?;
        debug!(user = user_id, %rule, "loaded allocation rule");
        Ok(Self {
            user_id: user_id.to_string(),
            persisted: rule,
            current: rule,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn rule(&self) -> AllocationRule {
        self.current
    }

    pub fn persisted(&self) -> AllocationRule {
        self.persisted
    }

    pub fn set_rule(&mut self, rule: AllocationRule) {
        self.current = rule;
    }

    pub fn set_percent(&mut self, segment: Segment, value: u8) {
        self.current.set_percent(segment, value);
    }

    pub fn validation(&self) -> RuleValidation {
        validate(&self.current)
    }

    pub fn is_dirty(&self) -> bool {
        self.current != self.persisted
    }

    /// Drop in-memory edits.
    pub fn discard(&mut self) {
        self.current = self.persisted;
    }

    /// Re-read the stored rule, dropping in-memory edits.
    pub fn reload<S: FinanceStore + ?Sized>(&mut self, store: &S) -> Result<()> {
        let rule = store.load_rule(&self.user_id)?;
        self.persisted = rule;
        self.current = rule;
        Ok(())
    }

    /// Persist the current rule. An invalid rule is refused before the store
    /// is touched, and the session stays dirty.
    pub fn save<S: FinanceStore + ?Sized>(&mut self, store: &S) -> Result<()> {
        let validation = self.validation();
        if !validation.is_valid {
            warn!(
                user = %self.user_id,
                rule = %self.current,
                total = validation.total,
                "refusing to save allocation rule"
            );
            return Err(Error::InvalidRule {
                rule: self.current,
                total: validation.total,
            });
        }
        store.save_rule(&self.user_id, &self.current)?;
        self.persisted = self.current;
        info!(user = %self.user_id, rule = %self.current, "saved allocation rule");
        Ok(())
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod tests;
