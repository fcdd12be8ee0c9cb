use crate::models::AllocationRule;

/// Outcome of checking an allocation rule. `delta` is how many points are
/// missing (positive) or over-allocated (negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleValidation {
    pub is_valid: bool,
    pub total: i32,
    pub delta: i32,
}

pub fn validate(rule: &AllocationRule) -> RuleValidation {
    let total = rule.total();
    RuleValidation {
        is_valid: total == 100,
        total,
        delta: 100 - total,
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
