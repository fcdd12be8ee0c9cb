#![allow(clippy::unwrap_used)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use chrono::NaiveDate;

use super::*;
use crate::models::{Category, Operation, OperationType};

/// In-memory store that counts writes and can be told to fail them.
#[derive(Default)]
struct MemoryStore {
    rules: RefCell<HashMap<String, AllocationRule>>,
    saves: Cell<usize>,
    fail_saves: Cell<bool>,
}

impl FinanceStore for MemoryStore {
    fn fetch_operations(
        &self,
        _user_id: &str,
        _start: NaiveDate,
        _end: NaiveDate,
        _kind: Option<OperationType>,
    ) -> Result<Vec<Operation>> {
        Ok(Vec::new())
    }

    fn fetch_categories(&self, _user_id: &str) -> Result<Vec<Category>> {
        Ok(Vec::new())
    }

    fn load_rule(&self, user_id: &str) -> Result<AllocationRule> {
        Ok(self
            .rules
            .borrow()
            .get(user_id)
            .copied()
            .unwrap_or_default())
    }

    fn save_rule(&self, user_id: &str, rule: &AllocationRule) -> Result<()> {
        self.saves.set(self.saves.get() + 1);
        if self.fail_saves.get() {
            return Err(Error::Io(std::io::Error::other("store offline")));
        }
        self.rules.borrow_mut().insert(user_id.to_string(), *rule);
        Ok(())
    }
}

// ── Load ──────────────────────────────────────────────────────

#[test]
fn test_load_defaults_when_absent() {
    let store = MemoryStore::default();
    let editor = RuleEditor::load(&store, "alice").unwrap();
    assert_eq!(editor.rule(), AllocationRule::new(50, 30, 20));
    assert_eq!(editor.user_id(), "alice");
    assert!(!editor.is_dirty());
}

#[test]
fn test_load_stored_rule() {
    let store = MemoryStore::default();
    store
        .rules
        .borrow_mut()
        .insert("alice".into(), AllocationRule::new(60, 20, 20));
    let editor = RuleEditor::load(&store, "alice").unwrap();
    assert_eq!(editor.rule(), AllocationRule::new(60, 20, 20));
    assert!(!editor.is_dirty());
}

// ── Dirty flag ────────────────────────────────────────────────

#[test]
fn test_dirty_after_change() {
    let store = MemoryStore::default();
    let mut editor = RuleEditor::load(&store, "alice").unwrap();
    editor.set_percent(Segment::Needs, 55);
    assert!(editor.is_dirty());
    assert!(!editor.validation().is_valid);
    assert_eq!(editor.validation().delta, -5);
}

#[test]
fn test_not_dirty_when_changed_back() {
    let store = MemoryStore::default();
    let mut editor = RuleEditor::load(&store, "alice").unwrap();
    editor.set_percent(Segment::Wants, 10);
    assert!(editor.is_dirty());
    editor.set_percent(Segment::Wants, 30);
    assert!(!editor.is_dirty());
}

#[test]
fn test_discard_restores_persisted() {
    let store = MemoryStore::default();
    let mut editor = RuleEditor::load(&store, "alice").unwrap();
    editor.set_rule(AllocationRule::new(70, 10, 20));
    editor.discard();
    assert_eq!(editor.rule(), AllocationRule::default());
    assert!(!editor.is_dirty());
}

// ── Save ──────────────────────────────────────────────────────

#[test]
fn test_save_round_trip() {
    let store = MemoryStore::default();
    let mut editor = RuleEditor::load(&store, "alice").unwrap();
    editor.set_rule(AllocationRule::new(40, 30, 30));
    assert!(editor.is_dirty());
    editor.save(&store).unwrap();
    assert!(!editor.is_dirty());
    assert_eq!(editor.persisted(), AllocationRule::new(40, 30, 30));

    let reloaded = RuleEditor::load(&store, "alice").unwrap();
    assert_eq!(reloaded.rule(), AllocationRule::new(40, 30, 30));
    assert!(!reloaded.is_dirty());
}

#[test]
fn test_invalid_rule_never_reaches_store() {
    let store = MemoryStore::default();
    let mut editor = RuleEditor::load(&store, "alice").unwrap();
    editor.set_rule(AllocationRule::new(50, 30, 30));
    let err = editor.save(&store).unwrap_err();
    assert!(matches!(err, Error::InvalidRule { total: 110, .. }));
    assert_eq!(store.saves.get(), 0);
    assert!(editor.is_dirty());
    assert_eq!(store.load_rule("alice").unwrap(), AllocationRule::default());
}

#[test]
fn test_failed_save_stays_dirty() {
    let store = MemoryStore::default();
    store.fail_saves.set(true);
    let mut editor = RuleEditor::load(&store, "alice").unwrap();
    editor.set_rule(AllocationRule::new(40, 40, 20));
    assert!(editor.save(&store).is_err());
    assert_eq!(store.saves.get(), 1);
    assert!(editor.is_dirty());
    assert_eq!(editor.persisted(), AllocationRule::default());
}

#[test]
fn test_save_unchanged_rule() {
    let store = MemoryStore::default();
    let mut editor = RuleEditor::load(&store, "alice").unwrap();
    editor.save(&store).unwrap();
    assert_eq!(store.saves.get(), 1);
    assert!(!editor.is_dirty());
}

#[test]
fn test_reload_picks_up_other_session() {
    let store = MemoryStore::default();
    let mut first = RuleEditor::load(&store, "alice").unwrap();
    let mut second = RuleEditor::load(&store, "alice").unwrap();
    second.set_rule(AllocationRule::new(45, 35, 20));
    second.save(&store).unwrap();

    first.set_percent(Segment::Needs, 10);
    first.reload(&store).unwrap();
    assert_eq!(first.rule(), AllocationRule::new(45, 35, 20));
    assert!(!first.is_dirty());
}

#[test]
fn test_users_are_isolated() {
    let store = MemoryStore::default();
    let mut alice = RuleEditor::load(&store, "alice").unwrap();
    alice.set_rule(AllocationRule::new(80, 10, 10));
    alice.save(&store).unwrap();
    let bob = RuleEditor::load(&store, "bob").unwrap();
    assert_eq!(bob.rule(), AllocationRule::default());
}
