//! BudgetRule: 50/30/20 allocation rules, period totals and actual-vs-planned
//! figures for a personal finance tracker.

pub mod config;
pub mod db;
pub mod engine;
pub mod errors;
pub mod format;
pub mod models;
pub mod report;
pub mod store;
