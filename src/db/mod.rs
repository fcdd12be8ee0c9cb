mod schema;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::errors::{Error, Result};
use crate::models::*;
use crate::store::FinanceStore;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest amount a single operation may carry, in whole currency units.
/// Keeps period sums and planned amounts far inside the `Decimal` range.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// SQLite-backed [`FinanceStore`]. Every row is owned by a user id.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let mut store = Self { conn };
        store.migrate()?;
        debug!(path = %path.display(), "opened database");
        Ok(store)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            info!(version = schema::CURRENT_VERSION, "created database schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                debug!(from_version, "applying migration");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    /// Give a user the default category set. Does nothing if the user already
    /// has categories; returns how many were created.
    pub fn seed_default_categories(&mut self, user_id: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        if count > 0 {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        let mut created = 0;
        for (name, kind, segment) in schema::DEFAULT_CATEGORIES {
            created += tx.execute(
                "INSERT OR IGNORE INTO categories (user_id, name, kind, segment) VALUES (?1, ?2, ?3, ?4)",
                params![user_id, name, kind, segment],
            )?;
        }
        tx.commit()?;
        info!(user = user_id, created, "seeded default categories");
        Ok(created)
    }

    // ── Operations ────────────────────────────────────────────

    /// Store a new operation. The amount must be within `0..=MAX_AMOUNT` and
    /// the category, if any, must belong to `user_id`.
    pub fn insert_operation(&self, user_id: &str, op: &Operation) -> Result<i64> {
        ensure_valid_amount(op.amount)?;
        self.ensure_category_owned(user_id, op.category_id)?;
        self.conn.execute(
            "INSERT INTO operations (user_id, kind, amount, concept, description, date, category_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user_id,
                op.kind.as_str(),
                op.amount.to_string(),
                op.concept,
                op.description,
                op.date.format(DATE_FORMAT).to_string(),
                op.category_id,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(user = user_id, id, kind = %op.kind, "inserted operation");
        Ok(id)
    }

    pub fn get_operation(&self, user_id: &str, id: i64) -> Result<Option<Operation>> {
        let result = self.conn.query_row(
            "SELECT id, kind, amount, concept, description, date, category_id
             FROM operations WHERE user_id = ?1 AND id = ?2",
            params![user_id, id],
            OperationRow::from_row,
        );
        match result {
            Ok(row) => Ok(Some(row.into_operation()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace every field of an existing operation.
    pub fn update_operation(&self, user_id: &str, id: i64, op: &Operation) -> Result<()> {
        ensure_valid_amount(op.amount)?;
        self.ensure_category_owned(user_id, op.category_id)?;
        let changed = self.conn.execute(
            "UPDATE operations
             SET kind = ?1, amount = ?2, concept = ?3, description = ?4, date = ?5, category_id = ?6
             WHERE user_id = ?7 AND id = ?8",
            params![
                op.kind.as_str(),
                op.amount.to_string(),
                op.concept,
                op.description,
                op.date.format(DATE_FORMAT).to_string(),
                op.category_id,
                user_id,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound {
                kind: "operation",
                id,
            });
        }
        debug!(user = user_id, id, "updated operation");
        Ok(())
    }

    /// Permanently remove an operation.
    pub fn delete_operation(&self, user_id: &str, id: i64) -> Result<()> {
        let changed = self.conn.execute(
            "DELETE FROM operations WHERE user_id = ?1 AND id = ?2",
            params![user_id, id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound {
                kind: "operation",
                id,
            });
        }
        debug!(user = user_id, id, "deleted operation");
        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    fn ensure_category_owned(&self, user_id: &str, category_id: Option<i64>) -> Result<()> {
        let Some(id) = category_id else {
            return Ok(());
        };
        let owned: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE user_id = ?1 AND id = ?2)",
            params![user_id, id],
            |row| row.get(0),
        )?;
        if !owned {
            return Err(Error::NotFound {
                kind: "category",
                id,
            });
        }
        Ok(())
    }

    pub fn insert_category(&self, user_id: &str, cat: &Category) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO categories (user_id, name, kind, segment) VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                cat.name,
                cat.kind.as_str(),
                cat.segment.map(|s| s.as_str()),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Remove a category. Its operations stay, without a category.
    pub fn delete_category(&self, user_id: &str, id: i64) -> Result<()> {
        let changed = self.conn.execute(
            "DELETE FROM categories WHERE user_id = ?1 AND id = ?2",
            params![user_id, id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound {
                kind: "category",
                id,
            });
        }
        Ok(())
    }
}

impl FinanceStore for SqliteStore {
    fn fetch_operations(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        kind: Option<OperationType>,
    ) -> Result<Vec<Operation>> {
        let mut sql = String::from(
            "SELECT id, kind, amount, concept, description, date, category_id
             FROM operations WHERE user_id = ?1 AND date >= ?2 AND date <= ?3",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![
            Box::new(user_id.to_string()),
            Box::new(start.format(DATE_FORMAT).to_string()),
            Box::new(end.format(DATE_FORMAT).to_string()),
        ];
        if let Some(k) = kind {
            sql.push_str(&format!(" AND kind = ?{}", param_values.len() + 1));
            param_values.push(Box::new(k.as_str()));
        }
        sql.push_str(" ORDER BY date, id");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_ref.as_slice(), OperationRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(OperationRow::into_operation).collect()
    }

    fn fetch_categories(&self, user_id: &str) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, kind, segment FROM categories WHERE user_id = ?1 ORDER BY name",
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, name, kind, segment)| -> Result<Category> {
                let segment = match segment {
                    Some(s) => Some(
                        Segment::parse(&s)
                            .ok_or_else(|| Error::Corrupt(format!("category {id} segment '{s}'")))?,
                    ),
                    None => None,
                };
                Ok(Category {
                    id: Some(id),
                    name,
                    kind: parse_kind(&kind, id)?,
                    segment,
                })
            })
            .collect()
    }

    fn load_rule(&self, user_id: &str) -> Result<AllocationRule> {
        let result = self.conn.query_row(
            "SELECT needs_percent, wants_percent, savings_percent FROM allocation_rules WHERE user_id = ?1",
            params![user_id],
            |row| Ok(AllocationRule::new(row.get(0)?, row.get(1)?, row.get(2)?)),
        );
        match result {
            Ok(rule) => Ok(rule),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(AllocationRule::DEFAULT),
            Err(e) => Err(e.into()),
        }
    }

    fn save_rule(&self, user_id: &str, rule: &AllocationRule) -> Result<()> {
        self.conn.execute(
            "INSERT INTO allocation_rules (user_id, needs_percent, wants_percent, savings_percent, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                needs_percent = excluded.needs_percent,
                wants_percent = excluded.wants_percent,
                savings_percent = excluded.savings_percent,
                updated_at = excluded.updated_at",
            params![
                user_id,
                rule.needs_percent,
                rule.wants_percent,
                rule.savings_percent,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

struct OperationRow {
    id: i64,
    kind: String,
    amount: String,
    concept: String,
    description: Option<String>,
    date: String,
    category_id: Option<i64>,
}

impl OperationRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            amount: row.get(2)?,
            concept: row.get(3)?,
            description: row.get(4)?,
            date: row.get(5)?,
            category_id: row.get(6)?,
        })
    }

    fn into_operation(self) -> Result<Operation> {
        let amount = Decimal::from_str(&self.amount)
            .map_err(|_| Error::Corrupt(format!("operation {} amount '{}'", self.id, self.amount)))?;
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|_| Error::Corrupt(format!("operation {} date '{}'", self.id, self.date)))?;
        Ok(Operation {
            id: Some(self.id),
            kind: parse_kind(&self.kind, self.id)?,
            amount,
            concept: self.concept,
            description: self.description,
            date,
            category_id: self.category_id,
        })
    }
}

fn parse_kind(s: &str, id: i64) -> Result<OperationType> {
    OperationType::parse(s).ok_or_else(|| Error::Corrupt(format!("row {id} type '{s}'")))
}

fn ensure_valid_amount(amount: Decimal) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::NegativeAmount(amount));
    }
    let max = Decimal::from(MAX_AMOUNT);
    if amount > max {
        return Err(Error::AmountTooLarge { amount, max });
    }
    Ok(())
}
