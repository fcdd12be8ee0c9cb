pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id   TEXT NOT NULL,
    name      TEXT NOT NULL,
    kind      TEXT NOT NULL CHECK (kind IN ('income', 'expense', 'savings')),
    segment   TEXT CHECK (segment IS NULL OR segment IN ('needs', 'wants', 'savings')),
    UNIQUE(user_id, name)
);

CREATE TABLE IF NOT EXISTS operations (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      TEXT NOT NULL,
    kind         TEXT NOT NULL CHECK (kind IN ('income', 'expense', 'savings')),
    amount       TEXT NOT NULL,
    concept      TEXT NOT NULL,
    description  TEXT,
    date         TEXT NOT NULL,
    category_id  INTEGER REFERENCES categories(id) ON DELETE SET NULL,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_operations_user_date ON operations(user_id, date);
CREATE INDEX IF NOT EXISTS idx_operations_category ON operations(category_id);

CREATE TABLE IF NOT EXISTS allocation_rules (
    user_id          TEXT PRIMARY KEY,
    needs_percent    INTEGER NOT NULL,
    wants_percent    INTEGER NOT NULL,
    savings_percent  INTEGER NOT NULL,
    updated_at       TEXT NOT NULL
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];

/// Categories every new user starts with: (name, kind, segment).
pub(crate) const DEFAULT_CATEGORIES: &[(&str, &str, Option<&str>)] = &[
    ("Salary", "income", None),
    ("Freelance", "income", None),
    ("Other Income", "income", None),
    ("Rent/Mortgage", "expense", Some("needs")),
    ("Groceries", "expense", Some("needs")),
    ("Utilities", "expense", Some("needs")),
    ("Insurance", "expense", Some("needs")),
    ("Transportation", "expense", Some("needs")),
    ("Health", "expense", Some("needs")),
    ("Restaurants", "expense", Some("wants")),
    ("Entertainment", "expense", Some("wants")),
    ("Shopping", "expense", Some("wants")),
    ("Subscriptions", "expense", Some("wants")),
    ("Travel", "expense", Some("wants")),
    ("Emergency Fund", "savings", Some("savings")),
    ("Investments", "savings", Some("savings")),
    ("Retirement", "savings", Some("savings")),
];
