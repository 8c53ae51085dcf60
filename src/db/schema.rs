pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    monthly_limit TEXT NOT NULL,
    priority      TEXT NOT NULL CHECK (priority IN ('H', 'M', 'L')),
    is_active     BOOLEAN NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS expenses (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    amount       TEXT NOT NULL,
    mode         TEXT NOT NULL CHECK (mode IN ('C', 'D', 'B')),
    is_recurring BOOLEAN NOT NULL DEFAULT 0,
    category_id  INTEGER NOT NULL REFERENCES categories(id)
);

CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category_id);
CREATE INDEX IF NOT EXISTS idx_expenses_mode ON expenses(mode);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;
