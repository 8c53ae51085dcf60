mod schema;

use anyhow::Context;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::{CategoryStore, ExpenseStore};

const CATEGORY_COLUMNS: &str = "id, name, monthly_limit, priority, is_active";
const EXPENSE_COLUMNS: &str = "id, title, amount, mode, is_recurring, category_id";

/// SQLite-backed store for categories and expenses.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Version 1 is the only schema so far: a fresh file gets it, and an
    /// existing file must already be at that version.
    fn migrate(&self) -> anyhow::Result<()> {
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
            tracing::info!(version = schema::CURRENT_VERSION, "database schema created");
            return Ok(());
        }

        let version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .context("Failed to read schema version")?;
        if version != schema::CURRENT_VERSION {
            anyhow::bail!(
                "Unsupported schema version {version} (this build reads version {})",
                schema::CURRENT_VERSION
            );
        }
        Ok(())
    }

    fn query_categories<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, category_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn query_expenses<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Amounts are stored as TEXT, so they are summed here in `Decimal`
    /// rather than by SQLite's floating-point SUM.
    fn spend_by_category(&self) -> Result<BTreeMap<i64, Decimal>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category_id, amount FROM expenses ORDER BY id")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, decimal_at(row, 1)?)))?;

        let mut totals = BTreeMap::new();
        for row in rows {
            let (category_id, amount) = row?;
            *totals.entry(category_id).or_insert(Decimal::ZERO) += amount;
        }
        Ok(totals)
    }
}

// ── Categories ────────────────────────────────────────────

impl CategoryStore for Database {
    fn insert_category(&self, category: &Category) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO categories (name, monthly_limit, priority, is_active)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                category.name,
                category.monthly_limit.to_string(),
                category.priority.code().to_string(),
                category.active,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, name = %category.name, "category inserted");
        Ok(id)
    }

    fn update_category(&self, category: &Category) -> Result<()> {
        let id = category
            .id
            .ok_or_else(|| Error::validation("Category has no id"))?;
        let changed = self.conn.execute(
            "UPDATE categories SET name = ?1, monthly_limit = ?2, priority = ?3, is_active = ?4
             WHERE id = ?5",
            params![
                category.name,
                category.monthly_limit.to_string(),
                category.priority.code().to_string(),
                category.active,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::category_not_found(id));
        }
        Ok(())
    }

    fn delete_category(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(Error::category_not_found(id));
        }
        tracing::debug!(id, "category deleted");
        Ok(())
    }

    fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
            params![id],
            category_from_row,
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        self.query_categories(
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id"),
            [],
        )
    }

    fn list_active_categories(&self) -> Result<Vec<Category>> {
        self.query_categories(
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE is_active = 1 ORDER BY id"),
            [],
        )
    }

    fn list_categories_by_priority(&self, priority: Priority) -> Result<Vec<Category>> {
        self.query_categories(
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE priority = ?1 ORDER BY id"),
            params![priority.code().to_string()],
        )
    }

    fn list_over_budget_categories(&self) -> Result<Vec<Category>> {
        let spent = self.spend_by_category()?;
        Ok(self
            .list_categories()?
            .into_iter()
            .filter(|c| {
                c.id.and_then(|id| spent.get(&id))
                    .is_some_and(|total| c.is_over_budget(*total))
            })
            .collect())
    }
}

// ── Expenses ──────────────────────────────────────────────

impl ExpenseStore for Database {
    fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (title, amount, mode, is_recurring, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                expense.title,
                expense.amount.to_string(),
                expense.mode.code().to_string(),
                expense.recurring,
                expense.category_id,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, title = %expense.title, "expense inserted");
        Ok(id)
    }

    fn update_expense(&self, expense: &Expense) -> Result<()> {
        let id = expense
            .id
            .ok_or_else(|| Error::validation("Expense has no id"))?;
        let changed = self.conn.execute(
            "UPDATE expenses SET title = ?1, amount = ?2, mode = ?3, is_recurring = ?4, category_id = ?5
             WHERE id = ?6",
            params![
                expense.title,
                expense.amount.to_string(),
                expense.mode.code().to_string(),
                expense.recurring,
                expense.category_id,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::expense_not_found(id));
        }
        Ok(())
    }

    fn delete_expense(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(Error::expense_not_found(id));
        }
        tracing::debug!(id, "expense deleted");
        Ok(())
    }

    fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let result = self.conn.query_row(
            &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1"),
            params![id],
            expense_from_row,
        );
        match result {
            Ok(e) => Ok(Some(e)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.query_expenses(
            &format!("SELECT {EXPENSE_COLUMNS} FROM expenses ORDER BY id"),
            [],
        )
    }

    fn list_expenses_by_recurrence(&self, recurring: bool) -> Result<Vec<Expense>> {
        self.query_expenses(
            &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE is_recurring = ?1 ORDER BY id"),
            params![recurring],
        )
    }

    fn list_expenses_by_category(&self, category_id: i64) -> Result<Vec<Expense>> {
        self.query_expenses(
            &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE category_id = ?1 ORDER BY id"),
            params![category_id],
        )
    }

    fn list_expenses_by_mode(&self, mode: PaymentMode) -> Result<Vec<Expense>> {
        self.query_expenses(
            &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE mode = ?1 ORDER BY id"),
            params![mode.code().to_string()],
        )
    }

    fn count_expenses_by_category(&self, category_id: i64) -> Result<usize> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE category_id = ?1",
            params![category_id],
            |row| row.get(0),
        )?)
    }

    fn category_exists(&self, category_id: i64) -> Result<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)",
            params![category_id],
            |row| row.get(0),
        )?)
    }

    fn totals_by_category(&self) -> Result<Vec<(i64, Decimal)>> {
        Ok(self.spend_by_category()?.into_iter().collect())
    }
}

// ── Row mapping ───────────────────────────────────────────

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    let code = code_at(row, 3)?;
    let priority = Priority::from_code(code)
        .ok_or_else(|| conversion_error(3, format!("unknown priority code '{code}'")))?;
    Ok(Category {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        monthly_limit: decimal_at(row, 2)?,
        priority,
        active: row.get(4)?,
    })
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let code = code_at(row, 3)?;
    let mode = PaymentMode::from_code(code)
        .ok_or_else(|| conversion_error(3, format!("unknown payment mode code '{code}'")))?;
    Ok(Expense {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        amount: decimal_at(row, 2)?,
        mode,
        recurring: row.get(4)?,
        category_id: row.get(5)?,
    })
}

fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn code_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<char> {
    let raw: String = row.get(idx)?;
    raw.chars()
        .next()
        .ok_or_else(|| conversion_error(idx, "empty code".to_string()))
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}
