#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use std::cell::Cell;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Category, Expense, PaymentMode, Priority};
use crate::store::{CategoryStore, ExpenseStore};

/// In-memory database that can be told to fail, and that counts deletes.
pub(super) struct FlakyStore {
    db: Database,
    pub(super) fail_writes: Cell<bool>,
    pub(super) fail_reads: Cell<bool>,
    pub(super) deletes: Cell<usize>,
}

impl FlakyStore {
    pub(super) fn new() -> Self {
        Self {
            db: Database::open_in_memory().unwrap(),
            fail_writes: Cell::new(false),
            fail_reads: Cell::new(false),
            deletes: Cell::new(0),
        }
    }

    fn write(&self) -> Result<()> {
        if self.fail_writes.get() {
            return Err(Error::DataAccess("store unavailable".into()));
        }
        Ok(())
    }

    fn read(&self) -> Result<()> {
        if self.fail_reads.get() {
            return Err(Error::DataAccess("store unavailable".into()));
        }
        Ok(())
    }
}

impl CategoryStore for FlakyStore {
    fn insert_category(&self, category: &Category) -> Result<i64> {
        self.write()?;
        self.db.insert_category(category)
    }

    fn update_category(&self, category: &Category) -> Result<()> {
        self.write()?;
        self.db.update_category(category)
    }

    fn delete_category(&self, id: i64) -> Result<()> {
        self.deletes.set(self.deletes.get() + 1);
        self.write()?;
        self.db.delete_category(id)
    }

    fn get_category(&self, id: i64) -> Result<Option<Category>> {
        self.read()?;
        self.db.get_category(id)
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        self.read()?;
        self.db.list_categories()
    }

    fn list_active_categories(&self) -> Result<Vec<Category>> {
        self.read()?;
        self.db.list_active_categories()
    }

    fn list_categories_by_priority(&self, priority: Priority) -> Result<Vec<Category>> {
        self.read()?;
        self.db.list_categories_by_priority(priority)
    }

    fn list_over_budget_categories(&self) -> Result<Vec<Category>> {
        self.read()?;
        self.db.list_over_budget_categories()
    }
}

impl ExpenseStore for FlakyStore {
    fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        self.write()?;
        self.db.insert_expense(expense)
    }

    fn update_expense(&self, expense: &Expense) -> Result<()> {
        self.write()?;
        self.db.update_expense(expense)
    }

    fn delete_expense(&self, id: i64) -> Result<()> {
        self.deletes.set(self.deletes.get() + 1);
        self.write()?;
        self.db.delete_expense(id)
    }

    fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        self.read()?;
        self.db.get_expense(id)
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.read()?;
        self.db.list_expenses()
    }

    fn list_expenses_by_recurrence(&self, recurring: bool) -> Result<Vec<Expense>> {
        self.read()?;
        self.db.list_expenses_by_recurrence(recurring)
    }

    fn list_expenses_by_category(&self, category_id: i64) -> Result<Vec<Expense>> {
        self.read()?;
        self.db.list_expenses_by_category(category_id)
    }

    fn list_expenses_by_mode(&self, mode: PaymentMode) -> Result<Vec<Expense>> {
        self.read()?;
        self.db.list_expenses_by_mode(mode)
    }

    fn count_expenses_by_category(&self, category_id: i64) -> Result<usize> {
        self.read()?;
        self.db.count_expenses_by_category(category_id)
    }

    fn category_exists(&self, category_id: i64) -> Result<bool> {
        self.read()?;
        self.db.category_exists(category_id)
    }

    fn totals_by_category(&self) -> Result<Vec<(i64, Decimal)>> {
        self.read()?;
        self.db.totals_by_category()
    }
}

pub(super) fn category(name: &str, limit: Decimal, priority: Priority, active: bool) -> Category {
    Category::new(name.into(), limit, priority, active)
}

pub(super) fn expense(title: &str, amount: Decimal, mode: PaymentMode, category_id: i64) -> Expense {
    Expense::new(title.into(), amount, mode, false, category_id)
}
