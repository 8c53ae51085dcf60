//! Repository boundary consumed by the managers.
//!
//! Every call either completes or fails with an [`Error`](crate::error::Error);
//! a failed write is treated as never having happened.

use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{Category, Expense, PaymentMode, Priority};

/// Durable storage of categories, keyed by a store-assigned id.
pub(crate) trait CategoryStore {
    /// Insert a category and return the id assigned to it.
    fn insert_category(&self, category: &Category) -> Result<i64>;

    /// Overwrite the stored row with the same id. Fails with `NotFound` if
    /// no row has that id.
    fn update_category(&self, category: &Category) -> Result<()>;

    fn delete_category(&self, id: i64) -> Result<()>;

    fn get_category(&self, id: i64) -> Result<Option<Category>>;

    fn list_categories(&self) -> Result<Vec<Category>>;

    fn list_active_categories(&self) -> Result<Vec<Category>>;

    fn list_categories_by_priority(&self, priority: Priority) -> Result<Vec<Category>>;

    /// Categories whose linked expenses sum to strictly more than their limit.
    fn list_over_budget_categories(&self) -> Result<Vec<Category>>;
}

/// Durable storage of expenses, keyed by a store-assigned id.
pub(crate) trait ExpenseStore {
    fn insert_expense(&self, expense: &Expense) -> Result<i64>;

    fn update_expense(&self, expense: &Expense) -> Result<()>;

    fn delete_expense(&self, id: i64) -> Result<()>;

    fn get_expense(&self, id: i64) -> Result<Option<Expense>>;

    fn list_expenses(&self) -> Result<Vec<Expense>>;

    /// `true` lists recurring expenses, `false` one-time ones.
    fn list_expenses_by_recurrence(&self, recurring: bool) -> Result<Vec<Expense>>;

    fn list_expenses_by_category(&self, category_id: i64) -> Result<Vec<Expense>>;

    fn list_expenses_by_mode(&self, mode: PaymentMode) -> Result<Vec<Expense>>;

    fn count_expenses_by_category(&self, category_id: i64) -> Result<usize>;

    fn category_exists(&self, category_id: i64) -> Result<bool>;

    /// Total spend per category id, for every category with at least one expense.
    fn totals_by_category(&self) -> Result<Vec<(i64, Decimal)>>;
}
