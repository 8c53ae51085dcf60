use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::sorting::{compare_flag, Direction};
use super::{Collection, DataManager};
use crate::error::{Error, Result};
use crate::models::{Expense, PaymentMode};
use crate::store::ExpenseStore;
use crate::util::{percent_of, sum_amounts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExpenseOrder {
    Title,
    Amount(Direction),
    /// Cash, Digital, Bank Transfer.
    Mode,
    /// One-time expenses before recurring ones.
    Recurring,
}

impl ExpenseOrder {
    pub(crate) fn compare(&self, a: &Expense, b: &Expense) -> Ordering {
        match self {
            Self::Title => a.title.cmp(&b.title),
            Self::Amount(direction) => direction.apply(a.amount.cmp(&b.amount)),
            Self::Mode => a.mode.cmp(&b.mode),
            Self::Recurring => compare_flag(a.recurring, b.recurring, false),
        }
    }

    pub(crate) fn parse(key: &str, direction: Direction) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "title" => Some(Self::Title),
            "amount" => Some(Self::Amount(direction)),
            "mode" | "payment-mode" => Some(Self::Mode),
            "recurring" => Some(Self::Recurring),
            _ => None,
        }
    }
}

pub(crate) struct ExpenseManager<'s, S: ?Sized> {
    store: &'s S,
    expenses: Collection<Expense>,
}

impl<'s, S: ExpenseStore + ?Sized> ExpenseManager<'s, S> {
    pub(crate) fn new(store: &'s S) -> Self {
        Self {
            store,
            expenses: Collection::new(),
        }
    }

    pub(crate) fn load_recurring(&mut self) -> Result<()> {
        let rows = self.store.list_expenses_by_recurrence(true)?;
        tracing::debug!(count = rows.len(), "loaded recurring expenses");
        self.repopulate(rows);
        Ok(())
    }

    pub(crate) fn load_non_recurring(&mut self) -> Result<()> {
        let rows = self.store.list_expenses_by_recurrence(false)?;
        tracing::debug!(count = rows.len(), "loaded one-time expenses");
        self.repopulate(rows);
        Ok(())
    }

    pub(crate) fn load_by_category(&mut self, category_id: i64) -> Result<()> {
        let rows = self.store.list_expenses_by_category(category_id)?;
        tracing::debug!(count = rows.len(), category_id, "loaded expenses by category");
        self.repopulate(rows);
        Ok(())
    }

    pub(crate) fn load_by_mode(&mut self, mode: PaymentMode) -> Result<()> {
        let rows = self.store.list_expenses_by_mode(mode)?;
        tracing::debug!(count = rows.len(), %mode, "loaded expenses by payment mode");
        self.repopulate(rows);
        Ok(())
    }

    pub(crate) fn total_amount(&self) -> Decimal {
        sum_amounts(self.expenses.iter().map(|e| e.amount))
    }

    /// Cached spend per payment mode; every mode is present, zero if unused.
    pub(crate) fn totals_by_mode(&self) -> BTreeMap<PaymentMode, Decimal> {
        let mut totals: BTreeMap<PaymentMode, Decimal> = PaymentMode::all()
            .iter()
            .map(|m| (*m, Decimal::ZERO))
            .collect();
        for expense in &self.expenses {
            *totals.entry(expense.mode).or_insert(Decimal::ZERO) += expense.amount;
        }
        totals
    }

    /// Each mode's share of `total_amount`, in percent.
    pub(crate) fn mode_shares(&self) -> BTreeMap<PaymentMode, Decimal> {
        let total = self.total_amount();
        self.totals_by_mode()
            .into_iter()
            .map(|(mode, amount)| (mode, percent_of(amount, total)))
            .collect()
    }

    /// Stored expenses pointing at `category_id`, regardless of what is cached.
    pub(crate) fn count_referencing(&self, category_id: i64) -> Result<usize> {
        self.store.count_expenses_by_category(category_id)
    }

    pub(crate) fn save(&mut self, mut expense: Expense) -> Result<i64> {
        self.check(&expense)?;
        let id = self.store.insert_expense(&expense)?;
        expense.id = Some(id);
        self.expenses.add(expense);
        Ok(id)
    }

    pub(crate) fn update(&mut self, expense: Expense) -> Result<()> {
        let id = expense
            .id
            .ok_or_else(|| Error::validation("Cannot update an expense that was never saved"))?;
        self.check(&expense)?;
        self.store.update_expense(&expense)?;
        self.expenses.replace_where(|e| e.id == Some(id), expense);
        Ok(())
    }

    pub(crate) fn delete(&mut self, expense: &Expense) -> Result<()> {
        let id = expense
            .id
            .ok_or_else(|| Error::validation("Cannot delete an expense that was never saved"))?;
        self.store.delete_expense(id)?;
        self.expenses.remove_where(|e| e.id == Some(id));
        Ok(())
    }

    pub(crate) fn find(&self, id: i64) -> Option<&Expense> {
        self.expenses.find(|e| e.id == Some(id))
    }

    fn check(&self, expense: &Expense) -> Result<()> {
        expense.validate()?;
        if !self.store.category_exists(expense.category_id)? {
            return Err(Error::validation(format!(
                "Category {} does not exist",
                expense.category_id
            )));
        }
        Ok(())
    }
}

impl<S: ExpenseStore + ?Sized> DataManager for ExpenseManager<'_, S> {
    type Item = Expense;

    fn collection(&self) -> &Collection<Expense> {
        &self.expenses
    }

    fn collection_mut(&mut self) -> &mut Collection<Expense> {
        &mut self.expenses
    }

    fn load_data(&mut self) -> Result<()> {
        let rows = self.store.list_expenses()?;
        tracing::debug!(count = rows.len(), "loaded expenses");
        self.repopulate(rows);
        Ok(())
    }
}
