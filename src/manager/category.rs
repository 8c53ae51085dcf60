use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::sorting::{compare_flag, Direction};
use super::{Collection, DataManager, ExpenseManager};
use crate::error::{Error, Result};
use crate::models::{Category, Priority};
use crate::store::{CategoryStore, ExpenseStore};

/// Named orderings for categories. All of them are used with a stable sort,
/// so ties keep their current order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CategoryOrder {
    Name,
    MonthlyLimit(Direction),
    /// High, then Medium, then Low.
    Priority,
    Active { active_first: bool },
}

impl CategoryOrder {
    pub(crate) fn compare(&self, a: &Category, b: &Category) -> Ordering {
        match self {
            Self::Name => a.name.cmp(&b.name),
            Self::MonthlyLimit(direction) => direction.apply(a.monthly_limit.cmp(&b.monthly_limit)),
            Self::Priority => b.priority.rank().cmp(&a.priority.rank()),
            Self::Active { active_first } => compare_flag(a.active, b.active, *active_first),
        }
    }

    /// Parse a sort key as typed on the command line.
    pub(crate) fn parse(key: &str, direction: Direction) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "limit" | "monthly-limit" => Some(Self::MonthlyLimit(direction)),
            "priority" => Some(Self::Priority),
            "active" => Some(Self::Active {
                active_first: direction == Direction::Ascending,
            }),
            _ => None,
        }
    }
}

pub(crate) struct CategoryManager<'s, S: ?Sized> {
    store: &'s S,
    categories: Collection<Category>,
}

impl<'s, S: CategoryStore + ?Sized> CategoryManager<'s, S> {
    pub(crate) fn new(store: &'s S) -> Self {
        Self {
            store,
            categories: Collection::new(),
        }
    }

    pub(crate) fn load_active(&mut self) -> Result<()> {
        let rows = self.store.list_active_categories()?;
        tracing::debug!(count = rows.len(), "loaded active categories");
        self.repopulate(rows);
        Ok(())
    }

    pub(crate) fn load_by_priority(&mut self, priority: Priority) -> Result<()> {
        let rows = self.store.list_categories_by_priority(priority)?;
        tracing::debug!(count = rows.len(), %priority, "loaded categories by priority");
        self.repopulate(rows);
        Ok(())
    }

    pub(crate) fn load_over_budget(&mut self) -> Result<()> {
        let rows = self.store.list_over_budget_categories()?;
        tracing::debug!(count = rows.len(), "loaded over-budget categories");
        self.repopulate(rows);
        Ok(())
    }

    /// Insert into the store, then cache the category under its new id.
    pub(crate) fn save(&mut self, mut category: Category) -> Result<i64> {
        category.validate()?;
        let id = self.store.insert_category(&category)?;
        category.id = Some(id);
        self.categories.add(category);
        Ok(id)
    }

    /// Write to the store, then replace the cached entry with the same id
    /// in place (appending it if it was not cached).
    pub(crate) fn update(&mut self, category: Category) -> Result<()> {
        category.validate()?;
        let id = category
            .id
            .ok_or_else(|| Error::validation("Cannot update a category that was never saved"))?;
        self.store.update_category(&category)?;
        self.categories.replace_where(|c| c.id == Some(id), category);
        Ok(())
    }

    /// Refuses, without touching the store, while any stored expense still
    /// references the category.
    pub(crate) fn delete<E>(&mut self, category: &Category, expenses: &ExpenseManager<'_, E>) -> Result<()>
    where
        E: ExpenseStore + ?Sized,
    {
        let id = category
            .id
            .ok_or_else(|| Error::validation("Cannot delete a category that was never saved"))?;
        let count = expenses.count_referencing(id)?;
        if count > 0 {
            tracing::warn!(id, count, "refusing to delete category still in use");
            return Err(Error::CategoryInUse {
                name: category.name.clone(),
                count,
            });
        }
        self.store.delete_category(id)?;
        self.categories.remove_where(|c| c.id == Some(id));
        Ok(())
    }

    pub(crate) fn find(&self, id: i64) -> Option<&Category> {
        self.categories.find(|c| c.id == Some(id))
    }

    /// Number of cached categories per priority; every priority is present.
    pub(crate) fn priority_counts(&self) -> BTreeMap<Priority, usize> {
        let mut counts: BTreeMap<Priority, usize> =
            Priority::all().iter().map(|p| (*p, 0)).collect();
        for category in &self.categories {
            *counts.entry(category.priority).or_insert(0) += 1;
        }
        counts
    }

    /// `(active, inactive)` among the cached categories.
    pub(crate) fn active_counts(&self) -> (usize, usize) {
        let active = self.categories.iter().filter(|c| c.active).count();
        (active, self.categories.len() - active)
    }
}

impl<S: CategoryStore + ?Sized> DataManager for CategoryManager<'_, S> {
    type Item = Category;

    fn collection(&self) -> &Collection<Category> {
        &self.categories
    }

    fn collection_mut(&mut self) -> &mut Collection<Category> {
        &mut self.categories
    }

    fn load_data(&mut self) -> Result<()> {
        let rows = self.store.list_categories()?;
        tracing::debug!(count = rows.len(), "loaded categories");
        self.repopulate(rows);
        Ok(())
    }
}
