//! In-memory managers over the store.
//!
//! A manager caches the result of its last load or mutation. It is not a
//! live view: changes made to the store by anyone else only show up after
//! the next load.

mod category;
mod collection;
mod expense;
mod sorting;

pub(crate) use category::{CategoryManager, CategoryOrder};
pub(crate) use collection::Collection;
pub(crate) use expense::{ExpenseManager, ExpenseOrder};
pub(crate) use sorting::Direction;

use std::cmp::Ordering;

use crate::error::Result;

/// Shared surface of the category and expense managers.
pub(crate) trait DataManager {
    type Item: Clone + PartialEq;

    fn collection(&self) -> &Collection<Self::Item>;

    fn collection_mut(&mut self) -> &mut Collection<Self::Item>;

    /// Replace the cached records with everything in the store.
    fn load_data(&mut self) -> Result<()>;

    fn add(&mut self, item: Self::Item) -> bool {
        self.collection_mut().add(item)
    }

    fn remove(&mut self, item: &Self::Item) -> bool {
        self.collection_mut().remove(item)
    }

    fn clear(&mut self) {
        self.collection_mut().clear();
    }

    fn len(&self) -> usize {
        self.collection().len()
    }

    fn is_empty(&self) -> bool {
        self.collection().is_empty()
    }

    fn all(&self) -> Vec<Self::Item> {
        self.collection().all()
    }

    fn sorted_by<F>(&self, compare: F) -> Vec<Self::Item>
    where
        F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        self.collection().sorted_by(compare)
    }

    fn filtered<P>(&self, predicate: P) -> Vec<Self::Item>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        self.collection().filtered(predicate)
    }

    /// Clear, then refill from a finished store query. Callers run the query
    /// first so a failed load leaves the cache as it was.
    fn repopulate(&mut self, items: Vec<Self::Item>) {
        let collection = self.collection_mut();
        collection.clear();
        collection.extend(items);
    }
}

#[cfg(test)]
mod test_support;
