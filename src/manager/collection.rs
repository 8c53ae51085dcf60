use std::cmp::Ordering;

/// Ordered, in-memory list of records of one kind.
///
/// Reads hand out copies: `all`, `sorted_by` and `filtered` never expose or
/// reorder the internal list.
#[derive(Debug, Clone)]
pub(crate) struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Collection<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends without deduplication.
    pub(crate) fn add(&mut self, item: T) -> bool {
        self.items.push(item);
        true
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub(crate) fn find<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().find(|item| predicate(item))
    }

    /// Replace the first match in place and drop any later matches; append
    /// when nothing matches.
    pub(crate) fn replace_where<P>(&mut self, mut predicate: P, item: T)
    where
        P: FnMut(&T) -> bool,
    {
        match self.items.iter().position(&mut predicate) {
            Some(idx) => {
                self.items[idx] = item;
                let mut pos = 0;
                self.items.retain(|existing| {
                    let keep = pos <= idx || !predicate(existing);
                    pos += 1;
                    keep
                });
            }
            None => self.items.push(item),
        }
    }

    /// Remove every match, returning how many were removed.
    pub(crate) fn remove_where<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|item| !predicate(item));
        before - self.items.len()
    }
}

impl<T: PartialEq> Collection<T> {
    /// Remove the first value-equal occurrence.
    pub(crate) fn remove(&mut self, item: &T) -> bool {
        match self.items.iter().position(|existing| existing == item) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }
}

impl<T: Clone> Collection<T> {
    pub(crate) fn all(&self) -> Vec<T> {
        self.items.clone()
    }

    /// Stable sort of a copy; equal keys keep their current relative order.
    pub(crate) fn sorted_by<F>(&self, compare: F) -> Vec<T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut sorted = self.items.clone();
        sorted.sort_by(compare);
        sorted
    }

    pub(crate) fn filtered<P>(&self, mut predicate: P) -> Vec<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.items
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }
}

impl<T> Extend<T> for Collection<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
