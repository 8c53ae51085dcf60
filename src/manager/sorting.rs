use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub(crate) fn from_ascending(ascending: bool) -> Self {
        if ascending {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    pub(crate) fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Orders `true` ahead of `false` when `true_first`, otherwise the reverse.
pub(crate) fn compare_flag(a: bool, b: bool, true_first: bool) -> Ordering {
    if true_first {
        b.cmp(&a)
    } else {
        a.cmp(&b)
    }
}
