//! Error type shared by the models, the store and the managers.

use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum Error {
    /// Input rejected before any store call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store could not complete the call; nothing was applied.
    #[error("Data access error: {0}")]
    DataAccess(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Deleting a category that expenses still point at.
    #[error("Cannot delete category '{name}': {count} expense(s) still reference it")]
    CategoryInUse { name: String, count: usize },

    #[error("Report error: {0}")]
    Report(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn category_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "Category",
            id,
        }
    }

    pub(crate) fn expense_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "Expense",
            id,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::DataAccess(err.to_string())
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
