mod category;
mod expense;

pub use category::{Category, Priority};
pub use expense::{Expense, PaymentMode};
