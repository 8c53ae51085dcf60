use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::util::AMOUNT_SCALE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Single-character code used by the database.
    pub(crate) fn code(&self) -> char {
        match self {
            Self::High => 'H',
            Self::Medium => 'M',
            Self::Low => 'L',
        }
    }

    pub(crate) fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'H' => Some(Self::High),
            'M' => Some(Self::Medium),
            'L' => Some(Self::Low),
            _ => None,
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "h" | "high" => Some(Self::High),
            "m" | "med" | "medium" => Some(Self::Medium),
            "l" | "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// High = 3, Medium = 2, Low = 1.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub(crate) fn all() -> &'static [Priority] {
        &[Self::High, Self::Medium, Self::Low]
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub monthly_limit: Decimal,
    pub priority: Priority,
    pub active: bool,
}

impl Category {
    pub fn new(name: String, monthly_limit: Decimal, priority: Priority, active: bool) -> Self {
        Self {
            id: None,
            name,
            monthly_limit,
            priority,
            active,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Category name cannot be empty"));
        }
        if self.monthly_limit <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "Monthly limit must be positive (got {})",
                self.monthly_limit
            )));
        }
        if self.monthly_limit.normalize().scale() > AMOUNT_SCALE {
            return Err(Error::validation(format!(
                "Monthly limit cannot have more than {AMOUNT_SCALE} decimal places (got {})",
                self.monthly_limit
            )));
        }
        Ok(())
    }

    /// Strictly greater than the limit; spending exactly the limit is fine.
    pub(crate) fn is_over_budget(&self, spent: Decimal) -> bool {
        spent > self.monthly_limit
    }

    /// Find a category by ID in a slice.
    pub fn find_by_id(categories: &[Category], id: i64) -> Option<&Category> {
        categories.iter().find(|c| c.id == Some(id))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
