use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::util::AMOUNT_SCALE;

/// Declared order (Cash, Digital, BankTransfer) is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PaymentMode {
    Cash,
    Digital,
    BankTransfer,
}

impl PaymentMode {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Digital => "Digital",
            Self::BankTransfer => "Bank Transfer",
        }
    }

    pub(crate) fn code(&self) -> char {
        match self {
            Self::Cash => 'C',
            Self::Digital => 'D',
            Self::BankTransfer => 'B',
        }
    }

    pub(crate) fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'C' => Some(Self::Cash),
            'D' => Some(Self::Digital),
            'B' => Some(Self::BankTransfer),
            _ => None,
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "c" | "cash" => Some(Self::Cash),
            "d" | "digital" | "upi" | "card" => Some(Self::Digital),
            "b" | "bank" | "bank transfer" | "banktransfer" | "transfer" => {
                Some(Self::BankTransfer)
            }
            _ => None,
        }
    }

    pub(crate) fn all() -> &'static [PaymentMode] {
        &[Self::Cash, Self::Digital, Self::BankTransfer]
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: Option<i64>,
    pub title: String,
    pub amount: Decimal,
    pub mode: PaymentMode,
    pub recurring: bool,
    pub category_id: i64,
}

impl Expense {
    pub fn new(
        title: String,
        amount: Decimal,
        mode: PaymentMode,
        recurring: bool,
        category_id: i64,
    ) -> Self {
        Self {
            id: None,
            title,
            amount,
            mode,
            recurring,
            category_id,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("Expense title cannot be empty"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "Amount must be positive (got {})",
                self.amount
            )));
        }
        if self.amount.normalize().scale() > AMOUNT_SCALE {
            return Err(Error::validation(format!(
                "Amount cannot have more than {AMOUNT_SCALE} decimal places (got {})",
                self.amount
            )));
        }
        Ok(())
    }

    pub(crate) fn recurrence_label(&self) -> &'static str {
        if self.recurring {
            "Recurring"
        } else {
            "One-time"
        }
    }
}
