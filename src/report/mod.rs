//! Plain-text budget report: spending grouped by category, compared against
//! each category's monthly limit, followed by the itemised expenses.

use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{Category, Expense};
use crate::util::{format_amount, percent_of, sum_amounts};

const RULE: &str = "====================================================";
const TITLE: &str = "EXPENSE INTELLIGENCE REPORT";
const UNKNOWN_CATEGORY: &str = "Unknown Category";

/// Spending for one category id. `category` is `None` when no category with
/// that id was supplied.
#[derive(Debug)]
pub(crate) struct CategoryGroup<'a> {
    pub(crate) category_id: i64,
    pub(crate) category: Option<&'a Category>,
    pub(crate) total: Decimal,
    pub(crate) expenses: Vec<&'a Expense>,
}

impl CategoryGroup<'_> {
    pub(crate) fn name(&self) -> &str {
        self.category.map_or(UNKNOWN_CATEGORY, |c| c.name.as_str())
    }

    /// Limit of a known category with a positive monthly limit.
    fn limit(&self) -> Option<Decimal> {
        self.category
            .map(|c| c.monthly_limit)
            .filter(|limit| *limit > Decimal::ZERO)
    }

    pub(crate) fn remaining(&self) -> Option<Decimal> {
        self.limit().map(|limit| limit - self.total)
    }

    pub(crate) fn is_over_budget(&self) -> bool {
        match self.category {
            Some(category) => self.limit().is_some() && category.is_over_budget(self.total),
            None => false,
        }
    }
}

#[derive(Debug)]
pub(crate) struct BudgetReport<'a> {
    pub(crate) generated_at: NaiveDateTime,
    pub(crate) expense_count: usize,
    /// Ordered by total descending, then category id.
    pub(crate) groups: Vec<CategoryGroup<'a>>,
    pub(crate) total: Decimal,
}

impl<'a> BudgetReport<'a> {
    pub(crate) fn build(
        expenses: &'a [Expense],
        categories: &'a [Category],
        generated_at: NaiveDateTime,
    ) -> Self {
        let by_id: BTreeMap<i64, &Category> = categories
            .iter()
            .filter_map(|c| c.id.map(|id| (id, c)))
            .collect();

        let mut grouped: BTreeMap<i64, Vec<&Expense>> = BTreeMap::new();
        for expense in expenses {
            grouped.entry(expense.category_id).or_default().push(expense);
        }

        let mut groups: Vec<CategoryGroup<'a>> = grouped
            .into_iter()
            .map(|(category_id, items)| CategoryGroup {
                category_id,
                category: by_id.get(&category_id).copied(),
                total: sum_amounts(items.iter().map(|e| e.amount)),
                expenses: items,
            })
            .collect();
        groups.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category_id.cmp(&b.category_id))
        });

        Self {
            generated_at,
            expense_count: expenses.len(),
            total: sum_amounts(groups.iter().map(|g| g.total)),
            groups,
        }
    }

    pub(crate) fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BudgetReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "{TITLE:^52}")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Total Expenses: {}", self.expense_count)?;
        writeln!(f)?;

        writeln!(f, "SPENDING BY CATEGORY")?;
        writeln!(f, "--------------------")?;
        for group in &self.groups {
            writeln!(
                f,
                "{:<20}: {} ({:.1}% of total)",
                group.name(),
                format_amount(group.total),
                percent_of(group.total, self.total)
            )?;
            if let (Some(limit), Some(remaining)) = (group.limit(), group.remaining()) {
                writeln!(
                    f,
                    "  Monthly Limit: {}, Remaining: {} ({:.1}%)",
                    format_amount(limit),
                    format_amount(remaining),
                    percent_of(remaining, limit)
                )?;
                if group.is_over_budget() {
                    writeln!(f, "  *** OVER BUDGET ***")?;
                }
            }
        }
        writeln!(f)?;

        writeln!(f, "EXPENSE DETAILS")?;
        writeln!(f, "---------------")?;
        for group in &self.groups {
            writeln!(f, "{}:", group.name())?;
            for expense in &group.expenses {
                writeln!(
                    f,
                    "  {:<30} {} ({}, {})",
                    expense.title,
                    format_amount(expense.amount),
                    expense.mode,
                    expense.recurrence_label()
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f, "{RULE}")?;
        writeln!(f, "TOTAL SPENDING: {}", format_amount(self.total))?;
        writeln!(f, "{RULE}")
    }
}

/// Build a report stamped with the current local time.
pub(crate) fn generate_report<'a>(
    expenses: &'a [Expense],
    categories: &'a [Category],
) -> BudgetReport<'a> {
    BudgetReport::build(expenses, categories, Local::now().naive_local())
}

pub(crate) fn write_report<W: Write>(
    writer: &mut W,
    expenses: &[Expense],
    categories: &[Category],
) -> Result<()> {
    let report = generate_report(expenses, categories);
    writer.write_all(report.render().as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write the report to `path`, replacing any existing file. On failure the
/// file may be left partially written.
pub(crate) fn save_report(path: &Path, expenses: &[Expense], categories: &[Category]) -> Result<()> {
    let written = File::create(path).map_err(Error::from).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write_report(&mut writer, expenses, categories)
    });
    match &written {
        Ok(()) => tracing::info!(path = %path.display(), expenses = expenses.len(), "report written"),
        Err(e) => tracing::error!(path = %path.display(), error = %e, "failed to write report"),
    }
    written
}

#[cfg(test)]
mod tests;
