#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::Error;
use crate::models::{Category, Expense, PaymentMode, Priority};

fn stamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn cat(id: i64, name: &str, limit: Decimal) -> Category {
    let mut c = Category::new(name.into(), limit, Priority::Medium, true);
    c.id = Some(id);
    c
}

fn exp(title: &str, amount: Decimal, mode: PaymentMode, recurring: bool, category_id: i64) -> Expense {
    Expense::new(title.into(), amount, mode, recurring, category_id)
}

/// A (limit 100): 70 + 50 = 120, over budget. B (limit 50): 30.
fn scenario() -> (Vec<Expense>, Vec<Category>) {
    let categories = vec![cat(1, "A", dec!(100)), cat(2, "B", dec!(50))];
    let expenses = vec![
        exp("Groceries", dec!(70), PaymentMode::Cash, false, 1),
        exp("Fuel", dec!(30), PaymentMode::Digital, true, 2),
        exp("Dinner", dec!(50), PaymentMode::BankTransfer, false, 1),
    ];
    (expenses, categories)
}

// ── build ─────────────────────────────────────────────────────

#[test]
fn test_build_groups_and_totals() {
    let (expenses, categories) = scenario();
    let report = BudgetReport::build(&expenses, &categories, stamp());

    assert_eq!(report.expense_count, 3);
    assert_eq!(report.total, dec!(150));
    assert_eq!(report.groups.len(), 2);

    let a = &report.groups[0];
    assert_eq!(a.name(), "A");
    assert_eq!(a.total, dec!(120));
    assert_eq!(a.remaining(), Some(dec!(-20)));
    assert!(a.is_over_budget());
    let titles: Vec<&str> = a.expenses.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Groceries", "Dinner"]);

    let b = &report.groups[1];
    assert_eq!(b.name(), "B");
    assert_eq!(b.remaining(), Some(dec!(20)));
    assert!(!b.is_over_budget());
}

#[test]
fn test_groups_ordered_by_total_then_id() {
    let categories = vec![cat(1, "One", dec!(10)), cat(2, "Two", dec!(10)), cat(3, "Three", dec!(10))];
    let expenses = vec![
        exp("x", dec!(5), PaymentMode::Cash, false, 2),
        exp("y", dec!(9), PaymentMode::Cash, false, 3),
        exp("z", dec!(5), PaymentMode::Cash, false, 1),
    ];
    let report = BudgetReport::build(&expenses, &categories, stamp());
    let ids: Vec<i64> = report.groups.iter().map(|g| g.category_id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[test]
fn test_exact_limit_is_not_over_budget() {
    let categories = vec![cat(1, "Exact", dec!(100))];
    let expenses = vec![
        exp("a", dec!(33.33), PaymentMode::Cash, false, 1),
        exp("b", dec!(66.67), PaymentMode::Cash, false, 1),
    ];
    let report = BudgetReport::build(&expenses, &categories, stamp());
    assert_eq!(report.groups[0].total, dec!(100.00));
    assert!(!report.groups[0].is_over_budget());
    assert!(!report.render().contains("OVER BUDGET"));
}

#[test]
fn test_amounts_round_instead_of_truncating() {
    let categories = vec![cat(1, "A", dec!(100))];
    let expenses = vec![
        exp("Odd", dec!(99.996), PaymentMode::Cash, false, 1),
        exp("Half", dec!(2.675), PaymentMode::Cash, false, 1),
    ];
    let report = BudgetReport::build(&expenses[..1], &categories, stamp());
    let text = report.render();
    assert!(text.contains(&format!("{:<20}: ₹100.00 (100.0% of total)", "A")));
    assert!(text.contains("  Monthly Limit: ₹100.00, Remaining: ₹0.00 (0.0%)"));
    assert!(!text.contains("-₹0.00"));
    assert!(!text.contains("OVER BUDGET"));
    assert!(text.contains("TOTAL SPENDING: ₹100.00"));

    let text = BudgetReport::build(&expenses[1..], &categories, stamp()).render();
    assert!(text.contains(&format!("  {:<30} ₹2.68 (Cash, One-time)", "Half")));
    assert!(text.contains("TOTAL SPENDING: ₹2.68"));
}

// ── render ────────────────────────────────────────────────────

#[test]
fn test_render_over_budget_scenario() {
    let (expenses, categories) = scenario();
    let text = BudgetReport::build(&expenses, &categories, stamp()).render();

    assert!(text.contains("EXPENSE INTELLIGENCE REPORT"));
    assert!(text.contains("Generated: 2024-03-05 09:30:00"));
    assert!(text.contains("Total Expenses: 3"));
    assert!(text.contains(&format!("{:<20}: ₹120.00 (80.0% of total)", "A")));
    assert!(text.contains("  Monthly Limit: ₹100.00, Remaining: -₹20.00 (-20.0%)"));
    assert!(text.contains(&format!("{:<20}: ₹30.00 (20.0% of total)", "B")));
    assert!(text.contains("  Monthly Limit: ₹50.00, Remaining: ₹20.00 (40.0%)"));
    assert_eq!(text.matches("*** OVER BUDGET ***").count(), 1);
    assert!(text.contains(&format!("  {:<30} ₹70.00 (Cash, One-time)", "Groceries")));
    assert!(text.contains(&format!("  {:<30} ₹30.00 (Digital, Recurring)", "Fuel")));
    assert!(text.contains(&format!("  {:<30} ₹50.00 (Bank Transfer, One-time)", "Dinner")));
    assert!(text.contains("TOTAL SPENDING: ₹150.00"));
}

#[test]
fn test_render_section_order() {
    let (expenses, categories) = scenario();
    let text = BudgetReport::build(&expenses, &categories, stamp()).render();

    let header = text.find("Generated:").unwrap();
    let spending = text.find("SPENDING BY CATEGORY").unwrap();
    let details = text.find("EXPENSE DETAILS").unwrap();
    let total = text.find("TOTAL SPENDING:").unwrap();
    assert!(header < spending);
    assert!(spending < details);
    assert!(details < total);

    // the over-budget flag sits under its own category line
    let a_line = text.find(&format!("{:<20}:", "A")).unwrap();
    let flag = text.find("*** OVER BUDGET ***").unwrap();
    let b_line = text.find(&format!("{:<20}:", "B")).unwrap();
    assert!(a_line < flag && flag < b_line);
}

#[test]
fn test_render_empty() {
    let text = BudgetReport::build(&[], &[], stamp()).render();
    assert!(text.contains("Total Expenses: 0"));
    assert!(text.contains("SPENDING BY CATEGORY"));
    assert!(text.contains("EXPENSE DETAILS"));
    assert!(text.contains("TOTAL SPENDING: ₹0.00"));
    assert!(!text.contains("% of total"));
}

#[test]
fn test_render_unknown_category() {
    let categories = vec![cat(1, "Known", dec!(100))];
    let expenses = vec![
        exp("Mystery", dec!(40), PaymentMode::Cash, false, 99),
        exp("Known one", dec!(10), PaymentMode::Cash, false, 1),
    ];
    let report = BudgetReport::build(&expenses, &categories, stamp());
    assert!(report.groups[0].category.is_none());
    assert_eq!(report.groups[0].remaining(), None);
    assert!(!report.groups[0].is_over_budget());

    let text = report.render();
    assert!(text.contains(&format!("{:<20}: ₹40.00 (80.0% of total)", "Unknown Category")));
    assert!(text.contains("Unknown Category:"));
    assert_eq!(text.matches("Monthly Limit:").count(), 1);
}

#[test]
fn test_share_rounding() {
    let categories = vec![cat(1, "A", dec!(100)), cat(2, "B", dec!(100))];
    let expenses = vec![
        exp("a", dec!(2), PaymentMode::Cash, false, 1),
        exp("b", dec!(1), PaymentMode::Cash, false, 2),
    ];
    let text = BudgetReport::build(&expenses, &categories, stamp()).render();
    assert!(text.contains("(66.7% of total)"));
    assert!(text.contains("(33.3% of total)"));
}

// ── destinations ──────────────────────────────────────────────

#[test]
fn test_write_report_to_buffer() {
    let (expenses, categories) = scenario();
    let mut buf: Vec<u8> = Vec::new();
    write_report(&mut buf, &expenses, &categories).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.starts_with(RULE));
    assert!(text.contains("TOTAL SPENDING: ₹150.00"));
}

#[test]
fn test_save_report_to_file() {
    let (expenses, categories) = scenario();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");

    std::fs::write(&path, "stale contents").unwrap();
    save_report(&path, &expenses, &categories).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(!text.contains("stale contents"));
    assert!(text.contains("Total Expenses: 3"));
    assert!(text.contains("*** OVER BUDGET ***"));
}

#[test]
fn test_save_report_unwritable_destination() {
    let (expenses, categories) = scenario();
    let dir = tempfile::tempdir().unwrap();

    let err = save_report(dir.path(), &expenses, &categories).unwrap_err();
    assert!(matches!(err, Error::Report(_)));

    let missing = dir.path().join("no-such-dir").join("report.txt");
    let err = save_report(&missing, &expenses, &categories).unwrap_err();
    assert!(matches!(err, Error::Report(_)));
}
