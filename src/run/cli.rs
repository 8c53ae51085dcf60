use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::Config;
use crate::db::Database;
use crate::error::Error;
use crate::manager::{
    CategoryManager, CategoryOrder, DataManager, Direction, ExpenseManager, ExpenseOrder,
};
use crate::models::{Category, Expense, PaymentMode, Priority};
use crate::report;
use crate::store::{CategoryStore, ExpenseStore};
use crate::util::{format_amount, percent_of, truncate};

pub(crate) fn as_cli(args: &[String], db: &Database, config: &Config) -> Result<()> {
    let Some(command) = args.get(1) else {
        return cli_summary(db);
    };
    let rest = &args[2..];
    match command.as_str() {
        "summary" | "s" => cli_summary(db),
        "categories" | "cats" => cli_categories(rest, db),
        "category" | "cat" => cli_category(rest, db),
        "expenses" | "ls" => cli_expenses(rest, db),
        "expense" | "exp" => cli_expense(rest, db),
        "report" => cli_report(rest, db, config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("expense-intel {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("expense-intel: categorised expense tracking with monthly limits");
    println!();
    println!("Usage: expense-intel [command]");
    println!();
    println!("Commands:");
    println!("  summary (default)                       Totals, payment modes, spend vs limit");
    println!("  categories                              List categories");
    println!("    --active | --inactive                 Only active / inactive categories");
    println!("    --priority <high|medium|low>          Only one priority");
    println!("    --over-budget                         Only categories spent past their limit");
    println!("    --sort <name|limit|priority|active>   Sort key (--desc to reverse)");
    println!("  category add <name> <limit> <priority> [--inactive]");
    println!("  category update <id> [--name N] [--limit L] [--priority P] [--active true|false]");
    println!("  category delete <id>                    Refused while expenses reference it");
    println!("  expenses                                List expenses");
    println!("    --recurring | --one-time              Only recurring / one-time expenses");
    println!("    --category <id>                       Only one category");
    println!("    --mode <cash|digital|bank>            Only one payment mode");
    println!("    --sort <title|amount|mode|recurring>  Sort key (--desc to reverse)");
    println!("  expense add <title> <amount> <mode> <category-id> [--recurring]");
    println!("  expense update <id> [--title T] [--amount A] [--mode M] [--category ID] [--recurring true|false]");
    println!("  expense delete <id>");
    println!("  report [path]                           Write the budget report (default: $EXPENSE_INTEL_REPORT)");
    println!("  --help, -h                              Show this help");
    println!("  --version, -V                           Show version");
}

// ── Summary ──────────────────────────────────────────────────

fn cli_summary(db: &Database) -> Result<()> {
    let mut categories = CategoryManager::new(db);
    categories.load_data()?;
    let mut expenses = ExpenseManager::new(db);
    expenses.load_data()?;

    let (active, inactive) = categories.active_counts();
    let total = expenses.total_amount();

    println!("Expense Intelligence");
    println!("{}", "─".repeat(48));
    println!(
        "  Categories: {} ({active} active, {inactive} inactive)",
        categories.len()
    );
    let by_priority: Vec<String> = categories
        .priority_counts()
        .iter()
        .map(|(priority, count)| format!("{priority}: {count}"))
        .collect();
    println!("  By priority: {}", by_priority.join(", "));
    println!("  Expenses:   {}", expenses.len());
    println!("  Total:      {}", format_amount(total));

    if expenses.is_empty() {
        return Ok(());
    }

    println!();
    println!("By payment mode:");
    let shares = expenses.mode_shares();
    for (mode, amount) in expenses.totals_by_mode() {
        let share = shares.get(&mode).copied().unwrap_or(Decimal::ZERO);
        println!("  {:<16} {:>14} ({share:.1}%)", mode.to_string(), format_amount(amount));
    }

    let spent: BTreeMap<i64, Decimal> = db.totals_by_category()?.into_iter().collect();
    println!();
    println!("Spend vs limit:");
    let ordered = categories.sorted_by(|a, b| CategoryOrder::Priority.compare(a, b));
    for category in &ordered {
        let amount = category
            .id
            .and_then(|id| spent.get(&id).copied())
            .unwrap_or(Decimal::ZERO);
        let flag = if category.is_over_budget(amount) {
            "  OVER BUDGET"
        } else {
            ""
        };
        println!(
            "  {:<20} {:>14} / {:<14} {:>5.1}%{flag}",
            truncate(&category.name, 20),
            format_amount(amount),
            format_amount(category.monthly_limit),
            percent_of(amount, category.monthly_limit)
        );
    }

    let idle = categories.filtered(|c| c.active && c.id.is_some_and(|id| !spent.contains_key(&id)));
    if !idle.is_empty() {
        let names: Vec<&str> = idle.iter().map(|c| c.name.as_str()).collect();
        println!();
        println!("No spending yet: {}", names.join(", "));
    }
    Ok(())
}

// ── Categories ───────────────────────────────────────────────

fn cli_categories(args: &[String], db: &Database) -> Result<()> {
    let mut categories = CategoryManager::new(db);
    if has_flag(args, "--active") {
        categories.load_active()?;
    } else if has_flag(args, "--over-budget") {
        categories.load_over_budget()?;
    } else if let Some(p) = flag_value(args, "--priority") {
        categories.load_by_priority(parse_priority(p)?)?;
    } else {
        categories.load_data()?;
    }

    let mut rows = if has_flag(args, "--inactive") {
        categories.filtered(|c| !c.active)
    } else {
        categories.all()
    };
    if let Some(key) = flag_value(args, "--sort") {
        let direction = Direction::from_ascending(!has_flag(args, "--desc"));
        let order = CategoryOrder::parse(key, direction)
            .ok_or_else(|| anyhow::anyhow!("Unknown sort key: {key}"))?;
        rows.sort_by(|a, b| order.compare(a, b));
    }

    if rows.is_empty() {
        println!("No categories");
        return Ok(());
    }
    println!("{:<4} {:<20} {:>14} {:<8} Active", "ID", "Name", "Limit", "Priority");
    println!("{}", "─".repeat(56));
    for c in &rows {
        println!(
            "{:<4} {:<20} {:>14} {:<8} {}",
            c.id.unwrap_or(0),
            truncate(&c.name, 20),
            format_amount(c.monthly_limit),
            c.priority.to_string(),
            if c.active { "yes" } else { "no" }
        );
    }
    Ok(())
}

fn cli_category(args: &[String], db: &Database) -> Result<()> {
    let Some(action) = args.first() else {
        anyhow::bail!("Usage: expense-intel category <add|update|delete> ...");
    };
    let rest = &args[1..];
    let mut categories = CategoryManager::new(db);
    match action.as_str() {
        "add" => {
            let positional = positionals(rest);
            let [name, limit, priority, ..] = positional.as_slice() else {
                anyhow::bail!("Usage: expense-intel category add <name> <limit> <priority> [--inactive]");
            };
            let category = Category::new(
                name.to_string(),
                parse_amount(limit)?,
                parse_priority(priority)?,
                !has_flag(rest, "--inactive"),
            );
            let id = categories.save(category)?;
            println!("Added category {name} (id {id})");
        }
        "update" => {
            let id = parse_id(rest.first().map(String::as_str))?;
            let mut category = db
                .get_category(id)?
                .ok_or_else(|| Error::category_not_found(id))?;
            if let Some(name) = flag_value(rest, "--name") {
                category.name = name.to_string();
            }
            if let Some(limit) = flag_value(rest, "--limit") {
                category.monthly_limit = parse_amount(limit)?;
            }
            if let Some(priority) = flag_value(rest, "--priority") {
                category.priority = parse_priority(priority)?;
            }
            if let Some(active) = flag_value(rest, "--active") {
                category.active = parse_bool(active)?;
            }
            let name = category.name.clone();
            categories.update(category)?;
            println!("Updated category {name} (id {id})");
        }
        "delete" | "rm" => {
            let id = parse_id(rest.first().map(String::as_str))?;
            categories.load_data()?;
            let category = categories
                .find(id)
                .cloned()
                .ok_or_else(|| Error::category_not_found(id))?;
            let expenses = ExpenseManager::new(db);
            categories.delete(&category, &expenses)?;
            println!("Deleted category {}", category.name);
        }
        other => anyhow::bail!("Unknown category action: {other}"),
    }
    Ok(())
}

// ── Expenses ─────────────────────────────────────────────────

fn cli_expenses(args: &[String], db: &Database) -> Result<()> {
    let mut expenses = ExpenseManager::new(db);
    if has_flag(args, "--recurring") {
        expenses.load_recurring()?;
    } else if has_flag(args, "--one-time") {
        expenses.load_non_recurring()?;
    } else if let Some(id) = flag_value(args, "--category") {
        expenses.load_by_category(parse_id(Some(id))?)?;
    } else if let Some(mode) = flag_value(args, "--mode") {
        expenses.load_by_mode(parse_mode(mode)?)?;
    } else {
        expenses.load_data()?;
    }

    let rows = match flag_value(args, "--sort") {
        Some(key) => {
            let direction = Direction::from_ascending(!has_flag(args, "--desc"));
            let order = ExpenseOrder::parse(key, direction)
                .ok_or_else(|| anyhow::anyhow!("Unknown sort key: {key}"))?;
            expenses.sorted_by(|a, b| order.compare(a, b))
        }
        None => expenses.all(),
    };
    if rows.is_empty() {
        println!("No expenses");
        return Ok(());
    }

    let categories = db.list_categories()?;
    println!(
        "{:<4} {:<24} {:>14} {:<14} {:<10} Category",
        "ID", "Title", "Amount", "Mode", "Repeats"
    );
    println!("{}", "─".repeat(84));
    for e in &rows {
        let category = Category::find_by_id(&categories, e.category_id)
            .map_or("Unknown Category", |c| c.name.as_str());
        println!(
            "{:<4} {:<24} {:>14} {:<14} {:<10} {}",
            e.id.unwrap_or(0),
            truncate(&e.title, 24),
            format_amount(e.amount),
            e.mode.to_string(),
            e.recurrence_label(),
            category
        );
    }
    println!("{}", "─".repeat(84));
    println!("{:<29} {:>14}", format!("{} expense(s)", rows.len()), format_amount(expenses.total_amount()));
    Ok(())
}

fn cli_expense(args: &[String], db: &Database) -> Result<()> {
    let Some(action) = args.first() else {
        anyhow::bail!("Usage: expense-intel expense <add|update|delete> ...");
    };
    let rest = &args[1..];
    let mut expenses = ExpenseManager::new(db);
    match action.as_str() {
        "add" => {
            let positional = positionals(rest);
            let [title, amount, mode, category_id, ..] = positional.as_slice() else {
                anyhow::bail!(
                    "Usage: expense-intel expense add <title> <amount> <mode> <category-id> [--recurring]"
                );
            };
            let expense = Expense::new(
                title.to_string(),
                parse_amount(amount)?,
                parse_mode(mode)?,
                has_flag(rest, "--recurring"),
                parse_id(Some(*category_id))?,
            );
            let id = expenses.save(expense)?;
            println!("Added expense {title} (id {id})");
        }
        "update" => {
            let id = parse_id(rest.first().map(String::as_str))?;
            let mut expense = db
                .get_expense(id)?
                .ok_or_else(|| Error::expense_not_found(id))?;
            if let Some(title) = flag_value(rest, "--title") {
                expense.title = title.to_string();
            }
            if let Some(amount) = flag_value(rest, "--amount") {
                expense.amount = parse_amount(amount)?;
            }
            if let Some(mode) = flag_value(rest, "--mode") {
                expense.mode = parse_mode(mode)?;
            }
            if let Some(category_id) = flag_value(rest, "--category") {
                expense.category_id = parse_id(Some(category_id))?;
            }
            if let Some(recurring) = flag_value(rest, "--recurring") {
                expense.recurring = parse_bool(recurring)?;
            }
            let title = expense.title.clone();
            expenses.update(expense)?;
            println!("Updated expense {title} (id {id})");
        }
        "delete" | "rm" => {
            let id = parse_id(rest.first().map(String::as_str))?;
            expenses.load_data()?;
            let expense = expenses
                .find(id)
                .cloned()
                .ok_or_else(|| Error::expense_not_found(id))?;
            expenses.delete(&expense)?;
            println!("Deleted expense {}", expense.title);
        }
        other => anyhow::bail!("Unknown expense action: {other}"),
    }
    Ok(())
}

// ── Report ───────────────────────────────────────────────────

fn cli_report(args: &[String], db: &Database, config: &Config) -> Result<()> {
    let path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| config.report_path.clone());

    let mut categories = CategoryManager::new(db);
    categories.load_data()?;
    let mut expenses = ExpenseManager::new(db);
    expenses.load_data()?;

    report::save_report(&path, &expenses.all(), &categories.all())?;
    println!(
        "Report for {} expense(s) written to {}",
        expenses.len(),
        path.display()
    );
    Ok(())
}

// ── Argument helpers ─────────────────────────────────────────

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are not `--flags`. Only valid where every flag is boolean.
fn positionals(args: &[String]) -> Vec<&str> {
    args.iter()
        .map(String::as_str)
        .filter(|a| !a.starts_with("--"))
        .collect()
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_id(arg: Option<&str>) -> Result<i64> {
    let arg = arg.ok_or_else(|| anyhow::anyhow!("Missing id"))?;
    arg.parse()
        .with_context(|| format!("Invalid id: {arg}"))
}

fn parse_amount(s: &str) -> Result<Decimal> {
    s.trim()
        .trim_start_matches(crate::util::CURRENCY)
        .replace(',', "")
        .parse()
        .with_context(|| format!("Invalid amount: {s}"))
}

fn parse_priority(s: &str) -> Result<Priority> {
    Priority::parse(s).ok_or_else(|| anyhow::anyhow!("Unknown priority: {s} (use high, medium or low)"))
}

fn parse_mode(s: &str) -> Result<PaymentMode> {
    PaymentMode::parse(s).ok_or_else(|| anyhow::anyhow!("Unknown payment mode: {s} (use cash, digital or bank)"))
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => anyhow::bail!("Expected true or false, got: {s}"),
    }
}

fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
