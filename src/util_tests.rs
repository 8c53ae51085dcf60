#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::*;

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(150)), "₹150.00");
    assert_eq!(format_amount(dec!(14.5)), "₹14.50");
}

#[test]
fn test_format_amount_thousands() {
    assert_eq!(format_amount(dec!(1234567.89)), "₹1,234,567.89");
    assert_eq!(format_amount(dec!(1000)), "₹1,000.00");
    assert_eq!(format_amount(dec!(999.99)), "₹999.99");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-20)), "-₹20.00");
    assert_eq!(format_amount(dec!(-1500.5)), "-₹1,500.50");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(Decimal::ZERO), "₹0.00");
}

#[test]
fn test_format_amount_rounds_extra_places() {
    assert_eq!(format_amount(dec!(9.999)), "₹10.00");
    assert_eq!(format_amount(dec!(2.675)), "₹2.68");
    assert_eq!(format_amount(dec!(2.674)), "₹2.67");
    assert_eq!(format_amount(dec!(999.995)), "₹1,000.00");
    assert_eq!(format_amount(dec!(-2.675)), "-₹2.68");
}

#[test]
fn test_format_amount_tiny_negative_is_zero() {
    assert_eq!(format_amount(dec!(-0.001)), "₹0.00");
    assert_eq!(format_amount(dec!(-0.004)), "₹0.00");
}

// ── percent_of ────────────────────────────────────────────────

#[test]
fn test_percent_of_basic() {
    assert_eq!(percent_of(dec!(120), dec!(150)), dec!(80.0));
    assert_eq!(percent_of(dec!(30), dec!(150)), dec!(20.0));
}

#[test]
fn test_percent_of_zero_whole() {
    assert_eq!(percent_of(dec!(10), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(percent_of(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
}

#[test]
fn test_percent_of_rounds_to_one_place() {
    assert_eq!(percent_of(dec!(1), dec!(3)), dec!(33.3));
    assert_eq!(percent_of(dec!(2), dec!(3)), dec!(66.7));
}

#[test]
fn test_percent_of_negative_part() {
    assert_eq!(percent_of(dec!(-20), dec!(100)), dec!(-20.0));
}

// ── sum_amounts ───────────────────────────────────────────────

#[test]
fn test_sum_amounts() {
    assert_eq!(sum_amounts(vec![dec!(10.00), dec!(25.50), dec!(14.50)]), dec!(50.00));
    assert_eq!(sum_amounts(Vec::new()), Decimal::ZERO);
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("café résumé", 5), "café…");
}
