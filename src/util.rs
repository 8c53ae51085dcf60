use rust_decimal::{Decimal, RoundingStrategy};

pub(crate) const CURRENCY: &str = "₹";

/// Money amounts carry at most this many decimal places.
pub(crate) const AMOUNT_SCALE: u32 = 2;

/// Format a decimal amount with thousand separators and 2 decimal places,
/// rounding half away from zero. e.g. `1234567.885` → `"₹1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let val = val.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-{CURRENCY}{with_commas}.{dec_part}")
    } else {
        format!("{CURRENCY}{with_commas}.{dec_part}")
    }
}

/// `part` as a percentage of `whole`, rounded to one decimal place.
/// A zero `whole` yields zero instead of dividing.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO)
}

/// Sum of a sequence of amounts; zero when empty.
pub(crate) fn sum_amounts<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, |acc, amount| acc + amount)
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}
