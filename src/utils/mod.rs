//! Utility functions for formatting and common operations
//!
//! This module provides centralized formatting utilities for consistent
//! display of statement values and metric names throughout the application.

/// Maximum number of fraction digits kept when formatting a value.
const MAX_FRACTION_DIGITS: usize = 3;

/// Format a number using en-US conventions:
/// - Thousands separator: `,` (comma)
/// - Decimal separator: `.` (period)
/// - At most three fraction digits, trailing zeros dropped
///
/// # Examples
/// ```
/// use fundview::utils::format_number;
///
/// assert_eq!(format_number(2.5), "2.5");
/// assert_eq!(format_number(1234567.0), "1,234,567");
/// assert_eq!(format_number(-1234.56789), "-1,234.568");
/// ```
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let formatted = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (integer_part, fraction_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), ""));
    let fraction_part = fraction_part.trim_end_matches('0');

    let with_separators = group_thousands(integer_part);

    // Values that round to zero never carry a sign
    let is_zero = integer_part.chars().all(|c| c == '0') && fraction_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if fraction_part.is_empty() {
        format!("{}{}", sign, with_separators)
    } else {
        format!("{}{}.{}", sign, with_separators, fraction_part)
    }
}

/// Insert `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    digits
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// Turn a camelCase metric key into a display label.
///
/// # Examples
/// ```
/// use fundview::utils::humanize_key;
///
/// assert_eq!(humanize_key("totalRevenue"), "Total Revenue");
/// assert_eq!(humanize_key("ebit"), "Ebit");
/// ```
pub fn humanize_key(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 8);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
