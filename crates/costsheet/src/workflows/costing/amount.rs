use num_format::{Locale, WriteFormatted};
use tracing::warn;

/// Percentage splits leave float noise far below a millionth of a unit; it is
/// settled before rounding so a total and the sum of its parts round alike.
const SETTLE_SCALE: f64 = 1_000_000.0;

/// Beyond this magnitude every `f64` is already a whole number.
const WHOLE_ONLY: f64 = 4_503_599_627_370_496.0;

/// Rounds to the nearest whole currency unit, ties away from zero.
///
/// Non-finite inputs count as zero.
pub fn round_amount(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if value.abs() >= WHOLE_ONLY {
        return value;
    }
    ((value * SETTLE_SCALE).round() / SETTLE_SCALE).round()
}

/// Formats an amount with Indian digit grouping (`12,34,567`), rounded to
/// a whole number and without any currency symbol.
pub fn format_amount(value: f64) -> String {
    let rounded = round_amount(value);
    if rounded.abs() >= i128::MAX as f64 {
        warn!(value, "amount too large to group, printing plain digits");
        return format!("{rounded:.0}");
    }

    // -0.4 rounds to -0.0, which prints as "0" once whole.
    let whole = rounded as i128;
    let mut out = String::new();
    match out.write_formatted(&whole, &Locale::en_IN) {
        Ok(_) => out,
        Err(_) => whole.to_string(),
    }
}

/// Formats display text that should already hold a plain number.
///
/// Anything that is not a number on its own (`"abc"`, `"1,200"`) renders as
/// `"0"`; use [`parse_amount`] first when the text may carry separators.
pub fn format_amount_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return format_amount(0.0);
    }
    format_amount(trimmed.parse::<f64>().unwrap_or(0.0))
}

/// Coerces a spreadsheet display value into a number.
///
/// Every character other than ASCII digits, `.` and `-` is dropped before
/// parsing, so `"₹ 4,500 /sqyd"` reads as `4500`. Anything that still fails
/// to parse is `0`.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits_the_indian_way() {
        assert_eq!(format_amount(1_234_567.0), "12,34,567");
        assert_eq!(format_amount(123_456_789.0), "12,34,56,789");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(-5.0), "-5");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_amount(2.5), "3");
        assert_eq!(format_amount(29_499.6), "29,500");
        assert_eq!(format_amount(-0.4), "0");
        assert_eq!(round_amount(-2.5), -3.0);
    }

    #[test]
    fn split_noise_does_not_flip_a_half() {
        assert_eq!(round_amount(594_137.499_999_999_9), 594_138.0);
        assert_eq!(round_amount(594_137.500_000_000_1), 594_138.0);
        assert_eq!(round_amount(594_137.499), 594_137.0);
    }

    #[test]
    fn amounts_past_the_i64_range_keep_their_digits() {
        let grouped = format_amount(1.5e22);
        assert!(grouped.starts_with("15,00,"), "{grouped}");
        assert_eq!(grouped.replace(',', ""), format!("15{}", "0".repeat(21)));
        assert_eq!(format_amount(-1.5e22).replace(',', ""), format!("-15{}", "0".repeat(21)));
        assert_eq!(format_amount(1e300).len(), 301);
    }

    #[test]
    fn non_numeric_text_formats_as_zero() {
        assert_eq!(format_amount_text("abc"), "0");
        assert_eq!(format_amount_text(""), "0");
        assert_eq!(format_amount_text(" 1234567 "), "12,34,567");
        assert_eq!(format_amount(f64::NAN), "0");
    }

    #[test]
    fn parse_amount_strips_currency_noise() {
        assert_eq!(parse_amount("₹ 4,500"), 4500.0);
        assert_eq!(parse_amount(" 150 sq.yd "), 150.0);
        assert_eq!(parse_amount("-12.5"), -12.5);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("N/A"), 0.0);
        assert_eq!(parse_amount("1.2.3"), 0.0);
        assert_eq!(parse_amount("5-3"), 0.0);
    }
}
