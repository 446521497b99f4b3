//! Display formatting for metric values.

const MISSING: &str = "n/a";

/// Whole-unit currency with thousands separators: `$1,234,567`.
///
/// Negative values keep the sign after the symbol (`$-1,234`), including
/// small negatives that round to zero (`$-0`).
pub fn currency(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let rounded = format!("{value:.0}");
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(d) => ("-", d),
        None => ("", rounded.as_str()),
    };
    format!("${sign}{}", group_thousands(digits))
}

/// Two-decimal percentage: `12.34%`.
pub fn percent(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    format!("{value:.2}%")
}

/// Optional percentage, `n/a` when absent.
pub fn percent_opt(value: Option<f64>) -> String {
    value.map(percent).unwrap_or_else(|| MISSING.to_string())
}

pub fn count(n: usize) -> String {
    n.to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(currency(0.0), "$0");
        assert_eq!(currency(999.4), "$999");
        assert_eq!(currency(1000.0), "$1,000");
        assert_eq!(currency(1_234_567.89), "$1,234,568");
        assert_eq!(currency(-45_000.0), "$-45,000");
        assert_eq!(currency(f64::NAN), "n/a");
    }

    #[test]
    fn currency_keeps_sign_of_negatives_rounding_to_zero() {
        assert_eq!(currency(-0.2), "$-0");
        assert_eq!(currency(-0.0), "$-0");
        assert_eq!(currency(0.2), "$0");
        assert_eq!(currency(-999.6), "$-1,000");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(percent(12.3456), "12.35%");
        assert_eq!(percent(-3.0), "-3.00%");
        assert_eq!(percent(f64::INFINITY), "n/a");
        assert_eq!(percent_opt(None), "n/a");
        assert_eq!(percent_opt(Some(1.0)), "1.00%");
    }

    #[test]
    fn count_is_plain() {
        assert_eq!(count(1234), "1234");
    }
}
