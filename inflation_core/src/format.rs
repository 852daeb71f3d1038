// inflation_core/src/format.rs

//! Display helpers. Rounding only ever happens here, never in the converter.

/// Formats a dollar value with en-US digit grouping and two decimals: `$1,234.56`.
/// Negative values get a leading minus: `-$12.00`.
pub fn format_currency(value: f64) -> String {
    let digits = group_fixed(value.abs(), 2);
    if is_negative_after_rounding(value, &digits) {
        format!("-${}", digits)
    } else {
        format!("${}", digits)
    }
}

/// Formats a plain amount with grouping and at most three fractional digits,
/// dropping trailing zeros: `1,000`, `99.5`.
pub fn format_amount(value: f64) -> String {
    let digits = group_fixed(value.abs(), 3);
    let digits = match digits.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, frac)
            }
        }
        None => digits,
    };

    if is_negative_after_rounding(value, &digits) {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// Formats a rate as a two-decimal percentage: `113.39%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

fn is_negative_after_rounding(value: f64, digits: &str) -> bool {
    value < 0.0 && digits.chars().any(|c| c.is_ascii_digit() && c != '0')
}

fn group_fixed(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value);
    let (whole, frac) = match fixed.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(213.3858), "$213.39");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(100.0), "$100.00");
    }

    #[test]
    fn currency_keeps_sign_of_gains() {
        assert_eq!(format_currency(-3.7296), "-$3.73");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn amount_trims_trailing_zeros() {
        assert_eq!(format_amount(100.0), "100");
        assert_eq!(format_amount(1000.5), "1,000.5");
        assert_eq!(format_amount(12.34567), "12.346");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(format_percent(113.38582677), "113.39%");
        assert_eq!(format_percent(-0.3715745), "-0.37%");
    }
}
