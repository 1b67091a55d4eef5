//! Number formatting for tiles, axes and tooltips (en-US grouping)

/// Groups the integer part with commas and keeps up to three fraction
/// digits, dropping trailing zeros: `1234567.5` -> `"1,234,567.5"`.
pub fn format_locale(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value > 0.0 {
            "∞".to_string()
        } else {
            "-∞".to_string()
        };
    }

    let formatted = format!("{:.3}", value);
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, d.trim_end_matches('0')),
        None => (formatted.as_str(), ""),
    };
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    // Вставляем запятые каждые 3 цифры с конца целой части
    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    // -0.0001 rounds to zero and loses its sign
    let sign = if grouped == "0" && decimal_part.is_empty() {
        ""
    } else {
        sign
    };

    if decimal_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, decimal_part)
    }
}

/// Dollar amount for chart values and money tiles
pub fn format_currency(value: f64) -> String {
    format!("${}", format_locale(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_locale() {
        assert_eq!(format_locale(0.0), "0");
        assert_eq!(format_locale(999.0), "999");
        assert_eq!(format_locale(1000.0), "1,000");
        assert_eq!(format_locale(1234567.5), "1,234,567.5");
        assert_eq!(format_locale(67416.51), "67,416.51");
        assert_eq!(format_locale(-1234.0), "-1,234");
        assert_eq!(format_locale(0.12345), "0.123");
        assert_eq!(format_locale(-0.0001), "0");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(100.0), "$100");
        assert_eq!(format_currency(12034.9), "$12,034.9");
    }
}
