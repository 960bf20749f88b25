/// Format a float as a euro amount, whole euros with dot separators: € 1.234
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let whole = format!("{:.0}", val.abs().round());

    let mut with_dots = String::new();
    for (i, c) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_dots.push('.');
        }
        with_dots.push(c);
    }
    let with_dots: String = with_dots.chars().rev().collect();

    if negative {
        format!("-€ {with_dots}")
    } else {
        format!("€ {with_dots}")
    }
}

/// Parse a locale-formatted amount into a float. Dots are thousands
/// separators, the comma is the decimal mark: "1.234,56" is 1234.56.
/// Never fails; anything unparsable comes back as 0.
pub fn parse_money(raw: &str) -> f64 {
    let cleaned = raw.trim().replace('.', "").replace(',', ".");
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Human-readable file size: 0 B, 234.4 KB, 1.2 MB. Bytes stay exact,
/// everything above gets one decimal.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let exp = (((bytes as f64).ln() / 1024f64.ln()).floor() as usize).min(UNITS.len() - 1);
    if exp == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", bytes as f64 / 1024f64.powi(exp as i32), UNITS[exp])
    }
}

/// Render a stored number back into the editable form: whole values bare,
/// fractions with a decimal comma so the text re-parses via [`parse_money`].
pub fn edit_number(val: f64) -> String {
    if val == val.trunc() {
        format!("{:.0}", val)
    } else {
        val.to_string().replace('.', ",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "€ 1.235");
        assert_eq!(money(-500.00), "-€ 500");
        assert_eq!(money(0.0), "€ 0");
        assert_eq!(money(1000000.0), "€ 1.000.000");
        assert_eq!(money(227.0), "€ 227");
    }

    #[test]
    fn test_money_rounds_half_away_from_zero() {
        assert_eq!(money(2.5), "€ 3");
        assert_eq!(money(-2.5), "-€ 3");
        assert_eq!(money(0.4), "€ 0");
    }

    #[test]
    fn test_parse_money_locale() {
        assert_eq!(parse_money("1.234,56"), 1234.56);
        assert_eq!(parse_money("245"), 245.0);
        assert_eq!(parse_money("-1.234,5"), -1234.5);
        assert_eq!(parse_money("  9.500 "), 9500.0);
        // dots are always grouping, never decimals
        assert_eq!(parse_money("12.34"), 1234.0);
    }

    #[test]
    fn test_parse_money_is_total() {
        assert_eq!(parse_money(""), 0.0);
        assert_eq!(parse_money("abc"), 0.0);
        assert_eq!(parse_money("12,3,4"), 0.0);
        assert_eq!(parse_money("NaN"), 0.0);
        assert_eq!(parse_money("Infinity"), 0.0);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(240_000), "234.4 KB");
        assert_eq!(format_bytes(1_258_291), "1.2 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_edit_number() {
        assert_eq!(edit_number(32000.0), "32000");
        assert_eq!(edit_number(0.0), "0");
        assert_eq!(edit_number(12.5), "12,5");
        assert_eq!(edit_number(-3.25), "-3,25");
        assert_eq!(parse_money(&edit_number(12.5)), 12.5);
    }
}
