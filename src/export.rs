use crate::calc::calculate;
use crate::fmt::money;
use crate::models::AppState;

/// Render the plain-text filing summary: the year, one line per category
/// with its result (or a dash when nothing was entered), and a closing
/// note. Pure; gating happens at the command layer.
pub fn summary(state: &AppState) -> String {
    let mut lines = vec![format!("Year: {}", state.year), String::new()];
    for (key, record) in &state.categories {
        let value = if record.data.is_some() {
            money(calculate(record.data.as_ref()).result)
        } else {
            "\u{2014}".to_string()
        };
        lines.push(format!("{}: {}", key.label(), value));
    }
    lines.push(String::new());
    lines.push("Box 3 result: \u{2026}".to_string());
    lines.push("Note: checklist export. Copy the figures into your return.".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryKey;

    #[test]
    fn test_summary_on_empty_checklist() {
        let state = AppState::default_for_year("2027");
        let text = summary(&state);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Year: 2027");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Bank & savings: \u{2014}");
        assert_eq!(lines[6], "Crypto: \u{2014}");
        assert_eq!(lines[8], "Box 3 result: \u{2026}");
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_summary_formats_entered_results() {
        let mut state = AppState::default_for_year("2027");
        let record = state.categories.get_mut(&CategoryKey::Bank).unwrap();
        record.data = Some(CategoryKey::Bank.example_data());
        let text = summary(&state);
        assert!(text.contains("Bank & savings: € 227"));
        assert!(text.contains("Investments: \u{2014}"));
    }

    #[test]
    fn test_summary_category_order_is_fixed() {
        let state = AppState::default_for_year("2027");
        let text = summary(&state);
        let labels: Vec<usize> = [
            "Bank & savings",
            "Investments",
            "Real estate",
            "Loans & receivables",
            "Crypto",
        ]
        .iter()
        .map(|l| text.find(l).unwrap())
        .collect();
        assert!(labels.windows(2).all(|w| w[0] < w[1]));
    }
}
