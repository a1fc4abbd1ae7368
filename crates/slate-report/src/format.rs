//! Fixed two-decimal currency and variation formatting.

/// Formats a currency amount as `Rs. 1,234.00`.
///
/// The builtin PDF fonts cover WinAnsi only, so the rupee glyph is spelled
/// out rather than rendered as a symbol.
pub fn money(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u128;
    let units = cents / 100;
    let fraction = cents % 100;

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}Rs. {grouped}.{fraction:02}")
}

/// Formats a variation percentage, or `N/A` when undefined.
pub fn variation(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "N/A".to_string(),
    }
}

/// `week_9` / `month_3` labels as table text (`Week 9`, `Month 3`).
pub fn period_label(label: &str) -> String {
    match label.split_once('_') {
        Some((kind, rest)) => {
            let mut chars = kind.chars();
            match chars.next() {
                Some(first) => format!("{}{} {}", first.to_ascii_uppercase(), chars.as_str(), rest),
                None => rest.to_string(),
            }
        }
        None => label.to_string(),
    }
}
