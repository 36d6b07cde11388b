//! USD amount formatting for reports.

/// Formats an amount as US dollars with cents and thousands separators: `$1,234.56`, `-$50.00`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// Short form for chart axes: `$1.5k` from a thousand up, the plain value below.
pub fn format_compact_currency(value: f64) -> String {
    if value >= 1000.0 {
        format!("${:.1}k", value / 1000.0)
    } else {
        format!("${value}")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
