/// Format a monetary amount with its currency code, like "1,234.56 USD".
/// Negative amounts keep the sign in front of the number.
pub fn format_money(amount: f64, currency: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let value = format_grouped(amount.abs());
    if currency.is_empty() {
        format!("{sign}{value}")
    } else {
        format!("{sign}{value} {currency}")
    }
}

/// Format a ratio in [0, 1] as a percentage with one decimal, like "23.4%".
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Format a count with thousands separators, like "12,345".
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    group_digits(&digits)
}

fn format_grouped(value: f64) -> String {
    let text = format!("{value:.2}");
    let (whole, frac) = match text.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (text.as_str(), "00"),
    };
    format!("{}.{frac}", group_digits(whole))
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let chars: Vec<char> = digits.chars().collect();
    for (idx, ch) in chars.iter().enumerate() {
        if idx > 0 && (chars.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out
}
