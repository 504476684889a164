//! Display formatting for [`Money`] amounts.

use envelope_domain::Money;

pub fn symbol_for(code: &str) -> String {
    match code.to_ascii_uppercase().as_str() {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "INR" => "₹".into(),
        "BDT" => "৳".into(),
        "AUD" => "A$".into(),
        other => format!("{other} "),
    }
}

/// Renders `amount` as `$1,234.50`, with a leading minus for negatives.
pub fn format_money(amount: Money, code: &str) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let abs = amount.cents().unsigned_abs();
    let whole = group_digits(&(abs / 100).to_string(), ',');
    format!("{sign}{}{whole}.{:02}", symbol_for(code), abs % 100)
}

/// Renders a signed movement such as `+$50.00` or `-$12.00`.
pub fn format_delta(amount: Money, code: &str) -> String {
    if amount.is_negative() {
        format_money(amount, code)
    } else {
        format!("+{}", format_money(amount, code))
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
