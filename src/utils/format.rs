/// Shown wherever an optional metric is missing.
pub const PLACEHOLDER: &str = "-";

/// `$2,000`, `$1,234.5`, `-$300`.
pub fn format_money(amount: f64) -> String {
    if !amount.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let frac = cents % 100;
    let decimals = if frac == 0 {
        String::new()
    } else if frac % 10 == 0 {
        format!(".{}", frac / 10)
    } else {
        format!(".{:02}", frac)
    };
    format!("{}${}{}", sign, whole, decimals)
}

/// Prices are shown as the service sent them, prefixed with `$`.
pub fn format_price(price: f64) -> String {
    format!("${}", price)
}

/// Fraction to percent with one decimal: `0.123` -> `12.3%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Zero counts as missing, the way the service leaves unset metrics at zero.
pub fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

pub fn or_placeholder<T, F>(value: Option<T>, render: F) -> String
where
    F: FnOnce(T) -> String,
{
    value.map(render).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(",")
}
