use chrono::{DateTime, Local, Utc};

/// Price text without the currency sign: whole dollars above 1000,
/// cents above 1, four decimals for sub-dollar coins.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "---".to_string();
    }
    if price.abs() >= 1000.0 {
        group_thousands(&format!("{:.0}", price))
    } else if price.abs() >= 1.0 {
        format!("{:.2}", price)
    } else {
        format!("{:.4}", price)
    }
}

pub fn format_usd(price: f64) -> String {
    format!("${}", format_price(price))
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{}{}", sign, out)
}

/// Chart axis label in local time.
pub fn format_hhmm(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M").to_string()
}

pub fn format_clock(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_precision_depends_on_magnitude() {
        assert_eq!(format_price(65432.7), "65,433");
        assert_eq!(format_price(1000.0), "1,000");
        assert_eq!(format_price(1234567.0), "1,234,567");
        assert_eq!(format_price(2.5), "2.50");
        assert_eq!(format_price(0.12345), "0.1235");
        assert_eq!(format_usd(3500.0), "$3,500");
    }

    #[test]
    fn non_finite_prices_render_placeholder() {
        assert_eq!(format_price(f64::NAN), "---");
    }
}
