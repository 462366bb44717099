//! Number formatting for chat output.

/// `1234.56` → `1.234,56`
pub fn format_number_br(value: f64) -> String {
    format_grouped(value, '.', ',')
}

/// `1234.56` → `1,234.56`
pub fn format_number_us(value: f64) -> String {
    format_grouped(value, ',', '.')
}

/// Percentage change with a colored marker.
pub fn format_change(value: f64) -> String {
    let marker = if value > 0.0 {
        "🟢"
    } else if value < 0.0 {
        "🔴"
    } else {
        "⚪"
    };
    format!("{} {:.2}%", marker, value)
}

fn format_grouped(value: f64, thousands: char, decimal: char) -> String {
    if !value.is_finite() {
        return format!("0{}00", decimal);
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let int_part = (cents / 100).to_string();
    let frac_part = cents % 100;

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(thousands);
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}{}{:02}", sign, grouped, decimal, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_br() {
        assert_eq!(format_number_br(0.0), "0,00");
        assert_eq!(format_number_br(1.0), "1,00");
        assert_eq!(format_number_br(1234.56), "1.234,56");
        assert_eq!(format_number_br(1_000_000.99), "1.000.000,99");
        assert_eq!(format_number_br(999.999), "1.000,00");
    }

    #[test]
    fn test_format_number_us() {
        assert_eq!(format_number_us(0.0), "0.00");
        assert_eq!(format_number_us(1.0), "1.00");
        assert_eq!(format_number_us(1234.56), "1,234.56");
        assert_eq!(format_number_us(1_000_000.99), "1,000,000.99");
        assert_eq!(format_number_us(123.4), "123.40");
    }

    #[test]
    fn test_format_negative_and_non_finite() {
        assert_eq!(format_number_br(-1234.5), "-1.234,50");
        assert_eq!(format_number_us(f64::NAN), "0.00");
    }

    #[test]
    fn test_format_change_markers() {
        assert_eq!(format_change(2.5), "🟢 2.50%");
        assert_eq!(format_change(-0.5), "🔴 -0.50%");
        assert_eq!(format_change(0.0), "⚪ 0.00%");
    }
}
