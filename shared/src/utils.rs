// Helpers shared by every consumer of the engine output.

// Brazilian display formats: thousands dot, decimal comma.
pub mod brazilian_format {
    /// Groups the digits of an integer with dots: 1234567 -> "1.234.567".
    pub fn format_thousands(n: u64) -> String {
        group_digits(&n.to_string())
    }

    fn group_digits(digits: &str) -> String {
        let mut result = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push('.');
            }
            result.push(ch);
        }
        result.chars().rev().collect()
    }

    // Formats with a fixed number of decimals and swaps the separators,
    // keeping a leading minus sign outside the grouping.
    fn format_grouped(value: f64, decimals: usize) -> String {
        let mut rendered = format!("{:.*}", decimals, value);
        if rendered.starts_with('-') && rendered[1..].chars().all(|c| c == '0' || c == '.') {
            rendered.remove(0);
        }
        let (sign, unsigned) = match rendered.strip_prefix('-') {
            Some(rest) => ("-", rest.to_string()),
            None => ("", rendered),
        };
        match unsigned.split_once('.') {
            Some((int_part, frac_part)) => format!("{}{},{}", sign, group_digits(int_part), frac_part),
            None => format!("{}{}", sign, group_digits(&unsigned)),
        }
    }

    /// "R$ 1.234,56". Non-finite input renders as zero.
    pub fn format_currency(value: f64) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        format!("R$ {}", format_grouped(value, 2))
    }

    /// Abbreviated currency for tiles: "R$ 1,2M", "R$ 3,4k", "R$ 999".
    pub fn format_currency_short(value: f64) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        if value >= 1_000_000.0 {
            format!("R$ {:.1}M", value / 1_000_000.0).replace('.', ",")
        } else if value >= 1_000.0 {
            format!("R$ {:.1}k", value / 1_000.0).replace('.', ",")
        } else {
            format!("R$ {}", format_grouped(value, 0))
        }
    }

    /// "25,0%" for `format_percent(25.0, 1)`.
    pub fn format_percent(value: f64, decimals: usize) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        format!("{:.*}%", decimals, value).replace('.', ",")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_thousands() {
            assert_eq!(format_thousands(0), "0");
            assert_eq!(format_thousands(999), "999");
            assert_eq!(format_thousands(1000), "1.000");
            assert_eq!(format_thousands(1234567), "1.234.567");
        }

        #[test]
        fn test_format_currency() {
            assert_eq!(format_currency(1234.56), "R$ 1.234,56");
            assert_eq!(format_currency(0.0), "R$ 0,00");
            assert_eq!(format_currency(5_000_000.0), "R$ 5.000.000,00");
            assert_eq!(format_currency(-1234.5), "R$ -1.234,50");
            assert_eq!(format_currency(-0.001), "R$ 0,00");
            assert_eq!(format_currency(f64::NAN), "R$ 0,00");
        }

        #[test]
        fn test_format_currency_short() {
            assert_eq!(format_currency_short(1_240_000.0), "R$ 1,2M");
            assert_eq!(format_currency_short(3_400.0), "R$ 3,4k");
            assert_eq!(format_currency_short(999.0), "R$ 999");
            assert_eq!(format_currency_short(-5_000.0), "R$ -5.000");
        }

        #[test]
        fn test_format_percent() {
            assert_eq!(format_percent(25.0, 1), "25,0%");
            assert_eq!(format_percent(12.346, 2), "12,35%");
            assert_eq!(format_percent(f64::INFINITY, 1), "0,0%");
        }
    }
}
