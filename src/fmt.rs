use serde::{Deserialize, Serialize};

/// Currency label applied to every amount cell of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Egp,
    Usd,
}

impl Currency {
    pub fn label(self) -> &'static str {
        match self {
            Currency::Egp => "EGP",
            Currency::Usd => "$",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Currency::Egp => "EGP",
            Currency::Usd => "USD",
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EGP" => Ok(Currency::Egp),
            "USD" | "$" => Ok(Currency::Usd),
            other => Err(format!("unknown currency: {other}")),
        }
    }
}

/// Group the integer part of a non-negative amount with commas: 1234567.5 -> "1,234,567.50"
fn grouped(abs: f64) -> String {
    let cents = format!("{:.2}", abs);
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((&cents, "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();
    format!("{with_commas}.{dec_part}")
}

/// Format an amount with thousands separators and the currency label.
///
/// `EGP` is written as a prefix word (`EGP 1,234.56`, `EGP -500.00`); the dollar
/// sign hugs the digits with the sign in front (`-$500.00`).
pub fn money(val: f64, currency: Currency) -> String {
    // Avoid rendering "-0.00" for values that round to zero.
    let negative = val < 0.0 && (val * 100.0).round() != 0.0;
    let body = grouped(val.abs());
    match (currency, negative) {
        (Currency::Egp, false) => format!("EGP {body}"),
        (Currency::Egp, true) => format!("EGP -{body}"),
        (Currency::Usd, false) => format!("${body}"),
        (Currency::Usd, true) => format!("-${body}"),
    }
}

/// Like [`money`], but a zero amount renders as `"-"`.
pub fn money_or_dash(val: f64, currency: Currency) -> String {
    if is_zero(val) {
        "-".to_string()
    } else {
        money(val, currency)
    }
}

/// Percentage with a fixed number of decimals: `percent(43.333, 2) == "43.33%"`.
pub fn percent(val: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, val)
}

/// True when the amount is zero at cent precision.
pub fn is_zero(val: f64) -> bool {
    (val * 100.0).round() == 0.0
}

/// Compare two amounts at cent precision.
pub fn amounts_equal(a: f64, b: f64) -> bool {
    is_zero(a - b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56, Currency::Usd), "$1,234.56");
        assert_eq!(money(-500.00, Currency::Usd), "-$500.00");
        assert_eq!(money(0.0, Currency::Usd), "$0.00");
        assert_eq!(money(1000000.99, Currency::Usd), "$1,000,000.99");
        assert_eq!(money(42.10, Currency::Usd), "$42.10");
    }

    #[test]
    fn test_money_egp_label() {
        assert_eq!(money(50000.0, Currency::Egp), "EGP 50,000.00");
        assert_eq!(money(0.0, Currency::Egp), "EGP 0.00");
        assert_eq!(money(-1250.5, Currency::Egp), "EGP -1,250.50");
        assert_eq!(money(999.999, Currency::Egp), "EGP 1,000.00");
    }

    #[test]
    fn test_money_never_negative_zero() {
        assert_eq!(money(-0.001, Currency::Egp), "EGP 0.00");
        assert_eq!(money(-0.0, Currency::Usd), "$0.00");
    }

    #[test]
    fn test_money_or_dash() {
        assert_eq!(money_or_dash(0.0, Currency::Egp), "-");
        assert_eq!(money_or_dash(0.004, Currency::Egp), "-");
        assert_eq!(money_or_dash(12.0, Currency::Egp), "EGP 12.00");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(78000.0 / 180000.0 * 100.0, 2), "43.33%");
        assert_eq!(percent(12.345, 1), "12.3%");
        assert_eq!(percent(0.0, 2), "0.00%");
    }

    #[test]
    fn test_amounts_equal_at_cent_precision() {
        assert!(amounts_equal(0.1 + 0.2, 0.3));
        assert!(!amounts_equal(100.0, 100.02));
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("egp".parse::<Currency>().unwrap(), Currency::Egp);
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::Usd);
        assert!("EUR".parse::<Currency>().is_err());
    }
}
