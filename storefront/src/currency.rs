//! Chilean peso display formatting.

use crate::types::Money;

/// Format cents as Chilean pesos: `$` prefix, dot thousands separators,
/// no decimals
///
/// Cents are truncated, matching CLP having no fractional display unit.
///
/// ```
/// use fila_storefront::currency::format_clp;
/// use fila_storefront::types::Money;
///
/// assert_eq!(format_clp(Money::from_cents(10_235_000)), "$102.350");
/// ```
#[must_use]
pub fn format_clp(amount: Money) -> String {
    let pesos = (amount.cents() / 100).to_string();
    let mut grouped = String::with_capacity(pesos.len() + pesos.len() / 3 + 1);
    let digits = pesos.as_bytes();
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(char::from(*digit));
    }
    format!("${grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_clp(Money::from_cents(10_235_000)), "$102.350");
        assert_eq!(format_clp(Money::from_cents(1_725_000_000)), "$17.250.000");
    }

    #[test]
    fn small_amounts_have_no_separator() {
        assert_eq!(format_clp(Money::ZERO), "$0");
        assert_eq!(format_clp(Money::from_cents(9_900)), "$99");
    }

    #[test]
    fn cents_truncate() {
        assert_eq!(format_clp(Money::from_cents(199)), "$1");
    }
}
