//! Chilean RUT validation and formatting.
//!
//! A RUT is a tax identifier of the form `12.345.678-5`: a number plus a
//! mod-11 check digit where 10 is written `K`. Validation normalizes first,
//! so dots, dashes and lowercase `k` are all accepted.

/// Strip everything but digits and `K`, uppercasing as it goes
#[must_use]
pub fn clean(rut: &str) -> String {
    rut.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'k' || *c == 'K')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Mod-11 check digit for the numeric part
///
/// Multipliers cycle 2..=7 starting from the rightmost digit; a result of
/// 11 maps to `0` and 10 to `K`. Returns `None` if the input contains a
/// non-digit.
#[must_use]
pub fn check_digit(number: &str) -> Option<char> {
    if number.is_empty() {
        return None;
    }
    let mut sum: u32 = 0;
    let mut multiplier = 2;
    for c in number.chars().rev() {
        let digit = c.to_digit(10)?;
        sum += digit * multiplier;
        multiplier = if multiplier == 7 { 2 } else { multiplier + 1 };
    }
    Some(match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        n => char::from_digit(n, 10)?,
    })
}

/// Whether the RUT's check digit matches its number
///
/// Anything shorter than 8 significant characters is rejected outright.
#[must_use]
pub fn validate(rut: &str) -> bool {
    let cleaned = clean(rut);
    if cleaned.len() < 8 {
        return false;
    }
    let Some(given) = cleaned.chars().last() else {
        return false;
    };
    let number = &cleaned[..cleaned.len() - 1];
    check_digit(number) == Some(given)
}

/// Normalize and add display punctuation: `123456785` -> `12.345.678-5`
///
/// Inputs too short to carry a check digit come back cleaned but otherwise
/// untouched.
#[must_use]
pub fn format(rut: &str) -> String {
    let cleaned = clean(rut);
    if cleaned.len() < 2 {
        return cleaned;
    }
    let (number, dv) = cleaned.split_at(cleaned.len() - 1);
    let digits = number.as_bytes();
    let mut grouped = String::with_capacity(number.len() + number.len() / 3 + 2);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(char::from(*digit));
    }
    format!("{grouped}-{dv}")
}
