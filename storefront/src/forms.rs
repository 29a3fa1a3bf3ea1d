//! Stateless form validation.
//!
//! Validators run before any action is dispatched; a rejected form never
//! reaches the store. Error messages are user-facing and stay in Spanish
//! like the rest of the storefront copy.

use crate::rut;
use thiserror::Error;

/// Why a form was rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Email lacks an `@` with non-empty local and domain parts
    #[error("correo electrónico inválido")]
    InvalidEmail,
    /// Password shorter than 6 characters
    #[error("la contraseña debe tener al menos 6 caracteres")]
    ShortPassword,
    /// Holder name shorter than 2 characters
    #[error("nombre inválido")]
    InvalidName,
    /// Card number not 13-19 digits
    #[error("número de tarjeta inválido")]
    InvalidCard,
    /// CVV not 3-4 digits
    #[error("CVV inválido")]
    InvalidCvv,
    /// Expiry not `MM/YY` with a real month
    #[error("vencimiento inválido (MM/AA)")]
    InvalidExpiry,
    /// RUT check digit mismatch or malformed RUT
    #[error("RUT inválido")]
    InvalidRut,
}

/// Validate login credentials
///
/// # Errors
///
/// Returns the first failing check: email shape, then password length.
pub fn validate_login(email: &str, password: &str) -> Result<(), FormError> {
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid_email {
        return Err(FormError::InvalidEmail);
    }
    if password.chars().count() < 6 {
        return Err(FormError::ShortPassword);
    }
    Ok(())
}

/// Card details for the simulated hold/checkout payment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    /// Holder first name
    pub first_name: String,
    /// Holder last name
    pub last_name: String,
    /// Card number; spaces are tolerated
    pub card_number: String,
    /// Card verification value
    pub cvv: String,
    /// Expiry as `MM/YY`
    pub expiry: String,
}

impl PaymentForm {
    /// Validate every field
    ///
    /// # Errors
    ///
    /// Returns the first failing check in display order: names, card
    /// number, CVV, expiry.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.first_name.trim().chars().count() < 2
            || self.last_name.trim().chars().count() < 2
        {
            return Err(FormError::InvalidName);
        }

        let card: String = self
            .card_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if !(13..=19).contains(&card.len()) || !card.chars().all(|c| c.is_ascii_digit()) {
            return Err(FormError::InvalidCard);
        }

        if !(3..=4).contains(&self.cvv.len()) || !self.cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(FormError::InvalidCvv);
        }

        if !valid_expiry(&self.expiry) {
            return Err(FormError::InvalidExpiry);
        }

        Ok(())
    }
}

/// `MM/YY` with a zero-padded month 01-12
fn valid_expiry(expiry: &str) -> bool {
    let Some((month, year)) = expiry.split_once('/') else {
        return false;
    };
    if month.len() != 2 || year.len() != 2 {
        return false;
    }
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    month
        .parse::<u8>()
        .is_ok_and(|m| (1..=12).contains(&m))
}

/// Validate a Chilean RUT
///
/// # Errors
///
/// Returns [`FormError::InvalidRut`] when the check digit does not match.
pub fn validate_rut(value: &str) -> Result<(), FormError> {
    if rut::validate(value) {
        Ok(())
    } else {
        Err(FormError::InvalidRut)
    }
}
