//! Field validation for customers and products.
//!
//! Every function here is pure and deterministic: no IO, no clock, no store
//! access. Email *uniqueness* is a store concern and is enforced at insert time.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

/// Smallest accepted product price.
pub const MIN_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest accepted product price, `99999999.99` (10 digits, 2 of them decimal).
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Decimal places a price may carry.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Maximum length (in characters) of customer and product names.
pub const MAX_NAME_LEN: usize = 100;

/// Optional `+` and 1-3 country digits, then 3-3-4 digit groups separated by
/// an optional `-` or space.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+?\d{1,3})?[- ]?\d{3}[- ]?\d{3}[- ]?\d{4}$").expect("Invalid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid phone number: {0:?}")]
pub struct InvalidPhone(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid price: {0}")]
pub struct InvalidPrice(pub Decimal);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid stock: {0}")]
pub struct InvalidStock(pub i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid email: {0:?}")]
pub struct InvalidEmail(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidName {
    #[error("name must not be blank")]
    Blank,
    #[error("name is {0} characters long (max {max})", max = MAX_NAME_LEN)]
    TooLong(usize),
}

/// Validate a phone number. The empty string means "no phone" and is accepted.
pub fn validate_phone(s: &str) -> Result<(), InvalidPhone> {
    if s.is_empty() || PHONE_RE.is_match(s) {
        Ok(())
    } else {
        Err(InvalidPhone(s.to_string()))
    }
}

/// Validate a product price: `MIN_PRICE..=MAX_PRICE`, whole cents only.
///
/// Trailing zeros do not count as decimal places (`0.010` is a valid price).
pub fn validate_price(p: Decimal) -> Result<(), InvalidPrice> {
    if p < MIN_PRICE || p > MAX_PRICE || p.normalize().scale() > PRICE_DECIMAL_PLACES {
        return Err(InvalidPrice(p));
    }
    Ok(())
}

/// Validate a stock level (`>= 0`).
pub fn validate_stock(n: i64) -> Result<(), InvalidStock> {
    if n < 0 {
        return Err(InvalidStock(n));
    }
    Ok(())
}

/// Shape check only: a non-empty local part and a dotted domain.
pub fn validate_email(s: &str) -> Result<(), InvalidEmail> {
    let invalid = || InvalidEmail(s.to_string());

    if s.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = s.rsplit_once('@').ok_or_else(invalid)?;
    if local.is_empty() || local.contains('@') {
        return Err(invalid());
    }
    let dotted = domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.');
    if !dotted {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_name(s: &str) -> Result<(), InvalidName> {
    if s.trim().is_empty() {
        return Err(InvalidName::Blank);
    }
    let len = s.chars().count();
    if len > MAX_NAME_LEN {
        return Err(InvalidName::TooLong(len));
    }
    Ok(())
}
