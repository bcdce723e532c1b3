//! Error model for CRM mutations and queries.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::id::{CustomerId, OrderId, ProductId};
use crate::validation::{InvalidEmail, InvalidName, InvalidPhone, InvalidPrice, InvalidStock};

/// Result type used across the CRM service layer.
pub type CrmResult<T> = Result<T, CrmError>;

/// CRM error.
///
/// Validation and not-found failures are values returned to the caller, never
/// panics. Transport failures of the background jobs live in the job layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CrmError {
    #[error("email already exists: {0}")]
    DuplicateEmail(String),

    #[error("invalid phone number: {0:?}")]
    InvalidPhone(String),

    #[error("invalid price: {0} (must be 0.01 to 99999999.99 with at most 2 decimal places)")]
    InvalidPrice(Decimal),

    #[error("invalid stock: {0} (must not be negative)")]
    InvalidStock(i64),

    #[error("invalid email: {0:?}")]
    InvalidEmail(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),

    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("an order must contain at least one product")]
    EmptyProductList,

    #[error("amount exceeds the supported range")]
    AmountOverflow,

    /// The backing store failed (poisoned lock, unavailable database, ...).
    #[error("storage error: {0}")]
    Storage(String),
}

impl CrmError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Stable machine-readable code, used by transport error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            CrmError::DuplicateEmail(_) => "duplicate_email",
            CrmError::InvalidPhone(_) => "invalid_phone",
            CrmError::InvalidPrice(_) => "invalid_price",
            CrmError::InvalidStock(_) => "invalid_stock",
            CrmError::InvalidEmail(_) => "invalid_email",
            CrmError::InvalidName(_) => "invalid_name",
            CrmError::CustomerNotFound(_) => "customer_not_found",
            CrmError::ProductNotFound(_) => "product_not_found",
            CrmError::OrderNotFound(_) => "order_not_found",
            CrmError::EmptyProductList => "empty_product_list",
            CrmError::AmountOverflow => "amount_overflow",
            CrmError::Storage(_) => "storage_error",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CrmError::CustomerNotFound(_) | CrmError::ProductNotFound(_) | CrmError::OrderNotFound(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CrmError::InvalidPhone(_)
                | CrmError::InvalidPrice(_)
                | CrmError::InvalidStock(_)
                | CrmError::InvalidEmail(_)
                | CrmError::InvalidName(_)
                | CrmError::EmptyProductList
        )
    }
}

impl From<InvalidPhone> for CrmError {
    fn from(e: InvalidPhone) -> Self {
        Self::InvalidPhone(e.0)
    }
}

impl From<InvalidPrice> for CrmError {
    fn from(e: InvalidPrice) -> Self {
        Self::InvalidPrice(e.0)
    }
}

impl From<InvalidStock> for CrmError {
    fn from(e: InvalidStock) -> Self {
        Self::InvalidStock(e.0)
    }
}

impl From<InvalidEmail> for CrmError {
    fn from(e: InvalidEmail) -> Self {
        Self::InvalidEmail(e.0)
    }
}

impl From<InvalidName> for CrmError {
    fn from(e: InvalidName) -> Self {
        Self::InvalidName(e.to_string())
    }
}
