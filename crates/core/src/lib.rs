//! `crm-core` — shared building blocks for the CRM service.
//!
//! This crate contains **pure** primitives (identifiers, the error model and
//! field validation). It performs no IO.

pub mod error;
pub mod id;
pub mod validation;

pub use error::{CrmError, CrmResult};
pub use id::{CustomerId, OrderId, ProductId};
pub use rust_decimal::Decimal;
