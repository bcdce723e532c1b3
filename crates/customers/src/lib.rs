//! Customers domain module.
//!
//! Plain data + input validation rules. No IO, no HTTP, no storage.

pub mod customer;

pub use customer::{Customer, CustomerInput};
