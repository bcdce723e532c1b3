//! Orders domain module.
//!
//! This crate contains the order rules (product resolution, the cached
//! `total_amount` and the status lifecycle), implemented as pure logic with
//! no IO, no HTTP and no storage.

pub mod order;

pub use order::{NewOrder, Order, OrderStatus, compute_total};
