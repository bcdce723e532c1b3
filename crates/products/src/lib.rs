//! Products domain module.
//!
//! This crate contains the catalog rules (price/stock bounds, the low-stock
//! threshold and the restock step), implemented as pure logic.

pub mod product;

pub use product::{LOW_STOCK_THRESHOLD, Product, ProductInput, RESTOCK_AMOUNT};
