use serde::{Deserialize, Serialize};

use crm_core::validation::{validate_name, validate_price, validate_stock};
use crm_core::{CrmError, Decimal, ProductId};

/// Products with `stock` strictly below this value are restock candidates.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Units added to each low-stock product by a restock run.
pub const RESTOCK_AMOUNT: i64 = 10;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }

    /// Add `amount` units. Saturates instead of overflowing.
    pub fn restock(&mut self, amount: i64) {
        self.stock = self.stock.saturating_add(amount);
    }

    /// Replace the price after validating it.
    ///
    /// Orders keep their cached totals; they are only recomputed on request.
    pub fn set_price(&mut self, price: Decimal) -> Result<(), CrmError> {
        validate_price(price)?;
        self.price = price;
        Ok(())
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i64,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            stock: 0,
        }
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn validate(&self) -> Result<(), CrmError> {
        validate_name(self.name.trim())?;
        validate_price(self.price)?;
        validate_stock(self.stock)?;
        Ok(())
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name.trim().to_string(),
            price: self.price,
            stock: self.stock,
        }
    }
}
