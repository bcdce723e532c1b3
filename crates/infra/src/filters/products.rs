use serde::{Deserialize, Serialize};

use crm_core::Decimal;
use crm_products::{LOW_STOCK_THRESHOLD, Product};

use super::{Criterion, Predicate, contains_ci, needle, within};

/// Product filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub name_contains: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub stock_min: Option<i64>,
    pub stock_max: Option<i64>,
    /// Only products below the low-stock threshold.
    #[serde(default)]
    pub low_stock: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductCriterion {
    NameContains(String),
    PriceBetween {
        min: Option<Decimal>,
        max: Option<Decimal>,
    },
    StockBetween {
        min: Option<i64>,
        max: Option<i64>,
    },
    /// `stock < LOW_STOCK_THRESHOLD`.
    LowStock,
}

impl ProductFilter {
    /// Filter selecting restock candidates.
    pub fn low_stock() -> Self {
        Self {
            low_stock: true,
            ..Default::default()
        }
    }

    pub fn price_between(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self {
            price_min: min,
            price_max: max,
            ..Default::default()
        }
    }

    pub fn predicate(&self) -> Predicate<ProductCriterion> {
        let mut p = Predicate::all();
        if let Some(n) = needle(&self.name_contains) {
            p = p.and(ProductCriterion::NameContains(n));
        }
        if self.price_min.is_some() || self.price_max.is_some() {
            p = p.and(ProductCriterion::PriceBetween {
                min: self.price_min,
                max: self.price_max,
            });
        }
        if self.stock_min.is_some() || self.stock_max.is_some() {
            p = p.and(ProductCriterion::StockBetween {
                min: self.stock_min,
                max: self.stock_max,
            });
        }
        if self.low_stock {
            p = p.and(ProductCriterion::LowStock);
        }
        p
    }
}

impl Criterion<Product> for ProductCriterion {
    fn matches(&self, product: &Product) -> bool {
        match self {
            ProductCriterion::NameContains(n) => contains_ci(&product.name, n),
            ProductCriterion::PriceBetween { min, max } => within(&product.price, min, max),
            ProductCriterion::StockBetween { min, max } => within(&product.stock, min, max),
            ProductCriterion::LowStock => product.stock < LOW_STOCK_THRESHOLD,
        }
    }
}
