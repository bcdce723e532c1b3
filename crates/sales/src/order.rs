use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crm_core::{CrmError, CustomerId, Decimal, OrderId, ProductId};

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order: one customer, a non-empty set of products and a cached total.
///
/// `total_amount` is the sum of the product prices at the time of the last
/// recomputation. Price changes do not touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

/// Sum of prices; zero for an empty iterator.
///
/// Fails with `AmountOverflow` instead of panicking when the sum leaves the
/// `Decimal` range.
pub fn compute_total<I>(prices: I) -> Result<Decimal, CrmError>
where
    I: IntoIterator<Item = Decimal>,
{
    prices
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p).ok_or(CrmError::AmountOverflow))
}

/// Input for creating an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
    /// Defaults to the creation time.
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
}

impl NewOrder {
    pub fn new(customer_id: CustomerId, product_ids: Vec<ProductId>) -> Self {
        Self {
            customer_id,
            product_ids,
            order_date: None,
        }
    }

    pub fn with_order_date(mut self, at: DateTime<Utc>) -> Self {
        self.order_date = Some(at);
        self
    }

    /// Product ids with repeats removed, first occurrence wins.
    pub fn distinct_product_ids(&self) -> Vec<ProductId> {
        let mut seen = std::collections::HashSet::with_capacity(self.product_ids.len());
        self.product_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Resolve the order against the current catalog.
    ///
    /// Checks run in this order: customer, then each product id (the first
    /// unresolved id aborts), then emptiness. `price_of` is called once per
    /// distinct product id.
    pub fn resolve<F>(
        &self,
        id: OrderId,
        customer_exists: bool,
        now: DateTime<Utc>,
        mut price_of: F,
    ) -> Result<Order, CrmError>
    where
        F: FnMut(&ProductId) -> Option<Decimal>,
    {
        if !customer_exists {
            return Err(CrmError::CustomerNotFound(self.customer_id));
        }

        let product_ids = self.distinct_product_ids();
        let mut prices = Vec::with_capacity(product_ids.len());
        for pid in &product_ids {
            let price = price_of(pid).ok_or(CrmError::ProductNotFound(*pid))?;
            prices.push(price);
        }

        if product_ids.is_empty() {
            return Err(CrmError::EmptyProductList);
        }

        Ok(Order {
            id,
            customer_id: self.customer_id,
            product_ids,
            total_amount: compute_total(prices)?,
            order_date: self.order_date.unwrap_or(now),
            status: OrderStatus::Pending,
        })
    }
}

impl Order {
    /// Recompute the cached total from current prices.
    ///
    /// Products that no longer resolve contribute nothing. On overflow the
    /// cached total is left unchanged.
    pub fn recompute_total<F>(&mut self, mut price_of: F) -> Result<Decimal, CrmError>
    where
        F: FnMut(&ProductId) -> Option<Decimal>,
    {
        self.total_amount = compute_total(self.product_ids.iter().filter_map(|p| price_of(p)))?;
        Ok(self.total_amount)
    }

    pub fn contains_product(&self, product_id: &ProductId) -> bool {
        self.product_ids.contains(product_id)
    }
}
