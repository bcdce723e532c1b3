use chrono::{DateTime, Utc};
use serde::Deserialize;

use crm_core::{Decimal, ProductId};
use crm_customers::CustomerInput;
use crm_infra::filters::{CustomerFilter, OrderFilter, ProductFilter};
use crm_infra::query::Pagination;
use crm_sales::OrderStatus;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct BulkCreateCustomersRequest {
    pub customers: Vec<CustomerInput>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePriceRequest {
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

// -------------------------
// Query strings
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CustomerListQuery {
    pub name_contains: Option<String>,
    pub email_contains: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub phone_prefix: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl CustomerListQuery {
    pub fn into_parts(self) -> (CustomerFilter, Pagination) {
        (
            CustomerFilter {
                name_contains: self.name_contains,
                email_contains: self.email_contains,
                created_after: self.created_after,
                created_before: self.created_before,
                phone_prefix: self.phone_prefix,
            },
            Pagination::new(self.limit, self.offset),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub name_contains: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub stock_min: Option<i64>,
    pub stock_max: Option<i64>,
    #[serde(default)]
    pub low_stock: bool,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ProductListQuery {
    pub fn into_parts(self) -> (ProductFilter, Pagination) {
        (
            ProductFilter {
                name_contains: self.name_contains,
                price_min: self.price_min,
                price_max: self.price_max,
                stock_min: self.stock_min,
                stock_max: self.stock_max,
                low_stock: self.low_stock,
            },
            Pagination::new(self.limit, self.offset),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub total_min: Option<Decimal>,
    pub total_max: Option<Decimal>,
    pub order_date_after: Option<DateTime<Utc>>,
    pub order_date_before: Option<DateTime<Utc>>,
    pub customer_name_contains: Option<String>,
    pub product_name_contains: Option<String>,
    pub product_id: Option<ProductId>,
    pub status: Option<OrderStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl OrderListQuery {
    pub fn into_parts(self) -> (OrderFilter, Pagination) {
        (
            OrderFilter {
                total_min: self.total_min,
                total_max: self.total_max,
                order_date_after: self.order_date_after,
                order_date_before: self.order_date_before,
                customer_name_contains: self.customer_name_contains,
                product_name_contains: self.product_name_contains,
                product_id: self.product_id,
                status: self.status,
            },
            Pagination::new(self.limit, self.offset),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ReminderWindowQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_query_maps_every_field() {
        let q = OrderListQuery {
            total_min: Some(Decimal::from(10)),
            status: Some(OrderStatus::Pending),
            customer_name_contains: Some("ali".to_string()),
            limit: Some(5_000),
            ..Default::default()
        };
        let (filter, page) = q.into_parts();
        assert_eq!(filter.total_min, Some(Decimal::from(10)));
        assert_eq!(filter.status, Some(OrderStatus::Pending));
        assert_eq!(filter.customer_name_contains.as_deref(), Some("ali"));
        assert_eq!(page.limit, crm_infra::query::MAX_LIMIT);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn empty_product_query_is_unconstrained() {
        let (filter, page) = ProductListQuery::default().into_parts();
        assert!(filter.predicate().is_unconstrained());
        assert_eq!(page, Pagination::default());
    }
}
