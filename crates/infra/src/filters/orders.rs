use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crm_core::{Decimal, ProductId};
use crm_customers::Customer;
use crm_products::Product;
use crm_sales::{Order, OrderStatus};

use super::{Criterion, Predicate, contains_ci, needle, within};

/// An order joined with its customer and products, as seen by criteria.
#[derive(Debug, Clone)]
pub struct OrderRow<'a> {
    pub order: &'a Order,
    pub customer: Option<&'a Customer>,
    pub products: Vec<&'a Product>,
}

/// Order filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    pub total_min: Option<Decimal>,
    pub total_max: Option<Decimal>,
    pub order_date_after: Option<DateTime<Utc>>,
    pub order_date_before: Option<DateTime<Utc>>,
    /// Case-insensitive substring of the customer's name.
    pub customer_name_contains: Option<String>,
    /// Case-insensitive substring of any product's name.
    pub product_name_contains: Option<String>,
    pub product_id: Option<ProductId>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderCriterion {
    TotalBetween {
        min: Option<Decimal>,
        max: Option<Decimal>,
    },
    OrderDateBetween {
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    },
    CustomerNameContains(String),
    ProductNameContains(String),
    ProductIdEquals(ProductId),
    StatusEquals(OrderStatus),
}

impl OrderFilter {
    /// Pending orders placed within `[after, before]`.
    pub fn pending_between(after: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        Self {
            order_date_after: Some(after),
            order_date_before: Some(before),
            status: Some(OrderStatus::Pending),
            ..Default::default()
        }
    }

    pub fn predicate(&self) -> Predicate<OrderCriterion> {
        let mut p = Predicate::all();
        if self.total_min.is_some() || self.total_max.is_some() {
            p = p.and(OrderCriterion::TotalBetween {
                min: self.total_min,
                max: self.total_max,
            });
        }
        if self.order_date_after.is_some() || self.order_date_before.is_some() {
            p = p.and(OrderCriterion::OrderDateBetween {
                after: self.order_date_after,
                before: self.order_date_before,
            });
        }
        if let Some(n) = needle(&self.customer_name_contains) {
            p = p.and(OrderCriterion::CustomerNameContains(n));
        }
        if let Some(n) = needle(&self.product_name_contains) {
            p = p.and(OrderCriterion::ProductNameContains(n));
        }
        if let Some(id) = self.product_id {
            p = p.and(OrderCriterion::ProductIdEquals(id));
        }
        if let Some(status) = self.status {
            p = p.and(OrderCriterion::StatusEquals(status));
        }
        p
    }
}

impl<'a> Criterion<OrderRow<'a>> for OrderCriterion {
    fn matches(&self, row: &OrderRow<'a>) -> bool {
        match self {
            OrderCriterion::TotalBetween { min, max } => within(&row.order.total_amount, min, max),
            OrderCriterion::OrderDateBetween { after, before } => {
                within(&row.order.order_date, after, before)
            }
            OrderCriterion::CustomerNameContains(n) => {
                row.customer.is_some_and(|c| contains_ci(&c.name, n))
            }
            // Any match is enough; several matching products still yield one row.
            OrderCriterion::ProductNameContains(n) => {
                row.products.iter().any(|p| contains_ci(&p.name, n))
            }
            OrderCriterion::ProductIdEquals(id) => row.order.contains_product(id),
            OrderCriterion::StatusEquals(status) => row.order.status == *status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crm_core::{CustomerId, OrderId};

    fn product(name: &str) -> Product {
        Product {
            id: ProductId::new(),
            name: name.to_string(),
            price: Decimal::from(10),
            stock: 5,
        }
    }

    fn customer(name: &str) -> Customer {
        Customer {
            id: CustomerId::new(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: None,
            created_at: Utc::now(),
        }
    }

    fn order(customer: &Customer, products: &[&Product], total: i64) -> Order {
        Order {
            id: OrderId::new(),
            customer_id: customer.id,
            product_ids: products.iter().map(|p| p.id).collect(),
            total_amount: Decimal::from(total),
            order_date: Utc::now(),
            status: OrderStatus::Pending,
        }
    }

    #[test]
    fn joins_through_customer_and_products() {
        let alice = customer("Alice");
        let laptop = product("Laptop Pro");
        let sleeve = product("Laptop Sleeve");
        let o = order(&alice, &[&laptop, &sleeve], 40);
        let row = OrderRow {
            order: &o,
            customer: Some(&alice),
            products: vec![&laptop, &sleeve],
        };

        let filter = OrderFilter {
            customer_name_contains: Some("ali".to_string()),
            product_name_contains: Some("laptop".to_string()),
            product_id: Some(sleeve.id),
            total_min: Some(Decimal::from(40)),
            ..Default::default()
        };
        assert!(filter.predicate().matches(&row));
    }

    #[test]
    fn missing_customer_never_matches_customer_criteria() {
        let bob = customer("Bob");
        let mouse = product("Mouse");
        let o = order(&bob, &[&mouse], 10);
        let row = OrderRow {
            order: &o,
            customer: None,
            products: vec![&mouse],
        };
        let p = OrderFilter {
            customer_name_contains: Some("bob".to_string()),
            ..Default::default()
        }
        .predicate();
        assert!(!p.matches(&row));
    }

    #[test]
    fn pending_window_excludes_old_and_completed_orders() {
        let now = Utc::now();
        let carol = customer("Carol");
        let pen = product("Pen");
        let p = OrderFilter::pending_between(now - Duration::days(7), now).predicate();

        let mut recent = order(&carol, &[&pen], 1);
        recent.order_date = now - Duration::days(1);
        let mut old = order(&carol, &[&pen], 1);
        old.order_date = now - Duration::days(8);
        let mut done = order(&carol, &[&pen], 1);
        done.status = OrderStatus::Completed;

        fn row<'a>(o: &'a Order, c: &'a Customer, item: &'a Product) -> OrderRow<'a> {
            OrderRow {
                order: o,
                customer: Some(c),
                products: vec![item],
            }
        }
        assert!(p.matches(&row(&recent, &carol, &pen)));
        assert!(!p.matches(&row(&old, &carol, &pen)));
        assert!(!p.matches(&row(&done, &carol, &pen)));
    }
}
