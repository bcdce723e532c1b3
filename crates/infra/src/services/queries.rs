use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crm_core::{CrmResult, OrderId};
use crm_customers::Customer;
use crm_products::Product;
use crm_sales::Order;

use crate::filters::{CustomerFilter, OrderFilter, ProductFilter};
use crate::query::{Page, Pagination};
use crate::store::EntityStore;

/// One pending order that is due a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReminder {
    pub order_id: OrderId,
    pub customer_email: String,
    pub order_date: DateTime<Utc>,
}

/// Read-only list queries.
#[derive(Debug, Clone)]
pub struct QueryService<S> {
    store: S,
}

impl<S: EntityStore> QueryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn all_customers(
        &self,
        filter: &CustomerFilter,
        pagination: Pagination,
    ) -> CrmResult<Page<Customer>> {
        let rows = self.store.customers(&filter.predicate())?;
        Ok(Page::from_matches(rows, pagination))
    }

    pub fn all_products(
        &self,
        filter: &ProductFilter,
        pagination: Pagination,
    ) -> CrmResult<Page<Product>> {
        let rows = self.store.products(&filter.predicate())?;
        Ok(Page::from_matches(rows, pagination))
    }

    pub fn all_orders(&self, filter: &OrderFilter, pagination: Pagination) -> CrmResult<Page<Order>> {
        let rows = self.store.orders(&filter.predicate())?;
        Ok(Page::from_matches(rows, pagination))
    }

    /// Pending orders placed within `[start, end]`, with their customer's email.
    pub fn pending_order_reminders(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CrmResult<Vec<OrderReminder>> {
        let orders = self
            .store
            .orders(&OrderFilter::pending_between(start, end).predicate())?;

        let mut reminders = Vec::with_capacity(orders.len());
        for order in orders {
            // Orders are removed with their customer, so a miss means a
            // concurrent delete; the order is gone as well.
            if let Some(customer) = self.store.get_customer(order.customer_id)? {
                reminders.push(OrderReminder {
                    order_id: order.id,
                    customer_email: customer.email,
                    order_date: order.order_date,
                });
            }
        }
        Ok(reminders)
    }
}
