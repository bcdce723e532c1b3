use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crm_core::{CrmResult, CustomerId, Decimal, OrderId, ProductId};
use crm_customers::{Customer, CustomerInput};
use crm_products::{Product, ProductInput};
use crm_sales::{NewOrder, Order, OrderStatus};

use crate::filters::{CustomerCriterion, OrderCriterion, Predicate, ProductCriterion};

/// Counts and revenue read from one consistent state of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreSummary {
    pub customers: u64,
    pub orders: u64,
    pub revenue: Decimal,
}

/// Result of a cascading customer delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedCustomer {
    pub customer: Customer,
    pub removed_orders: Vec<OrderId>,
}

/// Entity store boundary for customers, products and orders.
///
/// Every method is a single atomic operation. Read-modify-write operations
/// (`restock_products`, `insert_order`, `recompute_order_total`) must never
/// be split into separate reads and writes by implementations.
///
/// Inputs are expected to be validated already; the store only enforces what
/// needs a view of all rows (email uniqueness, reference resolution).
/// List methods return rows in creation order.
pub trait EntityStore: Send + Sync {
    /// Persist a new customer, assigning id and creation time.
    ///
    /// Fails with `DuplicateEmail` when the email (compared ASCII
    /// case-insensitively) is already taken.
    fn insert_customer(&self, input: CustomerInput) -> CrmResult<Customer>;

    fn get_customer(&self, id: CustomerId) -> CrmResult<Option<Customer>>;

    fn customers(&self, predicate: &Predicate<CustomerCriterion>) -> CrmResult<Vec<Customer>>;

    /// Remove a customer together with all of its orders.
    fn delete_customer(&self, id: CustomerId) -> CrmResult<DeletedCustomer>;

    fn insert_product(&self, input: ProductInput) -> CrmResult<Product>;

    fn get_product(&self, id: ProductId) -> CrmResult<Option<Product>>;

    fn products(&self, predicate: &Predicate<ProductCriterion>) -> CrmResult<Vec<Product>>;

    fn update_product_price(&self, id: ProductId, price: Decimal) -> CrmResult<Product>;

    /// Add `amount` to the stock of every product matching `predicate`,
    /// returning the updated products.
    fn restock_products(
        &self,
        predicate: &Predicate<ProductCriterion>,
        amount: i64,
    ) -> CrmResult<Vec<Product>>;

    /// Resolve and persist an order with its computed total in one step.
    ///
    /// On failure nothing is persisted.
    fn insert_order(&self, order: NewOrder) -> CrmResult<Order>;

    fn get_order(&self, id: OrderId) -> CrmResult<Option<Order>>;

    /// Orders matching `predicate`, in creation order.
    ///
    /// Each order appears at most once, even when several of its products
    /// satisfy a product criterion.
    fn orders(&self, predicate: &Predicate<OrderCriterion>) -> CrmResult<Vec<Order>>;

    /// Recompute and persist an order's total from current product prices.
    fn recompute_order_total(&self, id: OrderId) -> CrmResult<Order>;

    fn set_order_status(&self, id: OrderId, status: OrderStatus) -> CrmResult<Order>;

    fn summary(&self) -> CrmResult<StoreSummary>;
}

impl<S> EntityStore for Arc<S>
where
    S: EntityStore + ?Sized,
{
    fn insert_customer(&self, input: CustomerInput) -> CrmResult<Customer> {
        (**self).insert_customer(input)
    }

    fn get_customer(&self, id: CustomerId) -> CrmResult<Option<Customer>> {
        (**self).get_customer(id)
    }

    fn customers(&self, predicate: &Predicate<CustomerCriterion>) -> CrmResult<Vec<Customer>> {
        (**self).customers(predicate)
    }

    fn delete_customer(&self, id: CustomerId) -> CrmResult<DeletedCustomer> {
        (**self).delete_customer(id)
    }

    fn insert_product(&self, input: ProductInput) -> CrmResult<Product> {
        (**self).insert_product(input)
    }

    fn get_product(&self, id: ProductId) -> CrmResult<Option<Product>> {
        (**self).get_product(id)
    }

    fn products(&self, predicate: &Predicate<ProductCriterion>) -> CrmResult<Vec<Product>> {
        (**self).products(predicate)
    }

    fn update_product_price(&self, id: ProductId, price: Decimal) -> CrmResult<Product> {
        (**self).update_product_price(id, price)
    }

    fn restock_products(
        &self,
        predicate: &Predicate<ProductCriterion>,
        amount: i64,
    ) -> CrmResult<Vec<Product>> {
        (**self).restock_products(predicate, amount)
    }

    fn insert_order(&self, order: NewOrder) -> CrmResult<Order> {
        (**self).insert_order(order)
    }

    fn get_order(&self, id: OrderId) -> CrmResult<Option<Order>> {
        (**self).get_order(id)
    }

    fn orders(&self, predicate: &Predicate<OrderCriterion>) -> CrmResult<Vec<Order>> {
        (**self).orders(predicate)
    }

    fn recompute_order_total(&self, id: OrderId) -> CrmResult<Order> {
        (**self).recompute_order_total(id)
    }

    fn set_order_status(&self, id: OrderId, status: OrderStatus) -> CrmResult<Order> {
        (**self).set_order_status(id, status)
    }

    fn summary(&self) -> CrmResult<StoreSummary> {
        (**self).summary()
    }
}
