use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crm_core::{CrmResult, CustomerId, Decimal, OrderId, ProductId};
use crm_customers::{Customer, CustomerInput};
use crm_products::{Product, ProductInput, RESTOCK_AMOUNT};
use crm_sales::{NewOrder, Order, OrderStatus};

use crate::filters::ProductFilter;
use crate::store::{DeletedCustomer, EntityStore};

/// Result of a bulk customer create.
///
/// `errors` holds one message per rejected input, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCreateOutcome {
    pub customers: Vec<Customer>,
    pub errors: Vec<String>,
}

/// Result of a low-stock restock run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockSummary {
    pub summary: String,
    pub updated_products: Vec<Product>,
}

impl RestockSummary {
    fn from_updated(updated_products: Vec<Product>) -> Self {
        let summary = match updated_products.len() {
            0 => "No low-stock products to restock".to_string(),
            1 => "Restocked 1 low-stock product".to_string(),
            n => format!("Restocked {n} low-stock products"),
        };
        Self {
            summary,
            updated_products,
        }
    }
}

/// Create/update operations. Inputs are normalized and validated here; the
/// store enforces cross-row rules.
#[derive(Debug, Clone)]
pub struct MutationService<S> {
    store: S,
}

impl<S: EntityStore> MutationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create_customer(&self, input: CustomerInput) -> CrmResult<Customer> {
        let input = input.normalized();
        input.validate()?;

        let customer = self.store.insert_customer(input)?;
        info!(customer_id = %customer.id, email = %customer.email, "customer created");
        Ok(customer)
    }

    /// Create each input independently.
    ///
    /// Every item is its own atomic insert: a failure is recorded and skipped,
    /// and never undoes items created before it. Duplicates inside the batch
    /// fail like duplicates of stored rows.
    pub fn bulk_create_customers(&self, inputs: Vec<CustomerInput>) -> BulkCreateOutcome {
        let mut outcome = BulkCreateOutcome::default();

        for (index, input) in inputs.into_iter().enumerate() {
            let email = input.email.trim().to_string();
            match self.create_customer(input) {
                Ok(customer) => outcome.customers.push(customer),
                Err(e) => {
                    warn!(index, email = %email, error = %e, "bulk create item rejected");
                    outcome.errors.push(format!("Error creating customer {email}: {e}"));
                }
            }
        }

        info!(
            created = outcome.customers.len(),
            rejected = outcome.errors.len(),
            "bulk customer create finished"
        );
        outcome
    }

    pub fn create_product(&self, input: ProductInput) -> CrmResult<Product> {
        input.validate()?;

        let product = self.store.insert_product(input)?;
        info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Create an order with its total computed from current prices.
    pub fn create_order(&self, order: NewOrder) -> CrmResult<Order> {
        let order = self.store.insert_order(order)?;
        info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            products = order.product_ids.len(),
            total = %order.total_amount,
            "order created"
        );
        Ok(order)
    }

    /// Idempotent while prices are unchanged.
    pub fn recompute_order_total(&self, id: OrderId) -> CrmResult<Order> {
        let order = self.store.recompute_order_total(id)?;
        info!(order_id = %order.id, total = %order.total_amount, "order total recomputed");
        Ok(order)
    }

    /// Add [`RESTOCK_AMOUNT`] units to every low-stock product.
    pub fn update_low_stock_products(&self) -> CrmResult<RestockSummary> {
        let updated = self
            .store
            .restock_products(&ProductFilter::low_stock().predicate(), RESTOCK_AMOUNT)?;

        for p in &updated {
            info!(product_id = %p.id, name = %p.name, stock = p.stock, "product restocked");
        }
        Ok(RestockSummary::from_updated(updated))
    }

    /// Change a product's price. Existing order totals are left as they are.
    pub fn update_product_price(&self, id: ProductId, price: Decimal) -> CrmResult<Product> {
        let product = self.store.update_product_price(id, price)?;
        info!(product_id = %product.id, price = %product.price, "product price updated");
        Ok(product)
    }

    pub fn update_order_status(&self, id: OrderId, status: OrderStatus) -> CrmResult<Order> {
        let order = self.store.set_order_status(id, status)?;
        info!(order_id = %order.id, status = %order.status, "order status updated");
        Ok(order)
    }

    /// Delete a customer and every order it owns.
    pub fn delete_customer(&self, id: CustomerId) -> CrmResult<DeletedCustomer> {
        let deleted = self.store.delete_customer(id)?;
        warn!(
            customer_id = %deleted.customer.id,
            email = %deleted.customer.email,
            removed_orders = deleted.removed_orders.len(),
            "customer deleted with cascading orders"
        );
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use std::sync::Arc;

    use crm_core::CrmError;

    use crate::filters::Predicate;
    use crate::store::InMemoryEntityStore;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn service() -> (Arc<InMemoryEntityStore>, MutationService<Arc<InMemoryEntityStore>>) {
        let store = Arc::new(InMemoryEntityStore::new());
        (store.clone(), MutationService::new(store))
    }

    #[test]
    fn create_customer_validates_and_normalizes() {
        let (_, svc) = service();
        let c = svc
            .create_customer(CustomerInput::new("  Alice ", "alice@example.com").with_phone(""))
            .unwrap();
        assert_eq!(c.name, "Alice");
        assert_eq!(c.phone, None);

        let err = svc
            .create_customer(CustomerInput::new("Bob", "bob@example.com").with_phone("12ab"))
            .unwrap_err();
        assert_eq!(err, CrmError::InvalidPhone("12ab".to_string()));
    }

    #[test]
    fn duplicate_email_fails_regardless_of_other_fields() {
        let (_, svc) = service();
        svc.create_customer(CustomerInput::new("Alice", "alice@example.com"))
            .unwrap();
        let err = svc
            .create_customer(
                CustomerInput::new("Someone Else", "alice@example.com").with_phone("+1234567890"),
            )
            .unwrap_err();
        assert!(matches!(err, CrmError::DuplicateEmail(_)));
    }

    #[test]
    fn bulk_create_reports_each_rejection_in_order() {
        let (store, svc) = service();
        svc.create_customer(CustomerInput::new("Existing", "taken@example.com"))
            .unwrap();

        let outcome = svc.bulk_create_customers(vec![
            CustomerInput::new("A", "a@example.com"),
            CustomerInput::new("B", "taken@example.com"),
            CustomerInput::new("C", "c@example.com").with_phone("not-a-phone"),
            CustomerInput::new("D", "a@example.com"),
            CustomerInput::new("E", "e@example.com"),
        ]);

        let names: Vec<_> = outcome.customers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "E"]);
        assert_eq!(outcome.errors.len(), 3);
        assert!(outcome.errors[0].contains("taken@example.com"));
        assert!(outcome.errors[1].contains("c@example.com"));
        assert!(outcome.errors[2].contains("a@example.com"));
        assert_eq!(store.summary().unwrap().customers, 3);
    }

    #[test]
    fn create_product_rejects_bad_price_and_stock() {
        let (_, svc) = service();
        assert_eq!(
            svc.create_product(ProductInput::new("Free", Decimal::ZERO)).unwrap_err(),
            CrmError::InvalidPrice(Decimal::ZERO)
        );
        assert_eq!(
            svc.create_product(ProductInput::new("Neg", dec("1.00")).with_stock(-1))
                .unwrap_err(),
            CrmError::InvalidStock(-1)
        );
        let p = svc.create_product(ProductInput::new("Pen", dec("0.01"))).unwrap();
        assert_eq!(p.stock, 0);

        for bad in ["0.015", "100000000.00", "50000000000000000000000000000"] {
            assert_eq!(
                svc.create_product(ProductInput::new("Odd", dec(bad))).unwrap_err(),
                CrmError::InvalidPrice(dec(bad))
            );
            assert_eq!(
                svc.update_product_price(p.id, dec(bad)).unwrap_err(),
                CrmError::InvalidPrice(dec(bad))
            );
        }
    }

    #[test]
    fn restock_twice_only_touches_product_once() {
        let (store, svc) = service();
        let p = svc
            .create_product(ProductInput::new("Tablet", dec("800.00")).with_stock(5))
            .unwrap();

        let first = svc.update_low_stock_products().unwrap();
        assert_eq!(first.updated_products.len(), 1);
        assert_eq!(first.updated_products[0].stock, 15);
        assert_eq!(first.summary, "Restocked 1 low-stock product");

        let second = svc.update_low_stock_products().unwrap();
        assert!(second.updated_products.is_empty());
        assert_eq!(store.get_product(p.id).unwrap().unwrap().stock, 15);
    }

    #[test]
    fn cascade_delete_removes_orders() {
        let (store, svc) = service();
        let c = svc
            .create_customer(CustomerInput::new("Alice", "alice@example.com"))
            .unwrap();
        let p = svc.create_product(ProductInput::new("Pen", dec("1.50"))).unwrap();
        svc.create_order(NewOrder::new(c.id, vec![p.id])).unwrap();

        let deleted = svc.delete_customer(c.id).unwrap();
        assert_eq!(deleted.removed_orders.len(), 1);
        assert!(store.orders(&Predicate::all()).unwrap().is_empty());
    }

    #[test]
    fn status_and_price_updates_report_missing_rows() {
        let (_, svc) = service();
        let order_id = OrderId::new();
        let product_id = ProductId::new();
        assert_eq!(
            svc.update_order_status(order_id, OrderStatus::Completed)
                .unwrap_err(),
            CrmError::OrderNotFound(order_id)
        );
        assert_eq!(
            svc.update_product_price(product_id, dec("2.00")).unwrap_err(),
            CrmError::ProductNotFound(product_id)
        );
    }
}
