use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crm_core::{CrmError, CrmResult, CustomerId, Decimal, OrderId, ProductId};
use crm_customers::{Customer, CustomerInput};
use crm_products::{Product, ProductInput};
use crm_sales::{NewOrder, Order, OrderStatus, compute_total};

use super::r#trait::{DeletedCustomer, EntityStore, StoreSummary};
use crate::filters::{CustomerCriterion, OrderCriterion, OrderRow, Predicate, ProductCriterion};

#[derive(Debug, Clone)]
struct Row<T> {
    seq: u64,
    value: T,
}

#[derive(Debug, Default)]
struct Tables {
    next_seq: u64,
    customers: HashMap<CustomerId, Row<Customer>>,
    products: HashMap<ProductId, Row<Product>>,
    orders: HashMap<OrderId, Row<Order>>,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn price_of(&self, id: &ProductId) -> Option<Decimal> {
        self.products.get(id).map(|r| r.value.price)
    }

    fn order_row<'a>(&'a self, order: &'a Order) -> OrderRow<'a> {
        OrderRow {
            order,
            customer: self.customers.get(&order.customer_id).map(|r| &r.value),
            products: order
                .product_ids
                .iter()
                .filter_map(|id| self.products.get(id).map(|r| &r.value))
                .collect(),
        }
    }
}

/// Rows of `table` accepted by `keep`, cloned, in insertion order.
fn ordered<K, T, F>(table: &HashMap<K, Row<T>>, mut keep: F) -> Vec<T>
where
    K: Eq + Hash,
    T: Clone,
    F: FnMut(&T) -> bool,
{
    let mut rows: Vec<&Row<T>> = table.values().filter(|r| keep(&r.value)).collect();
    rows.sort_by_key(|r| r.seq);
    rows.into_iter().map(|r| r.value.clone()).collect()
}

/// In-memory entity store.
///
/// All tables sit behind one lock, so every trait method observes and
/// produces a consistent state. Intended for dev/tests and single-node use.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    tables: RwLock<Tables>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> CrmResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| CrmError::storage("entity store lock poisoned"))
    }

    fn write(&self) -> CrmResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| CrmError::storage("entity store lock poisoned"))
    }
}

impl EntityStore for InMemoryEntityStore {
    fn insert_customer(&self, input: CustomerInput) -> CrmResult<Customer> {
        let mut t = self.write()?;

        let taken = t
            .customers
            .values()
            .any(|r| r.value.email.eq_ignore_ascii_case(&input.email));
        if taken {
            return Err(CrmError::DuplicateEmail(input.email));
        }

        let customer = input.into_customer(CustomerId::new(), Utc::now());
        let seq = t.next_seq();
        t.customers.insert(
            customer.id,
            Row {
                seq,
                value: customer.clone(),
            },
        );
        Ok(customer)
    }

    fn get_customer(&self, id: CustomerId) -> CrmResult<Option<Customer>> {
        Ok(self.read()?.customers.get(&id).map(|r| r.value.clone()))
    }

    fn customers(&self, predicate: &Predicate<CustomerCriterion>) -> CrmResult<Vec<Customer>> {
        let t = self.read()?;
        Ok(ordered(&t.customers, |c| predicate.matches(c)))
    }

    fn delete_customer(&self, id: CustomerId) -> CrmResult<DeletedCustomer> {
        let mut t = self.write()?;

        let customer = t
            .customers
            .remove(&id)
            .ok_or(CrmError::CustomerNotFound(id))?
            .value;

        let mut removed: Vec<(u64, OrderId)> = t
            .orders
            .values()
            .filter(|r| r.value.customer_id == id)
            .map(|r| (r.seq, r.value.id))
            .collect();
        removed.sort_unstable();

        for (_, order_id) in &removed {
            t.orders.remove(order_id);
        }

        Ok(DeletedCustomer {
            customer,
            removed_orders: removed.into_iter().map(|(_, id)| id).collect(),
        })
    }

    fn insert_product(&self, input: ProductInput) -> CrmResult<Product> {
        let mut t = self.write()?;
        let product = input.into_product(ProductId::new());
        let seq = t.next_seq();
        t.products.insert(
            product.id,
            Row {
                seq,
                value: product.clone(),
            },
        );
        Ok(product)
    }

    fn get_product(&self, id: ProductId) -> CrmResult<Option<Product>> {
        Ok(self.read()?.products.get(&id).map(|r| r.value.clone()))
    }

    fn products(&self, predicate: &Predicate<ProductCriterion>) -> CrmResult<Vec<Product>> {
        let t = self.read()?;
        Ok(ordered(&t.products, |p| predicate.matches(p)))
    }

    fn update_product_price(&self, id: ProductId, price: Decimal) -> CrmResult<Product> {
        let mut t = self.write()?;
        let row = t
            .products
            .get_mut(&id)
            .ok_or(CrmError::ProductNotFound(id))?;
        row.value.set_price(price)?;
        Ok(row.value.clone())
    }

    fn restock_products(
        &self,
        predicate: &Predicate<ProductCriterion>,
        amount: i64,
    ) -> CrmResult<Vec<Product>> {
        let mut t = self.write()?;

        let mut hits: Vec<&mut Row<Product>> = t
            .products
            .values_mut()
            .filter(|r| predicate.matches(&r.value))
            .collect();
        hits.sort_by_key(|r| r.seq);

        Ok(hits
            .into_iter()
            .map(|r| {
                r.value.restock(amount);
                r.value.clone()
            })
            .collect())
    }

    fn insert_order(&self, order: NewOrder) -> CrmResult<Order> {
        let mut t = self.write()?;

        let customer_exists = t.customers.contains_key(&order.customer_id);
        let resolved = order.resolve(OrderId::new(), customer_exists, Utc::now(), |id| {
            t.price_of(id)
        })?;

        let seq = t.next_seq();
        t.orders.insert(
            resolved.id,
            Row {
                seq,
                value: resolved.clone(),
            },
        );
        Ok(resolved)
    }

    fn get_order(&self, id: OrderId) -> CrmResult<Option<Order>> {
        Ok(self.read()?.orders.get(&id).map(|r| r.value.clone()))
    }

    fn orders(&self, predicate: &Predicate<OrderCriterion>) -> CrmResult<Vec<Order>> {
        let t = self.read()?;
        Ok(ordered(&t.orders, |o| predicate.matches(&t.order_row(o))))
    }

    fn recompute_order_total(&self, id: OrderId) -> CrmResult<Order> {
        let mut t = self.write()?;

        let mut order = t
            .orders
            .get(&id)
            .map(|r| r.value.clone())
            .ok_or(CrmError::OrderNotFound(id))?;
        order.recompute_total(|p| t.price_of(p))?;

        if let Some(row) = t.orders.get_mut(&id) {
            row.value.total_amount = order.total_amount;
        }
        Ok(order)
    }

    fn set_order_status(&self, id: OrderId, status: OrderStatus) -> CrmResult<Order> {
        let mut t = self.write()?;
        let row = t.orders.get_mut(&id).ok_or(CrmError::OrderNotFound(id))?;
        row.value.status = status;
        Ok(row.value.clone())
    }

    fn summary(&self) -> CrmResult<StoreSummary> {
        let t = self.read()?;
        Ok(StoreSummary {
            customers: t.customers.len() as u64,
            orders: t.orders.len() as u64,
            revenue: compute_total(t.orders.values().map(|r| r.value.total_amount))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use std::sync::Arc;
    use std::thread;

    use crate::filters::{OrderFilter, ProductFilter};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn seeded() -> (InMemoryEntityStore, Customer, Product, Product) {
        let store = InMemoryEntityStore::new();
        let c = store
            .insert_customer(CustomerInput::new("Alice", "alice@example.com"))
            .unwrap();
        let phone = store
            .insert_product(ProductInput::new("Phone", dec("500.00")).with_stock(10))
            .unwrap();
        let tablet = store
            .insert_product(ProductInput::new("Tablet", dec("800.00")).with_stock(5))
            .unwrap();
        (store, c, phone, tablet)
    }

    #[test]
    fn duplicate_email_is_rejected_case_insensitively() {
        let (store, _, _, _) = seeded();
        let err = store
            .insert_customer(CustomerInput::new("Other", "ALICE@example.com"))
            .unwrap_err();
        assert_eq!(err, CrmError::DuplicateEmail("ALICE@example.com".to_string()));
        assert_eq!(store.summary().unwrap().customers, 1);
    }

    #[test]
    fn lists_come_back_in_creation_order() {
        let (store, _, phone, tablet) = seeded();
        let ids: Vec<_> = store
            .products(&Predicate::all())
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![phone.id, tablet.id]);
    }

    #[test]
    fn failed_order_persists_nothing() {
        let (store, c, _, _) = seeded();
        let missing = ProductId::new();
        let err = store
            .insert_order(NewOrder::new(c.id, vec![missing]))
            .unwrap_err();
        assert_eq!(err, CrmError::ProductNotFound(missing));

        let err = store.insert_order(NewOrder::new(c.id, vec![])).unwrap_err();
        assert_eq!(err, CrmError::EmptyProductList);

        assert_eq!(store.summary().unwrap().orders, 0);
    }

    #[test]
    fn recompute_picks_up_price_changes_only_on_request() {
        let (store, c, phone, tablet) = seeded();
        let order = store
            .insert_order(NewOrder::new(c.id, vec![phone.id, tablet.id]))
            .unwrap();
        assert_eq!(order.total_amount, dec("1300.00"));

        store.update_product_price(tablet.id, dec("750.00")).unwrap();
        let stored = store.get_order(order.id).unwrap().unwrap();
        assert_eq!(stored.total_amount, dec("1300.00"));

        let recomputed = store.recompute_order_total(order.id).unwrap();
        assert_eq!(recomputed.total_amount, dec("1250.00"));
        assert_eq!(store.get_order(order.id).unwrap().unwrap(), recomputed);
    }

    #[test]
    fn restock_touches_only_low_stock_products() {
        let (store, _, phone, tablet) = seeded();
        let low = ProductFilter::low_stock().predicate();

        let updated = store.restock_products(&low, 10).unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].id, tablet.id);
        assert_eq!(updated[0].stock, 15);

        assert!(store.restock_products(&low, 10).unwrap().is_empty());
        assert_eq!(store.get_product(phone.id).unwrap().unwrap().stock, 10);
    }

    #[test]
    fn concurrent_restocks_lose_no_updates() {
        let store = Arc::new(InMemoryEntityStore::new());
        let p = store
            .insert_product(ProductInput::new("Cable", dec("2.00")))
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        store.restock_products(&Predicate::all(), 1).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.get_product(p.id).unwrap().unwrap().stock, 200);
    }

    #[test]
    fn delete_customer_cascades_to_orders() {
        let (store, alice, phone, _) = seeded();
        let bob = store
            .insert_customer(CustomerInput::new("Bob", "bob@example.com"))
            .unwrap();
        let a1 = store.insert_order(NewOrder::new(alice.id, vec![phone.id])).unwrap();
        let a2 = store.insert_order(NewOrder::new(alice.id, vec![phone.id])).unwrap();
        let b1 = store.insert_order(NewOrder::new(bob.id, vec![phone.id])).unwrap();

        let deleted = store.delete_customer(alice.id).unwrap();
        assert_eq!(deleted.customer.id, alice.id);
        assert_eq!(deleted.removed_orders, vec![a1.id, a2.id]);

        let left = store.orders(&Predicate::all()).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, b1.id);
        assert_eq!(
            store.delete_customer(alice.id).unwrap_err(),
            CrmError::CustomerNotFound(alice.id)
        );
    }

    #[test]
    fn order_filters_join_through_customer_and_products() {
        let (store, alice, phone, tablet) = seeded();
        let bob = store
            .insert_customer(CustomerInput::new("Bob", "bob@example.com"))
            .unwrap();
        let both = store
            .insert_order(NewOrder::new(alice.id, vec![phone.id, tablet.id]))
            .unwrap();
        store.insert_order(NewOrder::new(bob.id, vec![phone.id])).unwrap();

        let hits = store
            .orders(
                &OrderFilter {
                    customer_name_contains: Some("ALI".to_string()),
                    product_name_contains: Some("t".to_string()),
                    ..Default::default()
                }
                .predicate(),
            )
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, both.id);
    }

    #[test]
    fn orders_appear_once_when_several_products_match() {
        let (store, c, phone, tablet) = seeded();
        let order = store
            .insert_order(NewOrder::new(c.id, vec![phone.id, tablet.id]))
            .unwrap();

        // Both "Phone" and "Tablet" contain an "e".
        let hits = store
            .orders(
                &OrderFilter {
                    product_name_contains: Some("e".to_string()),
                    ..Default::default()
                }
                .predicate(),
            )
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, order.id);
    }

    #[test]
    fn total_overflow_is_an_error_and_leaves_the_store_usable() {
        // The store itself does not validate prices.
        let (store, c, _, _) = seeded();
        let huge = dec("50000000000000000000000000000");
        let a = store.insert_product(ProductInput::new("A", huge)).unwrap();
        let b = store.insert_product(ProductInput::new("B", huge)).unwrap();

        let err = store.insert_order(NewOrder::new(c.id, vec![a.id, b.id])).unwrap_err();
        assert_eq!(err, CrmError::AmountOverflow);
        assert_eq!(store.summary().unwrap().orders, 0);

        // Each order fits on its own; only the revenue sum overflows.
        let first = store.insert_order(NewOrder::new(c.id, vec![a.id])).unwrap();
        store.insert_order(NewOrder::new(c.id, vec![b.id])).unwrap();
        assert_eq!(store.summary().unwrap_err(), CrmError::AmountOverflow);
        assert_eq!(store.recompute_order_total(first.id).unwrap().total_amount, huge);

        assert!(store
            .insert_customer(CustomerInput::new("Bob", "bob@example.com"))
            .is_ok());
    }

    #[test]
    fn summary_is_zero_when_empty() {
        let store = InMemoryEntityStore::new();
        assert_eq!(store.summary().unwrap(), StoreSummary::default());
    }
}
