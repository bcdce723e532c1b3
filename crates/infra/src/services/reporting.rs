use serde::{Deserialize, Serialize};
use tracing::debug;

use crm_core::{CrmResult, Decimal};

use crate::store::EntityStore;

/// Summary figures taken from one store snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrmSummary {
    pub total_customers: u64,
    pub total_orders: u64,
    pub total_revenue: Decimal,
}

/// Read-only aggregates.
#[derive(Debug, Clone)]
pub struct ReportingService<S> {
    store: S,
}

impl<S: EntityStore> ReportingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn total_customers(&self) -> CrmResult<u64> {
        Ok(self.store.summary()?.customers)
    }

    pub fn total_orders(&self) -> CrmResult<u64> {
        Ok(self.store.summary()?.orders)
    }

    /// Sum of all order totals; zero without orders.
    pub fn total_revenue(&self) -> CrmResult<Decimal> {
        Ok(self.store.summary()?.revenue)
    }

    pub fn summary(&self) -> CrmResult<CrmSummary> {
        let s = self.store.summary()?;
        debug!(customers = s.customers, orders = s.orders, revenue = %s.revenue, "summary computed");
        Ok(CrmSummary {
            total_customers: s.customers,
            total_orders: s.orders,
            total_revenue: s.revenue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use std::sync::Arc;

    use crm_customers::CustomerInput;
    use crm_products::ProductInput;
    use crm_sales::NewOrder;

    use crate::services::CrmServices;
    use crate::store::InMemoryEntityStore;

    #[test]
    fn revenue_is_zero_then_exact_order_total() {
        let svc = CrmServices::new(Arc::new(InMemoryEntityStore::new()));
        assert_eq!(svc.reporting.total_revenue().unwrap(), Decimal::ZERO);

        let c = svc
            .mutations
            .create_customer(CustomerInput::new("Alice", "alice@example.com"))
            .unwrap();
        let a = svc
            .mutations
            .create_product(ProductInput::new("Book", Decimal::from_str("30.00").unwrap()))
            .unwrap();
        let b = svc
            .mutations
            .create_product(ProductInput::new("Pen", Decimal::from_str("12.50").unwrap()))
            .unwrap();
        svc.mutations
            .create_order(NewOrder::new(c.id, vec![a.id, b.id]))
            .unwrap();

        assert_eq!(
            svc.reporting.total_revenue().unwrap(),
            Decimal::from_str("42.50").unwrap()
        );
        assert_eq!(
            svc.reporting.summary().unwrap(),
            CrmSummary {
                total_customers: 1,
                total_orders: 1,
                total_revenue: Decimal::from_str("42.50").unwrap(),
            }
        );
    }
}
