//! Demo data for local runs.

use serde::Serialize;
use tracing::info;

use crm_core::{CrmError, CrmResult, Decimal};
use crm_customers::CustomerInput;
use crm_products::ProductInput;

use super::CrmServices;
use crate::filters::ProductFilter;
use crate::query::Pagination;
use crate::store::EntityStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedOutcome {
    pub customers_created: usize,
    pub products_created: usize,
}

fn demo_customers() -> Vec<CustomerInput> {
    vec![
        CustomerInput::new("John Doe", "john@example.com").with_phone("+1 234 567 8900"),
        CustomerInput::new("Jane Smith", "jane@example.com").with_phone("123-456-7890"),
    ]
}

fn demo_products() -> Vec<ProductInput> {
    vec![
        ProductInput::new("Phone", Decimal::new(50000, 2)).with_stock(10),
        ProductInput::new("Tablet", Decimal::new(80000, 2)).with_stock(5),
    ]
}

/// Insert the demo customers and products. Rows that already exist (same
/// email, same product name) are skipped, so reseeding is harmless.
pub fn seed_demo_data<S: EntityStore>(services: &CrmServices<S>) -> CrmResult<SeedOutcome> {
    let mut outcome = SeedOutcome::default();

    for input in demo_customers() {
        match services.mutations.create_customer(input) {
            Ok(_) => outcome.customers_created += 1,
            Err(CrmError::DuplicateEmail(_)) => {}
            Err(e) => return Err(e),
        }
    }

    for input in demo_products() {
        let existing = services.queries.all_products(
            &ProductFilter {
                name_contains: Some(input.name.clone()),
                ..Default::default()
            },
            Pagination::max(),
        )?;
        if existing.items.iter().any(|p| p.name == input.name) {
            continue;
        }
        services.mutations.create_product(input)?;
        outcome.products_created += 1;
    }

    info!(
        customers = outcome.customers_created,
        products = outcome.products_created,
        "demo data seeded"
    );
    Ok(outcome)
}
