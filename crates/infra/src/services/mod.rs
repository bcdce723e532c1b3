//! Service layer: the query/mutation surface over an [`EntityStore`].
//!
//! Services hold no state besides the store handle, so they are cheap to
//! clone when the store is an `Arc`.

pub mod mutations;
pub mod queries;
pub mod reporting;
pub mod seed;

pub use mutations::{BulkCreateOutcome, MutationService, RestockSummary};
pub use queries::{OrderReminder, QueryService};
pub use reporting::{CrmSummary, ReportingService};
pub use seed::{SeedOutcome, seed_demo_data};

use crate::store::EntityStore;

/// All services over one shared store.
#[derive(Debug, Clone)]
pub struct CrmServices<S> {
    pub mutations: MutationService<S>,
    pub queries: QueryService<S>,
    pub reporting: ReportingService<S>,
}

impl<S> CrmServices<S>
where
    S: EntityStore + Clone,
{
    pub fn new(store: S) -> Self {
        Self {
            mutations: MutationService::new(store.clone()),
            queries: QueryService::new(store.clone()),
            reporting: ReportingService::new(store),
        }
    }
}
