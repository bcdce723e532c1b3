use std::sync::Arc;

use crm_infra::services::CrmServices;
use crm_infra::store::InMemoryEntityStore;

/// Store handle shared by the HTTP handlers and the in-process job backend.
pub type SharedStore = Arc<InMemoryEntityStore>;

/// Services used by the HTTP handlers.
pub type AppServices = CrmServices<SharedStore>;

/// Wire the services over a fresh in-memory store.
pub fn build_services() -> AppServices {
    CrmServices::new(Arc::new(InMemoryEntityStore::new()))
}
