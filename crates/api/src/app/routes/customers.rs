use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
    Json, Router,
};

use crm_core::CustomerId;
use crm_customers::CustomerInput;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_customer).get(list_customers))
        .route("/bulk", post(bulk_create_customers))
        .route("/:id", delete(delete_customer))
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CustomerInput>,
) -> axum::response::Response {
    match services.mutations.create_customer(body) {
        Ok(customer) => (StatusCode::CREATED, Json(customer)).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}

/// Per-item outcome; the batch itself always answers 200.
pub async fn bulk_create_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::BulkCreateCustomersRequest>,
) -> axum::response::Response {
    let outcome = services.mutations.bulk_create_customers(body.customers);
    (StatusCode::OK, Json(outcome)).into_response()
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::CustomerListQuery>,
) -> axum::response::Response {
    let (filter, pagination) = query.into_parts();
    match services.queries.all_customers(&filter, pagination) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}

pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CustomerId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.mutations.delete_customer(id) {
        Ok(deleted) => (StatusCode::OK, Json(deleted)).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}
