use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/summary", get(summary))
        .route("/total-customers", get(total_customers))
        .route("/total-orders", get(total_orders))
        .route("/total-revenue", get(total_revenue))
}

pub async fn summary(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.reporting.summary() {
        Ok(s) => (StatusCode::OK, Json(s)).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}

pub async fn total_customers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.reporting.total_customers() {
        Ok(n) => (StatusCode::OK, Json(json!({ "total_customers": n }))).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}

pub async fn total_orders(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.reporting.total_orders() {
        Ok(n) => (StatusCode::OK, Json(json!({ "total_orders": n }))).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}

/// Revenue is serialized as a decimal string, `"0"` when there are no orders.
pub async fn total_revenue(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.reporting.total_revenue() {
        Ok(r) => (StatusCode::OK, Json(json!({ "total_revenue": r }))).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}
