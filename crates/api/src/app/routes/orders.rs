use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

use crm_core::OrderId;
use crm_sales::NewOrder;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/pending-reminders", get(pending_reminders))
        .route("/:id/recompute", post(recompute_total))
        .route("/:id/status", patch(update_status))
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewOrder>,
) -> axum::response::Response {
    match services.mutations.create_order(body) {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::OrderListQuery>,
) -> axum::response::Response {
    let (filter, pagination) = query.into_parts();
    match services.queries.all_orders(&filter, pagination) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}

pub async fn pending_reminders(
    Extension(services): Extension<Arc<AppServices>>,
    Query(window): Query<dto::ReminderWindowQuery>,
) -> axum::response::Response {
    if window.start > window.end {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_window",
            "start must not be after end",
        );
    }

    match services.queries.pending_order_reminders(window.start, window.end) {
        Ok(reminders) => (StatusCode::OK, Json(reminders)).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}

pub async fn recompute_total(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.mutations.recompute_order_total(id) {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}

pub async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateStatusRequest>,
) -> axum::response::Response {
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.mutations.update_order_status(id, body.status) {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}
