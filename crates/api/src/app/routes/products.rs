use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{patch, post},
    Json, Router,
};

use crm_core::ProductId;
use crm_products::ProductInput;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/restock-low-stock", post(restock_low_stock))
        .route("/:id/price", patch(update_price))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<ProductInput>,
) -> axum::response::Response {
    match services.mutations.create_product(body) {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ProductListQuery>,
) -> axum::response::Response {
    let (filter, pagination) = query.into_parts();
    match services.queries.all_products(&filter, pagination) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}

pub async fn update_price(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdatePriceRequest>,
) -> axum::response::Response {
    let id: ProductId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.mutations.update_product_price(id, body.price) {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}

pub async fn restock_low_stock(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.mutations.update_low_stock_products() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::crm_error_to_response(e),
    }
}
