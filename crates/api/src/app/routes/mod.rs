use axum::Router;

pub mod customers;
pub mod orders;
pub mod products;
pub mod reports;
pub mod system;

/// Router for the CRM resources.
pub fn router() -> Router {
    Router::new()
        .nest("/customers", customers::router())
        .nest("/products", products::router())
        .nest("/orders", orders::router())
        .nest("/reports", reports::router())
}
