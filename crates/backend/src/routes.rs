use crate::models::{CartList, CartsQuery, Health, ProductList, ProductsQuery};
use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use std::future::Future;
use tokio::net::TcpListener;
use tracing::debug;

/// Build the backend router (`/health`, `/products`, `/carts`).
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/products", get(search_products))
        .route("/carts", get(get_carts))
}

/// Serve the backend on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the underlying server fails while accepting connections.
pub async fn serve(
    listener: TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await
}

async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn search_products(Query(q): Query<ProductsQuery>) -> Json<ProductList> {
    debug!(
        channel_id = q.channel_id,
        catalog_id = q.catalog_id,
        "search products"
    );
    Json(ProductList::catalog())
}

async fn get_carts(Query(q): Query<CartsQuery>) -> Json<CartList> {
    debug!(user_id = q.user_id, "get carts");
    Json(CartList::for_user(q.user_id))
}
