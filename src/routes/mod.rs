mod docs;
mod health;
mod products;

pub use docs::ApiDoc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api-doc/openapi.json", get(docs::openapi_json))
        .route(
            "/product",
            post(products::create_product).get(products::search_products),
        )
        .route(
            "/product/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/product/findByName/{name}",
            get(products::find_product_by_name),
        )
}
