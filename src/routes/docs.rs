use axum::Json;
use utoipa::OpenApi;

use crate::{error::ErrorBody, models::ProductDto};

use super::products;

#[derive(OpenApi)]
#[openapi(
    info(title = "Product API", description = "CRUD and search over products"),
    paths(
        products::create_product,
        products::get_product,
        products::find_product_by_name,
        products::delete_product,
        products::update_product,
        products::search_products,
    ),
    components(schemas(ProductDto, ErrorBody)),
    tags((name = "product", description = "Product catalogue"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
