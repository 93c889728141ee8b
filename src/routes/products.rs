use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use http::StatusCode;

use crate::{
    AppState,
    error::{AppError, ErrorBody, Result},
    models::{Page, PageRequest, Product, ProductDto, ProductFilter},
};


fn json_body(payload: std::result::Result<Json<ProductDto>, JsonRejection>) -> Result<ProductDto> {
    payload
        .map(|Json(dto)| dto)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

#[utoipa::path(
    post,
    path = "/product",
    request_body = ProductDto,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, description = "Invalid product or name already registered", body = ErrorBody)
    ),
    tag = "product"
)]
pub async fn create_product(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductDto>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductDto>)> {
    let mut product = Product::try_from(json_body(payload)?)?;
    // ids are assigned by storage on create
    product.id = None;

    let saved = state.products.save(product).await?;

    Ok((StatusCode::CREATED, Json(saved.into())))
}

#[utoipa::path(
    get,
    path = "/product/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product details", body = ProductDto),
        (status = 404, description = "Product not found")
    ),
    tag = "product"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductDto>> {
    let product = state
        .products
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(product.into()))
}

#[utoipa::path(
    get,
    path = "/product/findByName/{name}",
    params(("name" = String, Path, description = "Exact product name")),
    responses(
        (status = 200, description = "Product details", body = ProductDto),
        (status = 404, description = "Product not found")
    ),
    tag = "product"
)]
pub async fn find_product_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ProductDto>> {
    let product = state
        .products
        .get_by_name(&name)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(product.into()))
}

#[utoipa::path(
    delete,
    path = "/product/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found")
    ),
    tag = "product"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let product = state
        .products
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    state.products.delete(&product).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Renames a stored product. Only `name` is taken from the body; the other
/// fields keep their stored values.
#[utoipa::path(
    put,
    path = "/product/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductDto,
    responses(
        (status = 200, description = "Product renamed", body = ProductDto),
        (status = 400, description = "Missing name or name already registered", body = ErrorBody),
        (status = 404, description = "Product not found")
    ),
    tag = "product"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: std::result::Result<Json<ProductDto>, JsonRejection>,
) -> Result<Json<ProductDto>> {
    let dto = json_body(payload)?;

    let mut product = state
        .products
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    product.name = match dto.name {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(AppError::Validation(vec![
                "name must not be empty".to_string(),
            ]));
        }
    };

    let updated = state.products.update(product).await?;

    Ok(Json(updated.into()))
}

#[utoipa::path(
    get,
    path = "/product",
    params(
        ("name" = Option<String>, Query, description = "Case-insensitive substring of the name"),
        ("description" = Option<String>, Query, description = "Case-insensitive substring of the description"),
        ("brand" = Option<String>, Query, description = "Case-insensitive substring of the brand"),
        ("price" = Option<f64>, Query, description = "Exact price"),
        ("page" = Option<u32>, Query, description = "Zero-based page index"),
        ("size" = Option<u32>, Query, description = "Page size"),
        ("sort" = Option<String>, Query, description = "property[,asc|desc]")
    ),
    responses(
        (status = 200, description = "Matching products", body = Page<ProductDto>),
        (status = 400, description = "Unparseable filter or paging value", body = ErrorBody)
    ),
    tag = "product"
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Page<ProductDto>>> {
    let filter = ProductFilter::from_query(&params)?;
    let page = PageRequest::from_query(&params, &state.paging)?;

    let products = state.products.find(&filter, &page).await?;

    Ok(Json(products.map(ProductDto::from)))
}
