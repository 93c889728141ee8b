use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, http::HeaderValue};
use http::Method;
use sqlx::PgPool;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    config::{AppConfig, PagingConfig},
    database,
    error::{AppError, Result},
    queries::PgProductRepository,
    routes,
    services::{ProductService, ProductServiceImpl},
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub products: Arc<dyn ProductService>,
    pub paging: PagingConfig,
}

impl AppState {
    /// Wires the Postgres repository into the product service.
    pub fn new(db: PgPool, paging: PagingConfig) -> Self {
        let repository = Arc::new(PgProductRepository::new(db.clone()));
        let products = Arc::new(ProductServiceImpl::new(repository));

        Self {
            db,
            products,
            paging,
        }
    }
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let state = AppState::new(pool, config.paging);

    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_origin(allowed_origins);

    let app = routes::create_router()
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state);

    Ok(app)
}
