use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::shared::app_state::AppState;
use crate::system::middleware::request_logger::request_logger;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // A001 Members
        .route("/members", get(handlers::a001_member::list))
        .route("/members/data", get(handlers::a001_member::list))
        .route("/members/import", post(handlers::a001_member::import))
        // A002-A004 Products, grammages, transactions
        .route("/products/import", post(handlers::a002_product::import_products))
        .route(
            "/products/import-grammage",
            post(handlers::a002_product::import_grammages),
        )
        .route(
            "/products/import-transactions",
            post(handlers::a002_product::import_transactions),
        )
        .route(
            "/products/transactions",
            get(handlers::a002_product::list_transactions)
                .post(handlers::a002_product::create_transaction),
        )
        .route("/products/data", get(handlers::a002_product::list_products))
        .route(
            "/products/grammages",
            get(handlers::a002_product::list_grammages),
        )
        // A009 Application logs
        .route(
            "/logs",
            get(handlers::a009_app_log::list).post(handlers::a009_app_log::create),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
        .with_state(state)
}
