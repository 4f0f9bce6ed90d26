use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a002_product::Product;
use contracts::domain::a003_product_grammage::ProductGrammage;
use contracts::domain::a004_product_transaction::{
    CreateProductTransactionDto, ProductTransaction,
};
use contracts::shared::import::ImportResult;
use contracts::shared::pagination::{Page, PageQuery};
use contracts::shared::response::SuccessResponse;

use crate::domain::{a002_product, a003_product_grammage, a004_product_transaction};
use crate::shared::app_state::AppState;
use crate::shared::import::ImportError;
use crate::shared::upload::read_file_field;

/// POST /products/import
pub async fn import_products(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SuccessResponse<ImportResult>>, ImportError> {
    let data = read_file_field(&mut multipart).await?;
    let result = a002_product::service::import_csv(&state.db, &data, &state.import_ctx).await?;
    Ok(Json(SuccessResponse::new("Products imported", result)))
}

/// POST /products/import-grammage
pub async fn import_grammages(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SuccessResponse<ImportResult>>, ImportError> {
    let data = read_file_field(&mut multipart).await?;
    let result =
        a003_product_grammage::service::import_csv(&state.db, &data, &state.import_ctx).await?;
    Ok(Json(SuccessResponse::new("Product grammages imported", result)))
}

/// POST /products/import-transactions
pub async fn import_transactions(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SuccessResponse<ImportResult>>, ImportError> {
    let data = read_file_field(&mut multipart).await?;
    let result =
        a004_product_transaction::service::import_csv(&state.db, &data, &state.import_ctx)
            .await?;
    Ok(Json(SuccessResponse::new(
        "Product transactions imported",
        result,
    )))
}

/// POST /products/transactions
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(dto): Json<CreateProductTransactionDto>,
) -> Result<Json<SuccessResponse<ProductTransaction>>, ImportError> {
    let created =
        a004_product_transaction::service::create(&state.db, dto, &state.import_ctx).await?;
    Ok(Json(SuccessResponse::new("Product transaction created", created)))
}

/// GET /products/data
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Product>>, StatusCode> {
    match a002_product::service::list(&state.db, &query).await {
        Ok(page) => Ok(Json(page)),
        Err(e) => {
            tracing::error!("Failed to list products: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /products/grammages
pub async fn list_grammages(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ProductGrammage>>, StatusCode> {
    match a003_product_grammage::service::list(&state.db, &query).await {
        Ok(page) => Ok(Json(page)),
        Err(e) => {
            tracing::error!("Failed to list product grammages: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /products/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ProductTransaction>>, StatusCode> {
    match a004_product_transaction::service::list(&state.db, &query).await {
        Ok(page) => Ok(Json(page)),
        Err(e) => {
            tracing::error!("Failed to list product transactions: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
