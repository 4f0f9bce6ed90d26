use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_member::Member;
use contracts::shared::import::ImportResult;
use contracts::shared::pagination::{Page, PageQuery};
use contracts::shared::response::SuccessResponse;

use crate::domain::a001_member;
use crate::shared::app_state::AppState;
use crate::shared::import::ImportError;
use crate::shared::upload::read_file_field;

/// POST /members/import
pub async fn import(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SuccessResponse<ImportResult>>, ImportError> {
    let data = read_file_field(&mut multipart).await?;
    let result = a001_member::service::import_csv(&state.db, &data, &state.import_ctx).await?;
    Ok(Json(SuccessResponse::new("Members imported", result)))
}

/// GET /members?page=&paginate=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Member>>, StatusCode> {
    match a001_member::service::list(&state.db, &query).await {
        Ok(page) => Ok(Json(page)),
        Err(e) => {
            tracing::error!("Failed to list members: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
