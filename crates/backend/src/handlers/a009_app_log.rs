use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::domain::a009_app_log::{AppLog, CreateAppLogDto};
use contracts::shared::pagination::{Page, PageQuery};
use contracts::shared::response::{ErrorResponse, SuccessResponse};

use crate::domain::a009_app_log;
use crate::shared::app_state::AppState;

/// POST /logs
pub async fn create(State(state): State<AppState>, Json(dto): Json<CreateAppLogDto>) -> Response {
    if let Err(violation) = a009_app_log::service::validate(&state.db, &dto).await {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(violation.to_string())),
        )
            .into_response();
    }

    match a009_app_log::service::create(&state.db, dto).await {
        Ok(log) => Json(SuccessResponse::new("Log created", log)).into_response(),
        Err(e) => {
            tracing::error!("Failed to create app log: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET /logs
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<AppLog>>, StatusCode> {
    match a009_app_log::service::list(&state.db, &query).await {
        Ok(page) => Ok(Json(page)),
        Err(e) => {
            tracing::error!("Failed to list app logs: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
