use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::response::ErrorResponse;
use sea_orm::DbErr;
use thiserror::Error;

/// Ошибки конвейера импорта.
///
/// Значение создается один раз в месте отказа и дальше только передается
/// наверх; строка исходного файла (1-based) входит в сообщение.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Missing file")]
    MissingFile,

    #[error("Failed to read upload: {message}")]
    Upload { message: String, too_large: bool },

    #[error("Failed to open workbook: {message}")]
    Workbook { message: String },

    #[error("Sheet tab '{tab}' not found")]
    SheetTab { tab: String },

    #[error("Failed to decode input at line {line}: {message}")]
    Decode { line: u64, message: String },

    #[error("Invalid identifier '{value}' at row {row}")]
    MalformedIdentifier { row: usize, value: String },

    #[error("Invalid {entity} data at row {row}: field '{field}' failed rule '{rule}'")]
    Validation {
        entity: &'static str,
        row: usize,
        field: String,
        rule: String,
    },

    #[error("Failed to check field '{field}' at row {row}: {source}")]
    Lookup {
        row: usize,
        field: String,
        #[source]
        source: DbErr,
    },

    #[error("Failed to start transaction: {0}")]
    TransactionStart(#[source] DbErr),

    #[error("Failed to write {entity} at row {row}: {cause}")]
    RowWrite {
        entity: &'static str,
        row: usize,
        cause: String,
    },

    #[error("Failed to commit transaction: {0}")]
    Commit(#[source] DbErr),

    #[error("Failed to sync sheet tab '{tab}': {message}")]
    Reconcile { tab: String, message: String },
}

impl ImportError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ImportError::Upload {
                too_large: true, ..
            } => StatusCode::PAYLOAD_TOO_LARGE,
            ImportError::MissingFile
            | ImportError::Upload { .. }
            | ImportError::SheetTab { .. }
            | ImportError::Decode { .. }
            | ImportError::MalformedIdentifier { .. }
            | ImportError::Validation { .. } => StatusCode::BAD_REQUEST,
            ImportError::Workbook { .. }
            | ImportError::Lookup { .. }
            | ImportError::TransactionStart(_)
            | ImportError::RowWrite { .. }
            | ImportError::Commit(_)
            | ImportError::Reconcile { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Номер строки исходного файла, если ошибка к ней привязана
    pub fn row(&self) -> Option<usize> {
        match self {
            ImportError::MalformedIdentifier { row, .. }
            | ImportError::Validation { row, .. }
            | ImportError::Lookup { row, .. }
            | ImportError::RowWrite { row, .. } => Some(*row),
            ImportError::Decode { line, .. } => Some(*line as usize),
            _ => None,
        }
    }
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
