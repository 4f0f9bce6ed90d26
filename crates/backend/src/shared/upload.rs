use axum::extract::Multipart;
use axum::http::StatusCode;

use super::import::ImportError;

/// Name of the multipart field carrying the import file
pub const FILE_FIELD: &str = "file";

/// Читает поле `file` из multipart-запроса целиком
pub async fn read_file_field(multipart: &mut Multipart) -> Result<Vec<u8>, ImportError> {
    loop {
        let field = multipart.next_field().await.map_err(|e| ImportError::Upload {
            too_large: e.status() == StatusCode::PAYLOAD_TOO_LARGE,
            message: e.body_text(),
        })?;
        let Some(field) = field else {
            return Err(ImportError::MissingFile);
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("<unnamed>").to_string();
        let bytes = field.bytes().await.map_err(|e| ImportError::Upload {
            too_large: e.status() == StatusCode::PAYLOAD_TOO_LARGE,
            message: e.body_text(),
        })?;
        tracing::info!("Received upload '{}' ({} bytes)", file_name, bytes.len());
        if bytes.is_empty() {
            return Err(ImportError::MissingFile);
        }
        return Ok(bytes.to_vec());
    }
}
