use serde::{Deserialize, Serialize};

/// Запись лога, присланная клиентским приложением
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppLog {
    pub id: i64,
    pub app_id: String,
    pub log_level: String,
    pub info: Option<String>,
    pub message: String,
    pub created_at: String,
}

/// DTO для создания новой записи лога
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppLogDto {
    pub app_id: String,
    pub log_level: String,
    pub info: Option<String>,
    pub message: String,
}
