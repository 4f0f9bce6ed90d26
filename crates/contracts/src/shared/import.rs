use serde::{Deserialize, Serialize};

/// Результат импорта файла (CSV)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    /// Сущность, в которую шел импорт ("member", "product", ...)
    pub entity: String,
    /// Сколько строк записано (insert или update)
    pub imported_count: usize,
    /// Сколько строк получили новый идентификатор
    pub generated_ids: usize,
}
