use serde::{Deserialize, Serialize};

/// Итог синхронизации одной вкладки таблицы с БД
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabReport {
    pub tab: String,
    /// Строк таблицы, записанных в БД
    pub written: usize,
    /// Пустых ячеек id, заполненных новым идентификатором
    pub backfilled_ids: usize,
    /// Записей БД, дописанных в конец вкладки
    pub appended: usize,
}

/// Итог запуска сидера
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    pub tabs: Vec<TabReport>,
}
