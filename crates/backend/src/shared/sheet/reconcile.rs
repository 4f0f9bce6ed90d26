//! Additive sheet reconciliation: store records whose identifiers are absent
//! from a tab get appended to the end of that tab. Rows are never removed or
//! reordered.

use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, DbErr};

use super::Tab;
use crate::shared::import::entity::ImportEntity;
use crate::shared::import::error::ImportError;

/// Сущность, которая сидится из вкладки рабочей книги.
///
/// Колонка A вкладки всегда содержит идентификатор.
#[async_trait]
pub trait SheetEntity: ImportEntity {
    const TAB: &'static str;
    const HEADER: &'static [&'static str];

    /// Store records not in `ids`, laid out as tab rows
    async fn rows_missing_from(
        txn: &DatabaseTransaction,
        ids: &[String],
    ) -> Result<Vec<Vec<String>>, DbErr>;
}

pub async fn reconcile_tab<E: SheetEntity>(
    txn: &DatabaseTransaction,
    tab: &mut Tab,
    sheet_ids: &[String],
) -> Result<usize, ImportError> {
    let missing = E::rows_missing_from(txn, sheet_ids).await.map_err(|e| {
        tracing::error!("Failed to read '{}' records for sync: {}", E::TAB, e);
        ImportError::Reconcile {
            tab: tab.name.clone(),
            message: e.to_string(),
        }
    })?;

    let appended = missing.len();
    for row in missing {
        tab.append_row(row);
    }
    if appended > 0 {
        tracing::info!("Tab '{}': appended {} records from the store", tab.name, appended);
    }
    Ok(appended)
}
