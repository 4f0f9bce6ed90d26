use contracts::domain::a004_product_transaction::{
    CreateProductTransactionDto, ProductTransaction,
};
use contracts::shared::import::ImportResult;
use contracts::shared::pagination::{Page, PageMeta, PageQuery};
use sea_orm::DatabaseConnection;

use super::import::ProductTransactionRow;
use super::repository;
use crate::shared::import::decoder::DecodedRow;
use crate::shared::import::{ids, pipeline, ImportContext, ImportError};

pub async fn import_csv(
    db: &DatabaseConnection,
    data: &[u8],
    ctx: &ImportContext,
) -> Result<ImportResult, ImportError> {
    pipeline::import_csv::<ProductTransactionRow, _>(db, data, ctx).await
}

/// Создание одной транзакции теми же правилами, что и строка CSV
pub async fn create(
    db: &DatabaseConnection,
    dto: CreateProductTransactionDto,
    ctx: &ImportContext,
) -> Result<ProductTransaction, ImportError> {
    let id = ids::new_id();
    let row = DecodedRow {
        line: 1,
        record: ProductTransactionRow::from_dto(id.clone(), dto),
    };
    pipeline::import_rows(db, vec![row], ctx).await?;

    let stored = repository::get_by_id(db, &id)
        .await
        .map_err(|e| ImportError::RowWrite {
            entity: "product transaction",
            row: 1,
            cause: e.to_string(),
        })?
        .ok_or_else(|| ImportError::RowWrite {
            entity: "product transaction",
            row: 1,
            cause: "record not found after commit".to_string(),
        })?;
    Ok(stored.into())
}

pub async fn list(
    db: &DatabaseConnection,
    query: &PageQuery,
) -> anyhow::Result<Page<ProductTransaction>> {
    let (page, paginate) = (query.page(), query.paginate());
    let (items, total) = repository::list_page(db, paginate, query.offset()).await?;
    Ok(Page {
        items,
        meta: PageMeta::new(page, paginate, total),
    })
}
