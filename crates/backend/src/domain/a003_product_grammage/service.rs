use contracts::domain::a003_product_grammage::ProductGrammage;
use contracts::shared::import::ImportResult;
use contracts::shared::pagination::{Page, PageMeta, PageQuery};
use sea_orm::DatabaseConnection;

use super::import::ProductGrammageRow;
use super::repository;
use crate::shared::import::{pipeline, ImportContext, ImportError};

pub async fn import_csv(
    db: &DatabaseConnection,
    data: &[u8],
    ctx: &ImportContext,
) -> Result<ImportResult, ImportError> {
    pipeline::import_csv::<ProductGrammageRow, _>(db, data, ctx).await
}

pub async fn list(
    db: &DatabaseConnection,
    query: &PageQuery,
) -> anyhow::Result<Page<ProductGrammage>> {
    let (page, paginate) = (query.page(), query.paginate());
    let (items, total) = repository::list_page(db, paginate, query.offset()).await?;
    Ok(Page {
        items,
        meta: PageMeta::new(page, paginate, total),
    })
}
