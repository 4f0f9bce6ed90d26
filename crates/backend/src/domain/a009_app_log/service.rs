use contracts::domain::a009_app_log::{AppLog, CreateAppLogDto};
use contracts::shared::pagination::{Page, PageMeta, PageQuery};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::import::validator::{check_record, FieldRule, Rule, Violation};

const RULES: &[FieldRule] = &[
    FieldRule::new("app_id", Rule::Required),
    FieldRule::new("log_level", Rule::Required),
    FieldRule::new("message", Rule::Required),
];

pub async fn validate(db: &DatabaseConnection, dto: &CreateAppLogDto) -> Result<(), Violation> {
    check_record(db, dto, RULES).await
}

pub async fn create(db: &DatabaseConnection, dto: CreateAppLogDto) -> anyhow::Result<AppLog> {
    let info = dto.info.filter(|i| !i.trim().is_empty());
    repository::insert(db, dto.app_id, dto.log_level, info, dto.message).await
}

pub async fn list(db: &DatabaseConnection, query: &PageQuery) -> anyhow::Result<Page<AppLog>> {
    let (page, paginate) = (query.page(), query.paginate());
    let (items, total) = repository::list_page(db, paginate, query.offset()).await?;
    Ok(Page {
        items,
        meta: PageMeta::new(page, paginate, total),
    })
}
