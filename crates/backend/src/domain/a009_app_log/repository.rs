use chrono::{DateTime, Utc};
use contracts::domain::a009_app_log::AppLog;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, EntityTrait, NotSet, PaginatorTrait, QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "app_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub app_id: String,
    pub log_level: String,
    pub info: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AppLog {
    fn from(m: Model) -> Self {
        AppLog {
            id: m.id,
            app_id: m.app_id,
            log_level: m.log_level,
            info: m.info,
            message: m.message,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    app_id: String,
    log_level: String,
    info: Option<String>,
    message: String,
) -> anyhow::Result<AppLog> {
    let active = ActiveModel {
        id: NotSet,
        app_id: Set(app_id),
        log_level: Set(log_level),
        info: Set(info),
        message: Set(message),
        created_at: Set(Utc::now()),
    };
    let model = active.insert(db).await?;
    Ok(model.into())
}

/// Новые записи первыми
pub async fn list_page<C: ConnectionTrait>(
    db: &C,
    limit: u64,
    offset: u64,
) -> anyhow::Result<(Vec<AppLog>, u64)> {
    let total = Entity::find().count(db).await?;
    let items = Entity::find()
        .order_by_desc(Column::Id)
        .limit(limit)
        .offset(offset)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok((items, total))
}
