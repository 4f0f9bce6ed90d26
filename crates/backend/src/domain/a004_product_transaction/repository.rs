use contracts::domain::a004_product_transaction::ProductTransaction;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub member_id: String,
    pub product_id: i64,
    pub product_grammage_id: i64,
    pub source: String,
    pub qty: i64,
    pub price_per_unit: Option<f64>,
    /// Как пришло из источника: `YYYY-MM-DD HH:MM:SS ZONE`
    pub created_at: String,
    pub is_training_data: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductTransaction {
    fn from(m: Model) -> Self {
        ProductTransaction {
            id: m.id,
            member_id: m.member_id,
            product_id: m.product_id,
            product_grammage_id: m.product_grammage_id,
            source: m.source,
            qty: m.qty,
            price_per_unit: m.price_per_unit,
            created_at: m.created_at,
            is_training_data: m.is_training_data,
        }
    }
}

/// Идентификаторы сортируемые, поэтому порядок по id примерно хронологический
pub async fn list_page<C: ConnectionTrait>(
    db: &C,
    limit: u64,
    offset: u64,
) -> anyhow::Result<(Vec<ProductTransaction>, u64)> {
    let total = Entity::find().count(db).await?;
    let items = Entity::find()
        .order_by_asc(Column::Id)
        .limit(limit)
        .offset(offset)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok((items, total))
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: &str) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id.to_string()).one(db).await
}
