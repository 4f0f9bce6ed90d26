use contracts::domain::a003_product_grammage::ProductGrammage;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product_grammages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub name: Option<String>,
    pub point: Option<i64>,
    pub price: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductGrammage {
    fn from(m: Model) -> Self {
        ProductGrammage {
            id: m.id,
            name: m.name,
            point: m.point,
            price: m.price,
        }
    }
}

pub async fn list_page<C: ConnectionTrait>(
    db: &C,
    limit: u64,
    offset: u64,
) -> anyhow::Result<(Vec<ProductGrammage>, u64)> {
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
