use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::a006_company::repository as company;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "branches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub company_id: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::a006_company::repository::Entity",
        from = "Column::CompanyId",
        to = "crate::domain::a006_company::repository::Column::Id"
    )]
    Company,
}

impl Related<company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Филиал по имени; при заданной компании ищется только среди ее филиалов
pub async fn find_by_name<C: ConnectionTrait>(
    db: &C,
    company_id: Option<&str>,
    name: &str,
) -> Result<Option<Model>, DbErr> {
    let mut query = Entity::find().filter(Column::Name.eq(name));
    if let Some(company_id) = company_id {
        query = query.filter(Column::CompanyId.eq(company_id));
    }
    query.order_by_asc(Column::Id).one(db).await
}

/// Филиалы вне списка `ids` вместе с названием компании
pub async fn list_except<C: ConnectionTrait>(
    db: &C,
    ids: &[String],
) -> Result<Vec<(Model, Option<company::Model>)>, DbErr> {
    Entity::find()
        .filter(Column::Id.is_not_in(ids.iter().cloned()))
        .order_by_asc(Column::Id)
        .find_also_related(company::Entity)
        .all(db)
        .await
}
