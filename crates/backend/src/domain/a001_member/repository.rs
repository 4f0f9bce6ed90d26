use chrono::NaiveDate;
use contracts::domain::a001_member::Member;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub join_date: NaiveDate,
    pub date_of_birth: Option<NaiveDate>,
    pub city: String,
    pub no_of_child: i64,
    pub eldest_kid_dob: Option<NaiveDate>,
    pub youngest_kid_dob: Option<NaiveDate>,
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

impl From<Model> for Member {
    fn from(m: Model) -> Self {
        Member {
            id: m.id,
            join_date: format_date(m.join_date),
            date_of_birth: m.date_of_birth.map(format_date),
            city: m.city,
            no_of_child: m.no_of_child,
            eldest_kid_dob: m.eldest_kid_dob.map(format_date),
            youngest_kid_dob: m.youngest_kid_dob.map(format_date),
        }
    }
}

/// Страница участников, отсортированная по id, и общее количество
pub async fn list_page<C: ConnectionTrait>(
    db: &C,
    limit: u64,
    offset: u64,
) -> anyhow::Result<(Vec<Member>, u64)> {
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
