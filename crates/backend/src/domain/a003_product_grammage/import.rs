use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, Set};
use serde::{Deserialize, Serialize};

use super::repository;
use crate::shared::import::validator::{FieldRule, Rule};
use crate::shared::import::{ImportContext, ImportEntity, KeyPolicy, RowFault};

/// Строка CSV фасовок; кроме ключа все поля необязательны
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductGrammageRow {
    #[serde(rename = "prodgramID", default)]
    pub id: Option<i64>,
    #[serde(rename = "GrammageName", default)]
    pub name: Option<String>,
    #[serde(rename = "Point", default)]
    pub point: Option<i64>,
    #[serde(rename = "Price", default)]
    pub price: Option<f64>,
}

#[async_trait]
impl ImportEntity for ProductGrammageRow {
    type Entity = repository::Entity;
    type ActiveModel = repository::ActiveModel;

    const LABEL: &'static str = "product grammage";
    const KEY_POLICY: KeyPolicy = KeyPolicy::Supplied;
    const RULES: &'static [FieldRule] = &[
        FieldRule::new("prodgramID", Rule::Present),
        FieldRule::new("prodgramID", Rule::Numeric),
    ];

    async fn into_active_model(
        self,
        _txn: &DatabaseTransaction,
        _ctx: &ImportContext,
    ) -> Result<repository::ActiveModel, RowFault> {
        let id = self.id.ok_or(RowFault::Missing("prodgramID"))?;
        Ok(repository::ActiveModel {
            id: Set(id),
            name: Set(self.name.filter(|n| !n.trim().is_empty())),
            point: Set(self.point),
            price: Set(self.price),
        })
    }
}
