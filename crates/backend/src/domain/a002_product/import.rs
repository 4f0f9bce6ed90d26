use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, Set};
use serde::{Deserialize, Serialize};

use super::repository;
use crate::shared::import::validator::{FieldRule, Rule};
use crate::shared::import::{ImportContext, ImportEntity, KeyPolicy, RowFault};

/// Строка CSV товаров
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRow {
    #[serde(rename = "productID", default)]
    pub id: Option<i64>,
    #[serde(rename = "ProductName")]
    pub name: String,
    #[serde(rename = "ProductCategory")]
    pub category: String,
    #[serde(rename = "ProductLevel")]
    pub level: String,
}

#[async_trait]
impl ImportEntity for ProductRow {
    type Entity = repository::Entity;
    type ActiveModel = repository::ActiveModel;

    const LABEL: &'static str = "product";
    const KEY_POLICY: KeyPolicy = KeyPolicy::Supplied;
    const RULES: &'static [FieldRule] = &[
        FieldRule::new("productID", Rule::Present),
        FieldRule::new("productID", Rule::Numeric),
        FieldRule::new("ProductName", Rule::Required),
        FieldRule::new("ProductCategory", Rule::Required),
        FieldRule::new("ProductLevel", Rule::Required),
    ];

    async fn into_active_model(
        self,
        _txn: &DatabaseTransaction,
        _ctx: &ImportContext,
    ) -> Result<repository::ActiveModel, RowFault> {
        let id = self.id.ok_or(RowFault::Missing("productID"))?;
        Ok(repository::ActiveModel {
            id: Set(id),
            name: Set(self.name),
            category: Set(self.category),
            level: Set(self.level),
        })
    }
}
