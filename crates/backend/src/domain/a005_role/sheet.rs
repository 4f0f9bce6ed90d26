use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, DbErr, Set};
use serde::{Deserialize, Serialize};

use super::repository;
use crate::shared::import::validator::{FieldRule, Rule};
use crate::shared::import::{ImportContext, ImportEntity, KeyPolicy, RowFault};
use crate::shared::sheet::reconcile::SheetEntity;

/// Строка вкладки `roles`: id, name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRow {
    pub id: String,
    pub name: String,
}

#[async_trait]
impl ImportEntity for RoleRow {
    type Entity = repository::Entity;
    type ActiveModel = repository::ActiveModel;

    const LABEL: &'static str = "role";
    const KEY_POLICY: KeyPolicy = KeyPolicy::Generated;
    const RULES: &'static [FieldRule] = &[FieldRule::new("name", Rule::Required)];

    fn key_slot(&mut self) -> Option<&mut String> {
        Some(&mut self.id)
    }

    async fn into_active_model(
        self,
        _txn: &DatabaseTransaction,
        _ctx: &ImportContext,
    ) -> Result<repository::ActiveModel, RowFault> {
        Ok(repository::ActiveModel {
            id: Set(self.id),
            name: Set(self.name.trim().to_string()),
        })
    }
}

#[async_trait]
impl SheetEntity for RoleRow {
    const TAB: &'static str = "roles";
    const HEADER: &'static [&'static str] = &["id", "name"];

    async fn rows_missing_from(
        txn: &DatabaseTransaction,
        ids: &[String],
    ) -> Result<Vec<Vec<String>>, DbErr> {
        Ok(repository::list_except(txn, ids)
            .await?
            .into_iter()
            .map(|m| vec![m.id, m.name])
            .collect())
    }
}
