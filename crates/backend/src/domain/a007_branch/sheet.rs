use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, DbErr, Set};
use serde::{Deserialize, Serialize};

use super::repository;
use crate::domain::a006_company::repository as company;
use crate::shared::import::validator::{FieldRule, Rule};
use crate::shared::import::{ImportContext, ImportEntity, KeyPolicy, RowFault};
use crate::shared::sheet::reconcile::SheetEntity;

/// Строка вкладки `branches`: id, company (название), name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchRow {
    pub id: String,
    pub company: String,
    pub name: String,
}

#[async_trait]
impl ImportEntity for BranchRow {
    type Entity = repository::Entity;
    type ActiveModel = repository::ActiveModel;

    const LABEL: &'static str = "branch";
    const KEY_POLICY: KeyPolicy = KeyPolicy::Generated;
    const RULES: &'static [FieldRule] = &[
        FieldRule::new("company", Rule::Required),
        FieldRule::new("name", Rule::Required),
    ];

    fn key_slot(&mut self) -> Option<&mut String> {
        Some(&mut self.id)
    }

    async fn into_active_model(
        self,
        txn: &DatabaseTransaction,
        _ctx: &ImportContext,
    ) -> Result<repository::ActiveModel, RowFault> {
        let company_name = self.company.trim();
        let company = company::find_by_name(txn, company_name)
            .await?
            .ok_or_else(|| RowFault::Unresolved {
                field: "company",
                value: company_name.to_string(),
            })?;

        Ok(repository::ActiveModel {
            id: Set(self.id),
            company_id: Set(company.id),
            name: Set(self.name.trim().to_string()),
        })
    }
}

#[async_trait]
impl SheetEntity for BranchRow {
    const TAB: &'static str = "branches";
    const HEADER: &'static [&'static str] = &["id", "company", "name"];

    async fn rows_missing_from(
        txn: &DatabaseTransaction,
        ids: &[String],
    ) -> Result<Vec<Vec<String>>, DbErr> {
        Ok(repository::list_except(txn, ids)
            .await?
            .into_iter()
            .map(|(branch, company)| {
                let company_name = company.map(|c| c.name).unwrap_or_default();
                vec![branch.id, company_name, branch.name]
            })
            .collect())
    }
}
