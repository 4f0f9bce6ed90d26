use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, DbErr, Set};
use serde::{Deserialize, Serialize};

use super::repository;
use crate::domain::a005_role::repository as role;
use crate::domain::a006_company::repository as company;
use crate::domain::a007_branch::repository as branch;
use crate::shared::import::validator::{FieldRule, Rule};
use crate::shared::import::{ImportContext, ImportEntity, KeyPolicy, RowFault};
use crate::shared::sheet::reconcile::SheetEntity;
use crate::system::auth::password;

pub const ROLES: &[&str] = &["admin", "courier"];

/// Строка вкладки `users`: id, name, company, branch, role, email, password.
///
/// Компания, филиал и роль задаются названиями; пароль в открытом виде.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub company: String,
    pub branch: String,
    pub role: String,
    pub email: String,
    pub password: String,
}

fn optional(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

#[async_trait]
impl ImportEntity for UserRow {
    type Entity = repository::Entity;
    type ActiveModel = repository::ActiveModel;

    const LABEL: &'static str = "user";
    const KEY_POLICY: KeyPolicy = KeyPolicy::Generated;
    const RULES: &'static [FieldRule] = &[
        FieldRule::new("name", Rule::Required),
        FieldRule::new("role", Rule::Required),
        FieldRule::new("role", Rule::OneOf(ROLES)),
        FieldRule::new("email", Rule::Required),
        FieldRule::new("email", Rule::Email),
        FieldRule::new("password", Rule::Required),
    ];

    fn key_slot(&mut self) -> Option<&mut String> {
        Some(&mut self.id)
    }

    async fn into_active_model(
        self,
        txn: &DatabaseTransaction,
        _ctx: &ImportContext,
    ) -> Result<repository::ActiveModel, RowFault> {
        let role_name = self.role.trim().to_lowercase();
        let role = role::find_by_name(txn, &role_name)
            .await?
            .ok_or_else(|| RowFault::Unresolved {
                field: "role",
                value: role_name.clone(),
            })?;

        let company_id = match optional(&self.company) {
            Some(name) => Some(
                company::find_by_name(txn, name)
                    .await?
                    .ok_or_else(|| RowFault::Unresolved {
                        field: "company",
                        value: name.to_string(),
                    })?
                    .id,
            ),
            None => None,
        };

        let branch_id = match optional(&self.branch) {
            Some(name) => Some(
                branch::find_by_name(txn, company_id.as_deref(), name)
                    .await?
                    .ok_or_else(|| RowFault::Unresolved {
                        field: "branch",
                        value: name.to_string(),
                    })?
                    .id,
            ),
            None => None,
        };

        // stored hash stays while it still matches the sheet password
        let existing = repository::get_by_id(txn, &self.id).await?;
        let password_hash = match existing {
            Some(user) if password::verify_password(&self.password, &user.password) => {
                user.password
            }
            _ => password::hash_password(&self.password)
                .map_err(|e| RowFault::Other(e.to_string()))?,
        };

        Ok(repository::ActiveModel {
            id: Set(self.id),
            role_id: Set(role.id),
            company_id: Set(company_id),
            branch_id: Set(branch_id),
            name: Set(self.name.trim().to_string()),
            email: Set(self.email.trim().to_lowercase()),
            password: Set(password_hash),
        })
    }
}

/// Пользователи не дописываются обратно во вкладку: в БД хранится только
/// хеш, а колонка `password` вкладки содержит открытый пароль.
#[async_trait]
impl SheetEntity for UserRow {
    const TAB: &'static str = "users";
    const HEADER: &'static [&'static str] =
        &["id", "name", "company", "branch", "role", "email", "password"];

    async fn rows_missing_from(
        _txn: &DatabaseTransaction,
        _ids: &[String],
    ) -> Result<Vec<Vec<String>>, DbErr> {
        Ok(Vec::new())
    }
}
