use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, DbErr, EntityTrait};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::validator::FieldRule;
use crate::system::auth::password;

/// Откуда берется ключ строки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Ключ приходит из файла (числовые ключи, коды участников)
    Supplied,
    /// Пустой ключ заменяется новым ULID, заполненный проверяется на формат
    Generated,
}

/// Зависимости, нужные при превращении строки в запись БД
#[derive(Debug, Clone)]
pub struct ImportContext {
    pub member_password_hash: String,
}

impl ImportContext {
    pub fn new(default_member_password: &str) -> anyhow::Result<Self> {
        Ok(Self::with_hash(password::hash_password(
            default_member_password,
        )?))
    }

    pub fn with_hash(member_password_hash: impl Into<String>) -> Self {
        Self {
            member_password_hash: member_password_hash.into(),
        }
    }
}

/// Причина отказа записи строки
#[derive(Debug, Error)]
pub enum RowFault {
    #[error("{0}")]
    Db(#[from] DbErr),

    #[error("{field} '{value}' not found")]
    Unresolved { field: &'static str, value: String },

    #[error("field '{0}' is empty")]
    Missing(&'static str),

    #[error("{0}")]
    Other(String),
}

/// Декларация импортируемой сущности: раскладка колонок задается serde-атрибутами
/// структуры строки, правила проверки и ключ - константами.
#[async_trait]
pub trait ImportEntity: DeserializeOwned + Serialize + std::fmt::Debug + Send + Sync + 'static {
    type Entity: EntityTrait;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + Send;

    /// Имя для сообщений ("member", "product", ...)
    const LABEL: &'static str;
    const KEY_POLICY: KeyPolicy;
    const RULES: &'static [FieldRule];
    /// Колонки, которые upsert не перезаписывает при конфликте ключа
    const PRESERVE_ON_CONFLICT: &'static [&'static str] = &[];

    /// Строковый ключ строки, если он есть
    fn key_slot(&mut self) -> Option<&mut String> {
        None
    }

    async fn into_active_model(
        self,
        txn: &DatabaseTransaction,
        ctx: &ImportContext,
    ) -> Result<Self::ActiveModel, RowFault>;
}
