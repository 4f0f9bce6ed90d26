use async_trait::async_trait;
use contracts::domain::a004_product_transaction::CreateProductTransactionDto;
use sea_orm::{DatabaseTransaction, Set};
use serde::{Deserialize, Serialize};

use super::repository;
use crate::shared::import::validator::{FieldRule, Rule, DATE_TIME};
use crate::shared::import::{ImportContext, ImportEntity, KeyPolicy, RowFault};

/// Строка CSV транзакций. Пустой `TransactionID` получает новый ULID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTransactionRow {
    #[serde(rename = "TransactionID", default)]
    pub id: String,
    #[serde(rename = "MemberID")]
    pub member_id: String,
    #[serde(rename = "FK_PRODUCT_ID", default)]
    pub product_id: Option<i64>,
    #[serde(rename = "FK_PROD_GRAM_ID", default)]
    pub product_grammage_id: Option<i64>,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Qty", default)]
    pub qty: Option<i64>,
    #[serde(rename = "PricePerUnit", default)]
    pub price_per_unit: Option<f64>,
    #[serde(rename = "TransactionDatetime")]
    pub created_at: String,
    /// Создана через API, а не загружена файлом
    #[serde(skip)]
    pub manual: bool,
}

impl ProductTransactionRow {
    pub fn from_dto(id: String, dto: CreateProductTransactionDto) -> Self {
        Self {
            id,
            member_id: dto.member_id,
            product_id: Some(dto.product_id),
            product_grammage_id: Some(dto.product_grammage_id),
            source: dto.source,
            qty: Some(dto.qty),
            price_per_unit: dto.price_per_unit,
            created_at: dto.created_at,
            manual: true,
        }
    }
}

#[async_trait]
impl ImportEntity for ProductTransactionRow {
    type Entity = repository::Entity;
    type ActiveModel = repository::ActiveModel;

    const LABEL: &'static str = "product transaction";
    const KEY_POLICY: KeyPolicy = KeyPolicy::Generated;
    const RULES: &'static [FieldRule] = &[
        FieldRule::new("MemberID", Rule::Required),
        FieldRule::new(
            "MemberID",
            Rule::Exists {
                table: "members",
                column: "id",
            },
        ),
        FieldRule::new("FK_PRODUCT_ID", Rule::Required),
        FieldRule::new(
            "FK_PRODUCT_ID",
            Rule::Exists {
                table: "products",
                column: "id",
            },
        ),
        FieldRule::new("FK_PROD_GRAM_ID", Rule::Required),
        FieldRule::new(
            "FK_PROD_GRAM_ID",
            Rule::Exists {
                table: "product_grammages",
                column: "id",
            },
        ),
        FieldRule::new("Source", Rule::Required),
        FieldRule::new("Qty", Rule::Required),
        FieldRule::new("PricePerUnit", Rule::Present),
        FieldRule::new("TransactionDatetime", Rule::Required),
        FieldRule::new("TransactionDatetime", Rule::ZonedDateTime(DATE_TIME)),
    ];
    // origin flag is fixed by the first write
    const PRESERVE_ON_CONFLICT: &'static [&'static str] = &["is_training_data"];

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
            member_id: Set(self.member_id.trim().to_string()),
            product_id: Set(self.product_id.ok_or(RowFault::Missing("FK_PRODUCT_ID"))?),
            product_grammage_id: Set(self
                .product_grammage_id
                .ok_or(RowFault::Missing("FK_PROD_GRAM_ID"))?),
            source: Set(self.source),
            qty: Set(self.qty.ok_or(RowFault::Missing("Qty"))?),
            price_per_unit: Set(self.price_per_unit),
            created_at: Set(self.created_at.trim().to_string()),
            is_training_data: Set(!self.manual),
        })
    }
}
