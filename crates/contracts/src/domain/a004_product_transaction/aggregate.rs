use serde::{Deserialize, Serialize};

/// Транзакция покупки товара участником
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTransaction {
    pub id: String,
    pub member_id: String,
    pub product_id: i64,
    pub product_grammage_id: i64,
    pub source: String,
    pub qty: i64,
    pub price_per_unit: Option<f64>,
    pub created_at: String,
    pub is_training_data: bool,
}

/// DTO для создания одной транзакции через API
///
/// `created_at` ожидается в формате `YYYY-MM-DD HH:MM:SS ZONE`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductTransactionDto {
    pub member_id: String,
    pub product_id: i64,
    pub product_grammage_id: i64,
    pub source: String,
    pub qty: i64,
    pub price_per_unit: Option<f64>,
    pub created_at: String,
}
