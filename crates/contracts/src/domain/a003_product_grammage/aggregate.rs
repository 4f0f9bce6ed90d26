use serde::{Deserialize, Serialize};

/// Фасовка товара: граммовка, баллы и цена
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGrammage {
    pub id: i64,
    pub name: Option<String>,
    pub point: Option<i64>,
    pub price: Option<f64>,
}
