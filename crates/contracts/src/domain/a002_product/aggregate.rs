use serde::{Deserialize, Serialize};

/// Товар (ключ задается внешней системой)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub level: String,
}
