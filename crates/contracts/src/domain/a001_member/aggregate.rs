use serde::{Deserialize, Serialize};

/// Участник программы лояльности
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub join_date: String,
    pub date_of_birth: Option<String>,
    pub city: String,
    pub no_of_child: i64,
    pub eldest_kid_dob: Option<String>,
    pub youngest_kid_dob: Option<String>,
}
