use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{DatabaseTransaction, Set};
use serde::{Deserialize, Serialize};

use super::repository;
use crate::shared::import::validator::{FieldRule, Rule, DATE};
use crate::shared::import::{ImportContext, ImportEntity, KeyPolicy, RowFault};

/// Строка CSV участников
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRow {
    #[serde(rename = "MemberID")]
    pub member_id: String,
    #[serde(rename = "JoinDate")]
    pub join_date: String,
    #[serde(rename = "DateOfBirth", default)]
    pub date_of_birth: Option<String>,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "NoOfChild", default)]
    pub no_of_child: Option<i64>,
    #[serde(rename = "EldestKidDOB", default)]
    pub eldest_kid_dob: Option<String>,
    #[serde(rename = "YoungestKidDOB", default)]
    pub youngest_kid_dob: Option<String>,
}

const RULES: &[FieldRule] = &[
    FieldRule::new("MemberID", Rule::Required),
    FieldRule::new("JoinDate", Rule::Required),
    FieldRule::new("JoinDate", Rule::Date(DATE)),
    FieldRule::new("DateOfBirth", Rule::Date(DATE)),
    FieldRule::new("City", Rule::Required),
    FieldRule::new("EldestKidDOB", Rule::Date(DATE)),
    FieldRule::new("YoungestKidDOB", Rule::Date(DATE)),
];

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, RowFault> {
    NaiveDate::parse_from_str(value.trim(), DATE)
        .map_err(|e| RowFault::Other(format!("{}: {}", field, e)))
}

fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, RowFault> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date(field, v).map(Some),
    }
}

#[async_trait]
impl ImportEntity for MemberRow {
    type Entity = repository::Entity;
    type ActiveModel = repository::ActiveModel;

    const LABEL: &'static str = "member";
    const KEY_POLICY: KeyPolicy = KeyPolicy::Supplied;
    const RULES: &'static [FieldRule] = RULES;
    // the file carries no password; a re-import keeps whatever is stored
    const PRESERVE_ON_CONFLICT: &'static [&'static str] = &["password"];

    fn key_slot(&mut self) -> Option<&mut String> {
        Some(&mut self.member_id)
    }

    async fn into_active_model(
        self,
        _txn: &DatabaseTransaction,
        ctx: &ImportContext,
    ) -> Result<repository::ActiveModel, RowFault> {
        Ok(repository::ActiveModel {
            id: Set(self.member_id.trim().to_string()),
            join_date: Set(parse_date("JoinDate", &self.join_date)?),
            date_of_birth: Set(parse_optional_date("DateOfBirth", self.date_of_birth.as_deref())?),
            city: Set(self.city),
            no_of_child: Set(self.no_of_child.unwrap_or(0)),
            eldest_kid_dob: Set(parse_optional_date("EldestKidDOB", self.eldest_kid_dob.as_deref())?),
            youngest_kid_dob: Set(parse_optional_date(
                "YoungestKidDOB",
                self.youngest_kid_dob.as_deref(),
            )?),
            password: Set(ctx.member_password_hash.clone()),
        })
    }
}
