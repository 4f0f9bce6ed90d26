//! Row validator: declarative per-field rules checked in input order; the
//! first failing row stops the batch.

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::sea_query::{Alias, Expr, Query};
use sea_orm::{ConnectionTrait, DbErr};
use serde::Serialize;
use serde_json::Value;

use super::decoder::DecodedRow;
use super::error::ImportError;

pub const DATE: &str = "%Y-%m-%d";
pub const DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty text, non-zero number
    Required,
    /// Value supplied at all; zero counts as a value
    Present,
    Numeric,
    /// Calendar date in the given chrono pattern
    Date(&'static str),
    /// Date-time in the given pattern followed by a zone abbreviation ("UTC", "WIB")
    ZonedDateTime(&'static str),
    /// Case-insensitive membership
    OneOf(&'static [&'static str]),
    Email,
    /// Value must be present in `table.column`
    Exists {
        table: &'static str,
        column: &'static str,
    },
}

impl Rule {
    pub fn describe(&self) -> String {
        match self {
            Rule::Required => "required".to_string(),
            Rule::Present => "present".to_string(),
            Rule::Numeric => "numeric".to_string(),
            Rule::Date(fmt) => format!("date({})", fmt),
            Rule::ZonedDateTime(fmt) => format!("datetime({} ZONE)", fmt),
            Rule::OneOf(options) => format!("oneof({})", options.join("|")),
            Rule::Email => "email".to_string(),
            Rule::Exists { table, column } => format!("exists({}.{})", table, column),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
}

impl FieldRule {
    pub const fn new(field: &'static str, rule: Rule) -> Self {
        Self { field, rule }
    }
}

/// Нарушение правила в одной записи (без привязки к строке файла)
#[derive(Debug)]
pub enum Violation {
    Rule { field: String, rule: String },
    Lookup { field: String, source: DbErr },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::Rule { field, rule } => {
                write!(f, "field '{}' failed rule '{}'", field, rule)
            }
            Violation::Lookup { field, source } => {
                write!(f, "failed to check field '{}': {}", field, source)
            }
        }
    }
}

/// Validates rows in order, stopping at the first failure.
pub async fn validate_rows<C, T>(
    conn: &C,
    rows: &[DecodedRow<T>],
    rules: &[FieldRule],
    entity: &'static str,
) -> Result<(), ImportError>
where
    C: ConnectionTrait,
    T: Serialize + std::fmt::Debug,
{
    for row in rows {
        if let Err(violation) = check_record(conn, &row.record, rules).await {
            tracing::warn!(
                entity,
                row = row.line,
                payload = ?row.record,
                "Validation failed: {}",
                violation
            );
            return Err(match violation {
                Violation::Rule { field, rule } => ImportError::Validation {
                    entity,
                    row: row.line,
                    field,
                    rule,
                },
                Violation::Lookup { field, source } => ImportError::Lookup {
                    row: row.line,
                    field,
                    source,
                },
            });
        }
    }
    Ok(())
}

/// Checks one record against the rules; fields are addressed by their
/// serialized names.
pub async fn check_record<C, T>(conn: &C, record: &T, rules: &[FieldRule]) -> Result<(), Violation>
where
    C: ConnectionTrait,
    T: Serialize,
{
    let fields = match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => {
            return Err(Violation::Rule {
                field: "*".to_string(),
                rule: "record".to_string(),
            })
        }
    };

    for field_rule in rules {
        let value = fields.get(field_rule.field).unwrap_or(&Value::Null);
        let ok = match field_rule.rule {
            Rule::Exists { table, column } => {
                exists(conn, table, column, value)
                    .await
                    .map_err(|source| Violation::Lookup {
                        field: field_rule.field.to_string(),
                        source,
                    })?
            }
            rule => check_value(rule, value),
        };
        if !ok {
            return Err(Violation::Rule {
                field: field_rule.field.to_string(),
                rule: field_rule.rule.describe(),
            });
        }
    }
    Ok(())
}

/// Text form of a present value; `None` for null and blank strings
fn present_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

/// Format rules only apply to present values; presence is `Required`'s job.
fn check_value(rule: Rule, value: &Value) -> bool {
    match rule {
        Rule::Required => match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            _ => true,
        },
        Rule::Present => present_text(value).is_some(),
        Rule::Numeric => match present_text(value) {
            None => true,
            Some(text) => text.parse::<f64>().is_ok(),
        },
        Rule::Date(fmt) => match present_text(value) {
            None => true,
            Some(text) => NaiveDate::parse_from_str(&text, fmt).is_ok(),
        },
        Rule::ZonedDateTime(fmt) => match present_text(value) {
            None => true,
            Some(text) => is_zoned_date_time(&text, fmt),
        },
        Rule::OneOf(options) => match present_text(value) {
            None => true,
            Some(text) => options.iter().any(|o| o.eq_ignore_ascii_case(&text)),
        },
        Rule::Email => match present_text(value) {
            None => true,
            Some(text) => is_email(&text),
        },
        Rule::Exists { .. } => true,
    }
}

fn is_zoned_date_time(text: &str, fmt: &str) -> bool {
    let Some((date_time, zone)) = text.rsplit_once(' ') else {
        return false;
    };
    let zone_ok = (1..=5).contains(&zone.len()) && zone.chars().all(|c| c.is_ascii_alphabetic());
    zone_ok && NaiveDateTime::parse_from_str(date_time, fmt).is_ok()
}

fn is_email(text: &str) -> bool {
    match text.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !text.contains(char::is_whitespace)
        }
        None => false,
    }
}

async fn exists<C>(conn: &C, table: &str, column: &str, value: &Value) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let lookup: sea_orm::Value = match value {
        Value::Null => return Ok(true),
        Value::String(s) if s.trim().is_empty() => return Ok(true),
        Value::String(s) => s.trim().to_string().into(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.into(),
            None => n.as_f64().unwrap_or_default().into(),
        },
        other => other.to_string().into(),
    };

    let stmt = Query::select()
        .expr(Expr::val(1))
        .from(Alias::new(table))
        .and_where(Expr::col(Alias::new(column)).eq(lookup))
        .limit(1)
        .to_owned();
    let backend = conn.get_database_backend();
    let found = conn.query_one(backend.build(&stmt)).await?;
    Ok(found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;
    use sea_orm::{DatabaseBackend, Statement};
    use serde_json::json;

    #[test]
    fn test_required() {
        assert!(!check_value(Rule::Required, &Value::Null));
        assert!(!check_value(Rule::Required, &json!("  ")));
        assert!(!check_value(Rule::Required, &json!(0)));
        assert!(check_value(Rule::Required, &json!("x")));
        assert!(check_value(Rule::Required, &json!(3)));
    }

    #[test]
    fn test_present_accepts_zero() {
        assert!(check_value(Rule::Present, &json!(0)));
        assert!(check_value(Rule::Present, &json!(0.0)));
        assert!(check_value(Rule::Present, &json!("x")));
        assert!(!check_value(Rule::Present, &Value::Null));
        assert!(!check_value(Rule::Present, &json!(" ")));
    }

    #[test]
    fn test_format_rules_skip_absent_values() {
        assert!(check_value(Rule::Date(DATE), &Value::Null));
        assert!(check_value(Rule::Date(DATE), &json!("")));
        assert!(check_value(Rule::Numeric, &Value::Null));
        assert!(check_value(Rule::Email, &Value::Null));
    }

    #[test]
    fn test_numeric() {
        assert!(check_value(Rule::Numeric, &json!("12.5")));
        assert!(check_value(Rule::Numeric, &json!(7)));
        assert!(!check_value(Rule::Numeric, &json!("12a")));
    }

    #[test]
    fn test_date() {
        assert!(check_value(Rule::Date(DATE), &json!("2024-02-29")));
        assert!(!check_value(Rule::Date(DATE), &json!("2023-02-29")));
        assert!(!check_value(Rule::Date(DATE), &json!("29/02/2024")));
    }

    #[test]
    fn test_zoned_date_time() {
        let rule = Rule::ZonedDateTime(DATE_TIME);
        assert!(check_value(rule, &json!("2024-05-01 13:45:00 UTC")));
        assert!(check_value(rule, &json!("2024-05-01 13:45:00 WIB")));
        assert!(!check_value(rule, &json!("2024-05-01 13:45:00")));
        assert!(!check_value(rule, &json!("2024-05-01 25:45:00 UTC")));
        assert!(!check_value(rule, &json!("2024-05-01 13:45:00 +07")));
    }

    #[test]
    fn test_one_of_and_email() {
        let roles = Rule::OneOf(&["admin", "courier"]);
        assert!(check_value(roles, &json!("ADMIN")));
        assert!(!check_value(roles, &json!("owner")));
        assert!(check_value(Rule::Email, &json!("a@b.co")));
        assert!(!check_value(Rule::Email, &json!("a@b")));
        assert!(!check_value(Rule::Email, &json!("ab.co")));
        assert!(!check_value(Rule::Email, &json!("a b@c.co")));
    }

    #[derive(Debug, Serialize)]
    struct Sample {
        #[serde(rename = "MemberID")]
        member_id: String,
        #[serde(rename = "City")]
        city: String,
    }

    const SAMPLE_RULES: &[FieldRule] = &[
        FieldRule::new("City", Rule::Required),
        FieldRule::new(
            "MemberID",
            Rule::Exists {
                table: "members",
                column: "id",
            },
        ),
    ];

    #[tokio::test]
    async fn test_exists_queries_the_store() {
        let db = connect_in_memory().await.unwrap();
        db.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "INSERT INTO members (id, join_date, city, password) VALUES ('M1', '2024-01-01', 'Jakarta', 'x');"
                .to_string(),
        ))
        .await
        .unwrap();

        let known = Sample {
            member_id: "M1".into(),
            city: "Bandung".into(),
        };
        assert!(check_record(&db, &known, SAMPLE_RULES).await.is_ok());

        let unknown = Sample {
            member_id: "M2".into(),
            city: "Bandung".into(),
        };
        match check_record(&db, &unknown, SAMPLE_RULES).await {
            Err(Violation::Rule { field, rule }) => {
                assert_eq!(field, "MemberID");
                assert_eq!(rule, "exists(members.id)");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_first_failing_row_is_reported_with_source_line() {
        let db = connect_in_memory().await.unwrap();
        let rows: Vec<DecodedRow<Sample>> = ["Jakarta", "Bandung", "Medan", "", ""]
            .iter()
            .enumerate()
            .map(|(idx, city)| DecodedRow {
                line: idx + 2,
                record: Sample {
                    member_id: String::new(),
                    city: city.to_string(),
                },
            })
            .collect();

        let err = validate_rows(&db, &rows, &SAMPLE_RULES[..1], "member")
            .await
            .unwrap_err();
        match err {
            // decoded index 3 -> source row 5
            ImportError::Validation { row, field, .. } => {
                assert_eq!(row, 5);
                assert_eq!(field, "City");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
