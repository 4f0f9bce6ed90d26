use contracts::shared::import::ImportResult;
use sea_orm::DatabaseConnection;
use std::io::Read;

use super::batch::{BatchStage, ImportBatch};
use super::decoder::{decode_csv, DecodedRow};
use super::entity::{ImportContext, ImportEntity};
use super::error::ImportError;
use super::ids::assign_missing;
use super::validator::validate_rows;
use super::writer::UpsertWriter;

/// Импорт CSV-файла целиком: либо записаны все строки, либо ни одной
pub async fn import_csv<E, R>(
    db: &DatabaseConnection,
    reader: R,
    ctx: &ImportContext,
) -> Result<ImportResult, ImportError>
where
    E: ImportEntity,
    R: Read,
{
    let mut batch = ImportBatch::start(E::LABEL);
    let rows = decode_csv::<E, _>(reader).map_err(|e| batch.fail(e))?;
    tracing::info!("Decoded {} {} rows", rows.len(), E::LABEL);
    run(db, rows, ctx, batch).await
}

/// Same pipeline for rows that did not come from a file (single-record API)
pub async fn import_rows<E: ImportEntity>(
    db: &DatabaseConnection,
    rows: Vec<DecodedRow<E>>,
    ctx: &ImportContext,
) -> Result<ImportResult, ImportError> {
    let batch = ImportBatch::start(E::LABEL);
    run(db, rows, ctx, batch).await
}

async fn run<E: ImportEntity>(
    db: &DatabaseConnection,
    mut rows: Vec<DecodedRow<E>>,
    ctx: &ImportContext,
    mut batch: ImportBatch,
) -> Result<ImportResult, ImportError> {
    batch.advance(BatchStage::Validating);
    let generated = assign_missing(&mut rows).map_err(|e| batch.fail(e))?;
    validate_rows(db, &rows, E::RULES, E::LABEL)
        .await
        .map_err(|e| batch.fail(e))?;

    batch.advance(BatchStage::Writing);
    let writer = UpsertWriter::begin(db).await.map_err(|e| batch.fail(e))?;
    let written = match writer.write(rows, ctx).await {
        Ok(n) => n,
        Err(e) => {
            writer.rollback().await;
            return Err(batch.fail(e));
        }
    };
    writer.commit().await.map_err(|e| batch.fail(e))?;
    batch.commit(written);

    Ok(ImportResult {
        entity: E::LABEL.to_string(),
        imported_count: written,
        generated_ids: generated.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_member::import::MemberRow;
    use crate::domain::a001_member::repository as member;
    use crate::domain::a002_product::import::ProductRow;
    use crate::domain::a002_product::repository as product;
    use crate::domain::a003_product_grammage::import::ProductGrammageRow;
    use crate::domain::a004_product_transaction::import::ProductTransactionRow;
    use crate::domain::a004_product_transaction::{repository as transaction, service};
    use crate::shared::data::db::connect_in_memory;
    use crate::shared::import::ids::is_well_formed;
    use contracts::domain::a004_product_transaction::CreateProductTransactionDto;
    use sea_orm::{
        ConnectionTrait, DatabaseBackend, EntityTrait, PaginatorTrait, QueryOrder, Statement,
    };

    const MEMBERS_CSV: &str = "\
MemberID,JoinDate,DateOfBirth,City,NoOfChild,EldestKidDOB,YoungestKidDOB
M001,2023-01-15,1990-04-02,Jakarta,2,2015-06-01,2019-09-09
M002,2023-02-20,,Bandung,0,,
";

    const PRODUCTS_CSV: &str = "\
productID,ProductName,ProductCategory,ProductLevel
1,Milk Powder,Nutrition,Premium
2,Baby Cereal,Nutrition,Regular
";

    const GRAMMAGES_CSV: &str = "\
prodgramID,GrammageName,Point,Price
10,400g,5,52000
11,800g,,
";

    const SUPPLIED_TX_ID: &str = "01HZX3J6Q8W2M4N5P6R7S8T9VC";

    fn ctx() -> ImportContext {
        ImportContext::with_hash("$argon2id$placeholder")
    }

    async fn seeded_db() -> DatabaseConnection {
        let db = connect_in_memory().await.unwrap();
        import_csv::<MemberRow, _>(&db, MEMBERS_CSV.as_bytes(), &ctx())
            .await
            .unwrap();
        import_csv::<ProductRow, _>(&db, PRODUCTS_CSV.as_bytes(), &ctx())
            .await
            .unwrap();
        import_csv::<ProductGrammageRow, _>(&db, GRAMMAGES_CSV.as_bytes(), &ctx())
            .await
            .unwrap();
        db
    }

    fn transactions_csv() -> String {
        format!(
            "TransactionID,MemberID,FK_PRODUCT_ID,FK_PROD_GRAM_ID,Source,Qty,PricePerUnit,TransactionDatetime\n\
             {},M001,1,10,store,2,52000,2024-05-01 10:00:00 UTC\n\
             ,M002,2,11,app,1,98000.5,2024-05-02 18:30:00 WIB\n",
            SUPPLIED_TX_ID
        )
    }

    #[tokio::test]
    async fn test_required_field_failure_persists_nothing() {
        let db = connect_in_memory().await.unwrap();
        let csv = "\
productID,ProductName,ProductCategory,ProductLevel
1,Milk Powder,Nutrition,Premium
2,Baby Cereal,Nutrition,Regular
3,,Nutrition,Regular
";
        let err = import_csv::<ProductRow, _>(&db, csv.as_bytes(), &ctx())
            .await
            .unwrap_err();
        match err {
            ImportError::Validation {
                entity, row, field, ..
            } => {
                assert_eq!(entity, "product");
                assert_eq!(row, 4);
                assert_eq!(field, "ProductName");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(product::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_row_number_counts_header() {
        let db = connect_in_memory().await.unwrap();
        let csv = "\
MemberID,JoinDate,DateOfBirth,City,NoOfChild,EldestKidDOB,YoungestKidDOB
M1,2023-01-01,,Jakarta,0,,
M2,2023-01-01,,Jakarta,0,,
M3,2023-01-01,,Jakarta,0,,
M4,2023-01-01,,,0,,
";
        let err = import_csv::<MemberRow, _>(&db, csv.as_bytes(), &ctx())
            .await
            .unwrap_err();
        assert_eq!(err.row(), Some(5));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_rejection_rolls_back_written_rows() {
        let db = connect_in_memory().await.unwrap();
        db.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "CREATE TRIGGER reject_boom BEFORE INSERT ON products WHEN NEW.name = 'Boom' \
             BEGIN SELECT RAISE(ABORT, 'rejected by store'); END;"
                .to_string(),
        ))
        .await
        .unwrap();

        let csv = "\
productID,ProductName,ProductCategory,ProductLevel
1,Milk Powder,Nutrition,Premium
2,Boom,Nutrition,Regular
3,Baby Cereal,Nutrition,Regular
";
        let err = import_csv::<ProductRow, _>(&db, csv.as_bytes(), &ctx())
            .await
            .unwrap_err();
        match err {
            ImportError::RowWrite { row, cause, .. } => {
                assert_eq!(row, 3);
                assert!(cause.contains("rejected by store"), "cause: {cause}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(product::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blank_identifier_is_generated_supplied_is_kept() {
        let db = seeded_db().await;
        let result = import_csv::<ProductTransactionRow, _>(
            &db,
            transactions_csv().as_bytes(),
            &ctx(),
        )
        .await
        .unwrap();
        assert_eq!(result.imported_count, 2);
        assert_eq!(result.generated_ids, 1);

        let rows = transaction::Entity::find()
            .order_by_asc(transaction::Column::CreatedAt)
            .all(&db)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, SUPPLIED_TX_ID);
        assert_ne!(rows[1].id, SUPPLIED_TX_ID);
        assert!(is_well_formed(&rows[1].id));
        assert_eq!(rows[1].created_at, "2024-05-02 18:30:00 WIB");
        assert!(rows.iter().all(|r| r.is_training_data));
    }

    #[tokio::test]
    async fn test_reimport_does_not_duplicate() {
        let db = seeded_db().await;
        let first = member::Entity::find_by_id("M001".to_string()).one(&db).await.unwrap().unwrap();

        let again = import_csv::<MemberRow, _>(
            &db,
            MEMBERS_CSV.as_bytes(),
            &ImportContext::with_hash("$argon2id$other"),
        )
        .await
        .unwrap();
        assert_eq!(again.imported_count, 2);
        assert_eq!(member::Entity::find().count(&db).await.unwrap(), 2);

        let second = member::Entity::find_by_id("M001".to_string()).one(&db).await.unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(second.password, "$argon2id$placeholder");
    }

    #[tokio::test]
    async fn test_reimport_overwrites_changed_columns() {
        let db = seeded_db().await;
        let csv = "\
MemberID,JoinDate,DateOfBirth,City,NoOfChild,EldestKidDOB,YoungestKidDOB
M002,2023-02-20,,Surabaya,1,2024-01-01,
";
        import_csv::<MemberRow, _>(&db, csv.as_bytes(), &ctx())
            .await
            .unwrap();
        let m = member::Entity::find_by_id("M002".to_string()).one(&db).await.unwrap().unwrap();
        assert_eq!(m.city, "Surabaya");
        assert_eq!(m.no_of_child, 1);
        assert!(m.eldest_kid_dob.is_some());
        assert_eq!(member::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_zero_price_is_accepted_zero_qty_is_not() {
        let db = seeded_db().await;
        let csv = "\
TransactionID,MemberID,FK_PRODUCT_ID,FK_PROD_GRAM_ID,Source,Qty,PricePerUnit,TransactionDatetime
,M001,1,10,promo,1,0,2024-05-01 10:00:00 UTC
";
        let result = import_csv::<ProductTransactionRow, _>(&db, csv.as_bytes(), &ctx())
            .await
            .unwrap();
        assert_eq!(result.imported_count, 1);
        let stored = transaction::Entity::find().one(&db).await.unwrap().unwrap();
        assert_eq!(stored.price_per_unit, Some(0.0));

        let csv = "\
TransactionID,MemberID,FK_PRODUCT_ID,FK_PROD_GRAM_ID,Source,Qty,PricePerUnit,TransactionDatetime
,M001,1,10,promo,0,100,2024-05-01 10:00:00 UTC
";
        match import_csv::<ProductTransactionRow, _>(&db, csv.as_bytes(), &ctx())
            .await
            .unwrap_err()
        {
            ImportError::Validation { row, field, rule, .. } => {
                assert_eq!(row, 2);
                assert_eq!(field, "Qty");
                assert_eq!(rule, "required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_price_is_rejected() {
        let db = seeded_db().await;
        let csv = "\
TransactionID,MemberID,FK_PRODUCT_ID,FK_PROD_GRAM_ID,Source,Qty,PricePerUnit,TransactionDatetime
,M001,1,10,promo,1,,2024-05-01 10:00:00 UTC
";
        match import_csv::<ProductTransactionRow, _>(&db, csv.as_bytes(), &ctx())
            .await
            .unwrap_err()
        {
            ImportError::Validation { field, rule, .. } => {
                assert_eq!(field, "PricePerUnit");
                assert_eq!(rule, "present");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_product_key_is_accepted_blank_is_not() {
        let db = connect_in_memory().await.unwrap();
        let csv = "\
productID,ProductName,ProductCategory,ProductLevel
0,Sample Sachet,Nutrition,Trial
";
        import_csv::<ProductRow, _>(&db, csv.as_bytes(), &ctx())
            .await
            .unwrap();
        assert!(product::Entity::find_by_id(0).one(&db).await.unwrap().is_some());

        let csv = "\
prodgramID,GrammageName,Point,Price
,50g,,
";
        match import_csv::<ProductGrammageRow, _>(&db, csv.as_bytes(), &ctx())
            .await
            .unwrap_err()
        {
            ImportError::Validation { row, field, rule, .. } => {
                assert_eq!(row, 2);
                assert_eq!(field, "prodgramID");
                assert_eq!(rule, "present");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transaction_list_far_page_is_empty() {
        let db = seeded_db().await;
        import_csv::<ProductTransactionRow, _>(&db, transactions_csv().as_bytes(), &ctx())
            .await
            .unwrap();
        let page = service::list(
            &db,
            &contracts::shared::pagination::PageQuery {
                page: Some(i64::MAX),
                paginate: Some(10),
            },
        )
        .await
        .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total_data, 2);
    }

    #[tokio::test]
    async fn test_unknown_member_reference() {
        let db = seeded_db().await;
        let csv = "\
TransactionID,MemberID,FK_PRODUCT_ID,FK_PROD_GRAM_ID,Source,Qty,PricePerUnit,TransactionDatetime
,M999,1,10,store,2,52000,2024-05-01 10:00:00 UTC
";
        match import_csv::<ProductTransactionRow, _>(&db, csv.as_bytes(), &ctx())
            .await
            .unwrap_err()
        {
            ImportError::Validation { row, field, rule, .. } => {
                assert_eq!(row, 2);
                assert_eq!(field, "MemberID");
                assert_eq!(rule, "exists(members.id)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_transaction_id() {
        let db = seeded_db().await;
        let csv = "\
TransactionID,MemberID,FK_PRODUCT_ID,FK_PROD_GRAM_ID,Source,Qty,PricePerUnit,TransactionDatetime
TX-1,M001,1,10,store,2,52000,2024-05-01 10:00:00 UTC
";
        let err = import_csv::<ProductTransactionRow, _>(&db, csv.as_bytes(), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::MalformedIdentifier { row: 2, .. }));
        assert_eq!(transaction::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unparsable_quantity_is_a_decode_error() {
        let db = seeded_db().await;
        let csv = "\
TransactionID,MemberID,FK_PRODUCT_ID,FK_PROD_GRAM_ID,Source,Qty,PricePerUnit,TransactionDatetime
,M001,1,10,store,two,52000,2024-05-01 10:00:00 UTC
";
        let err = import_csv::<ProductTransactionRow, _>(&db, csv.as_bytes(), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Decode { line: 2, .. }));
    }

    #[tokio::test]
    async fn test_created_transaction_is_not_training_data() {
        let db = seeded_db().await;
        let dto = CreateProductTransactionDto {
            member_id: "M001".into(),
            product_id: 1,
            product_grammage_id: 10,
            source: "app".into(),
            qty: 3,
            price_per_unit: Some(52000.0),
            created_at: "2024-06-01 08:00:00 UTC".into(),
        };
        let created = service::create(&db, dto, &ctx()).await.unwrap();
        assert!(is_well_formed(&created.id));
        assert!(!created.is_training_data);
        assert_eq!(created.qty, 3);
        assert_eq!(transaction::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_created_transaction_uses_csv_rules() {
        let db = seeded_db().await;
        let dto = CreateProductTransactionDto {
            member_id: "M001".into(),
            product_id: 1,
            product_grammage_id: 10,
            source: "app".into(),
            qty: 3,
            price_per_unit: Some(52000.0),
            created_at: "2024-06-01T08:00:00Z".into(),
        };
        match service::create(&db, dto, &ctx()).await.unwrap_err() {
            ImportError::Validation { row, field, .. } => {
                assert_eq!(row, 1);
                assert_eq!(field, "TransactionDatetime");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
