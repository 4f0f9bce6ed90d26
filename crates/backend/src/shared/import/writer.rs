//! Upsert writer: one transaction per call, rows written one at a time in
//! input order, first failure aborts everything.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, IdenStatic, Iterable,
    PrimaryKeyToColumn, QueryTrait, TransactionTrait,
};

use super::decoder::DecodedRow;
use super::entity::{ImportContext, ImportEntity};
use super::error::ImportError;

pub struct UpsertWriter {
    txn: DatabaseTransaction,
}

impl UpsertWriter {
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, ImportError> {
        let txn = db.begin().await.map_err(|e| {
            tracing::error!("Failed to start import transaction: {}", e);
            ImportError::TransactionStart(e)
        })?;
        Ok(Self { txn })
    }

    /// Транзакция для проверок и сверки внутри той же единицы работы
    pub fn txn(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Writes every row; returns the number of rows written.
    pub async fn write<E: ImportEntity>(
        &self,
        rows: Vec<DecodedRow<E>>,
        ctx: &ImportContext,
    ) -> Result<usize, ImportError> {
        let on_conflict = conflict_clause::<E>();
        let mut written = 0;

        for row in rows {
            let line = row.line;
            let payload = format!("{:?}", row.record);

            let model = match row.record.into_active_model(&self.txn, ctx).await {
                Ok(model) => model,
                Err(fault) => {
                    tracing::error!(
                        entity = E::LABEL,
                        row = line,
                        payload = %payload,
                        "Failed to prepare row: {}",
                        fault
                    );
                    return Err(ImportError::RowWrite {
                        entity: E::LABEL,
                        row: line,
                        cause: fault.to_string(),
                    });
                }
            };

            let stmt = E::Entity::insert(model)
                .on_conflict(on_conflict.clone())
                .build(self.txn.get_database_backend());
            let result = self.txn.execute(stmt).await;
            if let Err(e) = result {
                tracing::error!(
                    entity = E::LABEL,
                    row = line,
                    payload = %payload,
                    "Failed to write row: {}",
                    e
                );
                return Err(ImportError::RowWrite {
                    entity: E::LABEL,
                    row: line,
                    cause: e.to_string(),
                });
            }
            written += 1;
        }

        tracing::debug!(entity = E::LABEL, rows = written, "Rows written");
        Ok(written)
    }

    pub async fn commit(self) -> Result<(), ImportError> {
        self.txn.commit().await.map_err(|e| {
            tracing::error!("Failed to commit import transaction: {}", e);
            ImportError::Commit(e)
        })
    }

    pub async fn rollback(self) {
        if let Err(e) = self.txn.rollback().await {
            tracing::error!("Failed to roll back import transaction: {}", e);
        }
    }
}

/// `ON CONFLICT (<pk>) DO UPDATE SET <non-key columns> = excluded.<column>`,
/// minus the columns the entity preserves.
fn conflict_clause<E: ImportEntity>() -> OnConflict {
    let key_columns: Vec<_> = <E::Entity as EntityTrait>::PrimaryKey::iter()
        .map(|pk| pk.into_column())
        .collect();
    let key_names: Vec<&str> = key_columns.iter().map(|c| c.as_str()).collect();

    let update_columns: Vec<_> = <E::Entity as EntityTrait>::Column::iter()
        .filter(|c| !key_names.contains(&c.as_str()))
        .filter(|c| !E::PRESERVE_ON_CONFLICT.contains(&c.as_str()))
        .collect();

    let mut clause = OnConflict::columns(key_columns);
    if update_columns.is_empty() {
        clause.do_nothing();
    } else {
        clause.update_columns(update_columns);
    }
    clause.to_owned()
}
