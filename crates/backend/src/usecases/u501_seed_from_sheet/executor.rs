use async_trait::async_trait;
use clap::ValueEnum;
use contracts::usecases::u501_seed_from_sheet::response::{SeedReport, TabReport};
use sea_orm::{DatabaseConnection, DatabaseTransaction};
use std::fmt;
use std::sync::Arc;

use crate::domain::a005_role::sheet::RoleRow;
use crate::domain::a006_company::sheet::CompanyRow;
use crate::domain::a007_branch::sheet::BranchRow;
use crate::domain::a008_user::sheet::UserRow;
use crate::shared::import::batch::{BatchStage, ImportBatch};
use crate::shared::import::decoder::{decode_tab, DecodedRow};
use crate::shared::import::ids::assign_missing;
use crate::shared::import::validator::validate_rows;
use crate::shared::import::writer::UpsertWriter;
use crate::shared::import::{ImportContext, ImportError};
use crate::shared::sheet::reconcile::{reconcile_tab, SheetEntity};
use crate::shared::sheet::store::SheetStore;
use crate::shared::sheet::Sheet;

/// Какие вкладки сидировать
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeedTarget {
    Roles,
    Companies,
    Branches,
    Users,
    /// roles → companies → branches → users
    All,
}

impl fmt::Display for SeedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => Ok(()),
        }
    }
}

impl SeedTarget {
    fn jobs(self) -> Vec<Box<dyn TabJob>> {
        match self {
            SeedTarget::Roles => vec![SheetJob::<RoleRow>::boxed()],
            SeedTarget::Companies => vec![SheetJob::<CompanyRow>::boxed()],
            SeedTarget::Branches => vec![SheetJob::<BranchRow>::boxed()],
            SeedTarget::Users => vec![SheetJob::<UserRow>::boxed()],
            SeedTarget::All => vec![
                SheetJob::<RoleRow>::boxed(),
                SheetJob::<CompanyRow>::boxed(),
                SheetJob::<BranchRow>::boxed(),
                SheetJob::<UserRow>::boxed(),
            ],
        }
    }
}

/// Одна вкладка, проходящая стадии сидирования
#[async_trait]
trait TabJob: Send + Sync {
    fn tab(&self) -> &'static str;

    /// Decodes the tab and writes generated identifiers back into column A
    fn prepare(&mut self, sheet: &mut Sheet) -> Result<(), ImportError>;

    async fn validate(&self, txn: &DatabaseTransaction) -> Result<(), ImportError>;

    async fn write(&mut self, writer: &UpsertWriter, ctx: &ImportContext)
        -> Result<(), ImportError>;

    async fn reconcile(
        &mut self,
        txn: &DatabaseTransaction,
        sheet: &mut Sheet,
    ) -> Result<(), ImportError>;

    fn report(&self) -> TabReport;
}

struct SheetJob<E: SheetEntity> {
    rows: Vec<DecodedRow<E>>,
    ids: Vec<String>,
    report: TabReport,
}

impl<E: SheetEntity> SheetJob<E> {
    fn boxed() -> Box<dyn TabJob> {
        Box::new(Self {
            rows: Vec::new(),
            ids: Vec::new(),
            report: TabReport {
                tab: E::TAB.to_string(),
                written: 0,
                backfilled_ids: 0,
                appended: 0,
            },
        })
    }
}

#[async_trait]
impl<E: SheetEntity> TabJob for SheetJob<E> {
    fn tab(&self) -> &'static str {
        E::TAB
    }

    fn prepare(&mut self, sheet: &mut Sheet) -> Result<(), ImportError> {
        let missing_tab = || ImportError::SheetTab {
            tab: E::TAB.to_string(),
        };
        let tab = sheet.tab(E::TAB).ok_or_else(missing_tab)?;
        let mut rows = decode_tab::<E>(tab, E::HEADER.len())?;
        let assigned = assign_missing(&mut rows)?;

        let tab = sheet.tab_mut(E::TAB).ok_or_else(missing_tab)?;
        for pos in &assigned {
            let row = &mut rows[*pos];
            if let Some(id) = row.record.key_slot() {
                // line is 1-based, tab rows are 0-based
                tab.set_cell(row.line - 1, 0, id.clone());
            }
        }

        self.ids = rows
            .iter_mut()
            .filter_map(|row| row.record.key_slot().map(|id| id.clone()))
            .collect();
        self.report.backfilled_ids = assigned.len();
        self.rows = rows;
        tracing::info!(
            "Tab '{}': {} rows decoded, {} identifiers generated",
            E::TAB,
            self.rows.len(),
            assigned.len()
        );
        Ok(())
    }

    async fn validate(&self, txn: &DatabaseTransaction) -> Result<(), ImportError> {
        validate_rows(txn, &self.rows, E::RULES, E::LABEL).await
    }

    async fn write(
        &mut self,
        writer: &UpsertWriter,
        ctx: &ImportContext,
    ) -> Result<(), ImportError> {
        let rows = std::mem::take(&mut self.rows);
        self.report.written = writer.write(rows, ctx).await?;
        Ok(())
    }

    async fn reconcile(
        &mut self,
        txn: &DatabaseTransaction,
        sheet: &mut Sheet,
    ) -> Result<(), ImportError> {
        let tab = sheet.tab_mut(E::TAB).ok_or_else(|| ImportError::SheetTab {
            tab: E::TAB.to_string(),
        })?;
        self.report.appended = reconcile_tab::<E>(txn, tab, &self.ids).await?;
        Ok(())
    }

    fn report(&self) -> TabReport {
        self.report.clone()
    }
}

/// Сидирование БД из рабочей книги с обратной синхронизацией вкладок.
///
/// Все выбранные вкладки пишутся в одной транзакции. Книга сохраняется
/// до коммита: ошибка сохранения откатывает транзакцию и возвращается как
/// `ImportError::Reconcile`, так что сгенерированные id не попадают в БД
/// без записи в книгу.
pub struct SeedExecutor<S: SheetStore> {
    db: DatabaseConnection,
    store: S,
    ctx: Arc<ImportContext>,
}

impl<S: SheetStore> SeedExecutor<S> {
    pub fn new(db: DatabaseConnection, store: S, ctx: Arc<ImportContext>) -> Self {
        Self { db, store, ctx }
    }

    pub async fn execute(&self, target: SeedTarget) -> Result<SeedReport, ImportError> {
        let mut batch = ImportBatch::start(format!("seed {}", target));

        let mut sheet = self.store.load().map_err(|e| {
            batch.fail(ImportError::Workbook {
                message: format!("{:#}", e),
            })
        })?;

        let mut jobs = target.jobs();
        for job in jobs.iter_mut() {
            job.prepare(&mut sheet).map_err(|e| batch.fail(e))?;
        }

        batch.advance(BatchStage::Validating);
        let writer = UpsertWriter::begin(&self.db)
            .await
            .map_err(|e| batch.fail(e))?;

        if let Err(e) = self.run_in_txn(&writer, &mut jobs, &mut sheet, &mut batch).await {
            writer.rollback().await;
            return Err(batch.fail(e));
        }

        if let Err(e) = self.store.save(&sheet) {
            writer.rollback().await;
            let tab = jobs
                .iter()
                .map(|job| job.tab())
                .collect::<Vec<_>>()
                .join(",");
            return Err(batch.fail(ImportError::Reconcile {
                tab,
                message: format!("{:#}", e),
            }));
        }

        // the sheet already carries every id written in this transaction
        writer.commit().await.map_err(|e| batch.fail(e))?;

        let tabs: Vec<TabReport> = jobs.iter().map(|job| job.report()).collect();
        let written = tabs.iter().map(|t| t.written).sum();
        batch.commit(written);
        Ok(SeedReport { tabs })
    }

    async fn run_in_txn(
        &self,
        writer: &UpsertWriter,
        jobs: &mut [Box<dyn TabJob>],
        sheet: &mut Sheet,
        batch: &mut ImportBatch,
    ) -> Result<(), ImportError> {
        for job in jobs.iter() {
            job.validate(writer.txn()).await?;
        }

        batch.advance(BatchStage::Writing);
        for job in jobs.iter_mut() {
            job.write(writer, &self.ctx).await?;
        }

        batch.advance(BatchStage::Reconciling);
        for job in jobs.iter_mut() {
            job.reconcile(writer.txn(), sheet).await?;
        }
        Ok(())
    }
}
