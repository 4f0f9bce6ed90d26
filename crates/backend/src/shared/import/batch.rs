use std::fmt;
use std::time::Instant;

use super::error::ImportError;

/// Стадии одного импорта.
///
/// `Decoding → Validating → Writing → [Reconciling] → Committed`;
/// `Failed` достижим из любой нетерминальной стадии.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStage {
    Decoding,
    Validating,
    Writing,
    Reconciling,
    Committed,
    Failed,
}

impl BatchStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, BatchStage::Committed | BatchStage::Failed)
    }

    fn can_advance_to(self, next: BatchStage) -> bool {
        use BatchStage::*;
        matches!(
            (self, next),
            (Decoding, Validating)
                | (Validating, Writing)
                | (Writing, Reconciling)
                | (Writing, Committed)
                | (Reconciling, Committed)
        ) || (next == Failed && !self.is_terminal())
    }
}

impl fmt::Display for BatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchStage::Decoding => "decoding",
            BatchStage::Validating => "validating",
            BatchStage::Writing => "writing",
            BatchStage::Reconciling => "reconciling",
            BatchStage::Committed => "committed",
            BatchStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks one import run and logs its progress.
#[derive(Debug)]
pub struct ImportBatch {
    label: String,
    stage: BatchStage,
    started: Instant,
}

impl ImportBatch {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        tracing::info!(batch = %label, "Import started");
        Self {
            label,
            stage: BatchStage::Decoding,
            started: Instant::now(),
        }
    }

    pub fn advance(&mut self, next: BatchStage) {
        if !self.stage.can_advance_to(next) {
            tracing::warn!(
                batch = %self.label,
                "Unexpected stage transition {} -> {}",
                self.stage,
                next
            );
        }
        tracing::debug!(batch = %self.label, stage = %next, "Import stage");
        self.stage = next;
    }

    pub fn commit(&mut self, rows: usize) {
        self.advance(BatchStage::Committed);
        tracing::info!(
            batch = %self.label,
            rows,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Import committed"
        );
    }

    /// Переводит батч в `Failed` и возвращает ошибку дальше
    pub fn fail(&mut self, err: ImportError) -> ImportError {
        let at = self.stage;
        self.advance(BatchStage::Failed);
        tracing::error!(
            batch = %self.label,
            stage = %at,
            row = err.row(),
            "Import failed: {}",
            err
        );
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut batch = ImportBatch::start("roles");
        assert_eq!(batch.stage, BatchStage::Decoding);
        batch.advance(BatchStage::Validating);
        batch.advance(BatchStage::Writing);
        batch.advance(BatchStage::Reconciling);
        batch.commit(3);
        assert_eq!(batch.stage, BatchStage::Committed);
        assert!(batch.stage.is_terminal());
    }

    #[test]
    fn test_failed_reachable_from_any_open_stage() {
        for stage in [
            BatchStage::Decoding,
            BatchStage::Validating,
            BatchStage::Writing,
            BatchStage::Reconciling,
        ] {
            assert!(stage.can_advance_to(BatchStage::Failed));
        }
        assert!(!BatchStage::Committed.can_advance_to(BatchStage::Failed));
        assert!(!BatchStage::Failed.can_advance_to(BatchStage::Committed));
    }

    #[test]
    fn test_no_skipping_validation() {
        assert!(!BatchStage::Decoding.can_advance_to(BatchStage::Writing));
        assert!(!BatchStage::Validating.can_advance_to(BatchStage::Committed));
    }

    #[test]
    fn test_fail_returns_the_error() {
        let mut batch = ImportBatch::start("member");
        batch.advance(BatchStage::Validating);
        let err = batch.fail(ImportError::MissingFile);
        assert!(matches!(err, ImportError::MissingFile));
        assert_eq!(batch.stage, BatchStage::Failed);
    }
}
