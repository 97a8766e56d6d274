use serde::Serialize;

use super::domain::{SubmissionId, SubmissionRecord};

/// Audit log storage. Records are append-only; the bulk clear is the only deletion.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError>;
    /// All records in insertion order.
    fn list(&self) -> Result<Vec<SubmissionRecord>, RepositoryError>;
    /// Removes every record, returning how many were dropped.
    fn clear(&self) -> Result<usize, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("submission {0} already recorded")]
    Conflict(SubmissionId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Headline numbers for the audit log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub total: usize,
    pub flagged: usize,
    pub with_exceptions: usize,
    pub total_exceptions: usize,
}

impl AuditSummary {
    pub fn from_records(records: &[SubmissionRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            summary.total += 1;
            if record.flagged {
                summary.flagged += 1;
            }
            if record.exception_count > 0 {
                summary.with_exceptions += 1;
            }
            summary.total_exceptions += record.exception_count;
            summary
        })
    }
}
