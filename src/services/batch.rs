//! Batch review over several selected requirements.
//!
//! Items are processed one after another and each commits on its own. A
//! failure is recorded and the loop moves on; earlier items stay committed.

use serde::Serialize;
use uuid::Uuid;

use super::review_service::{self, ReviewSubmission};
use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::User;

/// One requirement that could not be updated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub requirement_id: i64,
    pub message: String,
}

/// Per-item results of a batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Correlates the log lines of one run.
    pub batch_id: String,
    pub succeeded: Vec<i64>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    fn new() -> Self {
        Self {
            batch_id: Uuid::new_v4().to_string(),
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Short message for the notification toast.
    pub fn summary(&self) -> String {
        format!(
            "{} succeeded, {} failed",
            self.succeeded_count(),
            self.failed_count()
        )
    }

    fn record(&mut self, requirement_id: i64, result: Result<(), AppError>) {
        match result {
            Ok(()) => self.succeeded.push(requirement_id),
            Err(e) => {
                log::warn!(
                    "[batch] {} requirement {} failed: {}",
                    self.batch_id,
                    requirement_id,
                    e
                );
                self.failed.push(BatchFailure {
                    requirement_id,
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Apply the same review decision to every selected requirement.
///
/// Duplicate IDs are processed once. The report lists every ID exactly once,
/// either as succeeded or failed.
pub async fn batch_submit_review(
    pool: &DbPool,
    requirement_ids: &[i64],
    submission: &ReviewSubmission,
    reviewer: &User,
) -> BatchReport {
    let mut report = BatchReport::new();
    let mut seen = std::collections::HashSet::new();

    log::info!(
        "[batch] {} submitting level {} {} on {} requirement(s)",
        report.batch_id,
        submission.level,
        submission.decision,
        requirement_ids.len()
    );

    for &requirement_id in requirement_ids {
        if !seen.insert(requirement_id) {
            continue;
        }
        let result =
            review_service::submit_requirement_review(pool, requirement_id, submission, reviewer)
                .await
                .map(|_| ());
        report.record(requirement_id, result);
    }

    log::info!("[batch] {} finished: {}", report.batch_id, report.summary());

    report
}
