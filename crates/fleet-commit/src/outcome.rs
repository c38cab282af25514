//! Classification of a bulk-commit result into one of five outcomes.

use serde::{Deserialize, Serialize};

use fleet_model::BulkCommitResult;

/// The five mutually exclusive endings of a commit, a pure function of the
/// collaborator's counts. Dry runs classify identically; only the phrasing
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOutcome {
    FullSuccess,
    PartialSuccess,
    AllSkippedDuplicates,
    AllFailedValidation,
    NoneProcessed,
}

impl CommitOutcome {
    /// Classifies raw counts.
    ///
    /// Any success alongside a failure or skip is partial. With no
    /// successes, skips-only means duplicates and anything with a failure
    /// counts as failed.
    pub fn classify(successful: usize, failed: usize, skipped: usize) -> Self {
        if successful == 0 && failed == 0 && skipped == 0 {
            Self::NoneProcessed
        } else if successful > 0 && failed == 0 && skipped == 0 {
            Self::FullSuccess
        } else if successful > 0 {
            Self::PartialSuccess
        } else if failed == 0 {
            Self::AllSkippedDuplicates
        } else {
            Self::AllFailedValidation
        }
    }

    pub fn of(result: &BulkCommitResult) -> Self {
        Self::classify(result.successful, result.failed, result.skipped)
    }

    /// Caller-facing summary line. `dry_run` switches the phrasing to the
    /// simulation tense without touching the classification.
    pub fn summary(&self, result: &BulkCommitResult, dry_run: bool) -> String {
        let verb = if dry_run { "would be" } else { "were" };
        match self {
            Self::FullSuccess => {
                format!("all {} rows {verb} imported", result.successful)
            }
            Self::PartialSuccess => format!(
                "{} of {} rows {verb} imported ({} failed, {} skipped)",
                result.successful, result.total, result.failed, result.skipped
            ),
            Self::AllSkippedDuplicates => {
                format!("all {} rows {verb} skipped as duplicates", result.skipped)
            }
            Self::AllFailedValidation => {
                format!("all {} rows {verb} rejected by validation", result.failed)
            }
            Self::NoneProcessed => "no rows to process".to_string(),
        }
    }
}
