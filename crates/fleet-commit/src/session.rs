//! Upload session state machine.
//!
//! One session walks a single file from selection through analysis, review,
//! and commit. Every structure behind a session is created fresh and
//! discarded when the session returns to [`SessionState::Idle`]. Cancel is
//! honoured everywhere except while a commit is in flight; once the external
//! call is issued there is no way back until it resolves.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::CommitOutcome;

/// Where one upload session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    FileSelected,
    Analyzing,
    /// Date columns were detected; the operator reviews formats.
    DateReview,
    FixPreview,
    TableEdit,
    FixApproval,
    Committing,
    Result(CommitOutcome),
}

/// The inputs that move a session forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SelectFile,
    BeginAnalysis,
    DateColumnsFound,
    NoDateColumns,
    ConfirmFormats,
    EditTable,
    ReviewFixes,
    BackToPreview,
    BeginCommit,
    CommitFinished(CommitOutcome),
    Acknowledge,
    Cancel,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot cancel while a commit is in flight")]
    CancelWhileCommitting,
    #[error("{event:?} is not valid in state {state:?}")]
    InvalidTransition {
        state: SessionState,
        event: SessionEvent,
    },
}

impl SessionState {
    pub fn can_cancel(&self) -> bool {
        !matches!(self, Self::Committing)
    }

    /// Applies one event, returning the next state or an error that leaves
    /// the caller's state untouched.
    pub fn apply(self, event: SessionEvent) -> Result<Self, SessionError> {
        use SessionEvent as E;
        use SessionState as S;

        if event == E::Cancel {
            return if self.can_cancel() {
                debug!(from = ?self, "session cancelled");
                Ok(S::Idle)
            } else {
                Err(SessionError::CancelWhileCommitting)
            };
        }

        let next = match (self, event) {
            (S::Idle, E::SelectFile) => S::FileSelected,
            (S::FileSelected, E::BeginAnalysis) => S::Analyzing,
            (S::Analyzing, E::DateColumnsFound) => S::DateReview,
            (S::Analyzing, E::NoDateColumns) => S::FixPreview,
            (S::DateReview, E::ConfirmFormats) => S::FixPreview,
            (S::FixPreview, E::EditTable) => S::TableEdit,
            (S::FixPreview, E::ReviewFixes) => S::FixApproval,
            (S::TableEdit | S::FixApproval, E::BackToPreview) => S::FixPreview,
            (S::TableEdit | S::FixApproval, E::BeginCommit) => S::Committing,
            (S::Committing, E::CommitFinished(outcome)) => S::Result(outcome),
            (S::Result(_), E::Acknowledge) => S::Idle,
            (state, event) => return Err(SessionError::InvalidTransition { state, event }),
        };
        debug!(from = ?self, to = ?next, "session advanced");
        Ok(next)
    }
}
