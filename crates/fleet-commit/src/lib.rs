//! Approval and commit stages of the fleet import pipeline.
//!
//! After the transform stage produces per-row fixes, [`FixApprovalGate`]
//! holds the operator's selection, [`BulkCommitCoordinator`] hands the
//! approved rows to the external persistence collaborator, and
//! [`CommitOutcome`] classifies the counts that come back. The session state
//! machine in [`session`] ties the whole flow together.

pub mod approval;
pub mod coordinator;
pub mod outcome;
pub mod session;

pub use approval::FixApprovalGate;
pub use coordinator::{
    BulkCommitCoordinator, BulkUploader, CommitError, DEFAULT_STALL_AFTER,
};
pub use outcome::CommitOutcome;
pub use session::{SessionError, SessionEvent, SessionState};
