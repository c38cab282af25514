//! Bulk-commit call/response contract shared with the persistence
//! collaborator. The collaborator is out of scope; these types are the wire
//! agreement the coordinator consumes.

use serde::{Deserialize, Serialize};

use crate::EntityType;

/// Options forwarded with an approved row set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkCommitOptions {
    /// Update-if-exists instead of duplicate-skip.
    pub upsert: bool,
    /// Validate and match without persisting anything.
    pub dry_run: bool,
    /// Tenant/company the rows are written into.
    pub target_scope: Option<String>,
    /// Create missing related entities (e.g. customers named on contracts).
    pub auto_create_related: bool,
    pub auto_complete_dates: bool,
    pub auto_complete_type: bool,
    pub auto_complete_amounts: bool,
    /// Keep the original file in the external archive.
    pub archive_original: bool,
}

impl BulkCommitOptions {
    /// The required-field set after business toggles are applied.
    ///
    /// Auto-creating customers for contract rows needs a phone number to key
    /// the new customer on, so `customer_phone` becomes required.
    pub fn effective_required_fields(&self, entity: EntityType, base: &[String]) -> Vec<String> {
        let mut fields = base.to_vec();
        if entity == EntityType::Contract
            && self.auto_create_related
            && !fields.iter().any(|f| f == "customer_phone")
        {
            fields.push("customer_phone".to_string());
        }
        fields
    }
}

/// Per-row failure reported by the collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    pub row: u32,
    pub message: String,
}

/// Counts returned by the collaborator. Partial failure is expected, not
/// exceptional: `successful + failed + skipped <= total` always holds for a
/// well-formed result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkCommitResult {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: Vec<RowError>,
}

impl BulkCommitResult {
    /// Whether the counts are internally consistent.
    pub fn counts_consistent(&self) -> bool {
        self.successful + self.failed + self.skipped <= self.total
    }
}
