//! Fix records: what the pipeline changed, how sure it is, and why.

use serde::{Deserialize, Serialize};

use crate::{Row, Value};

/// Certainty tier of an auto-fix. A closed set on purpose: confidence is
/// informational and never changes pipeline control flow, only validity does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - safe to apply",
            Self::Medium => "medium confidence - worth a glance",
            Self::Low => "low confidence - review before committing",
        }
    }
}

/// One corrective transform applied to a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFix {
    pub field: String,
    pub original: Value,
    pub fixed: Value,
    pub confidence: Confidence,
    /// Human-readable explanation shown in the operator preview.
    pub reason: String,
}

/// All fixes and validation findings for one source row.
///
/// `has_errors` is derived from `validation_errors` rather than stored, so
/// the two can never disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowFix {
    pub row_number: u32,
    pub fixes: Vec<FieldFix>,
    pub validation_errors: Vec<String>,
    /// The row after header normalization, date rewriting, and auto-fixing,
    /// in that order.
    pub fixed_data: Row,
}

impl RowFix {
    pub fn has_errors(&self) -> bool {
        !self.validation_errors.is_empty()
    }

    /// Fixes below the given tier, for operator attention.
    pub fn fixes_below(&self, tier: Confidence) -> impl Iterator<Item = &FieldFix> {
        self.fixes.iter().filter(move |f| f.confidence < tier)
    }
}
