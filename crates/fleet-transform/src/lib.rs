//! Value transformation for the fleet import pipeline.
//!
//! Three stages run between header normalization and commit: date column
//! analysis (which formats a column speaks, and how sure we are), per-field
//! auto-fixing (numbers, phones, emails, booleans, dates, text), and the
//! [`FixPipeline`] that strings them together and validates the result. Every
//! proposed change carries a confidence tier for operator review; confidence
//! never changes what the fixer does, only how the change is presented.

pub mod autofix;
pub mod date;
pub mod pipeline;

pub use autofix::FieldAutoFixer;
pub use date::{
    ColumnDateAnalysis, DATE_COLUMN_THRESHOLD, DateColumnAnalyzer, DateDetectionResult,
    DateFormatCatalogue, DateFormatOption, SAMPLE_LIMIT,
};
pub use pipeline::FixPipeline;
