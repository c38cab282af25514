//! Date column analysis: catalogue, detection, and strict ISO rewriting.

pub mod catalogue;
pub mod detect;

pub use catalogue::{DateFormatCatalogue, DateFormatOption};
pub use detect::{
    ColumnDateAnalysis, DATE_COLUMN_THRESHOLD, DateColumnAnalyzer, DateDetectionResult,
    SAMPLE_LIMIT,
};
