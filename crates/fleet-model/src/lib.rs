//! Shared data model for the fleet import pipeline.
//!
//! Everything here is plain data with serde derives: the surrounding
//! application persists session state and renders fix previews from these
//! types. Pipeline logic lives in the sibling crates.

pub mod commit;
pub mod entity;
pub mod fix;
pub mod locale;
pub mod row;
pub mod value;

pub use commit::{BulkCommitOptions, BulkCommitResult, RowError};
pub use entity::{EntitySchema, EntityType, FieldType};
pub use fix::{Confidence, FieldFix, RowFix};
pub use locale::{DateOrdering, Locale};
pub use row::{HEADER_ROW_OFFSET, Row};
pub use value::{Value, format_numeric};
