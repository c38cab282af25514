//! Row validation.
//!
//! Checks a (possibly fixed) row against the active required-field set. The
//! validator is stateless and has no opinion on why a field became required;
//! callers extend the set when business toggles demand it. A missing
//! required field isolates the row, it never aborts the batch.

pub mod validator;

pub use validator::{RowValidation, is_placeholder, validate};
