use fleet_model::{Row, Value};
use serde::{Deserialize, Serialize};

/// Outcome of validating one row. `is_valid` holds exactly when
/// `missing_required` is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowValidation {
    pub missing_required: Vec<String>,
}

impl RowValidation {
    pub fn is_valid(&self) -> bool {
        self.missing_required.is_empty()
    }
}

/// Tokens operators type when they mean "no value". Treated as missing so a
/// column of `N/A` does not satisfy a required field.
pub fn is_placeholder(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "n/a" | "na" | "-" | "--" | "none" | "null" | "غير محدد" | "لا يوجد"
    )
}

fn field_present(value: Option<&Value>) -> bool {
    match value {
        None => false,
        Some(Value::Text(s)) => !s.trim().is_empty() && !is_placeholder(s),
        // Numeric 0 and false are real values, not missing.
        Some(v) => v.is_present(),
    }
}

/// Checks `row` against the caller-supplied required-field set.
pub fn validate(row: &Row, required_fields: &[String]) -> RowValidation {
    let missing_required = required_fields
        .iter()
        .filter(|field| !field_present(row.get(field)))
        .cloned()
        .collect();
    RowValidation { missing_required }
}
