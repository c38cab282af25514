//! Tagged cell values.
//!
//! Spreadsheet cells arrive as text, numbers, booleans, or nothing at all.
//! Keeping the variant explicit makes per-type dispatch in the auto-fixer an
//! exhaustive match instead of string sniffing at every call site.

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Value {
    Text(String),
    Number(f64),
    Bool(bool),
    Missing,
}

impl Value {
    /// Builds a value from raw cell text: empty/whitespace becomes `Missing`,
    /// everything else is kept verbatim as `Text`.
    pub fn from_cell(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Value::Missing
        } else {
            Value::Text(raw.to_string())
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value the way it would appear in a cell.
    pub fn to_display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => format_numeric(*n),
            Value::Bool(b) => b.to_string(),
            Value::Missing => String::new(),
        }
    }

    /// A value counts as present unless it is `Missing` or blank text.
    /// Numeric `0` and `false` are present.
    pub fn is_present(&self) -> bool {
        match self {
            Value::Missing => false,
            Value::Text(s) => !s.trim().is_empty(),
            Value::Number(_) | Value::Bool(_) => true,
        }
    }
}

/// Formats a floating-point number without trailing zeros ("10.50" -> "10.5",
/// "10.0" -> "10").
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
