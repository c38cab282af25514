//! Ordered row container.
//!
//! A [`Row`] keeps fields in source order (re-ordering a spreadsheet on
//! import would surprise operators reviewing fixes) and carries the stable
//! `row_number` every later stage keys on. The number is assigned once at
//! ingest and never reassigned, so filtering and sorting downstream cannot
//! misattribute a fix to the wrong source line.

use crate::Value;

/// Offset added to the 0-based data index when numbering rows: the header
/// occupies line 1, so the first data row is line 2.
pub const HEADER_ROW_OFFSET: u32 = 2;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Row {
    number: u32,
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            fields: Vec::new(),
        }
    }

    /// Stable 1-based source line number (header offset included).
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Replaces the value for `key` in place, or appends the field if the
    /// row does not have it yet. Source order of existing fields is kept.
    pub fn set(&mut self, key: &str, value: Value) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    /// Renames a field, keeping its position. If the target key already
    /// exists the rename is skipped so no data is silently overwritten.
    pub fn rename(&mut self, from: &str, to: &str) {
        if from == to || self.get(to).is_some() {
            return;
        }
        if let Some((k, _)) = self.fields.iter_mut().find(|(k, _)| k == from) {
            *k = to.to_string();
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when every field is missing or blank.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| !v.is_present())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        let mut r = Row::new(2);
        r.set("name", Value::Text("Ali".to_string()));
        r.set("amount", Value::Number(0.0));
        r
    }

    #[test]
    fn preserves_insertion_order() {
        let r = row();
        let keys: Vec<&str> = r.keys().collect();
        assert_eq!(keys, vec!["name", "amount"]);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut r = row();
        r.set("name", Value::Text("Omar".to_string()));
        assert_eq!(r.len(), 2);
        assert_eq!(r.keys().next(), Some("name"));
        assert_eq!(r.get("name"), Some(&Value::Text("Omar".to_string())));
    }

    #[test]
    fn rename_keeps_position_and_never_clobbers() {
        let mut r = row();
        r.rename("name", "customer_name");
        assert_eq!(r.keys().next(), Some("customer_name"));

        // Renaming onto an existing key is a no-op.
        r.rename("customer_name", "amount");
        assert!(r.get("customer_name").is_some());
        assert_eq!(r.get("amount"), Some(&Value::Number(0.0)));
    }

    #[test]
    fn blank_detection() {
        let mut r = Row::new(5);
        r.set("a", Value::Missing);
        r.set("b", Value::Text("  ".to_string()));
        assert!(r.is_blank());
        r.set("c", Value::Number(0.0));
        assert!(!r.is_blank());
    }
}
