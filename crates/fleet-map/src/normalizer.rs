//! Header normalization.
//!
//! Maps raw (often bilingual) column headers to canonical field keys. Total
//! and pure: unknown headers pass through verbatim so no information is
//! lost, and normalizing twice is the same as normalizing once.

use fleet_model::Row;
use tracing::debug;

use crate::SynonymTable;

pub struct HeaderNormalizer {
    table: SynonymTable,
}

impl HeaderNormalizer {
    pub fn new(table: SynonymTable) -> Self {
        Self { table }
    }

    /// Rewrites each field key to its canonical form. Keys with no synonym
    /// entry are kept verbatim. `Row::rename` never clobbers an existing
    /// field, so when a raw header and its canonical key are both present
    /// the canonical one wins and the raw one stays untouched.
    pub fn normalize(&self, row: &Row) -> Row {
        let mut out = row.clone();
        let renames: Vec<(String, String)> = row
            .keys()
            .filter_map(|key| {
                self.table
                    .canonical_key(key)
                    .filter(|canonical| *canonical != key)
                    .map(|canonical| (key.to_string(), canonical.to_string()))
            })
            .collect();
        for (from, to) in renames {
            debug!(row = row.number(), %from, %to, "normalized header");
            out.rename(&from, &to);
        }
        out
    }

    /// Normalizes every row in a batch.
    pub fn normalize_all(&self, rows: &[Row]) -> Vec<Row> {
        rows.iter().map(|row| self.normalize(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use fleet_model::{EntityType, Value};

    use super::*;

    fn normalizer() -> HeaderNormalizer {
        HeaderNormalizer::new(SynonymTable::default_for(EntityType::Contract))
    }

    fn raw_row() -> Row {
        let mut row = Row::new(2);
        row.set("Customer Name", Value::Text("Ali".to_string()));
        row.set("Start Date", Value::Text("01/02/2023".to_string()));
        row.set("Internal Ref", Value::Text("x-1".to_string()));
        row
    }

    #[test]
    fn maps_known_headers_and_passes_unknown_through() {
        let normalized = normalizer().normalize(&raw_row());
        let keys: Vec<&str> = normalized.keys().collect();
        assert_eq!(keys, vec!["customer_name", "start_date", "Internal Ref"]);
        assert_eq!(
            normalized.get("customer_name"),
            Some(&Value::Text("Ali".to_string()))
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let n = normalizer();
        let once = n.normalize(&raw_row());
        let twice = n.normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn keeps_row_number() {
        let normalized = normalizer().normalize(&raw_row());
        assert_eq!(normalized.number(), 2);
    }

    #[test]
    fn does_not_clobber_existing_canonical_field() {
        let mut row = Row::new(2);
        row.set("customer_name", Value::Text("kept".to_string()));
        row.set("Customer Name", Value::Text("dropped".to_string()));
        let normalized = normalizer().normalize(&row);
        assert_eq!(
            normalized.get("customer_name"),
            Some(&Value::Text("kept".to_string()))
        );
    }
}
