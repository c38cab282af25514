//! Per-entity header synonym tables.
//!
//! The tables are configuration, not logic: deployments ship their own JSON
//! (bilingual headers vary wildly between rental agencies) and the built-in
//! defaults only cover the common cases well enough for tests and demos.
//! Lookup is over normalized text, so `"Customer Name"`, `"customer-name"`,
//! and `"CUSTOMER_NAME"` all land on the same entry.

use std::collections::BTreeMap;

use fleet_model::EntityType;
use serde::{Deserialize, Serialize};

/// Normalizes header text for lookup: lowercase, separators become spaces,
/// whitespace runs collapse.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Synonym table for one entity type: normalized header -> canonical key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynonymTable {
    entries: BTreeMap<String, String>,
}

impl SynonymTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(synonym, canonical)` pairs. Synonyms are
    /// normalized; each canonical key also maps to itself so normalization
    /// stays idempotent.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut entries = BTreeMap::new();
        for (synonym, canonical) in pairs {
            entries.insert(normalize_text(synonym), canonical.to_string());
            entries.insert(normalize_text(canonical), canonical.to_string());
        }
        Self { entries }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)?;
        let mut entries = BTreeMap::new();
        for (synonym, canonical) in raw {
            entries.insert(normalize_text(&synonym), canonical.clone());
            entries.insert(normalize_text(&canonical), canonical);
        }
        Ok(Self { entries })
    }

    pub fn canonical_key(&self, header: &str) -> Option<&str> {
        self.entries.get(&normalize_text(header)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Built-in default table for an entity type.
    pub fn default_for(entity: EntityType) -> Self {
        match entity {
            EntityType::Customer => Self::from_pairs([
                ("customer name", "customer_name"),
                ("name", "customer_name"),
                ("اسم العميل", "customer_name"),
                ("phone number", "phone"),
                ("mobile", "phone"),
                ("رقم الهاتف", "phone"),
                ("الجوال", "phone"),
                ("email address", "email"),
                ("البريد الالكتروني", "email"),
                ("national id", "national_id"),
                ("الرقم الشخصي", "national_id"),
                ("license number", "license_number"),
                ("license expiry", "license_expiry"),
                ("active", "is_active"),
            ]),
            EntityType::Vehicle => Self::from_pairs([
                ("plate number", "plate_number"),
                ("plate", "plate_number"),
                ("رقم اللوحة", "plate_number"),
                ("vehicle make", "make"),
                ("الماركة", "make"),
                ("vehicle model", "model"),
                ("الموديل", "model"),
                ("model year", "year"),
                ("سنة الصنع", "year"),
                ("daily rate", "daily_rate"),
                ("monthly rate", "monthly_rate"),
                ("registration expiry", "registration_expiry"),
                ("insurance expiry", "insurance_expiry"),
            ]),
            EntityType::Contract => Self::from_pairs([
                ("contract number", "contract_number"),
                ("agreement number", "contract_number"),
                ("رقم العقد", "contract_number"),
                ("customer name", "customer_name"),
                ("اسم العميل", "customer_name"),
                ("customer phone", "customer_phone"),
                ("هاتف العميل", "customer_phone"),
                ("vehicle number", "vehicle_number"),
                ("plate number", "vehicle_number"),
                ("رقم المركبة", "vehicle_number"),
                ("contract type", "contract_type"),
                ("نوع العقد", "contract_type"),
                ("start date", "start_date"),
                ("تاريخ البداية", "start_date"),
                ("end date", "end_date"),
                ("تاريخ النهاية", "end_date"),
                ("contract amount", "contract_amount"),
                ("total amount", "contract_amount"),
                ("قيمة العقد", "contract_amount"),
                ("monthly amount", "monthly_amount"),
                ("المبلغ الشهري", "monthly_amount"),
            ]),
            EntityType::Payment => Self::from_pairs([
                ("payment date", "payment_date"),
                ("date", "payment_date"),
                ("تاريخ الدفع", "payment_date"),
                ("paid amount", "amount"),
                ("المبلغ", "amount"),
                ("payment method", "payment_method"),
                ("طريقة الدفع", "payment_method"),
                ("contract number", "contract_number"),
                ("رقم العقد", "contract_number"),
                ("customer name", "customer_name"),
                ("reference number", "reference_number"),
                ("رقم المرجع", "reference_number"),
                ("remarks", "notes"),
                ("ملاحظات", "notes"),
            ]),
        }
    }
}
