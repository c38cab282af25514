//! Entity catalogue: which spreadsheet kinds can be imported and what their
//! canonical fields look like.
//!
//! The schemas here are the compiled-in defaults; the surrounding application
//! may supply its own [`EntitySchema`] when a deployment adds or removes
//! columns. Required-field sets grow dynamically at commit time (see
//! `BulkCommitOptions::effective_required_fields`), so the base sets stay
//! minimal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Discriminator selecting the field-type map and base required-field set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Customer,
    Vehicle,
    Contract,
    Payment,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Vehicle => "vehicle",
            Self::Contract => "contract",
            Self::Payment => "payment",
        }
    }
}

/// Declared type of a canonical field, driving auto-fix dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Email,
    Phone,
    Boolean,
}

/// Per-entity field declarations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySchema {
    pub entity: EntityType,
    /// Canonical field key -> declared type.
    pub field_types: BTreeMap<String, FieldType>,
    /// Fields a row must carry to be committable.
    pub required_fields: Vec<String>,
}

impl EntitySchema {
    pub fn field_type(&self, key: &str) -> Option<FieldType> {
        self.field_types.get(key).copied()
    }

    /// Built-in default schema for an entity type.
    pub fn default_for(entity: EntityType) -> Self {
        let (fields, required): (&[(&str, FieldType)], &[&str]) = match entity {
            EntityType::Customer => (
                &[
                    ("customer_name", FieldType::Text),
                    ("phone", FieldType::Phone),
                    ("email", FieldType::Email),
                    ("national_id", FieldType::Text),
                    ("license_number", FieldType::Text),
                    ("license_expiry", FieldType::Date),
                    ("is_active", FieldType::Boolean),
                ],
                &["customer_name", "phone"],
            ),
            EntityType::Vehicle => (
                &[
                    ("plate_number", FieldType::Text),
                    ("make", FieldType::Text),
                    ("model", FieldType::Text),
                    ("year", FieldType::Number),
                    ("daily_rate", FieldType::Number),
                    ("monthly_rate", FieldType::Number),
                    ("registration_expiry", FieldType::Date),
                    ("insurance_expiry", FieldType::Date),
                ],
                &["plate_number"],
            ),
            EntityType::Contract => (
                &[
                    ("contract_number", FieldType::Text),
                    ("customer_name", FieldType::Text),
                    ("customer_phone", FieldType::Phone),
                    ("vehicle_number", FieldType::Text),
                    ("contract_type", FieldType::Text),
                    ("start_date", FieldType::Date),
                    ("end_date", FieldType::Date),
                    ("contract_amount", FieldType::Number),
                    ("monthly_amount", FieldType::Number),
                ],
                &["customer_name", "start_date", "end_date", "contract_amount"],
            ),
            EntityType::Payment => (
                &[
                    ("payment_date", FieldType::Date),
                    ("amount", FieldType::Number),
                    ("payment_method", FieldType::Text),
                    ("contract_number", FieldType::Text),
                    ("customer_name", FieldType::Text),
                    ("reference_number", FieldType::Text),
                    ("notes", FieldType::Text),
                ],
                &["payment_date", "amount"],
            ),
        };
        Self {
            entity,
            field_types: fields
                .iter()
                .map(|(k, t)| ((*k).to_string(), *t))
                .collect(),
            required_fields: required.iter().map(|f| (*f).to_string()).collect(),
        }
    }
}
