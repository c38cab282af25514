//! The row-fix pipeline.
//!
//! Composes the downstream stages in their fixed order: header
//! normalization, operator-enabled date rewriting, per-field auto-fixing,
//! then validation. `fixed_data` in every emitted [`RowFix`] is the row
//! after exactly that sequence.

use std::collections::BTreeMap;

use fleet_map::HeaderNormalizer;
use fleet_model::{Confidence, EntitySchema, FieldFix, Locale, Row, RowFix, Value};
use fleet_validate::validate;
use tracing::info;

use crate::autofix::FieldAutoFixer;
use crate::date::{ColumnDateAnalysis, DateColumnAnalyzer, DateFormatCatalogue};

pub struct FixPipeline<'a> {
    schema: &'a EntitySchema,
    locale: &'a Locale,
    catalogue: &'a DateFormatCatalogue,
    normalizer: &'a HeaderNormalizer,
}

impl<'a> FixPipeline<'a> {
    pub fn new(
        schema: &'a EntitySchema,
        locale: &'a Locale,
        catalogue: &'a DateFormatCatalogue,
        normalizer: &'a HeaderNormalizer,
    ) -> Self {
        Self {
            schema,
            locale,
            catalogue,
            normalizer,
        }
    }

    /// Analyzes normalized rows for date columns, for the operator review
    /// step. Returns one analysis per column that has any present value.
    pub fn analyze_dates(&self, rows: &[Row]) -> Vec<ColumnDateAnalysis> {
        let normalized = self.normalizer.normalize_all(rows);
        DateColumnAnalyzer::new(self.catalogue, self.locale).analyze_columns(&normalized)
    }

    /// The operator-approved `(column, format token)` pairs from a set of
    /// analyses: enabled columns with a selected format.
    pub fn approved_formats(analyses: &[ColumnDateAnalysis]) -> BTreeMap<String, String> {
        analyses
            .iter()
            .filter(|a| a.enabled)
            .filter_map(|a| {
                a.selected_format
                    .as_ref()
                    .map(|f| (a.column.clone(), f.clone()))
            })
            .collect()
    }

    /// Runs the full per-row fix sequence and validates the result.
    pub fn fix_rows(
        &self,
        rows: &[Row],
        date_formats: &BTreeMap<String, String>,
        required_fields: &[String],
    ) -> Vec<RowFix> {
        let analyzer = DateColumnAnalyzer::new(self.catalogue, self.locale);
        let fixer = FieldAutoFixer::new(self.locale, self.catalogue);

        let row_fixes: Vec<RowFix> = rows
            .iter()
            .map(|row| self.fix_row(row, &analyzer, &fixer, date_formats, required_fields))
            .collect();

        let total_fixes: usize = row_fixes.iter().map(|r| r.fixes.len()).sum();
        let error_rows = row_fixes.iter().filter(|r| r.has_errors()).count();
        info!(
            rows = row_fixes.len(),
            fixes = total_fixes,
            error_rows,
            entity = self.schema.entity.as_str(),
            "fix pipeline complete"
        );
        row_fixes
    }

    fn fix_row(
        &self,
        row: &Row,
        analyzer: &DateColumnAnalyzer<'_>,
        fixer: &FieldAutoFixer<'_>,
        date_formats: &BTreeMap<String, String>,
        required_fields: &[String],
    ) -> RowFix {
        let mut fixed = self.normalizer.normalize(row);
        let mut fixes: Vec<FieldFix> = Vec::new();
        let mut date_failures: Vec<String> = Vec::new();

        // Operator-enabled date columns: strict reparse under the chosen
        // format. A failure leaves the value untouched and is reported as a
        // validation error, never coerced.
        for (column, token) in date_formats {
            let Some(value) = fixed.get(column) else { continue };
            if !value.is_present() {
                continue;
            }
            let raw = value.to_display();
            match analyzer.reformat(&raw, token) {
                Some(iso) if iso != raw => {
                    fixes.push(FieldFix {
                        field: column.clone(),
                        original: value.clone(),
                        fixed: Value::Text(iso.clone()),
                        confidence: Confidence::High,
                        reason: format!("rewritten from {token} to ISO"),
                    });
                    fixed.set(column, Value::Text(iso));
                }
                Some(_) => {}
                None => {
                    date_failures
                        .push(format!("{column}: '{raw}' does not match {token}"));
                }
            }
        }

        // Per-field auto-fixes for every declared field that carries a
        // value. Columns already handled by the date stage are skipped so a
        // forced-format failure is not second-guessed by the loose fixer.
        let keys: Vec<String> = fixed.keys().map(str::to_string).collect();
        for key in keys {
            if date_formats.contains_key(&key) {
                continue;
            }
            let Some(field_type) = self.schema.field_type(&key) else {
                continue;
            };
            let Some(value) = fixed.get(&key) else { continue };
            if !value.is_present() {
                continue;
            }
            let fix = fixer.fix(&key, value, field_type);
            let changed = fix.fixed != fix.original;
            if changed {
                fixed.set(&key, fix.fixed.clone());
            }
            if changed || fix.confidence == Confidence::Low {
                fixes.push(fix);
            }
        }

        let validation = validate(&fixed, required_fields);
        let mut validation_errors = validation.missing_required;
        validation_errors.append(&mut date_failures);
        RowFix {
            row_number: row.number(),
            fixes,
            validation_errors,
            fixed_data: fixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use fleet_map::SynonymTable;
    use fleet_model::EntityType;

    use super::*;

    struct Fixture {
        schema: EntitySchema,
        locale: Locale,
        catalogue: DateFormatCatalogue,
        normalizer: HeaderNormalizer,
    }

    impl Fixture {
        fn contract() -> Self {
            Self {
                schema: EntitySchema::default_for(EntityType::Contract),
                locale: Locale::qatar(),
                catalogue: DateFormatCatalogue::default(),
                normalizer: HeaderNormalizer::new(SynonymTable::default_for(
                    EntityType::Contract,
                )),
            }
        }

        fn pipeline(&self) -> FixPipeline<'_> {
            FixPipeline::new(&self.schema, &self.locale, &self.catalogue, &self.normalizer)
        }
    }

    fn contract_row(number: u32) -> Row {
        let mut row = Row::new(number);
        row.set("Customer Name", Value::Text(" Ali  Hassan ".to_string()));
        row.set("Customer Phone", Value::Text("974 5512 3456".to_string()));
        row.set("Start Date", Value::Text("15/02/2023".to_string()));
        row.set("End Date", Value::Text("14/02/2024".to_string()));
        row.set("Contract Amount", Value::Text("12,000 QR".to_string()));
        row
    }

    #[test]
    fn full_sequence_normalizes_rewrites_and_validates() {
        let fixture = Fixture::contract();
        let pipeline = fixture.pipeline();

        let rows = vec![contract_row(2)];
        let analyses = pipeline.analyze_dates(&rows);
        let formats = FixPipeline::approved_formats(&analyses);
        assert!(formats.contains_key("start_date"));
        assert!(formats.contains_key("end_date"));

        let required = fixture.schema.required_fields.clone();
        let fixes = pipeline.fix_rows(&rows, &formats, &required);
        assert_eq!(fixes.len(), 1);
        let fix = &fixes[0];

        assert!(!fix.has_errors());
        assert_eq!(fix.row_number, 2);
        assert_eq!(
            fix.fixed_data.get("start_date"),
            Some(&Value::Text("2023-02-15".to_string()))
        );
        assert_eq!(
            fix.fixed_data.get("customer_phone"),
            Some(&Value::Text("+97455123456".to_string()))
        );
        assert_eq!(
            fix.fixed_data.get("contract_amount"),
            Some(&Value::Number(12000.0))
        );
        assert_eq!(
            fix.fixed_data.get("customer_name"),
            Some(&Value::Text("Ali Hassan".to_string()))
        );
    }

    #[test]
    fn missing_required_field_isolates_the_row() {
        let fixture = Fixture::contract();
        let pipeline = fixture.pipeline();

        let mut bad = contract_row(3);
        bad.set("Customer Phone", Value::Missing);

        let required = vec!["customer_phone".to_string()];
        let fixes = pipeline.fix_rows(
            &[contract_row(2), bad],
            &BTreeMap::new(),
            &required,
        );

        assert!(!fixes[0].has_errors());
        assert!(fixes[1].has_errors());
        assert_eq!(fixes[1].validation_errors, vec!["customer_phone"]);
        // Row numbers survive untouched.
        assert_eq!(fixes[1].row_number, 3);
    }

    #[test]
    fn forced_format_failure_surfaces_as_validation_error() {
        let fixture = Fixture::contract();
        let pipeline = fixture.pipeline();

        let mut row = contract_row(2);
        row.set("Start Date", Value::Text("20/13/2023".to_string()));

        let mut formats = BTreeMap::new();
        formats.insert("start_date".to_string(), "DD/MM/YYYY".to_string());

        let fixes = pipeline.fix_rows(&[row], &formats, &["start_date".to_string()]);
        let fix = &fixes[0];
        // Untouched, not coerced, and reported instead of crashed.
        assert_eq!(
            fix.fixed_data.get("start_date"),
            Some(&Value::Text("20/13/2023".to_string()))
        );
        assert!(fix.has_errors());
        assert_eq!(
            fix.validation_errors,
            vec!["start_date: '20/13/2023' does not match DD/MM/YYYY"]
        );
    }

    #[test]
    fn unknown_columns_flow_through_unchanged() {
        let fixture = Fixture::contract();
        let pipeline = fixture.pipeline();

        let mut row = contract_row(2);
        row.set("Internal Ref", Value::Text("x-9".to_string()));

        let fixes = pipeline.fix_rows(&[row], &BTreeMap::new(), &[]);
        assert_eq!(
            fixes[0].fixed_data.get("Internal Ref"),
            Some(&Value::Text("x-9".to_string()))
        );
    }
}
