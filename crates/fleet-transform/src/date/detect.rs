//! Per-column date detection.
//!
//! Each sampled value is tried against the catalogue in order; the first
//! structurally valid match wins (day <= 31, month <= 12, plausible year).
//! A value whose day and month are both <= 12 is genuinely ambiguous, and
//! its confidence depends on how many other values in the same column pin
//! the ordering down.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use fleet_model::{DateOrdering, Locale, Row, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::catalogue::{DateFormatCatalogue, DateFormatOption};

/// Fraction of sampled values that must be dates before a column is
/// auto-flagged for review.
pub const DATE_COLUMN_THRESHOLD: f64 = 0.6;

/// Detection samples at most this many present values per column.
pub const SAMPLE_LIMIT: usize = 100;

const YEAR_MIN: i32 = 1900;
const YEAR_MAX: i32 = 2100;

/// Base confidence for an ambiguous day/month value.
const AMBIGUOUS_BASE: u8 = 50;
/// Confidence gained per corroborating sample, capped so ambiguity never
/// reaches a definite 100.
const CORROBORATION_STEP: u8 = 5;
const CORROBORATION_CAP: u8 = 45;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateDetectionResult {
    pub original: String,
    pub is_date: bool,
    /// 0-100; 100 only for structurally unambiguous matches.
    pub confidence: u8,
    pub matched_format: Option<String>,
}

/// Operator-reviewed analysis of one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDateAnalysis {
    pub column: String,
    pub is_date_column: bool,
    pub results: Vec<DateDetectionResult>,
    pub suggested_format: Option<String>,
    /// Format the operator picked; defaults to the suggestion.
    pub selected_format: Option<String>,
    /// Only enabled columns are rewritten. Auto-enabled when the column
    /// crosses the detection threshold.
    pub enabled: bool,
}

/// How a single value relates to the catalogue, before column context is
/// applied.
#[derive(Debug, Clone)]
enum ValueShape {
    NotDate,
    /// Only one catalogue format validates the value.
    Definite { token: String },
    /// Both orderings validate: day and month are each <= 12.
    Ambiguous {
        day_first_token: String,
        month_first_token: String,
    },
}

pub struct DateColumnAnalyzer<'a> {
    catalogue: &'a DateFormatCatalogue,
    locale: &'a Locale,
}

impl<'a> DateColumnAnalyzer<'a> {
    pub fn new(catalogue: &'a DateFormatCatalogue, locale: &'a Locale) -> Self {
        Self { catalogue, locale }
    }

    fn parse_strict(&self, raw: &str, option: &DateFormatOption) -> Option<NaiveDate> {
        let date = NaiveDate::parse_from_str(raw.trim(), &option.chrono_format).ok()?;
        ((YEAR_MIN..=YEAR_MAX).contains(&date.year())).then_some(date)
    }

    /// Reparses `raw` strictly under the catalogue format named by `token`
    /// and renders it as canonical ISO. `None` when the value does not parse
    /// under that format.
    pub fn reformat(&self, raw: &str, token: &str) -> Option<String> {
        let option = self.catalogue.get(token)?;
        self.parse_strict(raw, option)
            .map(|d| d.format("%Y-%m-%d").to_string())
    }

    fn classify(&self, raw: &str) -> ValueShape {
        let mut first_match: Option<&DateFormatOption> = None;
        let mut matches: Vec<&DateFormatOption> = Vec::new();
        for option in self.catalogue.iter() {
            if self.parse_strict(raw, option).is_some() {
                if first_match.is_none() {
                    first_match = Some(option);
                }
                matches.push(option);
            }
        }
        let Some(first) = first_match else {
            return ValueShape::NotDate;
        };

        // Ambiguity only arises between a day-first and a month-first format
        // that both validate; ISO, textual, and compact formats are
        // structurally unambiguous.
        let day_first = matches
            .iter()
            .find(|o| o.ordering() == Some(DateOrdering::DayFirst));
        let month_first = matches
            .iter()
            .find(|o| o.ordering() == Some(DateOrdering::MonthFirst));
        match (day_first, month_first) {
            (Some(d), Some(m)) if first.ordering().is_some() => ValueShape::Ambiguous {
                day_first_token: d.token.clone(),
                month_first_token: m.token.clone(),
            },
            _ => ValueShape::Definite {
                token: first.token.clone(),
            },
        }
    }

    /// Classifies a single value without column context. Ambiguous values
    /// fall back to the locale's conventional ordering at base confidence.
    pub fn detect_value(&self, raw: &str) -> DateDetectionResult {
        match self.classify(raw) {
            ValueShape::NotDate => DateDetectionResult {
                original: raw.to_string(),
                is_date: false,
                confidence: 0,
                matched_format: None,
            },
            ValueShape::Definite { token } => DateDetectionResult {
                original: raw.to_string(),
                is_date: true,
                confidence: 100,
                matched_format: Some(token),
            },
            ValueShape::Ambiguous {
                day_first_token,
                month_first_token,
            } => {
                let token = match self.locale.date_ordering {
                    DateOrdering::DayFirst => day_first_token,
                    DateOrdering::MonthFirst => month_first_token,
                };
                DateDetectionResult {
                    original: raw.to_string(),
                    is_date: true,
                    confidence: AMBIGUOUS_BASE,
                    matched_format: Some(token),
                }
            }
        }
    }

    /// Per-column detection results keyed by column name.
    pub fn detect_date_columns(&self, rows: &[Row]) -> BTreeMap<String, Vec<DateDetectionResult>> {
        self.analyze_columns(rows)
            .into_iter()
            .map(|a| (a.column, a.results))
            .collect()
    }

    /// Detects date-like values per column across all rows.
    ///
    /// Ambiguous values inherit the ordering established by the column's
    /// unambiguous values (majority wins; the locale breaks ties), and
    /// their confidence grows with each corroborating sample.
    pub fn analyze_columns(&self, rows: &[Row]) -> Vec<ColumnDateAnalysis> {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.to_string());
                }
            }
        }

        columns
            .iter()
            .filter_map(|column| self.analyze_column(column, rows))
            .collect()
    }

    fn analyze_column(&self, column: &str, rows: &[Row]) -> Option<ColumnDateAnalysis> {
        let samples: Vec<String> = rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|v| v.is_present())
            .take(SAMPLE_LIMIT)
            .map(Value::to_display)
            .collect();
        if samples.is_empty() {
            return None;
        }

        let shapes: Vec<ValueShape> = samples.iter().map(|s| self.classify(s)).collect();

        // Ordering evidence from unambiguous values only.
        let mut day_first_votes = 0usize;
        let mut month_first_votes = 0usize;
        for shape in &shapes {
            if let ValueShape::Definite { token } = shape {
                match self.catalogue.get(token).and_then(DateFormatOption::ordering) {
                    Some(DateOrdering::DayFirst) => day_first_votes += 1,
                    Some(DateOrdering::MonthFirst) => month_first_votes += 1,
                    None => {}
                }
            }
        }
        let column_ordering = if day_first_votes > month_first_votes {
            DateOrdering::DayFirst
        } else if month_first_votes > day_first_votes {
            DateOrdering::MonthFirst
        } else {
            self.locale.date_ordering
        };
        let corroboration = match column_ordering {
            DateOrdering::DayFirst => day_first_votes,
            DateOrdering::MonthFirst => month_first_votes,
        };

        let results: Vec<DateDetectionResult> = samples
            .iter()
            .zip(&shapes)
            .map(|(raw, shape)| match shape {
                ValueShape::NotDate => DateDetectionResult {
                    original: raw.clone(),
                    is_date: false,
                    confidence: 0,
                    matched_format: None,
                },
                ValueShape::Definite { token } => DateDetectionResult {
                    original: raw.clone(),
                    is_date: true,
                    confidence: 100,
                    matched_format: Some(token.clone()),
                },
                ValueShape::Ambiguous {
                    day_first_token,
                    month_first_token,
                } => {
                    let token = match column_ordering {
                        DateOrdering::DayFirst => day_first_token.clone(),
                        DateOrdering::MonthFirst => month_first_token.clone(),
                    };
                    let bonus = (CORROBORATION_STEP as usize * corroboration)
                        .min(CORROBORATION_CAP as usize) as u8;
                    DateDetectionResult {
                        original: raw.clone(),
                        is_date: true,
                        confidence: AMBIGUOUS_BASE + bonus,
                        matched_format: Some(token),
                    }
                }
            })
            .collect();

        let is_date_column = Self::is_date_column(&results);
        let suggested = self.suggest_best_format(&results).map(|o| o.token.clone());
        debug!(
            column,
            samples = results.len(),
            is_date_column,
            suggested = suggested.as_deref().unwrap_or("-"),
            "analyzed column for dates"
        );
        Some(ColumnDateAnalysis {
            column: column.to_string(),
            is_date_column,
            selected_format: suggested.clone(),
            suggested_format: suggested,
            enabled: is_date_column,
            results,
        })
    }

    /// True when the date fraction meets [`DATE_COLUMN_THRESHOLD`]. Below
    /// that the column merely "contains some date-like values" and is not
    /// auto-enabled.
    pub fn is_date_column(results: &[DateDetectionResult]) -> bool {
        if results.is_empty() {
            return false;
        }
        let dates = results.iter().filter(|r| r.is_date).count();
        dates as f64 / results.len() as f64 >= DATE_COLUMN_THRESHOLD
    }

    /// Picks the format that structurally validates the most sampled values.
    /// Ties prefer the locale's conventional ordering, then the higher mean
    /// confidence among values matched to that format.
    pub fn suggest_best_format(
        &self,
        results: &[DateDetectionResult],
    ) -> Option<&DateFormatOption> {
        let mut best: Option<(&DateFormatOption, usize, f64)> = None;
        let preferred = self.catalogue.preferred_for(self.locale).map(|o| &o.token);
        for option in self.catalogue.iter() {
            let validated = results
                .iter()
                .filter(|r| self.parse_strict(&r.original, option).is_some())
                .count();
            if validated == 0 {
                continue;
            }
            let matched: Vec<&DateDetectionResult> = results
                .iter()
                .filter(|r| r.matched_format.as_ref() == Some(&option.token))
                .collect();
            let mean_confidence = if matched.is_empty() {
                0.0
            } else {
                matched.iter().map(|r| r.confidence as f64).sum::<f64>() / matched.len() as f64
            };
            let replace = match best {
                None => true,
                Some((current, count, mean)) => {
                    validated > count
                        || (validated == count && {
                            let candidate_preferred = Some(&option.token) == preferred;
                            let current_preferred = Some(&current.token) == preferred;
                            candidate_preferred && !current_preferred
                                || (candidate_preferred == current_preferred
                                    && mean_confidence > mean)
                        })
                }
            };
            if replace {
                best = Some((option, validated, mean_confidence));
            }
        }
        best.map(|(option, _, _)| option)
    }

    /// Rewrites every column named in `column_formats` to canonical ISO
    /// dates under the chosen format. Values that fail to parse under the
    /// forced format are left untouched; they surface later as validation
    /// errors, never as a crash.
    pub fn fix_dates_in_data(
        &self,
        rows: &[Row],
        column_formats: &BTreeMap<String, String>,
    ) -> Vec<Row> {
        rows.iter()
            .map(|row| {
                let mut out = row.clone();
                for (column, token) in column_formats {
                    let Some(value) = row.get(column) else { continue };
                    if !value.is_present() {
                        continue;
                    }
                    let raw = value.to_display();
                    match self.reformat(&raw, token) {
                        Some(iso) => out.set(column, Value::Text(iso)),
                        None => {
                            debug!(
                                row = row.number(),
                                column,
                                format = %token,
                                "value did not parse under forced format; left untouched"
                            );
                        }
                    }
                }
                out
            })
            .collect()
    }
}
