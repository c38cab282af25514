//! The enumerable catalogue of date formats an operator can pick from.
//!
//! Order matters: detection tries formats in catalogue order and the first
//! structurally valid match wins. The exact priority table is deployment
//! configuration; this default follows the Gulf-region convention of
//! day-first before month-first.

use fleet_model::{DateOrdering, Locale};
use serde::{Deserialize, Serialize};

/// One selectable date format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFormatOption {
    /// Stable token shown in configuration and fix records, e.g. `DD/MM/YYYY`.
    pub token: String,
    /// chrono strftime pattern used for strict parsing.
    pub chrono_format: String,
    /// Human label for the operator review step.
    pub label: String,
    pub example: String,
}

impl DateFormatOption {
    fn new(token: &str, chrono_format: &str, label: &str, example: &str) -> Self {
        Self {
            token: token.to_string(),
            chrono_format: chrono_format.to_string(),
            label: label.to_string(),
            example: example.to_string(),
        }
    }

    /// Whether this format starts with the day component of an ambiguous
    /// numeric date.
    pub fn ordering(&self) -> Option<DateOrdering> {
        if self.chrono_format.starts_with("%d") && !self.chrono_format.contains("%b") {
            Some(DateOrdering::DayFirst)
        } else if self.chrono_format.starts_with("%m") {
            Some(DateOrdering::MonthFirst)
        } else {
            None
        }
    }
}

/// Ordered format catalogue. serde-loadable so deployments can reorder or
/// extend it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateFormatCatalogue {
    options: Vec<DateFormatOption>,
}

impl DateFormatCatalogue {
    pub fn new(options: Vec<DateFormatOption>) -> Self {
        Self { options }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DateFormatOption> {
        self.options.iter()
    }

    pub fn get(&self, token: &str) -> Option<&DateFormatOption> {
        self.options.iter().find(|o| o.token == token)
    }

    /// The first option matching the locale's conventional ordering, used for
    /// tie-breaking between equally plausible formats.
    pub fn preferred_for(&self, locale: &Locale) -> Option<&DateFormatOption> {
        self.options
            .iter()
            .find(|o| o.ordering() == Some(locale.date_ordering))
    }
}

impl Default for DateFormatCatalogue {
    fn default() -> Self {
        Self::new(vec![
            DateFormatOption::new("YYYY-MM-DD", "%Y-%m-%d", "ISO", "2023-02-15"),
            DateFormatOption::new("YYYY/MM/DD", "%Y/%m/%d", "ISO with slashes", "2023/02/15"),
            DateFormatOption::new("DD/MM/YYYY", "%d/%m/%Y", "Day first", "15/02/2023"),
            DateFormatOption::new("DD-MM-YYYY", "%d-%m-%Y", "Day first, dashes", "15-02-2023"),
            DateFormatOption::new("DD.MM.YYYY", "%d.%m.%Y", "Day first, dots", "15.02.2023"),
            DateFormatOption::new("MM/DD/YYYY", "%m/%d/%Y", "Month first", "02/15/2023"),
            DateFormatOption::new("MM-DD-YYYY", "%m-%d-%Y", "Month first, dashes", "02-15-2023"),
            DateFormatOption::new("DD MMM YYYY", "%d %b %Y", "Textual month", "15 Feb 2023"),
            DateFormatOption::new("DD-MMM-YYYY", "%d-%b-%Y", "Textual month, dashes", "15-Feb-2023"),
            DateFormatOption::new("MMM DD, YYYY", "%b %d, %Y", "Textual month, US", "Feb 15, 2023"),
            DateFormatOption::new("YYYYMMDD", "%Y%m%d", "Compact", "20230215"),
        ])
    }
}
