//! Locale profiles: configuration data the fixer and date analyzer consult.
//!
//! Profiles are serde-loadable so deployments can ship their own; the Qatar
//! profile is the compiled-in default for Gulf-region installations.

use serde::{Deserialize, Serialize};

/// Which side of an ambiguous `a/b/yyyy` date carries the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrdering {
    DayFirst,
    MonthFirst,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locale {
    pub name: String,
    /// International calling code without the leading `+`.
    pub calling_code: String,
    /// Accepted national significant number lengths after normalization.
    pub national_number_lengths: Vec<usize>,
    /// Conventional ordering for ambiguous numeric dates.
    pub date_ordering: DateOrdering,
    /// Localized truthy tokens, lowercase.
    pub truthy_tokens: Vec<String>,
    /// Localized falsy tokens, lowercase.
    pub falsy_tokens: Vec<String>,
}

impl Locale {
    pub fn qatar() -> Self {
        Self {
            name: "qatar".to_string(),
            calling_code: "974".to_string(),
            national_number_lengths: vec![8],
            date_ordering: DateOrdering::DayFirst,
            truthy_tokens: ["yes", "y", "true", "1", "نعم", "صح"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            falsy_tokens: ["no", "n", "false", "0", "لا", "خطأ"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    pub fn truthiness(&self, token: &str) -> Option<bool> {
        let token = token.trim().to_lowercase();
        if self.truthy_tokens.iter().any(|t| *t == token) {
            return Some(true);
        }
        if self.falsy_tokens.iter().any(|t| *t == token) {
            return Some(false);
        }
        None
    }

    /// Whether the canonical tokens ("yes"/"no", "true"/"false", "1"/"0")
    /// matched, as opposed to a localized variant.
    pub fn is_canonical_boolean(token: &str) -> bool {
        matches!(
            token.trim().to_lowercase().as_str(),
            "yes" | "no" | "true" | "false" | "1" | "0"
        )
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::qatar()
    }
}
