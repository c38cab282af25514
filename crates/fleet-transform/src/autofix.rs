//! Per-field auto-fixing.
//!
//! Every branch is total: an unrecoverable value comes back unchanged with
//! low confidence and a reason, deferring rejection to the validator. No
//! branch ever fails, and confidence never changes control flow.

use fleet_model::{Confidence, FieldFix, FieldType, Locale, Value};
use fleet_validate::is_placeholder;
use tracing::debug;

use crate::date::{DateColumnAnalyzer, DateFormatCatalogue};

pub struct FieldAutoFixer<'a> {
    locale: &'a Locale,
    catalogue: &'a DateFormatCatalogue,
}

impl<'a> FieldAutoFixer<'a> {
    pub fn new(locale: &'a Locale, catalogue: &'a DateFormatCatalogue) -> Self {
        Self { locale, catalogue }
    }

    /// Attempts to coerce `value` into the declared field type.
    pub fn fix(&self, field: &str, value: &Value, field_type: FieldType) -> FieldFix {
        // Placeholder tokens mean "no value"; the validator decides whether
        // that matters, the fixer only flags them.
        if let Value::Text(s) = value
            && is_placeholder(s)
        {
            debug!(field, value = %s, "placeholder token left for validation");
            return FieldFix {
                field: field.to_string(),
                original: value.clone(),
                fixed: value.clone(),
                confidence: Confidence::Low,
                reason: "placeholder token, treated as missing".to_string(),
            };
        }
        let (fixed, confidence, reason) = match field_type {
            FieldType::Number => self.fix_number(value),
            FieldType::Phone => self.fix_phone(value),
            FieldType::Email => self.fix_email(value),
            FieldType::Boolean => self.fix_boolean(value),
            FieldType::Text => fix_text(value),
            FieldType::Date => self.fix_date(value),
        };
        FieldFix {
            field: field.to_string(),
            original: value.clone(),
            fixed,
            confidence,
            reason,
        }
    }

    fn fix_number(&self, value: &Value) -> (Value, Confidence, String) {
        let raw = match value {
            Value::Number(_) => {
                return (
                    value.clone(),
                    Confidence::High,
                    "already numeric".to_string(),
                );
            }
            Value::Text(s) => s,
            Value::Bool(_) | Value::Missing => {
                return (
                    value.clone(),
                    Confidence::Low,
                    "value is not numeric and could not be coerced".to_string(),
                );
            }
        };

        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<f64>() {
            return (
                Value::Number(n),
                Confidence::High,
                "numeric text".to_string(),
            );
        }

        let stripped = strip_currency(trimmed);
        if let Ok(n) = stripped.parse::<f64>() {
            return (
                Value::Number(n),
                Confidence::Medium,
                "stripped currency symbols and thousands separators".to_string(),
            );
        }

        // Forced best effort: keep only numeric characters.
        let digits: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        if let Ok(n) = digits.parse::<f64>() {
            return (
                Value::Number(n),
                Confidence::Low,
                "discarded non-numeric characters".to_string(),
            );
        }

        (
            value.clone(),
            Confidence::Low,
            "could not be coerced to a number".to_string(),
        )
    }

    fn fix_phone(&self, value: &Value) -> (Value, Confidence, String) {
        let raw = match value {
            Value::Text(s) => s.trim().to_string(),
            Value::Number(n) => fleet_model::format_numeric(*n),
            Value::Bool(_) | Value::Missing => {
                return (
                    value.clone(),
                    Confidence::Low,
                    "value is not a phone number".to_string(),
                );
            }
        };

        let cc = &self.locale.calling_code;
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return (
                value.clone(),
                Confidence::Low,
                "no digits to normalize".to_string(),
            );
        }

        // 00-international and bare-national forms both normalize to +cc.
        let (national, cc_added) = if let Some(rest) = digits.strip_prefix("00") {
            match rest.strip_prefix(cc.as_str()) {
                Some(national) => (national.to_string(), true),
                None => (rest.to_string(), true),
            }
        } else if digits.len() > cc.len() && digits.starts_with(cc.as_str()) {
            (digits[cc.len()..].to_string(), false)
        } else {
            (digits.clone(), true)
        };

        let fixed = format!("+{cc}{national}");
        let length_ok = self
            .locale
            .national_number_lengths
            .contains(&national.len());

        if !length_ok {
            return (
                Value::Text(fixed),
                Confidence::Low,
                format!(
                    "national number has {} digits after normalization, expected {:?}",
                    national.len(),
                    self.locale.national_number_lengths
                ),
            );
        }
        if raw == format!("+{cc}{national}") {
            return (
                Value::Text(fixed),
                Confidence::High,
                "already in international form".to_string(),
            );
        }
        if !cc_added {
            // All digits were present; only spacing/punctuation changed.
            return (
                Value::Text(fixed),
                Confidence::High,
                format!("removed spacing/punctuation around +{cc} country code"),
            );
        }
        (
            Value::Text(fixed),
            Confidence::Medium,
            format!("applied +{cc} country code and removed spacing"),
        )
    }

    fn fix_email(&self, value: &Value) -> (Value, Confidence, String) {
        let raw = match value {
            Value::Text(s) => s,
            _ => {
                return (
                    value.clone(),
                    Confidence::Low,
                    "value is not an email address".to_string(),
                );
            }
        };
        let cleaned = raw.trim().to_lowercase();
        if is_structural_email(&cleaned) {
            if cleaned == *raw {
                (
                    value.clone(),
                    Confidence::High,
                    "already a valid address".to_string(),
                )
            } else {
                (
                    Value::Text(cleaned),
                    Confidence::Medium,
                    "trimmed and lowercased".to_string(),
                )
            }
        } else {
            (
                value.clone(),
                Confidence::Low,
                "still not a structurally valid address after cleanup".to_string(),
            )
        }
    }

    fn fix_boolean(&self, value: &Value) -> (Value, Confidence, String) {
        match value {
            Value::Bool(_) => (
                value.clone(),
                Confidence::High,
                "already boolean".to_string(),
            ),
            Value::Number(n) if *n == 0.0 || *n == 1.0 => (
                Value::Bool(*n == 1.0),
                Confidence::High,
                "numeric 1/0".to_string(),
            ),
            Value::Text(s) => match self.locale.truthiness(s) {
                Some(b) if Locale::is_canonical_boolean(s) => (
                    Value::Bool(b),
                    Confidence::High,
                    "canonical boolean token".to_string(),
                ),
                Some(b) => (
                    Value::Bool(b),
                    Confidence::Medium,
                    "recognized localized boolean token".to_string(),
                ),
                None => (
                    Value::Bool(false),
                    Confidence::Low,
                    "unrecognized token; defaulted to false".to_string(),
                ),
            },
            _ => (
                Value::Bool(false),
                Confidence::Low,
                "unrecognized token; defaulted to false".to_string(),
            ),
        }
    }

    fn fix_date(&self, value: &Value) -> (Value, Confidence, String) {
        let raw = value.to_display();
        let analyzer = DateColumnAnalyzer::new(self.catalogue, self.locale);
        let detection = analyzer.detect_value(&raw);
        let Some(token) = detection.matched_format else {
            return (
                value.clone(),
                Confidence::Low,
                "not recognized as a date".to_string(),
            );
        };
        let Some(iso) = analyzer.reformat(&raw, &token) else {
            return (
                value.clone(),
                Confidence::Low,
                "not recognized as a date".to_string(),
            );
        };
        if iso == raw.trim() {
            (
                Value::Text(iso),
                Confidence::High,
                "already canonical ISO".to_string(),
            )
        } else if detection.confidence == 100 {
            (
                Value::Text(iso),
                Confidence::High,
                format!("rewritten from {token} to ISO"),
            )
        } else {
            (
                Value::Text(iso),
                Confidence::Medium,
                format!("ambiguous day/month; interpreted as {token} per locale convention"),
            )
        }
    }
}

fn fix_text(value: &Value) -> (Value, Confidence, String) {
    match value {
        Value::Text(s) => {
            let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
            if collapsed == *s {
                (
                    value.clone(),
                    Confidence::High,
                    "no change needed".to_string(),
                )
            } else {
                (
                    Value::Text(collapsed),
                    Confidence::High,
                    "trimmed and collapsed whitespace".to_string(),
                )
            }
        }
        _ => (
            value.clone(),
            Confidence::High,
            "no change needed".to_string(),
        ),
    }
}

fn strip_currency(raw: &str) -> String {
    let mut out = raw.trim().to_lowercase();
    for token in [
        "qar", "qr", "sar", "aed", "usd", "eur", "ر.ق", "ريال", "درهم", "$", "€", "£",
    ] {
        out = out.replace(token, "");
    }
    out.replace(',', "").split_whitespace().collect()
}

/// Minimal `local@domain.tld` shape check.
fn is_structural_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty() && !domain.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixer_parts() -> (Locale, DateFormatCatalogue) {
        (Locale::qatar(), DateFormatCatalogue::default())
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn number_tiers() {
        let (locale, catalogue) = fixer_parts();
        let fixer = FieldAutoFixer::new(&locale, &catalogue);

        let fix = fixer.fix("amount", &Value::Number(12.0), FieldType::Number);
        assert_eq!(fix.confidence, Confidence::High);

        let fix = fixer.fix("amount", &text("1,250.50 QR"), FieldType::Number);
        assert_eq!(fix.fixed, Value::Number(1250.5));
        assert_eq!(fix.confidence, Confidence::Medium);

        let fix = fixer.fix("amount", &text("about 120 only"), FieldType::Number);
        assert_eq!(fix.fixed, Value::Number(120.0));
        assert_eq!(fix.confidence, Confidence::Low);

        let fix = fixer.fix("amount", &text("no digits"), FieldType::Number);
        assert_eq!(fix.fixed, text("no digits"));
        assert_eq!(fix.confidence, Confidence::Low);
    }

    #[test]
    fn qatar_phone_with_country_code_and_spacing_is_high() {
        let (locale, catalogue) = fixer_parts();
        let fixer = FieldAutoFixer::new(&locale, &catalogue);

        let fix = fixer.fix("phone", &text("974 5512 3456"), FieldType::Phone);
        assert_eq!(fix.fixed, text("+97455123456"));
        assert_eq!(fix.confidence, Confidence::High);
        assert!(fix.reason.contains("+974"));
    }

    #[test]
    fn bare_national_phone_gets_country_code_at_medium() {
        let (locale, catalogue) = fixer_parts();
        let fixer = FieldAutoFixer::new(&locale, &catalogue);

        let fix = fixer.fix("phone", &text("5512-3456"), FieldType::Phone);
        assert_eq!(fix.fixed, text("+97455123456"));
        assert_eq!(fix.confidence, Confidence::Medium);

        let fix = fixer.fix("phone", &text("0097455123456"), FieldType::Phone);
        assert_eq!(fix.fixed, text("+97455123456"));
        assert_eq!(fix.confidence, Confidence::Medium);
    }

    #[test]
    fn digitless_phone_is_left_unchanged() {
        let (locale, catalogue) = fixer_parts();
        let fixer = FieldAutoFixer::new(&locale, &catalogue);
        let fix = fixer.fix("phone", &text("abc"), FieldType::Phone);
        assert_eq!(fix.fixed, text("abc"));
        assert_eq!(fix.confidence, Confidence::Low);
        assert!(fix.reason.contains("no digits"));
    }

    #[test]
    fn placeholder_tokens_are_flagged_not_coerced() {
        let (locale, catalogue) = fixer_parts();
        let fixer = FieldAutoFixer::new(&locale, &catalogue);
        for (raw, field_type) in [
            ("N/A", FieldType::Phone),
            ("-", FieldType::Number),
            ("غير محدد", FieldType::Date),
        ] {
            let fix = fixer.fix("f", &text(raw), field_type);
            assert_eq!(fix.fixed, text(raw), "{raw} must stay unchanged");
            assert_eq!(fix.confidence, Confidence::Low);
            assert!(fix.reason.contains("placeholder"));
        }
    }

    #[test]
    fn wrong_length_phone_is_low() {
        let (locale, catalogue) = fixer_parts();
        let fixer = FieldAutoFixer::new(&locale, &catalogue);
        let fix = fixer.fix("phone", &text("12345"), FieldType::Phone);
        assert_eq!(fix.confidence, Confidence::Low);
        assert!(fix.reason.contains("expected"));
    }

    #[test]
    fn email_tiers() {
        let (locale, catalogue) = fixer_parts();
        let fixer = FieldAutoFixer::new(&locale, &catalogue);

        let fix = fixer.fix("email", &text("ali@example.com"), FieldType::Email);
        assert_eq!(fix.confidence, Confidence::High);
        assert_eq!(fix.fixed, text("ali@example.com"));

        let fix = fixer.fix("email", &text("  Ali@Example.COM "), FieldType::Email);
        assert_eq!(fix.fixed, text("ali@example.com"));
        assert_eq!(fix.confidence, Confidence::Medium);

        let fix = fixer.fix("email", &text("not-an-email"), FieldType::Email);
        assert_eq!(fix.fixed, text("not-an-email"));
        assert_eq!(fix.confidence, Confidence::Low);
    }

    #[test]
    fn boolean_tokens() {
        let (locale, catalogue) = fixer_parts();
        let fixer = FieldAutoFixer::new(&locale, &catalogue);

        let fix = fixer.fix("is_active", &text("Yes"), FieldType::Boolean);
        assert_eq!(fix.fixed, Value::Bool(true));
        assert_eq!(fix.confidence, Confidence::High);

        let fix = fixer.fix("is_active", &text("نعم"), FieldType::Boolean);
        assert_eq!(fix.fixed, Value::Bool(true));
        assert_eq!(fix.confidence, Confidence::Medium);

        let fix = fixer.fix("is_active", &text("maybe"), FieldType::Boolean);
        assert_eq!(fix.fixed, Value::Bool(false));
        assert_eq!(fix.confidence, Confidence::Low);
        assert!(fix.reason.contains("defaulted"));
    }

    #[test]
    fn text_collapse_is_always_high() {
        let (locale, catalogue) = fixer_parts();
        let fixer = FieldAutoFixer::new(&locale, &catalogue);
        let fix = fixer.fix("notes", &text("  two   words "), FieldType::Text);
        assert_eq!(fix.fixed, text("two words"));
        assert_eq!(fix.confidence, Confidence::High);
    }

    #[test]
    fn date_field_rewritten_to_iso() {
        let (locale, catalogue) = fixer_parts();
        let fixer = FieldAutoFixer::new(&locale, &catalogue);

        let fix = fixer.fix("start_date", &text("15/02/2023"), FieldType::Date);
        assert_eq!(fix.fixed, text("2023-02-15"));
        assert_eq!(fix.confidence, Confidence::High);

        let fix = fixer.fix("start_date", &text("01/02/2023"), FieldType::Date);
        assert_eq!(fix.fixed, text("2023-02-01"));
        assert_eq!(fix.confidence, Confidence::Medium);

        let fix = fixer.fix("start_date", &text("garbage"), FieldType::Date);
        assert_eq!(fix.fixed, text("garbage"));
        assert_eq!(fix.confidence, Confidence::Low);
    }

    #[test]
    fn no_branch_ever_drops_the_value() {
        let (locale, catalogue) = fixer_parts();
        let fixer = FieldAutoFixer::new(&locale, &catalogue);
        for field_type in [
            FieldType::Number,
            FieldType::Phone,
            FieldType::Email,
            FieldType::Text,
            FieldType::Date,
        ] {
            let fix = fixer.fix("f", &text("???"), field_type);
            assert!(
                fix.fixed.is_present(),
                "{field_type:?} must return a value"
            );
            assert!(!fix.reason.is_empty());
        }
    }
}
