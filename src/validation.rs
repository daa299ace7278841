//! Form input helpers shared by every catalog form.
//!
//! Forms go through the same steps: trim, then validate. Values are stored as
//! typed; markup is escaped when pages are rendered. Validators are declared
//! with `validator` derives on the form structs; this module holds
//! the trim helper, the custom rules and the conversion of `ValidationErrors`
//! into the ordered list rendered next to the form.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

/// One failed rule, as displayed above the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    #[serde(rename = "msg")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flatten validator output into `(field, message)` pairs.
///
/// Fields are emitted in `order`; errors on the same field keep the order in
/// which their rules were declared.
pub fn collect_errors(errors: &ValidationErrors, order: &[&str]) -> Vec<FieldError> {
    let mut collected: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldError::new(field.clone(), message)
            })
        })
        .collect();

    collected.sort_by_key(|e| {
        order
            .iter()
            .position(|f| *f == e.field)
            .unwrap_or(usize::MAX)
    });
    collected
}

/// Deserialize a form field, treating an empty value as absent.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

/// Trim in place, keeping the allocation when nothing changes
pub fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Parse an ISO-8601 calendar date, with or without a time part.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub(crate) fn check_alphanumeric(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(error("alphanumeric", message))
    }
}

/// Upper bound on stored text, counted in characters
pub(crate) fn check_max_length(
    value: &str,
    max: usize,
    message: &'static str,
) -> Result<(), ValidationError> {
    if value.chars().count() <= max {
        Ok(())
    } else {
        Err(error("max_length", message))
    }
}

pub(crate) fn check_iso_date(value: &str, message: &'static str) -> Result<(), ValidationError> {
    match parse_iso_date(value) {
        Some(_) => Ok(()),
        None => Err(error("iso8601", message)),
    }
}

/// An empty reference is reported by the presence rule, not here.
pub(crate) fn check_reference(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() || Uuid::parse_str(value).is_ok() {
        Ok(())
    } else {
        Err(error("reference", message))
    }
}

/// Parse a reference that already passed `check_reference`.
pub fn parse_reference(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_trim() {
        let mut value = "  Jane \t".to_string();
        trim(&mut value);
        assert_eq!(value, "Jane");
    }

    #[test]
    fn test_parse_iso_date() {
        let expected = NaiveDate::from_ymd_opt(1775, 12, 16);
        assert_eq!(parse_iso_date("1775-12-16"), expected);
        assert_eq!(parse_iso_date("1775-12-16T08:30:00Z"), expected);
        assert_eq!(parse_iso_date("1775-12-16T08:30"), expected);
        assert_eq!(parse_iso_date("16/12/1775"), None);
        assert_eq!(parse_iso_date("1775-13-01"), None);
        assert_eq!(parse_iso_date(" "), None);
    }

    #[test]
    fn test_empty_as_none() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(default, deserialize_with = "empty_as_none")]
            due_back: Option<String>,
        }

        let probe: Probe = serde_json::from_str(r#"{"due_back": ""}"#).unwrap();
        assert_eq!(probe.due_back, None);

        let probe: Probe = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(probe.due_back, None);

        let probe: Probe = serde_json::from_str(r#"{"due_back": "2024-05-01"}"#).unwrap();
        assert_eq!(probe.due_back.as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn test_check_reference() {
        assert!(check_reference("", "Invalid").is_ok());
        assert!(check_reference("67e55044-10b1-426f-9247-bb680e5fe0c8", "Invalid").is_ok());
        let err = check_reference("not-an-id", "Invalid book").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Invalid book"));
    }

    fn name_is_alphanumeric(value: &str) -> Result<(), ValidationError> {
        check_alphanumeric(value, "Name has non-alphanumeric characters")
    }

    #[derive(Validate)]
    struct Probe {
        #[validate(custom(function = "name_is_alphanumeric"))]
        name: String,
        #[validate(length(min = 3, message = "Code too short"))]
        code: String,
    }

    #[test]
    fn test_collect_errors_follows_field_order() {
        let probe = Probe {
            name: "".to_string(),
            code: "a".to_string(),
        };
        let errors = probe.validate().unwrap_err();

        let collected = collect_errors(&errors, &["name", "code"]);
        assert_eq!(
            collected,
            vec![
                FieldError::new("name", "Name has non-alphanumeric characters"),
                FieldError::new("code", "Code too short"),
            ]
        );

        let collected = collect_errors(&errors, &["code", "name"]);
        assert_eq!(collected[0].field, "code");
    }
}
