//! Field-level checks shared by the CV payloads. Each helper records its
//! messages under the field name and returns what should be stored.

use chrono::NaiveDate;
use email_address::EmailAddress;
use reqwest::Url;

use super::dates::{parse_cv_date, INVALID_DATE};
use crate::shared::validation::{max_length_message, ValidationErrors, BLANK, REQUIRED};

pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const INVALID_URL: &str = "Enter a valid URL.";

fn too_long(value: &str, max_chars: Option<usize>) -> Option<usize> {
    max_chars.filter(|max| value.chars().count() > *max)
}

pub fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    max_chars: Option<usize>,
) -> String {
    let Some(value) = value else {
        errors.add(field, REQUIRED);
        return String::new();
    };
    let value = value.trim().to_string();
    if value.is_empty() {
        errors.add(field, BLANK);
    } else if let Some(max) = too_long(&value, max_chars) {
        errors.add(field, max_length_message(max));
    }
    value
}

/// Blank input is stored as NULL.
pub fn optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    max_chars: Option<usize>,
) -> Option<String> {
    let value = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())?;
    if let Some(max) = too_long(&value, max_chars) {
        errors.add(field, max_length_message(max));
    }
    Some(value)
}

pub fn required_email(errors: &mut ValidationErrors, field: &str, value: Option<String>) -> String {
    let value = required_text(errors, field, value, Some(254));
    if !value.is_empty() && !EmailAddress::is_valid(&value) {
        errors.add(field, INVALID_EMAIL);
    }
    value
}

/// Absolute `http` or `https` URL with a host.
pub fn optional_url(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    max_chars: usize,
) -> Option<String> {
    let value = optional_text(errors, field, value, Some(max_chars))?;
    let valid = Url::parse(&value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false);
    if !valid {
        errors.add(field, INVALID_URL);
    }
    Some(value)
}

pub fn required_date(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
) -> Option<NaiveDate> {
    match value.as_deref().map(str::trim) {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some("") => {
            errors.add(field, BLANK);
            None
        }
        Some(_) => optional_date(errors, field, value),
    }
}

pub fn optional_date(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
) -> Option<NaiveDate> {
    let raw = value.filter(|v| !v.trim().is_empty())?;
    let parsed = parse_cv_date(&raw);
    if parsed.is_none() {
        errors.add(field, INVALID_DATE);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_flags_blank() {
        let mut errors = ValidationErrors::new();
        assert_eq!(required_text(&mut errors, "name", Some("  Rust ".into()), Some(10)), "Rust");
        required_text(&mut errors, "title", Some("   ".into()), None);
        required_text(&mut errors, "company", None, None);

        assert_eq!(errors.messages("title"), [BLANK]);
        assert_eq!(errors.messages("company"), [REQUIRED]);
        assert!(!errors.contains("name"));
    }

    #[test]
    fn length_is_counted_in_characters() {
        let mut errors = ValidationErrors::new();
        required_text(&mut errors, "name", Some("é".repeat(100)), Some(100));
        assert!(errors.is_empty());
        required_text(&mut errors, "name", Some("é".repeat(101)), Some(100));
        assert!(errors.contains("name"));
    }

    #[test]
    fn urls_must_be_http() {
        let mut errors = ValidationErrors::new();
        optional_url(&mut errors, "website_url", Some("https://ada.dev".into()), 200);
        optional_url(&mut errors, "github_url", Some("ftp://ada.dev".into()), 200);
        optional_url(&mut errors, "linkedin_url", Some("not a url".into()), 200);
        assert_eq!(optional_url(&mut errors, "blank", Some(" ".into()), 200), None);

        assert!(!errors.contains("website_url"));
        assert_eq!(errors.messages("github_url"), [INVALID_URL]);
        assert_eq!(errors.messages("linkedin_url"), [INVALID_URL]);
        assert!(!errors.contains("blank"));
    }

    #[test]
    fn email_must_be_valid() {
        let mut errors = ValidationErrors::new();
        required_email(&mut errors, "email", Some("ada@example.com".into()));
        required_email(&mut errors, "other", Some("ada.example.com".into()));
        assert!(!errors.contains("email"));
        assert_eq!(errors.messages("other"), [INVALID_EMAIL]);
    }

    #[test]
    fn dates_report_format_errors() {
        let mut errors = ValidationErrors::new();
        assert!(required_date(&mut errors, "start_date", Some("2020-02".into())).is_some());
        assert!(required_date(&mut errors, "end_date", Some("02/2020".into())).is_none());
        assert!(optional_date(&mut errors, "blank", Some("".into())).is_none());

        assert_eq!(errors.messages("end_date"), [INVALID_DATE]);
        assert!(!errors.contains("blank"));
    }
}
