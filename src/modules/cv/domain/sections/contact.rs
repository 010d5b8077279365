use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::SectionKind;
use crate::cv::domain::fields::{optional_text, optional_url, required_email};
use crate::shared::validation::ValidationErrors;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Contact {
    pub id: Uuid,
    #[serde(rename = "cv")]
    pub cv_id: Uuid,
    #[schema(example = "+33 1 23 45 67 89")]
    pub phone: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub address_detail: Option<String>,
    pub website_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactPayload {
    pub cv: Option<Uuid>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub address_detail: Option<String>,
    pub website_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub phone: Option<String>,
    pub email: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub address_detail: Option<String>,
    pub website_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

pub struct ContactSection;

impl SectionKind for ContactSection {
    type Record = Contact;
    type Payload = ContactPayload;
    type Draft = ContactDraft;

    const LABEL: &'static str = "contact";

    fn record_id(record: &Contact) -> Uuid {
        record.id
    }

    fn record_cv(record: &Contact) -> Uuid {
        record.cv_id
    }

    fn payload_cv(payload: &ContactPayload) -> Option<Uuid> {
        payload.cv
    }

    fn validate(p: ContactPayload) -> Result<ContactDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let draft = ContactDraft {
            phone: optional_text(&mut errors, "phone", p.phone, Some(50)),
            email: required_email(&mut errors, "email", p.email),
            country: optional_text(&mut errors, "country", p.country, Some(100)),
            city: optional_text(&mut errors, "city", p.city, Some(100)),
            address_detail: optional_text(&mut errors, "address_detail", p.address_detail, Some(255)),
            website_url: optional_url(&mut errors, "website_url", p.website_url, 200),
            linkedin_url: optional_url(&mut errors, "linkedin_url", p.linkedin_url, 200),
            github_url: optional_url(&mut errors, "github_url", p.github_url, 200),
        };
        errors.into_result()?;
        Ok(draft)
    }

    fn duplicate_message() -> &'static str {
        "A contact already exists for this CV. Use PUT/PATCH to modify it."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::REQUIRED;

    #[test]
    fn email_is_the_only_required_field() {
        let draft = ContactSection::validate(ContactPayload {
            email: Some("ada@example.com".into()),
            city: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(draft.email, "ada@example.com");
        assert_eq!(draft.city, None);
    }

    #[test]
    fn bad_links_are_reported_per_field() {
        let errors = ContactSection::validate(ContactPayload {
            website_url: Some("javascript:alert(1)".into()),
            github_url: Some("https://github.com/ada".into()),
            ..Default::default()
        })
        .unwrap_err();

        assert_eq!(errors.messages("email"), [REQUIRED]);
        assert!(errors.contains("website_url"));
        assert!(!errors.contains("github_url"));
    }
}
