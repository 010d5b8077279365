use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::SectionKind;
use crate::cv::domain::fields::{optional_text, required_text};
use crate::shared::validation::ValidationErrors;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Language {
    pub id: Uuid,
    #[serde(rename = "cv")]
    pub cv_id: Uuid,
    #[schema(example = "French")]
    pub name: String,
    /// Free text, e.g. "Native" or "B2".
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LanguagePayload {
    pub cv: Option<Uuid>,
    pub name: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDraft {
    pub name: String,
    pub level: Option<String>,
}

pub struct LanguageSection;

impl SectionKind for LanguageSection {
    type Record = Language;
    type Payload = LanguagePayload;
    type Draft = LanguageDraft;

    const LABEL: &'static str = "language";

    fn record_id(record: &Language) -> Uuid {
        record.id
    }

    fn record_cv(record: &Language) -> Uuid {
        record.cv_id
    }

    fn payload_cv(payload: &LanguagePayload) -> Option<Uuid> {
        payload.cv
    }

    fn validate(p: LanguagePayload) -> Result<LanguageDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", p.name, Some(100));
        let level = optional_text(&mut errors, "level", p.level, Some(50));
        errors.into_result()?;
        Ok(LanguageDraft { name, level })
    }
}
