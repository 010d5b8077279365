use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::SectionKind;
use crate::cv::domain::fields::required_text;
use crate::shared::validation::ValidationErrors;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Interest {
    pub id: Uuid,
    #[serde(rename = "cv")]
    pub cv_id: Uuid,
    #[schema(example = "Chess")]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InterestPayload {
    pub cv: Option<Uuid>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestDraft {
    pub name: String,
}

pub struct InterestSection;

impl SectionKind for InterestSection {
    type Record = Interest;
    type Payload = InterestPayload;
    type Draft = InterestDraft;

    const LABEL: &'static str = "interest";

    fn record_id(record: &Interest) -> Uuid {
        record.id
    }

    fn record_cv(record: &Interest) -> Uuid {
        record.cv_id
    }

    fn payload_cv(payload: &InterestPayload) -> Option<Uuid> {
        payload.cv
    }

    fn validate(p: InterestPayload) -> Result<InterestDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", p.name, Some(100));
        errors.into_result()?;
        Ok(InterestDraft { name })
    }
}
