use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{clear_end_date_for_current, iso_date, SectionKind};
use crate::cv::domain::dates::resolve_end_date;
use crate::cv::domain::fields::{optional_date, optional_text, required_date, required_text};
use crate::shared::validation::{ValidationErrors, REQUIRED};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Education {
    pub id: Uuid,
    #[serde(rename = "cv")]
    pub cv_id: Uuid,
    #[schema(example = "MSc Computer Science")]
    pub degree: String,
    pub institution: String,
    pub location: Option<String>,
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date::option")]
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub order: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EducationPayload {
    pub cv: Option<Uuid>,
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
    /// Write-only; never stored.
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationDraft {
    pub degree: String,
    pub institution: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub order: i32,
}

pub struct EducationSection;

impl SectionKind for EducationSection {
    type Record = Education;
    type Payload = EducationPayload;
    type Draft = EducationDraft;

    const LABEL: &'static str = "education";

    fn record_id(record: &Education) -> Uuid {
        record.id
    }

    fn record_cv(record: &Education) -> Uuid {
        record.cv_id
    }

    fn payload_cv(payload: &EducationPayload) -> Option<Uuid> {
        payload.cv
    }

    fn validate(p: EducationPayload) -> Result<EducationDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let degree = required_text(&mut errors, "degree", p.degree, Some(255));
        let institution = required_text(&mut errors, "institution", p.institution, Some(255));
        let location = optional_text(&mut errors, "location", p.location, Some(255));
        let start_date = required_date(&mut errors, "start_date", p.start_date);
        let end_date = optional_date(&mut errors, "end_date", p.end_date);
        let description = optional_text(&mut errors, "description", p.description, None);

        let end_date = resolve_end_date(start_date, end_date, p.is_current).unwrap_or_else(|msg| {
            errors.add("end_date", msg);
            None
        });

        errors.into_result()?;
        let Some(start_date) = start_date else {
            return Err(ValidationErrors::single("start_date", REQUIRED));
        };

        Ok(EducationDraft {
            degree,
            institution,
            location,
            start_date,
            end_date,
            description,
            order: p.order.unwrap_or(0),
        })
    }

    fn adjust_patch(merged: &mut Map<String, Value>, patch: &Map<String, Value>) {
        clear_end_date_for_current(merged, patch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::domain::dates::{END_BEFORE_START, END_DATE_MUST_BE_EMPTY};

    fn payload() -> EducationPayload {
        EducationPayload {
            degree: Some("BSc Mathematics".into()),
            institution: Some("University of London".into()),
            start_date: Some("2018-09".into()),
            ..Default::default()
        }
    }

    #[test]
    fn ongoing_studies_are_stored_without_end_date() {
        let draft = EducationSection::validate(EducationPayload {
            is_current: true,
            ..payload()
        })
        .unwrap();

        assert_eq!(draft.end_date, None);
        assert_eq!(draft.start_date, NaiveDate::from_ymd_opt(2018, 9, 1).unwrap());
        assert_eq!(draft.order, 0);
    }

    #[test]
    fn ongoing_studies_reject_an_end_date() {
        let errors = EducationSection::validate(EducationPayload {
            is_current: true,
            end_date: Some("2021-06".into()),
            ..payload()
        })
        .unwrap_err();

        assert_eq!(errors.messages("end_date"), [END_DATE_MUST_BE_EMPTY]);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let errors = EducationSection::validate(EducationPayload {
            end_date: Some("2018-08-31".into()),
            ..payload()
        })
        .unwrap_err();

        assert_eq!(errors.messages("end_date"), [END_BEFORE_START]);
    }

    #[test]
    fn missing_required_fields_are_all_reported() {
        let errors = EducationSection::validate(EducationPayload::default()).unwrap_err();
        assert!(errors.contains("degree"));
        assert!(errors.contains("institution"));
        assert!(errors.contains("start_date"));
    }
}
