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
pub struct Experience {
    pub id: Uuid,
    #[serde(rename = "cv")]
    pub cv_id: Uuid,
    #[schema(example = "Backend Engineer")]
    pub title: String,
    pub company: String,
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
pub struct ExperiencePayload {
    pub cv: Option<Uuid>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
    /// Write-only; never stored.
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceDraft {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub order: i32,
}

pub struct ExperienceSection;

impl SectionKind for ExperienceSection {
    type Record = Experience;
    type Payload = ExperiencePayload;
    type Draft = ExperienceDraft;

    const LABEL: &'static str = "experience";

    fn record_id(record: &Experience) -> Uuid {
        record.id
    }

    fn record_cv(record: &Experience) -> Uuid {
        record.cv_id
    }

    fn payload_cv(payload: &ExperiencePayload) -> Option<Uuid> {
        payload.cv
    }

    fn validate(p: ExperiencePayload) -> Result<ExperienceDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = required_text(&mut errors, "title", p.title, Some(255));
        let company = required_text(&mut errors, "company", p.company, Some(255));
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

        Ok(ExperienceDraft {
            title,
            company,
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
