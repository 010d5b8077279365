use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::SectionKind;
use crate::cv::domain::fields::required_text;
use crate::shared::validation::ValidationErrors;

pub const LEVEL_RANGE: std::ops::RangeInclusive<i64> = 0..=10;
pub const DEFAULT_LEVEL: i16 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SkillCategory {
    #[default]
    Tech,
    Soft,
    Tool,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tech => "TECH",
            Self::Soft => "SOFT",
            Self::Tool => "TOOL",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Tech => "Technical",
            Self::Soft => "Soft skill",
            Self::Tool => "Tool / other",
        }
    }
}

impl FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TECH" => Ok(Self::Tech),
            "SOFT" => Ok(Self::Soft),
            "TOOL" => Ok(Self::Tool),
            other => Err(format!("\"{other}\" is not a valid choice.")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Skill {
    pub id: Uuid,
    #[serde(rename = "cv")]
    pub cv_id: Uuid,
    #[schema(example = "Rust")]
    pub name: String,
    pub category: SkillCategory,
    #[schema(example = "Technical")]
    category_display: &'static str,
    #[schema(minimum = 0, maximum = 10)]
    pub level: i16,
}

impl Skill {
    pub fn new(id: Uuid, cv_id: Uuid, name: String, category: SkillCategory, level: i16) -> Self {
        Self {
            id,
            cv_id,
            name,
            category,
            category_display: category.display_name(),
            level,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SkillPayload {
    pub cv: Option<Uuid>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub level: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDraft {
    pub name: String,
    pub category: SkillCategory,
    pub level: i16,
}

pub struct SkillSection;

impl SectionKind for SkillSection {
    type Record = Skill;
    type Payload = SkillPayload;
    type Draft = SkillDraft;

    const LABEL: &'static str = "skill";

    fn record_id(record: &Skill) -> Uuid {
        record.id
    }

    fn record_cv(record: &Skill) -> Uuid {
        record.cv_id
    }

    fn payload_cv(payload: &SkillPayload) -> Option<Uuid> {
        payload.cv
    }

    fn validate(p: SkillPayload) -> Result<SkillDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", p.name, Some(100));

        let category = match p.category.as_deref().map(str::trim) {
            None | Some("") => SkillCategory::default(),
            Some(raw) => raw.parse().unwrap_or_else(|msg: String| {
                errors.add("category", msg);
                SkillCategory::default()
            }),
        };

        let level = match p.level {
            None => DEFAULT_LEVEL,
            Some(level) if LEVEL_RANGE.contains(&level) => level as i16,
            Some(_) => {
                errors.add(
                    "level",
                    format!(
                        "Ensure this value is between {} and {}.",
                        LEVEL_RANGE.start(),
                        LEVEL_RANGE.end()
                    ),
                );
                DEFAULT_LEVEL
            }
        };

        errors.into_result()?;
        Ok(SkillDraft {
            name,
            category,
            level,
        })
    }

    fn duplicate_message() -> &'static str {
        "This skill is already listed on this CV."
    }
}
