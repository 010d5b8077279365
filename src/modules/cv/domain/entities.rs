use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::sections::{Contact, ContactDraft, Education, Experience, Interest, Language, Skill};

pub const DEFAULT_CV_TITLE: &str = "My Professional CV";
pub const TITLE_MAX_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Cv {
    pub id: Uuid,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    #[schema(example = "My Professional CV")]
    pub title: String,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A CV with every section loaded, the shape all CV endpoints return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CvDocument {
    #[serde(flatten)]
    pub cv: Cv,
    #[schema(example = "ada@example.com")]
    pub owner_email: String,
    pub contact: Option<Contact>,
    pub experiences: Vec<Experience>,
    pub educations: Vec<Education>,
    pub skills: Vec<Skill>,
    pub languages: Vec<Language>,
    pub interests: Vec<Interest>,
}

impl CvDocument {
    /// A document with no sections yet.
    pub fn bare(cv: Cv, owner_email: String) -> Self {
        Self {
            cv,
            owner_email,
            contact: None,
            experiences: Vec::new(),
            educations: Vec::new(),
            skills: Vec::new(),
            languages: Vec::new(),
            interests: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.cv.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCv {
    pub title: String,
    pub summary: Option<String>,
    pub contact: Option<ContactDraft>,
}

/// Absent fields are left as stored. `summary: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CvChanges {
    pub title: Option<String>,
    pub summary: Option<Option<String>>,
    pub contact: Option<ContactDraft>,
}
