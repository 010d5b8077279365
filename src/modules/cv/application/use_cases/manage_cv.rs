use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::auth::application::domain::entities::UserId;
use crate::cv::application::ports::outgoing::CvRepositoryError;
use crate::cv::domain::entities::{CvDocument, TITLE_MAX_CHARS};
use crate::cv::domain::fields::{optional_text, required_text};
use crate::shared::pagination::{Page, PageRequest};
use crate::shared::validation::ValidationErrors;

/// Body of a CV create or update. On update, absent fields keep their stored
/// value; `summary: Some(None)` clears the summary. `contact` is a partial
/// object merged over the stored contact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CvInput {
    pub title: Option<String>,
    pub summary: Option<Option<String>>,
    pub contact: Option<Map<String, Value>>,
}

impl CvInput {
    /// Checks title and summary, recording problems into `errors`.
    pub(crate) fn title_and_summary(
        &self,
        errors: &mut ValidationErrors,
    ) -> (Option<String>, Option<Option<String>>) {
        let title = self
            .title
            .clone()
            .map(|title| required_text(errors, "title", Some(title), Some(TITLE_MAX_CHARS)));
        let summary = self
            .summary
            .clone()
            .map(|summary| optional_text(errors, "summary", summary, None));
        (title, summary)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CvError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("CV not found")]
    NotFound,

    #[error("You already have a CV with this title")]
    TitleTaken,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<ValidationErrors> for CvError {
    fn from(errors: ValidationErrors) -> Self {
        CvError::Validation(errors)
    }
}

impl From<CvRepositoryError> for CvError {
    fn from(error: CvRepositoryError) -> Self {
        match error {
            CvRepositoryError::TitleTaken => CvError::TitleTaken,
            CvRepositoryError::DatabaseError(msg) => CvError::RepositoryError(msg),
        }
    }
}

#[async_trait]
pub trait ManageCvUseCase: Send + Sync {
    async fn create(&self, owner: UserId, input: CvInput) -> Result<CvDocument, CvError>;

    async fn list(&self, owner: UserId, page: PageRequest) -> Result<Page<CvDocument>, CvError>;

    async fn get(&self, owner: UserId, cv_id: Uuid) -> Result<CvDocument, CvError>;

    /// Merge semantics for both PUT and PATCH.
    async fn update(
        &self,
        owner: UserId,
        cv_id: Uuid,
        input: CvInput,
    ) -> Result<CvDocument, CvError>;

    async fn delete(&self, owner: UserId, cv_id: Uuid) -> Result<(), CvError>;
}
