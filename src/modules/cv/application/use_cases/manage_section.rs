use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::auth::application::domain::entities::UserId;
use crate::cv::application::ports::outgoing::SectionRepositoryError;
use crate::cv::application::services::ownership::AccessError;
use crate::cv::domain::sections::SectionKind;
use crate::shared::pagination::{Page, PageRequest};
use crate::shared::validation::ValidationErrors;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SectionError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("CV not found")]
    CvNotFound,

    #[error("Not found")]
    NotFound,

    #[error("You do not have permission to modify this CV")]
    Forbidden,

    #[error("{0}")]
    Duplicate(&'static str),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<ValidationErrors> for SectionError {
    fn from(errors: ValidationErrors) -> Self {
        SectionError::Validation(errors)
    }
}

impl From<AccessError> for SectionError {
    fn from(error: AccessError) -> Self {
        match error {
            AccessError::CvNotFound => SectionError::CvNotFound,
            AccessError::SectionNotFound => SectionError::NotFound,
            AccessError::Forbidden => SectionError::Forbidden,
        }
    }
}

impl SectionError {
    pub fn from_repository<S: SectionKind>(error: SectionRepositoryError) -> Self {
        match error {
            SectionRepositoryError::Access(access) => access.into(),
            SectionRepositoryError::Duplicate => SectionError::Duplicate(S::duplicate_message()),
            SectionRepositoryError::DatabaseError(msg) => SectionError::RepositoryError(msg),
        }
    }
}

/// CRUD over one section kind on behalf of an authenticated user.
#[async_trait]
pub trait SectionUseCases<S: SectionKind>: Send + Sync {
    /// Sections across all of the caller's CVs.
    async fn list(&self, owner: UserId, page: PageRequest)
        -> Result<Page<S::Record>, SectionError>;

    /// Other users' sections are reported as `NotFound`.
    async fn get(&self, owner: UserId, id: Uuid) -> Result<S::Record, SectionError>;

    async fn create(&self, owner: UserId, payload: S::Payload) -> Result<S::Record, SectionError>;

    /// Full replacement (PUT).
    async fn update(
        &self,
        owner: UserId,
        id: Uuid,
        payload: S::Payload,
    ) -> Result<S::Record, SectionError>;

    /// Partial body laid over the stored record, then validated like PUT.
    async fn patch(
        &self,
        owner: UserId,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> Result<S::Record, SectionError>;

    async fn delete(&self, owner: UserId, id: Uuid) -> Result<(), SectionError>;
}
