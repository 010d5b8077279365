use async_trait::async_trait;
use uuid::Uuid;

use crate::cv::application::services::ownership::AccessError;
use crate::cv::domain::sections::SectionKind;
use crate::shared::pagination::{Page, PageRequest};

/// A stored section together with the owner of its CV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedSection<R> {
    pub record: R,
    pub owner_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionRepositoryError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Duplicate section")]
    Duplicate,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Storage for one section kind. Writes take the caller and re-run the
/// ownership guard inside their transaction, so a check and its write
/// cannot interleave with another request.
#[async_trait]
pub trait SectionRepository<S: SectionKind>: Send + Sync {
    /// Sections of every CV owned by `owner_id`, one page at a time.
    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<S::Record>, SectionRepositoryError>;

    async fn find(&self, id: Uuid) -> Result<Option<OwnedSection<S::Record>>, SectionRepositoryError>;

    /// Owner of a CV, `None` when the CV does not exist.
    async fn cv_owner(&self, cv_id: Uuid) -> Result<Option<Uuid>, SectionRepositoryError>;

    async fn create(
        &self,
        caller: Uuid,
        cv_id: Uuid,
        draft: S::Draft,
    ) -> Result<S::Record, SectionRepositoryError>;

    /// Rewrites every field and may move the section to `cv_id`.
    async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        cv_id: Uuid,
        draft: S::Draft,
    ) -> Result<S::Record, SectionRepositoryError>;

    async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), SectionRepositoryError>;
}
