use async_trait::async_trait;
use uuid::Uuid;

use crate::cv::domain::entities::{CvChanges, CvDocument, NewCv};
use crate::shared::pagination::{Page, PageRequest};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CvRepositoryError {
    #[error("You already have a CV with this title")]
    TitleTaken,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// CV aggregate store. Every method is scoped to `owner_id`; another user's
/// CV reads as absent.
#[async_trait]
pub trait CvRepository: Send + Sync {
    /// Inserts the CV and, when given, its contact in one transaction.
    async fn create(&self, owner_id: Uuid, cv: NewCv) -> Result<CvDocument, CvRepositoryError>;

    /// Most recently updated first, sections loaded for the CVs on the page.
    async fn list(
        &self,
        owner_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<CvDocument>, CvRepositoryError>;

    async fn find(
        &self,
        owner_id: Uuid,
        cv_id: Uuid,
    ) -> Result<Option<CvDocument>, CvRepositoryError>;

    /// Applies `changes` and upserts the contact in one transaction.
    /// `Ok(None)` when the owner has no such CV.
    async fn update(
        &self,
        owner_id: Uuid,
        cv_id: Uuid,
        changes: CvChanges,
    ) -> Result<Option<CvDocument>, CvRepositoryError>;

    /// `Ok(false)` when the owner has no such CV.
    async fn delete(&self, owner_id: Uuid, cv_id: Uuid) -> Result<bool, CvRepositoryError>;
}
