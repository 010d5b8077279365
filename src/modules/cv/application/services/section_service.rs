use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use super::ownership::{authorize_cv, authorize_section};
use crate::auth::application::domain::entities::UserId;
use crate::cv::application::ports::outgoing::{
    OwnedSection, SectionRepository, SectionRepositoryError,
};
use crate::cv::application::use_cases::manage_section::{SectionError, SectionUseCases};
use crate::cv::domain::sections::{merge_patch, SectionKind};
use crate::shared::pagination::{Page, PageRequest};
use crate::shared::validation::{ValidationErrors, REQUIRED};

/// Ownership checks, validation and persistence for one section kind.
pub struct SectionService<S, R>
where
    S: SectionKind,
    R: SectionRepository<S>,
{
    repository: R,
    _kind: PhantomData<fn() -> S>,
}

impl<S, R> SectionService<S, R>
where
    S: SectionKind,
    R: SectionRepository<S>,
{
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            _kind: PhantomData,
        }
    }

    fn repo_err(error: SectionRepositoryError) -> SectionError {
        SectionError::from_repository::<S>(error)
    }

    /// Loads a section the caller may change.
    async fn owned(&self, caller: Uuid, id: Uuid) -> Result<S::Record, SectionError> {
        let found = self.repository.find(id).await.map_err(Self::repo_err)?;
        let owner = found.as_ref().map(|section| section.owner_id);
        if let Err(denied) = authorize_section(caller, owner) {
            warn!(user_id = %caller, section_id = %id, kind = S::LABEL, "Section access denied");
            return Err(denied.into());
        }
        found
            .map(|OwnedSection { record, .. }| record)
            .ok_or(SectionError::NotFound)
    }

    /// The target CV of a create or move must exist and be the caller's.
    async fn check_target_cv(&self, caller: Uuid, cv_id: Uuid) -> Result<(), SectionError> {
        let owner = self.repository.cv_owner(cv_id).await.map_err(Self::repo_err)?;
        authorize_cv(caller, owner).map_err(|denied| {
            warn!(user_id = %caller, cv_id = %cv_id, kind = S::LABEL, "CV access denied");
            denied.into()
        })
    }

    /// Shared tail of PUT and PATCH.
    async fn replace(
        &self,
        caller: Uuid,
        current: S::Record,
        payload: S::Payload,
    ) -> Result<S::Record, SectionError> {
        let id = S::record_id(&current);
        let cv_id = S::payload_cv(&payload).unwrap_or_else(|| S::record_cv(&current));
        if cv_id != S::record_cv(&current) {
            self.check_target_cv(caller, cv_id).await?;
        }

        let draft = S::validate(payload)?;
        let record = self
            .repository
            .update(caller, id, cv_id, draft)
            .await
            .map_err(Self::repo_err)?;

        info!(user_id = %caller, section_id = %id, kind = S::LABEL, "Section updated");
        Ok(record)
    }
}

#[async_trait]
impl<S, R> SectionUseCases<S> for SectionService<S, R>
where
    S: SectionKind,
    R: SectionRepository<S>,
{
    async fn list(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Page<S::Record>, SectionError> {
        self.repository
            .list_for_owner(owner.value(), page)
            .await
            .map_err(Self::repo_err)
    }

    async fn get(&self, owner: UserId, id: Uuid) -> Result<S::Record, SectionError> {
        match self.repository.find(id).await.map_err(Self::repo_err)? {
            Some(section) if section.owner_id == owner.value() => Ok(section.record),
            _ => Err(SectionError::NotFound),
        }
    }

    async fn create(&self, owner: UserId, payload: S::Payload) -> Result<S::Record, SectionError> {
        let caller = owner.value();
        let Some(cv_id) = S::payload_cv(&payload) else {
            return Err(ValidationErrors::single("cv", REQUIRED).into());
        };
        self.check_target_cv(caller, cv_id).await?;

        let draft = S::validate(payload)?;
        let record = self
            .repository
            .create(caller, cv_id, draft)
            .await
            .map_err(Self::repo_err)?;

        info!(
            user_id = %caller,
            cv_id = %cv_id,
            section_id = %S::record_id(&record),
            kind = S::LABEL,
            "Section created"
        );
        Ok(record)
    }

    async fn update(
        &self,
        owner: UserId,
        id: Uuid,
        payload: S::Payload,
    ) -> Result<S::Record, SectionError> {
        let current = self.owned(owner.value(), id).await?;
        self.replace(owner.value(), current, payload).await
    }

    async fn patch(
        &self,
        owner: UserId,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> Result<S::Record, SectionError> {
        let current = self.owned(owner.value(), id).await?;
        let payload = merge_patch::<S>(&current, &patch)?;
        self.replace(owner.value(), current, payload).await
    }

    async fn delete(&self, owner: UserId, id: Uuid) -> Result<(), SectionError> {
        let caller = owner.value();
        self.owned(caller, id).await?;
        self.repository
            .delete(caller, id)
            .await
            .map_err(Self::repo_err)?;

        info!(user_id = %caller, section_id = %id, kind = S::LABEL, "Section deleted");
        Ok(())
    }
}
