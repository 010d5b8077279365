use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::application::domain::entities::UserId;
use crate::cv::application::ports::outgoing::CvRepository;
use crate::cv::application::use_cases::manage_cv::{CvError, CvInput, ManageCvUseCase};
use crate::cv::domain::entities::{CvChanges, CvDocument, NewCv, DEFAULT_CV_TITLE};
use crate::cv::domain::sections::{
    merge_patch, parse_payload, Contact, ContactDraft, ContactSection, SectionKind,
};
use crate::shared::pagination::{Page, PageRequest};
use crate::shared::validation::ValidationErrors;

pub struct CvService<R>
where
    R: CvRepository + Send + Sync,
{
    repository: R,
}

impl<R> CvService<R>
where
    R: CvRepository + Send + Sync,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Validates a nested contact, merged over the stored one when present.
    /// Field errors come back keyed `contact.<field>`.
    fn contact_draft(
        stored: Option<&Contact>,
        patch: Map<String, Value>,
    ) -> Result<ContactDraft, ValidationErrors> {
        let payload = match stored {
            Some(contact) => merge_patch::<ContactSection>(contact, &patch),
            None => parse_payload::<ContactSection>(Value::Object(patch)),
        };
        payload
            .and_then(ContactSection::validate)
            .map_err(|errors| errors.prefixed("contact"))
    }
}

#[async_trait]
impl<R> ManageCvUseCase for CvService<R>
where
    R: CvRepository + Send + Sync,
{
    async fn create(&self, owner: UserId, input: CvInput) -> Result<CvDocument, CvError> {
        let mut errors = ValidationErrors::new();
        let (title, summary) = input.title_and_summary(&mut errors);
        let contact = match input.contact {
            None => None,
            Some(body) => Self::contact_draft(None, body)
                .map_err(|e| errors.merge(e))
                .ok(),
        };
        errors.into_result()?;

        let cv = NewCv {
            title: title.unwrap_or_else(|| DEFAULT_CV_TITLE.to_string()),
            summary: summary.flatten(),
            contact,
        };
        let document = self.repository.create(owner.value(), cv).await?;

        info!(user_id = %owner, cv_id = %document.id(), "CV created");
        Ok(document)
    }

    async fn list(&self, owner: UserId, page: PageRequest) -> Result<Page<CvDocument>, CvError> {
        Ok(self.repository.list(owner.value(), page).await?)
    }

    async fn get(&self, owner: UserId, cv_id: Uuid) -> Result<CvDocument, CvError> {
        self.repository
            .find(owner.value(), cv_id)
            .await?
            .ok_or(CvError::NotFound)
    }

    async fn update(
        &self,
        owner: UserId,
        cv_id: Uuid,
        input: CvInput,
    ) -> Result<CvDocument, CvError> {
        let mut errors = ValidationErrors::new();
        let (title, summary) = input.title_and_summary(&mut errors);
        let contact = match input.contact {
            None => None,
            Some(patch) => {
                let stored = self
                    .repository
                    .find(owner.value(), cv_id)
                    .await?
                    .ok_or(CvError::NotFound)?;
                Self::contact_draft(stored.contact.as_ref(), patch)
                    .map_err(|e| errors.merge(e))
                    .ok()
            }
        };
        errors.into_result()?;

        let changes = CvChanges {
            title,
            summary,
            contact,
        };
        let document = self
            .repository
            .update(owner.value(), cv_id, changes)
            .await?
            .ok_or(CvError::NotFound)?;

        info!(user_id = %owner, cv_id = %cv_id, "CV updated");
        Ok(document)
    }

    async fn delete(&self, owner: UserId, cv_id: Uuid) -> Result<(), CvError> {
        if !self.repository.delete(owner.value(), cv_id).await? {
            return Err(CvError::NotFound);
        }
        info!(user_id = %owner, cv_id = %cv_id, "CV deleted");
        Ok(())
    }
}
