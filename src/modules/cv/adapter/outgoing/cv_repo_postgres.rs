use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::sea_orm_entity::{contacts, cvs};
use super::section_tables::SectionTable;
use crate::auth::adapter::outgoing::sea_orm_entity::users;
use crate::auth::adapter::outgoing::user_repository_postgres::is_unique_violation;
use crate::cv::application::ports::outgoing::{CvRepository, CvRepositoryError};
use crate::cv::domain::entities::{CvChanges, CvDocument, NewCv};
use crate::cv::domain::sections::{
    ContactSection, EducationSection, ExperienceSection, InterestSection, LanguageSection,
    SkillSection,
};
use crate::shared::pagination::{Page, PageRequest};

#[derive(Clone, Debug)]
pub struct CvRepoPostgres {
    db: Arc<DatabaseConnection>,
}

impl CvRepoPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn db_err(e: DbErr) -> CvRepositoryError {
        CvRepositoryError::DatabaseError(e.to_string())
    }

    /// Writes to `cvs` can only trip the `(user_id, title)` constraint.
    fn cv_write_err(e: DbErr) -> CvRepositoryError {
        if is_unique_violation(&e) {
            return CvRepositoryError::TitleTaken;
        }
        Self::db_err(e)
    }

    async fn owner_email<C: ConnectionTrait>(db: &C, owner_id: Uuid) -> Result<String, DbErr> {
        Ok(users::Entity::find_by_id(owner_id)
            .one(db)
            .await?
            .map(|user| user.email)
            .unwrap_or_default())
    }

    /// Attaches every section to `rows`, one query per table.
    async fn assemble<C: ConnectionTrait>(
        db: &C,
        owner_id: Uuid,
        rows: Vec<cvs::Model>,
    ) -> Result<Vec<CvDocument>, DbErr> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let email = Self::owner_email(db, owner_id).await?;

        let contacts = ContactSection::rows_for_cvs(db, ids.clone()).await?;
        let experiences = ExperienceSection::rows_for_cvs(db, ids.clone()).await?;
        let educations = EducationSection::rows_for_cvs(db, ids.clone()).await?;
        let skills = SkillSection::rows_for_cvs(db, ids.clone()).await?;
        let languages = LanguageSection::rows_for_cvs(db, ids.clone()).await?;
        let interests = InterestSection::rows_for_cvs(db, ids).await?;

        let mut documents: Vec<CvDocument> = rows
            .into_iter()
            .map(|row| CvDocument::bare(row.into_domain(), email.clone()))
            .collect();
        let slot: HashMap<Uuid, usize> = documents
            .iter()
            .enumerate()
            .map(|(i, doc)| (doc.id(), i))
            .collect();

        // Rows arrive in display order, so pushing keeps it.
        for contact in contacts {
            if let Some(&i) = slot.get(&contact.cv_id) {
                documents[i].contact = Some(contact);
            }
        }
        for experience in experiences {
            if let Some(&i) = slot.get(&experience.cv_id) {
                documents[i].experiences.push(experience);
            }
        }
        for education in educations {
            if let Some(&i) = slot.get(&education.cv_id) {
                documents[i].educations.push(education);
            }
        }
        for skill in skills {
            if let Some(&i) = slot.get(&skill.cv_id) {
                documents[i].skills.push(skill);
            }
        }
        for language in languages {
            if let Some(&i) = slot.get(&language.cv_id) {
                documents[i].languages.push(language);
            }
        }
        for interest in interests {
            if let Some(&i) = slot.get(&interest.cv_id) {
                documents[i].interests.push(interest);
            }
        }

        Ok(documents)
    }

    async fn insert_cv(
        txn: &DatabaseTransaction,
        owner_id: Uuid,
        cv: NewCv,
    ) -> Result<CvDocument, CvRepositoryError> {
        let now = Utc::now().fixed_offset();
        let row = cvs::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner_id),
            title: Set(cv.title),
            summary: Set(cv.summary),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(Self::cv_write_err)?;

        let contact = match cv.contact {
            Some(draft) => Some(
                ContactSection::insert_row(txn, Uuid::new_v4(), row.id, draft)
                    .await
                    .map_err(Self::db_err)?,
            ),
            None => None,
        };

        let email = Self::owner_email(txn, owner_id)
            .await
            .map_err(Self::db_err)?;
        let mut document = CvDocument::bare(row.into_domain(), email);
        document.contact = contact;
        Ok(document)
    }

    /// Returns false when the CV is missing or owned by someone else.
    async fn apply_changes(
        txn: &DatabaseTransaction,
        owner_id: Uuid,
        cv_id: Uuid,
        changes: CvChanges,
    ) -> Result<bool, CvRepositoryError> {
        let Some(row) = cvs::Entity::find_by_id(cv_id)
            .filter(cvs::Column::UserId.eq(owner_id))
            .one(txn)
            .await
            .map_err(Self::db_err)?
        else {
            return Ok(false);
        };

        // Saved even when only the contact changes so updated_at moves.
        let mut active = row.into_active_model();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(summary) = changes.summary {
            active.summary = Set(summary);
        }
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(txn).await.map_err(Self::cv_write_err)?;

        if let Some(draft) = changes.contact {
            let existing = contacts::Entity::find()
                .filter(contacts::Column::CvId.eq(cv_id))
                .one(txn)
                .await
                .map_err(Self::db_err)?;
            match existing {
                Some(contact) => ContactSection::update_row(txn, contact.id, cv_id, draft).await,
                None => ContactSection::insert_row(txn, Uuid::new_v4(), cv_id, draft).await,
            }
            .map_err(Self::db_err)?;
        }

        Ok(true)
    }
}

#[async_trait]
impl CvRepository for CvRepoPostgres {
    async fn create(&self, owner_id: Uuid, cv: NewCv) -> Result<CvDocument, CvRepositoryError> {
        let txn = self.db.begin().await.map_err(Self::db_err)?;

        match Self::insert_cv(&txn, owner_id, cv).await {
            Ok(document) => {
                txn.commit().await.map_err(Self::db_err)?;
                Ok(document)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }

    async fn list(
        &self,
        owner_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<CvDocument>, CvRepositoryError> {
        let paginator = cvs::Entity::find()
            .filter(cvs::Column::UserId.eq(owner_id))
            .order_by_desc(cvs::Column::UpdatedAt)
            .order_by_asc(cvs::Column::Id)
            .paginate(&*self.db, page.size());
        let total = paginator.num_items().await.map_err(Self::db_err)?;
        if page.offset() >= total {
            return Ok(Page::new(Vec::new(), total, page));
        }

        let rows = paginator
            .fetch_page(page.index())
            .await
            .map_err(Self::db_err)?;
        let documents = Self::assemble(&*self.db, owner_id, rows)
            .await
            .map_err(Self::db_err)?;
        Ok(Page::new(documents, total, page))
    }

    async fn find(
        &self,
        owner_id: Uuid,
        cv_id: Uuid,
    ) -> Result<Option<CvDocument>, CvRepositoryError> {
        let Some(row) = cvs::Entity::find_by_id(cv_id)
            .filter(cvs::Column::UserId.eq(owner_id))
            .one(&*self.db)
            .await
            .map_err(Self::db_err)?
        else {
            return Ok(None);
        };

        let mut documents = Self::assemble(&*self.db, owner_id, vec![row])
            .await
            .map_err(Self::db_err)?;
        Ok(documents.pop())
    }

    async fn update(
        &self,
        owner_id: Uuid,
        cv_id: Uuid,
        changes: CvChanges,
    ) -> Result<Option<CvDocument>, CvRepositoryError> {
        let txn = self.db.begin().await.map_err(Self::db_err)?;

        match Self::apply_changes(&txn, owner_id, cv_id, changes).await {
            Ok(true) => txn.commit().await.map_err(Self::db_err)?,
            Ok(false) => {
                let _ = txn.rollback().await;
                return Ok(None);
            }
            Err(e) => {
                let _ = txn.rollback().await;
                return Err(e);
            }
        }

        self.find(owner_id, cv_id).await
    }

    async fn delete(&self, owner_id: Uuid, cv_id: Uuid) -> Result<bool, CvRepositoryError> {
        let result = cvs::Entity::delete_many()
            .filter(cvs::Column::Id.eq(cv_id))
            .filter(cvs::Column::UserId.eq(owner_id))
            .exec(&*self.db)
            .await
            .map_err(Self::db_err)?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::adapter::outgoing::sea_orm_entity::users::fixtures::user_model;
    use crate::cv::adapter::outgoing::sea_orm_entity::cvs::fixtures::cv_model;
    use crate::cv::adapter::outgoing::sea_orm_entity::{
        educations, experiences, interests, languages, skills,
    };
    use chrono::NaiveDate;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn skill_row(cv_id: Uuid, name: &str) -> skills::Model {
        skills::Model {
            id: Uuid::new_v4(),
            cv_id,
            name: name.to_string(),
            category: "TECH".to_string(),
            level: 8,
        }
    }

    fn experience_row(cv_id: Uuid) -> experiences::Model {
        experiences::Model {
            id: Uuid::new_v4(),
            cv_id,
            title: "Engineer".to_string(),
            company: "Analytical Engines Ltd".to_string(),
            location: None,
            start_date: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            end_date: None,
            description: None,
            sort_order: 0,
        }
    }

    fn new_cv() -> NewCv {
        NewCv {
            title: "Backend".to_string(),
            summary: None,
            contact: None,
        }
    }

    #[tokio::test]
    async fn find_returns_none_for_unknown_or_foreign_cv() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<cvs::Model>::new()])
            .into_connection();

        let found = CvRepoPostgres::new(Arc::new(db))
            .find(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn find_attaches_every_section() {
        let owner = Uuid::new_v4();
        let cv_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cv_model(cv_id, owner, "Backend")]])
            .append_query_results([vec![user_model(owner, "ada@example.com")]])
            .append_query_results([Vec::<contacts::Model>::new()])
            .append_query_results([vec![experience_row(cv_id)]])
            .append_query_results([Vec::<educations::Model>::new()])
            .append_query_results([vec![skill_row(cv_id, "Rust"), skill_row(cv_id, "SQL")]])
            .append_query_results([Vec::<languages::Model>::new()])
            .append_query_results([Vec::<interests::Model>::new()])
            .into_connection();

        let document = CvRepoPostgres::new(Arc::new(db))
            .find(owner, cv_id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(document.owner_email, "ada@example.com");
        assert_eq!(document.cv.title, "Backend");
        assert_eq!(document.experiences.len(), 1);
        assert_eq!(document.skills.len(), 2);
        assert_eq!(document.skills[0].name, "Rust");
        assert!(document.contact.is_none());
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
    }

    #[tokio::test]
    async fn list_skips_section_queries_when_there_are_no_cvs() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(0)]])
            .into_connection();

        let page = CvRepoPostgres::new(Arc::new(db))
            .list(Uuid::new_v4(), PageRequest::first())
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn list_assembles_the_requested_page() {
        let owner = Uuid::new_v4();
        let cv_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(41)]])
            .append_query_results([vec![cv_model(cv_id, owner, "Backend")]])
            .append_query_results([vec![user_model(owner, "ada@example.com")]])
            .append_query_results([Vec::<contacts::Model>::new()])
            .append_query_results([Vec::<experiences::Model>::new()])
            .append_query_results([Vec::<educations::Model>::new()])
            .append_query_results([vec![skill_row(cv_id, "Rust")]])
            .append_query_results([Vec::<languages::Model>::new()])
            .append_query_results([Vec::<interests::Model>::new()])
            .into_connection();

        let page = CvRepoPostgres::new(Arc::new(db))
            .list(owner, PageRequest::new(3).unwrap())
            .await
            .unwrap();

        assert_eq!(page.total, 41);
        assert_eq!(page.number(), 3);
        assert_eq!(page.items[0].skills[0].name, "Rust");
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn list_past_the_last_page_stops_after_counting() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(20)]])
            .into_connection();

        let page = CvRepoPostgres::new(Arc::new(db))
            .list(Uuid::new_v4(), PageRequest::new(2).unwrap())
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert!(page.is_out_of_range());
    }

    #[tokio::test]
    async fn create_returns_the_inserted_cv() {
        let owner = Uuid::new_v4();
        let cv_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cv_model(cv_id, owner, "Backend")]])
            .append_query_results([vec![user_model(owner, "ada@example.com")]])
            .into_connection();

        let document = CvRepoPostgres::new(Arc::new(db))
            .create(owner, new_cv())
            .await
            .unwrap();

        assert_eq!(document.id(), cv_id);
        assert_eq!(document.cv.owner_id, owner);
        assert_eq!(document.owner_email, "ada@example.com");
    }

    #[tokio::test]
    async fn duplicate_title_maps_to_title_taken() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom(
                "duplicate key value violates unique constraint \"cvs_user_id_title_key\""
                    .to_string(),
            )])
            .into_connection();

        let result = CvRepoPostgres::new(Arc::new(db))
            .create(Uuid::new_v4(), new_cv())
            .await;

        assert!(matches!(result, Err(CvRepositoryError::TitleTaken)));
    }

    #[tokio::test]
    async fn update_of_missing_cv_returns_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<cvs::Model>::new()])
            .into_connection();

        let result = CvRepoPostgres::new(Arc::new(db))
            .update(Uuid::new_v4(), Uuid::new_v4(), CvChanges::default())
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = CvRepoPostgres::new(Arc::new(db));

        assert!(repo.delete(Uuid::new_v4(), Uuid::new_v4()).await.unwrap());
        assert!(!repo.delete(Uuid::new_v4(), Uuid::new_v4()).await.unwrap());
    }
}
