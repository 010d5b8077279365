use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;

use super::sea_orm_entity::cvs;
use super::section_tables::SectionTable;
use crate::auth::adapter::outgoing::user_repository_postgres::is_unique_violation;
use crate::cv::application::ports::outgoing::{
    OwnedSection, SectionRepository, SectionRepositoryError,
};
use crate::cv::application::services::ownership::{authorize_cv, authorize_section, AccessError};
use crate::shared::pagination::{Page, PageRequest};

/// One repository per section table; `S` picks the table.
pub struct SectionRepoPostgres<S> {
    db: Arc<DatabaseConnection>,
    _table: PhantomData<fn() -> S>,
}

impl<S> Clone for SectionRepoPostgres<S> {
    fn clone(&self) -> Self {
        Self::new(self.db.clone())
    }
}

impl<S> SectionRepoPostgres<S> {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            _table: PhantomData,
        }
    }
}

impl<S: SectionTable> SectionRepoPostgres<S> {
    fn db_err(e: DbErr) -> SectionRepositoryError {
        SectionRepositoryError::DatabaseError(e.to_string())
    }

    fn write_err(e: DbErr) -> SectionRepositoryError {
        if is_unique_violation(&e) {
            return SectionRepositoryError::Duplicate;
        }
        Self::db_err(e)
    }

    async fn owner_of<C: ConnectionTrait>(db: &C, cv_id: Uuid) -> Result<Option<Uuid>, DbErr> {
        Ok(cvs::Entity::find_by_id(cv_id)
            .one(db)
            .await?
            .map(|cv| cv.user_id))
    }

    /// Loads the section and checks the caller owns its CV.
    async fn guard_section(
        txn: &DatabaseTransaction,
        caller: Uuid,
        id: Uuid,
    ) -> Result<S::Record, SectionRepositoryError> {
        let Some(record) = S::find_row(txn, id).await.map_err(Self::db_err)? else {
            return Err(AccessError::SectionNotFound.into());
        };
        let owner = Self::owner_of(txn, S::record_cv(&record))
            .await
            .map_err(Self::db_err)?;
        authorize_section(caller, owner)?;
        Ok(record)
    }

    async fn guard_cv(
        txn: &DatabaseTransaction,
        caller: Uuid,
        cv_id: Uuid,
    ) -> Result<(), SectionRepositoryError> {
        let owner = Self::owner_of(txn, cv_id).await.map_err(Self::db_err)?;
        authorize_cv(caller, owner)?;
        Ok(())
    }

    async fn finish<T>(
        txn: DatabaseTransaction,
        result: Result<T, SectionRepositoryError>,
    ) -> Result<T, SectionRepositoryError> {
        match result {
            Ok(value) => {
                txn.commit().await.map_err(Self::db_err)?;
                Ok(value)
            }
            Err(e) => {
                if let SectionRepositoryError::Access(reason) = &e {
                    warn!(kind = S::LABEL, %reason, "section write refused");
                }
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl<S: SectionTable> SectionRepository<S> for SectionRepoPostgres<S> {
    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<S::Record>, SectionRepositoryError> {
        let cv_ids: Vec<Uuid> = cvs::Entity::find()
            .filter(cvs::Column::UserId.eq(owner_id))
            .all(&*self.db)
            .await
            .map_err(Self::db_err)?
            .into_iter()
            .map(|cv| cv.id)
            .collect();
        if cv_ids.is_empty() {
            return Ok(Page::new(Vec::new(), 0, page));
        }

        S::page_for_cvs(&*self.db, cv_ids, page)
            .await
            .map_err(Self::db_err)
    }

    async fn find(&self, id: Uuid) -> Result<Option<OwnedSection<S::Record>>, SectionRepositoryError> {
        let Some(record) = S::find_row(&*self.db, id).await.map_err(Self::db_err)? else {
            return Ok(None);
        };
        let owner = Self::owner_of(&*self.db, S::record_cv(&record))
            .await
            .map_err(Self::db_err)?;

        Ok(owner.map(|owner_id| OwnedSection { record, owner_id }))
    }

    async fn cv_owner(&self, cv_id: Uuid) -> Result<Option<Uuid>, SectionRepositoryError> {
        Self::owner_of(&*self.db, cv_id).await.map_err(Self::db_err)
    }

    async fn create(
        &self,
        caller: Uuid,
        cv_id: Uuid,
        draft: S::Draft,
    ) -> Result<S::Record, SectionRepositoryError> {
        let txn = self.db.begin().await.map_err(Self::db_err)?;

        let result = async {
            Self::guard_cv(&txn, caller, cv_id).await?;
            S::insert_row(&txn, Uuid::new_v4(), cv_id, draft)
                .await
                .map_err(Self::write_err)
        }
        .await;

        Self::finish(txn, result).await
    }

    async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        cv_id: Uuid,
        draft: S::Draft,
    ) -> Result<S::Record, SectionRepositoryError> {
        let txn = self.db.begin().await.map_err(Self::db_err)?;

        let result = async {
            let current = Self::guard_section(&txn, caller, id).await?;
            if S::record_cv(&current) != cv_id {
                Self::guard_cv(&txn, caller, cv_id).await?;
            }
            S::update_row(&txn, id, cv_id, draft)
                .await
                .map_err(Self::write_err)
        }
        .await;

        Self::finish(txn, result).await
    }

    async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), SectionRepositoryError> {
        let txn = self.db.begin().await.map_err(Self::db_err)?;

        let result = async {
            Self::guard_section(&txn, caller, id).await?;
            S::delete_row(&txn, id).await.map_err(Self::db_err)?;
            Ok(())
        }
        .await;

        Self::finish(txn, result).await
    }
}
