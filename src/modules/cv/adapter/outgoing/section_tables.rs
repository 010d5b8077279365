//! Row mapping for each section table, used by [`super::SectionRepoPostgres`].
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::sea_orm_entity::{contacts, educations, experiences, interests, languages, skills};
use crate::cv::domain::sections::{
    Contact, ContactDraft, ContactSection, Education, EducationDraft, EducationSection,
    Experience, ExperienceDraft, ExperienceSection, Interest, InterestDraft, InterestSection,
    Language, LanguageDraft, LanguageSection, SectionKind, Skill, SkillDraft, SkillSection,
};
use crate::shared::pagination::{Page, PageRequest};

#[async_trait]
pub trait SectionTable: SectionKind {
    /// Rows belonging to any of `cv_ids`, in display order.
    async fn rows_for_cvs<C: ConnectionTrait>(
        db: &C,
        cv_ids: Vec<Uuid>,
    ) -> Result<Vec<Self::Record>, DbErr>;

    /// One page of [`SectionTable::rows_for_cvs`].
    async fn page_for_cvs<C: ConnectionTrait>(
        db: &C,
        cv_ids: Vec<Uuid>,
        page: PageRequest,
    ) -> Result<Page<Self::Record>, DbErr>;

    async fn find_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self::Record>, DbErr>;

    async fn insert_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: Self::Draft,
    ) -> Result<Self::Record, DbErr>;

    async fn update_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: Self::Draft,
    ) -> Result<Self::Record, DbErr>;

    /// Rows removed; zero when `id` was already gone.
    async fn delete_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr>;
}

/// Counts first so a page past the end costs one query.
async fn page_of<C, E, R>(
    db: &C,
    select: Select<E>,
    page: PageRequest,
    into: fn(E::Model) -> Result<R, DbErr>,
) -> Result<Page<R>, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync + 'static,
    R: Send,
{
    let paginator = select.paginate(db, page.size());
    let total = paginator.num_items().await?;
    if page.offset() >= total {
        return Ok(Page::new(Vec::new(), total, page));
    }
    let items = paginator
        .fetch_page(page.index())
        .await?
        .into_iter()
        .map(into)
        .collect::<Result<Vec<R>, DbErr>>()?;
    Ok(Page::new(items, total, page))
}

fn contact_active(id: Uuid, cv_id: Uuid, d: ContactDraft) -> contacts::ActiveModel {
    contacts::ActiveModel {
        id: Set(id),
        cv_id: Set(cv_id),
        phone: Set(d.phone),
        email: Set(d.email),
        country: Set(d.country),
        city: Set(d.city),
        address_detail: Set(d.address_detail),
        website_url: Set(d.website_url),
        linkedin_url: Set(d.linkedin_url),
        github_url: Set(d.github_url),
    }
}

fn contacts_of(cv_ids: Vec<Uuid>) -> Select<contacts::Entity> {
    contacts::Entity::find()
        .filter(contacts::Column::CvId.is_in(cv_ids))
        .order_by_asc(contacts::Column::Id)
}

#[async_trait]
impl SectionTable for ContactSection {
    async fn rows_for_cvs<C: ConnectionTrait>(db: &C, cv_ids: Vec<Uuid>) -> Result<Vec<Contact>, DbErr> {
        let rows = contacts_of(cv_ids).all(db).await?;
        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn page_for_cvs<C: ConnectionTrait>(
        db: &C,
        cv_ids: Vec<Uuid>,
        page: PageRequest,
    ) -> Result<Page<Contact>, DbErr> {
        page_of(db, contacts_of(cv_ids), page, |row| Ok(row.into())).await
    }

    async fn find_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Contact>, DbErr> {
        Ok(contacts::Entity::find_by_id(id).one(db).await?.map(Contact::from))
    }

    async fn insert_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: ContactDraft,
    ) -> Result<Contact, DbErr> {
        Ok(contact_active(id, cv_id, draft).insert(db).await?.into())
    }

    async fn update_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: ContactDraft,
    ) -> Result<Contact, DbErr> {
        Ok(contact_active(id, cv_id, draft).update(db).await?.into())
    }

    async fn delete_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        Ok(contacts::Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }
}

fn experience_active(id: Uuid, cv_id: Uuid, d: ExperienceDraft) -> experiences::ActiveModel {
    experiences::ActiveModel {
        id: Set(id),
        cv_id: Set(cv_id),
        title: Set(d.title),
        company: Set(d.company),
        location: Set(d.location),
        start_date: Set(d.start_date),
        end_date: Set(d.end_date),
        description: Set(d.description),
        sort_order: Set(d.order),
    }
}

fn experiences_of(cv_ids: Vec<Uuid>) -> Select<experiences::Entity> {
    experiences::Entity::find()
        .filter(experiences::Column::CvId.is_in(cv_ids))
        .order_by_desc(experiences::Column::StartDate)
        .order_by_asc(experiences::Column::SortOrder)
        .order_by_asc(experiences::Column::Id)
}

#[async_trait]
impl SectionTable for ExperienceSection {
    async fn rows_for_cvs<C: ConnectionTrait>(
        db: &C,
        cv_ids: Vec<Uuid>,
    ) -> Result<Vec<Experience>, DbErr> {
        let rows = experiences_of(cv_ids).all(db).await?;
        Ok(rows.into_iter().map(Experience::from).collect())
    }

    async fn page_for_cvs<C: ConnectionTrait>(
        db: &C,
        cv_ids: Vec<Uuid>,
        page: PageRequest,
    ) -> Result<Page<Experience>, DbErr> {
        page_of(db, experiences_of(cv_ids), page, |row| Ok(row.into())).await
    }

    async fn find_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Experience>, DbErr> {
        Ok(experiences::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(Experience::from))
    }

    async fn insert_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: ExperienceDraft,
    ) -> Result<Experience, DbErr> {
        Ok(experience_active(id, cv_id, draft).insert(db).await?.into())
    }

    async fn update_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: ExperienceDraft,
    ) -> Result<Experience, DbErr> {
        Ok(experience_active(id, cv_id, draft).update(db).await?.into())
    }

    async fn delete_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        Ok(experiences::Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }
}

fn education_active(id: Uuid, cv_id: Uuid, d: EducationDraft) -> educations::ActiveModel {
    educations::ActiveModel {
        id: Set(id),
        cv_id: Set(cv_id),
        degree: Set(d.degree),
        institution: Set(d.institution),
        location: Set(d.location),
        start_date: Set(d.start_date),
        end_date: Set(d.end_date),
        description: Set(d.description),
        sort_order: Set(d.order),
    }
}

/// Postgres sorts NULLs first on DESC, so ongoing studies lead.
fn educations_of(cv_ids: Vec<Uuid>) -> Select<educations::Entity> {
    educations::Entity::find()
        .filter(educations::Column::CvId.is_in(cv_ids))
        .order_by_desc(educations::Column::EndDate)
        .order_by_asc(educations::Column::SortOrder)
        .order_by_asc(educations::Column::Id)
}

#[async_trait]
impl SectionTable for EducationSection {
    async fn rows_for_cvs<C: ConnectionTrait>(
        db: &C,
        cv_ids: Vec<Uuid>,
    ) -> Result<Vec<Education>, DbErr> {
        let rows = educations_of(cv_ids).all(db).await?;
        Ok(rows.into_iter().map(Education::from).collect())
    }

    async fn page_for_cvs<C: ConnectionTrait>(
        db: &C,
        cv_ids: Vec<Uuid>,
        page: PageRequest,
    ) -> Result<Page<Education>, DbErr> {
        page_of(db, educations_of(cv_ids), page, |row| Ok(row.into())).await
    }

    async fn find_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Education>, DbErr> {
        Ok(educations::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(Education::from))
    }

    async fn insert_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: EducationDraft,
    ) -> Result<Education, DbErr> {
        Ok(education_active(id, cv_id, draft).insert(db).await?.into())
    }

    async fn update_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: EducationDraft,
    ) -> Result<Education, DbErr> {
        Ok(education_active(id, cv_id, draft).update(db).await?.into())
    }

    async fn delete_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        Ok(educations::Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }
}

fn skill_active(id: Uuid, cv_id: Uuid, d: SkillDraft) -> skills::ActiveModel {
    skills::ActiveModel {
        id: Set(id),
        cv_id: Set(cv_id),
        name: Set(d.name),
        category: Set(d.category.as_str().to_string()),
        level: Set(d.level),
    }
}

fn skill_from_row(row: skills::Model) -> Result<Skill, DbErr> {
    row.into_domain().map_err(DbErr::Custom)
}

fn skills_of(cv_ids: Vec<Uuid>) -> Select<skills::Entity> {
    skills::Entity::find()
        .filter(skills::Column::CvId.is_in(cv_ids))
        .order_by_asc(skills::Column::Name)
        .order_by_asc(skills::Column::Id)
}

#[async_trait]
impl SectionTable for SkillSection {
    async fn rows_for_cvs<C: ConnectionTrait>(db: &C, cv_ids: Vec<Uuid>) -> Result<Vec<Skill>, DbErr> {
        skills_of(cv_ids)
            .all(db)
            .await?
            .into_iter()
            .map(skill_from_row)
            .collect()
    }

    async fn page_for_cvs<C: ConnectionTrait>(
        db: &C,
        cv_ids: Vec<Uuid>,
        page: PageRequest,
    ) -> Result<Page<Skill>, DbErr> {
        page_of(db, skills_of(cv_ids), page, skill_from_row).await
    }

    async fn find_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Skill>, DbErr> {
        skills::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(skill_from_row)
            .transpose()
    }

    async fn insert_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: SkillDraft,
    ) -> Result<Skill, DbErr> {
        skill_from_row(skill_active(id, cv_id, draft).insert(db).await?)
    }

    async fn update_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: SkillDraft,
    ) -> Result<Skill, DbErr> {
        skill_from_row(skill_active(id, cv_id, draft).update(db).await?)
    }

    async fn delete_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        Ok(skills::Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }
}

fn language_active(id: Uuid, cv_id: Uuid, d: LanguageDraft) -> languages::ActiveModel {
    languages::ActiveModel {
        id: Set(id),
        cv_id: Set(cv_id),
        name: Set(d.name),
        level: Set(d.level),
    }
}

fn languages_of(cv_ids: Vec<Uuid>) -> Select<languages::Entity> {
    languages::Entity::find()
        .filter(languages::Column::CvId.is_in(cv_ids))
        .order_by_asc(languages::Column::Name)
        .order_by_asc(languages::Column::Id)
}

#[async_trait]
impl SectionTable for LanguageSection {
    async fn rows_for_cvs<C: ConnectionTrait>(
        db: &C,
        cv_ids: Vec<Uuid>,
    ) -> Result<Vec<Language>, DbErr> {
        let rows = languages_of(cv_ids).all(db).await?;
        Ok(rows.into_iter().map(Language::from).collect())
    }

    async fn page_for_cvs<C: ConnectionTrait>(
        db: &C,
        cv_ids: Vec<Uuid>,
        page: PageRequest,
    ) -> Result<Page<Language>, DbErr> {
        page_of(db, languages_of(cv_ids), page, |row| Ok(row.into())).await
    }

    async fn find_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Language>, DbErr> {
        Ok(languages::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(Language::from))
    }

    async fn insert_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: LanguageDraft,
    ) -> Result<Language, DbErr> {
        Ok(language_active(id, cv_id, draft).insert(db).await?.into())
    }

    async fn update_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: LanguageDraft,
    ) -> Result<Language, DbErr> {
        Ok(language_active(id, cv_id, draft).update(db).await?.into())
    }

    async fn delete_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        Ok(languages::Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }
}

fn interest_active(id: Uuid, cv_id: Uuid, d: InterestDraft) -> interests::ActiveModel {
    interests::ActiveModel {
        id: Set(id),
        cv_id: Set(cv_id),
        name: Set(d.name),
    }
}

fn interests_of(cv_ids: Vec<Uuid>) -> Select<interests::Entity> {
    interests::Entity::find()
        .filter(interests::Column::CvId.is_in(cv_ids))
        .order_by_asc(interests::Column::Name)
        .order_by_asc(interests::Column::Id)
}

#[async_trait]
impl SectionTable for InterestSection {
    async fn rows_for_cvs<C: ConnectionTrait>(
        db: &C,
        cv_ids: Vec<Uuid>,
    ) -> Result<Vec<Interest>, DbErr> {
        let rows = interests_of(cv_ids).all(db).await?;
        Ok(rows.into_iter().map(Interest::from).collect())
    }

    async fn page_for_cvs<C: ConnectionTrait>(
        db: &C,
        cv_ids: Vec<Uuid>,
        page: PageRequest,
    ) -> Result<Page<Interest>, DbErr> {
        page_of(db, interests_of(cv_ids), page, |row| Ok(row.into())).await
    }

    async fn find_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Interest>, DbErr> {
        Ok(interests::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(Interest::from))
    }

    async fn insert_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: InterestDraft,
    ) -> Result<Interest, DbErr> {
        Ok(interest_active(id, cv_id, draft).insert(db).await?.into())
    }

    async fn update_row<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        cv_id: Uuid,
        draft: InterestDraft,
    ) -> Result<Interest, DbErr> {
        Ok(interest_active(id, cv_id, draft).update(db).await?.into())
    }

    async fn delete_row<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        Ok(interests::Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }
}
