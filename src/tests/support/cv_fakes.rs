//! In-memory CV store implementing the CV and section repository ports,
//! with the same uniqueness and ownership rules as the Postgres tables.
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::cv::application::ports::outgoing::{
    CvRepository, CvRepositoryError, OwnedSection, SectionRepository, SectionRepositoryError,
};
use crate::cv::application::services::ownership::{authorize_cv, authorize_section};
use crate::cv::domain::entities::{Cv, CvChanges, CvDocument, NewCv};
use crate::cv::domain::sections::{
    Contact, ContactDraft, ContactSection, Education, EducationSection, Experience,
    ExperienceSection, Interest, InterestSection, Language, LanguageSection, SectionKind, Skill,
    SkillSection,
};
use crate::shared::pagination::{Page, PageRequest};

#[derive(Default)]
pub struct Tables {
    users: HashMap<Uuid, String>,
    cvs: Vec<Cv>,
    contacts: Vec<Contact>,
    experiences: Vec<Experience>,
    educations: Vec<Education>,
    skills: Vec<Skill>,
    languages: Vec<Language>,
    interests: Vec<Interest>,
}

impl Tables {
    fn owner_of(&self, cv_id: Uuid) -> Option<Uuid> {
        self.cvs.iter().find(|cv| cv.id == cv_id).map(|cv| cv.owner_id)
    }

    fn document(&self, cv: &Cv) -> CvDocument {
        let keep = |cv_id: &Uuid| *cv_id == cv.id;

        let mut experiences: Vec<_> =
            self.experiences.iter().filter(|e| keep(&e.cv_id)).cloned().collect();
        experiences.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(a.order.cmp(&b.order)));

        // Ongoing studies (no end date) first.
        let mut educations: Vec<_> =
            self.educations.iter().filter(|e| keep(&e.cv_id)).cloned().collect();
        educations.sort_by(|a, b| {
            let by_end = match (a.end_date, b.end_date) {
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (x, y) => y.cmp(&x),
            };
            by_end.then(a.order.cmp(&b.order))
        });

        CvDocument {
            cv: cv.clone(),
            owner_email: self.users.get(&cv.owner_id).cloned().unwrap_or_default(),
            contact: self.contacts.iter().find(|c| keep(&c.cv_id)).cloned(),
            experiences,
            educations,
            skills: self.skills.iter().filter(|s| keep(&s.cv_id)).cloned().collect(),
            languages: self.languages.iter().filter(|l| keep(&l.cv_id)).cloned().collect(),
            interests: self.interests.iter().filter(|i| keep(&i.cv_id)).cloned().collect(),
        }
    }

    fn title_taken(&self, owner_id: Uuid, title: &str, except: Option<Uuid>) -> bool {
        self.cvs
            .iter()
            .any(|cv| cv.owner_id == owner_id && cv.title == title && Some(cv.id) != except)
    }

    fn upsert_contact(&mut self, cv_id: Uuid, draft: ContactDraft) {
        let id = self
            .contacts
            .iter()
            .find(|c| c.cv_id == cv_id)
            .map(|c| c.id)
            .unwrap_or_else(Uuid::new_v4);
        self.contacts.retain(|c| c.cv_id != cv_id);
        self.contacts
            .push(<ContactSection as FakeSection>::build(id, cv_id, draft));
    }
}

/// How a section kind is laid out in [`Tables`].
pub trait FakeSection: SectionKind {
    fn rows(tables: &mut Tables) -> &mut Vec<Self::Record>;

    fn build(id: Uuid, cv_id: Uuid, draft: Self::Draft) -> Self::Record;

    /// Mirrors the table's unique constraints.
    fn clashes(_existing: &Self::Record, _cv_id: Uuid, _draft: &Self::Draft) -> bool {
        false
    }
}

impl FakeSection for ContactSection {
    fn rows(tables: &mut Tables) -> &mut Vec<Contact> {
        &mut tables.contacts
    }

    fn build(id: Uuid, cv_id: Uuid, d: ContactDraft) -> Contact {
        Contact {
            id,
            cv_id,
            phone: d.phone,
            email: d.email,
            country: d.country,
            city: d.city,
            address_detail: d.address_detail,
            website_url: d.website_url,
            linkedin_url: d.linkedin_url,
            github_url: d.github_url,
        }
    }

    fn clashes(existing: &Contact, cv_id: Uuid, _draft: &ContactDraft) -> bool {
        existing.cv_id == cv_id
    }
}

impl FakeSection for ExperienceSection {
    fn rows(tables: &mut Tables) -> &mut Vec<Experience> {
        &mut tables.experiences
    }

    fn build(id: Uuid, cv_id: Uuid, d: Self::Draft) -> Experience {
        Experience {
            id,
            cv_id,
            title: d.title,
            company: d.company,
            location: d.location,
            start_date: d.start_date,
            end_date: d.end_date,
            description: d.description,
            order: d.order,
        }
    }
}

impl FakeSection for EducationSection {
    fn rows(tables: &mut Tables) -> &mut Vec<Education> {
        &mut tables.educations
    }

    fn build(id: Uuid, cv_id: Uuid, d: Self::Draft) -> Education {
        Education {
            id,
            cv_id,
            degree: d.degree,
            institution: d.institution,
            location: d.location,
            start_date: d.start_date,
            end_date: d.end_date,
            description: d.description,
            order: d.order,
        }
    }
}

impl FakeSection for SkillSection {
    fn rows(tables: &mut Tables) -> &mut Vec<Skill> {
        &mut tables.skills
    }

    fn build(id: Uuid, cv_id: Uuid, d: Self::Draft) -> Skill {
        Skill::new(id, cv_id, d.name, d.category, d.level)
    }

    fn clashes(existing: &Skill, cv_id: Uuid, draft: &Self::Draft) -> bool {
        existing.cv_id == cv_id && existing.name == draft.name
    }
}

impl FakeSection for LanguageSection {
    fn rows(tables: &mut Tables) -> &mut Vec<Language> {
        &mut tables.languages
    }

    fn build(id: Uuid, cv_id: Uuid, d: Self::Draft) -> Language {
        Language {
            id,
            cv_id,
            name: d.name,
            level: d.level,
        }
    }
}

impl FakeSection for InterestSection {
    fn rows(tables: &mut Tables) -> &mut Vec<Interest> {
        &mut tables.interests
    }

    fn build(id: Uuid, cv_id: Uuid, d: Self::Draft) -> Interest {
        Interest {
            id,
            cv_id,
            name: d.name,
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCvStore {
    tables: Arc<Mutex<Tables>>,
    failing: bool,
}

impl InMemoryCvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the database were down.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn add_user(&self, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().users.insert(id, email.to_string());
        id
    }

    pub fn add_cv(&self, owner_id: Uuid, title: &str) -> Uuid {
        let now = Utc::now();
        let cv = Cv {
            id: Uuid::new_v4(),
            owner_id,
            title: title.to_string(),
            summary: None,
            created_at: now,
            updated_at: now,
        };
        let id = cv.id;
        self.tables.lock().unwrap().cvs.push(cv);
        id
    }

    pub fn cv_count(&self) -> usize {
        self.tables.lock().unwrap().cvs.len()
    }

    pub fn count<S: FakeSection>(&self) -> usize {
        S::rows(&mut self.tables.lock().unwrap()).len()
    }

    pub fn experience_count(&self) -> usize {
        self.count::<ExperienceSection>()
    }

    fn cv_down(&self) -> Result<(), CvRepositoryError> {
        if self.failing {
            return Err(CvRepositoryError::DatabaseError("connection refused".into()));
        }
        Ok(())
    }

    fn section_down(&self) -> Result<(), SectionRepositoryError> {
        if self.failing {
            return Err(SectionRepositoryError::DatabaseError("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CvRepository for InMemoryCvStore {
    async fn create(&self, owner_id: Uuid, new: NewCv) -> Result<CvDocument, CvRepositoryError> {
        self.cv_down()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.title_taken(owner_id, &new.title, None) {
            return Err(CvRepositoryError::TitleTaken);
        }

        let now = Utc::now();
        let cv = Cv {
            id: Uuid::new_v4(),
            owner_id,
            title: new.title,
            summary: new.summary,
            created_at: now,
            updated_at: now,
        };
        tables.cvs.push(cv.clone());
        if let Some(contact) = new.contact {
            tables.upsert_contact(cv.id, contact);
        }
        Ok(tables.document(&cv))
    }

    async fn list(
        &self,
        owner_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<CvDocument>, CvRepositoryError> {
        self.cv_down()?;
        let tables = self.tables.lock().unwrap();
        let mut cvs: Vec<&Cv> = tables.cvs.iter().filter(|cv| cv.owner_id == owner_id).collect();
        cvs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(Page::from_all(cvs, page).map(|cv| tables.document(cv)))
    }

    async fn find(
        &self,
        owner_id: Uuid,
        cv_id: Uuid,
    ) -> Result<Option<CvDocument>, CvRepositoryError> {
        self.cv_down()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .cvs
            .iter()
            .find(|cv| cv.id == cv_id && cv.owner_id == owner_id)
            .map(|cv| tables.document(cv)))
    }

    async fn update(
        &self,
        owner_id: Uuid,
        cv_id: Uuid,
        changes: CvChanges,
    ) -> Result<Option<CvDocument>, CvRepositoryError> {
        self.cv_down()?;
        let mut tables = self.tables.lock().unwrap();
        let Some(index) = tables
            .cvs
            .iter()
            .position(|cv| cv.id == cv_id && cv.owner_id == owner_id)
        else {
            return Ok(None);
        };
        if let Some(title) = &changes.title {
            if tables.title_taken(owner_id, title, Some(cv_id)) {
                return Err(CvRepositoryError::TitleTaken);
            }
        }

        let cv = &mut tables.cvs[index];
        if let Some(title) = changes.title {
            cv.title = title;
        }
        if let Some(summary) = changes.summary {
            cv.summary = summary;
        }
        cv.updated_at = Utc::now();
        let cv = cv.clone();

        if let Some(contact) = changes.contact {
            tables.upsert_contact(cv_id, contact);
        }
        Ok(Some(tables.document(&cv)))
    }

    async fn delete(&self, owner_id: Uuid, cv_id: Uuid) -> Result<bool, CvRepositoryError> {
        self.cv_down()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.cvs.len();
        tables
            .cvs
            .retain(|cv| !(cv.id == cv_id && cv.owner_id == owner_id));
        if tables.cvs.len() == before {
            return Ok(false);
        }

        tables.contacts.retain(|r| r.cv_id != cv_id);
        tables.experiences.retain(|r| r.cv_id != cv_id);
        tables.educations.retain(|r| r.cv_id != cv_id);
        tables.skills.retain(|r| r.cv_id != cv_id);
        tables.languages.retain(|r| r.cv_id != cv_id);
        tables.interests.retain(|r| r.cv_id != cv_id);
        Ok(true)
    }
}

#[async_trait]
impl<S: FakeSection> SectionRepository<S> for InMemoryCvStore {
    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<S::Record>, SectionRepositoryError> {
        self.section_down()?;
        let mut tables = self.tables.lock().unwrap();
        let mine: Vec<Uuid> = tables
            .cvs
            .iter()
            .filter(|cv| cv.owner_id == owner_id)
            .map(|cv| cv.id)
            .collect();
        let rows = S::rows(&mut tables)
            .iter()
            .filter(|r| mine.contains(&S::record_cv(r)))
            .cloned()
            .collect();
        Ok(Page::from_all(rows, page))
    }

    async fn find(
        &self,
        id: Uuid,
    ) -> Result<Option<OwnedSection<S::Record>>, SectionRepositoryError> {
        self.section_down()?;
        let mut tables = self.tables.lock().unwrap();
        let Some(record) = S::rows(&mut tables)
            .iter()
            .find(|r| S::record_id(r) == id)
            .cloned()
        else {
            return Ok(None);
        };
        Ok(tables
            .owner_of(S::record_cv(&record))
            .map(|owner_id| OwnedSection { record, owner_id }))
    }

    async fn cv_owner(&self, cv_id: Uuid) -> Result<Option<Uuid>, SectionRepositoryError> {
        self.section_down()?;
        Ok(self.tables.lock().unwrap().owner_of(cv_id))
    }

    async fn create(
        &self,
        caller: Uuid,
        cv_id: Uuid,
        draft: S::Draft,
    ) -> Result<S::Record, SectionRepositoryError> {
        self.section_down()?;
        let mut tables = self.tables.lock().unwrap();
        authorize_cv(caller, tables.owner_of(cv_id))?;

        let rows = S::rows(&mut tables);
        if rows.iter().any(|r| S::clashes(r, cv_id, &draft)) {
            return Err(SectionRepositoryError::Duplicate);
        }
        let record = S::build(Uuid::new_v4(), cv_id, draft);
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        cv_id: Uuid,
        draft: S::Draft,
    ) -> Result<S::Record, SectionRepositoryError> {
        self.section_down()?;
        let mut tables = self.tables.lock().unwrap();
        let current_cv = S::rows(&mut tables)
            .iter()
            .find(|r| S::record_id(r) == id)
            .map(|r| S::record_cv(r));
        authorize_section(caller, current_cv.and_then(|cv| tables.owner_of(cv)))?;
        if current_cv != Some(cv_id) {
            authorize_cv(caller, tables.owner_of(cv_id))?;
        }

        let rows = S::rows(&mut tables);
        if rows
            .iter()
            .any(|r| S::record_id(r) != id && S::clashes(r, cv_id, &draft))
        {
            return Err(SectionRepositoryError::Duplicate);
        }
        let record = S::build(id, cv_id, draft);
        for row in rows.iter_mut() {
            if S::record_id(row) == id {
                *row = record.clone();
            }
        }
        Ok(record)
    }

    async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), SectionRepositoryError> {
        self.section_down()?;
        let mut tables = self.tables.lock().unwrap();
        let current_cv = S::rows(&mut tables)
            .iter()
            .find(|r| S::record_id(r) == id)
            .map(|r| S::record_cv(r));
        authorize_section(caller, current_cv.and_then(|cv| tables.owner_of(cv)))?;

        S::rows(&mut tables).retain(|r| S::record_id(r) != id);
        Ok(())
    }
}
