use std::sync::Arc;

use super::use_cases::manage_cv::ManageCvUseCase;
use super::use_cases::manage_section::SectionUseCases;
use crate::cv::domain::sections::{
    ContactSection, EducationSection, ExperienceSection, InterestSection, LanguageSection,
    SkillSection,
};

/// Everything the CV endpoints need, bundled for `AppState`.
#[derive(Clone)]
pub struct CvUseCases {
    pub cvs: Arc<dyn ManageCvUseCase>,
    pub contacts: Arc<dyn SectionUseCases<ContactSection>>,
    pub experiences: Arc<dyn SectionUseCases<ExperienceSection>>,
    pub educations: Arc<dyn SectionUseCases<EducationSection>>,
    pub skills: Arc<dyn SectionUseCases<SkillSection>>,
    pub languages: Arc<dyn SectionUseCases<LanguageSection>>,
    pub interests: Arc<dyn SectionUseCases<InterestSection>>,
}
