use sea_orm::entity::prelude::*;

use crate::cv::domain::sections::{Skill, SkillCategory};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "skills")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cv_id: Uuid,
    pub name: String,
    pub category: String,
    pub level: i16,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Fails only when `category` holds something the CHECK constraint
    /// should have rejected.
    pub fn into_domain(self) -> Result<Skill, String> {
        let category = self.category.parse::<SkillCategory>()?;
        Ok(Skill::new(self.id, self.cv_id, self.name, category, self.level))
    }
}
