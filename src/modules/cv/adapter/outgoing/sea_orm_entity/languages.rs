use sea_orm::entity::prelude::*;

use crate::cv::domain::sections::Language;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "languages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cv_id: Uuid,
    pub name: String,
    pub level: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Language {
    fn from(m: Model) -> Self {
        Language {
            id: m.id,
            cv_id: m.cv_id,
            name: m.name,
            level: m.level,
        }
    }
}
