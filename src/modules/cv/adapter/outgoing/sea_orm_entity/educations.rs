use sea_orm::entity::prelude::*;

use crate::cv::domain::sections::Education;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "educations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cv_id: Uuid,
    pub degree: String,
    pub institution: String,
    pub location: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Education {
    fn from(m: Model) -> Self {
        Education {
            id: m.id,
            cv_id: m.cv_id,
            degree: m.degree,
            institution: m.institution,
            location: m.location,
            start_date: m.start_date,
            end_date: m.end_date,
            description: m.description,
            order: m.sort_order,
        }
    }
}
