use sea_orm::entity::prelude::*;

use crate::cv::domain::sections::Experience;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "experiences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cv_id: Uuid,
    pub title: String,
    pub company: String,
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

impl From<Model> for Experience {
    fn from(m: Model) -> Self {
        Experience {
            id: m.id,
            cv_id: m.cv_id,
            title: m.title,
            company: m.company,
            location: m.location,
            start_date: m.start_date,
            end_date: m.end_date,
            description: m.description,
            order: m.sort_order,
        }
    }
}
