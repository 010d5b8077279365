use sea_orm::entity::prelude::*;

use crate::cv::domain::sections::Contact;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub cv_id: Uuid,
    pub phone: Option<String>,
    pub email: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub address_detail: Option<String>,
    pub website_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Contact {
    fn from(m: Model) -> Self {
        Contact {
            id: m.id,
            cv_id: m.cv_id,
            phone: m.phone,
            email: m.email,
            country: m.country,
            city: m.city,
            address_detail: m.address_detail,
            website_url: m.website_url,
            linkedin_url: m.linkedin_url,
            github_url: m.github_url,
        }
    }
}
