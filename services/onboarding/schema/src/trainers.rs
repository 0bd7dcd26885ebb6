use sea_orm::entity::prelude::*;

/// Permanent trainer profile created by activation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trainers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub draft_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: String,
    pub district: String,
    pub specialty: String,
    pub bio: Option<String>,
    pub certifications: Option<String>,
    pub experience: Option<String>,
    pub services: Json,
    pub status: String,
    pub content: Json,
    pub payment_reference: String,
    pub activated_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::trainer_slugs::Entity")]
    TrainerSlug,
}

impl Related<super::trainer_slugs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainerSlug.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
