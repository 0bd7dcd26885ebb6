use sea_orm::entity::prelude::*;

/// Perishable trainer profile awaiting payment.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "drafts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: String,
    pub district: String,
    pub specialty: String,
    pub bio: Option<String>,
    pub certifications: Option<String>,
    pub experience: Option<String>,
    /// JSON array of service tags.
    pub services: Json,
    pub session_token: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub is_paid: bool,
    pub is_active: bool,
    pub payment_reference: Option<String>,
    pub final_id: Option<Uuid>,
    pub activated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
