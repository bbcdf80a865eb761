use sea_orm::entity::prelude::*;

/// Single-use password reset ticket.
/// The `*_changed` columns are filled when the ticket is consumed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "forgot_passwords")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    #[sea_orm(unique)]
    pub verification: String,
    pub used: bool,
    pub ip_request: String,
    pub browser_request: String,
    pub country_request: String,
    pub ip_changed: Option<String>,
    pub browser_changed: Option<String>,
    pub country_changed: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
