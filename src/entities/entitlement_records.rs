use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// `gate` holds the gate collection name (`free_once_gate` /
/// `free_monthly_gate`), so the two gates never share a key.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "entitlement_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub gate: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub document_key: String,
    pub uid: String,
    pub entitlement_key: String,
    pub month: Option<String>,
    pub used_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
