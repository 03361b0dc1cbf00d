//! Member entity (`membres` table)

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "membres")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Account that registered the member
    pub user_id: Option<i32>,
    pub nom: String,
    pub prenom: String,
    pub numero: String,
    pub quartier: String,
    pub service: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::presence::Entity")]
    Presences,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::presence::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Presences.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
