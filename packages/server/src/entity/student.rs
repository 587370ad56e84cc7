use common::Award;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub full_name: String, // uppercase, single-spaced
    #[sea_orm(unique)]
    pub sbd: String, // exam ID, uppercase
    #[sea_orm(unique)]
    pub cccd: String, // national ID, 12 digits
    pub school: String,
    pub subject: String,
    pub score: f64,
    pub award: Award,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
