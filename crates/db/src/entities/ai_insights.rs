//! `SeaORM` Entity for ai_insights table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ai_insights")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub insight_type: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub severity: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub data: Json,
    pub is_read: bool,
    #[sea_orm(unique)]
    pub dedup_key: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
