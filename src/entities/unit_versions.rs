//! SeaORM Entity for the append-only unit version log

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "unit_versions")]
pub struct Model {
    /// Insertion sequence, also the tie-break for identical update dates
    #[sea_orm(primary_key)]
    pub seq: i64,
    /// Stable unit identifier shared by every version of the unit
    pub unit_id: Uuid,
    pub name: String,
    /// Parent category at the time this version was imported
    pub parent_id: Option<Uuid>,
    /// 'OFFER' or 'CATEGORY', immutable across a unit's history
    pub unit_type: String,
    /// Non-null for offers, null for categories
    pub price: Option<i64>,
    pub update_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
