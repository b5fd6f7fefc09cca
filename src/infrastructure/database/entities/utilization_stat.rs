//! Utilization stat bucket entity
//!
//! Keyed by (slot_id, stat_date, stat_hour); incremented, never replaced.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "utilization_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub slot_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub stat_date: Date,

    /// Hour of day, 0-23
    #[sea_orm(primary_key, auto_increment = false)]
    pub stat_hour: i32,

    pub occupancy_count: i64,

    /// Accumulated revenue in cents
    pub revenue_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
