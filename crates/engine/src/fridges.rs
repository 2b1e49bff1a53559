//! Fridges are static reference data: a location (floor or zone) and a
//! capacity in volume units.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A shared fridge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fridge {
    pub id: String,
    pub location: i32,
    pub capacity: i64,
}

/// Occupied and free volume of a fridge.
///
/// `used` is the sum of `size * quantity` over every stock row in the fridge,
/// whoever owns it. `free` is never negative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FridgeUsage {
    pub fridge: Fridge,
    pub used: i64,
    pub free: i64,
}

impl FridgeUsage {
    pub fn new(fridge: Fridge, used: i64) -> Self {
        let free = fridge.capacity.saturating_sub(used).max(0);
        Self { fridge, used, free }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "fridges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub location: i32,
    pub capacity: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock::Entity")]
    Stock,
}

impl Related<super::stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stock.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Fridge {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            location: model.location,
            capacity: model.capacity,
        }
    }
}
