//! The stock ledger rows.
//!
//! A row says "this user keeps `quantity` units of this product in this
//! fridge". The key is `(product_id, fridge_id, user_id)`. Rows never persist
//! with a quantity `<= 0`: withdrawals that would exhaust a row delete it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, Product, products};

/// A stock row joined with its canonical product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    #[serde(flatten)]
    pub product: Product,
    pub fridge_id: String,
    pub user_id: String,
    pub quantity: i64,
}

impl StockEntry {
    /// Volume taken by this row.
    pub fn volume(&self) -> i64 {
        self.product.size.saturating_mul(self.quantity)
    }
}

/// Result of a withdrawal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Withdrawal {
    /// The row held no more than the requested amount and was removed.
    Cleared,
    /// The row held more than the requested amount.
    Reduced { remaining: i64 },
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "stock")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub fridge_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub quantity: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::fridges::Entity",
        from = "Column::FridgeId",
        to = "super::fridges::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Fridge,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::fridges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fridge.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<(Model, products::Model)> for StockEntry {
    type Error = EngineError;

    fn try_from((model, product): (Model, products::Model)) -> Result<Self, Self::Error> {
        Ok(Self {
            product: Product::try_from(product)?,
            fridge_id: model.fridge_id,
            user_id: model.user_id,
            quantity: model.quantity,
        })
    }
}
