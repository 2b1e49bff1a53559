//! Recipes and what they require.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{Product, ProductType};

/// Required quantity of a product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub product_id: String,
    pub quantity: i64,
}

impl Ingredient {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A recipe with its ingredient list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub description: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub ingredients: Vec<Ingredient>,
}

/// How much of a product the recipe owner lacks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub product_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProductType,
    pub size: i64,
    pub amount: i64,
}

impl Shortfall {
    pub fn new(product: Product, amount: i64) -> Self {
        Self {
            product_id: product.id,
            name: product.name,
            kind: product.kind,
            size: product.size,
            amount,
        }
    }
}

/// Missing amount when `held` units are available and `required` are needed.
pub(crate) fn missing_amount(required: i64, held: i64) -> Option<i64> {
    (held < required).then(|| required - held)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub user_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::recipe_ingredients::Entity")]
    Ingredients,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::recipe_ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Recipe {
    pub(crate) fn from_parts(model: Model, ingredients: Vec<Ingredient>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            user_id: model.user_id,
            created_at: model.created_at,
            ingredients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_held_misses_everything() {
        assert_eq!(missing_amount(6, 0), Some(6));
    }

    #[test]
    fn partial_holding_misses_the_difference() {
        assert_eq!(missing_amount(6, 3), Some(3));
    }

    #[test]
    fn enough_held_misses_nothing() {
        assert_eq!(missing_amount(6, 6), None);
        assert_eq!(missing_amount(6, 9), None);
    }
}
