//! Canonical products.
//!
//! A product is identified by the triple `(name, kind, size)`: two deposits
//! naming the same triple resolve to the same row.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Category of a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductType {
    Food,
    Drink,
}

impl ProductType {
    /// Canonical representation stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "FOOD",
            Self::Drink => "DRINK",
        }
    }
}

impl core::fmt::Display for ProductType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProductType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FOOD" => Ok(Self::Food),
            "DRINK" => Ok(Self::Drink),
            other => Err(EngineError::InvalidName(format!(
                "invalid product type: {other}"
            ))),
        }
    }
}

/// A product as returned to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProductType,
    /// Volume of a single unit.
    pub size: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub kind: String,
    pub size: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock::Entity")]
    Stock,
    #[sea_orm(has_many = "super::recipe_ingredients::Entity")]
    RecipeIngredients,
}

impl Related<super::stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stock.def()
    }
}

impl Related<super::recipe_ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeIngredients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Product> for ActiveModel {
    fn from(value: &Product) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            size: ActiveValue::Set(value.size),
        }
    }
}

impl TryFrom<Model> for Product {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: ProductType::try_from(model.kind.as_str())?,
            id: model.id,
            name: model.name,
            size: model.size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(ProductType::try_from("food").unwrap(), ProductType::Food);
        assert_eq!(ProductType::try_from(" Drink ").unwrap(), ProductType::Drink);
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        assert_eq!(
            ProductType::try_from("snack").unwrap_err(),
            EngineError::InvalidName("invalid product type: SNACK".to_string())
        );
    }

    #[test]
    fn model_roundtrip_keeps_kind() {
        let model = Model {
            id: "p1".to_string(),
            name: "Milk".to_string(),
            kind: "DRINK".to_string(),
            size: 2,
        };
        let product = Product::try_from(model).unwrap();
        assert_eq!(product.kind, ProductType::Drink);
        assert_eq!(product.size, 2);
    }
}
