//! Inventory core for shared fridges.
//!
//! Users keep products in shared fridges, hand them to each other and check
//! recipes against what they hold. Everything goes through [`Engine`], which
//! owns the database connection and wraps every multi-step operation in a
//! single transaction.

pub use commands::{
    DepositCmd, FridgeNewCmd, ProductRef, RecipeNewCmd, RecipePatch, UserNewCmd, UserPatch,
    WithdrawCmd,
};
pub use error::EngineError;
pub use fridges::{Fridge, FridgeUsage};
pub use ops::{Engine, EngineBuilder, StockFilter};
pub use products::{Product, ProductType};
pub use recipes::{Ingredient, Recipe, Shortfall};
pub use stock::{StockEntry, Withdrawal};
pub use users::User;

mod commands;
mod error;
mod fridges;
mod ops;
mod products;
mod recipe_ingredients;
mod recipes;
mod stock;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
