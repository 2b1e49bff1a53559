//! Command structs for engine operations.
//!
//! These types group parameters for write operations (deposit, withdraw,
//! recipe and user creation/patching), keeping call sites readable and
//! avoiding long argument lists.

use crate::{Ingredient, ProductType};

/// How a deposit names its product.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProductRef {
    /// An existing canonical product.
    Id(String),
    /// A `(name, kind, size)` triple, created on first use.
    Triple {
        name: String,
        kind: ProductType,
        size: i64,
    },
}

/// Put `amount` units of a product in a fridge on behalf of a user.
#[derive(Clone, Debug)]
pub struct DepositCmd {
    pub user_id: String,
    pub fridge_id: String,
    pub product: ProductRef,
    pub amount: i64,
}

impl DepositCmd {
    /// Deposit an existing product.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        fridge_id: impl Into<String>,
        product_id: impl Into<String>,
        amount: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            fridge_id: fridge_id.into(),
            product: ProductRef::Id(product_id.into()),
            amount,
        }
    }

    /// Deposit a product described by its triple.
    #[must_use]
    pub fn product(
        user_id: impl Into<String>,
        fridge_id: impl Into<String>,
        name: impl Into<String>,
        kind: ProductType,
        size: i64,
        amount: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            fridge_id: fridge_id.into(),
            product: ProductRef::Triple {
                name: name.into(),
                kind,
                size,
            },
            amount,
        }
    }
}

/// Take `amount` units of a product out of a fridge.
#[derive(Clone, Debug)]
pub struct WithdrawCmd {
    pub user_id: String,
    pub fridge_id: String,
    pub product_id: String,
    pub amount: i64,
}

impl WithdrawCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        fridge_id: impl Into<String>,
        product_id: impl Into<String>,
        amount: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            fridge_id: fridge_id.into(),
            product_id: product_id.into(),
            amount,
        }
    }
}

/// Register a user.
#[derive(Clone, Debug)]
pub struct UserNewCmd {
    /// Explicit id; a UUID is generated when missing.
    pub id: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserNewCmd {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Partial update of a user. `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserPatch {
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }
}

/// Register a fridge.
#[derive(Clone, Debug)]
pub struct FridgeNewCmd {
    /// Explicit id; a UUID is generated when missing.
    pub id: Option<String>,
    pub location: i32,
    pub capacity: i64,
}

impl FridgeNewCmd {
    #[must_use]
    pub fn new(location: i32, capacity: i64) -> Self {
        Self {
            id: None,
            location,
            capacity,
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Create a recipe for a user.
#[derive(Clone, Debug)]
pub struct RecipeNewCmd {
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
}

impl RecipeNewCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            description: String::new(),
            ingredients: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn ingredient(mut self, product_id: impl Into<String>, quantity: i64) -> Self {
        self.ingredients.push(Ingredient::new(product_id, quantity));
        self
    }
}

/// Partial update of a recipe.
///
/// When `ingredients` is `Some`, the existing list is replaced wholesale (an
/// empty list clears it).
#[derive(Clone, Debug, Default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
}

impl RecipePatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = Some(ingredients);
        self
    }
}
