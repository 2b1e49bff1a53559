use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, Ingredient, Product, Recipe, RecipeNewCmd, RecipePatch, ResultEngine, Shortfall,
    products, recipe_ingredients, recipes, recipes::missing_amount, stock,
    util::{normalize_required_name, normalize_text, search_pattern},
};

use super::{Engine, with_tx};

impl Engine {
    /// Every ingredient must name a distinct, existing product.
    async fn check_ingredient_products(
        &self,
        db: &DatabaseTransaction,
        ingredients: &[Ingredient],
    ) -> ResultEngine<()> {
        if ingredients.is_empty() {
            return Ok(());
        }

        let mut seen = HashSet::with_capacity(ingredients.len());
        for ingredient in ingredients {
            if !seen.insert(ingredient.product_id.as_str()) {
                return Err(EngineError::NotAcceptable(format!(
                    "product {} listed more than once",
                    ingredient.product_id
                )));
            }
        }

        let found = products::Entity::find()
            .filter(
                products::Column::Id.is_in(ingredients.iter().map(|i| i.product_id.clone())),
            )
            .count(db)
            .await?;
        if found != ingredients.len() as u64 {
            return Err(EngineError::NotAcceptable(
                "one or more products do not exist".to_string(),
            ));
        }
        Ok(())
    }

    /// Fail with `ExistingKey` when the user already has a recipe named `name`.
    async fn ensure_recipe_name_free(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        name: &str,
        except_id: Option<&str>,
    ) -> ResultEngine<()> {
        let mut query = recipes::Entity::find()
            .filter(recipes::Column::UserId.eq(user_id))
            .filter(recipes::Column::Name.eq(name));
        if let Some(id) = except_id {
            query = query.filter(recipes::Column::Id.ne(id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }

    /// Insert ingredient rows, refusing non-positive quantities. The caller's
    /// transaction discards rows already inserted when one is refused.
    async fn insert_ingredients(
        &self,
        db: &DatabaseTransaction,
        recipe_id: &str,
        ingredients: &[Ingredient],
    ) -> ResultEngine<()> {
        for ingredient in ingredients {
            if ingredient.quantity <= 0 {
                return Err(EngineError::NotAcceptable(
                    "product quantity must be greater than 0".to_string(),
                ));
            }
            recipe_ingredients::ActiveModel {
                recipe_id: ActiveValue::Set(recipe_id.to_string()),
                product_id: ActiveValue::Set(ingredient.product_id.clone()),
                quantity: ActiveValue::Set(ingredient.quantity),
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    async fn load_ingredients(
        &self,
        db: &DatabaseTransaction,
        recipe_id: &str,
    ) -> ResultEngine<Vec<Ingredient>> {
        let rows = recipe_ingredients::Entity::find()
            .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
            .order_by_asc(recipe_ingredients::Column::ProductId)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    /// Create a recipe for a user.
    ///
    /// Every ingredient product must exist, the name must be new for that
    /// user and every quantity must be `> 0`. A refused recipe leaves no rows.
    pub async fn new_recipe(&self, cmd: RecipeNewCmd) -> ResultEngine<Recipe> {
        let name = normalize_required_name(&cmd.name, "recipe name")?;
        let description = normalize_text(&cmd.description);
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, &cmd.user_id).await?;
            self.check_ingredient_products(&db_tx, &cmd.ingredients)
                .await?;
            self.ensure_recipe_name_free(&db_tx, &cmd.user_id, &name, None)
                .await?;

            let model = recipes::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(description),
                user_id: ActiveValue::Set(cmd.user_id.clone()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            self.insert_ingredients(&db_tx, &model.id, &cmd.ingredients)
                .await?;

            let ingredients = self.load_ingredients(&db_tx, &model.id).await?;
            tracing::info!(
                recipe_id = %model.id,
                user_id = %model.user_id,
                ingredients = ingredients.len(),
                "recipe created"
            );
            Ok(Recipe::from_parts(model, ingredients))
        })
    }

    /// A recipe with its ingredients.
    pub async fn recipe(&self, recipe_id: &str) -> ResultEngine<Recipe> {
        with_tx!(self, |db_tx| {
            let model = self.require_recipe(&db_tx, recipe_id).await?;
            let ingredients = self.load_ingredients(&db_tx, recipe_id).await?;
            Ok(Recipe::from_parts(model, ingredients))
        })
    }

    /// Recipes, newest first. `search` matches name or description, ignoring
    /// case.
    pub async fn list_recipes(&self, search: Option<&str>) -> ResultEngine<Vec<Recipe>> {
        with_tx!(self, |db_tx| {
            let mut query = recipes::Entity::find();
            if let Some(pattern) = search_pattern(search) {
                query = query.filter(
                    Condition::any()
                        .add(Expr::cust_with_values(
                            "LOWER(name) LIKE ?",
                            [pattern.clone()],
                        ))
                        .add(Expr::cust_with_values(
                            "LOWER(description) LIKE ?",
                            [pattern],
                        )),
                );
            }
            let models = query
                .order_by_desc(recipes::Column::CreatedAt)
                .order_by_desc(recipes::Column::Id)
                .all(&db_tx)
                .await?;
            let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
            let rows = recipe_ingredients::Entity::find()
                .filter(recipe_ingredients::Column::RecipeId.is_in(ids))
                .order_by_asc(recipe_ingredients::Column::ProductId)
                .all(&db_tx)
                .await?;
            let mut by_recipe: HashMap<String, Vec<Ingredient>> = HashMap::new();
            for row in rows {
                by_recipe
                    .entry(row.recipe_id.clone())
                    .or_default()
                    .push(Ingredient::from(row));
            }

            Ok(models
                .into_iter()
                .map(|model| {
                    let ingredients = by_recipe.remove(&model.id).unwrap_or_default();
                    Recipe::from_parts(model, ingredients)
                })
                .collect())
        })
    }

    /// Apply the fields set in `patch`.
    ///
    /// A supplied ingredient list replaces the old one entirely and is
    /// validated like a new recipe's.
    pub async fn update_recipe(&self, recipe_id: &str, patch: RecipePatch) -> ResultEngine<Recipe> {
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "recipe name"))
            .transpose()?;
        with_tx!(self, |db_tx| {
            let model = self.require_recipe(&db_tx, recipe_id).await?;
            if let Some(name) = name.as_deref() {
                self.ensure_recipe_name_free(&db_tx, &model.user_id, name, Some(recipe_id))
                    .await?;
            }
            if let Some(ingredients) = patch.ingredients.as_deref() {
                self.check_ingredient_products(&db_tx, ingredients).await?;
            }

            let model = if name.is_some() || patch.description.is_some() {
                let mut active = model.into_active_model();
                if let Some(name) = name {
                    active.name = ActiveValue::Set(name);
                }
                if let Some(description) = patch.description.as_deref() {
                    active.description = ActiveValue::Set(normalize_text(description));
                }
                active.update(&db_tx).await?
            } else {
                model
            };

            if let Some(ingredients) = patch.ingredients.as_deref() {
                recipe_ingredients::Entity::delete_many()
                    .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
                    .exec(&db_tx)
                    .await?;
                self.insert_ingredients(&db_tx, recipe_id, ingredients)
                    .await?;
            }

            let ingredients = self.load_ingredients(&db_tx, recipe_id).await?;
            tracing::info!(recipe_id, "recipe updated");
            Ok(Recipe::from_parts(model, ingredients))
        })
    }

    pub async fn delete_recipe(&self, recipe_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_recipe(&db_tx, recipe_id).await?;
            recipe_ingredients::Entity::delete_many()
                .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
                .exec(&db_tx)
                .await?;
            recipes::Entity::delete_by_id(recipe_id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::info!(recipe_id, "recipe deleted");
            Ok(())
        })
    }

    /// What the recipe's owner lacks to cook it.
    ///
    /// Holdings are summed across every fridge. Ingredients held in full are
    /// left out. Entries follow the ingredient order.
    pub async fn missing_ingredients(&self, recipe_id: &str) -> ResultEngine<Vec<Shortfall>> {
        with_tx!(self, |db_tx| {
            let recipe = self.require_recipe(&db_tx, recipe_id).await?;
            let ingredients = self.load_ingredients(&db_tx, recipe_id).await?;

            let mut missing = Vec::new();
            for ingredient in ingredients {
                let rows = stock::Entity::find()
                    .filter(stock::Column::ProductId.eq(ingredient.product_id.as_str()))
                    .filter(stock::Column::UserId.eq(recipe.user_id.as_str()))
                    .find_also_related(products::Entity)
                    .order_by_asc(stock::Column::FridgeId)
                    .all(&db_tx)
                    .await?;

                let held: i64 = rows.iter().map(|(row, _)| row.quantity).sum();
                let Some(amount) = missing_amount(ingredient.quantity, held) else {
                    continue;
                };
                let product = match rows.into_iter().find_map(|(_, product)| product) {
                    Some(product) => product,
                    None => {
                        self.require_product(&db_tx, &ingredient.product_id)
                            .await?
                    }
                };
                missing.push(Shortfall::new(Product::try_from(product)?, amount));
            }

            tracing::debug!(recipe_id, missing = missing.len(), "recipe reconciled");
            Ok(missing)
        })
    }
}
