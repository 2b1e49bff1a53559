use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, IntoActiveModel, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{
    EngineError, ResultEngine, User, UserNewCmd, UserPatch, recipe_ingredients, recipes, stock,
    users,
    util::{id_or_new, normalize_required_name, normalize_text, search_pattern},
};

use super::{Engine, with_tx};

impl Engine {
    /// Fail with `ExistingKey` when another user already has this email.
    async fn ensure_email_free(
        &self,
        db: &DatabaseTransaction,
        email: &str,
        except_id: Option<&str>,
    ) -> ResultEngine<()> {
        let mut query =
            users::Entity::find().filter(Expr::cust("LOWER(email)").eq(email.to_lowercase()));
        if let Some(id) = except_id {
            query = query.filter(users::Column::Id.ne(id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(email.to_string()));
        }
        Ok(())
    }

    /// Register a user. Emails are unique, compared case-insensitively.
    pub async fn new_user(&self, cmd: UserNewCmd) -> ResultEngine<User> {
        let email = normalize_required_name(&cmd.email, "email")?;
        let id = id_or_new(cmd.id.as_deref())?;
        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(id.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(id));
            }
            self.ensure_email_free(&db_tx, &email, None).await?;

            let model = users::ActiveModel {
                id: ActiveValue::Set(id),
                email: ActiveValue::Set(email),
                first_name: ActiveValue::Set(normalize_text(&cmd.first_name)),
                last_name: ActiveValue::Set(normalize_text(&cmd.last_name)),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(user_id = %model.id, "user created");
            Ok(User::from(model))
        })
    }

    pub async fn user(&self, user_id: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            Ok(User::from(model))
        })
    }

    /// Users, newest first. `search` matches email, first or last name,
    /// ignoring case.
    pub async fn list_users(&self, search: Option<&str>) -> ResultEngine<Vec<User>> {
        with_tx!(self, |db_tx| {
            let mut query = users::Entity::find();
            if let Some(pattern) = search_pattern(search) {
                query = query.filter(
                    Condition::any()
                        .add(Expr::cust_with_values(
                            "LOWER(email) LIKE ?",
                            [pattern.clone()],
                        ))
                        .add(Expr::cust_with_values(
                            "LOWER(first_name) LIKE ?",
                            [pattern.clone()],
                        ))
                        .add(Expr::cust_with_values("LOWER(last_name) LIKE ?", [pattern])),
                );
            }
            let models = query
                .order_by_desc(users::Column::CreatedAt)
                .order_by_desc(users::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(User::from).collect())
        })
    }

    /// Apply the fields set in `patch`.
    pub async fn update_user(&self, user_id: &str, patch: UserPatch) -> ResultEngine<User> {
        let email = patch
            .email
            .as_deref()
            .map(|email| normalize_required_name(email, "email"))
            .transpose()?;
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            if let Some(email) = email.as_deref() {
                self.ensure_email_free(&db_tx, email, Some(user_id)).await?;
            }

            let changed =
                email.is_some() || patch.first_name.is_some() || patch.last_name.is_some();
            let model = if changed {
                let mut active = model.into_active_model();
                if let Some(email) = email {
                    active.email = ActiveValue::Set(email);
                }
                if let Some(first_name) = patch.first_name.as_deref() {
                    active.first_name = ActiveValue::Set(normalize_text(first_name));
                }
                if let Some(last_name) = patch.last_name.as_deref() {
                    active.last_name = ActiveValue::Set(normalize_text(last_name));
                }
                let model = active.update(&db_tx).await?;
                tracing::info!(user_id, "user updated");
                model
            } else {
                model
            };
            Ok(User::from(model))
        })
    }

    /// Remove a user together with their stock, recipes and recipe
    /// ingredients.
    pub async fn delete_user(&self, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;

            let recipe_ids: Vec<String> = recipes::Entity::find()
                .select_only()
                .column(recipes::Column::Id)
                .filter(recipes::Column::UserId.eq(user_id))
                .into_tuple()
                .all(&db_tx)
                .await?;
            if !recipe_ids.is_empty() {
                recipe_ingredients::Entity::delete_many()
                    .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids))
                    .exec(&db_tx)
                    .await?;
            }
            recipes::Entity::delete_many()
                .filter(recipes::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            let stock_rows = stock::Entity::delete_many()
                .filter(stock::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?
                .rows_affected;
            users::Entity::delete_by_id(user_id.to_string())
                .exec(&db_tx)
                .await?;

            tracing::info!(user_id, stock_rows, "user deleted");
            Ok(())
        })
    }
}
