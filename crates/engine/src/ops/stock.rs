use sea_orm::{
    ActiveValue, DatabaseTransaction, JoinType, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    DepositCmd, EngineError, Product, ProductRef, ProductType, ResultEngine, StockEntry,
    WithdrawCmd, Withdrawal, fridges, products, stock,
    util::{ensure_positive, normalize_required_name},
};

use super::{Engine, capacity::fits, with_tx};

/// Narrows [`Engine::list_for_user`].
#[derive(Clone, Debug, Default)]
pub struct StockFilter {
    /// Only rows in this fridge. The fridge must exist.
    pub fridge_id: Option<String>,
    /// Only rows in fridges at this location.
    pub location: Option<i32>,
}

impl StockFilter {
    #[must_use]
    pub fn fridge(mut self, fridge_id: impl Into<String>) -> Self {
        self.fridge_id = Some(fridge_id.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: i32) -> Self {
        self.location = Some(location);
        self
    }
}

/// Join stock rows with their products.
pub(super) fn into_entries(
    rows: Vec<(stock::Model, Option<products::Model>)>,
) -> ResultEngine<Vec<StockEntry>> {
    rows.into_iter()
        .map(|(row, product)| {
            let product = product.ok_or_else(|| {
                EngineError::Internal(format!("stock row without product {}", row.product_id))
            })?;
            StockEntry::try_from((row, product))
        })
        .collect()
}

impl Engine {
    /// Find the product with this triple, creating it when missing.
    async fn upsert_product(
        &self,
        db: &DatabaseTransaction,
        name: &str,
        kind: ProductType,
        size: i64,
    ) -> ResultEngine<products::Model> {
        let existing = products::Entity::find()
            .filter(products::Column::Name.eq(name))
            .filter(products::Column::Kind.eq(kind.as_str()))
            .filter(products::Column::Size.eq(size))
            .one(db)
            .await?;
        if let Some(model) = existing {
            return Ok(model);
        }

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            kind,
            size,
        };
        let model = products::ActiveModel::from(&product).insert(db).await?;
        tracing::info!(product_id = %model.id, name, "product created");
        Ok(model)
    }

    /// Add `amount` to the `(product, fridge, user)` row, creating it when
    /// missing. Returns the new quantity.
    pub(super) async fn add_stock(
        &self,
        db: &DatabaseTransaction,
        product_id: &str,
        fridge_id: &str,
        user_id: &str,
        amount: i64,
    ) -> ResultEngine<i64> {
        let key = (
            product_id.to_string(),
            fridge_id.to_string(),
            user_id.to_string(),
        );
        match stock::Entity::find_by_id(key).one(db).await? {
            Some(row) => {
                let updated = stock::Entity::update_many()
                    .col_expr(
                        stock::Column::Quantity,
                        Expr::col(stock::Column::Quantity).add(amount),
                    )
                    .filter(stock::Column::ProductId.eq(product_id))
                    .filter(stock::Column::FridgeId.eq(fridge_id))
                    .filter(stock::Column::UserId.eq(user_id))
                    .exec(db)
                    .await?
                    .rows_affected;
                if updated == 0 {
                    return Err(EngineError::Internal(
                        "stock increment touched no row".to_string(),
                    ));
                }
                Ok(row.quantity + amount)
            }
            None => {
                stock::ActiveModel {
                    product_id: ActiveValue::Set(product_id.to_string()),
                    fridge_id: ActiveValue::Set(fridge_id.to_string()),
                    user_id: ActiveValue::Set(user_id.to_string()),
                    quantity: ActiveValue::Set(amount),
                }
                .insert(db)
                .await?;
                Ok(amount)
            }
        }
    }

    /// Put units of a product in a fridge for a user.
    ///
    /// The product is either an existing id or a `(name, kind, size)` triple
    /// that is created on first use. The deposit is refused with
    /// `CapacityExceeded` when the fridge volume, across all owners, would go
    /// past its capacity. On refusal nothing is written, not even a newly
    /// named product.
    pub async fn deposit(&self, cmd: DepositCmd) -> ResultEngine<StockEntry> {
        ensure_positive(cmd.amount, "amount")?;
        let product_ref = match cmd.product {
            ProductRef::Triple { name, kind, size } => {
                ensure_positive(size, "size")?;
                ProductRef::Triple {
                    name: normalize_required_name(&name, "product name")?,
                    kind,
                    size,
                }
            }
            by_id => by_id,
        };

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, &cmd.user_id).await?;
            let product = match &product_ref {
                ProductRef::Id(id) => self.require_product(&db_tx, id).await?,
                ProductRef::Triple { name, kind, size } => {
                    self.upsert_product(&db_tx, name, *kind, *size).await?
                }
            };
            let fridge = self.require_fridge(&db_tx, &cmd.fridge_id).await?;

            let used = self.fridge_used_volume(&db_tx, &fridge.id).await?;
            let incoming = product.size.checked_mul(cmd.amount).ok_or_else(|| {
                EngineError::InvalidAmount("deposit volume out of range".to_string())
            })?;
            if !fits(fridge.capacity, used, incoming) {
                return Err(EngineError::CapacityExceeded(format!(
                    "not enough space in fridge {}: {used} of {} used, {incoming} requested",
                    fridge.id, fridge.capacity
                )));
            }

            let quantity = self
                .add_stock(&db_tx, &product.id, &fridge.id, &cmd.user_id, cmd.amount)
                .await?;
            tracing::info!(
                user_id = %cmd.user_id,
                fridge_id = %fridge.id,
                product_id = %product.id,
                amount = cmd.amount,
                quantity,
                "stock deposited"
            );

            Ok(StockEntry {
                product: Product::try_from(product)?,
                fridge_id: fridge.id,
                user_id: cmd.user_id.clone(),
                quantity,
            })
        })
    }

    /// Take units of a product out of a fridge.
    ///
    /// A row holding no more than `amount` is deleted, so over-withdrawing is
    /// absorbed. A larger row is decremented in place. Fails with
    /// `KeyNotFound` when the row does not exist.
    pub async fn withdraw(&self, cmd: WithdrawCmd) -> ResultEngine<Withdrawal> {
        ensure_positive(cmd.amount, "amount")?;
        with_tx!(self, |db_tx| {
            let deleted = stock::Entity::delete_many()
                .filter(stock::Column::ProductId.eq(cmd.product_id.as_str()))
                .filter(stock::Column::FridgeId.eq(cmd.fridge_id.as_str()))
                .filter(stock::Column::UserId.eq(cmd.user_id.as_str()))
                .filter(stock::Column::Quantity.lte(cmd.amount))
                .exec(&db_tx)
                .await?
                .rows_affected;

            let outcome = if deleted > 0 {
                Withdrawal::Cleared
            } else {
                let updated = stock::Entity::update_many()
                    .col_expr(
                        stock::Column::Quantity,
                        Expr::col(stock::Column::Quantity).sub(cmd.amount),
                    )
                    .filter(stock::Column::ProductId.eq(cmd.product_id.as_str()))
                    .filter(stock::Column::FridgeId.eq(cmd.fridge_id.as_str()))
                    .filter(stock::Column::UserId.eq(cmd.user_id.as_str()))
                    .exec(&db_tx)
                    .await?
                    .rows_affected;
                if updated == 0 {
                    return Err(EngineError::KeyNotFound(
                        "no product found to withdraw".to_string(),
                    ));
                }
                let key = (
                    cmd.product_id.clone(),
                    cmd.fridge_id.clone(),
                    cmd.user_id.clone(),
                );
                let row = stock::Entity::find_by_id(key)
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| {
                        EngineError::Internal("stock row missing after withdraw".to_string())
                    })?;
                Withdrawal::Reduced {
                    remaining: row.quantity,
                }
            };

            tracing::info!(
                user_id = %cmd.user_id,
                fridge_id = %cmd.fridge_id,
                product_id = %cmd.product_id,
                amount = cmd.amount,
                ?outcome,
                "stock withdrawn"
            );
            Ok(outcome)
        })
    }

    /// Delete every stock row of a user, optionally only in one fridge.
    ///
    /// Returns the number of deleted rows. Clearing nothing is a `KeyNotFound`.
    pub async fn clear_user(&self, user_id: &str, fridge_id: Option<&str>) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            if let Some(fridge_id) = fridge_id {
                self.require_fridge(&db_tx, fridge_id).await?;
            }

            let mut delete = stock::Entity::delete_many().filter(stock::Column::UserId.eq(user_id));
            if let Some(fridge_id) = fridge_id {
                delete = delete.filter(stock::Column::FridgeId.eq(fridge_id));
            }
            let deleted = delete.exec(&db_tx).await?.rows_affected;
            if deleted == 0 {
                return Err(EngineError::KeyNotFound("no products to clear".to_string()));
            }

            tracing::info!(user_id, ?fridge_id, deleted, "stock cleared");
            Ok(deleted)
        })
    }

    /// Stock rows of a user, ordered by fridge then product.
    ///
    /// An empty result is a `KeyNotFound`, with a message naming the location
    /// when the location filter emptied it.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        filter: &StockFilter,
    ) -> ResultEngine<Vec<StockEntry>> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            if let Some(fridge_id) = filter.fridge_id.as_deref() {
                self.require_fridge(&db_tx, fridge_id).await?;
            }

            let mut query = stock::Entity::find().filter(stock::Column::UserId.eq(user_id));
            if let Some(fridge_id) = filter.fridge_id.as_deref() {
                query = query.filter(stock::Column::FridgeId.eq(fridge_id));
            }
            if let Some(location) = filter.location {
                query = query
                    .join(JoinType::InnerJoin, stock::Relation::Fridge.def())
                    .filter(fridges::Column::Location.eq(location));
            }
            let rows = query
                .find_also_related(products::Entity)
                .order_by_asc(stock::Column::FridgeId)
                .order_by_asc(stock::Column::ProductId)
                .all(&db_tx)
                .await?;

            if rows.is_empty() {
                let reason = match filter.location {
                    Some(location) => format!("no products found in fridge at location: {location}"),
                    None => "no products found in this fridge".to_string(),
                };
                return Err(EngineError::KeyNotFound(reason));
            }
            tracing::debug!(user_id, rows = rows.len(), "stock listed");
            into_entries(rows)
        })
    }

    /// Canonical product by id.
    pub async fn product(&self, product_id: &str) -> ResultEngine<Product> {
        with_tx!(self, |db_tx| {
            let model = self.require_product(&db_tx, product_id).await?;
            Product::try_from(model)
        })
    }

    /// Every stock row a user holds of one product, across fridges.
    pub async fn product_holdings(
        &self,
        product_id: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<StockEntry>> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let rows = stock::Entity::find()
                .filter(stock::Column::ProductId.eq(product_id))
                .filter(stock::Column::UserId.eq(user_id))
                .find_also_related(products::Entity)
                .order_by_asc(stock::Column::FridgeId)
                .all(&db_tx)
                .await?;
            if rows.is_empty() {
                return Err(EngineError::KeyNotFound("product not found".to_string()));
            }
            into_entries(rows)
        })
    }
}
