//! Gifts move stock ownership between users. Rows stay in the fridge they
//! were in, so fridge volume never changes and capacity is not re-checked.

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, StockEntry, products, stock};

use super::{Engine, stock::into_entries, with_tx};

impl Engine {
    /// Give all of the sender's units of one product to the receiver.
    ///
    /// Every fridge the sender holds the product in is transferred, each to the
    /// receiver's row in that same fridge. Returns the receiver's rows after the
    /// gift.
    pub async fn gift_one(
        &self,
        product_id: &str,
        sender_id: &str,
        receiver_id: &str,
    ) -> ResultEngine<Vec<StockEntry>> {
        with_tx!(self, |db_tx| {
            self.require_gift_parties(&db_tx, sender_id, receiver_id)
                .await?;

            let rows = stock::Entity::find()
                .filter(stock::Column::ProductId.eq(product_id))
                .filter(stock::Column::UserId.eq(sender_id))
                .find_also_related(products::Entity)
                .order_by_asc(stock::Column::FridgeId)
                .all(&db_tx)
                .await?;
            if rows.is_empty() {
                return Err(EngineError::KeyNotFound(
                    "product not found in sender's fridges".to_string(),
                ));
            }

            let mut received = into_entries(rows)?;
            for entry in &mut received {
                entry.quantity = self
                    .add_stock(
                        &db_tx,
                        &entry.product.id,
                        &entry.fridge_id,
                        receiver_id,
                        entry.quantity,
                    )
                    .await?;
                entry.user_id = receiver_id.to_string();
            }

            let deleted = stock::Entity::delete_many()
                .filter(stock::Column::ProductId.eq(product_id))
                .filter(stock::Column::UserId.eq(sender_id))
                .exec(&db_tx)
                .await?
                .rows_affected;
            if deleted == 0 {
                return Err(EngineError::Internal(
                    "sender stock vanished during gift".to_string(),
                ));
            }

            tracing::info!(
                product_id,
                sender_id,
                receiver_id,
                fridges = deleted,
                "product gifted"
            );
            Ok(received)
        })
    }

    /// Give everything the sender holds, optionally only in one fridge.
    ///
    /// Returns the receiver's rows touched by the gift.
    pub async fn gift_fridge(
        &self,
        sender_id: &str,
        receiver_id: &str,
        fridge_id: Option<&str>,
    ) -> ResultEngine<Vec<StockEntry>> {
        with_tx!(self, |db_tx| {
            self.require_gift_parties(&db_tx, sender_id, receiver_id)
                .await?;
            if let Some(fridge_id) = fridge_id {
                self.require_fridge(&db_tx, fridge_id).await?;
            }

            let mut query = stock::Entity::find().filter(stock::Column::UserId.eq(sender_id));
            if let Some(fridge_id) = fridge_id {
                query = query.filter(stock::Column::FridgeId.eq(fridge_id));
            }
            let rows = query
                .find_also_related(products::Entity)
                .order_by_asc(stock::Column::FridgeId)
                .order_by_asc(stock::Column::ProductId)
                .all(&db_tx)
                .await?;
            if rows.is_empty() {
                return Err(EngineError::KeyNotFound(
                    "no products found in fridge(s)".to_string(),
                ));
            }

            let mut received = into_entries(rows)?;
            for entry in &mut received {
                let quantity = self
                    .add_stock(
                        &db_tx,
                        &entry.product.id,
                        &entry.fridge_id,
                        receiver_id,
                        entry.quantity,
                    )
                    .await?;

                let key = (
                    entry.product.id.clone(),
                    entry.fridge_id.clone(),
                    sender_id.to_string(),
                );
                let deleted = stock::Entity::delete_by_id(key)
                    .exec(&db_tx)
                    .await?
                    .rows_affected;
                if deleted == 0 {
                    return Err(EngineError::Internal(
                        "sender stock vanished during gift".to_string(),
                    ));
                }

                entry.quantity = quantity;
                entry.user_id = receiver_id.to_string();
            }

            tracing::info!(
                sender_id,
                receiver_id,
                ?fridge_id,
                rows = received.len(),
                "fridge gifted"
            );
            Ok(received)
        })
    }
}
