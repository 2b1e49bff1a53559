use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, Fridge, FridgeNewCmd, FridgeUsage, ResultEngine, fridges, util::id_or_new,
};

use super::{Engine, with_tx};

impl Engine {
    /// Register a fridge. Fridges are reference data and are never changed
    /// by stock operations.
    pub async fn new_fridge(&self, cmd: FridgeNewCmd) -> ResultEngine<Fridge> {
        if cmd.capacity < 0 {
            return Err(EngineError::InvalidAmount(
                "capacity must be >= 0".to_string(),
            ));
        }
        let id = id_or_new(cmd.id.as_deref())?;
        with_tx!(self, |db_tx| {
            if fridges::Entity::find_by_id(id.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(id));
            }

            let model = fridges::ActiveModel {
                id: ActiveValue::Set(id),
                location: ActiveValue::Set(cmd.location),
                capacity: ActiveValue::Set(cmd.capacity),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(fridge_id = %model.id, location = model.location, "fridge created");
            Ok(Fridge::from(model))
        })
    }

    pub async fn fridge(&self, fridge_id: &str) -> ResultEngine<Fridge> {
        with_tx!(self, |db_tx| {
            let model = self.require_fridge(&db_tx, fridge_id).await?;
            Ok(Fridge::from(model))
        })
    }

    /// Fridges ordered by location then id.
    pub async fn list_fridges(&self, location: Option<i32>) -> ResultEngine<Vec<Fridge>> {
        with_tx!(self, |db_tx| {
            let mut query = fridges::Entity::find();
            if let Some(location) = location {
                query = query.filter(fridges::Column::Location.eq(location));
            }
            let models = query
                .order_by_asc(fridges::Column::Location)
                .order_by_asc(fridges::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Fridge::from).collect())
        })
    }

    /// Occupied and free volume of a fridge.
    pub async fn fridge_usage(&self, fridge_id: &str) -> ResultEngine<FridgeUsage> {
        with_tx!(self, |db_tx| {
            let model = self.require_fridge(&db_tx, fridge_id).await?;
            let used = self.fridge_used_volume(&db_tx, fridge_id).await?;
            Ok(FridgeUsage::new(Fridge::from(model), used))
        })
    }
}
