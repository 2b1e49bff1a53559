use sea_orm::{DatabaseTransaction, PaginatorTrait, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, fridges, products, recipes, users};

use super::Engine;

/// Generates a `require_*` method that loads a row by primary key or fails
/// with `KeyNotFound`.
macro_rules! impl_require {
    ($require_fn:ident, $entity:path, $model:path, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: &str,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require!(require_user, users::Entity, users::Model, "user not exists");

    impl_require!(
        require_fridge,
        fridges::Entity,
        fridges::Model,
        "fridge not exists"
    );

    impl_require!(
        require_product,
        products::Entity,
        products::Model,
        "product not exists"
    );

    impl_require!(
        require_recipe,
        recipes::Entity,
        recipes::Model,
        "recipe not exists"
    );

    /// Check the two parties of a gift.
    ///
    /// Self-gifts are refused before touching the database, so they fail even
    /// for unknown users. Both users are then looked up together.
    pub(super) async fn require_gift_parties(
        &self,
        db: &DatabaseTransaction,
        sender_id: &str,
        receiver_id: &str,
    ) -> ResultEngine<()> {
        if sender_id == receiver_id {
            return Err(EngineError::NotAcceptable(
                "sender and receiver cannot be the same user".to_string(),
            ));
        }

        let found = users::Entity::find()
            .filter(users::Column::Id.is_in([sender_id.to_string(), receiver_id.to_string()]))
            .count(db)
            .await?;
        if found == 2 {
            return Ok(());
        }

        let sender_found = users::Entity::find_by_id(sender_id.to_string())
            .one(db)
            .await?
            .is_some();
        let missing = if sender_found { "receiver" } else { "sender" };
        Err(EngineError::KeyNotFound(format!("{missing} not exists")))
    }
}
