//! Fridge volume accounting.
//!
//! Occupied volume is fridge-scoped: every stock row in the fridge counts,
//! whoever owns it.

use sea_orm::{ConnectionTrait, DatabaseTransaction, Statement, TransactionTrait};

use crate::{EngineError, ResultEngine};

use super::{Engine, with_tx};

/// Whether `incoming` more volume fits on top of `used`. Filling the fridge
/// exactly to capacity is allowed.
pub(super) fn fits(capacity: i64, used: i64, incoming: i64) -> bool {
    used.checked_add(incoming)
        .is_some_and(|total| total <= capacity)
}

impl Engine {
    /// Sum of `size * quantity` over every stock row of the fridge.
    pub(super) async fn fridge_used_volume(
        &self,
        db: &DatabaseTransaction,
        fridge_id: &str,
    ) -> ResultEngine<i64> {
        let backend = db.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COALESCE(SUM(p.size * s.quantity), 0) AS used \
             FROM stock s \
             JOIN products p ON p.id = s.product_id \
             WHERE s.fridge_id = ?",
            vec![fridge_id.into()],
        );
        let row = db
            .query_one(stmt)
            .await?
            .ok_or_else(|| EngineError::Internal("volume query returned no row".to_string()))?;
        let used: i64 = row.try_get("", "used")?;
        Ok(used)
    }

    /// Whether `incoming_volume` more units of volume fit in the fridge.
    ///
    /// Fails with `KeyNotFound` when the fridge does not exist.
    pub async fn has_capacity(&self, fridge_id: &str, incoming_volume: i64) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let fridge = self.require_fridge(&db_tx, fridge_id).await?;
            let used = self.fridge_used_volume(&db_tx, fridge_id).await?;
            Ok(fits(fridge.capacity, used, incoming_volume))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::fits;

    #[test]
    fn exact_fill_is_allowed() {
        assert!(fits(100, 0, 100));
        assert!(fits(100, 99, 1));
    }

    #[test]
    fn overflow_is_rejected() {
        assert!(!fits(100, 100, 1));
        assert!(!fits(100, 60, 41));
    }

    #[test]
    fn arithmetic_overflow_is_rejected() {
        assert!(!fits(i64::MAX, 1, i64::MAX));
    }
}
