//! Reference data: the building's fridges and two demo users.

use engine::{Engine, EngineError, FridgeNewCmd, UserNewCmd};
use serde::Serialize;

/// `(id, location, capacity)`
const FRIDGES: [(&str, i32, i64); 7] = [
    ("1", 1, 100),
    ("2", 1, 50),
    ("3", 2, 80),
    ("4", 3, 100),
    ("5", 3, 50),
    ("6", 4, 100),
    ("7", 4, 200),
];

/// `(id, email, first name, last name)`
const USERS: [(&str, &str, &str, &str); 2] = [
    ("1", "a@a.com", "John", "Doe"),
    ("2", "b@b.com", "Jane", "Doe"),
];

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub fridges_created: usize,
    pub users_created: usize,
}

/// Insert the reference rows that are missing. Existing rows are left as they
/// are, so seeding twice is harmless.
pub async fn seed(engine: &Engine) -> Result<SeedReport, EngineError> {
    let mut report = SeedReport::default();

    for (id, location, capacity) in FRIDGES {
        match engine
            .new_fridge(FridgeNewCmd::new(location, capacity).id(id))
            .await
        {
            Ok(_) => report.fridges_created += 1,
            Err(EngineError::ExistingKey(_)) => {
                tracing::debug!(fridge_id = id, "fridge already seeded");
            }
            Err(err) => return Err(err),
        }
    }

    for (id, email, first_name, last_name) in USERS {
        match engine
            .new_user(UserNewCmd::new(email, first_name, last_name).id(id))
            .await
        {
            Ok(_) => report.users_created += 1,
            Err(EngineError::ExistingKey(_)) => {
                tracing::debug!(user_id = id, "user already seeded");
            }
            Err(err) => return Err(err),
        }
    }

    tracing::info!(
        fridges = report.fridges_created,
        users = report.users_created,
        "seed done"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use migration::MigratorTrait;
    use sea_orm::Database;

    use super::*;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build().await.unwrap();

        let first = seed(&engine).await.unwrap();
        assert_eq!(
            first,
            SeedReport {
                fridges_created: 7,
                users_created: 2,
            }
        );

        let second = seed(&engine).await.unwrap();
        assert_eq!(second, SeedReport::default());

        assert_eq!(engine.list_fridges(Some(4)).await.unwrap().len(), 2);
        assert_eq!(engine.fridge("7").await.unwrap().capacity, 200);
        assert_eq!(engine.user("2").await.unwrap().first_name, "Jane");
    }
}
