mod common;

use common::{count_rows, deposit, engine_with_db};
use engine::{EngineError, Ingredient, ProductType, RecipeNewCmd, RecipePatch, Shortfall};

#[tokio::test]
async fn shortfall_reports_full_partial_and_nothing() {
    let (engine, _db) = engine_with_db().await;
    let flour = deposit(&engine, "bob", "f1", "Flour", 1, 1).await.product;
    let eggs = deposit(&engine, "alice", "f1", "Eggs", 1, 2).await.product;
    deposit(&engine, "alice", "f2", "Eggs", 1, 1).await;
    let milk = deposit(&engine, "alice", "f2", "Milk", 1, 9).await.product;

    let recipe = engine
        .new_recipe(
            RecipeNewCmd::new("alice", "Pancakes")
                .ingredient(flour.id.clone(), 6)
                .ingredient(eggs.id.clone(), 6)
                .ingredient(milk.id.clone(), 6),
        )
        .await
        .unwrap();

    let missing = engine.missing_ingredients(&recipe.id).await.unwrap();
    assert_eq!(missing.len(), 2);
    // Bob's flour does not count for Alice.
    assert!(missing.contains(&Shortfall::new(flour.clone(), 6)));
    assert!(missing.contains(&Shortfall::new(eggs.clone(), 3)));
    assert!(!missing.iter().any(|s| s.product_id == milk.id));

    let shortfall = missing.iter().find(|s| s.product_id == flour.id).unwrap();
    assert_eq!(shortfall.name, "Flour");
    assert_eq!(shortfall.kind, ProductType::Food);
    assert_eq!(shortfall.size, 1);
}

#[tokio::test]
async fn recipe_without_ingredients_misses_nothing() {
    let (engine, _db) = engine_with_db().await;
    let recipe = engine
        .new_recipe(RecipeNewCmd::new("alice", "Water").description("just water"))
        .await
        .unwrap();
    assert!(recipe.ingredients.is_empty());
    assert!(engine.missing_ingredients(&recipe.id).await.unwrap().is_empty());

    let err = engine.missing_ingredients("nope").await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("recipe not exists".to_string()));
}

#[tokio::test]
async fn non_positive_quantity_leaves_no_rows() {
    let (engine, db) = engine_with_db().await;
    let flour = deposit(&engine, "alice", "f1", "Flour", 1, 1).await.product;
    let eggs = deposit(&engine, "alice", "f1", "Eggs", 1, 1).await.product;

    let err = engine
        .new_recipe(
            RecipeNewCmd::new("alice", "Bread")
                .ingredient(flour.id.clone(), 2)
                .ingredient(eggs.id.clone(), 0),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::NotAcceptable("product quantity must be greater than 0".to_string())
    );
    assert_eq!(count_rows(&db, "recipes").await, 0);
    assert_eq!(count_rows(&db, "recipe_ingredients").await, 0);
}

#[tokio::test]
async fn duplicate_name_is_per_user() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_recipe(RecipeNewCmd::new("alice", "Soup"))
        .await
        .unwrap();

    let err = engine
        .new_recipe(RecipeNewCmd::new("alice", " Soup "))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("Soup".to_string()));

    engine
        .new_recipe(RecipeNewCmd::new("bob", "Soup"))
        .await
        .unwrap();
}

#[tokio::test]
async fn unknown_product_or_user_is_refused() {
    let (engine, db) = engine_with_db().await;
    let flour = deposit(&engine, "alice", "f1", "Flour", 1, 1).await.product;

    let err = engine
        .new_recipe(
            RecipeNewCmd::new("alice", "Bread")
                .ingredient(flour.id.clone(), 1)
                .ingredient("ghost-product", 1),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::NotAcceptable("one or more products do not exist".to_string())
    );

    let err = engine
        .new_recipe(RecipeNewCmd::new("ghost", "Bread"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("user not exists".to_string()));
    assert_eq!(count_rows(&db, "recipes").await, 0);
}

#[tokio::test]
async fn update_replaces_ingredients_wholesale() {
    let (engine, db) = engine_with_db().await;
    let flour = deposit(&engine, "alice", "f1", "Flour", 1, 1).await.product;
    let eggs = deposit(&engine, "alice", "f1", "Eggs", 1, 1).await.product;
    let recipe = engine
        .new_recipe(RecipeNewCmd::new("alice", "Bread").ingredient(flour.id.clone(), 3))
        .await
        .unwrap();
    engine
        .new_recipe(RecipeNewCmd::new("alice", "Cake"))
        .await
        .unwrap();

    let updated = engine
        .update_recipe(
            &recipe.id,
            RecipePatch::default()
                .description("crusty")
                .ingredients(vec![Ingredient::new(eggs.id.clone(), 2)]),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Bread");
    assert_eq!(updated.description, "crusty");
    assert_eq!(updated.ingredients, vec![Ingredient::new(eggs.id.clone(), 2)]);

    let err = engine
        .update_recipe(&recipe.id, RecipePatch::default().name("Cake"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("Cake".to_string()));

    // A refused replacement keeps the previous list.
    let err = engine
        .update_recipe(
            &recipe.id,
            RecipePatch::default().ingredients(vec![Ingredient::new(flour.id.clone(), -1)]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotAcceptable(_)));
    let unchanged = engine.recipe(&recipe.id).await.unwrap();
    assert_eq!(unchanged.ingredients, vec![Ingredient::new(eggs.id.clone(), 2)]);

    let cleared = engine
        .update_recipe(&recipe.id, RecipePatch::default().ingredients(Vec::new()))
        .await
        .unwrap();
    assert!(cleared.ingredients.is_empty());
    assert_eq!(count_rows(&db, "recipe_ingredients").await, 0);
}

#[tokio::test]
async fn list_search_and_delete() {
    let (engine, db) = engine_with_db().await;
    let flour = deposit(&engine, "alice", "f1", "Flour", 1, 1).await.product;
    let bread = engine
        .new_recipe(
            RecipeNewCmd::new("alice", "Bread")
                .description("Daily loaf")
                .ingredient(flour.id.clone(), 3),
        )
        .await
        .unwrap();
    engine
        .new_recipe(RecipeNewCmd::new("bob", "Salad"))
        .await
        .unwrap();

    assert_eq!(engine.list_recipes(None).await.unwrap().len(), 2);

    let found = engine.list_recipes(Some("LOAF")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, bread.id);
    assert_eq!(found[0].ingredients.len(), 1);

    engine.delete_recipe(&bread.id).await.unwrap();
    assert_eq!(count_rows(&db, "recipe_ingredients").await, 0);
    let err = engine.recipe(&bread.id).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("recipe not exists".to_string()));
}
