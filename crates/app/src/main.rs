use std::error::Error;

use clap::Parser;
use engine::{
    DepositCmd, Engine, FridgeNewCmd, RecipeNewCmd, RecipePatch, StockFilter, UserNewCmd,
    UserPatch, WithdrawCmd,
};
use migration::{Migrator, MigratorTrait};
use serde::Serialize;

use cli::{
    Cli, Command, FridgeCommand, GiftCommand, RecipeCommand, StockCommand, UserCommand,
};

mod cli;
mod seed;
mod settings;

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(
        cli.config.as_deref(),
        cli.level.as_deref(),
        cli.database_url.as_deref(),
    )?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "fridgeshare={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let db = connect_db(&settings.database).await?;
    let engine = Engine::builder().database(db).build().await?;

    if let Err(err) = run(&engine, cli.command).await {
        tracing::error!("{err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn connect_db(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, BoxError> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

fn print<T: Serialize>(value: &T) -> Result<(), BoxError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(engine: &Engine, command: Command) -> Result<(), BoxError> {
    match command {
        Command::User(user) => run_user(engine, user.command).await,
        Command::Fridge(fridge) => run_fridge(engine, fridge.command).await,
        Command::Stock(stock) => run_stock(engine, stock.command).await,
        Command::Gift(gift) => run_gift(engine, gift.command).await,
        Command::Recipe(recipe) => run_recipe(engine, recipe.command).await,
        Command::Seed => print(&seed::seed(engine).await?),
    }
}

async fn run_user(engine: &Engine, command: UserCommand) -> Result<(), BoxError> {
    match command {
        UserCommand::Create {
            email,
            first_name,
            last_name,
            id,
        } => {
            let mut cmd = UserNewCmd::new(email, first_name, last_name);
            if let Some(id) = id {
                cmd = cmd.id(id);
            }
            print(&engine.new_user(cmd).await?)
        }
        UserCommand::Show { id } => print(&engine.user(&id).await?),
        UserCommand::List { search } => print(&engine.list_users(search.as_deref()).await?),
        UserCommand::Update {
            id,
            email,
            first_name,
            last_name,
        } => {
            let patch = UserPatch {
                email,
                first_name,
                last_name,
            };
            print(&engine.update_user(&id, patch).await?)
        }
        UserCommand::Delete { id } => {
            engine.delete_user(&id).await?;
            print(&serde_json::json!({ "deleted": id }))
        }
    }
}

async fn run_fridge(engine: &Engine, command: FridgeCommand) -> Result<(), BoxError> {
    match command {
        FridgeCommand::Create {
            location,
            capacity,
            id,
        } => {
            let mut cmd = FridgeNewCmd::new(location, capacity);
            if let Some(id) = id {
                cmd = cmd.id(id);
            }
            print(&engine.new_fridge(cmd).await?)
        }
        FridgeCommand::Show { id } => print(&engine.fridge(&id).await?),
        FridgeCommand::List { location } => print(&engine.list_fridges(location).await?),
        FridgeCommand::Usage { id } => print(&engine.fridge_usage(&id).await?),
    }
}

async fn run_stock(engine: &Engine, command: StockCommand) -> Result<(), BoxError> {
    match command {
        StockCommand::Deposit {
            user,
            fridge,
            product,
            name,
            kind,
            size,
            amount,
        } => {
            let cmd = match (product, name, kind, size) {
                (Some(product), _, _, _) => DepositCmd::new(user, fridge, product, amount),
                (None, Some(name), Some(kind), Some(size)) => {
                    DepositCmd::product(user, fridge, name, kind, size, amount)
                }
                _ => return Err("either --product or --name/--kind/--size is required".into()),
            };
            print(&engine.deposit(cmd).await?)
        }
        StockCommand::Withdraw {
            user,
            fridge,
            product,
            amount,
        } => {
            let cmd = WithdrawCmd::new(user, fridge, product, amount);
            print(&engine.withdraw(cmd).await?)
        }
        StockCommand::Clear { user, fridge } => {
            let deleted = engine.clear_user(&user, fridge.as_deref()).await?;
            print(&serde_json::json!({ "deleted": deleted }))
        }
        StockCommand::List {
            user,
            fridge,
            location,
        } => {
            let filter = StockFilter {
                fridge_id: fridge,
                location,
            };
            print(&engine.list_for_user(&user, &filter).await?)
        }
        StockCommand::Holdings { user, product } => {
            print(&engine.product_holdings(&product, &user).await?)
        }
        StockCommand::Product { id } => print(&engine.product(&id).await?),
    }
}

async fn run_gift(engine: &Engine, command: GiftCommand) -> Result<(), BoxError> {
    match command {
        GiftCommand::One { product, from, to } => {
            print(&engine.gift_one(&product, &from, &to).await?)
        }
        GiftCommand::Fridge { from, to, fridge } => {
            print(&engine.gift_fridge(&from, &to, fridge.as_deref()).await?)
        }
    }
}

async fn run_recipe(engine: &Engine, command: RecipeCommand) -> Result<(), BoxError> {
    match command {
        RecipeCommand::Create {
            user,
            name,
            description,
            ingredients,
        } => {
            let mut cmd = RecipeNewCmd::new(user, name).description(description);
            cmd.ingredients = ingredients;
            print(&engine.new_recipe(cmd).await?)
        }
        RecipeCommand::Show { id } => print(&engine.recipe(&id).await?),
        RecipeCommand::List { search } => print(&engine.list_recipes(search.as_deref()).await?),
        RecipeCommand::Update {
            id,
            name,
            description,
            ingredients,
            clear_ingredients,
        } => {
            let ingredients = if clear_ingredients {
                Some(Vec::new())
            } else if ingredients.is_empty() {
                None
            } else {
                Some(ingredients)
            };
            let patch = RecipePatch {
                name,
                description,
                ingredients,
            };
            print(&engine.update_recipe(&id, patch).await?)
        }
        RecipeCommand::Delete { id } => {
            engine.delete_recipe(&id).await?;
            print(&serde_json::json!({ "deleted": id }))
        }
        RecipeCommand::Missing { id } => print(&engine.missing_ingredients(&id).await?),
    }
}
