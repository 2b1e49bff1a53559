use clap::{Args, Parser, Subcommand};
use engine::{Ingredient, ProductType};

#[derive(Parser, Debug)]
#[command(name = "fridgeshare")]
#[command(about = "Shared fridge inventory: stock, gifts and recipes")]
pub struct Cli {
    /// Optional config file path (TOML). Defaults to `settings.toml` if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Database connection string, overriding the configured database.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Log level, overriding the configured one.
    #[arg(long)]
    pub level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    User(User),
    Fridge(Fridge),
    Stock(Stock),
    Gift(Gift),
    Recipe(Recipe),
    /// Load the reference fridges and demo users.
    Seed,
}

#[derive(Args, Debug)]
pub struct User {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        id: Option<String>,
    },
    Show {
        id: String,
    },
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct Fridge {
    #[command(subcommand)]
    pub command: FridgeCommand,
}

#[derive(Subcommand, Debug)]
pub enum FridgeCommand {
    Create {
        #[arg(long)]
        location: i32,
        #[arg(long)]
        capacity: i64,
        #[arg(long)]
        id: Option<String>,
    },
    Show {
        id: String,
    },
    List {
        #[arg(long)]
        location: Option<i32>,
    },
    /// Occupied and free volume.
    Usage {
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct Stock {
    #[command(subcommand)]
    pub command: StockCommand,
}

#[derive(Subcommand, Debug)]
pub enum StockCommand {
    /// Put a product in a fridge, by id or by name/kind/size.
    Deposit {
        #[arg(long)]
        user: String,
        #[arg(long)]
        fridge: String,
        #[arg(long, conflicts_with_all = ["name", "kind", "size"])]
        product: Option<String>,
        #[arg(long, requires_all = ["kind", "size"])]
        name: Option<String>,
        #[arg(long, value_parser = parse_kind)]
        kind: Option<ProductType>,
        #[arg(long)]
        size: Option<i64>,
        #[arg(long)]
        amount: i64,
    },
    Withdraw {
        #[arg(long)]
        user: String,
        #[arg(long)]
        fridge: String,
        #[arg(long)]
        product: String,
        #[arg(long)]
        amount: i64,
    },
    /// Remove all of a user's stock, optionally in one fridge.
    Clear {
        #[arg(long)]
        user: String,
        #[arg(long)]
        fridge: Option<String>,
    },
    List {
        #[arg(long)]
        user: String,
        #[arg(long)]
        fridge: Option<String>,
        #[arg(long)]
        location: Option<i32>,
    },
    /// Where a user keeps a product.
    Holdings {
        #[arg(long)]
        user: String,
        #[arg(long)]
        product: String,
    },
    Product {
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct Gift {
    #[command(subcommand)]
    pub command: GiftCommand,
}

#[derive(Subcommand, Debug)]
pub enum GiftCommand {
    /// Give all units of one product.
    One {
        #[arg(long)]
        product: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Give everything, optionally only in one fridge.
    Fridge {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        fridge: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct Recipe {
    #[command(subcommand)]
    pub command: RecipeCommand,
}

#[derive(Subcommand, Debug)]
pub enum RecipeCommand {
    Create {
        #[arg(long)]
        user: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// `PRODUCT_ID=QUANTITY`, repeatable.
        #[arg(long = "ingredient", value_parser = parse_ingredient)]
        ingredients: Vec<Ingredient>,
    },
    Show {
        id: String,
    },
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replaces the whole list. `PRODUCT_ID=QUANTITY`, repeatable.
        #[arg(long = "ingredient", value_parser = parse_ingredient)]
        ingredients: Vec<Ingredient>,
        /// Remove every ingredient.
        #[arg(long, conflicts_with = "ingredients")]
        clear_ingredients: bool,
    },
    Delete {
        id: String,
    },
    /// What the owner lacks to cook the recipe.
    Missing {
        id: String,
    },
}

fn parse_kind(raw: &str) -> Result<ProductType, String> {
    ProductType::try_from(raw).map_err(|err| err.to_string())
}

fn parse_ingredient(raw: &str) -> Result<Ingredient, String> {
    let (product_id, quantity) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PRODUCT_ID=QUANTITY, got {raw}"))?;
    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("invalid quantity in {raw}: {err}"))?;
    Ok(Ingredient::new(product_id.trim(), quantity))
}
