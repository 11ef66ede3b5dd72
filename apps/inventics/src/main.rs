//! # InvenTICS Command Line
//!
//! Local front end over the same commands the UI uses. Every command prints
//! its result as pretty JSON.
//!
//! ## Usage
//! ```bash
//! inventics add --name "Arroz blanco" --category Granos --supplier "Molinos" \
//!     --quantity 120 --unit unidades --cost 180 --price 250 \
//!     --entry 2025-03-01 --expiry 2025-09-01
//! inventics move <product-id> salida 5 --reason "Venta mostrador"
//! inventics edit <product-id> --quantity 4
//! inventics dashboard
//! inventics chat "¿Cuánto arroz queda?"
//! ```
//!
//! `--config` points at an `inventics.toml`; environment variables
//! (`INVENTICS_DB_PATH`, `GEMINI_API_KEY`, ...) override it.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use inventics::commands::{assistant, dashboard, movement, product};
use inventics::error::Outcome;
use inventics::state::AppState;
use inventics::{bootstrap, init_tracing, load_config};
use inventics_ai::AspectRatio;
use inventics_core::{MovementRequest, MovementType, ProductInput, Unit};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "inventics", version, about = "InvenTICS inventory backend")]
struct Cli {
    /// Path to inventics.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// User recorded on movements (defaults to the configured user)
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List active products (5 per page)
    List {
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show one product by id or code
    Show { id_or_code: String },
    /// Create a product with the next sequential code
    Add(NewProduct),
    /// Edit a product; omitted fields keep their stored value
    Edit {
        id: String,
        #[command(flatten)]
        changes: ProductChanges,
    },
    /// Soft-delete a product
    Delete { id: String },
    /// Register an inbound (entrada) or outbound (salida) movement
    Move {
        product_id: String,
        movement_type: MovementType,
        quantity: i64,
        #[arg(short, long, default_value = "")]
        reason: String,
    },
    /// List movements (10 per page) or one product's history
    Movements {
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        product: Option<String>,
    },
    /// Compare a product's stock with its movement history
    Ledger { product_id: String },
    /// Products below the low-stock threshold
    LowStock,
    /// Code the next product will receive
    NextCode,
    /// Dashboard figures
    Dashboard,
    /// Report data (totals, values, latest movements)
    Report,
    /// AI high-demand and reorder suggestions
    Suggest,
    /// Ask NutriBot about the inventory
    Chat { message: String },
    /// Generate an image; prints a data URL
    Image {
        prompt: String,
        #[arg(short, long, default_value = "1:1")]
        ratio: AspectRatio,
    },
}

#[derive(Debug, Args)]
struct NewProduct {
    #[arg(long)]
    name: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    supplier: String,
    #[arg(long, default_value_t = 0)]
    quantity: i64,
    #[arg(long, default_value = "unidades")]
    unit: Unit,
    #[arg(long)]
    presentation: Option<String>,
    /// Cost per unit in cents
    #[arg(long)]
    cost: i64,
    /// Sale price per unit in cents
    #[arg(long)]
    price: i64,
    #[arg(long)]
    entry: NaiveDate,
    #[arg(long)]
    expiry: NaiveDate,
    #[arg(long, default_value = "")]
    image: String,
}

impl From<NewProduct> for ProductInput {
    fn from(p: NewProduct) -> Self {
        ProductInput {
            name: p.name,
            category: p.category,
            supplier: p.supplier,
            quantity: p.quantity,
            unit: p.unit,
            presentation: p.presentation,
            cost_cents: p.cost,
            price_cents: p.price,
            entry_date: p.entry,
            expiry_date: p.expiry,
            image_url: p.image,
        }
    }
}

#[derive(Debug, Args)]
struct ProductChanges {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    supplier: Option<String>,
    #[arg(long)]
    quantity: Option<i64>,
    #[arg(long)]
    unit: Option<Unit>,
    #[arg(long)]
    presentation: Option<String>,
    #[arg(long)]
    cost: Option<i64>,
    #[arg(long)]
    price: Option<i64>,
    #[arg(long)]
    entry: Option<NaiveDate>,
    #[arg(long)]
    expiry: Option<NaiveDate>,
    #[arg(long)]
    image: Option<String>,
}

impl ProductChanges {
    fn apply(self, input: &mut ProductInput) {
        if let Some(v) = self.name {
            input.name = v;
        }
        if let Some(v) = self.category {
            input.category = v;
        }
        if let Some(v) = self.supplier {
            input.supplier = v;
        }
        if let Some(v) = self.quantity {
            input.quantity = v;
        }
        if let Some(v) = self.unit {
            input.unit = v;
        }
        if let Some(v) = self.presentation {
            input.presentation = Some(v);
        }
        if let Some(v) = self.cost {
            input.cost_cents = v;
        }
        if let Some(v) = self.price {
            input.price_cents = v;
        }
        if let Some(v) = self.entry {
            input.entry_date = v;
        }
        if let Some(v) = self.expiry {
            input.expiry_date = v;
        }
        if let Some(v) = self.image {
            input.image_url = v;
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints an outcome and turns a failed one into a non-zero exit.
fn finish<T: Serialize>(outcome: Outcome<T>) -> Result<bool, Box<dyn std::error::Error>> {
    print_json(&outcome)?;
    Ok(outcome.success)
}

async fn run(cli: Cli, state: AppState) -> Result<bool, Box<dyn std::error::Error>> {
    let user = cli.user.as_deref();
    let AppState {
        db,
        config,
        events,
        assistant: ai,
    } = &state;

    match cli.command {
        Command::List { page } => print_json(&product::product_page(db, page).await?)?,
        Command::Show { id_or_code } => {
            let found = match product::get_product(db, &id_or_code).await {
                Ok(p) => p,
                Err(_) => product::get_product_by_code(db, &id_or_code).await?,
            };
            print_json(&found)?;
        }
        Command::Add(new) => {
            let input = ProductInput::from(new);
            return finish(product::add_product(db, events, config, &input, user).await);
        }
        Command::Edit { id, changes } => {
            let current = product::get_product(db, &id).await?;
            let mut input = ProductInput::from_product(&current);
            changes.apply(&mut input);
            return finish(product::edit_product(db, events, config, &id, &input, user).await);
        }
        Command::Delete { id } => return finish(product::delete_product(db, events, &id).await),
        Command::Move {
            product_id,
            movement_type,
            quantity,
            reason,
        } => {
            let request = MovementRequest {
                product_id,
                movement_type,
                quantity,
                reason,
            };
            return finish(movement::register_movement(db, events, config, &request, user).await);
        }
        Command::Movements { page, product: None } => {
            print_json(&movement::movement_page(db, page).await?)?
        }
        Command::Movements {
            product: Some(id), ..
        } => print_json(&movement::product_movements(db, &id).await?)?,
        Command::Ledger { product_id } => {
            print_json(&movement::ledger_check(db, &product_id).await?)?
        }
        Command::LowStock => print_json(&product::low_stock_products(db, config).await?)?,
        Command::NextCode => println!("{}", product::preview_next_code(db).await?),
        Command::Dashboard => print_json(&dashboard::dashboard(db, config).await?)?,
        Command::Report => print_json(&dashboard::inventory_report(db).await?)?,
        Command::Suggest => return finish(dashboard::ai_suggestions(db, ai).await),
        Command::Chat { message } => print_json(&assistant::chat(db, ai, &message).await?)?,
        Command::Image { prompt, ratio } => {
            match assistant::generate_image(ai, &prompt, ratio).await? {
                Some(url) => println!("{url}"),
                None => {
                    error!("Image generation produced no image");
                    return Ok(false);
                }
            }
        }
    }

    Ok(true)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let state = match load_config(cli.config.clone()) {
        Ok(config) => bootstrap(config).await,
        Err(e) => Err(e),
    };
    let state = match state {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    match run(cli, state).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
