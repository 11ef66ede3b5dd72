//! # Seed Data Generator
//!
//! Populates the database with a small grocery catalog and some movement
//! history for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p inventics-db --bin seed
//!
//! # Specify database path and how many movements to simulate
//! cargo run -p inventics-db --bin seed -- --db ./data/inventics.db --movements 40
//! ```
//!
//! Every write goes through the ledger, so the seeded movements reconcile
//! with the seeded stock.

use chrono::{Duration, Utc};
use clap::Parser;
use inventics_core::{MovementRequest, MovementType, ProductInput, Unit};
use inventics_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Demo catalog: (name, category, supplier, unit, presentation, cost, price, stock)
const CATALOG: &[(&str, &str, &str, Unit, &str, i64, i64, i64)] = &[
    ("Arroz blanco", "Granos", "Molinos del Valle", Unit::Units, "Bolsa de 1kg", 180, 250, 120),
    ("Frijol negro", "Granos", "Molinos del Valle", Unit::Units, "Bolsa de 500g", 140, 210, 80),
    ("Lentejas", "Granos", "Molinos del Valle", Unit::Units, "Bolsa de 500g", 160, 230, 35),
    ("Azúcar morena", "Abarrotes", "Dulces Andinos", Unit::Kilogram, "A granel", 120, 190, 60),
    ("Aceite de girasol", "Abarrotes", "Oleaginosas SA", Unit::Liter, "Botella de 1L", 420, 590, 24),
    ("Leche entera", "Lácteos", "Lácteos La Pradera", Unit::Units, "Caja de 1L", 110, 160, 48),
    ("Queso fresco", "Lácteos", "Lácteos La Pradera", Unit::Gram, "Bloque de 500g", 380, 520, 0),
    ("Yogur natural", "Lácteos", "Lácteos La Pradera", Unit::Milliliter, "Vaso de 200mL", 70, 120, 90),
    ("Café molido", "Bebidas", "Tostadores del Sur", Unit::Ounce, "Bolsa de 12oz", 650, 890, 15),
    ("Agua mineral", "Bebidas", "Manantial Claro", Unit::Units, "Botella de 600mL", 40, 80, 200),
];

#[derive(Debug, Parser)]
#[command(name = "seed", about = "InvenTICS demo data generator")]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "./inventics_dev.db")]
    db: String,

    /// Number of random movements to simulate after the catalog
    #[arg(short, long, default_value_t = 30)]
    movements: usize,

    /// Username recorded on the seeded movements
    #[arg(short, long, default_value = "seed")]
    user: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args = Args::parse();

    println!("🌱 InvenTICS Seed Data Generator");
    println!("================================");
    println!("Database: {}", args.db);
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let mut ids = Vec::with_capacity(CATALOG.len());

    for (idx, (name, category, supplier, unit, presentation, cost, price, stock)) in
        CATALOG.iter().enumerate()
    {
        let input = ProductInput {
            name: name.to_string(),
            category: category.to_string(),
            supplier: supplier.to_string(),
            quantity: *stock,
            unit: *unit,
            presentation: Some(presentation.to_string()),
            cost_cents: *cost,
            price_cents: *price,
            entry_date: today - Duration::days(idx as i64 * 3),
            expiry_date: today + Duration::days(90 + idx as i64 * 30),
            image_url: String::new(),
        };

        match db.ledger().create_product(&input, &args.user).await {
            Ok(change) => {
                info!(code = %change.product.code, name = %change.product.name, "Seeded product");
                ids.push(change.product.id);
            }
            Err(e) => warn!(name = %name, error = %e, "Failed to seed product"),
        }
    }

    println!("✓ Created {} products", ids.len());

    // Deterministic pseudo-random walk over the catalog.
    let mut recorded = 0;
    for step in 0..args.movements {
        let Some(product_id) = ids.get((step * 7) % ids.len().max(1)) else {
            break;
        };
        let movement_type = if step % 3 == 0 {
            MovementType::Inbound
        } else {
            MovementType::Outbound
        };
        let request = MovementRequest {
            product_id: product_id.clone(),
            movement_type,
            quantity: 1 + (step as i64 * 5) % 12,
            reason: match movement_type {
                MovementType::Inbound => "Reposición de proveedor".to_string(),
                MovementType::Outbound => "Venta mostrador".to_string(),
            },
        };

        // Outbound steps may hit an empty shelf; the ledger rejects those.
        if db.ledger().register_movement(&request, &args.user).await.is_ok() {
            recorded += 1;
        }
    }

    println!("✓ Recorded {} movements", recorded);
    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
