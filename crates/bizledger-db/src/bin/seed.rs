//! # Seed Data Generator
//!
//! Populates a ledger with demo parties, items and invoices so the
//! reports have something to show.
//!
//! ## Usage
//! ```bash
//! # 200 invoices spread over the last 400 days (default)
//! cargo run -p bizledger-db --bin seed
//!
//! # Custom amount
//! cargo run -p bizledger-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p bizledger-db --bin seed -- --db ./data/ledger.db
//! ```
//!
//! Invoices go through the invoice engine, so stock is decremented exactly
//! as it would be for a real sale. Data is deterministic for a given
//! `--count`.

use chrono::{Days, Utc};
use std::env;

use bizledger_core::invoice::{EngineConfig, InvoiceRequest, LineRequest};
use bizledger_core::{Money, NewItem, NewParty};
use bizledger_db::{Database, DbConfig};

const PARTIES: &[(&str, &str)] = &[
    ("Acme Traders", "555-0100"),
    ("Blue Harbor Cafe", "555-0131"),
    ("Northwind Supplies", "555-0172"),
    ("Greenleaf Grocers", "555-0145"),
    ("Summit Hardware", "555-0188"),
    ("Riverside Clinic", "555-0119"),
    ("Orbit Electronics", "555-0163"),
];

/// (name, sku, price in cents, opening stock)
const ITEMS: &[(&str, &str, i64, i64)] = &[
    ("Widget", "WID-001", 5000, 400),
    ("Gadget", "GAD-001", 12500, 150),
    ("Sprocket", "SPR-001", 850, 900),
    ("Flange", "FLA-001", 2200, 300),
    ("Gear Set", "GEA-001", 7600, 80),
    ("Bearing", "BEA-001", 1450, 600),
    ("Valve", "VAL-001", 3900, 120),
    ("Bracket", "BRA-001", 640, 8),
];

/// Tax rates in basis points
const TAX_RATES: &[u32] = &[0, 500, 1200, 1800];

const LOOKBACK_DAYS: usize = 400;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./bizledger_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("BizLedger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of invoices to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./bizledger_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("BizLedger Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Invoices: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.invoices().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} invoices", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut party_ids = Vec::with_capacity(PARTIES.len());
    for (name, phone) in PARTIES {
        let party = db
            .parties()
            .insert(&NewParty {
                name: (*name).to_string(),
                phone: Some((*phone).to_string()),
            })
            .await?;
        party_ids.push(party.id);
    }

    let mut items = Vec::with_capacity(ITEMS.len());
    for (idx, (name, sku, price_cents, stock)) in ITEMS.iter().enumerate() {
        let item = db
            .items()
            .insert(&NewItem {
                name: (*name).to_string(),
                sku: Some((*sku).to_string()),
                price_cents: *price_cents,
                stock_quantity: *stock,
                tax_rate_bps: TAX_RATES[idx % TAX_RATES.len()],
            })
            .await?;
        items.push(item);
    }
    println!("✓ {} parties, {} items", party_ids.len(), items.len());

    let engine = db.invoice_engine(EngineConfig::default());
    let today = Utc::now().date_naive();
    let start = std::time::Instant::now();
    let mut warned = 0usize;

    for n in 0..count {
        let seed = n * 7919;
        let days_back = (seed % LOOKBACK_DAYS) as u64;
        let date = today.checked_sub_days(Days::new(days_back)).unwrap_or(today);

        let line_count = 1 + seed % 3;
        let lines = (0..line_count)
            .map(|k| {
                let item = &items[(seed / 3 + k * 5) % items.len()];
                let quantity = 1 + ((seed + k) % 6) as i64;
                LineRequest::new(&item.id, quantity, Money::from_cents(item.price_cents))
            })
            .collect();

        let request = InvoiceRequest {
            party_id: party_ids[seed % party_ids.len()].clone(),
            invoice_number: format!("INV-{:05}", n + 1),
            date,
            lines,
        };

        match engine.create_invoice(&request).await {
            Ok(created) => warned += usize::from(!created.warnings.is_empty()),
            Err(e) => eprintln!("Failed to create {}: {}", request.invoice_number, e),
        }

        if (n + 1) % 50 == 0 {
            println!("  Created {} invoices...", n + 1);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Created {} invoices in {:?}", count, elapsed);
    if warned > 0 {
        println!("  {} invoices committed with stock warnings", warned);
    }

    let summary = db.analytics().dashboard_summary().await?;
    println!();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
