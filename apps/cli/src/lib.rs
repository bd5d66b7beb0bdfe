//! # BizLedger CLI Library
//!
//! Command-line adapter over `bizledger-core` and `bizledger-db`.
//!
//! ## Module Organization
//! ```text
//! bizledger_cli/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   └── config.rs   ◄─── BIZLEDGER_* configuration
//! ├── commands/
//! │   ├── party.rs    ◄─── Party registration/listing
//! │   ├── item.rs     ◄─── Items and stock checks
//! │   ├── invoice.rs  ◄─── Invoice create/list/show
//! │   ├── employee.rs ◄─── Staff and pay slips
//! │   ├── report.rs   ◄─── Trends, rankings, dashboard
//! │   └── export.rs   ◄─── CSV export command
//! ├── export.rs       ◄─── CSV writers
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod export;
pub mod state;

use directories::ProjectDirs;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bizledger_db::DbConfig;

use cli::{Cli, Command, EmployeeCommand, InvoiceCommand, ItemCommand, PartyCommand, ReportCommand};
use error::ApiError;
use state::{ConfigState, DbState};

/// Runs one CLI invocation.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load configuration ─── BIZLEDGER_* env vars, then CLI flags         │
/// │  2. Determine database path                                             │
/// │     • --db / BIZLEDGER_DB_PATH                                          │
/// │     • otherwise the platform data dir (directories crate)               │
/// │  3. Connect ─── SQLite WAL, migrations applied                          │
/// │  4. Dispatch the command, print JSON or CSV to stdout                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> Result<(), ApiError> {
    let mut config = ConfigState::from_env();
    if let Some(path) = cli.db {
        config.db_path = Some(path);
    }
    if cli.no_overdraft {
        config.allow_overdraft = false;
    }

    let db_path = database_path(&config)?;
    info!(db_path = %db_path.display(), allow_overdraft = config.allow_overdraft, "Starting BizLedger");

    let db = DbState::connect(DbConfig::new(db_path)).await?;

    dispatch(&db, &config, cli.command).await
}

async fn dispatch(db: &DbState, config: &ConfigState, command: Command) -> Result<(), ApiError> {
    debug!(?command, "Dispatching");

    match command {
        Command::Party(PartyCommand::Add { name, phone }) => {
            print_json(&commands::party::add_party(db, name, phone).await?)
        }
        Command::Party(PartyCommand::List) => print_json(&commands::party::list_parties(db).await?),

        Command::Item(ItemCommand::Add {
            name,
            sku,
            price,
            stock,
            tax,
        }) => print_json(&commands::item::add_item(db, name, sku, &price, stock, tax).await?),
        Command::Item(ItemCommand::List) => print_json(&commands::item::list_items(db).await?),
        Command::Item(ItemCommand::Stock { item_id, qty }) => {
            print_json(&commands::item::check_stock(db, &item_id, qty).await?)
        }

        Command::Invoice(InvoiceCommand::Create {
            party,
            number,
            date,
            lines,
        }) => print_json(
            &commands::invoice::create_invoice(db, config, party, number, date.as_deref(), &lines)
                .await?,
        ),
        Command::Invoice(InvoiceCommand::List(args)) => {
            print_json(&commands::invoice::list_invoices(db, &args).await?)
        }
        Command::Invoice(InvoiceCommand::Show { invoice_id }) => {
            print_json(&commands::invoice::show_invoice(db, config, &invoice_id).await?)
        }

        Command::Employee(EmployeeCommand::Add { name, role, salary }) => {
            print_json(&commands::employee::add_employee(db, name, role, &salary).await?)
        }
        Command::Employee(EmployeeCommand::List) => {
            print_json(&commands::employee::list_employees(db).await?)
        }
        Command::Employee(EmployeeCommand::Payslip { employee_id, bonus }) => {
            print_json(&commands::employee::pay_slip(db, &employee_id, &bonus).await?)
        }

        Command::Report(ReportCommand::Trend(window)) => {
            print_json(&commands::report::sales_trend(db, &window).await?)
        }
        Command::Report(ReportCommand::TopProducts { window, limit }) => {
            print_json(&commands::report::top_products(db, &window, limit).await?)
        }
        Command::Report(ReportCommand::TopCustomers { window, limit }) => {
            print_json(&commands::report::top_customers(db, &window, limit).await?)
        }
        Command::Report(ReportCommand::Dashboard) => {
            print_json(&commands::report::dashboard(db).await?)
        }

        Command::Export(args) => {
            let out: Box<dyn Write> = match &args.out {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(io::stdout()),
            };
            commands::export::export(db, &args, out).await?;
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ApiError> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(io::stdout(), "{}", json)?;
    Ok(())
}

/// Initializes the tracing subscriber. Logs go to stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bizledger_db=trace` - Trace for the store only
/// - Default: INFO, debug for the bizledger crates, sqlx at WARN
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,bizledger_core=debug,bizledger_db=debug,sqlx=warn")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Determines the ledger file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.bizledger.ledger/ledger.db`
/// - **Windows**: `%APPDATA%\bizledger\ledger\data\ledger.db`
/// - **Linux**: `~/.local/share/ledger/ledger.db`
pub fn database_path(config: &ConfigState) -> Result<PathBuf, ApiError> {
    if let Some(path) = &config.db_path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "bizledger", "ledger")
        .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("ledger.db"))
}
