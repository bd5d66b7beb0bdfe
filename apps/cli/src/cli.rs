//! # Command-Line Interface
//!
//! Argument definitions. Parsing only; dispatch lives in [`crate::run`].
//!
//! ```text
//! bizledger [--db PATH] [--no-overdraft] <COMMAND>
//!
//!   party     add | list
//!   item      add | list | stock
//!   invoice   create | list | show
//!   employee  add | list | payslip
//!   report    trend | top-products | top-customers | dashboard
//!   export    invoices | inventory | trend | top-products | top-customers
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use bizledger_core::analytics::{Period, DEFAULT_TOP_LIMIT};

#[derive(Debug, Parser)]
#[command(name = "bizledger")]
#[command(about = "Invoices, stock and sales reports for a small business")]
#[command(version)]
pub struct Cli {
    /// Ledger database file (overrides BIZLEDGER_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Refuse sales larger than available stock
    #[arg(long, global = true)]
    pub no_overdraft: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Customers and counterparties
    #[command(subcommand)]
    Party(PartyCommand),

    /// Stocked items
    #[command(subcommand)]
    Item(ItemCommand),

    /// Create and inspect invoices
    #[command(subcommand)]
    Invoice(InvoiceCommand),

    /// Staff and pay slips
    #[command(subcommand)]
    Employee(EmployeeCommand),

    /// Sales analytics
    #[command(subcommand)]
    Report(ReportCommand),

    /// Write CSV files
    Export(ExportArgs),
}

// =============================================================================
// Master Data
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum PartyCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
    },
    List,
}

#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        sku: Option<String>,
        /// Unit price, e.g. 49.99
        #[arg(long)]
        price: String,
        /// Opening stock
        #[arg(long, default_value_t = 0)]
        stock: i64,
        /// Tax rate in percent
        #[arg(long, default_value_t = 18.0)]
        tax: f64,
    },
    List,
    /// Check whether a quantity is on hand
    Stock {
        /// Item id or SKU
        item_id: String,
        #[arg(long, default_value_t = 1)]
        qty: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum EmployeeCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: Option<String>,
        /// Monthly base salary, e.g. 40000.00
        #[arg(long)]
        salary: String,
    },
    List,
    /// Base salary plus bonus
    Payslip {
        employee_id: String,
        #[arg(long, default_value = "0")]
        bonus: String,
    },
}

// =============================================================================
// Invoices
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum InvoiceCommand {
    /// Create an invoice and decrement stock in one transaction
    Create {
        #[arg(long)]
        party: String,
        #[arg(long)]
        number: String,
        /// Invoice date (YYYY-MM-DD); today when omitted
        #[arg(long)]
        date: Option<String>,
        /// ITEM_ID:QTY[:RATE], repeatable; RATE defaults to the item price
        #[arg(long = "line", required = true)]
        lines: Vec<String>,
    },
    List(InvoiceListArgs),
    /// Print the document payload for one invoice
    Show { invoice_id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct InvoiceListArgs {
    #[arg(long)]
    pub party: Option<String>,
    #[arg(long)]
    pub number: Option<String>,
    /// First date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub from: Option<String>,
    /// Last date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    Daily,
    Monthly,
    Annual,
}

impl From<PeriodArg> for Period {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Daily => Period::Daily,
            PeriodArg::Monthly => Period::Monthly,
            PeriodArg::Annual => Period::Annual,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct WindowArgs {
    #[arg(long, value_enum, default_value_t = PeriodArg::Monthly)]
    pub period: PeriodArg,
    /// Evaluate the window as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub as_of: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    Trend(WindowArgs),
    TopProducts {
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long, default_value_t = DEFAULT_TOP_LIMIT)]
        limit: u32,
    },
    TopCustomers {
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long, default_value_t = DEFAULT_TOP_LIMIT)]
        limit: u32,
    },
    Dashboard,
}

// =============================================================================
// Exports
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    /// Invoice register, newest first
    Invoices,
    /// Stock valuation per item
    Inventory,
    Trend,
    TopProducts,
    TopCustomers,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub kind: ExportKind,
    #[command(flatten)]
    pub window: WindowArgs,
    #[arg(long, default_value_t = DEFAULT_TOP_LIMIT)]
    pub limit: u32,
    /// Output file; stdout when omitted
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_invoice_create() {
        let cli = Cli::parse_from([
            "bizledger",
            "--no-overdraft",
            "invoice",
            "create",
            "--party",
            "p1",
            "--number",
            "INV-1",
            "--line",
            "i1:3",
            "--line",
            "i2:1:45.00",
        ]);
        assert!(cli.no_overdraft);
        match cli.command {
            Command::Invoice(InvoiceCommand::Create { lines, date, .. }) => {
                assert_eq!(lines, vec!["i1:3", "i2:1:45.00"]);
                assert!(date.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_report_defaults() {
        let cli = Cli::parse_from(["bizledger", "report", "top-products"]);
        match cli.command {
            Command::Report(ReportCommand::TopProducts { window, limit }) => {
                assert_eq!(window.period, PeriodArg::Monthly);
                assert_eq!(limit, 5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
