//! # BizLedger CLI Entry Point
//!
//! Parses arguments and hands off to [`bizledger_cli::run`]. Results go to
//! stdout (JSON or CSV); logs and errors go to stderr.

use clap::Parser;

use bizledger_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    bizledger_cli::init_tracing();

    if let Err(err) = bizledger_cli::run(cli).await {
        match serde_json::to_string(&err) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", err),
        }
        std::process::exit(err.exit_code());
    }
}
