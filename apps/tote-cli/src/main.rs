//! Tote - storefront client on the command line.
//!
//! # Usage
//!
//! ```bash
//! # Fetch the catalog and cache it
//! tote catalog refresh
//!
//! # Add product 7 to the cart, then check out
//! tote cart add 7
//! tote cart checkout
//!
//! # Messages in Spanish
//! tote --locale es favorites toggle 7
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::Parser;

use tote_cli::cli::Cli;

#[tokio::main]
async fn main() {
    tote_cli::init_tracing();

    let cli = Cli::parse();

    if let Err(e) = tote_cli::run(cli).await {
        tracing::error!("Command failed: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
