//! Erply CLI - query an Erply account from the terminal
//!
//! Connection settings come from `ERPLY_CLIENT_CODE`, `ERPLY_SESSION_KEY`
//! and the other `ERPLY_*` variables read by the API client.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process::ExitCode;

mod commands;
mod output;

use commands::{endpoints, price_lists, session, suppliers};

/// Command line access to the Erply API
#[derive(Parser)]
#[command(name = "erply")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the account's service endpoints
    Endpoints,

    /// List suppliers
    Suppliers {
        /// Filter by name
        #[arg(short, long)]
        search: Option<String>,

        /// Records per page
        #[arg(short, long, default_value = "20")]
        page_size: u32,

        /// Number of pages, fetched together in one bulk request
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// List supplier price lists
    PriceLists {
        /// Only price lists of these suppliers; one bulk item per supplier
        #[arg(short = 'i', long = "supplier-id")]
        supplier_ids: Vec<i64>,

        /// Include product rows
        #[arg(short, long)]
        rules: bool,
    },

    /// Show the user and lifetime of the current session key
    Session,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("erply_api_client=debug,erply=debug")
            .init();
    }

    let result = match cli.command {
        Commands::Endpoints => endpoints::run(&cli.format).await,

        Commands::Suppliers { search, page_size, pages } => {
            suppliers::run(search.as_deref(), page_size, pages, &cli.format).await
        }

        Commands::PriceLists { supplier_ids, rules } => {
            price_lists::run(&supplier_ids, rules, &cli.format).await
        }

        Commands::Session => session::run(&cli.format).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
