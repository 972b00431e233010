//! Catalog command-line entry point.
//!
//! # Responsibility
//! - Inspect and seed a catalog database from the shell.
//! - Print results as pretty JSON so output can be piped into other tools.

use catalog_core::db::open_db;
use catalog_core::{
    core_version, default_products, init_from_config, CatalogConfig, ProductService,
    QueryRequest, SqliteProductRepository,
};
use clap::{Parser, Subcommand};
use log::warn;
use serde_json::{json, Value};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "catalog", about = "Query a product catalog database")]
struct Cli {
    /// Database file; defaults to `CATALOG_DB_PATH` or a temp-dir file.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the core version.
    Version,
    #[command(flatten)]
    Catalog(CatalogCommand),
}

/// Commands that open the catalog database.
#[derive(Debug, Subcommand)]
enum CatalogCommand {
    /// List one page of products matching the filters.
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        min_price: Option<String>,
        #[arg(long)]
        max_price: Option<String>,
        /// `true` (any casing) selects in-stock products; anything else out-of-stock.
        #[arg(long)]
        in_stock: Option<String>,
        #[arg(long)]
        limit: Option<String>,
        #[arg(long)]
        offset: Option<String>,
    },
    /// Show one product by ID.
    Get { id: String },
    /// List distinct categories.
    Categories,
    /// Insert the default catalog into an empty database.
    Seed,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = match cli.command {
        Command::Version => {
            println!("{}", json!({ "version": core_version() }));
            return ExitCode::SUCCESS;
        }
        Command::Catalog(command) => command,
    };

    let mut config = CatalogConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Err(err) = init_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    match run(&config, command) {
        Ok(Some(value)) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
        Ok(None) => ExitCode::from(2),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Runs one command; `Ok(None)` means the requested product does not exist.
fn run(config: &CatalogConfig, command: CatalogCommand) -> Result<Option<Value>, Box<dyn Error>> {
    let conn = open_db(&config.db_path)?;
    let service = ProductService::new(SqliteProductRepository::try_new(&conn)?);
    let inserted = service.seed_if_empty(&default_products())?;

    let value = match command {
        CatalogCommand::Seed => json!({ "inserted": inserted }),
        CatalogCommand::List {
            category,
            min_price,
            max_price,
            in_stock,
            limit,
            offset,
        } => {
            let params = [
                ("category", category),
                ("minPrice", min_price),
                ("maxPrice", max_price),
                ("inStock", in_stock),
                ("limit", limit),
                ("offset", offset),
            ];
            let request = QueryRequest::from_params(
                params
                    .into_iter()
                    .filter_map(|(key, value)| value.map(|value| (key, value))),
            );
            serde_json::to_value(service.list_products(&request)?)?
        }
        CatalogCommand::Get { id } => match service.get_product(&id)? {
            Some(product) => serde_json::to_value(product)?,
            None => {
                warn!("event=cli_get module=cli status=not_found");
                eprintln!("Product not found");
                return Ok(None);
            }
        },
        CatalogCommand::Categories => serde_json::to_value(service.list_categories()?)?,
    };
    Ok(Some(value))
}
