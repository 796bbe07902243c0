//! catalog - Catalog browsing service: REST API server and terminal client

mod cli;

use anyhow::{Context, Result};
use catalog_client::{ApiClient, ItemsBrowser};
use catalog_core::{query, ItemStore, NewItem, QueryParams, StatsCache};
use catalog_web::ServerConfig;
use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "catalog",
    version,
    about = "Catalog browsing service",
    long_about = "Serves a JSON-file-backed item catalog over HTTP and browses it from the terminal.\n\
                  \n\
                  Examples:\n\
                    catalog serve                        # API on http://127.0.0.1:3008\n\
                    catalog serve --port 8080            # Custom port\n\
                    catalog stats                        # Print item count and average price\n\
                    catalog search apple --page 2        # Query the store directly\n\
                    catalog add Orange 2.5 Fruit         # Append an item to the store\n\
                    catalog browse                       # Interactive search against a running server\n\
                  \n\
                  Environment Variables:\n\
                    CATALOG_DATA_PATH                    # Item store location\n\
                    CATALOG_PORT                         # Server port\n\
                    CATALOG_API_URL                      # Server URL for `browse`\n\
                    RUST_LOG                             # Log filter (default: info)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,

    /// Path to the JSON item store
    #[arg(long, global = true, env = "CATALOG_DATA_PATH", default_value = "data/items.json")]
    data: PathBuf,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, global = true, env = "CATALOG_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        /// Port to bind
        #[arg(long, env = "CATALOG_PORT", default_value = "3008")]
        port: u16,
    },
    /// Print item count and average price
    Stats,
    /// Search items by name
    Search {
        /// Case-insensitive name substring
        query: Option<String>,
        #[arg(long, short = 'p', default_value = "1")]
        page: i64,
        #[arg(long, short = 'n', default_value = "10")]
        limit: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an item to the store
    Add {
        name: String,
        price: f64,
        category: String,
    },
    /// Browse a running server interactively
    Browse {
        /// Base URL of the API
        #[arg(long, env = "CATALOG_API_URL", default_value = "http://127.0.0.1:3008")]
        url: String,
    },
}

fn init_tracing(no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.no_color);

    match cli.mode {
        Mode::Serve { host, port } => {
            run_serve(ServerConfig {
                data_path: cli.data,
                host,
                port,
            })
            .await?;
        }
        Mode::Stats => {
            run_stats(cli.data).await?;
        }
        Mode::Search {
            query,
            page,
            limit,
            json,
        } => {
            run_search(cli.data, query, page, limit, json, cli.no_color).await?;
        }
        Mode::Add {
            name,
            price,
            category,
        } => {
            run_add(cli.data, name, price, category).await?;
        }
        Mode::Browse { url } => {
            run_browse(url).await?;
        }
    }

    Ok(())
}

async fn run_serve(config: ServerConfig) -> Result<()> {
    println!("Catalog API: http://{}/api/items", config.addr());
    catalog_web::run(config).await
}

async fn run_stats(data: PathBuf) -> Result<()> {
    let store = ItemStore::new(&data);
    let stats = StatsCache::new()
        .get(&store)
        .await
        .with_context(|| format!("Could not compute stats for {}", data.display()))?;

    println!("Catalog Statistics");
    println!("==================");
    println!();
    println!("Items:          {}", stats.total);
    println!("Average price:  {:.2}", stats.average_price);

    Ok(())
}

async fn run_search(
    data: PathBuf,
    search: Option<String>,
    page: i64,
    limit: i64,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let store = ItemStore::new(&data);
    let items = store
        .read_all()
        .await
        .with_context(|| format!("Could not read {}", data.display()))?;

    let result = query(&items, &QueryParams::new(search, page, limit));

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.items.is_empty() {
        println!("No items found.");
    } else {
        println!("{}", cli::format_item_table(&result.items, no_color));
    }
    eprintln!("\nPage {} of {}", result.page, result.total_pages);

    Ok(())
}

async fn run_add(data: PathBuf, name: String, price: f64, category: String) -> Result<()> {
    let store = ItemStore::new(&data);
    store.ensure_exists().await?;

    let new_item = NewItem::from_json(&serde_json::json!({
        "name": name,
        "price": price,
        "category": category,
    }))?;
    let item = store.create(new_item).await?;

    println!("Added item {} ({})", item.id, item.name);
    Ok(())
}

async fn run_browse(url: String) -> Result<()> {
    let browser = ItemsBrowser::new(ApiClient::new(url));
    cli::browse(&browser).await
}
