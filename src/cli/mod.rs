use clap::{Parser, Subcommand, ValueEnum};
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::database::{schema, DatabaseManager, MemoryProductRepository, PgProductRepository};
use crate::middleware::ProductStore;

#[derive(Parser)]
#[command(name = "product-catalog")]
#[command(about = "Product catalog HTTP API over flexible JSON documents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve(ServeArgs),

    #[command(about = "Create the products table and indexes, then exit")]
    Migrate {
        #[arg(long, env = "DATABASE_URL", help = "PostgreSQL connection string")]
        database_url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "PRODUCT_API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PRODUCT_API_PORT", help = "Listen port (falls back to PORT, then 3000)")]
    pub port: Option<u16>,

    #[arg(long, env = "PRODUCT_STORE", value_enum, default_value_t = StoreBackend::Postgres)]
    pub store: StoreBackend,

    #[arg(long, env = "DATABASE_URL", help = "PostgreSQL connection string")]
    pub database_url: Option<String>,
}

impl ServeArgs {
    fn port(&self) -> u16 {
        self.port
            .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse().ok()))
            .unwrap_or(3000)
    }
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve(args) => serve(args, config).await,
        Commands::Migrate { database_url } => migrate(database_url.as_deref(), config).await,
    }
}

async fn open_store(args: &ServeArgs, config: &AppConfig) -> anyhow::Result<ProductStore> {
    match args.store {
        StoreBackend::Memory => {
            if crate::is_production!() {
                tracing::warn!("In-memory store selected in production; data will not survive restarts");
            }
            Ok(ProductStore::new(MemoryProductRepository::new()))
        }
        StoreBackend::Postgres => {
            let url = DatabaseManager::database_url(args.database_url.as_deref())?;
            let pool = DatabaseManager::connect(&url, &config.database).await?;
            if config.database.auto_migrate {
                schema::apply(&pool).await?;
            }
            Ok(ProductStore::new(PgProductRepository::new(
                pool,
                config.database.enable_query_logging,
            )))
        }
    }
}

async fn serve(args: ServeArgs, config: &AppConfig) -> anyhow::Result<()> {
    let store = open_store(&args, config).await?;
    tracing::info!("Using {} product store", store.backend());

    let bind_addr = format!("{}:{}", args.host, args.port());
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;
    tracing::info!("Product Catalog API listening on http://{}", bind_addr);

    crate::server::serve(listener, crate::server::app(store, config)).await?;
    Ok(())
}

async fn migrate(database_url: Option<&str>, config: &AppConfig) -> anyhow::Result<()> {
    let url = DatabaseManager::database_url(database_url)?;
    let pool = DatabaseManager::connect(&url, &config.database).await?;
    schema::apply(&pool).await?;
    pool.close().await;
    Ok(())
}
