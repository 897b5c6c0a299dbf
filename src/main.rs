use color_eyre::eyre::Result;
use dotenv::dotenv;
use laundrybook_api::config::{ApiConfig, StoreKind};
use laundrybook_db::{
    create_pool, schema::initialize_database, FileStore, LedgerStore, MemoryStore, PgStore,
};
use tracing::{info, warn};

async fn open_store(config: &ApiConfig) -> Result<Box<dyn LedgerStore>> {
    let store: Box<dyn LedgerStore> = match config.store {
        StoreKind::File => {
            info!("Keeping bookings in {}", config.data_file.display());
            Box::new(FileStore::new(&config.data_file))
        }
        StoreKind::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| color_eyre::eyre::eyre!("DATABASE_URL must be set"))?;
            let db_pool = create_pool(database_url).await?;
            initialize_database(&db_pool).await?;
            Box::new(PgStore::new(db_pool))
        }
        StoreKind::Memory => {
            warn!("Bookings are kept in memory and lost on restart");
            Box::new(MemoryStore::new())
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    laundrybook_api::init_tracing(config.log_level)?;

    let store = open_store(&config).await?;

    // Start API server
    laundrybook_api::start_server(config, store).await?;

    Ok(())
}
