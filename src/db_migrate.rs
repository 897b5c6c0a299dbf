use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use laundrybook_db::{
    create_pool, repositories::kv, schema::initialize_database, LEDGER_STORAGE_KEY,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").wrap_err("DATABASE_URL environment variable must be set")?;

    println!("Connecting to database...");
    let db_pool = create_pool(&database_url).await?;

    println!("Initializing database schema...");
    initialize_database(&db_pool).await?;

    match kv::get_entry(&db_pool, LEDGER_STORAGE_KEY).await? {
        Some(entry) => println!(
            "Found existing ledger record ({} bytes, updated {}).",
            entry.value.len(),
            entry.updated_at
        ),
        None => println!("No ledger record yet; it is created on the first booking."),
    }

    println!("Database schema initialized successfully.");
    Ok(())
}
