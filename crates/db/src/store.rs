//! Durable homes for the ledger.
//!
//! Every store keeps the whole ledger as one JSON record. Loading never
//! fails on bad content: a missing or unreadable record comes back as an
//! empty ledger (see [`Ledger::decode`]). Only I/O and database errors are
//! reported.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use laundrybook_core::ledger::Ledger;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::repositories::kv;
use crate::DbPool;

/// Storage key the ledger record is kept under.
pub const LEDGER_STORAGE_KEY: &str = "bookings";

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load(&self) -> Result<Ledger>;

    async fn save(&self, ledger: &Ledger) -> Result<()>;
}

#[async_trait]
impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    async fn load(&self) -> Result<Ledger> {
        (**self).load().await
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        (**self).save(ledger).await
    }
}

/// Keeps the serialized record in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a raw stored record, exactly as another store would hold it.
    pub fn with_record(raw: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(raw.into())),
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn load(&self) -> Result<Ledger> {
        let record = self.record.lock().await;
        Ok(Ledger::decode(record.as_deref()))
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        let json = ledger.to_json()?;
        *self.record.lock().await = Some(json);
        Ok(())
    }
}

/// One JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl LedgerStore for FileStore {
    async fn load(&self) -> Result<Ledger> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Ledger::decode(Some(&raw))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No ledger at {}, starting empty", self.path.display());
                Ok(Ledger::new())
            }
            Err(e) => Err(e)
                .wrap_err_with(|| format!("Failed to read ledger from {}", self.path.display())),
        }
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        let json = ledger.to_json()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }

        // Readers only ever see a complete file.
        let temp = self.temp_path();
        tokio::fs::write(&temp, json.as_bytes())
            .await
            .wrap_err_with(|| format!("Failed to write {}", temp.display()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .wrap_err_with(|| format!("Failed to replace {}", self.path.display()))?;

        debug!("Saved {} bookings to {}", ledger.len(), self.path.display());
        Ok(())
    }
}

/// Ledger kept as a row of the `kv_store` table.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgStore {
    async fn load(&self) -> Result<Ledger> {
        let entry = kv::get_entry(&self.pool, LEDGER_STORAGE_KEY)
            .await
            .wrap_err("Failed to load ledger from database")?;
        Ok(Ledger::decode(entry.as_ref().map(|e| e.value.as_str())))
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        let json = ledger.to_json()?;
        kv::put_entry(&self.pool, LEDGER_STORAGE_KEY, &json)
            .await
            .wrap_err("Failed to save ledger to database")?;
        Ok(())
    }
}
