use async_trait::async_trait;
use laundrybook_core::ledger::Ledger;
use mockall::mock;

use crate::store::LedgerStore;

// Mock store for exercising load and save failures
mock! {
    pub LedgerStore {}

    #[async_trait]
    impl LedgerStore for LedgerStore {
        async fn load(&self) -> eyre::Result<Ledger>;

        async fn save(&self, ledger: &Ledger) -> eyre::Result<()>;
    }
}
